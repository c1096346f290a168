pub mod vrchat;
