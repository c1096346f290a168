use clap::Parser;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

use vam_common::Error;

mod context;
mod server;

#[derive(Parser, Debug, Clone)]
#[command(name = "vam-server")]
#[command(author, version, about = "VRChat Avatar Manager - local companion API")]
pub struct Args {
    /// Address the local API binds to
    #[arg(long, default_value = "127.0.0.1:8787")]
    pub bind_addr: String,

    /// Directory holding the preference files (defaults to the platform
    /// data dir)
    #[arg(long)]
    pub data_dir: Option<std::path::PathBuf>,

    /// Upstream VRChat API base URL
    #[arg(long, default_value = "https://api.vrchat.cloud/api/1")]
    pub vrchat_base_url: String,

    /// User-Agent sent upstream
    #[arg(long, default_value = "VRChatAvatarManager/0.1")]
    pub user_agent: String,

    /// UI origin allowed to call this API with credentials
    #[arg(long, default_value = "http://localhost:5173")]
    pub ui_origin: String,
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("vam_server=info".parse().unwrap_or_default())
        .add_directive("vam_core=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub).expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    if let Err(e) = server::run_server(args).await {
        error!("Server error: {:?}", e);
        return Err(e);
    }
    Ok(())
}
