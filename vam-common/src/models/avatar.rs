use serde::{Deserialize, Serialize};

/// Avatar summary served to the UI.
///
/// Everything here comes straight from the platform's avatar record;
/// nothing is mutated locally. Timestamps stay in the string form the
/// API uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Avatar {
    pub id: String,
    pub name: String,
    pub thumbnail: String,

    /// Deduplicated platforms from `unityPackages`, e.g.
    /// "standalonewindows" and "android".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// Normalized performance rank (e.g. "Good"), when one can be read
    /// out of the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<String>,
}
