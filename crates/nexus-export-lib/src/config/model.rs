use crate::export::FailurePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Defaults for an export, read from an optional config file. Command-line flags win.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub username: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub verify: Option<bool>,
    pub mirror: Option<bool>,
    pub insecure: Option<bool>,
    pub on_asset_error: Option<FailurePolicy>,
}
