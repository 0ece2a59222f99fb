#[allow(clippy::module_inception)]
mod download;
mod types;

pub use download::download_asset;
pub use types::{DownloadOptions, DownloadOutcome, VerificationOutcome};
