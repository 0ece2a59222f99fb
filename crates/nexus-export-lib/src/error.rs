use crate::verification::VerificationError;
use std::path::PathBuf;
use thiserror::Error;

pub const EXIT_CONFIGURATION: u8 = 1;
pub const EXIT_NETWORK: u8 = 2;
pub const EXIT_PARSE: u8 = 3;
pub const EXIT_ASSET_FAILURE: u8 = 4;

#[derive(Error, Debug)]
pub enum NexusExportError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid command-line arguments: {details}")]
    CliArgumentValidation { details: String },

    #[error("Failed to read password for {username}: {source}")]
    PasswordPrompt {
        username: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid server URL {url}: {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to fetch asset listing from {url}: {source}")]
    Listing {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Asset listing request to {url} returned HTTP {status}")]
    ListingStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error(
        "Cannot decode asset listing from {url}: {source}. \
         Are the server URL and the repository name correct?"
    )]
    ListingParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid asset descriptor for {path}: {reason}")]
    InvalidAsset { path: String, reason: String },

    #[error("Refusing to write asset with unsafe path {path:?}")]
    UnsafeAssetPath { path: String },

    #[error("Failed to download {url}: {reason}")]
    AssetDownload { url: String, reason: String },

    #[error("Filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Verification failed for {path}: {source}")]
    Verification {
        path: PathBuf,
        #[source]
        source: VerificationError,
    },

    #[error("{count} asset(s) failed to export")]
    AssetFailures { count: usize },

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] eyre::Report),
}

impl NexusExportError {
    /// Errors that concern a single asset, as opposed to the listing as a whole.
    pub fn is_per_asset(&self) -> bool {
        matches!(
            self,
            Self::UnsafeAssetPath { .. }
                | Self::AssetDownload { .. }
                | Self::Filesystem { .. }
                | Self::Verification { .. }
        )
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Listing { .. } | Self::ListingStatus { .. } | Self::HttpClient(_) => {
                EXIT_NETWORK
            }
            Self::ListingParse { .. } | Self::InvalidAsset { .. } => EXIT_PARSE,
            Self::AssetFailures { .. } => EXIT_ASSET_FAILURE,
            err if err.is_per_asset() => EXIT_ASSET_FAILURE,
            _ => EXIT_CONFIGURATION,
        }
    }
}
