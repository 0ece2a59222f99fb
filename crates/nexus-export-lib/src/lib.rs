pub mod cli;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod export;
pub mod layout;
pub mod listing;
pub mod verification;

pub use config::Config;
pub use error::NexusExportError;
