use crate::client::{ClientOptions, Credentials};
use crate::export::ExportOptions;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ExportParams {
    pub server: String,
    pub repository: String,
    pub output_dir: PathBuf,
    pub credentials: Option<Credentials>,
    pub client_options: ClientOptions,
    pub export_options: ExportOptions,
}
