use crate::cli::params::ExportParams;
use crate::client::NexusClient;
use crate::error::NexusExportError;
use crate::export::{ExportSummary, export_repository};

/// Runs one export. Any per-asset failure turns into an error so the process exits non-zero.
pub async fn run_export(params: ExportParams) -> Result<ExportSummary, NexusExportError> {
    let client = NexusClient::new(&params.server, params.credentials, params.client_options)?;

    let summary = export_repository(
        &client,
        &params.repository,
        &params.output_dir,
        params.export_options,
    )
    .await?;

    if summary.is_success() {
        return Ok(summary);
    }

    for failure in &summary.failures {
        tracing::error!(path = %failure.path, "{}", failure.error);
    }
    Err(NexusExportError::AssetFailures {
        count: summary.failures.len(),
    })
}
