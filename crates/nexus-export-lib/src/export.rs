use crate::client::NexusClient;
use crate::download::{DownloadOptions, VerificationOutcome, download_asset};
use crate::error::NexusExportError;
use crate::layout::{prepare_target_path, target_path};
use crate::listing::{AssetDescriptor, AssetPager};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do when a single asset cannot be downloaded or verified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the export at the first failing asset
    #[default]
    Abort,
    /// Record the failure and carry on with the remaining assets
    Skip,
}

#[derive(Clone, Copy, Debug)]
pub struct ExportOptions {
    pub verify: bool,
    /// Skip assets already present on disk with the declared size
    pub mirror: bool,
    pub failure_policy: FailurePolicy,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            verify: true,
            mirror: false,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

#[derive(Debug)]
pub struct AssetFailure {
    pub path: String,
    pub error: NexusExportError,
}

#[derive(Debug, Default)]
pub struct ExportSummary {
    pub pages: usize,
    pub assets: usize,
    pub downloaded: usize,
    pub verified: usize,
    pub unverified: usize,
    pub skipped: usize,
    pub failures: Vec<AssetFailure>,
}

impl ExportSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

enum AssetResult {
    Downloaded(VerificationOutcome),
    AlreadyMirrored,
}

/// Downloads every asset of `repository` below `output_dir`, one page and one asset at a time.
///
/// Listing errors always end the export. Per-asset errors end it under
/// [`FailurePolicy::Abort`] and are collected in the summary under
/// [`FailurePolicy::Skip`].
pub async fn export_repository(
    client: &NexusClient,
    repository: &str,
    output_dir: &Path,
    options: ExportOptions,
) -> Result<ExportSummary, NexusExportError> {
    tracing::info!(
        repository,
        server = %client.base_url(),
        output = %output_dir.display(),
        verify = options.verify,
        mirror = options.mirror,
        "Exporting repository"
    );

    let mut pages = std::pin::pin!(AssetPager::new(client, repository).into_pages());
    let mut summary = ExportSummary::default();

    while let Some(page) = pages.try_next().await? {
        summary.pages += 1;
        tracing::info!(
            page = summary.pages,
            assets = page.assets.len(),
            "Fetched asset listing page"
        );

        for asset in page.assets {
            summary.assets += 1;
            match export_asset(client, &asset, output_dir, options).await {
                Ok(AssetResult::Downloaded(verification)) => {
                    summary.downloaded += 1;
                    match verification {
                        VerificationOutcome::Verified => {
                            summary.verified += 1;
                            tracing::info!(path = %asset.path, "Downloaded and verified");
                        }
                        VerificationOutcome::NoChecksumDeclared => {
                            summary.unverified += 1;
                            tracing::info!(path = %asset.path, "Downloaded (no checksum declared)");
                        }
                        VerificationOutcome::Disabled => {
                            summary.unverified += 1;
                            tracing::info!(path = %asset.path, "Downloaded (not verified)");
                        }
                    }
                }
                Ok(AssetResult::AlreadyMirrored) => {
                    summary.skipped += 1;
                    tracing::debug!(path = %asset.path, "Already present with declared size, skipping");
                }
                Err(err) if err.is_per_asset() && options.failure_policy == FailurePolicy::Skip => {
                    tracing::warn!(path = %asset.path, "Export failed, continuing: {}", err);
                    summary.failures.push(AssetFailure {
                        path: asset.path,
                        error: err,
                    });
                }
                Err(err) => {
                    tracing::error!(path = %asset.path, "Export failed: {}", err);
                    return Err(err);
                }
            }
        }
    }

    tracing::info!(
        pages = summary.pages,
        assets = summary.assets,
        downloaded = summary.downloaded,
        verified = summary.verified,
        unverified = summary.unverified,
        skipped = summary.skipped,
        failed = summary.failures.len(),
        "Export finished"
    );

    Ok(summary)
}

async fn export_asset(
    client: &NexusClient,
    asset: &AssetDescriptor,
    output_dir: &Path,
    options: ExportOptions,
) -> Result<AssetResult, NexusExportError> {
    if options.mirror && is_already_mirrored(&target_path(output_dir, &asset.path)?, asset).await {
        return Ok(AssetResult::AlreadyMirrored);
    }

    let target = prepare_target_path(output_dir, &asset.path)?;
    let outcome = download_asset(
        client,
        asset,
        &target,
        DownloadOptions {
            verify: options.verify,
        },
    )
    .await?;

    Ok(AssetResult::Downloaded(outcome.verification))
}

async fn is_already_mirrored(target: &Path, asset: &AssetDescriptor) -> bool {
    let Some(expected_size) = asset.size else {
        return false;
    };
    match tokio::fs::metadata(target).await {
        Ok(metadata) => metadata.is_file() && metadata.len() == expected_size,
        Err(_) => false,
    }
}
