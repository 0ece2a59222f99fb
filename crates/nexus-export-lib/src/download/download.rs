use super::types::{DownloadOptions, DownloadOutcome, VerificationOutcome};
use crate::client::NexusClient;
use crate::error::NexusExportError;
use crate::listing::AssetDescriptor;
use crate::verification::{ContentDigestVerifier, VerificationError};
use futures::StreamExt;
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};

const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Streams one asset to `target`, hashing it on the way when verification is enabled.
///
/// The parent directory of `target` must already exist. An existing file is
/// overwritten. On a verification failure the written file stays on disk.
pub async fn download_asset(
    client: &NexusClient,
    asset: &AssetDescriptor,
    target: &Path,
    options: DownloadOptions,
) -> Result<DownloadOutcome, NexusExportError> {
    let url = &asset.download_url;
    let download_error = |reason: String| NexusExportError::AssetDownload {
        url: url.to_string(),
        reason,
    };
    let filesystem_error = |source: std::io::Error| NexusExportError::Filesystem {
        path: target.to_path_buf(),
        source,
    };

    tracing::debug!(url = %url, output = %target.display(), "Downloading");

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| download_error(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(download_error(format!("server returned HTTP {status}")));
    }

    let mut verifier = match (&asset.sha1, options.verify) {
        (Some(expected), true) => Some(ContentDigestVerifier::new(expected.clone())),
        _ => None,
    };

    let file = tokio::fs::File::create(target)
        .await
        .map_err(filesystem_error)?;
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);

    let mut stream = response.bytes_stream();
    let mut bytes_written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| download_error(e.to_string()))?;

        if let Some(verifier) = verifier.as_mut() {
            verifier.update(&chunk);
        }
        writer.write_all(&chunk).await.map_err(filesystem_error)?;
        bytes_written += chunk.len() as u64;
    }

    writer.flush().await.map_err(filesystem_error)?;

    if !options.verify {
        return Ok(DownloadOutcome {
            bytes_written,
            verification: VerificationOutcome::Disabled,
        });
    }

    let verification_error = |source: VerificationError| NexusExportError::Verification {
        path: target.to_path_buf(),
        source,
    };

    match asset.size {
        Some(expected) if expected != bytes_written => {
            return Err(verification_error(VerificationError::SizeMismatch {
                expected,
                actual: bytes_written,
            }));
        }
        _ => {}
    }

    let verification = match verifier {
        Some(verifier) => {
            verifier.verify().map_err(verification_error)?;
            VerificationOutcome::Verified
        }
        None => VerificationOutcome::NoChecksumDeclared,
    };

    Ok(DownloadOutcome {
        bytes_written,
        verification,
    })
}
