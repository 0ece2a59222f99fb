use nexus_export_lib::cli::ExportCommand;
use serde_json::json;
use sha1::{Digest, Sha1};
use std::path::Path;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ASSETS_PATH: &str = "/service/rest/v1/assets";

pub fn sha1_hex(content: &[u8]) -> String {
    hex::encode(Sha1::digest(content))
}

/// An asset served by [`MockNexus`], with what the listing declares about it.
#[derive(Clone, Debug)]
pub struct MockAsset {
    pub path: String,
    pub content: Vec<u8>,
    pub declared_sha1: Option<String>,
    pub declared_size: Option<u64>,
}

impl MockAsset {
    pub fn new(path: &str, content: &[u8]) -> Self {
        Self {
            path: path.to_string(),
            content: content.to_vec(),
            declared_sha1: Some(sha1_hex(content)),
            declared_size: Some(content.len() as u64),
        }
    }

    pub fn with_declared_sha1(mut self, sha1: &str) -> Self {
        self.declared_sha1 = Some(sha1.to_string());
        self
    }

    pub fn without_size(mut self) -> Self {
        self.declared_size = None;
        self
    }
}

pub struct MockNexus {
    pub server: MockServer,
}

impl MockNexus {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    fn download_url(&self, repository: &str, asset_path: &str) -> String {
        format!(
            "{}/repository/{}/{}",
            self.uri(),
            repository,
            asset_path.trim_start_matches('/')
        )
    }

    /// Serves `pages` through the listing endpoint, chained with continuation tokens, plus every asset's content.
    pub async fn mount_repository(&self, repository: &str, pages: &[Vec<MockAsset>]) {
        for (index, page) in pages.iter().enumerate() {
            let items: Vec<_> = page
                .iter()
                .map(|asset| {
                    json!({
                        "downloadUrl": self.download_url(repository, &asset.path),
                        "path": asset.path,
                        "repository": repository,
                        "format": "maven2",
                        "checksum": { "sha1": asset.declared_sha1 },
                        "fileSize": asset.declared_size,
                    })
                })
                .collect();
            let next_token = (index + 1 < pages.len()).then(|| format!("page-{}", index + 1));

            let listing = Mock::given(method("GET"))
                .and(path(ASSETS_PATH))
                .and(query_param("repository", repository));
            let listing = if index == 0 {
                listing.and(query_param_is_missing("continuationToken"))
            } else {
                listing.and(query_param("continuationToken", format!("page-{index}")))
            };
            listing
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "items": items,
                    "continuationToken": next_token,
                })))
                .mount(&self.server)
                .await;

            for asset in page {
                Mock::given(method("GET"))
                    .and(path(format!(
                        "/repository/{}/{}",
                        repository,
                        asset.path.trim_start_matches('/')
                    )))
                    .respond_with(ResponseTemplate::new(200).set_body_bytes(asset.content.clone()))
                    .mount(&self.server)
                    .await;
            }
        }
    }

    pub async fn listing_requests(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == ASSETS_PATH)
            .count()
    }
}

pub fn export_command(server: &str, repository: &str, output_dir: &Path) -> ExportCommand {
    ExportCommand {
        server: server.to_string(),
        repository: repository.to_string(),
        output_dir: Some(output_dir.to_string_lossy().into_owned()),
        ..ExportCommand::default()
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::DEBUG.into())
                .from_env_lossy(),
        )
        .with_test_writer()
        .try_init();
}
