use crate::error::NexusExportError;
use reqwest::{Client, RequestBuilder};
use std::fmt;
use url::Url;

const USER_AGENT: &str = concat!("nexus-export/", env!("CARGO_PKG_VERSION"));

/// HTTP Basic Auth credentials.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ClientOptions {
    /// Accept invalid TLS certificates.
    pub insecure: bool,
}

/// Session against one Nexus server, shared by the listing and download stages.
#[derive(Debug)]
pub struct NexusClient {
    http: Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl NexusClient {
    pub fn new(
        server: &str,
        credentials: Option<Credentials>,
        options: ClientOptions,
    ) -> Result<Self, NexusExportError> {
        let base_url = normalize_server_url(server)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(options.insecure)
            .build()?;

        tracing::debug!(base_url = %base_url, authenticated = credentials.is_some(), "Created Nexus client");

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves `reference` against the server base URL. Absolute URLs are returned unchanged.
    pub fn resolve(&self, reference: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(reference)
    }

    pub fn get(&self, url: Url) -> RequestBuilder {
        let request = self.http.get(url);
        match &self.credentials {
            Some(credentials) => {
                request.basic_auth(&credentials.username, Some(&credentials.password))
            }
            None => request,
        }
    }
}

/// Adds a default `http://` scheme and a trailing slash so endpoint paths join below any context path.
pub fn normalize_server_url(server: &str) -> Result<Url, NexusExportError> {
    let server = server.trim();
    if server.is_empty() {
        return Err(NexusExportError::InvalidServerUrl {
            url: server.to_string(),
            reason: "server URL must not be empty".to_string(),
        });
    }

    let mut with_scheme = if server.contains("://") {
        server.to_string()
    } else {
        format!("http://{server}")
    };
    if !with_scheme.ends_with('/') {
        with_scheme.push('/');
    }

    let url = Url::parse(&with_scheme).map_err(|e| NexusExportError::InvalidServerUrl {
        url: server.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(NexusExportError::InvalidServerUrl {
            url: server.to_string(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}
