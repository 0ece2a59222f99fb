use super::types::{AssetDescriptor, AssetPage};
use crate::client::NexusClient;
use crate::error::NexusExportError;
use futures::stream::{self, Stream, TryStreamExt};
use url::Url;

pub const ASSETS_ENDPOINT: &str = "service/rest/v1/assets";

#[derive(Debug)]
enum PagerState {
    Start,
    Continue(String),
    Exhausted,
}

/// Walks the paginated asset listing of one repository, one request per page.
#[derive(Debug)]
pub struct AssetPager<'a> {
    client: &'a NexusClient,
    repository: String,
    state: PagerState,
    requests_issued: usize,
}

impl<'a> AssetPager<'a> {
    pub fn new(client: &'a NexusClient, repository: impl Into<String>) -> Self {
        Self {
            client,
            repository: repository.into(),
            state: PagerState::Start,
            requests_issued: 0,
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn requests_issued(&self) -> usize {
        self.requests_issued
    }

    pub fn page_url(&self, continuation_token: Option<&str>) -> Result<Url, NexusExportError> {
        let mut url = self.client.resolve(ASSETS_ENDPOINT).map_err(|e| {
            NexusExportError::InvalidServerUrl {
                url: self.client.base_url().to_string(),
                reason: e.to_string(),
            }
        })?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("repository", &self.repository);
            if let Some(token) = continuation_token {
                query.append_pair("continuationToken", token);
            }
        }
        Ok(url)
    }

    /// Fetches the next page, or `None` once the server stopped handing out continuation tokens.
    pub async fn next_page(&mut self) -> Result<Option<AssetPage>, NexusExportError> {
        // A failed request leaves the pager exhausted; listings restart from scratch.
        let token = match std::mem::replace(&mut self.state, PagerState::Exhausted) {
            PagerState::Exhausted => return Ok(None),
            PagerState::Start => None,
            PagerState::Continue(token) => Some(token),
        };

        let url = self.page_url(token.as_deref())?;
        tracing::debug!(url = %url, repository = %self.repository, "Requesting asset listing page");

        self.requests_issued += 1;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| NexusExportError::Listing {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NexusExportError::ListingStatus {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| NexusExportError::Listing {
                url: url.to_string(),
                source,
            })?;

        let page = AssetPage::parse(&body, self.client.base_url(), url.as_str())?;
        tracing::debug!(
            repository = %self.repository,
            page = self.requests_issued,
            assets = page.assets.len(),
            last = page.is_last(),
            "Received asset listing page"
        );

        if let Some(token) = &page.continuation_token {
            self.state = PagerState::Continue(token.clone());
        }
        Ok(Some(page))
    }

    /// Lazy stream of listing pages. Each page is requested when polled.
    pub fn into_pages(self) -> impl Stream<Item = Result<AssetPage, NexusExportError>> + 'a {
        stream::try_unfold(self, |mut pager| async move {
            let next = pager.next_page().await?;
            Ok::<_, NexusExportError>(next.map(|page| (page, pager)))
        })
    }

    /// Flattens the listing into a lazy stream of descriptors.
    pub fn into_stream(self) -> impl Stream<Item = Result<AssetDescriptor, NexusExportError>> + 'a {
        self.into_pages()
            .map_ok(|page| stream::iter(page.assets.into_iter().map(Ok::<_, NexusExportError>)))
            .try_flatten()
    }
}
