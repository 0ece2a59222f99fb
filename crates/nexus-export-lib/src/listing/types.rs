use crate::error::NexusExportError;
use crate::verification::parse_sha1_hex;
use serde::Deserialize;
use url::Url;

/// One asset as reported by the listing endpoint, validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetDescriptor {
    /// Repository-relative path, exactly as reported by the server
    pub path: String,
    pub download_url: Url,
    /// Declared SHA-1, raw bytes
    pub sha1: Option<Vec<u8>>,
    /// Declared size in bytes
    pub size: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct AssetPage {
    pub assets: Vec<AssetDescriptor>,
    pub continuation_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetPageSchema {
    items: Vec<AssetSchema>,
    #[serde(default)]
    continuation_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetSchema {
    path: String,
    download_url: String,
    #[serde(default)]
    checksum: Option<ChecksumSchema>,
    #[serde(default)]
    file_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ChecksumSchema {
    #[serde(default)]
    sha1: Option<String>,
}

impl AssetPage {
    /// Parses a listing response body. Relative download URLs are resolved against `base_url`.
    pub fn parse(body: &[u8], base_url: &Url, request_url: &str) -> Result<Self, NexusExportError> {
        let schema: AssetPageSchema =
            serde_json::from_slice(body).map_err(|source| NexusExportError::ListingParse {
                url: request_url.to_string(),
                source,
            })?;

        let assets = schema
            .items
            .into_iter()
            .map(|item| item.into_descriptor(base_url))
            .collect::<Result<Vec<_>, _>>()?;

        let continuation_token = schema
            .continuation_token
            .filter(|token| !token.is_empty());

        Ok(Self {
            assets,
            continuation_token,
        })
    }

    pub fn is_last(&self) -> bool {
        self.continuation_token.is_none()
    }
}

impl AssetSchema {
    fn into_descriptor(self, base_url: &Url) -> Result<AssetDescriptor, NexusExportError> {
        let download_url =
            base_url
                .join(&self.download_url)
                .map_err(|e| NexusExportError::InvalidAsset {
                    path: self.path.clone(),
                    reason: format!("invalid download URL {:?}: {}", self.download_url, e),
                })?;

        // Some formats report an empty sha1 for assets without a stored checksum.
        let declared_sha1 = self
            .checksum
            .and_then(|checksum| checksum.sha1)
            .filter(|hex_digest| !hex_digest.trim().is_empty());
        let sha1 = match declared_sha1 {
            Some(hex_digest) => Some(parse_sha1_hex(&hex_digest).map_err(|reason| {
                NexusExportError::InvalidAsset {
                    path: self.path.clone(),
                    reason,
                }
            })?),
            None => None,
        };

        Ok(AssetDescriptor {
            path: self.path,
            download_url,
            sha1,
            size: self.file_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST_URL: &str = "http://nexus.local/service/rest/v1/assets?repository=demo";

    fn base() -> Url {
        Url::parse("http://nexus.local/").unwrap()
    }

    #[test]
    fn test_parse_full_page() {
        let body = br#"{
            "items": [{
                "downloadUrl": "http://nexus.local/repository/demo/a/1.jar",
                "path": "a/1.jar",
                "id": "ZGVtbzo...",
                "repository": "demo",
                "format": "maven2",
                "checksum": {
                    "sha1": "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed",
                    "md5": "5eb63bbbe01eeed093cb22bb8f5acdc3"
                },
                "fileSize": 11
            }],
            "continuationToken": "88491cd1d185dd1362b1e6e4b0a1a2b9"
        }"#;

        let page = AssetPage::parse(body, &base(), REQUEST_URL).unwrap();
        assert_eq!(page.assets.len(), 1);
        assert!(!page.is_last());

        let asset = &page.assets[0];
        assert_eq!(asset.path, "a/1.jar");
        assert_eq!(
            asset.download_url.as_str(),
            "http://nexus.local/repository/demo/a/1.jar"
        );
        assert_eq!(
            asset.sha1.as_deref().map(hex::encode).as_deref(),
            Some("2aae6c35c94fcfb415dbe95f408b9ce91ee846ed")
        );
        assert_eq!(asset.size, Some(11));
    }

    #[test]
    fn test_parse_treats_null_and_empty_token_as_last_page() {
        let null_token = br#"{"items": [], "continuationToken": null}"#;
        assert!(AssetPage::parse(null_token, &base(), REQUEST_URL).unwrap().is_last());

        let empty_token = br#"{"items": [], "continuationToken": ""}"#;
        assert!(AssetPage::parse(empty_token, &base(), REQUEST_URL).unwrap().is_last());

        let absent_token = br#"{"items": []}"#;
        assert!(AssetPage::parse(absent_token, &base(), REQUEST_URL).unwrap().is_last());
    }

    #[test]
    fn test_parse_optional_checksum_and_size() {
        let body = br#"{"items": [{"path": "/x.pom", "downloadUrl": "repository/demo/x.pom"}]}"#;
        let page = AssetPage::parse(body, &base(), REQUEST_URL).unwrap();

        let asset = &page.assets[0];
        assert_eq!(asset.sha1, None);
        assert_eq!(asset.size, None);
        assert_eq!(
            asset.download_url.as_str(),
            "http://nexus.local/repository/demo/x.pom"
        );
    }

    #[test]
    fn test_parse_treats_empty_sha1_as_undeclared() {
        let body = br#"{"items": [
            {"path": "a", "downloadUrl": "repository/demo/a", "checksum": {"sha1": ""}},
            {"path": "b", "downloadUrl": "repository/demo/b", "checksum": {"sha1": "  "}},
            {"path": "c", "downloadUrl": "repository/demo/c", "checksum": {"sha1": null}}
        ]}"#;
        let page = AssetPage::parse(body, &base(), REQUEST_URL).unwrap();

        assert_eq!(page.assets.len(), 3);
        assert!(page.assets.iter().all(|asset| asset.sha1.is_none()));
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        let body = br#"{"items": [{"path": "a/1.jar"}], "continuationToken": null}"#;
        let err = AssetPage::parse(body, &base(), REQUEST_URL).unwrap_err();
        assert!(matches!(err, NexusExportError::ListingParse { .. }), "{err}");
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = AssetPage::parse(b"<html>login</html>", &base(), REQUEST_URL).unwrap_err();
        assert!(matches!(err, NexusExportError::ListingParse { .. }), "{err}");
    }

    #[test]
    fn test_parse_rejects_malformed_sha1() {
        let body = br#"{"items": [{
            "path": "a/1.jar",
            "downloadUrl": "http://nexus.local/repository/demo/a/1.jar",
            "checksum": {"sha1": "zz"}
        }]}"#;
        let err = AssetPage::parse(body, &base(), REQUEST_URL).unwrap_err();
        match err {
            NexusExportError::InvalidAsset { path, .. } => assert_eq!(path, "a/1.jar"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
