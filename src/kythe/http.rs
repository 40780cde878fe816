//! JSON-over-HTTP transport for the Kythe service.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Serialize};

use super::{
    CrossReferencesReply, CrossReferencesRequest, DecorationsReply, DecorationsRequest,
    SearchReply, SearchRequest, XrefService,
};
use crate::error::{Error, Result};

/// Posts each request as JSON to `<base>/<endpoint>`.
#[derive(Debug, Clone)]
pub struct HttpXrefService {
    client: Client,
    base: Url,
}

impl HttpXrefService {
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(&with_trailing_slash(base))
            .map_err(|e| Error::ServiceUnavailable(format!("invalid server url `{base}`: {e}")))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    async fn post<Req, Reply>(&self, endpoint: &str, request: &Req) -> Result<Reply>
    where
        Req: Serialize + Sync,
        Reply: DeserializeOwned,
    {
        let url = self
            .base
            .join(endpoint)
            .map_err(|e| Error::ServiceUnavailable(e.to_string()))?;
        tracing::debug!(%url, "kythe request");

        let response = self.client.post(url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::ServiceUnavailable(format!(
                "{endpoint} returned {status}"
            )));
        }
        Ok(response.json().await?)
    }
}

#[tower_lsp::async_trait]
impl XrefService for HttpXrefService {
    async fn search(&self, request: &SearchRequest) -> Result<SearchReply> {
        self.post("search", request).await
    }

    async fn decorations(&self, request: &DecorationsRequest) -> Result<DecorationsReply> {
        self.post("decorations", request).await
    }

    async fn cross_references(
        &self,
        request: &CrossReferencesRequest,
    ) -> Result<CrossReferencesReply> {
        self.post("xrefs", request).await
    }
}

fn with_trailing_slash(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalises_base_url() {
        let service = HttpXrefService::new("http://localhost:8081", Duration::from_secs(1)).unwrap();
        assert_eq!(service.base().as_str(), "http://localhost:8081/");
        assert_eq!(
            service.base().join("xrefs").unwrap().as_str(),
            "http://localhost:8081/xrefs"
        );
    }

    #[test]
    fn keeps_path_prefix() {
        let service =
            HttpXrefService::new("http://host/kythe/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            service.base().join("search").unwrap().as_str(),
            "http://host/kythe/search"
        );
    }

    #[test]
    fn rejects_invalid_url() {
        let err = HttpXrefService::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_unavailable() {
        let service =
            HttpXrefService::new("http://127.0.0.1:9/", Duration::from_millis(200)).unwrap();
        let err = service
            .search(&SearchRequest::file("a.java"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
    }
}
