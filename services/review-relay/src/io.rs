//! HTTP client abstraction for testability

use async_trait::async_trait;

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    /// Final request URL, including the query string
    pub url: String,
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request with the given headers and query parameters
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> crate::Result<HttpResponse>;

    /// Send a POST request with a JSON body
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Scheme and host of `url`, safe to log when the path carries a token
fn log_target(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) => format!(
            "{}://{}",
            parsed.scheme(),
            parsed.host_str().unwrap_or_default()
        ),
        Err(_) => "<invalid url>".to_string(),
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &[(&str, &str)],
    ) -> crate::Result<HttpResponse> {
        let target = log_target(url);
        let url = reqwest::Url::parse_with_params(url, query)
            .map_err(|e| crate::RelayError::Http(format!("Invalid URL {}: {}", target, e)))?;

        tracing::debug!("GET {}", url);
        let mut request = self.client.get(url.clone());
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send()
            .await
            .map_err(|e| crate::RelayError::Http(format!("GET {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| crate::RelayError::Http(format!("Reading response body: {}", e)))?;

        tracing::debug!("GET {} -> {} ({} bytes)", final_url, status, body.len());
        Ok(HttpResponse {
            status,
            body,
            url: final_url,
        })
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> crate::Result<HttpResponse> {
        let target = log_target(url);
        tracing::debug!("POST {}", target);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                crate::RelayError::Http(format!("POST {} failed: {}", target, e.without_url()))
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            crate::RelayError::Http(format!("Reading response body: {}", e.without_url()))
        })?;

        tracing::debug!("POST {} -> {} ({} bytes)", target, status, body.len());
        Ok(HttpResponse {
            status,
            body,
            url: target,
        })
    }
}
