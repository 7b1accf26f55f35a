use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use thiserror::Error;

use crate::models::settings::{AppSettings, ProxySettings};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/133.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct StreamResponse {
    pub status: u16,
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
    pub body: BoxStream<'static, Result<Bytes, TransportError>>,
}

impl StreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The two HTTP shapes the app needs: a form POST for lookups and a
/// streamed GET for media.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_form(&self, url: &str, body: String) -> Result<HttpResponse, TransportError>;
    async fn get_stream(&self, url: &str) -> Result<StreamResponse, TransportError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
    request_timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(settings: &AppSettings) -> Self {
        let timeout = Duration::from_secs(settings.lookup.timeout_secs.max(1));
        let builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(timeout);
        let client = apply_proxy(builder, &settings.proxy)
            .build()
            .unwrap_or_default();

        Self {
            client,
            request_timeout: timeout,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_form(&self, url: &str, body: String) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.request_timeout)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }

    async fn get_stream(&self, url: &str) -> Result<StreamResponse, TransportError> {
        let response = self.client.get(url).send().await?;

        let status = response.status().as_u16();
        let content_length = response.content_length();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(TransportError::from))
            .boxed();

        Ok(StreamResponse {
            status,
            content_length,
            content_type,
            body,
        })
    }
}

pub fn apply_proxy(
    builder: reqwest::ClientBuilder,
    proxy: &ProxySettings,
) -> reqwest::ClientBuilder {
    match build_proxy(proxy) {
        Some(p) => builder.proxy(p),
        None => builder,
    }
}

fn build_proxy(proxy: &ProxySettings) -> Option<reqwest::Proxy> {
    let proxy_url = proxy.url()?;
    match reqwest::Proxy::all(&proxy_url) {
        Ok(p) => Some(p),
        Err(e) => {
            tracing::warn!("Invalid proxy URL: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn transport() -> ReqwestTransport {
        ReqwestTransport {
            client: reqwest::Client::builder()
                .no_proxy()
                .build()
                .unwrap(),
            request_timeout: Duration::from_secs(5),
        }
    }

    /// Accepts one connection, answers it with `response` and returns the raw
    /// request it read.
    async fn serve_once(response: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}/media", addr), handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request).to_ascii_lowercase();
        let Some(head_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let body_len = text[..head_end]
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= head_end + 4 + body_len
    }

    async fn collect_body(response: StreamResponse) -> Vec<u8> {
        let mut body = response.body;
        let mut out = Vec::new();
        while let Some(chunk) = body.next().await {
            out.extend_from_slice(&chunk.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn stream_reports_declared_length() {
        let (url, server) = serve_once(
            concat!(
                "HTTP/1.1 200 OK\r\n",
                "Content-Type: video/mp4\r\n",
                "Content-Length: 5\r\n",
                "Connection: close\r\n",
                "\r\n",
                "hello",
            ),
        )
        .await;

        let response = transport().get_stream(&url).await.unwrap();
        assert_eq!(response.status, 200);
        assert!(response.is_success());
        assert_eq!(response.content_length, Some(5));
        assert_eq!(response.content_type.as_deref(), Some("video/mp4"));
        assert_eq!(collect_body(response).await, b"hello");

        assert!(server.await.unwrap().starts_with("GET /media HTTP/1.1"));
    }

    #[tokio::test]
    async fn chunked_stream_has_no_length() {
        let (url, _server) = serve_once(
            concat!(
                "HTTP/1.1 200 OK\r\n",
                "Content-Type: video/mp4\r\n",
                "Transfer-Encoding: chunked\r\n",
                "Connection: close\r\n",
                "\r\n",
                "3\r\n",
                "abc\r\n",
                "2\r\n",
                "de\r\n",
                "0\r\n",
                "\r\n",
            ),
        )
        .await;

        let response = transport().get_stream(&url).await.unwrap();
        assert_eq!(response.content_length, None);
        assert_eq!(collect_body(response).await, b"abcde");
    }

    #[tokio::test]
    async fn stream_passes_html_content_type_through() {
        let (url, _server) = serve_once(
            concat!(
                "HTTP/1.1 200 OK\r\n",
                "Content-Type: text/html; charset=utf-8\r\n",
                "Content-Length: 6\r\n",
                "Connection: close\r\n",
                "\r\n",
                "<html>",
            ),
        )
        .await;

        let response = transport().get_stream(&url).await.unwrap();
        assert_eq!(
            response.content_type.as_deref(),
            Some("text/html; charset=utf-8")
        );
    }

    #[tokio::test]
    async fn stream_passes_error_status_through() {
        let (url, _server) = serve_once(
            concat!(
                "HTTP/1.1 404 Not Found\r\n",
                "Content-Length: 0\r\n",
                "Connection: close\r\n",
                "\r\n",
            ),
        )
        .await;

        let response = transport().get_stream(&url).await.unwrap();
        assert_eq!(response.status, 404);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn post_form_sends_urlencoded_body() {
        let (url, server) = serve_once(
            concat!(
                "HTTP/1.1 200 OK\r\n",
                "Content-Type: application/json\r\n",
                "Content-Length: 10\r\n",
                "Connection: close\r\n",
                "\r\n",
                "{\"code\":0}",
            ),
        )
        .await;

        let response = transport()
            .post_form(&url, "url=https%3A%2F%2Fvm.tiktok.com%2FZM1%2F&hd=1".to_string())
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "{\"code\":0}");

        let request = server.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /media HTTP/1.1"));
        assert!(lower.contains("content-type: application/x-www-form-urlencoded"));
        assert!(lower.contains("accept: application/json"));
        assert!(request.ends_with("\r\n\r\nurl=https%3A%2F%2Fvm.tiktok.com%2FZM1%2F&hd=1"));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = transport().get_stream(&format!("http://{}/media", addr)).await;
        assert!(result.is_err());
    }

    fn proxy(host: &str) -> ProxySettings {
        ProxySettings {
            enabled: true,
            proxy_type: "http".into(),
            host: host.into(),
            port: 8080,
            username: String::new(),
            password: String::new(),
        }
    }

    #[test]
    fn disabled_proxy_is_skipped() {
        let mut settings = proxy("127.0.0.1");
        settings.enabled = false;
        assert!(build_proxy(&settings).is_none());
    }

    #[test]
    fn valid_proxy_is_applied() {
        assert!(build_proxy(&proxy("127.0.0.1")).is_some());
    }

    #[test]
    fn invalid_proxy_url_is_ignored() {
        let settings = proxy("not a host");
        assert!(build_proxy(&settings).is_none());
        assert!(apply_proxy(reqwest::Client::builder(), &settings)
            .build()
            .is_ok());
    }
}
