/// 题库 API 客户端
///
/// 封装所有与题库 HTTP API 相关的调用逻辑
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::clients::store::QuestionStore;
use crate::config::Config;
use crate::error::TransportError;
use crate::models::RemoteRecord;

/// 题库 API 客户端
pub struct StoreClient {
    http: Client,
    base_url: String,
}

impl StoreClient {
    /// 创建新的题库客户端
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("无法创建 HTTP 客户端")?;

        Ok(Self::with_client(http, &config.api_base_url))
    }

    /// 使用已有的 HTTP 客户端
    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 拼接接口地址
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// 发送请求并解析 JSON 响应
    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: String,
        request: RequestBuilder,
    ) -> Result<T, TransportError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| {
                warn!("题库请求失败 ({}): {}", endpoint, source);
                TransportError::RequestFailed {
                    endpoint: endpoint.clone(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("题库返回状态码 {} ({})", status, endpoint);
            return Err(TransportError::BadStatus {
                endpoint,
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| TransportError::InvalidBody { endpoint, source })
    }
}

#[async_trait]
impl QuestionStore for StoreClient {
    async fn search(&self, key: &str) -> Result<Vec<RemoteRecord>, TransportError> {
        let endpoint = self.endpoint("search");
        debug!("搜索题目，题干长度: {} 字符", key.chars().count());

        let request = self.http.get(&endpoint).query(&[("q", key)]);
        let records: Vec<RemoteRecord> = self.send_json(endpoint, request).await?;

        debug!("题库返回 {} 条记录", records.len());
        Ok(records)
    }

    async fn create(&self, draft: &RemoteRecord) -> Result<RemoteRecord, TransportError> {
        let endpoint = self.endpoint("");
        debug!("新建题目: {}", draft);

        let request = self.http.post(&endpoint).json(draft);
        self.send_json(endpoint, request).await
    }

    async fn update(&self, id: i64, draft: &RemoteRecord) -> Result<RemoteRecord, TransportError> {
        let endpoint = self.endpoint(&format!("question/{}", id));
        debug!("更新题目 #{}: {}", id, draft);

        let request = self.http.put(&endpoint).json(draft);
        self.send_json(endpoint, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// 启动只响应一次的本地 HTTP 服务，返回地址和收到的完整请求（含请求体）
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                if let Some(head_end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..head_end]).to_lowercase();
                    let content_length = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&request).to_string());
        });

        (format!("http://{}/", addr), rx)
    }

    fn request_line(request: &str) -> &str {
        request.lines().next().unwrap_or_default()
    }

    fn request_body(request: &str) -> serde_json::Value {
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    fn draft() -> RemoteRecord {
        RemoteRecord {
            id: 0,
            question_type: Some("MR".to_string()),
            question_text: "Какие буквы?".to_string(),
            answers: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            correct_answers: ["B".to_string(), "C".to_string()].into_iter().collect(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_endpoint_joins_single_slash() {
        let client = StoreClient::with_client(Client::new(), "https://pse.aedb.online/");
        assert_eq!(client.endpoint("search"), "https://pse.aedb.online/search");
        assert_eq!(client.endpoint(""), "https://pse.aedb.online/");
        assert_eq!(client.endpoint("question/5"), "https://pse.aedb.online/question/5");
    }

    #[tokio::test]
    async fn test_search_parses_records_and_encodes_key() {
        let body = r#"[{"id": 3, "question_type": "MR", "question_text": "Какие буквы?", "answers": ["A","B","C"], "correct_answers": ["B","C"], "created_at": "2024-05-01T10:00:00", "updated_at": "2024-05-01T10:00:00"}]"#;
        let (base_url, request) = serve_once("HTTP/1.1 200 OK", body).await;
        let client = StoreClient::with_client(Client::new(), &base_url);

        let records = client.search("Какие буквы?").await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 3);
        assert_eq!(records[0].correct_answers.len(), 2);

        let request = request.await.unwrap();
        let line = request_line(&request);
        assert!(line.starts_with("GET /search?q="));
        // 题干中的空格已编码，请求行只有三段
        assert_eq!(line.split(' ').count(), 3);
    }

    #[tokio::test]
    async fn test_create_posts_draft_to_base() {
        let body = r#"{"id": 11, "question_type": "MR", "question_text": "Какие буквы?", "answers": ["A","B","C"], "correct_answers": ["B","C"]}"#;
        let (base_url, request) = serve_once("HTTP/1.1 201 Created", body).await;
        let client = StoreClient::with_client(Client::new(), &base_url);

        let created = client.create(&draft()).await.unwrap();
        assert_eq!(created.id, 11);

        let request = request.await.unwrap();
        assert!(request_line(&request).starts_with("POST / "));
        let sent = request_body(&request);
        assert_eq!(sent["question_type"], "MR");
        assert_eq!(sent["question_text"], "Какие буквы?");
        assert_eq!(sent["answers"], serde_json::json!(["A", "B", "C"]));
        assert_eq!(sent["correct_answers"], serde_json::json!(["B", "C"]));
    }

    #[tokio::test]
    async fn test_update_puts_draft_by_id() {
        let body = r#"{"id": 5, "question_type": "MR", "question_text": "Какие буквы?", "answers": ["A","B","C"], "correct_answers": ["B","C"]}"#;
        let (base_url, request) = serve_once("HTTP/1.1 200 OK", body).await;
        let client = StoreClient::with_client(Client::new(), &base_url);

        let updated = client.update(5, &draft()).await.unwrap();
        assert_eq!(updated.id, 5);

        let request = request.await.unwrap();
        assert!(request_line(&request).starts_with("PUT /question/5 "));
        let sent = request_body(&request);
        assert_eq!(sent["correct_answers"], serde_json::json!(["B", "C"]));
        assert!(sent.get("questionText").is_none());
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let (base_url, _request) =
            serve_once("HTTP/1.1 500 Internal Server Error", "{}").await;
        let client = StoreClient::with_client(Client::new(), &base_url);

        let err = client.search("Q").await.unwrap_err();

        assert!(matches!(err, TransportError::BadStatus { status: 500, .. }));
        assert!(err.endpoint().ends_with("/search"));
    }

    #[tokio::test]
    async fn test_unreachable_store_is_request_failed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = StoreClient::with_client(Client::new(), &format!("http://{}/", addr));

        let err = client.search("Q").await.unwrap_err();
        assert!(matches!(err, TransportError::RequestFailed { .. }));
    }
}
