//! HTTP client for the favorites endpoint

use crate::error::FavoritesError;
use crate::types::{DisplayItem, FavoriteRecord, LoadKind, LoadRequest};
use serde_json::{Map, Value};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct FavoritesClient {
    http: reqwest::Client,
    base_url: String,
}

impl FavoritesClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn favorites_url(&self, user_id: &str) -> String {
        format!("{}/favorites/{}", self.base_url.trim_end_matches('/'), user_id)
    }

    /// GET the user's favorites and turn them into display items
    pub async fn fetch(&self, user_id: &str) -> Result<Vec<DisplayItem>, FavoritesError> {
        let url = self.favorites_url(user_id);
        debug!(url = %url, user_id, "Fetching favorites");

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "Favorites response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Favorites request rejected");
            return Err(FavoritesError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&bytes)
            .map_err(|e| FavoritesError::Malformed(e.to_string()))?;
        let items = to_display_items(payload)?;

        info!(count = items.len(), "Favorites received");
        Ok(items)
    }

    /// `fetch` raced against a timeout and an abort token
    pub async fn fetch_with_timeout(
        &self,
        user_id: &str,
        timeout: Duration,
        token: &CancellationToken,
    ) -> Result<Vec<DisplayItem>, FavoritesError> {
        tokio::select! {
            _ = token.cancelled() => Err(FavoritesError::Aborted),
            _ = tokio::time::sleep(timeout) => {
                warn!(?timeout, "Favorites request timed out");
                Err(FavoritesError::Timeout(timeout))
            }
            result = self.fetch(user_id) => result,
        }
    }

    /// Perform a request issued by the screen. Only initial loads are
    /// bounded; retries wait as long as the server takes.
    pub async fn execute(
        &self,
        request: &LoadRequest,
        timeout: Duration,
        token: &CancellationToken,
    ) -> Result<Vec<DisplayItem>, FavoritesError> {
        match request.kind {
            LoadKind::Initial => self.fetch_with_timeout(&request.user_id, timeout, token).await,
            LoadKind::Retry => self.fetch(&request.user_id).await,
        }
    }
}

/// Validate the payload shape and project each record for display.
/// Only a non-array body is rejected; odd entries become cards without an id.
pub fn to_display_items(payload: Value) -> Result<Vec<DisplayItem>, FavoritesError> {
    let entries = match payload {
        Value::Array(entries) => entries,
        other => {
            warn!(kind = json_kind(&other), "Favorites payload is not an array");
            return Err(FavoritesError::Malformed(format!(
                "expected an array, got {}",
                json_kind(&other)
            )));
        }
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| match entry {
            Value::Object(fields) => DisplayItem::from(FavoriteRecord(fields)),
            other => {
                // Still gets a card, just without an id
                debug!(idx, kind = json_kind(&other), "Favorite entry is not an object");
                DisplayItem::from(FavoriteRecord(Map::new()))
            }
        })
        .collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::future::Future;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Start a mock backend on an ephemeral port. `respond` receives the
    /// zero-based request number and returns (status, body), or `None` to
    /// hold the connection open without answering.
    pub(crate) async fn start_backend<F, Fut>(respond: F) -> (SocketAddr, Arc<AtomicU32>)
    where
        F: Fn(u32) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<(u16, String)>> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicU32::new(0));
        let counter = hits.clone();
        let respond = Arc::new(respond);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let respond = respond.clone();
                let n = counter.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(read) => buf.extend_from_slice(&chunk[..read]),
                        }
                    }

                    match respond(n).await {
                        Some((status, body)) => {
                            let response = format!(
                                "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                                status,
                                body.len(),
                                body
                            );
                            let _ = socket.write_all(response.as_bytes()).await;
                            let _ = socket.shutdown().await;
                        }
                        None => {
                            tokio::time::sleep(Duration::from_secs(30)).await;
                        }
                    }
                });
            }
        });

        (addr, hits)
    }

    pub(crate) fn client_for(addr: SocketAddr) -> FavoritesClient {
        FavoritesClient::new(format!("http://{}/api", addr))
    }

    #[test]
    fn url_joins_base_and_user() {
        let client = FavoritesClient::new("http://example.test/api/");
        assert_eq!(
            client.favorites_url("user_1"),
            "http://example.test/api/favorites/user_1"
        );
    }

    #[test]
    fn array_of_objects_is_projected() {
        let items = to_display_items(json!([
            {"recipeId": "42", "title": "Soup"},
            {"recipeId": 7, "title": "Stew", "servings": 2},
        ]))
        .unwrap();

        assert_eq!(items.len(), 2);
        for item in &items {
            assert_eq!(item.get("id"), item.get("recipeId"));
        }
        assert_eq!(items[0].id, json!("42"));
        assert_eq!(items[0].get("title"), Some(&json!("Soup")));
        assert_eq!(items[1].id, json!(7));
        assert_eq!(items[1].get("servings"), Some(&json!(2)));
    }

    #[test]
    fn non_array_payloads_are_malformed() {
        for payload in [json!(null), json!({"recipeId": "1"}), json!("[]"), json!(3)] {
            assert!(matches!(
                to_display_items(payload),
                Err(FavoritesError::Malformed(_))
            ));
        }
    }

    #[test]
    fn non_object_entries_become_bare_items() {
        let items = to_display_items(json!([{"recipeId": "1", "title": "Soup"}, null, 5])).unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].id, json!("1"));
        assert_eq!(items[0].title(), "Soup");
        for item in &items[1..] {
            assert_eq!(item.id, Value::Null);
            assert_eq!(item.key(), None);
            assert!(item.fields.is_empty());
            assert_eq!(item.get("id"), Some(&Value::Null));
        }
    }

    #[test]
    fn empty_array_is_valid() {
        assert!(to_display_items(json!([])).unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_hits_user_endpoint() {
        let (addr, hits) = start_backend(|_| async {
            Some((200, r#"[{"recipeId":"42","title":"Soup"}]"#.to_string()))
        })
        .await;

        let items = client_for(addr).fetch("user_1").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, json!("42"));
        assert_eq!(items[0].title(), "Soup");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_success_status_includes_body() {
        let (addr, _) = start_backend(|_| async { Some((500, "database down".to_string())) }).await;

        let err = client_for(addr).fetch("user_1").await.unwrap_err();
        assert!(matches!(err, FavoritesError::Server { status: 500, .. }));
        assert_eq!(err.user_message(), "Server error: HTTP 500: database down");
    }

    #[tokio::test]
    async fn null_body_is_malformed() {
        let (addr, _) = start_backend(|_| async { Some((200, "null".to_string())) }).await;

        let err = client_for(addr).fetch("user_1").await.unwrap_err();
        assert!(matches!(err, FavoritesError::Malformed(_)));
        assert_eq!(err.user_message(), crate::constants::MSG_MALFORMED);
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let (addr, _) = start_backend(|_| async { Some((200, "<html>".to_string())) }).await;

        let err = client_for(addr).fetch("user_1").await.unwrap_err();
        assert!(matches!(err, FavoritesError::Malformed(_)));
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let (addr, _) = start_backend(|_| async { None::<(u16, String)> }).await;

        let err = client_for(addr)
            .fetch_with_timeout("user_1", Duration::from_millis(200), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, FavoritesError::Timeout(_)));
        assert!(err.user_message().starts_with("Request timed out"));
    }

    #[tokio::test]
    async fn cancelled_token_aborts() {
        let (addr, _) = start_backend(|_| async { None::<(u16, String)> }).await;
        let token = CancellationToken::new();
        token.cancel();

        let err = client_for(addr)
            .fetch_with_timeout("user_1", Duration::from_secs(10), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, FavoritesError::Aborted));
    }

    #[tokio::test]
    async fn refused_connection_is_connect_error() {
        // Bind then drop to get a port nothing listens on
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        let err = client_for(addr).fetch("user_1").await.unwrap_err();
        assert!(matches!(err, FavoritesError::Connect(_)));
    }
}
