//! Favorites screen controller
//!
//! Owns the loading/error/ready state and decides which requests go out.
//! It does no IO itself: callers run the returned `LoadRequest` and feed
//! the outcome back through `complete`.

use crate::constants::MSG_RETRY_FAILED;
use crate::error::FavoritesError;
use crate::session::AuthProvider;
use crate::types::*;
use tracing::{debug, error, info};

pub struct FavoritesScreen {
    state: ScreenState,
    alert: Option<Alert>,
    confirm_sign_out: bool,
}

impl Default for FavoritesScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl FavoritesScreen {
    pub fn new() -> Self {
        Self {
            state: ScreenState::Loading,
            alert: None,
            confirm_sign_out: false,
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Enter the screen for `user_id`. Without a user there is nothing to
    /// fetch, so the screen settles on an empty list right away.
    pub fn mount(&mut self, user_id: Option<&str>) -> Option<LoadRequest> {
        self.alert = None;
        self.confirm_sign_out = false;
        self.begin(LoadKind::Initial, user_id)
    }

    /// "Try Again"
    pub fn retry(&mut self, user_id: Option<&str>) -> Option<LoadRequest> {
        self.begin(LoadKind::Retry, user_id)
    }

    fn begin(&mut self, kind: LoadKind, user_id: Option<&str>) -> Option<LoadRequest> {
        match user_id.filter(|id| !id.is_empty()) {
            Some(id) => {
                debug!(?kind, user_id = id, "Loading favorites");
                self.state = ScreenState::Loading;
                Some(LoadRequest {
                    kind,
                    user_id: id.to_string(),
                })
            }
            None => {
                debug!("No user ID available");
                self.state = ScreenState::Ready(Vec::new());
                None
            }
        }
    }

    /// Apply a finished request. Whatever completes last wins; there is no
    /// check that `kind` matches the most recent request.
    pub fn complete(&mut self, kind: LoadKind, result: Result<Vec<DisplayItem>, FavoritesError>) {
        match result {
            Ok(items) => {
                info!(count = items.len(), "Favorites loaded");
                self.state = ScreenState::Ready(items);
            }
            Err(e) => match kind {
                LoadKind::Initial => {
                    error!(error = %e, "Error loading favorites");
                    let message = e.user_message();
                    self.alert = Some(Alert::error(message.clone()));
                    self.state = ScreenState::Error(message);
                }
                LoadKind::Retry => {
                    error!(error = %e, "Retry failed");
                    self.state = ScreenState::Error(MSG_RETRY_FAILED.to_string());
                }
            },
        }
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn is_confirming_sign_out(&self) -> bool {
        self.confirm_sign_out
    }

    pub fn request_sign_out(&mut self) {
        self.confirm_sign_out = true;
    }

    pub fn cancel_sign_out(&mut self) {
        self.confirm_sign_out = false;
    }

    pub fn confirm_sign_out(&mut self, auth: &mut dyn AuthProvider) {
        self.confirm_sign_out = false;
        auth.sign_out();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{client_for, start_backend};
    use crate::api::to_display_items;
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    struct FakeAuth(Option<String>);

    impl AuthProvider for FakeAuth {
        fn user_id(&self) -> Option<&str> {
            self.0.as_deref()
        }
        fn sign_in(&mut self, user_id: &str) {
            self.0 = Some(user_id.to_string());
        }
        fn sign_out(&mut self) {
            self.0 = None;
        }
    }

    fn soup() -> Vec<DisplayItem> {
        to_display_items(json!([{"recipeId": "42", "title": "Soup"}])).unwrap()
    }

    #[test]
    fn starts_loading() {
        assert_eq!(FavoritesScreen::new().state(), &ScreenState::Loading);
    }

    #[test]
    fn no_user_settles_empty_without_request() {
        let mut screen = FavoritesScreen::new();
        assert_eq!(screen.mount(None), None);
        assert_eq!(screen.state(), &ScreenState::Ready(Vec::new()));

        assert_eq!(screen.mount(Some("")), None);
        assert_eq!(screen.state(), &ScreenState::Ready(Vec::new()));
    }

    #[test]
    fn mount_requests_initial_load() {
        let mut screen = FavoritesScreen::new();
        let request = screen.mount(Some("user_1")).unwrap();
        assert_eq!(request.kind, LoadKind::Initial);
        assert_eq!(request.user_id, "user_1");
        assert_eq!(screen.state(), &ScreenState::Loading);
    }

    #[test]
    fn success_goes_ready() {
        let mut screen = FavoritesScreen::new();
        screen.mount(Some("user_1"));
        screen.complete(LoadKind::Initial, Ok(soup()));

        match screen.state() {
            ScreenState::Ready(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].id, json!("42"));
            }
            other => panic!("expected ready, got {:?}", other),
        }
        assert!(screen.alert().is_none());
    }

    #[test]
    fn initial_failure_is_classified_and_alerted() {
        let mut screen = FavoritesScreen::new();
        screen.mount(Some("user_1"));
        screen.complete(
            LoadKind::Initial,
            Err(FavoritesError::Server {
                status: 404,
                body: "not found".into(),
            }),
        );

        let expected = "Server error: HTTP 404: not found";
        assert_eq!(screen.state(), &ScreenState::Error(expected.into()));
        let alert = screen.alert().unwrap();
        assert_eq!(alert.title, "Error");
        assert_eq!(alert.message, expected);

        screen.dismiss_alert();
        assert!(screen.alert().is_none());
    }

    #[test]
    fn malformed_payload_never_reaches_ready() {
        let mut screen = FavoritesScreen::new();
        screen.mount(Some("user_1"));
        screen.complete(LoadKind::Initial, to_display_items(json!(null)));
        assert_eq!(
            screen.state(),
            &ScreenState::Error(crate::constants::MSG_MALFORMED.into())
        );
    }

    #[test]
    fn retry_failure_collapses_to_generic_message() {
        let mut screen = FavoritesScreen::new();
        screen.mount(Some("user_1"));
        screen.complete(LoadKind::Initial, Err(FavoritesError::Network("reset".into())));
        screen.dismiss_alert();

        let request = screen.retry(Some("user_1")).unwrap();
        assert_eq!(request.kind, LoadKind::Retry);
        assert_eq!(screen.state(), &ScreenState::Loading);

        screen.complete(LoadKind::Retry, Err(FavoritesError::Timeout(Duration::from_secs(1))));
        assert_eq!(
            screen.state(),
            &ScreenState::Error("Still unable to load favorites".into())
        );
        assert!(screen.alert().is_none());
    }

    #[test]
    fn last_completion_wins() {
        let mut screen = FavoritesScreen::new();
        screen.mount(Some("user_1"));
        screen.retry(Some("user_1"));
        screen.complete(LoadKind::Retry, Ok(soup()));
        screen.complete(LoadKind::Initial, Err(FavoritesError::Aborted));
        assert!(matches!(screen.state(), ScreenState::Error(_)));
    }

    #[test]
    fn sign_out_needs_confirmation() {
        let mut auth = FakeAuth(Some("user_1".into()));
        let mut screen = FavoritesScreen::new();

        screen.request_sign_out();
        assert!(screen.is_confirming_sign_out());
        screen.cancel_sign_out();
        assert!(!screen.is_confirming_sign_out());
        assert_eq!(auth.user_id(), Some("user_1"));

        screen.request_sign_out();
        screen.confirm_sign_out(&mut auth);
        assert!(!screen.is_confirming_sign_out());
        assert_eq!(auth.user_id(), None);
    }

    #[tokio::test]
    async fn retry_after_failure_issues_one_request() {
        let (addr, hits) = start_backend(|n| async move {
            if n == 0 {
                Some((503, "warming up".to_string()))
            } else {
                Some((200, r#"[{"recipeId":"42","title":"Soup"}]"#.to_string()))
            }
        })
        .await;
        let client = client_for(addr);
        let token = CancellationToken::new();
        let timeout = Duration::from_secs(10);
        let mut screen = FavoritesScreen::new();

        let request = screen.mount(Some("user_1")).unwrap();
        let result = client.execute(&request, timeout, &token).await;
        screen.complete(request.kind, result);
        assert!(matches!(screen.state(), ScreenState::Error(m) if m.starts_with("Server error: HTTP 503")));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let request = screen.retry(Some("user_1")).unwrap();
        let result = client.execute(&request, timeout, &token).await;
        screen.complete(request.kind, result);

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        match screen.state() {
            ScreenState::Ready(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].get("id"), items[0].get("recipeId"));
            }
            other => panic!("expected ready, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn slow_initial_load_reports_timeout() {
        let (addr, _) = start_backend(|_| async { None::<(u16, String)> }).await;
        let client = client_for(addr);
        let mut screen = FavoritesScreen::new();

        let request = screen.mount(Some("user_1")).unwrap();
        let result = client
            .execute(&request, Duration::from_millis(200), &CancellationToken::new())
            .await;
        screen.complete(request.kind, result);

        assert_eq!(
            screen.state(),
            &ScreenState::Error(crate::constants::MSG_TIMEOUT.into())
        );
    }
}
