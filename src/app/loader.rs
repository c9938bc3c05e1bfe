//! Favorites fetch lifecycle: mount, retry, and result polling

use super::{App, LoadOutcome};
use crate::api::FavoritesClient;
use crate::session::AuthProvider;
use crate::types::LoadRequest;
use eframe::egui;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

impl App {
    /// (Re)enter the screen for the signed-in user
    pub fn mount_screen(&mut self, ctx: &egui::Context) {
        if let Some(request) = self.screen.mount(self.session.user_id()) {
            self.dispatch(ctx, request);
        }
    }

    pub fn retry_load(&mut self, ctx: &egui::Context) {
        if let Some(request) = self.screen.retry(self.session.user_id()) {
            self.dispatch(ctx, request);
        }
    }

    /// Cancel the signed-in user's initial load and drop any result still
    /// on its way, so it never lands on the next user's screen
    pub fn abort_loads(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            debug!("Aborting in-flight favorites requests");
            token.cancel();
        }
        if let Ok(mut slot) = self.pending.lock() {
            *slot = None;
        }
    }

    /// Run a request on the runtime. Every request posts into the same slot,
    /// so when several are in flight the last one to finish is what shows.
    fn dispatch(&mut self, ctx: &egui::Context, request: LoadRequest) {
        debug!(
            kind = ?request.kind,
            url = %self.client.favorites_url(&request.user_id),
            "Dispatching favorites request"
        );

        // One token per signed-in session, shared by all of its requests
        let token = self.cancel_token.get_or_insert_with(CancellationToken::new).clone();
        let client = self.client.clone();
        let timeout = self.request_timeout;
        let pending = self.pending.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            if run_load(client, request, timeout, token, pending).await {
                ctx.request_repaint();
            }
        });
    }

    /// Apply a finished fetch, if any, to the screen
    pub fn poll_load_results(&mut self) {
        let outcome = match self.pending.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        if let Some(outcome) = outcome {
            self.screen.complete(outcome.kind, outcome.result);
        }
    }
}

/// Execute `request` and post its outcome. Returns false when the session
/// was torn down meanwhile and the outcome was dropped.
pub(crate) async fn run_load(
    client: FavoritesClient,
    request: LoadRequest,
    timeout: Duration,
    token: CancellationToken,
    pending: Arc<Mutex<Option<LoadOutcome>>>,
) -> bool {
    let result = client.execute(&request, timeout, &token).await;
    if token.is_cancelled() {
        debug!(kind = ?request.kind, user_id = %request.user_id, "Dropping favorites for ended session");
        return false;
    }
    if let Ok(mut slot) = pending.lock() {
        *slot = Some(LoadOutcome {
            kind: request.kind,
            result,
        });
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::{client_for, start_backend};
    use crate::types::LoadKind;

    fn request(kind: LoadKind) -> LoadRequest {
        LoadRequest {
            kind,
            user_id: "user_a".to_string(),
        }
    }

    #[tokio::test]
    async fn finished_load_is_posted() {
        let (addr, _) = start_backend(|_| async {
            Some((200, r#"[{"recipeId":"42"}]"#.to_string()))
        })
        .await;
        let pending = Arc::new(Mutex::new(None));

        let posted = run_load(
            client_for(addr),
            request(LoadKind::Initial),
            Duration::from_secs(10),
            CancellationToken::new(),
            pending.clone(),
        )
        .await;

        assert!(posted);
        let outcome = pending.lock().unwrap().take().unwrap();
        assert_eq!(outcome.kind, LoadKind::Initial);
        assert_eq!(outcome.result.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancelled_session_drops_initial_load() {
        let (addr, _) = start_backend(|_| async { None::<(u16, String)> }).await;
        let pending = Arc::new(Mutex::new(None));
        let token = CancellationToken::new();

        let load = tokio::spawn(run_load(
            client_for(addr),
            request(LoadKind::Initial),
            Duration::from_secs(10),
            token.clone(),
            pending.clone(),
        ));
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();

        assert!(!load.await.unwrap());
        assert!(pending.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn cancelled_session_drops_late_retry() {
        let (addr, hits) = start_backend(|_| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Some((200, r#"[{"recipeId":"42"}]"#.to_string()))
        })
        .await;
        let pending = Arc::new(Mutex::new(None));
        let token = CancellationToken::new();

        let load = tokio::spawn(run_load(
            client_for(addr),
            request(LoadKind::Retry),
            Duration::from_secs(10),
            token.clone(),
            pending.clone(),
        ));
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();

        // Retries are not cut short, but their result is discarded
        assert!(!load.await.unwrap());
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(pending.lock().unwrap().is_none());
    }
}
