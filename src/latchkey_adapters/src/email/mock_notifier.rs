use std::sync::Arc;

use latchkey_core::{ActivationToken, Email, Notifier, NotifierError};
use tokio::sync::RwLock;

/// Notifier that keeps activation messages in memory instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    outbox: Arc<RwLock<Vec<(Email, ActivationToken)>>>,
    failing: Arc<RwLock<bool>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following send fail until switched back.
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    pub async fn sent(&self) -> Vec<(Email, ActivationToken)> {
        self.outbox.read().await.clone()
    }

    /// The most recent token sent to `destination`.
    pub async fn last_token_for(&self, destination: &Email) -> Option<ActivationToken> {
        self.outbox
            .read()
            .await
            .iter()
            .rev()
            .find(|(email, _)| email == destination)
            .map(|(_, token)| token.clone())
    }
}

#[async_trait::async_trait]
impl Notifier for MockNotifier {
    async fn send_activation(
        &self,
        destination: &Email,
        token: &ActivationToken,
    ) -> Result<(), NotifierError> {
        if *self.failing.read().await {
            return Err(NotifierError("mock notifier switched to failing".to_string()));
        }
        tracing::debug!("Recording activation message");
        self.outbox
            .write()
            .await
            .push((destination.clone(), token.clone()));
        Ok(())
    }
}
