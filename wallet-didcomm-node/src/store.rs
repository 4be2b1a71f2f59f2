//! In-memory mediator store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use wallet_didcomm_core::{error::Result, Mediator, MediatorStore};

/// Keeps the mediator for the lifetime of the process.
///
/// Suitable for tests and for wallets that re-run mediation on every start.
#[derive(Debug, Default)]
pub struct InMemoryMediatorStore {
    mediator: RwLock<Option<Mediator>>,
}

impl InMemoryMediatorStore {
    /// A store already holding `mediator`.
    #[must_use]
    pub fn with_mediator(mediator: Mediator) -> Self {
        Self {
            mediator: RwLock::new(Some(mediator)),
        }
    }
}

#[async_trait]
impl MediatorStore for InMemoryMediatorStore {
    async fn load_stored_mediator(&self) -> Result<Option<Mediator>> {
        Ok(self.mediator.read().await.clone())
    }

    async fn store_mediator(&self, mediator: &Mediator) -> Result<()> {
        *self.mediator.write().await = Some(mediator.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_load() {
        let store = InMemoryMediatorStore::default();
        assert!(store.load_stored_mediator().await.unwrap().is_none());

        let mediator = Mediator {
            id: "1".into(),
            mediator_did: "did:peer:mediator".into(),
            host_did: "did:peer:host".into(),
            routing_did: "did:peer:routing".into(),
        };
        store.store_mediator(&mediator).await.unwrap();
        assert_eq!(store.load_stored_mediator().await.unwrap(), Some(mediator));
    }
}
