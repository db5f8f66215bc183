//! In-memory session store. Nothing is persisted: sessions die on DELETE or
//! process exit.
//!
//! Handlers never hold the store lock across a gateway await — the closure
//! API scopes each lock acquisition to a single guard/commit step.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::wizard::WizardSession;

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, WizardSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session and returns its id.
    pub async fn create(&self) -> Uuid {
        let session = WizardSession::new();
        let id = session.id;
        self.inner.write().await.insert(id, session);
        id
    }

    /// Runs a closure with shared access to a session.
    pub async fn read<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&WizardSession) -> T,
    ) -> Result<T, AppError> {
        let sessions = self.inner.read().await;
        let session = sessions
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        Ok(f(session))
    }

    /// Runs a closure with exclusive access to a session. The closure's
    /// error propagates unchanged so guard failures keep their variant.
    pub async fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut WizardSession) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut sessions = self.inner.write().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        f(session)
    }

    /// Discards a session and everything it accumulated.
    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.inner
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::Stage;

    #[tokio::test]
    async fn test_create_read_remove_roundtrip() {
        let store = SessionStore::new();
        let id = store.create().await;

        let stage = store.read(id, |s| s.stage()).await.unwrap();
        assert_eq!(stage, Stage::PasteJd);

        store.remove(id).await.unwrap();
        assert!(matches!(
            store.read(id, |s| s.stage()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_propagates_closure_error() {
        let store = SessionStore::new();
        let id = store.create().await;

        let result = store
            .update(id, |s| s.set_job_text("  ".to_string()))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let store = SessionStore::new();
        let result = store.update(Uuid::new_v4(), |_| Ok(())).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let a = store.create().await;
        let b = store.create().await;

        store
            .update(a, |s| s.set_job_text("JD for session a".to_string()))
            .await
            .unwrap();

        let b_has_job = store.read(b, |s| s.job().is_some()).await.unwrap();
        assert!(!b_has_job);
    }
}
