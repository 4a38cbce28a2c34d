//! Per-session serialization of conversational turns.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::SessionId;

/// One async mutex per session id.
///
/// Holding the guard across the oracle call makes read-converse-merge atomic
/// for a session within this process. Entries nobody holds are pruned on the
/// next acquire.
#[derive(Debug, Clone, Default)]
pub struct SessionLocks {
    inner: Arc<Mutex<HashMap<SessionId, Arc<AsyncMutex<()>>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `id`.
    pub async fn acquire(&self, id: SessionId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            map.retain(|key, lock| *key == id || Arc::strong_count(lock) > 1);
            map.entry(id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of sessions currently tracked.
    pub fn tracked(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
