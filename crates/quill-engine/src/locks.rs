//! Per-workspace write serialization.
//!
//! Every durable write to a workspace happens while holding that workspace's
//! key lock: a whole turn (read draft, mutate, flush) holds it from start to
//! finish, and a background gathering run takes it around each
//! read-merge-write checkpoint. Locks for different workspaces never contend.
//!
//! A key's entry lives only while someone holds or awaits it; idle entries
//! are pruned on the next acquire.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Guard for one workspace key. The key is released on drop.
pub type KeyGuard = OwnedMutexGuard<()>;

#[derive(Debug, Default)]
pub struct KeyLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl KeyLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`. Waiters are served in FIFO order.
    pub async fn acquire(&self, key: &str) -> KeyGuard {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            // Clones are only taken under `inner`, so a count of one means idle.
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(map.entry(key.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
