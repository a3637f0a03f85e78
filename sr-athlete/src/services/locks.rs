//! Keyed async locks serializing imports of the same incoming identity

use sr_common::normalize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per import key
///
/// Entries nobody holds or waits on are pruned on the next acquire.
#[derive(Clone, Default)]
pub struct ImportLocks {
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl ImportLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of `key`; released when the guard drops
    pub async fn acquire(&self, key: String) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|p| p.into_inner());
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            map.entry(key).or_default().clone()
        };
        lock.lock_owned().await
    }

    pub fn athlete_key(name: &str, year: i32) -> String {
        format!("athlete:{}:{}", normalize(name), year)
    }

    pub fn team_key(name: &str) -> String {
        format!("team:{}", normalize(name))
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.inner.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}
