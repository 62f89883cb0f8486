//! Persisted read/dismissed state.
//!
//! Alerts themselves are never stored; only their ids, in two JSON-array
//! blobs. Both sets only grow. There is no pruning, so they grow without
//! bound over the life of an install.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use super::types::Alert;
use crate::db::repos::settings::KeyValueStore;
use crate::db::settings_keys::{DISMISSED_ALERT_IDS, READ_ALERT_IDS};
use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationState {
    pub dismissed: BTreeSet<String>,
    pub read: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSet {
    Dismissed,
    Read,
}

impl IdSet {
    pub fn key(&self) -> &'static str {
        match self {
            IdSet::Dismissed => DISMISSED_ALERT_IDS,
            IdSet::Read => READ_ALERT_IDS,
        }
    }
}

impl NotificationState {
    fn set_mut(&mut self, which: IdSet) -> &mut BTreeSet<String> {
        match which {
            IdSet::Dismissed => &mut self.dismissed,
            IdSet::Read => &mut self.read,
        }
    }
}

pub struct NotificationStore {
    kv: Arc<dyn KeyValueStore>,
    /// Ids added during this process. Held while writing, so it also
    /// serializes read-modify-write cycles on the blobs.
    session: Mutex<NotificationState>,
}

impl NotificationStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            session: Mutex::new(NotificationState::default()),
        }
    }

    /// Load both sets. Read failures fail open (nothing dismissed, nothing
    /// read) rather than blocking the feed.
    pub fn load(&self) -> NotificationState {
        let session = self.session.lock().unwrap_or_else(|e| e.into_inner());

        let mut state = NotificationState {
            dismissed: self.read_or_empty(IdSet::Dismissed),
            read: self.read_or_empty(IdSet::Read),
        };
        // Honor mutations whose write failed earlier in this session.
        state.dismissed.extend(session.dismissed.iter().cloned());
        state.read.extend(session.read.iter().cloned());
        state
    }

    /// Drop dismissed alerts and stamp `read` on the survivors. Order is kept.
    pub fn assemble_feed(candidates: Vec<Alert>, state: &NotificationState) -> Vec<Alert> {
        candidates
            .into_iter()
            .filter(|a| !state.dismissed.contains(&a.id))
            .map(|mut a| {
                a.read = state.read.contains(&a.id);
                a
            })
            .collect()
    }

    pub fn add_read<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(IdSet::Read, ids);
    }

    pub fn add_dismissed<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.add(IdSet::Dismissed, ids);
    }

    /// Union `ids` into one set and persist it in a single write. Ids whose
    /// earlier write failed ride along with the next successful one.
    fn add<I, S>(&self, which: IdSet, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            return;
        }

        let mut session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        session.set_mut(which).extend(ids);

        let mut persisted = match self.read_set(which) {
            Ok(set) => set,
            Err(e) => {
                // Writing now could clobber ids we failed to read.
                tracing::warn!(key = which.key(), error = %e, "Skipping alert state write, read failed");
                return;
            }
        };

        let before = persisted.len();
        persisted.extend(session.set_mut(which).iter().cloned());
        if persisted.len() == before {
            return;
        }

        if let Err(e) = self.write_set(which, &persisted) {
            tracing::warn!(key = which.key(), error = %e, "Failed to persist alert state");
        } else {
            tracing::debug!(key = which.key(), size = persisted.len(), "Alert state persisted");
        }
    }

    fn read_or_empty(&self, which: IdSet) -> BTreeSet<String> {
        self.read_set(which).unwrap_or_else(|e| {
            tracing::warn!(key = which.key(), error = %e, "Failed to load alert state, using empty set");
            BTreeSet::new()
        })
    }

    /// A missing or corrupt blob reads as empty; only backend errors are `Err`.
    fn read_set(&self, which: IdSet) -> Result<BTreeSet<String>, AppError> {
        let Some(raw) = self.kv.get(which.key())? else {
            return Ok(BTreeSet::new());
        };
        match serde_json::from_str::<BTreeSet<String>>(&raw) {
            Ok(set) => Ok(set),
            Err(e) => {
                tracing::warn!(key = which.key(), error = %e, "Corrupt alert state blob, resetting");
                Ok(BTreeSet::new())
            }
        }
    }

    fn write_set(&self, which: IdSet, set: &BTreeSet<String>) -> Result<(), AppError> {
        let json = serde_json::to_string(set)?;
        self.kv.set(which.key(), &json)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// In-memory key-value store with switchable failures and a write counter.
    #[derive(Default)]
    pub struct FlakyKv {
        pub data: Mutex<HashMap<String, String>>,
        pub fail_reads: AtomicBool,
        pub fail_writes: AtomicBool,
        pub writes: AtomicUsize,
    }

    impl KeyValueStore for FlakyKv {
        fn get(&self, key: &str) -> Result<Option<String>, AppError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(AppError::Internal("read failed".into()));
            }
            Ok(self.data.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(AppError::Internal("write failed".into()));
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.data.lock().unwrap().insert(key.into(), value.into());
            Ok(())
        }
    }
}
