use dashmap::DashMap;
use mentra_sdk::AppSession;
use std::{fmt, sync::Arc};

/// 活跃会话表：session_id -> 会话句柄
///
/// An id is present from its start callback until its stop callback.
/// Reads may run concurrently with lifecycle mutations.
#[derive(Clone, Default)]
pub struct ActiveSessionRegistry {
    sessions: Arc<DashMap<String, Arc<dyn AppSession>>>,
}

impl ActiveSessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a session, replacing any handle already stored under the same id
    pub fn insert(&self, session_id: String, session: Arc<dyn AppSession>) -> bool {
        let replaced = self.sessions.insert(session_id.clone(), session).is_some();
        if replaced {
            tracing::warn!("Session {} started again, replacing previous handle", session_id);
        }
        replaced
    }

    /// Stop tracking a session. Unknown ids are ignored.
    pub fn remove(&self, session_id: &str) -> Option<Arc<dyn AppSession>> {
        self.sessions.remove(session_id).map(|(_, session)| session)
    }

    pub fn get(&self, session_id: &str) -> Option<Arc<dyn AppSession>> {
        self.sessions.get(session_id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|entry| entry.key().clone()).collect()
    }

    /// 快照当前所有句柄，调用方在不持有分片锁的情况下遍历
    pub fn handles(&self) -> Vec<Arc<dyn AppSession>> {
        self.sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}

impl fmt::Debug for ActiveSessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveSessionRegistry")
            .field("sessions", &self.session_ids())
            .finish()
    }
}
