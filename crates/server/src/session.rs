//! Per-session exclusion of already-recommended films.
//!
//! A session remembers every film id it has been served. The orchestrator
//! reads that set, computes a result and appends the result inside one
//! [`SessionStore::transact`] call, so concurrent requests on the same
//! session can never return the same film twice.

use data_loader::FilmId;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

pub type SessionId = String;

/// Sessions kept before the oldest is evicted
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

/// Fresh random session id (uuid v4, simple form)
pub fn new_session_id() -> SessionId {
    Uuid::new_v4().simple().to_string()
}

/// Keyed store of excluded film ids.
///
/// Sessions are created on first use.
pub trait SessionStore: Send + Sync {
    /// Snapshot of the films already served in a session
    fn get_excluded(&self, session_id: &str) -> HashSet<FilmId>;

    /// Record films as served
    fn append_excluded(&self, session_id: &str, film_ids: &[FilmId]);

    /// Run `op` against the session's excluded set and append the ids it
    /// returns, with no other call on the same session in between.
    fn transact(&self, session_id: &str, op: &mut dyn FnMut(&HashSet<FilmId>) -> Vec<FilmId>);
}

type SessionSlot = Arc<Mutex<HashSet<FilmId>>>;

#[derive(Default)]
struct Sessions {
    slots: HashMap<SessionId, SessionSlot>,
    /// Creation order, oldest first
    order: VecDeque<SessionId>,
}

/// In-process session store.
///
/// Each session has its own lock; the map lock is only held long enough
/// to find or create a slot, so different sessions never wait on each
/// other's work.
pub struct InMemorySessionStore {
    sessions: Mutex<Sessions>,
    max_sessions: usize,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(Sessions::default()),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    /// Cap on live sessions (at least 1)
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = max_sessions.max(1);
        self
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.lock().slots.contains_key(session_id)
    }

    fn slot(&self, session_id: &str) -> SessionSlot {
        let mut sessions = self.sessions.lock();
        if let Some(slot) = sessions.slots.get(session_id) {
            return slot.clone();
        }

        while sessions.slots.len() >= self.max_sessions {
            let Some(oldest) = sessions.order.pop_front() else { break };
            sessions.slots.remove(&oldest);
            debug!("Evicted session {}", oldest);
        }

        let slot = SessionSlot::default();
        sessions.slots.insert(session_id.to_string(), slot.clone());
        sessions.order.push_back(session_id.to_string());
        slot
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_excluded(&self, session_id: &str) -> HashSet<FilmId> {
        self.slot(session_id).lock().clone()
    }

    fn append_excluded(&self, session_id: &str, film_ids: &[FilmId]) {
        self.slot(session_id).lock().extend(film_ids.iter().cloned());
    }

    fn transact(&self, session_id: &str, op: &mut dyn FnMut(&HashSet<FilmId>) -> Vec<FilmId>) {
        let slot = self.slot(session_id);
        let mut excluded = slot.lock();
        let served = op(&excluded);
        excluded.extend(served);
    }
}
