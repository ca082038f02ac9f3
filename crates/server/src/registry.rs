//! Session registry.
//!
//! Process-wide table of live plot sessions. Every mutation and every read of
//! a session's connection set goes through one mutex; render managers are
//! handed out as cloned [`SessionHandle`]s so no caller renders while holding
//! the lock.
//!
//! # Lifetime
//!
//! A session is created by a plot request with no connections. It is
//! destroyed when a detach leaves its connection set empty, which releases
//! the figure and render manager once the last outstanding handle drops.
//!
//! A session that never gets a connection is never destroyed: a plot page
//! fetched by a crawler or `curl`, or one whose upgrade failed, keeps its
//! figure and manager for the life of the process. Reaping these belongs
//! with idle timeouts, which are not implemented.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use plot::Figure;
use render::RenderManager;
use tracing::{debug, info};
use types::{ConnectionId, SessionId};

/// Registry failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No live session under this id.
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),

    /// The id counter overflowed.
    #[error("session id space exhausted")]
    Exhausted,

    /// A fresh id was already live. Indicates a broken counter.
    #[error("session id {0} already in use")]
    IdCollision(SessionId),
}

/// Cheap, cloneable view of a session's shared parts.
#[derive(Clone)]
pub struct SessionHandle {
    pub id: SessionId,
    pub figure: Arc<Figure>,
    pub manager: Arc<dyn RenderManager>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.id)
            .field("title", &self.figure.title)
            .finish_non_exhaustive()
    }
}

struct Session {
    figure: Arc<Figure>,
    manager: Arc<dyn RenderManager>,
    connections: HashSet<ConnectionId>,
}

impl Session {
    fn handle(&self, id: SessionId) -> SessionHandle {
        SessionHandle {
            id,
            figure: Arc::clone(&self.figure),
            manager: Arc::clone(&self.manager),
        }
    }
}

/// Result of detaching a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detached {
    /// Other connections still view the session.
    StillViewed(usize),
    /// The last connection left; the session is gone.
    Destroyed,
}

struct Inner {
    next_session: u64,
    sessions: HashMap<SessionId, Session>,
}

/// The session table.
pub struct SessionRegistry {
    inner: Mutex<Inner>,
    next_connection: AtomicU64,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Registry whose first session id is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_session: first,
                sessions: HashMap::new(),
            }),
            next_connection: AtomicU64::new(1),
        }
    }

    /// Store a new session and return its fresh id.
    pub fn create(
        &self,
        figure: Arc<Figure>,
        manager: Arc<dyn RenderManager>,
    ) -> Result<SessionId, RegistryError> {
        let mut inner = self.inner.lock();
        let id = SessionId(inner.next_session);
        inner.next_session = inner
            .next_session
            .checked_add(1)
            .ok_or(RegistryError::Exhausted)?;

        match inner.sessions.entry(id) {
            Entry::Occupied(_) => Err(RegistryError::IdCollision(id)),
            Entry::Vacant(slot) => {
                slot.insert(Session {
                    figure,
                    manager,
                    connections: HashSet::new(),
                });
                info!(session = %id, "created session");
                Ok(id)
            }
        }
    }

    /// Look up a session.
    pub fn get(&self, id: SessionId) -> Result<SessionHandle, RegistryError> {
        self.inner
            .lock()
            .sessions
            .get(&id)
            .map(|session| session.handle(id))
            .ok_or(RegistryError::UnknownSession(id))
    }

    /// Add a connection to a session's viewer set.
    pub fn attach(
        &self,
        id: SessionId,
        connection: ConnectionId,
    ) -> Result<SessionHandle, RegistryError> {
        let mut inner = self.inner.lock();
        let session = inner
            .sessions
            .get_mut(&id)
            .ok_or(RegistryError::UnknownSession(id))?;
        session.connections.insert(connection);
        debug!(
            session = %id,
            %connection,
            viewers = session.connections.len(),
            "attached connection"
        );
        Ok(session.handle(id))
    }

    /// Remove a connection; destroys the session when it was the last viewer.
    pub fn detach(
        &self,
        id: SessionId,
        connection: ConnectionId,
    ) -> Result<Detached, RegistryError> {
        let removed = {
            let mut inner = self.inner.lock();
            let session = inner
                .sessions
                .get_mut(&id)
                .ok_or(RegistryError::UnknownSession(id))?;
            let was_attached = session.connections.remove(&connection);
            let remaining = session.connections.len();
            if !(was_attached && remaining == 0) {
                return Ok(Detached::StillViewed(remaining));
            }
            inner.sessions.remove(&id)
        };

        // Dropped outside the lock: releasing a manager may be slow.
        drop(removed);
        info!(session = %id, %connection, "last viewer left, destroyed session");
        Ok(Detached::Destroyed)
    }

    /// Allocate an id for a new connection.
    pub fn allocate_connection(&self) -> ConnectionId {
        ConnectionId(self.next_connection.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of connections attached to a session.
    pub fn connection_count(&self, id: SessionId) -> Result<usize, RegistryError> {
        self.inner
            .lock()
            .sessions
            .get(&id)
            .map(|session| session.connections.len())
            .ok_or(RegistryError::UnknownSession(id))
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.inner.lock().sessions.contains_key(&id)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.inner.lock().sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingManager, figure};
    use std::thread;

    fn registry_with_session() -> (SessionRegistry, SessionId) {
        let registry = SessionRegistry::new();
        let id = registry
            .create(figure(), Arc::new(RecordingManager::default()))
            .unwrap();
        (registry, id)
    }

    #[test]
    fn test_ids_are_distinct() {
        let registry = SessionRegistry::new();
        let ids: HashSet<SessionId> = (0..100)
            .map(|_| {
                registry
                    .create(figure(), Arc::new(RecordingManager::default()))
                    .unwrap()
            })
            .collect();
        assert_eq!(ids.len(), 100);
        assert_eq!(registry.len(), 100);
    }

    #[test]
    fn test_ids_distinct_across_threads() {
        let registry = Arc::new(SessionRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    (0..50)
                        .map(|_| {
                            registry
                                .create(figure(), Arc::new(RecordingManager::default()))
                                .unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            all.extend(handle.join().unwrap());
        }
        assert_eq!(all.len(), 400);
    }

    #[test]
    fn test_get_unknown_session() {
        let registry = SessionRegistry::new();
        assert_eq!(
            registry.get(SessionId(42)).unwrap_err(),
            RegistryError::UnknownSession(SessionId(42))
        );
    }

    #[test]
    fn test_last_detach_destroys_session() {
        let (registry, id) = registry_with_session();
        let (c1, c2) = (registry.allocate_connection(), registry.allocate_connection());
        assert_ne!(c1, c2);

        registry.attach(id, c1).unwrap();
        registry.attach(id, c2).unwrap();
        assert_eq!(registry.connection_count(id), Ok(2));

        assert_eq!(registry.detach(id, c1), Ok(Detached::StillViewed(1)));
        assert!(registry.get(id).is_ok());

        assert_eq!(registry.detach(id, c2), Ok(Detached::Destroyed));
        assert_eq!(
            registry.get(id).unwrap_err(),
            RegistryError::UnknownSession(id)
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_attach_after_destroy_fails() {
        let (registry, id) = registry_with_session();
        let c1 = registry.allocate_connection();
        registry.attach(id, c1).unwrap();
        registry.detach(id, c1).unwrap();

        let c2 = registry.allocate_connection();
        assert_eq!(
            registry.attach(id, c2).unwrap_err(),
            RegistryError::UnknownSession(id)
        );
        assert_eq!(
            registry.detach(id, c2).unwrap_err(),
            RegistryError::UnknownSession(id)
        );
    }

    #[test]
    fn test_detach_of_stranger_keeps_session() {
        let (registry, id) = registry_with_session();
        let stranger = registry.allocate_connection();
        assert_eq!(registry.detach(id, stranger), Ok(Detached::StillViewed(0)));
        assert!(registry.contains(id));
    }

    #[test]
    fn test_unviewed_session_is_kept() {
        let registry = SessionRegistry::new();
        let manager = Arc::new(RecordingManager::default());
        let id = registry.create(figure(), manager.clone()).unwrap();

        // Other sessions coming and going do not reap it.
        let (other, conn) = (
            registry
                .create(figure(), Arc::new(RecordingManager::default()))
                .unwrap(),
            registry.allocate_connection(),
        );
        registry.attach(other, conn).unwrap();
        assert_eq!(registry.detach(other, conn), Ok(Detached::Destroyed));

        assert!(registry.contains(id));
        assert_eq!(registry.connection_count(id), Ok(0));
        assert_eq!(Arc::strong_count(&manager), 2);
    }

    #[test]
    fn test_destroy_releases_manager() {
        let registry = SessionRegistry::new();
        let manager = Arc::new(RecordingManager::default());
        let id = registry.create(figure(), manager.clone()).unwrap();
        let conn = registry.allocate_connection();
        registry.attach(id, conn).unwrap();
        assert_eq!(Arc::strong_count(&manager), 2);

        registry.detach(id, conn).unwrap();
        assert_eq!(Arc::strong_count(&manager), 1);
    }

    #[test]
    fn test_counter_exhaustion() {
        let registry = SessionRegistry::starting_at(u64::MAX);
        assert_eq!(
            registry
                .create(figure(), Arc::new(RecordingManager::default()))
                .unwrap_err(),
            RegistryError::Exhausted
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_attach_detach() {
        let (registry, id) = registry_with_session();
        let registry = Arc::new(registry);
        let anchor = registry.allocate_connection();
        registry.attach(id, anchor).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let conn = registry.allocate_connection();
                        registry.attach(id, conn).unwrap();
                        registry.detach(id, conn).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.connection_count(id), Ok(1));
        assert_eq!(registry.detach(id, anchor), Ok(Detached::Destroyed));
    }
}
