/**
 * Presence Registry
 *
 * Maps each online identity to the single connection it is reachable at.
 *
 * # One session per identity
 *
 * Admitting a connection for an identity that is already present replaces
 * the previous entry (last-connect-wins). This is the registry's contract;
 * multi-device fan-out would need a different entry type.
 * The displaced handle is returned to the caller and is no longer routable.
 *
 * # Stale disconnects
 *
 * `remove` only deletes the entry if it still references the disconnecting
 * connection. A delayed disconnect of a superseded connection therefore
 * cannot evict the newer session.
 *
 * # Thread Safety
 *
 * Entries live in a sharded `DashMap`, so operations on unrelated identities
 * never contend on a single lock, while admit/remove on one identity are
 * serialized by that key's shard lock.
 */

use crate::shared::{ServerEvent, UserId};
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of one live transport session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Why a push could not be enqueued
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PushError {
    #[error("outbound queue is full")]
    Full,
    #[error("connection is closed")]
    Closed,
}

/// Routable reference to a connection's outbound queue
///
/// The transport task owns the socket and the receiving end of the queue;
/// the handle only holds a sender, so dropping every handle never closes the
/// socket by itself.
///
/// # Admission gate
///
/// While a session is being admitted its handle is held (`hold`): pushes
/// are buffered instead of enqueued. `release_with` enqueues the opening
/// frame and then the buffered events, in push order, under the same lock,
/// so the opening frame is always the first thing the writer sees.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    tx: mpsc::Sender<ServerEvent>,
    capacity: usize,
    gate: Arc<Mutex<Gate>>,
}

#[derive(Debug)]
enum Gate {
    Open,
    Held(Vec<ServerEvent>),
}

impl ConnectionHandle {
    /// Create a handle with a fresh id and a bounded outbound queue
    ///
    /// The receiver must be drained by the connection's writer task.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ServerEvent>) {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                id: ConnectionId::next(),
                tx,
                capacity,
                gate: Arc::new(Mutex::new(Gate::Open)),
            },
            rx,
        )
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Enqueue an event without waiting
    ///
    /// Never blocks: a full queue is reported as `PushError::Full` and the
    /// event is dropped. A held handle buffers up to `capacity - 1` events,
    /// leaving room for the opening frame.
    pub fn push(&self, event: ServerEvent) -> Result<(), PushError> {
        let mut gate = self.lock_gate();
        match &mut *gate {
            Gate::Open => self.try_enqueue(event),
            Gate::Held(_) if self.tx.is_closed() => Err(PushError::Closed),
            Gate::Held(held) if held.len() + 1 >= self.capacity => Err(PushError::Full),
            Gate::Held(held) => {
                held.push(event);
                Ok(())
            }
        }
    }

    /// Start buffering pushes until `release_with`
    pub fn hold(&self) {
        let mut gate = self.lock_gate();
        if matches!(*gate, Gate::Open) {
            *gate = Gate::Held(Vec::new());
        }
    }

    /// Enqueue `first`, then everything buffered since `hold`, and reopen
    ///
    /// Returns the outcome of enqueueing `first`. Buffered events that no
    /// longer fit are dropped like any other push.
    pub fn release_with(&self, first: ServerEvent) -> Result<(), PushError> {
        let mut gate = self.lock_gate();
        let held = match std::mem::replace(&mut *gate, Gate::Open) {
            Gate::Held(held) => held,
            Gate::Open => Vec::new(),
        };

        let result = self.try_enqueue(first);
        for event in held {
            if let Err(e) = self.try_enqueue(event) {
                tracing::debug!(connection = %self.id, "[Presence] Held event dropped: {}", e);
            }
        }
        result
    }

    fn try_enqueue(&self, event: ServerEvent) -> Result<(), PushError> {
        self.tx.try_send(event).map_err(|err| match err {
            TrySendError::Full(_) => PushError::Full,
            TrySendError::Closed(_) => PushError::Closed,
        })
    }

    fn lock_gate(&self) -> MutexGuard<'_, Gate> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the writer side has gone away
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Concurrency-safe identity → connection map
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    entries: DashMap<UserId, ConnectionHandle>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `user` is reachable at `handle`
    ///
    /// Overwrites any previous entry and returns the displaced handle, if it
    /// was a different connection.
    pub fn admit(&self, user: UserId, handle: ConnectionHandle) -> Option<ConnectionHandle> {
        let id = handle.id();
        let displaced = self
            .entries
            .insert(user.clone(), handle)
            .filter(|previous| previous.id() != id);

        match &displaced {
            Some(previous) => tracing::info!(
                user_id = %user,
                connection = %id,
                superseded = %previous.id(),
                "[Presence] Connection admitted, previous session superseded"
            ),
            None => tracing::info!(user_id = %user, connection = %id, "[Presence] Connection admitted"),
        }

        displaced
    }

    /// Remove `user`'s entry if it still references `connection`
    ///
    /// Returns whether an entry was removed. Absent or mismatched entries are
    /// left untouched.
    pub fn remove(&self, user: &UserId, connection: ConnectionId) -> bool {
        let removed = self
            .entries
            .remove_if(user, |_, handle| handle.id() == connection)
            .is_some();

        if removed {
            tracing::info!(user_id = %user, connection = %connection, "[Presence] Connection removed");
        } else {
            tracing::debug!(
                user_id = %user,
                connection = %connection,
                "[Presence] Remove ignored, entry absent or owned by a newer connection"
            );
        }

        removed
    }

    /// Current handle for `user`, if online
    pub fn lookup(&self, user: &UserId) -> Option<ConnectionHandle> {
        self.entries.get(user).map(|entry| entry.value().clone())
    }

    pub fn is_online(&self, user: &UserId) -> bool {
        self.entries.contains_key(user)
    }

    /// Number of online identities
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
