use std::sync::Arc;
use std::thread;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Local};
use dashmap::DashMap;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::config;
use crate::playlist::Playlist;

/// One user's playlist plus the timestamps the idle sweeper needs.
#[derive(Debug)]
pub struct Session {
    pub playlist: Playlist,
    pub created_at: DateTime<Local>,
    pub last_seen: DateTime<Local>,
}

impl Session {
    fn new() -> Self {
        let now = Local::now();
        Self {
            playlist: Playlist::new(),
            created_at: now,
            last_seen: now,
        }
    }
}

/// Session-keyed playlist store. Each session id owns an entirely
/// independent playlist, created lazily on first access. The per-session
/// mutex serializes operations on a playlist; the map shards stay free for
/// other sessions while an operation runs.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, Mutex<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `op` against the session's state, creating the session if this
    /// is its first access and refreshing its idle clock.
    pub fn with_session<T>(&self, id: Uuid, op: impl FnOnce(&mut Session) -> T) -> T {
        let cell = self
            .sessions
            .entry(id)
            .or_insert_with(|| {
                log::info!("Starting session {}", id);
                Mutex::new(Session::new())
            })
            .downgrade();
        let mut session = cell.lock();
        session.last_seen = Local::now();
        op(&mut session)
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Drops a session and its playlist. Returns false when the id was
    /// never seen (or already swept).
    pub fn end_session(&self, id: Uuid) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if removed {
            log::info!("Ended session {}", id);
        }
        removed
    }

    /// Removes every session idle past the cutoff; returns how many went.
    pub fn purge_idle(&self, max_idle: Duration) -> usize {
        let cutoff = Local::now() - max_idle;
        let before = self.sessions.len();
        self.sessions.retain(|_, cell| cell.get_mut().last_seen >= cutoff);
        before - self.sessions.len()
    }
}

/// Background sweep loop: periodically discards playlists whose session has
/// gone idle. Spawned once at startup from a plain thread.
pub fn idle_session_sweeper(store: Arc<SessionStore>) {
    log::info!(
        "Session sweeper started (idle timeout {}s, sweep every {}s)",
        config::SESSION_IDLE_TIMEOUT_SECS,
        config::SESSION_SWEEP_INTERVAL_SECS
    );

    loop {
        thread::sleep(StdDuration::from_secs(config::SESSION_SWEEP_INTERVAL_SECS));

        let purged = store.purge_idle(Duration::seconds(config::SESSION_IDLE_TIMEOUT_SECS));
        if purged > 0 {
            log::info!(
                "Purged {} idle sessions, {} still active",
                purged,
                store.active_sessions()
            );
        }
    }
}
