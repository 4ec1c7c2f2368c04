// Library exports for webplaylist crate
// This allows integration tests to access the public API

pub mod config;
pub mod error;
pub mod handlers;
pub mod notice;
pub mod playlist;
pub mod session;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use notice::{Notice, NoticeLevel, NoticeLog, Notifier};
pub use playlist::{Playlist, Track};
pub use session::{Session, SessionStore};
