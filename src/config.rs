use lazy_static::lazy_static;
use rocket::http::ContentType;

lazy_static! {
    // Audio container formats the boundary accepts for uploads. The core
    // never looks at these; it stores whatever blob it is handed.
    pub static ref ACCEPTED_AUDIO_TYPES: Vec<ContentType> = vec![
        ContentType::new("audio", "mpeg"),
        ContentType::new("audio", "mp3"),
        ContentType::new("audio", "wav"),
        ContentType::new("audio", "ogg"),
    ];
}

pub fn accepted_audio(content_type: &ContentType) -> bool {
    ACCEPTED_AUDIO_TYPES.iter().any(|accepted| accepted == content_type)
}

// Server configuration
pub const HOST: &str = "0.0.0.0";
pub const PORT: u16 = 8000;

// Upload limits
pub const MAX_AUDIO_BYTES: u64 = 32 * 1024 * 1024;  // 32 MB per track

// Session management
pub const SESSION_COOKIE: &str = "playlist_session";
pub const SESSION_IDLE_TIMEOUT_SECS: i64 = 1800;  // 30 minutes
pub const SESSION_SWEEP_INTERVAL_SECS: u64 = 60;
