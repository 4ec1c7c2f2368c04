use std::sync::Arc;

use bytes::Bytes;
use rocket::data::ToByteUnit;
use rocket::http::{ContentType, Cookie, CookieJar};
use rocket::serde::json::Json;
use rocket::{catch, catchers, delete, get, post, routes, Build, Data, Rocket, State};
use serde::Serialize;
use uuid::Uuid;

use crate::config;
use crate::error::{AppError, Result};
use crate::notice::{Notice, NoticeLog, Notifier};
use crate::session::{Session, SessionStore};

#[derive(Debug, Serialize)]
pub struct OpResponse {
    pub notices: Vec<Notice>,
    pub length: usize,
}

#[derive(Debug, Serialize)]
pub struct TrackSummary {
    pub title: String,
    pub artist: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    pub notices: Vec<Notice>,
    pub now_playing: Option<TrackSummary>,
    pub length: usize,
}

#[derive(Debug, Serialize)]
pub struct PlaylistResponse {
    pub tracks: Vec<String>,
    pub length: usize,
}

// Every request is pinned to one playlist through the session cookie; the
// first request of a session mints the id.
fn session_id(cookies: &CookieJar<'_>) -> Uuid {
    if let Some(cookie) = cookies.get(config::SESSION_COOKIE) {
        if let Ok(id) = Uuid::parse_str(cookie.value()) {
            return id;
        }
    }

    let id = Uuid::new_v4();
    cookies.add(Cookie::new(config::SESSION_COOKIE, id.to_string()));
    id
}

// The playback widget needs a content type, but the core stores an opaque
// blob, so sniff the container from its leading bytes.
fn audio_content_type(audio: &[u8]) -> ContentType {
    if audio.starts_with(b"ID3") || (audio.len() >= 2 && audio[0] == 0xFF && audio[1] & 0xE0 == 0xE0)
    {
        ContentType::new("audio", "mpeg")
    } else if audio.starts_with(b"RIFF") {
        ContentType::new("audio", "wav")
    } else if audio.starts_with(b"OggS") {
        ContentType::new("audio", "ogg")
    } else {
        ContentType::Binary
    }
}

#[post("/api/tracks?<title>&<artist>", data = "<audio>")]
pub async fn add_track(
    cookies: &CookieJar<'_>,
    store: &State<Arc<SessionStore>>,
    content_type: Option<&ContentType>,
    title: String,
    artist: String,
    audio: Data<'_>,
) -> Result<Json<OpResponse>> {
    let content_type = content_type
        .ok_or_else(|| AppError::UnsupportedAudio("missing content type".to_string()))?;
    if !config::accepted_audio(content_type) {
        return Err(AppError::UnsupportedAudio(content_type.to_string()));
    }

    let capped = audio
        .open(config::MAX_AUDIO_BYTES.bytes())
        .into_bytes()
        .await?;
    if !capped.is_complete() {
        return Err(AppError::PayloadTooLarge);
    }
    let audio = Bytes::from(capped.into_inner());

    let id = session_id(cookies);
    let mut notices = NoticeLog::new();

    // Input validation is the boundary's job; the core inserts whatever it
    // is given.
    let length = if title.is_empty() || artist.is_empty() || audio.is_empty() {
        notices.warning("Please enter title, artist, and audio file.");
        store.with_session(id, |session| session.playlist.len())
    } else {
        store.with_session(id, |session| {
            session.playlist.add(title, artist, audio, &mut notices);
            session.playlist.len()
        })
    };

    Ok(Json(OpResponse {
        notices: notices.into_notices(),
        length,
    }))
}

#[get("/api/playlist")]
pub async fn get_playlist(
    cookies: &CookieJar<'_>,
    store: &State<Arc<SessionStore>>,
) -> Json<PlaylistResponse> {
    let id = session_id(cookies);
    let (tracks, length) =
        store.with_session(id, |session| (session.playlist.display(), session.playlist.len()));

    Json(PlaylistResponse { tracks, length })
}

#[delete("/api/tracks?<title>")]
pub async fn delete_track(
    cookies: &CookieJar<'_>,
    store: &State<Arc<SessionStore>>,
    title: String,
) -> Json<OpResponse> {
    let id = session_id(cookies);
    let mut notices = NoticeLog::new();
    let length = store.with_session(id, |session| {
        session.playlist.delete(&title, &mut notices);
        session.playlist.len()
    });

    Json(OpResponse {
        notices: notices.into_notices(),
        length,
    })
}

#[post("/api/player/play")]
pub async fn play(
    cookies: &CookieJar<'_>,
    store: &State<Arc<SessionStore>>,
) -> Json<PlayerResponse> {
    let id = session_id(cookies);
    let mut notices = NoticeLog::new();
    let (now_playing, length) = store.with_session(id, |session| {
        let playing = session
            .playlist
            .play_current(&mut notices)
            .map(|track| TrackSummary {
                title: track.title,
                artist: track.artist,
            });
        (playing, session.playlist.len())
    });

    Json(PlayerResponse {
        notices: notices.into_notices(),
        now_playing,
        length,
    })
}

#[post("/api/player/next")]
pub async fn next_track(
    cookies: &CookieJar<'_>,
    store: &State<Arc<SessionStore>>,
) -> Json<PlayerResponse> {
    let id = session_id(cookies);
    let mut notices = NoticeLog::new();
    let (now_playing, length) = store.with_session(id, |session| {
        session.playlist.advance(&mut notices);
        (current_summary(session), session.playlist.len())
    });

    Json(PlayerResponse {
        notices: notices.into_notices(),
        now_playing,
        length,
    })
}

#[post("/api/player/previous")]
pub async fn previous_track(
    cookies: &CookieJar<'_>,
    store: &State<Arc<SessionStore>>,
) -> Json<PlayerResponse> {
    let id = session_id(cookies);
    let mut notices = NoticeLog::new();
    let (now_playing, length) = store.with_session(id, |session| {
        session.playlist.retreat(&mut notices);
        (current_summary(session), session.playlist.len())
    });

    Json(PlayerResponse {
        notices: notices.into_notices(),
        now_playing,
        length,
    })
}

fn current_summary(session: &Session) -> Option<TrackSummary> {
    session.playlist.current_track().map(|track| TrackSummary {
        title: track.title.clone(),
        artist: track.artist.clone(),
    })
}

// Raw blob for the native playback widget. 404 until a track is current.
#[get("/api/player/current")]
pub async fn current_audio(
    cookies: &CookieJar<'_>,
    store: &State<Arc<SessionStore>>,
) -> Option<(ContentType, Vec<u8>)> {
    let id = session_id(cookies);
    let audio = store.with_session(id, |session| {
        session.playlist.current_track().map(|track| track.audio.clone())
    })?;

    Some((audio_content_type(&audio), audio.to_vec()))
}

#[delete("/api/session")]
pub async fn end_session(
    cookies: &CookieJar<'_>,
    store: &State<Arc<SessionStore>>,
) -> Json<serde_json::Value> {
    let id = session_id(cookies);
    let ended = store.end_session(id);
    cookies.remove(Cookie::from(config::SESSION_COOKIE));

    Json(serde_json::json!({ "ended": ended }))
}

#[get("/api/stats")]
pub async fn get_stats(store: &State<Arc<SessionStore>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "active_sessions": store.active_sessions(),
        "server_time": chrono::Local::now().to_rfc3339(),
    }))
}

#[get("/api/health")]
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// Error catchers
#[catch(404)]
pub fn not_found() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": "Not found" }))
}

#[catch(422)]
pub fn unprocessable() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": "Malformed request parameters" }))
}

#[catch(500)]
pub fn server_error() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": "Internal server error" }))
}

/// Builds the Rocket application. Extracted from `main` so integration
/// tests can mount the same routes against a local client.
pub fn rocket_app(store: Arc<SessionStore>) -> Rocket<Build> {
    rocket::build()
        .manage(store)
        .mount(
            "/",
            routes![
                add_track,
                get_playlist,
                delete_track,
                play,
                next_track,
                previous_track,
                current_audio,
                end_session,
                get_stats,
                health_check,
            ],
        )
        .register("/", catchers![not_found, unprocessable, server_error])
}
