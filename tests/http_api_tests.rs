// HTTP surface tests, run against the same Rocket app `main` launches,
// built through `handlers::rocket_app` and driven with the local client.

use std::sync::Arc;

use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;
use serde_json::Value;
use webplaylist::handlers::rocket_app;
use webplaylist::SessionStore;

const MP3_BODY: &[u8] = b"ID3\x03\x00fake-mp3-frames";

fn client() -> Client {
    let store = Arc::new(SessionStore::new());
    Client::tracked(rocket_app(store)).expect("valid rocket app")
}

fn add_track(client: &Client, title: &str, artist: &str) -> Value {
    let response = client
        .post(format!("/api/tracks?title={}&artist={}", title, artist))
        .header(ContentType::new("audio", "mpeg"))
        .body(MP3_BODY)
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    response.into_json().expect("json response")
}

fn playlist_entries(client: &Client) -> (Vec<String>, u64) {
    let response = client.get("/api/playlist").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().expect("json response");
    let tracks = body["tracks"]
        .as_array()
        .expect("tracks array")
        .iter()
        .map(|entry| entry.as_str().expect("string entry").to_string())
        .collect();
    (tracks, body["length"].as_u64().expect("length"))
}

#[test]
fn add_list_delete_roundtrip() {
    let client = client();

    let body = add_track(&client, "A", "X");
    assert_eq!(body["notices"][0]["level"], "success");
    assert_eq!(body["notices"][0]["message"], "Added: A by X");
    assert_eq!(body["length"], 1);

    add_track(&client, "B", "Y");
    let (tracks, length) = playlist_entries(&client);
    assert_eq!(tracks, vec!["1. A by X", "2. B by Y"]);
    assert_eq!(length, 2);

    let response = client.delete("/api/tracks?title=A").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().expect("json response");
    assert_eq!(body["notices"][0]["message"], "Deleted: A");
    assert_eq!(body["length"], 1);

    let (tracks, _) = playlist_entries(&client);
    assert_eq!(tracks, vec!["1. B by Y"]);
}

#[test]
fn delete_unknown_title_reports_not_found() {
    let client = client();
    add_track(&client, "A", "X");

    let response = client.delete("/api/tracks?title=Q").dispatch();
    let body: Value = response.into_json().expect("json response");
    assert_eq!(body["notices"][0]["level"], "error");
    assert_eq!(body["notices"][0]["message"], "Song not found.");
    assert_eq!(body["length"], 1);
}

#[test]
fn upload_with_non_audio_content_type_is_rejected() {
    let client = client();

    let response = client
        .post("/api/tracks?title=A&artist=X")
        .header(ContentType::JSON)
        .body(MP3_BODY)
        .dispatch();
    assert_eq!(response.status(), Status::UnsupportedMediaType);

    let (tracks, length) = playlist_entries(&client);
    assert!(tracks.is_empty());
    assert_eq!(length, 0);
}

#[test]
fn empty_title_gets_boundary_warning_without_insertion() {
    let client = client();

    let response = client
        .post("/api/tracks?title=&artist=X")
        .header(ContentType::new("audio", "wav"))
        .body(b"RIFFxxxxWAVE".as_slice())
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().expect("json response");
    assert_eq!(body["notices"][0]["level"], "warning");
    assert_eq!(
        body["notices"][0]["message"],
        "Please enter title, artist, and audio file."
    );
    assert_eq!(body["length"], 0);
}

#[test]
fn transport_moves_the_cursor_and_warns_at_the_ends() {
    let client = client();
    add_track(&client, "A", "X");
    add_track(&client, "B", "Y");

    // previous at the head warns and stays
    let response = client.post("/api/player/previous").dispatch();
    let body: Value = response.into_json().expect("json response");
    assert_eq!(body["notices"][0]["message"], "Already at first song.");
    assert_eq!(body["now_playing"]["title"], "A");

    // next moves to B
    let response = client.post("/api/player/next").dispatch();
    let body: Value = response.into_json().expect("json response");
    assert!(body["notices"].as_array().expect("notices").is_empty());
    assert_eq!(body["now_playing"]["title"], "B");

    // next at the tail warns and stays
    let response = client.post("/api/player/next").dispatch();
    let body: Value = response.into_json().expect("json response");
    assert_eq!(body["notices"][0]["message"], "End of playlist.");
    assert_eq!(body["now_playing"]["title"], "B");
}

#[test]
fn play_reports_now_playing_and_serves_the_blob() {
    let client = client();
    add_track(&client, "A", "X");

    let response = client.post("/api/player/play").dispatch();
    let body: Value = response.into_json().expect("json response");
    assert_eq!(body["notices"][0]["level"], "info");
    assert_eq!(body["notices"][0]["message"], "Now playing: A by X");
    assert_eq!(body["now_playing"]["artist"], "X");

    let response = client.get("/api/player/current").dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(
        response.content_type(),
        Some(ContentType::new("audio", "mpeg"))
    );
    assert_eq!(response.into_bytes().expect("body"), MP3_BODY.to_vec());
}

#[test]
fn play_on_empty_playlist_warns() {
    let client = client();

    let response = client.post("/api/player/play").dispatch();
    let body: Value = response.into_json().expect("json response");
    assert_eq!(body["notices"][0]["level"], "warning");
    assert!(body["now_playing"].is_null());

    let response = client.get("/api/player/current").dispatch();
    assert_eq!(response.status(), Status::NotFound);
}

#[test]
fn session_cookie_scopes_the_playlist() {
    // Untracked client: cookies are only sent when attached explicitly
    let store = Arc::new(SessionStore::new());
    let client = Client::untracked(rocket_app(store)).expect("valid rocket app");

    let response = client
        .post("/api/tracks?title=A&artist=X")
        .header(ContentType::new("audio", "mpeg"))
        .body(MP3_BODY)
        .dispatch();
    let cookie = response
        .cookies()
        .get(webplaylist::config::SESSION_COOKIE)
        .expect("session cookie assigned")
        .clone();

    // With the cookie, the same playlist answers
    let response = client.get("/api/playlist").cookie(cookie).dispatch();
    let body: Value = response.into_json().expect("json response");
    assert_eq!(body["length"], 1);

    // Without it, a brand new session answers with an empty playlist
    let response = client.get("/api/playlist").dispatch();
    let body: Value = response.into_json().expect("json response");
    assert_eq!(body["length"], 0);
}

#[test]
fn ending_the_session_discards_the_playlist() {
    let client = client();
    add_track(&client, "A", "X");

    let response = client.delete("/api/session").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().expect("json response");
    assert_eq!(body["ended"], true);

    let (tracks, length) = playlist_entries(&client);
    assert!(tracks.is_empty());
    assert_eq!(length, 0);
}

#[test]
fn stats_and_health_endpoints_respond() {
    let client = client();
    add_track(&client, "A", "X");

    let response = client.get("/api/stats").dispatch();
    assert_eq!(response.status(), Status::Ok);
    let body: Value = response.into_json().expect("json response");
    assert_eq!(body["active_sessions"], 1);
    assert!(body["server_time"].as_str().is_some());

    let response = client.get("/api/health").dispatch();
    let body: Value = response.into_json().expect("json response");
    assert_eq!(body["status"], "ok");
}
