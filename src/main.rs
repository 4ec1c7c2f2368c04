use std::net::IpAddr;
use std::sync::Arc;
use std::thread;

use rocket::{launch, Build, Rocket};

use webplaylist::handlers;
use webplaylist::session::{self, SessionStore};
use webplaylist::config;

#[launch]
fn rocket() -> Rocket<Build> {
    // Initialize logging
    env_logger::init();

    println!("============================================================");
    println!("Web Playlist - session-scoped playlists with playback cursor");
    println!("============================================================");

    let store = Arc::new(SessionStore::new());

    // Discard playlists whose session has gone idle
    let sweeper_store = store.clone();
    thread::spawn(move || session::idle_session_sweeper(sweeper_store));

    println!("🎵 One independent playlist per session cookie");
    println!("🌐 Server starting at: http://{}:{}", config::HOST, config::PORT);
    println!("📊 Stats available at: http://{}:{}/api/stats", config::HOST, config::PORT);
    println!("============================================================");

    let figment = rocket::Config::figment()
        .merge(("address", config::HOST.parse::<IpAddr>().expect("valid listen address")))
        .merge(("port", config::PORT));

    handlers::rocket_app(store).configure(figment)
}
