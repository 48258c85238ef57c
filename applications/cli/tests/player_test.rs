//! End-to-end tests of the interactive player against a mock backend

use leakify_cli::Player;
use leakify_client::{ClientConfig, LeakifyClient};
use leakify_playback::{PlaybackConfig, PlaybackState};
use leakify_storage::{MemoryStore, PreferenceStore};
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

type TestPlayer = Player<MemoryStore, Vec<u8>>;

async fn backend(songs: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/songs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "songs": songs })))
        .mount(&server)
        .await;
    server
}

async fn stream(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_bytes(vec![0u8; 32_000]))
        .mount(server)
        .await;
}

fn player(server: &MockServer) -> TestPlayer {
    let client = LeakifyClient::new(ClientConfig::new(server.uri())).unwrap();
    let prefs = PreferenceStore::load(MemoryStore::new()).unwrap();
    Player::new(&PlaybackConfig::default(), 128, client, prefs, Vec::new())
}

async fn pump_until(player: &mut TestPlayer, done: impl Fn(&TestPlayer) -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !done(player) {
            player.pump().await.unwrap();
        }
    })
    .await
    .expect("player did not reach the expected state");
}

fn printed(player: &TestPlayer) -> String {
    String::from_utf8_lossy(player.output()).into_owned()
}

async fn loaded(server: &MockServer) -> TestPlayer {
    let mut player = player(server);
    player.request_catalog();
    pump_until(&mut player, |p| p.session().catalog().view_len() > 0).await;
    player
}

// =============================================================================
// Library
// =============================================================================

#[tokio::test]
async fn test_catalog_loads_and_lists() {
    let server = backend(json!([
        {"display": "One", "filename": "a.mp3", "artist": "X"},
        {"display": "Two", "filename": "b.mp3", "artist": "Y", "tag": "LEAKED"}
    ]))
    .await;

    let mut player = loaded(&server).await;
    assert!(printed(&player).contains("2 songs"));

    player.handle_line("ls").unwrap();
    let out = printed(&player);
    assert!(out.contains("1  X - One"));
    assert!(out.contains("2  Y - Two [LEAKED]"));

    player.handle_line("artist Y").unwrap();
    assert!(printed(&player).contains("1 of 2 songs"));
    assert_eq!(player.session().catalog().view_len(), 1);
}

#[tokio::test]
async fn test_auth_failure_asks_for_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/songs"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut player = player(&server);
    player.request_catalog();
    pump_until(&mut player, |p| printed(p).contains("login required")).await;
    assert_eq!(player.session().catalog().view_len(), 0);
}

// =============================================================================
// Playback
// =============================================================================

#[tokio::test]
async fn test_play_records_recent() {
    let server = backend(json!([{"display": "One", "filename": "a.mp3", "artist": "X"}])).await;
    stream(&server, "/play/a.mp3", 200).await;

    let mut player = loaded(&server).await;
    player.handle_line("play 1").unwrap();
    pump_until(&mut player, |p| p.session().state() == PlaybackState::Playing).await;

    assert_eq!(player.session().recently_played().len(), 1);
    // 32000 bytes at 128 kbps
    assert_eq!(
        player.session().controller().duration(),
        Some(Duration::from_secs(2))
    );
    assert!(printed(&player).contains("▶ X - One"));
}

#[tokio::test]
async fn test_failed_stream_is_retried_with_fresh_url() {
    let server = backend(json!([{"display": "One", "filename": "a.mp3", "artist": "X"}])).await;
    stream(&server, "/play/a.mp3", 404).await;
    stream(&server, "/signed/a.mp3", 200).await;
    Mock::given(method("GET"))
        .and(path("/api/song-url"))
        .and(query_param("path", "a.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": "/signed/a.mp3"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut player = loaded(&server).await;
    player.handle_line("play 1").unwrap();
    pump_until(&mut player, |p| p.session().state() == PlaybackState::Playing).await;

    assert!(printed(&player).contains("fetching a fresh link"));
}

#[tokio::test]
async fn test_second_failure_gives_up() {
    let server = backend(json!([{"display": "One", "filename": "a.mp3", "artist": "X"}])).await;
    stream(&server, "/play/a.mp3", 500).await;
    stream(&server, "/signed/a.mp3", 500).await;
    Mock::given(method("GET"))
        .and(path("/api/song-url"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": "/signed/a.mp3"})))
        .mount(&server)
        .await;

    let mut player = loaded(&server).await;
    player.handle_line("play 1").unwrap();
    pump_until(&mut player, |p| p.session().state() == PlaybackState::Stopped).await;

    assert!(printed(&player).contains("could not play X - One"));
    assert!(player.session().recently_played().is_empty());
}

#[tokio::test]
async fn test_track_end_advances() {
    let server = backend(json!([
        {"display": "One", "filename": "a.mp3", "artist": "X"},
        {"display": "Two", "filename": "b.mp3", "artist": "X"}
    ]))
    .await;
    stream(&server, "/play/a.mp3", 200).await;
    stream(&server, "/play/b.mp3", 200).await;

    let mut player = loaded(&server).await;
    player.handle_line("play 1").unwrap();
    pump_until(&mut player, |p| p.session().state() == PlaybackState::Playing).await;

    // Far past the estimated two seconds
    player
        .tick(Instant::now() + Duration::from_secs(10))
        .unwrap();
    assert_eq!(player.session().navigator().current(), Some(1));

    pump_until(&mut player, |p| {
        p.session().state() == PlaybackState::Playing && p.session().recently_played().len() == 2
    })
    .await;
}

// =============================================================================
// Commands and output
// =============================================================================

#[tokio::test]
async fn test_bad_input_is_reported_not_fatal() {
    let server = MockServer::start().await;
    let mut player = player(&server);

    assert!(player.handle_line("dance").unwrap());
    assert!(player.handle_line("vol 300").unwrap());
    assert!(!player.handle_line("quit").unwrap());

    let out = printed(&player);
    assert!(out.contains("Unknown command: dance"));
    assert!(out.contains("Invalid argument for `vol`"));
}

#[tokio::test]
async fn test_sleep_timer_expires_on_tick() {
    let server = MockServer::start().await;
    let mut player = player(&server);

    player.handle_line("sleep 1").unwrap();
    assert!(printed(&player).contains("sleep timer set, 1:00 left"));

    player
        .tick(Instant::now() + Duration::from_secs(61))
        .unwrap();
    assert!(printed(&player).contains("sleep timer expired"));
}

#[tokio::test]
async fn test_json_mode_prints_tagged_events() {
    let server = MockServer::start().await;
    let mut player = player(&server).with_json(true);

    player.greet().unwrap();
    player.handle_line("shuffle").unwrap();
    let out = printed(&player);
    let event: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(event["event"], "modes_changed");
    assert_eq!(event["shuffle"], true);
}

#[tokio::test]
async fn test_text_mode_greets() {
    let server = MockServer::start().await;
    let mut player = player(&server);

    player.greet().unwrap();
    assert_eq!(printed(&player), "type `help` for commands\n");
}
