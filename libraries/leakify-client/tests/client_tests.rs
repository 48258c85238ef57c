//! Tests for the Leakify backend client.
//!
//! These tests use mock servers to verify client behavior without
//! requiring a real backend.

use leakify_client::{ClientConfig, ClientError, LeakifyClient};
use leakify_core::{LeakifyError, LibraryBackend};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> LeakifyClient {
    LeakifyClient::new(ClientConfig::new(server.uri())).unwrap()
}

fn songs_body() -> serde_json::Value {
    json!({
        "songs": [
            {"display": "One", "filename": "X/One.mp3", "artist": "X", "subfolder": "", "tag": "", "url": "/play/X%2FOne.mp3"},
            {"display": "Two", "filename": "Y/Two.mp3", "artist": "Y", "subfolder": "Sessions", "tag": "LEAKED", "url": "/play/Y%2FTwo.mp3"}
        ],
        "count": 2
    })
}

// =============================================================================
// Login
// =============================================================================

mod login {
    use super::*;

    #[tokio::test]
    async fn test_login_success_sends_user_and_pass() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .and(body_json(json!({"user": "alice", "pass": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.login("alice", "secret").await.unwrap();
        assert!(client.is_logged_in().await);
    }

    #[tokio::test]
    async fn test_login_rejected_with_ok_false() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"ok": false, "error": "Wrong password"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.login("alice", "nope").await.unwrap_err();
        assert!(matches!(err, ClientError::AuthFailed(ref msg) if msg == "Wrong password"));
        assert!(!client.is_logged_in().await);
    }

    #[tokio::test]
    async fn test_login_401() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server).login("a", "b").await.unwrap_err();
        assert!(matches!(err, ClientError::AuthFailed(_)));
    }

    #[tokio::test]
    async fn test_session_cookie_is_sent_afterwards() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "session=abc123; Path=/")
                    .set_body_json(json!({"ok": true})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/songs"))
            .and(header("cookie", "session=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(songs_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.login("alice", "secret").await.unwrap();
        assert_eq!(client.songs().await.unwrap().len(), 2);
    }
}

// =============================================================================
// Library
// =============================================================================

mod library {
    use super::*;

    #[tokio::test]
    async fn test_songs_parses_backend_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/songs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(songs_body()))
            .mount(&server)
            .await;

        let songs = client_for(&server).songs().await.unwrap();
        assert_eq!(songs[0].title, "One");
        assert_eq!(songs[0].tag, None);
        assert_eq!(songs[0].subfolder, None);
        assert_eq!(songs[1].tag.as_deref(), Some("LEAKED"));
        assert_eq!(songs[1].subfolder.as_deref(), Some("Sessions"));
    }

    #[tokio::test]
    async fn test_songs_401_is_auth_required() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/songs"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server).songs().await.unwrap_err();
        assert!(matches!(err, ClientError::AuthRequired));
    }

    #[tokio::test]
    async fn test_songs_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/songs"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client_for(&server).songs().await.unwrap_err();
        assert!(matches!(err, ClientError::ServerError { status: 500, ref message } if message == "boom"));
    }

    #[tokio::test]
    async fn test_songs_garbage_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/songs"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).songs().await.unwrap_err();
        assert!(matches!(err, ClientError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_song_url_passes_path_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/song-url"))
            .and(query_param("path", "X/One & Two.mp3"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"url": "https://cdn.example/one?sig=9"})),
            )
            .mount(&server)
            .await;

        let url = client_for(&server)
            .song_url("X/One & Two.mp3")
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.example/one?sig=9");
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Nothing listens on port 9 of localhost
        let client = LeakifyClient::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();
        let err = client.songs().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::ServerUnreachable(_) | ClientError::Request(_)
        ));
    }
}

// =============================================================================
// Session renewal and the LibraryBackend seam
// =============================================================================

mod relogin {
    use super::*;

    async fn mount_login(server: &MockServer, expected: u64) {
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(expected)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_expired_session_logs_in_again_once() {
        let server = MockServer::start().await;
        mount_login(&server, 2).await;
        Mock::given(method("GET"))
            .and(path("/api/songs"))
            .respond_with(ResponseTemplate::new(401))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/songs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(songs_body()))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.login("alice", "secret").await.unwrap();

        let songs = client.fetch_songs().await.unwrap();
        assert_eq!(songs.len(), 2);
    }

    #[tokio::test]
    async fn test_without_credentials_auth_error_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/songs"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_songs().await.unwrap_err();
        assert!(matches!(err, LeakifyError::AuthRequired));
    }

    #[tokio::test]
    async fn test_fresh_url_is_resolved_against_base() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/song-url"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"url": "/play/a.mp3?sig=2"})))
            .mount(&server)
            .await;

        let url = client_for(&server).fresh_url("a.mp3").await.unwrap();
        assert_eq!(url, format!("{}/play/a.mp3?sig=2", server.uri()));
    }
}
