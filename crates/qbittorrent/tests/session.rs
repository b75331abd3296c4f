mod common;

use common::MockWebUi;
use qbittorrent::{ClientConfig, Params, QBittorrentClient, QBittorrentError};

#[tokio::test]
async fn login_stores_cookie_for_later_requests() {
    common::init_tracing();
    let server = MockWebUi::start().await;
    server.accept_login("abc123").await;
    server.respond("app/version", 200, "v4.6.2").await;

    let client = QBittorrentClient::new(&server.url).unwrap();
    assert!(!client.is_authenticated());

    client.login("admin", "adminadmin").await.unwrap();
    assert!(client.is_authenticated());

    let version = client.application_version().await.unwrap();
    assert_eq!(version, "v4.6.2");

    client.pause("aaa").await.unwrap();
    client.post("torrents/topPrio", &Params::new()).await.unwrap();

    let requests = server.requests().await;
    assert_eq!(requests.len(), 4);
    assert!(requests[0].header("cookie").is_none());
    for request in &requests[1..] {
        assert_eq!(request.header("cookie"), Some("SID=abc123"));
    }
}

#[tokio::test]
async fn login_posts_form_credentials_with_referer() {
    let server = MockWebUi::start().await;
    server.accept_login("abc123").await;

    let client = QBittorrentClient::new(&server.url).unwrap();
    client.login("admin", "p@ss word").await.unwrap();

    let request = server.last_request().await;
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/v2/auth/login");
    assert_eq!(
        request.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(request.body, "username=admin&password=p%40ss+word");
    assert_eq!(
        request.header("referer"),
        Some(format!("{}/api/v2/", server.url).as_str())
    );
}

#[tokio::test]
async fn login_without_cookie_fails_regardless_of_status() {
    let server = MockWebUi::start().await;
    let client = QBittorrentClient::new(&server.url).unwrap();

    for status in [200, 403] {
        server.respond("auth/login", status, "Fails.").await;
        let err = client.login("admin", "wrong").await.unwrap_err();
        assert!(
            matches!(err, QBittorrentError::MissingSessionCookie),
            "status {status}: {err:?}"
        );
        assert!(err.is_auth_error());
        assert!(!client.is_authenticated());
    }
}

#[tokio::test]
async fn login_with_malformed_cookie_keeps_previous_session() {
    let server = MockWebUi::start().await;
    server.accept_login("good").await;

    let client = QBittorrentClient::new(&server.url).unwrap();
    client.login("admin", "adminadmin").await.unwrap();

    server
        .respond_with_headers("auth/login", 200, &[("set-cookie", "garbage")], "Ok.")
        .await;
    let err = client.login("admin", "adminadmin").await.unwrap_err();
    assert!(matches!(err, QBittorrentError::MissingSessionCookie), "{err:?}");
    assert!(client.is_authenticated());

    client.pause("aaa").await.unwrap();
    assert_eq!(server.last_request().await.header("cookie"), Some("SID=good"));
}

#[tokio::test]
async fn login_with_only_malformed_cookie_is_not_authenticated() {
    let server = MockWebUi::start().await;
    server
        .respond_with_headers("auth/login", 200, &[("set-cookie", "garbage")], "Ok.")
        .await;

    let client = QBittorrentClient::new(&server.url).unwrap();
    let err = client.login("admin", "adminadmin").await.unwrap_err();
    assert!(matches!(err, QBittorrentError::MissingSessionCookie), "{err:?}");
    assert!(!client.is_authenticated());

    client.pause("aaa").await.unwrap();
    assert!(server.last_request().await.header("cookie").is_none());
}

#[tokio::test]
async fn login_skips_malformed_cookie_before_valid_one() {
    let server = MockWebUi::start().await;
    server
        .respond_with_headers(
            "auth/login",
            200,
            &[("set-cookie", "garbage"), ("set-cookie", "SID=second; path=/")],
            "Ok.",
        )
        .await;

    let client = QBittorrentClient::new(&server.url).unwrap();
    client.login("admin", "adminadmin").await.unwrap();
    client.resume("aaa").await.unwrap();

    assert_eq!(server.last_request().await.header("cookie"), Some("SID=second"));
}

#[tokio::test]
async fn base_url_with_query_is_rejected() {
    let server = MockWebUi::start().await;
    let err = QBittorrentClient::new(format!("{}/?x=1", server.url)).unwrap_err();
    assert!(matches!(err, QBittorrentError::InvalidUrl { .. }), "{err:?}");
    assert!(server.requests().await.is_empty());
}

#[tokio::test]
async fn login_with_non_200_status_is_rejected_even_with_cookie() {
    let server = MockWebUi::start().await;
    server
        .respond_with_headers(
            "auth/login",
            403,
            &[("set-cookie", "SID=banned; path=/")],
            "Your IP address has been banned after too many failed authentication attempts.",
        )
        .await;

    let client = QBittorrentClient::new(&server.url).unwrap();
    let err = client.login("admin", "adminadmin").await.unwrap_err();
    assert!(matches!(err, QBittorrentError::AuthRejected { status: 403 }));
    assert!(!client.is_authenticated());

    client.pause("aaa").await.unwrap();
    assert!(server.last_request().await.header("cookie").is_none());
}

#[tokio::test]
async fn login_keeps_only_first_cookie() {
    let server = MockWebUi::start().await;
    server
        .respond_with_headers(
            "auth/login",
            200,
            &[
                ("set-cookie", "SID=first; path=/"),
                ("set-cookie", "other=second; path=/"),
            ],
            "Ok.",
        )
        .await;

    let client = QBittorrentClient::new(&server.url).unwrap();
    client.login("admin", "adminadmin").await.unwrap();
    client.resume("aaa").await.unwrap();

    assert_eq!(server.last_request().await.header("cookie"), Some("SID=first"));
}

#[tokio::test]
async fn relogin_replaces_session_cookie() {
    let server = MockWebUi::start().await;
    let client = QBittorrentClient::new(&server.url).unwrap();

    server.accept_login("one").await;
    client.login("admin", "adminadmin").await.unwrap();
    server.accept_login("two").await;
    client.login("admin", "adminadmin").await.unwrap();

    client.recheck("aaa").await.unwrap();
    assert_eq!(server.last_request().await.header("cookie"), Some("SID=two"));
}

#[tokio::test]
async fn logout_hits_endpoint_and_drops_session() {
    let server = MockWebUi::start().await;
    server.accept_login("abc123").await;

    let client = QBittorrentClient::new(&server.url).unwrap();
    client.login("admin", "adminadmin").await.unwrap();

    let response = client.logout().await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(!client.is_authenticated());

    let logout = server.last_request().await;
    assert_eq!(logout.method, "GET");
    assert_eq!(logout.path, "/api/v2/auth/logout");
    assert_eq!(logout.header("cookie"), Some("SID=abc123"));

    client.reannounce("aaa").await.unwrap();
    assert!(server.last_request().await.header("cookie").is_none());
}

#[tokio::test]
async fn connect_logs_in_when_credentials_are_configured() {
    let server = MockWebUi::start().await;
    server.accept_login("cfg").await;

    let config = ClientConfig::new(&server.url).credentials("admin", "adminadmin");
    let client = QBittorrentClient::connect(&config).await.unwrap();
    assert!(client.is_authenticated());

    let anonymous = QBittorrentClient::connect(&ClientConfig::new(&server.url))
        .await
        .unwrap();
    assert!(!anonymous.is_authenticated());
    assert_eq!(server.requests().await.len(), 1);
}

#[tokio::test]
async fn transport_errors_carry_endpoint() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let client = QBittorrentClient::new(format!("http://{addr}")).unwrap();
    let err = client.login("admin", "adminadmin").await.unwrap_err();
    match err {
        QBittorrentError::Transport { endpoint, .. } => assert_eq!(endpoint, "auth/login"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!client.is_authenticated());
}
