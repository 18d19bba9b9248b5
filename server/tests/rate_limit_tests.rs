use actix_web::{http::StatusCode, test, web, App};
use link_library::config::AppConfig;
use link_library::handlers;
use link_library::middleware::RateLimiter;
use link_library::state::AppState;
use serde_json::json;
use std::net::{IpAddr, Ipv4Addr};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

const WINDOW: Duration = Duration::from_secs(60);

fn login_state(dir: &TempDir, login_rate_limit: usize) -> AppState {
    std::fs::write(
        dir.path().join("admin.json"),
        r#"{"username": "admin", "password_hash": "secret"}"#,
    )
    .unwrap();

    AppState::bootstrap(AppConfig {
        library_file: dir.path().join("library_data.json"),
        admin_file: dir.path().join("admin.json"),
        login_rate_limit,
        ..AppConfig::default()
    })
}

fn login_from(peer: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/admin/login")
        .peer_addr(peer.parse().unwrap())
        .set_json(json!({"username": "admin", "password": password}))
}

#[::core::prelude::v1::test]
fn test_rate_limit_allows_under_limit() {
    let limiter = RateLimiter::new(10, WINDOW);
    let ip = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));

    for _ in 0..9 {
        limiter.record_failure(ip);
    }

    assert!(!limiter.is_limited(ip), "Should allow attempts under limit");
}

#[::core::prelude::v1::test]
fn test_rate_limit_blocks_over_limit() {
    let limiter = RateLimiter::new(10, WINDOW);
    let ip = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));

    for _ in 0..10 {
        limiter.record_failure(ip);
    }

    assert!(limiter.is_limited(ip), "Should block once failures hit the limit");
}

#[::core::prelude::v1::test]
fn test_rate_limit_per_ip() {
    let limiter = RateLimiter::new(3, WINDOW);
    let ip1 = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1));
    let ip2 = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 2));

    for _ in 0..3 {
        limiter.record_failure(ip1);
    }

    assert!(limiter.is_limited(ip1));
    assert!(!limiter.is_limited(ip2));
}

#[::core::prelude::v1::test]
fn test_window_expiration() {
    let limiter = RateLimiter::new(2, Duration::from_millis(20));
    let ip = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));

    limiter.record_failure(ip);
    limiter.record_failure(ip);
    assert!(limiter.is_limited(ip));

    thread::sleep(Duration::from_millis(40));
    assert!(!limiter.is_limited(ip));
}

#[::core::prelude::v1::test]
fn test_reset_forgets_failures() {
    let limiter = RateLimiter::new(2, WINDOW);
    let ip = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));

    limiter.record_failure(ip);
    limiter.record_failure(ip);
    assert!(limiter.is_limited(ip));

    limiter.reset(ip);
    assert!(!limiter.is_limited(ip));
    assert_eq!(limiter.tracked_addresses(), 0);
}

#[::core::prelude::v1::test]
fn test_concurrent_failures() {
    use std::sync::Arc;

    let limiter = Arc::new(RateLimiter::new(10, WINDOW));
    let ip = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));
    let mut handles = vec![];

    for _ in 0..5 {
        let limiter_clone = Arc::clone(&limiter);
        let handle = thread::spawn(move || {
            for _ in 0..3 {
                limiter_clone.record_failure(ip);
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // 15 failures against a limit of 10
    assert!(limiter.is_limited(ip));
}

#[actix_web::test]
async fn test_failed_logins_are_throttled_per_peer() {
    let dir = tempfile::tempdir().unwrap();
    let state = login_state(&dir, 2);

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure),
    )
    .await;

    for _ in 0..2 {
        let req = login_from("203.0.113.9:5555", "guess").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    let req = login_from("203.0.113.9:5555", "guess").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");

    // Throttled peers are turned away even with the right password.
    let req = login_from("203.0.113.9:5555", "secret").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let req = login_from("203.0.113.10:5555", "guess").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    assert!(state
        .logs
        .get_all()
        .iter()
        .any(|entry| entry.ends_with("Login throttled for 203.0.113.9")));
}

#[actix_web::test]
async fn test_successful_logins_are_never_throttled() {
    let dir = tempfile::tempdir().unwrap();
    let state = login_state(&dir, 2);

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure),
    )
    .await;

    for _ in 0..5 {
        let req = login_from("10.0.0.1:4000", "secret").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    assert_eq!(state.sessions.active_count(), 5);
}

#[actix_web::test]
async fn test_successful_login_clears_earlier_failures() {
    let dir = tempfile::tempdir().unwrap();
    let state = login_state(&dir, 2);

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure),
    )
    .await;

    let req = login_from("10.0.0.1:4000", "guess").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = login_from("10.0.0.1:4000", "secret").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.login_limiter.tracked_addresses(), 0);

    // The failure before the success no longer counts.
    let req = login_from("10.0.0.1:4000", "guess").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_zero_limit_never_throttles_logins() {
    let dir = tempfile::tempdir().unwrap();
    let state = login_state(&dir, 0);

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(handlers::configure),
    )
    .await;

    for _ in 0..3 {
        let req = login_from("10.0.0.2:4000", "guess").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    let req = login_from("10.0.0.2:4000", "secret").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
