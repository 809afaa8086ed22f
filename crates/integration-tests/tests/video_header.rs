//! End-to-end tests for the header video script and its CSP authorization.
//!
//! Each test drives the full middleware stack: the event page runs the
//! content-injection hook, the security headers set the baseline policy, and
//! the finalization middleware merges the nonce and media origin.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use video_header_core::csp::{MEDIA_SRC, Policy, SCRIPT_SRC};
use video_header_integration_tests::{TestApp, body_string, csp, policy_nonce, script_nonce};
use video_header_server::config::{DEFAULT_BASE_POLICY, ServerConfig};

// =============================================================================
// Nonce Correlation
// =============================================================================

#[tokio::test]
async fn test_script_nonce_matches_policy_nonce() {
    let app = TestApp::new();
    app.configure("acme", "conf", "https://cdn.example.com/intro.mp4")
        .await;

    let response = app.get("/acme/conf/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let policy = csp(&response).expect("policy header");
    let html = body_string(response).await;

    let in_page = script_nonce(&html).expect("script nonce");
    let in_policy = policy_nonce(&policy).expect("policy nonce");
    assert_eq!(in_page, in_policy);
}

#[tokio::test]
async fn test_each_response_gets_a_distinct_nonce() {
    let app = TestApp::new();
    app.configure("acme", "conf", "https://cdn.example.com/intro.mp4")
        .await;

    let first = app.get("/acme/conf/").await;
    let second = app.get("/acme/conf/").await;

    let first_nonce = policy_nonce(&csp(&first).expect("policy")).expect("nonce");
    let second_nonce = policy_nonce(&csp(&second).expect("policy")).expect("nonce");
    assert_ne!(first_nonce, second_nonce);

    // The second page must not carry the first page's nonce, nor vice versa
    let second_html = body_string(second).await;
    assert_eq!(script_nonce(&second_html), Some(second_nonce.as_str()));
    assert!(!second_html.contains(&first_nonce));
}

#[tokio::test]
async fn test_concurrent_requests_do_not_share_nonces() {
    let app = TestApp::new();
    app.configure("acme", "conf", "https://cdn.example.com/intro.mp4")
        .await;

    let mut handles = Vec::new();
    for _ in 0..16 {
        let router = app.router.clone();
        handles.push(tokio::spawn(async move {
            let request = Request::get("/acme/conf/").body(Body::empty()).unwrap();
            let response = router.oneshot(request).await.unwrap();
            let policy = csp(&response).expect("policy");
            let html = body_string(response).await;
            (
                policy_nonce(&policy).expect("policy nonce"),
                script_nonce(&html).expect("script nonce").to_owned(),
            )
        }));
    }

    let mut seen = std::collections::HashSet::new();
    for handle in handles {
        let (in_policy, in_page) = handle.await.expect("task");
        assert_eq!(in_policy, in_page);
        assert!(seen.insert(in_policy), "nonce reused across responses");
    }
}

// =============================================================================
// Policy Merging
// =============================================================================

#[tokio::test]
async fn test_baseline_policy_is_extended_not_replaced() {
    let app = TestApp::new();
    app.configure("acme", "conf", "https://cdn.example.com:8443/path/to/video.mp4")
        .await;

    let response = app.get("/acme/conf/").await;
    let policy = Policy::parse(&csp(&response).expect("policy"));
    let baseline = Policy::parse(DEFAULT_BASE_POLICY);

    // Every baseline directive and source survives
    for directive in &baseline {
        for source in directive.sources() {
            assert!(
                policy.contains_source(directive.name(), source),
                "lost {} {source}",
                directive.name()
            );
        }
    }

    assert_eq!(
        policy.sources(MEDIA_SRC).expect("media-src"),
        ["'self'", "https://cdn.example.com:8443"]
    );
    let script_src = policy.sources(SCRIPT_SRC).expect("script-src");
    assert_eq!(script_src.len(), 2);
    assert_eq!(script_src[0], "'self'");
    assert!(script_src[1].starts_with("'nonce-"));
    assert!(!policy.to_string().contains("/path/to/video.mp4"));
    assert!(!policy.to_string().contains("'unsafe-inline'"));
}

#[tokio::test]
async fn test_custom_baseline_keeps_unknown_directives() {
    let app = TestApp::with_config(ServerConfig {
        base_policy: "default-src 'self'; report-uri /csp-report; upgrade-insecure-requests"
            .to_string(),
        ..ServerConfig::default()
    });
    app.configure("acme", "conf", "https://cdn.example.com/intro.mp4")
        .await;

    let response = app.get("/acme/conf/").await;
    let policy = csp(&response).expect("policy");
    let nonce = policy_nonce(&policy).expect("nonce");

    assert_eq!(
        policy,
        format!(
            "default-src 'self'; report-uri /csp-report; upgrade-insecure-requests; \
             media-src https://cdn.example.com; script-src 'nonce-{nonce}'"
        )
    );
}

// =============================================================================
// Fail Closed
// =============================================================================

#[tokio::test]
async fn test_no_video_configured_leaves_page_and_policy_alone() {
    let app = TestApp::new();

    let response = app.get("/acme/conf/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(csp(&response).as_deref(), Some(DEFAULT_BASE_POLICY));

    let html = body_string(response).await;
    assert!(!html.contains("<script"));
    assert!(!html.contains("nonce"));
}

#[tokio::test]
async fn test_other_events_are_not_affected() {
    let app = TestApp::new();
    app.configure("acme", "conf", "https://cdn.example.com/intro.mp4")
        .await;

    let response = app.get("/acme/other/").await;
    assert_eq!(csp(&response).as_deref(), Some(DEFAULT_BASE_POLICY));
    assert!(!body_string(response).await.contains("<script"));
}

#[tokio::test]
async fn test_non_page_responses_keep_baseline() {
    let app = TestApp::new();

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(csp(&response).as_deref(), Some(DEFAULT_BASE_POLICY));
    assert_eq!(body_string(response).await, "ok");
}

// =============================================================================
// Page Content
// =============================================================================

#[tokio::test]
async fn test_page_has_logo_and_script() {
    let app = TestApp::new();
    app.configure("acme", "conf", "https://cdn.example.com/intro.mp4")
        .await;

    let html = body_string(app.get("/acme/conf").await).await;
    assert!(html.contains("class=\"page-header pager-header-with-logo logo-large\""));
    assert!(html.contains("video.src = \"https://cdn.example.com/intro.mp4\";"));
    assert_eq!(html.matches("<script").count(), 1);
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = TestApp::new();
    let response = app.get("/acme/conf/").await;
    let headers = response.headers();

    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("referrer-policy").unwrap(), "no-referrer");
}
