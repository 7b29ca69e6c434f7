mod common;

use axum::http::StatusCode;
use common::{parse_body, tenant_host, TestApp, MAIN_HOST};
use serde_json::json;

#[tokio::test]
async fn test_allow_listed_hosts_resolve_as_main_domain() {
    let app = TestApp::new().await;

    // Both allow-list entries work, including the one carrying a port.
    for host in [MAIN_HOST, "localhost:3000"] {
        let res = app
            .send(
                "POST",
                host,
                "/api/v1/signup",
                None,
                Some(json!({
                    "name": "Parkir Satu",
                    "institution_name": "Universitas Satu",
                    "slug": format!("kampus-{}", host.replace([':', '.'], "-")),
                    "username": format!("owner-{}", host.replace([':', '.'], "-")),
                    "password": "password123"
                })),
            )
            .await;
        assert_eq!(res.status(), StatusCode::OK, "host {}", host);
    }
}

#[tokio::test]
async fn test_unknown_host_is_rejected_before_any_handler() {
    let app = TestApp::new().await;

    let res = app
        .send("GET", "nope.parkify.test", "/api/v1/areas", None, None)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Even login is unreachable on an unresolvable host.
    let res = app
        .send(
            "POST",
            "nope.parkify.test",
            "/api/v1/auth/login",
            None,
            Some(json!({"username": "x", "password": "y"})),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pending_tenant_is_not_routable() {
    let app = TestApp::new().await;

    app.signup_tenant("kampus1", "owner1", "password123").await;

    let res = app
        .send(
            "POST",
            &tenant_host("kampus1"),
            "/api/v1/auth/login",
            None,
            Some(json!({"username": "owner1", "password": "password123"})),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deactivated_tenant_resolves_like_an_unknown_slug() {
    let app = TestApp::new().await;

    let signup = app.signup_tenant("kampus2", "owner2", "password123").await;
    let tenant_id = signup["tenant_id"].as_i64().unwrap();
    app.approve_tenant(tenant_id).await;

    // Routable while approved and active.
    let auth = app.login(&tenant_host("kampus2"), "owner2", "password123").await;

    let admin = app.superadmin().await;
    let res = app
        .send(
            "POST",
            MAIN_HOST,
            &format!("/api/v1/admin/tenants/{}/deactivate", tenant_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    // Deactivation takes effect on the very next request, even with a
    // previously issued token.
    let res = app
        .send("GET", &tenant_host("kampus2"), "/api/v1/areas", Some(&auth), None)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Reactivation restores routing.
    let res = app
        .send(
            "POST",
            MAIN_HOST,
            &format!("/api/v1/admin/tenants/{}/activate", tenant_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .send("GET", &tenant_host("kampus2"), "/api/v1/areas", Some(&auth), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_port_is_stripped_before_slug_extraction() {
    let app = TestApp::new().await;

    let signup = app.signup_tenant("kampus3", "owner3", "password123").await;
    app.approve_tenant(signup["tenant_id"].as_i64().unwrap()).await;

    let res = app
        .send(
            "POST",
            "kampus3.parkify.test:8080",
            "/api/v1/auth/login",
            None,
            Some(json!({"username": "owner3", "password": "password123"})),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_slug_must_match_the_whole_first_label() {
    let app = TestApp::new().await;

    let signup = app.signup_tenant("kam", "owner4", "password123").await;
    app.approve_tenant(signup["tenant_id"].as_i64().unwrap()).await;

    // "kam" is routable, but hosts whose first label merely starts with
    // the slug are not.
    let res = app.send("GET", &tenant_host("kam"), "/api/v1/areas", None, None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .send("GET", "kampus.parkify.test", "/api/v1/areas", None, None)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tenant_endpoints_hidden_on_main_domain_and_vice_versa() {
    let app = TestApp::new().await;

    let signup = app.signup_tenant("kampus5", "owner5", "password123").await;
    let tenant_id = signup["tenant_id"].as_i64().unwrap();
    app.approve_tenant(tenant_id).await;

    // Registry administration does not exist on tenant domains.
    let owner = app.login(&tenant_host("kampus5"), "owner5", "password123").await;
    let res = app
        .send(
            "GET",
            &tenant_host("kampus5"),
            "/api/v1/admin/tenants",
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Tenant-scoped endpoints do not exist on the main domain.
    let admin = app.superadmin().await;
    let res = app
        .send("GET", MAIN_HOST, "/api/v1/areas", Some(&admin), None)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("tenant domain"));
}
