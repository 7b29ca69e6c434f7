mod common;

use axum::http::StatusCode;
use common::{TestApp, MAIN_HOST};
use serde_json::json;

async fn count_users(app: &TestApp, username: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(&app.pool)
        .await
        .unwrap()
}

async fn count_tenants(app: &TestApp, slug: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM tenants WHERE slug = ?")
        .bind(slug)
        .fetch_one(&app.pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_duplicate_slug_rolls_back_the_owner_account() {
    let app = TestApp::new().await;

    app.signup_tenant("kampus1", "owner1", "password123").await;

    // The owner row is inserted before the tenant row; the duplicate slug
    // makes the tenant insert fail, and the transaction must take the
    // fresh owner row down with it.
    let res = app
        .send(
            "POST",
            MAIN_HOST,
            "/api/v1/signup",
            None,
            Some(json!({
                "name": "Parkir Duplikat",
                "institution_name": "Universitas Duplikat",
                "slug": "kampus1",
                "username": "owner2",
                "password": "password123"
            })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    assert_eq!(count_users(&app, "owner2").await, 0);
    assert_eq!(count_tenants(&app, "kampus1").await, 1);
}

#[tokio::test]
async fn test_duplicate_username_leaves_no_tenant_row() {
    let app = TestApp::new().await;

    app.signup_tenant("kampus1", "owner1", "password123").await;

    let res = app
        .send(
            "POST",
            MAIN_HOST,
            "/api/v1/signup",
            None,
            Some(json!({
                "name": "Parkir Dua",
                "institution_name": "Universitas Dua",
                "slug": "kampus2",
                "username": "owner1",
                "password": "password123"
            })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    assert_eq!(count_tenants(&app, "kampus2").await, 0);
    assert_eq!(count_users(&app, "owner1").await, 1);
}

#[tokio::test]
async fn test_slug_validation_rejects_bad_input_before_any_write() {
    let app = TestApp::new().await;

    for slug in ["", "Kampus", "kampus satu", "-kampus", "www"] {
        let res = app
            .send(
                "POST",
                MAIN_HOST,
                "/api/v1/signup",
                None,
                Some(json!({
                    "name": "Parkir",
                    "institution_name": "Universitas",
                    "slug": slug,
                    "username": "somebody",
                    "password": "password123"
                })),
            )
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "slug {:?}", slug);
    }

    assert_eq!(count_users(&app, "somebody").await, 0);
}

#[tokio::test]
async fn test_weak_credentials_are_rejected() {
    let app = TestApp::new().await;

    let res = app
        .send(
            "POST",
            MAIN_HOST,
            "/api/v1/signup",
            None,
            Some(json!({
                "name": "Parkir",
                "institution_name": "Universitas",
                "slug": "kampus9",
                "username": "ow",
                "password": "password123"
            })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .send(
            "POST",
            MAIN_HOST,
            "/api/v1/signup",
            None,
            Some(json!({
                "name": "Parkir",
                "institution_name": "Universitas",
                "slug": "kampus9",
                "username": "owner9",
                "password": "short"
            })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert_eq!(count_tenants(&app, "kampus9").await, 0);
}
