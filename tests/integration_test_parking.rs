mod common;

use axum::http::StatusCode;
use common::{parse_body, tenant_host, AuthHeaders, TestApp};
use serde_json::json;

const HOST_SLUG: &str = "kampus1";

async fn setup(app: &TestApp) -> AuthHeaders {
    let signup = app.signup_tenant(HOST_SLUG, "owner1", "password123").await;
    app.approve_tenant(signup["tenant_id"].as_i64().unwrap()).await;
    app.login(&tenant_host(HOST_SLUG), "owner1", "password123").await
}

async fn create_area(app: &TestApp, auth: &AuthHeaders, capacity: i32) -> i64 {
    let res = app
        .send(
            "POST",
            &tenant_host(HOST_SLUG),
            "/api/v1/areas",
            Some(auth),
            Some(json!({
                "name": "Gedung A",
                "capacity": capacity,
                "car_rate": 5000,
                "motorcycle_rate": 2000
            })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_check_in_and_check_out_with_minimum_fee() {
    let app = TestApp::new().await;
    let owner = setup(&app).await;
    let area_id = create_area(&app, &owner, 10).await;
    let host = tenant_host(HOST_SLUG);

    let res = app
        .send(
            "POST",
            &host,
            &format!("/api/v1/areas/{}/check-in", area_id),
            Some(&owner),
            Some(json!({"plate": "b 1234 xy", "kind": "car", "owner_name": "Budi"})),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let tx = parse_body(res).await;
    assert_eq!(tx["plate"], "B 1234 XY");
    assert_eq!(tx["vehicle_kind"], "car");
    assert!(tx["exited_at"].is_null());
    assert!(tx["fee"].is_null());
    let tx_id = tx["id"].as_i64().unwrap();

    // The check-in registered the vehicle in the shared registry.
    let res = app
        .send("GET", &host, "/api/v1/vehicles/B%201234%20XY", Some(&owner), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    // The same plate cannot be parked twice.
    let res = app
        .send(
            "POST",
            &host,
            &format!("/api/v1/areas/{}/check-in", area_id),
            Some(&owner),
            Some(json!({"plate": "B 1234 XY", "kind": "car"})),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // An immediate check-out bills the one-hour minimum at the car rate.
    let res = app
        .send(
            "POST",
            &host,
            &format!("/api/v1/areas/{}/transactions/{}/check-out", area_id, tx_id),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let closed = parse_body(res).await;
    assert_eq!(closed["fee"], 5000);
    assert!(!closed["exited_at"].is_null());

    // Checking out twice is rejected.
    let res = app
        .send(
            "POST",
            &host,
            &format!("/api/v1/areas/{}/transactions/{}/check-out", area_id, tx_id),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_capacity_limit_is_enforced() {
    let app = TestApp::new().await;
    let owner = setup(&app).await;
    let area_id = create_area(&app, &owner, 2).await;
    let host = tenant_host(HOST_SLUG);

    for plate in ["B 1 AA", "B 2 BB"] {
        let res = app
            .send(
                "POST",
                &host,
                &format!("/api/v1/areas/{}/check-in", area_id),
                Some(&owner),
                Some(json!({"plate": plate, "kind": "motorcycle"})),
            )
            .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = app
        .send(
            "POST",
            &host,
            &format!("/api/v1/areas/{}/check-in", area_id),
            Some(&owner),
            Some(json!({"plate": "B 3 CC", "kind": "motorcycle"})),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("full"));
}

#[tokio::test]
async fn test_open_filter_and_nested_lookup() {
    let app = TestApp::new().await;
    let owner = setup(&app).await;
    let area_id = create_area(&app, &owner, 10).await;
    let other_area = create_area(&app, &owner, 10).await;
    let host = tenant_host(HOST_SLUG);

    let res = app
        .send(
            "POST",
            &host,
            &format!("/api/v1/areas/{}/check-in", area_id),
            Some(&owner),
            Some(json!({"plate": "B 10 AA", "kind": "car"})),
        )
        .await;
    let open_tx = parse_body(res).await["id"].as_i64().unwrap();

    let res = app
        .send(
            "POST",
            &host,
            &format!("/api/v1/areas/{}/check-in", area_id),
            Some(&owner),
            Some(json!({"plate": "B 11 BB", "kind": "car"})),
        )
        .await;
    let closed_tx = parse_body(res).await["id"].as_i64().unwrap();
    app.send(
        "POST",
        &host,
        &format!("/api/v1/areas/{}/transactions/{}/check-out", area_id, closed_tx),
        Some(&owner),
        None,
    )
    .await;

    let res = app
        .send("GET", &host, &format!("/api/v1/areas/{}/transactions", area_id), Some(&owner), None)
        .await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 2);

    let res = app
        .send(
            "GET",
            &host,
            &format!("/api/v1/areas/{}/transactions?open=true", area_id),
            Some(&owner),
            None,
        )
        .await;
    let open = parse_body(res).await;
    assert_eq!(open.as_array().unwrap().len(), 1);
    assert_eq!(open[0]["id"].as_i64().unwrap(), open_tx);

    // Transactions are addressed through their area: the wrong area 404s.
    let res = app
        .send(
            "GET",
            &host,
            &format!("/api/v1/areas/{}/transactions/{}", other_area, open_tx),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_soft_deleted_area_disappears_from_lookups() {
    let app = TestApp::new().await;
    let owner = setup(&app).await;
    let area_id = create_area(&app, &owner, 5).await;
    let host = tenant_host(HOST_SLUG);

    // An area with parked vehicles cannot be deleted.
    let res = app
        .send(
            "POST",
            &host,
            &format!("/api/v1/areas/{}/check-in", area_id),
            Some(&owner),
            Some(json!({"plate": "B 20 ZZ", "kind": "motorcycle"})),
        )
        .await;
    let tx_id = parse_body(res).await["id"].as_i64().unwrap();

    let res = app
        .send("DELETE", &host, &format!("/api/v1/areas/{}", area_id), Some(&owner), None)
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    app.send(
        "POST",
        &host,
        &format!("/api/v1/areas/{}/transactions/{}/check-out", area_id, tx_id),
        Some(&owner),
        None,
    )
    .await;

    let res = app
        .send("DELETE", &host, &format!("/api/v1/areas/{}", area_id), Some(&owner), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    // Soft-deleted areas resolve as absent everywhere.
    let res = app
        .send("GET", &host, &format!("/api/v1/areas/{}", area_id), Some(&owner), None)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app
        .send("GET", &host, "/api/v1/areas", Some(&owner), None)
        .await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 0);

    let res = app
        .send(
            "POST",
            &host,
            &format!("/api/v1/areas/{}/check-in", area_id),
            Some(&owner),
            Some(json!({"plate": "B 21 YY", "kind": "car"})),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app
        .send(
            "GET",
            &host,
            &format!("/api/v1/areas/{}/transactions/{}", area_id, tx_id),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_revenue_dashboard_aggregates_closed_transactions() {
    let app = TestApp::new().await;
    let owner = setup(&app).await;
    let area_id = create_area(&app, &owner, 10).await;
    let host = tenant_host(HOST_SLUG);

    for (plate, kind) in [("B 30 AA", "car"), ("B 31 BB", "motorcycle")] {
        let res = app
            .send(
                "POST",
                &host,
                &format!("/api/v1/areas/{}/check-in", area_id),
                Some(&owner),
                Some(json!({"plate": plate, "kind": kind})),
            )
            .await;
        let tx_id = parse_body(res).await["id"].as_i64().unwrap();
        app.send(
            "POST",
            &host,
            &format!("/api/v1/areas/{}/transactions/{}/check-out", area_id, tx_id),
            Some(&owner),
            None,
        )
        .await;
    }

    // A still-open transaction must not count as revenue.
    app.send(
        "POST",
        &host,
        &format!("/api/v1/areas/{}/check-in", area_id),
        Some(&owner),
        Some(json!({"plate": "B 32 CC", "kind": "car"})),
    )
    .await;

    let res = app
        .send("GET", &host, "/api/v1/dashboard/revenue", Some(&owner), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let revenue = parse_body(res).await;
    assert_eq!(revenue["total_transactions"], 2);
    assert_eq!(revenue["total_revenue"], 7000); // 5000 car + 2000 motorcycle
    assert_eq!(revenue["days"].as_array().unwrap().len(), 1);
    assert_eq!(revenue["days"][0]["revenue"], 7000);
}

#[tokio::test]
async fn test_roles_gate_parking_and_reporting() {
    let app = TestApp::new().await;
    let owner = setup(&app).await;
    let area_id = create_area(&app, &owner, 10).await;
    let host = tenant_host(HOST_SLUG);

    let res = app
        .send(
            "POST",
            &host,
            "/api/v1/members",
            Some(&owner),
            Some(json!({"username": "gate-staff", "password": "password123"})),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let member = parse_body(res).await;
    assert_eq!(member["role"], "operator");

    let operator = app.login(&host, "gate-staff", "password123").await;

    // Operators record parking...
    let res = app
        .send(
            "POST",
            &host,
            &format!("/api/v1/areas/{}/check-in", area_id),
            Some(&operator),
            Some(json!({"plate": "B 40 OP", "kind": "car"})),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);

    // ...but cannot manage areas, members, or read reports.
    let res = app
        .send(
            "POST",
            &host,
            "/api/v1/areas",
            Some(&operator),
            Some(json!({"name": "X", "capacity": 5, "car_rate": 1, "motorcycle_rate": 1})),
        )
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .send("GET", &host, "/api/v1/members", Some(&operator), None)
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = app
        .send("GET", &host, "/api/v1/dashboard/revenue", Some(&operator), None)
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_activity_log_records_mutations() {
    let app = TestApp::new().await;
    let owner = setup(&app).await;
    let area_id = create_area(&app, &owner, 10).await;
    let host = tenant_host(HOST_SLUG);

    let res = app
        .send(
            "POST",
            &host,
            &format!("/api/v1/areas/{}/check-in", area_id),
            Some(&owner),
            Some(json!({"plate": "B 50 LG", "kind": "car"})),
        )
        .await;
    let tx_id = parse_body(res).await["id"].as_i64().unwrap();
    app.send(
        "POST",
        &host,
        &format!("/api/v1/areas/{}/transactions/{}/check-out", area_id, tx_id),
        Some(&owner),
        None,
    )
    .await;

    let res = app
        .send("GET", &host, "/api/v1/activity", Some(&owner), None)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let entries = parse_body(res).await;
    let actions: Vec<String> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap().to_string())
        .collect();

    assert!(actions.contains(&"area.created".to_string()));
    assert!(actions.contains(&"parking.check_in".to_string()));
    assert!(actions.contains(&"parking.check_out".to_string()));
}
