mod common;

use axum::http::StatusCode;
use common::test_app;
use serde_json::json;

#[tokio::test]
async fn completing_a_task_frees_the_room() {
    let app = test_app().await;
    let admin = app.admin_token().await;
    let room = app.create_room(&admin, "201", 90.0).await;
    let (cleaner, cleaner_id) = app.approved_staff("clean@example.com", "housekeeping").await;
    let (_, guest_id) = app.guest("guest@example.com").await;

    let (status, _) = app
        .call(
            "PUT",
            &format!("/rooms/{room}/status"),
            Some(&cleaner),
            Some(json!({ "status": "cleaning" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(
            "POST",
            "/housekeeping",
            Some(&cleaner),
            Some(json!({ "room_id": room })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["kind"], "cleaning");
    assert_eq!(body["status"], "pending");
    let task_id = body["id"].as_str().expect("id").to_string();

    let (status, _) = app
        .call(
            "PUT",
            &format!("/housekeeping/{task_id}/assign"),
            Some(&cleaner),
            Some(json!({ "assigned_to": guest_id })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .call(
            "PUT",
            &format!("/housekeeping/{task_id}/assign"),
            Some(&cleaner),
            Some(json!({ "assigned_to": cleaner_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["assigned_to"], cleaner_id.as_str());

    let (status, body) = app
        .call(
            "GET",
            &format!("/housekeeping?assigned_to={cleaner_id}&status=pending"),
            Some(&cleaner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().expect("items").len(), 1);

    let (status, body) = app
        .call(
            "PUT",
            &format!("/housekeeping/{task_id}/status"),
            Some(&cleaner),
            Some(json!({ "status": "completed", "notes": "x".repeat(2001) })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["code"], "validation_error");
    assert_eq!(app.room_status(&room).await, "cleaning");

    let (status, body) = app
        .call(
            "PUT",
            &format!("/housekeeping/{task_id}/status"),
            Some(&cleaner),
            Some(json!({ "status": "completed", "notes": "linen swapped" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(app.room_status(&room).await, "available");

    let (status, body) = app
        .call(
            "PUT",
            &format!("/housekeeping/{task_id}/status"),
            Some(&cleaner),
            Some(json!({ "status": "pending" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_transition");

    let (status, _) = app
        .call("DELETE", &format!("/housekeeping/{task_id}"), Some(&cleaner), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .call("DELETE", &format!("/housekeeping/{task_id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn maintenance_takes_the_room_out_and_back() {
    let app = test_app().await;
    let admin = app.admin_token().await;
    let room = app.create_room(&admin, "301", 120.0).await;
    let (guest, guest_id) = app.guest("guest@example.com").await;
    let (tech, tech_id) = app.approved_staff("tech@example.com", "maintenance").await;

    let (status, body) = app
        .call(
            "POST",
            "/maintenance",
            Some(&guest),
            Some(json!({ "room_id": room, "issue": "Leaking tap" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["priority"], "medium");
    assert_eq!(body["status"], "open");
    assert_eq!(body["reported_by"], guest_id.as_str());
    let request_id = body["id"].as_str().expect("id").to_string();

    let (status, _) = app.call("GET", "/maintenance", Some(&guest), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call(
            "PUT",
            &format!("/maintenance/{request_id}/assign"),
            Some(&tech),
            Some(json!({ "assigned_to": tech_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(
            "PUT",
            &format!("/maintenance/{request_id}/status"),
            Some(&tech),
            Some(json!({ "status": "in-progress" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.room_status(&room).await, "maintenance");

    let (_, body) = app
        .call("GET", "/reports/overview", Some(&admin), None)
        .await;
    assert_eq!(body["open_maintenance"], 1);

    let (status, _) = app
        .call(
            "PUT",
            &format!("/maintenance/{request_id}/status"),
            Some(&tech),
            Some(json!({ "status": "resolved" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.room_status(&room).await, "available");

    let (status, _) = app
        .call(
            "PUT",
            &format!("/maintenance/{request_id}/status"),
            Some(&tech),
            Some(json!({ "status": "open" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn service_requests_need_a_live_reservation_of_ones_own() {
    let app = test_app().await;
    let admin = app.admin_token().await;
    let room = app.create_room(&admin, "101", 100.0).await;
    let (alice, _) = app.guest("alice@example.com").await;
    let (bob, _) = app.guest("bob@example.com").await;
    let (_, body) = app.book(&alice, &room, "2025-06-01", "2025-06-03").await;
    let booking_id = body["id"].as_str().expect("id").to_string();

    let (_, body) = app
        .call(
            "POST",
            "/services",
            Some(&admin),
            Some(json!({ "name": "Late checkout", "category": "front desk", "price": 20, "available": false })),
        )
        .await;
    let unavailable = body["id"].as_str().expect("id").to_string();
    let (_, body) = app
        .call(
            "POST",
            "/services",
            Some(&admin),
            Some(json!({ "name": "Towels", "category": "housekeeping", "price": 0 })),
        )
        .await;
    let towels = body["id"].as_str().expect("id").to_string();

    let (status, _) = app
        .call(
            "POST",
            "/service-requests",
            Some(&bob),
            Some(json!({ "service_id": towels, "booking_id": booking_id })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .call(
            "POST",
            "/service-requests",
            Some(&alice),
            Some(json!({ "service_id": unavailable, "booking_id": booking_id })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, _) = app
        .call(
            "POST",
            "/service-requests",
            Some(&alice),
            Some(json!({ "service_id": towels, "booking_id": booking_id, "notes": "two extra" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.call("GET", "/service-requests", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().expect("items").is_empty());

    let (status, _) = app
        .call(
            "PUT",
            &format!("/reservations/{booking_id}/cancel"),
            Some(&alice),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .call(
            "POST",
            "/service-requests",
            Some(&alice),
            Some(json!({ "service_id": towels, "booking_id": booking_id })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
