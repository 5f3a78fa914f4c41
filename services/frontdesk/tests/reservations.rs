mod common;

use axum::http::StatusCode;
use common::{TestOptions, money, test_app, test_app_with};
use serde_json::json;

#[tokio::test]
async fn booking_prices_the_stay_with_tax() {
    let app = test_app().await;
    let admin = app.admin_token().await;
    let room = app.create_room(&admin, "101", 100.0).await;
    let (guest, guest_id) = app.guest("guest@example.com").await;

    let (status, body) = app.book(&guest, &room, "2025-01-10", "2025-01-12").await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["guest_id"], guest_id.as_str());
    assert_eq!(money(&body["total_amount"]), 220.0);

    let (status, body) = app.book(&guest, &room, "2025-01-12", "2025-01-12").await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, _) = app
        .book(
            &guest,
            "00000000-0000-0000-0000-000000000000",
            "2025-01-10",
            "2025-01-12",
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_prices_and_stays_are_refused() {
    let app = test_app().await;
    let admin = app.admin_token().await;
    let (status, body) = app
        .call(
            "POST",
            "/rooms",
            Some(&admin),
            Some(json!({
                "room_number": "900",
                "type": "suite",
                "floor": 9,
                "price": 5e27,
                "beds": 2
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["code"], "validation_error");

    let (guest, _) = app.guest("guest@example.com").await;
    let penthouse = app.create_room(&admin, "901", 9_000_000_000.0).await;
    let (status, body) = app.book(&guest, &penthouse, "2025-01-01", "2025-01-03").await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert!(body["message"].as_str().unwrap_or_default().contains("exceeds"));

    let room = app.create_room(&admin, "101", 100.0).await;
    let (status, body) = app.book(&guest, &room, "2025-01-01", "9999-12-31").await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert!(body["message"].as_str().unwrap_or_default().contains("nights"));

    let (status, body) = app.book(&guest, &room, "2025-01-01", "2025-03-01").await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(money(&body["total_amount"]), 6490.0);
}

#[tokio::test]
async fn availability_excludes_overlapping_live_bookings() {
    let app = test_app().await;
    let admin = app.admin_token().await;
    let room = app.create_room(&admin, "101", 100.0).await;
    let other = app.create_room(&admin, "102", 80.0).await;
    let (guest, _) = app.guest("guest@example.com").await;
    let (status, _) = app.book(&guest, &room, "2025-01-10", "2025-01-12").await;
    assert_eq!(status, StatusCode::CREATED);

    let ids = |body: &serde_json::Value| -> Vec<String> {
        body["items"]
            .as_array()
            .expect("items")
            .iter()
            .map(|room| room["id"].as_str().expect("id").to_string())
            .collect()
    };

    let (status, body) = app
        .call(
            "GET",
            "/rooms/availability?check_in=2025-01-11&check_out=2025-01-13",
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(ids(&body), vec![other.clone()]);

    let (_, body) = app
        .call(
            "GET",
            "/rooms/availability?check_in=2025-01-12&check_out=2025-01-15",
            None,
            None,
        )
        .await;
    assert!(ids(&body).contains(&room));

    let (_, body) = app
        .call(
            "GET",
            "/rooms/availability?check_in=2025-01-13&check_out=2025-01-15",
            None,
            None,
        )
        .await;
    assert_eq!(ids(&body), vec![room.clone(), other.clone()]);

    let (status, _) = app
        .call(
            "GET",
            "/rooms/availability?check_in=2025-01-13&check_out=2025-01-13",
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn overlapping_bookings_follow_the_configured_policy() {
    let lenient = test_app().await;
    let admin = lenient.admin_token().await;
    let room = lenient.create_room(&admin, "101", 100.0).await;
    let (guest, _) = lenient.guest("guest@example.com").await;
    let (status, _) = lenient.book(&guest, &room, "2025-01-10", "2025-01-12").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = lenient.book(&guest, &room, "2025-01-11", "2025-01-13").await;
    assert_eq!(status, StatusCode::CREATED);

    let strict = test_app_with(TestOptions {
        reject_overlapping_bookings: true,
        ..TestOptions::default()
    })
    .await;
    let admin = strict.admin_token().await;
    let room = strict.create_room(&admin, "101", 100.0).await;
    let (guest, _) = strict.guest("guest@example.com").await;
    let (status, first) = strict.book(&guest, &room, "2025-01-10", "2025-01-12").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = strict.book(&guest, &room, "2025-01-11", "2025-01-13").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "room_unavailable");
    let (status, _) = strict.book(&guest, &room, "2025-01-12", "2025-01-14").await;
    assert_eq!(status, StatusCode::CREATED);

    let booking_id = first["id"].as_str().expect("id");
    let (status, _) = strict
        .call(
            "PUT",
            &format!("/reservations/{booking_id}/cancel"),
            Some(&guest),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = strict.book(&guest, &room, "2025-01-10", "2025-01-12").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn lifecycle_moves_the_room_along() {
    let app = test_app().await;
    let admin = app.admin_token().await;
    let room = app.create_room(&admin, "101", 100.0).await;
    let (guest, _) = app.guest("guest@example.com").await;
    let (desk, _) = app.approved_staff("desk@example.com", "front-office").await;
    let (_, body) = app.book(&guest, &room, "2025-01-10", "2025-01-12").await;
    let booking_id = body["id"].as_str().expect("id").to_string();

    let (status, _) = app
        .call(
            "PUT",
            &format!("/reservations/{booking_id}/checkin"),
            Some(&guest),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .call(
            "PUT",
            &format!("/reservations/{booking_id}/checkout"),
            Some(&desk),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_transition");

    let (status, body) = app
        .call(
            "PUT",
            &format!("/reservations/{booking_id}/checkin"),
            Some(&desk),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "checked-in");
    assert_eq!(app.room_status(&room).await, "occupied");

    let (status, _) = app
        .call(
            "PUT",
            &format!("/reservations/{booking_id}/cancel"),
            Some(&guest),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .call(
            "PUT",
            &format!("/reservations/{booking_id}/checkout"),
            Some(&desk),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "checked-out");
    assert_eq!(app.room_status(&room).await, "cleaning");
}

#[tokio::test]
async fn guests_only_see_their_own_reservations() {
    let app = test_app().await;
    let admin = app.admin_token().await;
    let room = app.create_room(&admin, "101", 100.0).await;
    let (alice, _) = app.guest("alice@example.com").await;
    let (bob, bob_id) = app.guest("bob@example.com").await;
    let (_, body) = app.book(&alice, &room, "2025-02-01", "2025-02-03").await;
    let alice_booking = body["id"].as_str().expect("id").to_string();
    app.book(&bob, &room, "2025-03-01", "2025-03-03").await;

    let (status, body) = app.call("GET", "/reservations", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["guest_id"], bob_id.as_str());

    let (status, _) = app
        .call(
            "GET",
            &format!("/reservations/{alice_booking}"),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .call(
            "PUT",
            &format!("/reservations/{alice_booking}/cancel"),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.call("GET", "/reservations", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["check_in"], "2025-03-01");
}

#[tokio::test]
async fn staff_book_on_behalf_of_a_guest() {
    let app = test_app().await;
    let admin = app.admin_token().await;
    let room = app.create_room(&admin, "101", 100.0).await;
    let (_, guest_id) = app.guest("guest@example.com").await;
    let (desk, desk_id) = app.approved_staff("desk@example.com", "front-office").await;

    let (status, body) = app
        .call(
            "POST",
            "/reservations",
            Some(&desk),
            Some(json!({
                "room_id": room,
                "check_in": "2025-04-01",
                "check_out": "2025-04-04",
                "guest_id": guest_id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["guest_id"], guest_id.as_str());
    assert_eq!(body["guests"], 1);
    assert_eq!(money(&body["total_amount"]), 330.0);

    let (status, _) = app
        .call(
            "POST",
            "/reservations",
            Some(&desk),
            Some(json!({
                "room_id": room,
                "check_in": "2025-05-01",
                "check_out": "2025-05-02",
                "guest_id": desk_id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
