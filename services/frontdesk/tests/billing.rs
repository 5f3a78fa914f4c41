mod common;

use axum::http::StatusCode;
use common::{TestApp, money, test_app};
use serde_json::json;

struct Stay {
    admin: String,
    desk: String,
    guest: String,
    booking_id: String,
}

/// A two-night stay at 100/night, checked in.
async fn checked_in_stay(app: &TestApp) -> Stay {
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
            Some(&desk),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    Stay {
        admin,
        desk,
        guest,
        booking_id,
    }
}

async fn check_out(app: &TestApp, stay: &Stay) {
    let (status, _) = app
        .call(
            "PUT",
            &format!("/reservations/{}/checkout", stay.booking_id),
            Some(&stay.desk),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

async fn create_service(app: &TestApp, admin: &str, name: &str, price: f64) -> String {
    let (status, body) = app
        .call(
            "POST",
            "/services",
            Some(admin),
            Some(json!({ "name": name, "category": "food", "price": price })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().expect("id").to_string()
}

#[tokio::test]
async fn invoice_requires_checkout_and_is_issued_once() {
    let app = test_app().await;
    let stay = checked_in_stay(&app).await;
    let breakfast = create_service(&app, &stay.admin, "Breakfast", 12.5).await;
    let invoice_body = json!({
        "booking_id": stay.booking_id,
        "services": [
            { "service_id": breakfast, "quantity": 1 },
            { "service_id": breakfast, "quantity": 1 }
        ]
    });

    let (status, body) = app
        .call("POST", "/invoices", Some(&stay.desk), Some(invoice_body.clone()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    check_out(&app, &stay).await;
    let (status, body) = app
        .call("POST", "/invoices", Some(&stay.desk), Some(invoice_body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(money(&body["room_charges"]), 220.0);
    assert_eq!(money(&body["additional_services_charges"]), 25.0);
    assert_eq!(money(&body["total_amount"]), 245.0);
    assert_eq!(body["payment_status"], "pending");
    let items = body["line_items"].as_array().expect("line items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 2);

    let (status, body) = app
        .call("POST", "/invoices", Some(&stay.desk), Some(invoice_body))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "already_invoiced");
}

#[tokio::test]
async fn completed_service_requests_are_billed_by_default() {
    let app = test_app().await;
    let stay = checked_in_stay(&app).await;
    let laundry = create_service(&app, &stay.admin, "Laundry", 15.0).await;
    let spa = create_service(&app, &stay.admin, "Spa", 60.0).await;

    let mut request_ids = Vec::new();
    for service in [&laundry, &laundry, &spa] {
        let (status, body) = app
            .call(
                "POST",
                "/service-requests",
                Some(&stay.guest),
                Some(json!({ "service_id": service, "booking_id": stay.booking_id })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["status"], "pending");
        request_ids.push(body["id"].as_str().expect("id").to_string());
    }
    for (request_id, next) in request_ids.iter().zip(["completed", "completed", "canceled"]) {
        let (status, body) = app
            .call(
                "PUT",
                &format!("/service-requests/{request_id}/status"),
                Some(&stay.desk),
                Some(json!({ "status": next })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    check_out(&app, &stay).await;
    let (status, body) = app
        .call(
            "POST",
            "/invoices",
            Some(&stay.desk),
            Some(json!({ "booking_id": stay.booking_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(money(&body["additional_services_charges"]), 30.0);
    assert_eq!(money(&body["total_amount"]), 250.0);
}

#[tokio::test]
async fn payment_only_moves_forward() {
    let app = test_app().await;
    let stay = checked_in_stay(&app).await;
    check_out(&app, &stay).await;
    let (_, body) = app
        .call(
            "POST",
            "/invoices",
            Some(&stay.desk),
            Some(json!({ "booking_id": stay.booking_id, "services": [] })),
        )
        .await;
    let invoice_id = body["id"].as_str().expect("id").to_string();
    let uri = format!("/invoices/{invoice_id}/payment");

    let (status, _) = app
        .call("PUT", &uri, Some(&stay.guest), Some(json!({ "payment_status": "paid" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .call("PUT", &uri, Some(&stay.desk), Some(json!({ "payment_status": "paid" })))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["payment_status"], "paid");
    let paid_at = body["paid_at"].clone();
    assert!(paid_at.is_string());

    let (status, body) = app
        .call("PUT", &uri, Some(&stay.desk), Some(json!({ "payment_status": "paid" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paid_at"], paid_at);

    let (status, body) = app
        .call("PUT", &uri, Some(&stay.desk), Some(json!({ "payment_status": "pending" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_transition");

    let (status, body) = app.call("GET", "/invoices", Some(&stay.guest), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().expect("items").len(), 1);

    let (status, body) = app
        .call("GET", "/reports/overview", Some(&stay.admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&body["total_revenue"]), 220.0);
    assert_eq!(money(&body["outstanding_revenue"]), 0.0);
}
