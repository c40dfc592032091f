mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use std::time::Duration;

use common::{test_rooms, FakePlatform, TestApp, RESORT_ID};

fn wizard_uri(session_id: &str, action: &str) -> String {
    if action.is_empty() {
        format!("/api/wizard/{}", session_id)
    } else {
        format!("/api/wizard/{}/{}", session_id, action)
    }
}

async fn open_wizard<S>(app: &S, body: Value) -> Value
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let req = test::TestRequest::post()
        .uri(&format!("/api/resorts/{}/wizard", RESORT_ID))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    test::read_body_json(resp).await
}

#[actix_web::test]
async fn test_full_booking_flow() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let view = open_wizard(
        &app,
        json!({
            "resort_name": "Vythiri Hills",
            "check_in": "2026-11-01",
            "check_out": "2026-11-06",
            "adults": 2,
            "children": 1
        }),
    )
    .await;
    let session_id = view["session_id"].as_str().unwrap().to_string();
    let draft_token = view["draft_token"].as_str().unwrap().to_string();
    assert_eq!(view["step"], 1);
    assert_eq!(view["total_steps"], 5);
    assert_eq!(view["can_advance"], true);
    assert_eq!(view["quote"]["nights"], 5);
    assert_eq!(view["quote"]["total_amount"], "62480.00");

    // Dates -> Guests -> Room -> Contact
    for expected in 2..=4 {
        let req = test::TestRequest::post()
            .uri(&wizard_uri(&session_id, "next"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["step"], expected);
    }

    let req = test::TestRequest::patch()
        .uri(&wizard_uri(&session_id, "draft"))
        .set_json(&json!({
            "guest_name": "Meera Nair",
            "guest_email": "meera@example.com",
            "guest_phone": "+91 98470 12345",
            "special_requests": "Vegetarian meals"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&wizard_uri(&session_id, "next"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["step"], 5);

    assert!(test_app.stored_draft(&draft_token).await.is_some());

    let req = test::TestRequest::post()
        .uri(&wizard_uri(&session_id, "submit"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let confirmation: Value = test::read_body_json(resp).await;
    assert_eq!(confirmation["booking_number"], "WT-2026-001");
    assert_eq!(
        confirmation["redirect_path"],
        "/bookings/WT-2026-001/confirmation"
    );

    let payload = test_app.platform.bookings.lock().unwrap()[0].clone();
    let payload = serde_json::to_value(&payload).unwrap();
    assert_eq!(payload["object_id"], RESORT_ID);
    assert_eq!(payload["total_guests"], 3);
    assert_eq!(payload["base_amount"], "60000.00");
    assert_eq!(payload["tax_amount"], "6480.00");
    assert_eq!(payload["total_amount"], "62480.00");
    assert_eq!(payload["special_requests"], "Vegetarian meals");

    // Draft is gone and the session is closed
    assert!(test_app.stored_draft(&draft_token).await.is_none());
    let req = test::TestRequest::get()
        .uri(&wizard_uri(&session_id, ""))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_rejected_submission_keeps_draft_for_retry() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let view = open_wizard(
        &app,
        json!({"check_in": "2026-11-01", "check_out": "2026-11-03"}),
    )
    .await;
    let session_id = view["session_id"].as_str().unwrap().to_string();
    let draft_token = view["draft_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&wizard_uri(&session_id, "draft"))
        .set_json(&json!({
            "guest_name": "Rahul",
            "guest_email": "rahul@example.com",
            "guest_phone": "9847012345"
        }))
        .to_request();
    test::call_service(&app, req).await;
    for _ in 0..4 {
        let req = test::TestRequest::post()
            .uri(&wizard_uri(&session_id, "next"))
            .to_request();
        test::call_service(&app, req).await;
    }

    test_app
        .platform
        .reject_next("Room not available for selected dates");
    let req = test::TestRequest::post()
        .uri(&wizard_uri(&session_id, "submit"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Room not available for selected dates");

    let stored = test_app.stored_draft(&draft_token).await.unwrap();
    assert_eq!(stored.guest_name, "Rahul");

    // Same session, second attempt goes through
    let req = test::TestRequest::post()
        .uri(&wizard_uri(&session_id, "submit"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(test_app.platform.booking_count(), 1);
}

#[actix_web::test]
async fn test_double_submit_is_rejected_while_in_flight() {
    let test_app = TestApp::with_platform(FakePlatform {
        booking_delay: Duration::from_millis(50),
        ..FakePlatform::new(test_rooms())
    });
    let app = test::init_service(test_app.create_app()).await;

    let view = open_wizard(
        &app,
        json!({"check_in": "2026-11-01", "check_out": "2026-11-04"}),
    )
    .await;
    let session_id = view["session_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&wizard_uri(&session_id, "draft"))
        .set_json(&json!({
            "guest_name": "Rahul",
            "guest_email": "rahul@example.com",
            "guest_phone": "9847012345"
        }))
        .to_request();
    test::call_service(&app, req).await;
    for _ in 0..4 {
        let req = test::TestRequest::post()
            .uri(&wizard_uri(&session_id, "next"))
            .to_request();
        test::call_service(&app, req).await;
    }

    let first = test::TestRequest::post()
        .uri(&wizard_uri(&session_id, "submit"))
        .to_request();
    let second = test::TestRequest::post()
        .uri(&wizard_uri(&session_id, "submit"))
        .to_request();
    let (first, second) = futures::join!(
        test::call_service(&app, first),
        test::call_service(&app, second)
    );

    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(test_app.platform.booking_count(), 1);
}

#[actix_web::test]
async fn test_saved_draft_is_resumed_with_fresh_overrides() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let view = open_wizard(
        &app,
        json!({"check_in": "2026-11-01", "check_out": "2026-11-04", "adults": 1}),
    )
    .await;
    let session_id = view["session_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&wizard_uri(&session_id, "draft"))
        .set_json(&json!({
            "room_type_id": 2,
            "guest_name": "Anu",
            "guest_email": "anu@example.com",
            "special_requests": "Ground floor"
        }))
        .to_request();
    test::call_service(&app, req).await;
    let draft_token = view["draft_token"].as_str().unwrap();
    assert!(test_app.stored_draft(draft_token).await.is_some());

    // Guest comes back from a different listing link
    let resumed = open_wizard(
        &app,
        json!({"draft_token": draft_token, "check_in": "2026-12-20", "adults": 2}),
    )
    .await;
    let draft = &resumed["draft"];
    assert_eq!(draft["check_in"], "2026-12-20");
    assert_eq!(draft["check_out"], "2026-11-04");
    assert_eq!(draft["adults"], 2);
    assert_eq!(draft["room_type_id"], 2);
    assert_eq!(draft["guest_name"], "Anu");
    assert_eq!(draft["special_requests"], "Ground floor");
    assert_ne!(resumed["session_id"], view["session_id"]);
    assert_eq!(resumed["draft_token"], view["draft_token"]);
}

#[actix_web::test]
async fn test_cancel_clears_saved_draft() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let view = open_wizard(&app, json!({"check_in": "2026-11-01"})).await;
    let session_id = view["session_id"].as_str().unwrap().to_string();
    let draft_token = view["draft_token"].as_str().unwrap().to_string();
    assert!(test_app.stored_draft(&draft_token).await.is_some());

    let req = test::TestRequest::delete()
        .uri(&wizard_uri(&session_id, ""))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(test_app.stored_draft(&draft_token).await.is_none());

    let req = test::TestRequest::delete()
        .uri(&wizard_uri(&session_id, ""))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_guests_do_not_share_drafts() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    let anu = open_wizard(
        &app,
        json!({"check_in": "2026-11-01", "check_out": "2026-11-04"}),
    )
    .await;
    let req = test::TestRequest::patch()
        .uri(&wizard_uri(anu["session_id"].as_str().unwrap(), "draft"))
        .set_json(&json!({
            "guest_name": "Anu",
            "guest_email": "anu@example.com",
            "guest_phone": "9847012345"
        }))
        .to_request();
    test::call_service(&app, req).await;
    let anu_token = anu["draft_token"].as_str().unwrap();
    assert!(test_app.stored_draft(anu_token).await.is_some());

    // Someone else opens the same resort
    let rahul = open_wizard(&app, json!({})).await;
    assert_ne!(rahul["draft_token"], anu["draft_token"]);
    assert_eq!(rahul["draft"]["guest_name"], "");
    assert_eq!(rahul["draft"]["guest_email"], "");
    assert_eq!(rahul["draft"]["guest_phone"], "");
    assert!(rahul["draft"]["check_in"].is_null());

    let req = test::TestRequest::patch()
        .uri(&wizard_uri(rahul["session_id"].as_str().unwrap(), "draft"))
        .set_json(&json!({"guest_name": "Rahul"}))
        .to_request();
    test::call_service(&app, req).await;

    let stored = test_app.stored_draft(anu_token).await.unwrap();
    assert_eq!(stored.guest_name, "Anu");
    assert_eq!(stored.guest_email, "anu@example.com");
}

#[actix_web::test]
async fn test_wizard_is_frozen_while_submission_is_in_flight() {
    let test_app = TestApp::with_platform(FakePlatform {
        booking_delay: Duration::from_millis(100),
        ..FakePlatform::new(test_rooms())
    });
    let app = test::init_service(test_app.create_app()).await;

    let view = open_wizard(
        &app,
        json!({"check_in": "2026-11-01", "check_out": "2026-11-04"}),
    )
    .await;
    let session_id = view["session_id"].as_str().unwrap().to_string();
    let draft_token = view["draft_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&wizard_uri(&session_id, "draft"))
        .set_json(&json!({
            "guest_name": "Rahul",
            "guest_email": "rahul@example.com",
            "guest_phone": "9847012345"
        }))
        .to_request();
    test::call_service(&app, req).await;
    for _ in 0..4 {
        let req = test::TestRequest::post()
            .uri(&wizard_uri(&session_id, "next"))
            .to_request();
        test::call_service(&app, req).await;
    }

    let submit = test::TestRequest::post()
        .uri(&wizard_uri(&session_id, "submit"))
        .to_request();
    let late_edits = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        let patch = test::TestRequest::patch()
            .uri(&wizard_uri(&session_id, "draft"))
            .set_json(&json!({"special_requests": "Extra bed"}))
            .to_request();
        let patch = test::call_service(&app, patch).await.status();
        let back = test::TestRequest::post()
            .uri(&wizard_uri(&session_id, "back"))
            .to_request();
        let back = test::call_service(&app, back).await.status();
        let cancel = test::TestRequest::delete()
            .uri(&wizard_uri(&session_id, ""))
            .to_request();
        let cancel = test::call_service(&app, cancel).await.status();
        (patch, back, cancel)
    };
    let (submitted, (patch, back, cancel)) =
        futures::join!(test::call_service(&app, submit), late_edits);

    assert_eq!(submitted.status(), StatusCode::CREATED);
    assert_eq!(patch, StatusCode::CONFLICT);
    assert_eq!(back, StatusCode::CONFLICT);
    assert_eq!(cancel, StatusCode::CONFLICT);

    let payload = test_app.platform.bookings.lock().unwrap()[0].clone();
    assert_eq!(payload.special_requests, "");
    assert!(test_app.stored_draft(&draft_token).await.is_none());
}
