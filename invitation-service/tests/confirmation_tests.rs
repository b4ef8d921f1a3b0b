#[macro_use]
mod common;

use common::event_body;
use common::InvitedGuest;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

on_both_backends!(
    test_confirm_is_idempotent,
    test_decline_after_confirm_conflicts,
    test_confirm_after_decline_conflicts,
    test_unknown_token,
    test_closed_event_rejects_responses,
    test_invalid_response_details,
    test_concurrent_confirm_and_decline_settle_on_one_status,
);

async fn invited_guest(app: &TestApp) -> (String, InvitedGuest) {
    let token = app.owner_token("host").await;
    let event_id = app.create_event(&token, event_body("Wedding")).await;
    let guest = app.add_guest(&token, &event_id, "Grace").await;
    (token, guest)
}

async fn test_confirm_is_idempotent(app: &TestApp) {
    let (_, guest) = invited_guest(app).await;

    let response = app
        .respond(
            &guest.token,
            json!({ "action": "confirm", "additional_guests": 1, "notes": "Vegetarian" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let first: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(first["data"]["status"], "confirmed");
    assert_eq!(first["data"]["additional_guests"], 1);
    assert_eq!(first["data"]["notes"], "Vegetarian");

    let response = app
        .respond(
            &guest.token,
            json!({ "action": "confirm", "additional_guests": 5 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let second: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(second["data"]["status"], "confirmed");
    assert_eq!(second["data"]["additional_guests"], 1);
    assert_eq!(second["data"]["responded_at"], first["data"]["responded_at"]);
}

async fn test_decline_after_confirm_conflicts(app: &TestApp) {
    let (_, guest) = invited_guest(app).await;
    app.respond(&guest.token, json!({ "action": "confirm" })).await;

    let response = app
        .respond(&guest.token, json!({ "action": "decline" }))
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["kind"], "CONFLICTING_STATE");

    let response = app
        .get(&format!("/api/confirm/{}", guest.token))
        .send()
        .await
        .expect("Failed to execute request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["guest"]["status"], "confirmed");
}

async fn test_confirm_after_decline_conflicts(app: &TestApp) {
    let (_, guest) = invited_guest(app).await;

    let response = app
        .respond(&guest.token, json!({ "action": "decline" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .respond(&guest.token, json!({ "action": "decline" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .respond(&guest.token, json!({ "action": "confirm" }))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["kind"], "CONFLICTING_STATE");
}

async fn test_unknown_token(app: &TestApp) {
    for token in ["short", "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"] {
        let response = app
            .get(&format!("/api/confirm/{}", token))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["data"]["kind"], "TOKEN_NOT_FOUND");

        let response = app.respond(token, json!({ "action": "confirm" })).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

async fn test_closed_event_rejects_responses(app: &TestApp) {
    let token = app.owner_token("host").await;
    let mut body = event_body("Past deadline");
    body["rsvp_deadline"] = json!((chrono::Utc::now() - chrono::Duration::hours(1)).to_rfc3339());
    let event_id = app.create_event(&token, body).await;
    let guest = app.add_guest(&token, &event_id, "Late Larry").await;

    let response = app
        .get(&format!("/api/confirm/{}", guest.token))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["event"]["responses_closed"], true);

    let response = app
        .respond(&guest.token, json!({ "action": "confirm" }))
        .await;
    assert_eq!(response.status(), StatusCode::GONE);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["kind"], "CLOSED");

    let summary = app.dashboard(&token).await;
    assert_eq!(summary["pending_count"], 1);
}

async fn test_invalid_response_details(app: &TestApp) {
    let (_, guest) = invited_guest(app).await;

    let response = app
        .respond(
            &guest.token,
            json!({ "action": "confirm", "additional_guests": 21 }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["kind"], "VALIDATION");

    let response = app
        .get(&format!("/api/confirm/{}", guest.token))
        .send()
        .await
        .expect("Failed to execute request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["guest"]["status"], "pending");
}

async fn test_concurrent_confirm_and_decline_settle_on_one_status(app: &TestApp) {
    let (owner_token, guest) = invited_guest(app).await;

    let (confirm, decline) = tokio::join!(
        app.respond(&guest.token, json!({ "action": "confirm" })),
        app.respond(&guest.token, json!({ "action": "decline" })),
    );

    let statuses = [confirm.status(), decline.status()];
    assert!(statuses.contains(&StatusCode::OK));
    assert!(statuses.contains(&StatusCode::CONFLICT));

    let response = app
        .get(&format!("/api/confirm/{}", guest.token))
        .send()
        .await
        .expect("Failed to execute request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let final_status = body["data"]["guest"]["status"].as_str().unwrap().to_string();

    let winner = if confirm.status() == StatusCode::OK {
        "confirmed"
    } else {
        "declined"
    };
    assert_eq!(final_status, winner);

    let summary = app.dashboard(&owner_token).await;
    assert_eq!(
        summary["confirmed_count"].as_u64().unwrap() + summary["declined_count"].as_u64().unwrap(),
        1
    );
}
