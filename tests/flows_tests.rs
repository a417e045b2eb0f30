//! Member-facing flows end to end against the stubbed backend: session
//! booking, membership purchase, session reconciliation over HTTP, and
//! trainer-list invalidation after coach writes.

use std::sync::{Arc, Mutex};

use actix_web::{App, http::StatusCode, test};
use serde_json::json;
use uuid::Uuid;

use gymclub_be::handlers::api_services;

mod common;
use common::StubState;

const CARD: &str = "1234 5678 9012 3456";

fn member_stub(member_id: Uuid) -> StubState {
    StubState {
        auth_user: Some(json!({
            "id": member_id,
            "email": "member@gym.test",
            "user_metadata": {},
        })),
        profiles: vec![json!({
            "id": member_id,
            "email": "member@gym.test",
            "phone": "(555) 123-4567",
            "role": "user",
        })],
        ..Default::default()
    }
}

#[actix_web::test]
async fn booking_stores_a_denormalized_form_and_no_purchase() {
    let member_id = Uuid::new_v4();
    let coach_card_id = Uuid::new_v4();
    let mut stub = member_stub(member_id);
    stub.coaches = vec![json!({
        "id": coach_card_id,
        "user_id": Uuid::new_v4(),
        "name": "Iron Mike",
        "activities": ["Boxing"],
        "schedule": {"monday": ["10:00-11:00"], "friday": ["18:00-19:00"]},
        "price": "800₽",
    })];
    let stub = Arc::new(Mutex::new(stub));
    let base = common::spawn_stub(stub.clone()).await;
    let app = test::init_service(
        App::new()
            .app_data(common::stub_state(&base))
            .configure(api_services),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .insert_header(("Authorization", format!("Bearer {}", common::auth_token(member_id))))
        .set_json(json!({
            "coach_id": coach_card_id,
            "day": "monday",
            "time": "10:00-11:00",
            "card_number": CARD,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let s = stub.lock().unwrap();
    assert_eq!(s.forms.len(), 1);
    let data = &s.forms[0]["data"];
    assert_eq!(data["form_type"], "booking");
    assert_eq!(data["coach_name"], "Iron Mike");
    assert_eq!(data["session"], "monday 10:00-11:00");
    assert_eq!(data["price"], "800₽");
    assert_eq!(data["user_name"], "member@gym.test");
    assert_eq!(data["user_phone"], "(555) 123-4567");
    // only the last four digits are kept
    assert_eq!(data["payment_details"], "3456");
    // bookings never create a purchase row
    assert_eq!(s.count_logged("POST /rest/v1/purchases"), 0);
}

#[actix_web::test]
async fn booking_rejects_slots_outside_the_schedule() {
    let member_id = Uuid::new_v4();
    let coach_card_id = Uuid::new_v4();
    let mut stub = member_stub(member_id);
    stub.coaches = vec![json!({
        "id": coach_card_id,
        "user_id": Uuid::new_v4(),
        "name": "Iron Mike",
        "activities": ["Boxing"],
        "schedule": {"monday": ["10:00-11:00"]},
        "price": "800₽",
    })];
    let stub = Arc::new(Mutex::new(stub));
    let base = common::spawn_stub(stub.clone()).await;
    let app = test::init_service(
        App::new()
            .app_data(common::stub_state(&base))
            .configure(api_services),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .insert_header(("Authorization", format!("Bearer {}", common::auth_token(member_id))))
        .set_json(json!({
            "coach_id": coach_card_id,
            "day": "tuesday",
            "time": "10:00-11:00",
            "card_number": CARD,
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
    assert!(stub.lock().unwrap().forms.is_empty());
}

#[actix_web::test]
async fn booking_a_trainer_with_an_empty_week_is_rejected() {
    let member_id = Uuid::new_v4();
    let coach_card_id = Uuid::new_v4();
    let mut stub = member_stub(member_id);
    stub.coaches = vec![json!({
        "id": coach_card_id,
        "user_id": Uuid::new_v4(),
        "name": "New Coach",
        "activities": ["Workouts"],
        "schedule": {},
        "price": "0",
    })];
    let stub = Arc::new(Mutex::new(stub));
    let base = common::spawn_stub(stub.clone()).await;
    let app = test::init_service(
        App::new()
            .app_data(common::stub_state(&base))
            .configure(api_services),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/bookings")
        .insert_header(("Authorization", format!("Bearer {}", common::auth_token(member_id))))
        .set_json(json!({
            "coach_id": coach_card_id,
            "day": "monday",
            "time": "10:00-11:00",
            "card_number": CARD,
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn subscription_purchase_stores_plan_amount_verbatim() {
    let member_id = Uuid::new_v4();
    let stub = Arc::new(Mutex::new(member_stub(member_id)));
    let base = common::spawn_stub(stub.clone()).await;
    let app = test::init_service(
        App::new()
            .app_data(common::stub_state(&base))
            .configure(api_services),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/subscriptions")
        .insert_header(("Authorization", format!("Bearer {}", common::auth_token(member_id))))
        .set_json(json!({"plan": "Standard", "card_number": CARD}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["amount"], 2500);
    assert_eq!(body["data"]["status"], "completed");

    let s = stub.lock().unwrap();
    assert_eq!(s.purchases.len(), 1);
    assert_eq!(s.purchases[0]["amount"], 2500);
    assert!(
        s.purchases[0]["transaction_id"]
            .as_str()
            .unwrap()
            .starts_with("SUBSCRIPTION_")
    );
    assert_eq!(s.forms[0]["data"]["subscription_plan"], "Standard");
    assert_eq!(
        s.forms[0]["data"]["features"].as_array().unwrap().len(),
        5
    );
    // the linked purchase id points at the stored purchase
    assert_eq!(
        s.forms[0]["data"]["purchase_id"],
        s.purchases[0]["id"]
    );
}

#[actix_web::test]
async fn me_reconciles_over_http() {
    let member_id = Uuid::new_v4();
    let stub = Arc::new(Mutex::new(member_stub(member_id)));
    let base = common::spawn_stub(stub.clone()).await;
    let app = test::init_service(
        App::new()
            .app_data(common::stub_state(&base))
            .configure(api_services),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", format!("Bearer {}", common::auth_token(member_id))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user_id"], json!(member_id));
    assert_eq!(body["data"]["role"], "user");
}

#[actix_web::test]
async fn coach_card_save_invalidates_the_trainer_list() {
    let coach_id = Uuid::new_v4();
    let stub = Arc::new(Mutex::new(StubState {
        profiles: vec![json!({
            "id": coach_id,
            "email": "coach@gym.test",
            "role": "coach",
        })],
        ..Default::default()
    }));
    let base = common::spawn_stub(stub.clone()).await;
    let app = test::init_service(
        App::new()
            .app_data(common::stub_state(&base))
            .configure(api_services),
    )
    .await;
    let token = common::auth_token(coach_id);

    // prime the cache with the empty listing
    let req = test::TestRequest::get().uri("/api/trainers").to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // cached: a second read does not hit the backend again
    let before = stub.lock().unwrap().count_logged("GET /rest/v1/coaches");
    let req = test::TestRequest::get().uri("/api/trainers").to_request();
    test::call_service(&app, req).await;
    assert_eq!(
        stub.lock().unwrap().count_logged("GET /rest/v1/coaches"),
        before
    );

    // a coach write invalidates
    let req = test::TestRequest::put()
        .uri("/api/coach/profile")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({
            "name": "Iron Mike",
            "activities": ["Boxing", ""],
            "schedule": {"monday": ["10:00-11:00"]},
            "price": "800₽",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/trainers").to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    let trainers = body["data"].as_array().unwrap();
    assert_eq!(trainers.len(), 1);
    assert_eq!(trainers[0]["name"], "Iron Mike");
    // empty activity entries are dropped on save
    assert_eq!(trainers[0]["activities"], json!(["Boxing"]));
}
