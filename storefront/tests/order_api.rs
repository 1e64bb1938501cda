// storefront/tests/order_api.rs
mod common;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use common::*;
use serde_json::{json, Value};
use storefront::web::configure_app_routes;

macro_rules! init_app {
  ($state:expr) => {
    test::init_service(
      App::new()
        .app_data(web::Data::new($state.clone()))
        .configure(configure_app_routes),
    )
    .await
  };
}

fn bearer(token: &str) -> (header::HeaderName, String) {
  (header::AUTHORIZATION, format!("Bearer {}", token))
}

#[actix_web::test]
async fn health_check_answers_without_auth() {
  let app = test_app();
  let service = init_app!(app.state);

  let resp = test::call_service(&service, test::TestRequest::get().uri("/api/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "status": "ok" }));
}

#[actix_web::test]
async fn gateway_checkout_creates_then_verifies() {
  let app = test_app();
  let (_, token) = seed_user(&app.state, "Asha", "asha@example.com").await;
  let service = init_app!(app.state);

  let req = test::TestRequest::post()
    .uri("/api/orders")
    .insert_header(bearer(&token))
    .set_json(order_body("gateway"))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created: Value = test::read_body_json(resp).await;

  assert_eq!(created["isPaid"], false);
  assert_eq!(created["totalPrice"], "1199.43");
  assert_eq!(created["gateway"]["keyId"], GATEWAY_KEY_ID);
  assert_eq!(created["gateway"]["amount"], 119943);
  let body_text = created.to_string();
  assert!(!body_text.contains(GATEWAY_SECRET));

  let order_id = created["id"].as_str().unwrap().to_string();
  let reference = created["gateway"]["gatewayOrderId"].as_str().unwrap().to_string();
  assert_eq!(created["gatewayOrderId"], reference.as_str());

  let req = test::TestRequest::put()
    .uri(&format!("/api/orders/{}/pay", order_id))
    .insert_header(bearer(&token))
    .set_json(signed_proof(&reference, "pay_777"))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let paid: Value = test::read_body_json(resp).await;
  assert_eq!(paid["success"], true);
  assert_eq!(paid["order"]["isPaid"], true);
  assert_eq!(paid["order"]["paymentResult"]["id"], "pay_777");
  assert_eq!(paid["order"]["paymentResult"]["status"], "SUCCESS");
  assert!(paid["order"]["paidAt"].is_string());

  // Confirming again changes nothing.
  let req = test::TestRequest::put()
    .uri(&format!("/api/orders/{}/pay", order_id))
    .insert_header(bearer(&token))
    .set_json(signed_proof(&reference, "pay_888"))
    .to_request();
  let again: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(again["success"], true);
  assert_eq!(again["order"]["paymentResult"]["id"], "pay_777");
  assert_eq!(again["order"]["paidAt"], paid["order"]["paidAt"]);
}

#[actix_web::test]
async fn bad_signature_is_rejected_with_success_false() {
  let app = test_app();
  let (_, token) = seed_user(&app.state, "Ben", "ben@example.com").await;
  let service = init_app!(app.state);

  let req = test::TestRequest::post()
    .uri("/api/orders")
    .insert_header(bearer(&token))
    .set_json(order_body("gateway"))
    .to_request();
  let created: Value = test::call_and_read_body_json(&service, req).await;
  let order_id = created["id"].as_str().unwrap().to_string();
  let reference = created["gatewayOrderId"].as_str().unwrap().to_string();

  let req = test::TestRequest::put()
    .uri(&format!("/api/orders/{}/pay", order_id))
    .insert_header(bearer(&token))
    .set_json(json!({ "gatewayOrderId": reference, "gatewayPaymentId": "pay_1", "signature": "deadbeef" }))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "success": false, "error": "Invalid payment signature" }));

  let req = test::TestRequest::get()
    .uri(&format!("/api/orders/{}", order_id))
    .insert_header(bearer(&token))
    .to_request();
  let fetched: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(fetched["isPaid"], false);
  assert!(fetched["paymentResult"].is_null());
}

#[actix_web::test]
async fn pay_requires_every_proof_field() {
  let app = test_app();
  let (_, token) = seed_user(&app.state, "Cal", "cal@example.com").await;
  let service = init_app!(app.state);

  let req = test::TestRequest::put()
    .uri(&format!("/api/orders/{}/pay", uuid::Uuid::new_v4()))
    .insert_header(bearer(&token))
    .set_json(json!({ "gatewayOrderId": "order_1", "gatewayPaymentId": "", "signature": "abc" }))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "gatewayPaymentId is required");
}

#[actix_web::test]
async fn cash_on_delivery_order_has_no_gateway_block() {
  let app = test_app();
  let (_, token) = seed_user(&app.state, "Dia", "dia@example.com").await;
  let service = init_app!(app.state);

  let req = test::TestRequest::post()
    .uri("/api/orders")
    .insert_header(bearer(&token))
    .set_json(order_body("COD"))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created: Value = test::read_body_json(resp).await;
  assert_eq!(created["paymentMethod"], "cash-on-delivery");
  assert!(created.get("gateway").is_none());
  assert!(created["gatewayOrderId"].is_null());
  assert!(app.gateway.created_intents().is_empty());
}

#[actix_web::test]
async fn protected_routes_reject_missing_or_bad_tokens() {
  let app = test_app();
  let service = init_app!(app.state);

  let resp = test::call_service(
    &service,
    test::TestRequest::post().uri("/api/orders").set_json(order_body("gateway")).to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Not authorized, no token");

  let resp = test::call_service(
    &service,
    test::TestRequest::get()
      .uri("/api/orders/mine")
      .insert_header(bearer("not.a.jwt"))
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  // Signed correctly but for a user that does not exist.
  let ghost = storefront::services::auth_service::issue_token(uuid::Uuid::new_v4(), "ghost@example.com", JWT_SECRET, 7)
    .unwrap();
  let resp = test::call_service(
    &service,
    test::TestRequest::get().uri("/api/users/profile").insert_header(bearer(&ghost)).to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn invalid_order_bodies_are_bad_requests() {
  let app = test_app();
  let (_, token) = seed_user(&app.state, "Eli", "eli@example.com").await;
  let service = init_app!(app.state);

  let mut empty = order_body("gateway");
  empty["orderItems"] = json!([]);
  let resp = test::call_service(
    &service,
    test::TestRequest::post()
      .uri("/api/orders")
      .insert_header(bearer(&token))
      .set_json(empty)
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "No order items");

  let mut unknown_method = order_body("gateway");
  unknown_method["paymentMethod"] = json!("barter");
  let resp = test::call_service(
    &service,
    test::TestRequest::post()
      .uri("/api/orders")
      .insert_header(bearer(&token))
      .set_json(unknown_method)
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

  let resp = test::call_service(
    &service,
    test::TestRequest::post()
      .uri("/api/orders")
      .insert_header(bearer(&token))
      .insert_header((header::CONTENT_TYPE, "application/json"))
      .set_payload("{ not json")
      .to_request(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert!(app.gateway.created_intents().is_empty());
}

#[actix_web::test]
async fn unknown_or_malformed_order_ids_are_not_found() {
  let app = test_app();
  let (_, token) = seed_user(&app.state, "Fay", "fay@example.com").await;
  let service = init_app!(app.state);

  for uri in [format!("/api/orders/{}", uuid::Uuid::new_v4()), "/api/orders/not-a-uuid".to_string()] {
    let resp = test::call_service(
      &service,
      test::TestRequest::get().uri(&uri).insert_header(bearer(&token)).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Order not found");
  }
}

#[actix_web::test]
async fn my_orders_only_lists_the_callers_orders() {
  let app = test_app();
  let (_, alice) = seed_user(&app.state, "Alice", "alice@example.com").await;
  let (_, bob) = seed_user(&app.state, "Bob", "bob@example.com").await;
  let service = init_app!(app.state);

  for (token, method) in [(&alice, "gateway"), (&alice, "cash-on-delivery"), (&bob, "gateway")] {
    let req = test::TestRequest::post()
      .uri("/api/orders")
      .insert_header(bearer(token))
      .set_json(order_body(method))
      .to_request();
    assert_eq!(test::call_service(&service, req).await.status(), StatusCode::CREATED);
  }

  let req = test::TestRequest::get()
    .uri("/api/orders/mine")
    .insert_header(bearer(&alice))
    .to_request();
  let mine: Value = test::call_and_read_body_json(&service, req).await;
  let mine = mine.as_array().unwrap();
  assert_eq!(mine.len(), 2);
  assert_eq!(mine[0]["paymentMethod"], "cash-on-delivery");
  assert_eq!(mine[1]["paymentMethod"], "gateway");

  let req = test::TestRequest::get()
    .uri("/api/orders/myorders")
    .insert_header(bearer(&bob))
    .to_request();
  let bobs: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(bobs.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn get_order_includes_owner_name_and_email() {
  let app = test_app();
  let (_, token) = seed_user(&app.state, "Gus", "gus@example.com").await;
  let service = init_app!(app.state);

  let req = test::TestRequest::post()
    .uri("/api/orders")
    .insert_header(bearer(&token))
    .set_json(order_body("cash-on-delivery"))
    .to_request();
  let created: Value = test::call_and_read_body_json(&service, req).await;

  let req = test::TestRequest::get()
    .uri(&format!("/api/orders/{}", created["id"].as_str().unwrap()))
    .insert_header(bearer(&token))
    .to_request();
  let fetched: Value = test::call_and_read_body_json(&service, req).await;
  assert_eq!(fetched["user"]["name"], "Gus");
  assert_eq!(fetched["user"]["email"], "gus@example.com");
  assert_eq!(fetched["shippingAddress"]["city"], "Bengaluru");
  assert_eq!(fetched["orderItems"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn register_login_and_cookie_auth() {
  let app = test_app();
  let service = init_app!(app.state);

  let req = test::TestRequest::post()
    .uri("/api/users")
    .set_json(json!({ "name": "Hal", "email": "Hal@Example.com", "password": "hunter22" }))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let cookie = resp
    .response()
    .cookies()
    .find(|c| c.name() == "token")
    .expect("token cookie")
    .into_owned();
  assert!(cookie.http_only().unwrap_or(false));
  let registered: Value = test::read_body_json(resp).await;
  assert_eq!(registered["email"], "hal@example.com");
  assert_eq!(registered["isAdmin"], false);
  assert!(registered.get("passwordHash").is_none());
  assert_eq!(registered["token"], cookie.value());

  // Duplicate signup.
  let req = test::TestRequest::post()
    .uri("/api/users")
    .set_json(json!({ "name": "Hal", "email": "hal@example.com", "password": "hunter22" }))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "User already exists");

  // Wrong password.
  let req = test::TestRequest::post()
    .uri("/api/users/login")
    .set_json(json!({ "email": "hal@example.com", "password": "wrong-one" }))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Invalid email or password");

  // Right password.
  let req = test::TestRequest::post()
    .uri("/api/users/login")
    .set_json(json!({ "email": "hal@example.com", "password": "hunter22" }))
    .to_request();
  let logged_in: Value = test::call_and_read_body_json(&service, req).await;
  assert!(logged_in["token"].as_str().is_some_and(|t| !t.is_empty()));

  // The cookie alone authenticates.
  let req = test::TestRequest::get().uri("/api/users/profile").cookie(cookie).to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let profile: Value = test::read_body_json(resp).await;
  assert_eq!(profile["name"], "Hal");
  assert!(profile.get("token").is_none());

  let req = test::TestRequest::post().uri("/api/users/logout").to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let cleared = resp.response().cookies().find(|c| c.name() == "token").expect("removal cookie");
  assert_eq!(cleared.value(), "");
}

#[actix_web::test]
async fn registration_input_is_validated() {
  let app = test_app();
  let service = init_app!(app.state);

  let req = test::TestRequest::post()
    .uri("/api/users")
    .set_json(json!({ "name": "Ivy", "email": "not-an-email", "password": "hunter22" }))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Valid email is required");

  let req = test::TestRequest::post()
    .uri("/api/users")
    .set_json(json!({ "name": "Ivy", "email": "ivy@example.com", "password": "123" }))
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn signature_for_another_payment_id_is_rejected() {
  let app = test_app();
  let (_, token) = seed_user(&app.state, "Joy", "joy@example.com").await;
  let service = init_app!(app.state);

  let req = test::TestRequest::post()
    .uri("/api/orders")
    .insert_header(bearer(&token))
    .set_json(order_body("gateway"))
    .to_request();
  let created: Value = test::call_and_read_body_json(&service, req).await;
  let order_id = created["id"].as_str().unwrap().to_string();
  let reference = created["gatewayOrderId"].as_str().unwrap().to_string();

  let mut proof = signed_proof(&reference, "pay_signed");
  proof["gatewayPaymentId"] = json!("pay_submitted");
  let req = test::TestRequest::put()
    .uri(&format!("/api/orders/{}/pay", order_id))
    .insert_header(bearer(&token))
    .set_json(proof)
    .to_request();
  let resp = test::call_service(&service, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["success"], false);

  let stored = app.state.orders.find(order_id.parse().unwrap()).await.unwrap().unwrap();
  assert!(!stored.is_paid);
  assert!(stored.paid_at.is_none());
}
