//! Shared fixtures for the HTTP integration tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    test, web,
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use rh_api::app::{create_app, AppState};
use rh_core::services::{FixedClock, UserServiceConfig};
use rh_infra::InMemoryStore;
use rh_shared::config::{JwtConfig, LockoutConfig};

pub const PASSWORD: &str = "s3cret-pass";

/// Frozen "now" for every test app
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

/// Handle on the services behind a test app
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<FixedClock>,
}

/// Build an app over a fresh in-memory store and a fixed clock
pub async fn test_app() -> (
    impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    TestContext,
) {
    test_app_with_lockout(LockoutConfig::default()).await
}

pub async fn test_app_with_lockout(
    lockout: LockoutConfig,
) -> (
    impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    TestContext,
) {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(FixedClock::new(start_time()));
    let jwt = JwtConfig::new("integration-test-secret");

    let state = AppState::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        &jwt,
        UserServiceConfig::new(lockout).with_bcrypt_cost(4),
        clock.clone(),
    );

    let app = test::init_service(create_app(web::Data::new(state))).await;
    (app, TestContext { store, clock })
}

/// Registered account with its bearer token
pub struct TestUser {
    pub id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.token))
    }
}

pub async fn register<S, B>(app: &S, full_name: &str, email: &str) -> TestUser
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({
            "full_name": full_name,
            "email": email,
            "phone": "+55 11 99999-0000",
            "password": PASSWORD,
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201, "registration of {} failed", email);

    let body: Value = test::read_body_json(resp).await;
    TestUser {
        id: body["user"]["id"].as_str().unwrap().parse().unwrap(),
        token: body["access_token"].as_str().unwrap().to_string(),
    }
}

pub fn property_body() -> Value {
    json!({
        "street": "Rua das Flores",
        "postal_code": "01234-000",
        "city": "Sao Paulo",
        "state": "SP",
        "neighborhood": "Centro",
        "number": 42,
        "complement": "Apt 7",
    })
}

/// Create a property owned by `owner` and return its id
pub async fn create_property<S, B>(app: &S, owner: &TestUser) -> Uuid
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/properties")
        .insert_header(owner.bearer())
        .set_json(property_body())
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    body["id"].as_str().unwrap().parse().unwrap()
}

pub fn agreement_body(property_id: Uuid, tenant_id: Uuid) -> Value {
    json!({
        "property_id": property_id,
        "tenant_id": tenant_id,
        "due_date": "2026-09-01",
        "monthly_rent": "1500.00",
    })
}

/// Create an agreement as `landlord` and return its id
pub async fn create_agreement<S, B>(app: &S, landlord: &TestUser, property_id: Uuid, tenant_id: Uuid) -> Uuid
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/agreements")
        .insert_header(landlord.bearer())
        .set_json(agreement_body(property_id, tenant_id))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    body["id"].as_str().unwrap().parse().unwrap()
}
