//! Integration tests for the rental agreement lifecycle over HTTP

mod common;

use actix_web::test;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};

use common::{
    agreement_body, create_agreement, create_property, register, start_time, test_app, TestUser,
};

fn sign_request(agreement_id: uuid::Uuid, user: &TestUser) -> actix_http::Request {
    test::TestRequest::post()
        .uri(&format!("/api/agreements/{}/sign", agreement_id))
        .insert_header(user.bearer())
        .to_request()
}

#[actix_web::test]
async fn test_create_sign_and_close() {
    let (app, ctx) = test_app().await;
    let landlord = register(&app, "Lara Landlord", "lara@example.com").await;
    let tenant = register(&app, "Tom Tenant", "tom@example.com").await;
    let property_id = create_property(&app, &landlord).await;

    let req = test::TestRequest::post()
        .uri("/api/agreements")
        .insert_header(landlord.bearer())
        .set_json(agreement_body(property_id, tenant.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["status"], "awaiting_signatures");
    assert_eq!(created["landlord"]["id"], landlord.id.to_string());
    assert_eq!(created["tenant"]["id"], tenant.id.to_string());
    assert_eq!(created["property"]["id"], property_id.to_string());
    assert_eq!(created["monthly_rent"], "1500.00");
    assert_eq!(created["due_date"], "2026-09-01");
    assert_eq!(created["landlord_signed"], false);
    assert!(created["closed_at"].is_null());

    let agreement_id: uuid::Uuid = created["id"].as_str().unwrap().parse().unwrap();

    let resp = test::call_service(&app, sign_request(agreement_id, &landlord)).await;
    assert_eq!(resp.status(), 200);
    let half: Value = test::read_body_json(resp).await;
    assert_eq!(half["landlord_signed"], true);
    assert_eq!(half["status"], "awaiting_signatures");
    assert!(half["property"]["occupant"].is_null());

    let closing_time = Utc.with_ymd_and_hms(2026, 3, 2, 15, 30, 0).unwrap();
    ctx.clock.set(closing_time);

    let resp = test::call_service(&app, sign_request(agreement_id, &tenant)).await;
    assert_eq!(resp.status(), 200);
    let closed: Value = test::read_body_json(resp).await;
    assert_eq!(closed["status"], "closed");
    assert_eq!(closed["tenant_signed"], true);
    assert_eq!(closed["property"]["occupant"]["id"], tenant.id.to_string());

    let closed_at: chrono::DateTime<Utc> = closed["closed_at"].as_str().unwrap().parse().unwrap();
    assert_eq!(closed_at, closing_time);

    let req = test::TestRequest::get()
        .uri(&format!("/api/agreements/{}", agreement_id))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, closed);
}

#[actix_web::test]
async fn test_create_requires_token() {
    let (app, _) = test_app().await;
    let landlord = register(&app, "Lara Landlord", "lara@example.com").await;
    let tenant = register(&app, "Tom Tenant", "tom@example.com").await;
    let property_id = create_property(&app, &landlord).await;

    let req = test::TestRequest::post()
        .uri("/api/agreements")
        .set_json(agreement_body(property_id, tenant.id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);
}

#[actix_web::test]
async fn test_second_agreement_for_property_conflicts() {
    let (app, _) = test_app().await;
    let landlord = register(&app, "Lara Landlord", "lara@example.com").await;
    let tenant = register(&app, "Tom Tenant", "tom@example.com").await;
    let other = register(&app, "Otto Other", "otto@example.com").await;
    let property_id = create_property(&app, &landlord).await;
    create_agreement(&app, &landlord, property_id, tenant.id).await;

    let req = test::TestRequest::post()
        .uri("/api/agreements")
        .insert_header(landlord.bearer())
        .set_json(agreement_body(property_id, other.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "CONFLICT");
    assert_eq!(body["message"], "Property already has a rental agreement.");
}

#[actix_web::test]
async fn test_terms_are_checked_against_the_clock() {
    let (app, ctx) = test_app().await;
    let landlord = register(&app, "Lara Landlord", "lara@example.com").await;
    let tenant = register(&app, "Tom Tenant", "tom@example.com").await;
    let property_id = create_property(&app, &landlord).await;

    let mut body = agreement_body(property_id, tenant.id);
    body["due_date"] = json!("2026-02-15");
    let req = test::TestRequest::post()
        .uri("/api/agreements")
        .insert_header(landlord.bearer())
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let error: Value = test::read_body_json(resp).await;
    assert_eq!(error["error"], "VALIDATION_ERROR");
    assert!(error["details"]["due_date"].is_array());

    // Today is not in the future either
    let mut body = agreement_body(property_id, tenant.id);
    body["due_date"] = json!(start_time().date_naive());
    let req = test::TestRequest::post()
        .uri("/api/agreements")
        .insert_header(landlord.bearer())
        .set_json(body)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let mut body = agreement_body(property_id, tenant.id);
    body["monthly_rent"] = json!("0");
    let req = test::TestRequest::post()
        .uri("/api/agreements")
        .insert_header(landlord.bearer())
        .set_json(body)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    // A due date valid now expires once the clock passes it
    ctx.clock.set(start_time() + Duration::days(365));
    let req = test::TestRequest::post()
        .uri("/api/agreements")
        .insert_header(landlord.bearer())
        .set_json(agreement_body(property_id, tenant.id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);
}

#[actix_web::test]
async fn test_landlord_cannot_be_tenant() {
    let (app, _) = test_app().await;
    let landlord = register(&app, "Lara Landlord", "lara@example.com").await;
    let property_id = create_property(&app, &landlord).await;

    let req = test::TestRequest::post()
        .uri("/api/agreements")
        .insert_header(landlord.bearer())
        .set_json(agreement_body(property_id, landlord.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_non_owner_cannot_create() {
    let (app, _) = test_app().await;
    let landlord = register(&app, "Lara Landlord", "lara@example.com").await;
    let tenant = register(&app, "Tom Tenant", "tom@example.com").await;
    let intruder = register(&app, "Ian Intruder", "ian@example.com").await;
    let property_id = create_property(&app, &landlord).await;

    let req = test::TestRequest::post()
        .uri("/api/agreements")
        .insert_header(intruder.bearer())
        .set_json(agreement_body(property_id, tenant.id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);
}

#[actix_web::test]
async fn test_double_sign_and_outsider_sign() {
    let (app, _) = test_app().await;
    let landlord = register(&app, "Lara Landlord", "lara@example.com").await;
    let tenant = register(&app, "Tom Tenant", "tom@example.com").await;
    let outsider = register(&app, "Olga Outsider", "olga@example.com").await;
    let property_id = create_property(&app, &landlord).await;
    let agreement_id = create_agreement(&app, &landlord, property_id, tenant.id).await;

    let resp = test::call_service(&app, sign_request(agreement_id, &tenant)).await;
    assert_eq!(resp.status(), 200);

    let resp = test::call_service(&app, sign_request(agreement_id, &tenant)).await;
    assert_eq!(resp.status(), 400);

    let resp = test::call_service(&app, sign_request(agreement_id, &outsider)).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::post()
        .uri(&format!("/api/agreements/{}/sign", agreement_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);
}

#[actix_web::test]
async fn test_edit_after_close_resets_signatures_and_vacates() {
    let (app, _) = test_app().await;
    let landlord = register(&app, "Lara Landlord", "lara@example.com").await;
    let tenant = register(&app, "Tom Tenant", "tom@example.com").await;
    let outsider = register(&app, "Olga Outsider", "olga@example.com").await;
    let property_id = create_property(&app, &landlord).await;
    let agreement_id = create_agreement(&app, &landlord, property_id, tenant.id).await;

    for user in [&landlord, &tenant] {
        let resp = test::call_service(&app, sign_request(agreement_id, user)).await;
        assert_eq!(resp.status(), 200);
    }

    let mut body = agreement_body(property_id, tenant.id);
    body["monthly_rent"] = json!("1750.50");

    let req = test::TestRequest::put()
        .uri(&format!("/api/agreements/{}", agreement_id))
        .insert_header(outsider.bearer())
        .set_json(body.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    let req = test::TestRequest::put()
        .uri(&format!("/api/agreements/{}", agreement_id))
        .insert_header(landlord.bearer())
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let edited: Value = test::read_body_json(resp).await;
    assert_eq!(edited["monthly_rent"], "1750.50");
    assert_eq!(edited["status"], "awaiting_signatures");
    assert_eq!(edited["landlord_signed"], false);
    assert_eq!(edited["tenant_signed"], false);
    assert!(edited["closed_at"].is_null());
    assert!(edited["property"]["occupant"].is_null());
}

#[actix_web::test]
async fn test_delete_agreement() {
    let (app, _) = test_app().await;
    let landlord = register(&app, "Lara Landlord", "lara@example.com").await;
    let tenant = register(&app, "Tom Tenant", "tom@example.com").await;
    let property_id = create_property(&app, &landlord).await;
    let agreement_id = create_agreement(&app, &landlord, property_id, tenant.id).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/agreements/{}", agreement_id))
        .insert_header(tenant.bearer())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/agreements/{}", agreement_id))
        .insert_header(landlord.bearer())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);

    let req = test::TestRequest::get()
        .uri(&format!("/api/agreements/{}", agreement_id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);

    // The property is free for a new agreement
    create_agreement(&app, &landlord, property_id, tenant.id).await;
}

#[actix_web::test]
async fn test_unknown_agreement_is_not_found() {
    let (app, _) = test_app().await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/agreements/{}", uuid::Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Rental agreement with the specified id does not exist.");
}
