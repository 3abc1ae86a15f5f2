use actix_web::{web, HttpResponse};
use uuid::Uuid;

use rh_core::repositories::{AgreementRepository, PropertyRepository, UserRepository};

use crate::app::AppState;
use crate::dto::PropertyRequest;
use crate::handlers::{handle_domain_error, validate_request};
use crate::middleware::auth::AuthContext;

/// Handler for POST /api/properties
///
/// The acting user becomes the owner; the occupant starts empty.
pub async fn create_property<A, P, U>(
    state: web::Data<AppState<A, P, U>>,
    auth: AuthContext,
    request: web::Json<PropertyRequest>,
) -> HttpResponse
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    if let Err(response) = validate_request(&request.0) {
        return response;
    }

    match state
        .property_service
        .create(request.into_inner().into(), auth.user_id)
        .await
    {
        Ok(property) => HttpResponse::Created().json(property),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for PUT /api/properties/{id}
///
/// ## Errors
/// - 403 Forbidden: acting user is not the owner
/// - 404 Not Found: property or broker missing
pub async fn update_property<A, P, U>(
    state: web::Data<AppState<A, P, U>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<PropertyRequest>,
) -> HttpResponse
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    if let Err(response) = validate_request(&request.0) {
        return response;
    }

    match state
        .property_service
        .edit(path.into_inner(), request.into_inner().into(), auth.user_id)
        .await
    {
        Ok(property) => HttpResponse::Ok().json(property),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for DELETE /api/properties/{id}
pub async fn delete_property<A, P, U>(
    state: web::Data<AppState<A, P, U>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    match state.property_service.delete(path.into_inner(), auth.user_id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for GET /api/properties/{id}
pub async fn get_property<A, P, U>(
    state: web::Data<AppState<A, P, U>>,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    match state.property_service.get_by_id(path.into_inner()).await {
        Ok(property) => HttpResponse::Ok().json(property),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for GET /api/properties/rented
pub async fn list_rented<A, P, U>(state: web::Data<AppState<A, P, U>>) -> HttpResponse
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    match state.property_service.list_rented().await {
        Ok(properties) => HttpResponse::Ok().json(properties),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for GET /api/properties/available
pub async fn list_available<A, P, U>(state: web::Data<AppState<A, P, U>>) -> HttpResponse
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    match state.property_service.list_available().await {
        Ok(properties) => HttpResponse::Ok().json(properties),
        Err(error) => handle_domain_error(&error),
    }
}
