use actix_web::{web, HttpResponse};
use uuid::Uuid;

use rh_core::repositories::{AgreementRepository, PropertyRepository, UserRepository};

use crate::app::AppState;
use crate::dto::{LoginRequest, RegisterRequest, UpdateUserRequest};
use crate::handlers::{handle_domain_error, validate_request};
use crate::middleware::auth::AuthContext;

/// Handler for POST /api/users/register
///
/// Creates the account and logs it in. Responds `201` with a
/// `LoginResponse`; `409` when the e-mail is already registered.
pub async fn register<A, P, U>(
    state: web::Data<AppState<A, P, U>>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    if let Err(response) = validate_request(&request.0) {
        return response;
    }

    match state.user_service.register(request.into_inner().into()).await {
        Ok(login) => HttpResponse::Created().json(login),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for POST /api/users/login
///
/// ## Errors
/// - 401 Unauthorized: unknown e-mail or wrong password
/// - 423 Locked: too many consecutive failures
pub async fn login<A, P, U>(
    state: web::Data<AppState<A, P, U>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    if let Err(response) = validate_request(&request.0) {
        return response;
    }

    match state.user_service.login(&request.email, &request.password).await {
        Ok(login) => HttpResponse::Ok().json(login),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for GET /api/users/{id}
pub async fn get_user<A, P, U>(
    state: web::Data<AppState<A, P, U>>,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    match state.user_service.get_by_id(path.into_inner()).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for PUT /api/users/{id}
///
/// Only the account owner may edit it.
pub async fn update_user<A, P, U>(
    state: web::Data<AppState<A, P, U>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<UpdateUserRequest>,
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
        .user_service
        .edit(auth.user_id, path.into_inner(), request.into_inner().into())
        .await
    {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for DELETE /api/users/{id}
pub async fn delete_user<A, P, U>(
    state: web::Data<AppState<A, P, U>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    match state.user_service.delete(auth.user_id, path.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => handle_domain_error(&error),
    }
}
