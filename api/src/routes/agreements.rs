//! Rental agreement endpoints
//!
//! Create and edit check the due date and rent against the engine's clock
//! before the engine is asked to write anything.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use rh_core::repositories::{AgreementRepository, PropertyRepository, UserRepository};
use rh_core::services::AgreementDraft;

use crate::app::AppState;
use crate::dto::AgreementRequest;
use crate::handlers::handle_domain_error;
use crate::middleware::auth::AuthContext;

/// Handler for POST /api/agreements
///
/// # Request Body
///
/// ```json
/// {
///     "property_id": "3f0c...",
///     "tenant_id": "9a1e...",
///     "due_date": "2026-12-01",
///     "monthly_rent": "1500.00"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: past due date, non-positive rent, landlord as tenant
/// - 401 Unauthorized: missing token, or acting user does not own the property
/// - 404 Not Found: property or tenant missing
/// - 409 Conflict: property already has an agreement
pub async fn create_agreement<A, P, U>(
    state: web::Data<AppState<A, P, U>>,
    auth: AuthContext,
    request: web::Json<AgreementRequest>,
) -> HttpResponse
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    let draft = AgreementDraft::from(request.into_inner());
    if let Err(error) = state.agreement_service.validate_terms(&draft.terms) {
        return handle_domain_error(&error);
    }

    match state.agreement_service.create(draft, auth.user_id).await {
        Ok(agreement) => HttpResponse::Created().json(agreement),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for PUT /api/agreements/{id}
///
/// Any edit clears both signatures and vacates the property.
pub async fn update_agreement<A, P, U>(
    state: web::Data<AppState<A, P, U>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<AgreementRequest>,
) -> HttpResponse
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    let draft = AgreementDraft::from(request.into_inner());
    if let Err(error) = state.agreement_service.validate_terms(&draft.terms) {
        return handle_domain_error(&error);
    }

    match state
        .agreement_service
        .edit(path.into_inner(), draft, auth.user_id)
        .await
    {
        Ok(agreement) => HttpResponse::Ok().json(agreement),
        Err(error) => handle_domain_error(&error),
    }
}

pub async fn delete_agreement<A, P, U>(
    state: web::Data<AppState<A, P, U>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    match state.agreement_service.delete(path.into_inner(), auth.user_id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for POST /api/agreements/{id}/sign
///
/// Records the acting party's signature. The second signature closes the
/// agreement and moves the tenant into the property.
/// A signature that races another write on the same agreement is refused
/// with 409 Conflict and can be retried.
pub async fn sign_agreement<A, P, U>(
    state: web::Data<AppState<A, P, U>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    match state.agreement_service.sign(path.into_inner(), auth.user_id).await {
        Ok(agreement) => HttpResponse::Ok().json(agreement),
        Err(error) => handle_domain_error(&error),
    }
}

pub async fn get_agreement<A, P, U>(
    state: web::Data<AppState<A, P, U>>,
    path: web::Path<Uuid>,
) -> HttpResponse
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    match state.agreement_service.get_by_id(path.into_inner()).await {
        Ok(agreement) => HttpResponse::Ok().json(agreement),
        Err(error) => handle_domain_error(&error),
    }
}
