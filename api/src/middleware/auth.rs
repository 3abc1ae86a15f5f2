//! Bearer-token authentication middleware for protected endpoints.
//!
//! The middleware reads the `Authorization` header, resolves the acting user
//! through the configured [`IdentityResolver`] and injects an
//! [`AuthContext`] into the request. Handlers take the context as an
//! extractor and hand its user id to the services explicitly. Requests
//! without a valid credential are answered with `401` before reaching the
//! handler.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use rh_core::errors::{AuthError, DomainError};
use rh_core::services::IdentityResolver;

use crate::handlers::{handle_domain_error, ApiError};

/// Acting user of an authenticated request
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub user_id: Uuid,
}

/// Authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    identity: Arc<dyn IdentityResolver>,
}

impl JwtAuth {
    /// Creates the middleware around an identity resolver
    pub fn new(identity: Arc<dyn IdentityResolver>) -> Self {
        Self { identity }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            identity: Arc::clone(&self.identity),
        }))
    }
}

/// Authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    identity: Arc<dyn IdentityResolver>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let token = extract_bearer_token(&req);
        let resolved = self.identity.resolve_acting_user(token.as_deref());

        Box::pin(async move {
            let user_id = match resolved {
                Ok(user_id) => user_id,
                Err(error) => {
                    tracing::debug!(path = %req.path(), "Request rejected: no valid credential");
                    let response = handle_domain_error(&error);
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            req.extensions_mut().insert(AuthContext { user_id });
            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .copied()
            .ok_or_else(|| ApiError(DomainError::Auth(AuthError::MissingCredential)).into());

        ready(result)
    }
}
