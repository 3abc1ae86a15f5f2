use std::collections::HashMap;
use std::time::Instant;

use actix_web::{web, HttpResponse};

use rh_core::repositories::{AgreementRepository, PropertyRepository, UserRepository};
use rh_shared::types::{HealthResponse, HealthStatus, ServiceHealth};

use crate::app::AppState;

/// Handler for GET /health
///
/// Reports `503` when the database probe fails.
pub async fn health<A, P, U>(state: web::Data<AppState<A, P, U>>) -> HttpResponse
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    let mut services = HashMap::new();
    services.insert(
        "api".to_string(),
        ServiceHealth {
            status: HealthStatus::Healthy,
            message: None,
            response_time_ms: None,
        },
    );

    let storage = match &state.database {
        Some(pool) => {
            let started = Instant::now();
            let (status, message) = match pool.health_check().await {
                Ok(true) => (HealthStatus::Healthy, None),
                Ok(false) => (HealthStatus::Degraded, Some("Unexpected probe result".to_string())),
                Err(error) => {
                    tracing::error!(error = %error, "Database health check failed");
                    (HealthStatus::Unhealthy, Some("Database unreachable".to_string()))
                }
            };
            ServiceHealth {
                status,
                message,
                response_time_ms: Some(started.elapsed().as_millis() as u64),
            }
        }
        None => ServiceHealth {
            status: HealthStatus::Healthy,
            message: Some("in-memory store".to_string()),
            response_time_ms: None,
        },
    };
    services.insert("storage".to_string(), storage);

    let health = HealthResponse::from_services(services, env!("CARGO_PKG_VERSION"));
    if health.status == HealthStatus::Unhealthy {
        HttpResponse::ServiceUnavailable().json(health)
    } else {
        HttpResponse::Ok().json(health)
    }
}
