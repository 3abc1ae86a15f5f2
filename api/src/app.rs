//! Application state and factory
//!
//! This module handles the initialization of the application state
//! and provides the factory for creating the Actix-web application.

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpResponse};

use rh_core::repositories::{AgreementRepository, PropertyRepository, UserRepository};
use rh_core::services::{
    Clock, IdentityResolver, PropertyService, RentalAgreementService, TokenService,
    TokenServiceConfig, UserService, UserServiceConfig,
};
use rh_infra::database::DatabasePool;
use rh_shared::config::{CorsConfig, JwtConfig, ServerConfig};
use rh_shared::{error_codes, ErrorResponse};

use crate::handlers::json_error_handler;
use crate::middleware::{auth::JwtAuth, cors::create_cors};
use crate::routes::{agreements, health, properties, users};

/// Application state that holds shared services
pub struct AppState<A, P, U>
where
    A: AgreementRepository,
    P: PropertyRepository,
    U: UserRepository,
{
    pub user_service: Arc<UserService<U>>,
    pub property_service: Arc<PropertyService<P, U>>,
    pub agreement_service: Arc<RentalAgreementService<A, P, U>>,
    /// Resolves bearer tokens for the authentication middleware
    pub identity: Arc<dyn IdentityResolver>,
    /// Pool probed by the health endpoint; absent for the in-memory store
    pub database: Option<DatabasePool>,
    pub cors: CorsConfig,
    pub max_payload_size: usize,
}

impl<A, P, U> AppState<A, P, U>
where
    A: AgreementRepository,
    P: PropertyRepository,
    U: UserRepository,
{
    /// Wire every service over the given repositories
    ///
    /// # Arguments
    ///
    /// * `agreements` - Agreement store
    /// * `properties` - Property store
    /// * `users` - User store
    /// * `jwt` - Token signing settings
    /// * `user_config` - Lockout policy and bcrypt cost
    /// * `clock` - Time source shared by every service
    pub fn new(
        agreements: Arc<A>,
        properties: Arc<P>,
        users: Arc<U>,
        jwt: &JwtConfig,
        user_config: UserServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let token_service = Arc::new(TokenService::new(TokenServiceConfig::from(jwt)));

        let user_service = Arc::new(UserService::new(
            Arc::clone(&users),
            Arc::clone(&token_service),
            Arc::clone(&clock),
            user_config,
        ));
        let property_service = Arc::new(PropertyService::new(
            Arc::clone(&properties),
            Arc::clone(&users),
            Arc::clone(&clock),
        ));
        let agreement_service = Arc::new(RentalAgreementService::new(
            agreements,
            properties,
            users,
            clock,
        ));

        Self {
            user_service,
            property_service,
            agreement_service,
            identity: token_service,
            database: None,
            cors: CorsConfig::default(),
            max_payload_size: ServerConfig::default().max_payload_size,
        }
    }

    /// Attach the pool checked by `/health`
    pub fn with_database(mut self, pool: DatabasePool) -> Self {
        self.database = Some(pool);
        self
    }

    pub fn with_cors(mut self, cors: CorsConfig) -> Self {
        self.cors = cors;
        self
    }

    pub fn with_max_payload_size(mut self, bytes: usize) -> Self {
        self.max_payload_size = bytes;
        self
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<A, P, U>(
    app_state: web::Data<AppState<A, P, U>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    A: AgreementRepository + 'static,
    P: PropertyRepository + 'static,
    U: UserRepository + 'static,
{
    let cors = create_cors(&app_state.cors);
    let json_config = web::JsonConfig::default()
        .limit(app_state.max_payload_size)
        .error_handler(json_error_handler);
    let auth = JwtAuth::new(Arc::clone(&app_state.identity));

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        // Middleware order: CORS wraps the handlers, logging wraps everything
        .wrap(cors)
        .wrap(Logger::default())
        .route("/health", web::get().to(health::health::<A, P, U>))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/users")
                        .route("/register", web::post().to(users::register::<A, P, U>))
                        .route("/login", web::post().to(users::login::<A, P, U>))
                        .service(
                            web::resource("/{id}")
                                .route(web::get().to(users::get_user::<A, P, U>))
                                .route(web::put().to(users::update_user::<A, P, U>).wrap(auth.clone()))
                                .route(web::delete().to(users::delete_user::<A, P, U>).wrap(auth.clone())),
                        ),
                )
                .service(
                    web::scope("/properties")
                        .route("", web::post().to(properties::create_property::<A, P, U>).wrap(auth.clone()))
                        .route("/rented", web::get().to(properties::list_rented::<A, P, U>))
                        .route("/available", web::get().to(properties::list_available::<A, P, U>))
                        .service(
                            web::resource("/{id}")
                                .route(web::get().to(properties::get_property::<A, P, U>))
                                .route(web::put().to(properties::update_property::<A, P, U>).wrap(auth.clone()))
                                .route(web::delete().to(properties::delete_property::<A, P, U>).wrap(auth.clone())),
                        ),
                )
                .service(
                    web::scope("/agreements")
                        .route("", web::post().to(agreements::create_agreement::<A, P, U>).wrap(auth.clone()))
                        .route("/{id}/sign", web::post().to(agreements::sign_agreement::<A, P, U>).wrap(auth.clone()))
                        .service(
                            web::resource("/{id}")
                                .route(web::get().to(agreements::get_agreement::<A, P, U>))
                                .route(web::put().to(agreements::update_agreement::<A, P, U>).wrap(auth.clone()))
                                .route(web::delete().to(agreements::delete_agreement::<A, P, U>).wrap(auth)),
                        ),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found.",
    ))
}
