//! HTTP server core implementation

use crate::config::ServerConfig;
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{EngineError, Result};
use actix_cors::Cors;
use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use tracing::info;
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    fn cors(config: &ServerConfig) -> Cors {
        let cors_config = &config.cors;
        if !cors_config.enabled {
            return Cors::default();
        }
        cors_config.warn_if_permissive();

        let mut cors = if cors_config.allows_all_origins() {
            Cors::default().allow_any_origin()
        } else {
            cors_config
                .allowed_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        };
        cors = cors
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allow_any_header()
            .max_age(cors_config.max_age as usize);
        cors
    }

    /// Create the Actix-web application
    pub(crate) fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let cors = Self::cors(&state.config.engine.server);

        App::new()
            .app_data(state)
            .app_data(routes::json_config())
            .app_data(routes::query_config())
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(DefaultHeaders::new().add(("Server", "predictive-alerts")))
            .configure(routes::configure_routes)
    }

    /// Bind and start serving. The returned handle stops the server.
    pub fn start(self) -> Result<(actix_web::dev::Server, ServerHandle)> {
        let bind_addr = self.config.address();
        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);
        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .disable_signals();
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| {
                EngineError::config(format!("Failed to bind {}: {}", bind_addr, e))
            })?
            .run();
        let handle = server.handle();

        info!("HTTP server listening on {}", bind_addr);
        Ok((server, handle))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}
