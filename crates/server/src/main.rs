mod action;
mod auth;
mod concurrency;
mod config;
mod doc;
mod dtos;
mod error;
mod handlers;
mod routes;
mod state;
mod utils;

use crate::auth::ContosoClaims;
use crate::config::Config;
use crate::doc::ApiDoc;
use crate::routes::{health, resource_routes};
use crate::state::AppState;
use crate::utils::shutdown::shutdown_signal;
use axum::{Router, routing::get};
use database::db::create_connection;
use log::info;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine, the environment may already be set
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;

    let db = create_connection(&config.database_url).await?;
    if config.run_migrations {
        info!("Applying pending migrations");
        Migrator::up(&db, None).await?;
    }

    let mut oauth2_builder = <OAuth2ResourceServer<ContosoClaims>>::builder()
        .issuer_url(config.oidc_issuer_url.as_str());
    if let Some(audience) = &config.oidc_audience {
        oauth2_builder = oauth2_builder.audiences(&[audience.as_str()]);
    }
    let oauth2_resource_server = oauth2_builder
        .build()
        .await
        .map_err(|e| format!("failed to build OAuth2ResourceServer: {e:?}"))?;

    let app = Router::new()
        .merge(
            resource_routes()
                .layer(ServiceBuilder::new().layer(oauth2_resource_server.into_layer())),
        )
        .route("/health", get(health::health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .with_state(AppState { db: Arc::new(db) });

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("Running axum on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
