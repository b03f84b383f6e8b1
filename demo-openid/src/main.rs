use axum::{Router, middleware::from_fn_with_state, routing::get};
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use openid_rp::OpenIdPlugin;
use openid_rp_axum::{OPENID_ROUTE_PREFIX, openid_middleware, openid_router};

mod handlers;

use crate::handlers::{index, protected};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,openid_rp=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let plugin = Arc::new(OpenIdPlugin::from_env().await?);

    let app = Router::new()
        .route("/", get(index))
        .route("/protected", get(protected))
        .nest(OPENID_ROUTE_PREFIX.as_str(), openid_router(plugin.clone()))
        .layer(from_fn_with_state(plugin, openid_middleware));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
