use std::{collections::HashMap, sync::Arc};

use auction_history_core::{
    logging::init_tracing, AuctionApi, AuctionParams, AuctionStore,
    Config, ConfigError, CorsHeaders, PgAuctionStore, StoreError,
};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN},
        HeaderName, Method,
    },
    response::Response,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;

const BIND_ADDR: &str = "BIND_ADDR";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;
    let store = PgAuctionStore::connect(&config.database_url).await?;
    let api = Arc::new(AuctionApi::new(store, config.range_profile, config.cors));

    let addr = std::env::var(BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind { addr: addr.clone(), source })?;
    let ranges: Vec<_> = api.profile().tokens().collect();
    tracing::info!(%addr, profile = %api.profile(), ?ranges, "listening");

    axum::serve(listener, router(api))
        .await
        .map_err(ServerError::Serve)
}

fn router<S>(api: Arc<AuctionApi<S>>) -> Router
where
    S: AuctionStore + Send + Sync + 'static,
{
    let cors = preflight(api.cors());
    Router::new()
        .route("/auctions", get(get_auctions::<S>))
        .layer(cors)
        .with_state(api)
}

// Answers OPTIONS the way the gateway in front of the Lambda does.
fn preflight(headers: &CorsHeaders) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(headers.allow_origin().clone())
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            ORIGIN,
            HeaderName::from_static("x-requested-with"),
            CONTENT_TYPE,
            ACCEPT,
            AUTHORIZATION,
        ])
}

async fn get_auctions<S>(
    State(api): State<Arc<AuctionApi<S>>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response
where
    S: AuctionStore + Send + Sync + 'static,
{
    let params = AuctionParams::from_query(|key| query.get(key).map(String::as_str));
    api.get_auctions(&params).await.map(Body::from)
}
