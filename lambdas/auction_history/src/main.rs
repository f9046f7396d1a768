use auction_history_core::{AuctionApi, AuctionParams, AuctionStore, Config, PgAuctionStore};
use lambda_http::{run, service_fn, tracing};
use lambda_http::{Body, Error, Request, RequestExt, Response};

async fn function_handler<S: AuctionStore>(
    api: &AuctionApi<S>,
    event: Request,
) -> Result<Response<Body>, Error> {
    let query = event.query_string_parameters();
    let params = AuctionParams::from_query(|key| query.first(key));

    let response = api.get_auctions(&params).await;
    Ok(response.map(Body::from))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let store = PgAuctionStore::connect(&config.database_url).await?;
    let api = AuctionApi::new(store, config.range_profile, config.cors);

    let api = &api;
    run(service_fn(move |event: Request| async move {
        function_handler(api, event).await
    }))
    .await
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use auction_history_core::{AuctionSummary, CorsHeaders, MemoryAuctionStore, RangeProfile};

    use super::*;

    fn request(pairs: &[(&str, &str)]) -> Request {
        let query: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Request::default().with_query_string_parameters(query)
    }

    fn body_text(response: &Response<Body>) -> String {
        match response.body() {
            Body::Text(text) => text.clone(),
            other => panic!("expected a text body, got {other:?}"),
        }
    }

    fn api(store: MemoryAuctionStore) -> AuctionApi<MemoryAuctionStore> {
        AuctionApi::new(store, RangeProfile::Variable, CorsHeaders::default())
    }

    #[tokio::test]
    async fn reads_query_string() {
        let api = api(MemoryAuctionStore::with_rows(vec![AuctionSummary {
            timestamp: 480_000,
            quantity: 40,
            min: 900,
            p05: 910,
            p10: 920,
            p25: 950,
            p50: 1000,
            p75: 1100,
            p90: 1250,
        }]));
        let event = request(&[
            ("realmId", "5"),
            ("auctionHouseId", "2"),
            ("itemId", "13444"),
            ("range", "3m"),
        ]);

        let response = function_handler(&api, event).await.unwrap();

        assert_eq!(response.status(), 200);
        let query = api.store().queries()[0];
        assert_eq!(
            (query.interval, query.realm_id, query.auction_house_id, query.item_id, query.limit),
            (12, 5, 2, 13444, 186)
        );
        let rows: serde_json::Value = serde_json::from_str(&body_text(&response)).unwrap();
        assert_eq!(rows[0]["p50"], 1000);
    }

    #[tokio::test]
    async fn empty_query_string_still_queries() {
        let api = api(MemoryAuctionStore::with_rows(vec![]));

        let response = function_handler(&api, Request::default()).await.unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(body_text(&response), "[]");
        let query = api.store().queries()[0];
        assert_eq!((query.realm_id, query.item_id, query.interval, query.limit), (0, 0, 0, 0));
    }

    #[tokio::test]
    async fn store_error_keeps_cors_headers() {
        let api = api(MemoryAuctionStore::failing("connection reset"));

        let response = function_handler(&api, request(&[("range", "1d")])).await.unwrap();

        assert_eq!(response.status(), 500);
        assert_eq!(body_text(&response), r#"{"error":"An internal error occurred"}"#);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:3000"
        );
    }
}
