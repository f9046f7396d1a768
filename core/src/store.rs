use std::future::Future;

use tokio_postgres::{Client, NoTls, Row, Statement};

use crate::auction::{AuctionQuery, AuctionSummary};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to connect to postgres: {0}")]
    Connect(#[source] tokio_postgres::Error),
    #[error("failed to prepare auction query: {0}")]
    Prepare(#[source] tokio_postgres::Error),
    #[error("auction query failed: {0}")]
    Query(#[source] tokio_postgres::Error),
    #[error("failed to decode auction row: {0}")]
    Decode(#[source] tokio_postgres::Error),
    #[error("{0}")]
    Other(String),
}

/// Read side of the auction time series.
pub trait AuctionStore {
    /// Rows for one (interval, realm, auction house, item) tuple, at most
    /// `query.limit` of them, in the order the store yields them.
    fn fetch_auctions(
        &self,
        query: &AuctionQuery,
    ) -> impl Future<Output = Result<Vec<AuctionSummary>, StoreError>> + Send;
}

const SELECT_AUCTIONS: &str = r#"SELECT "timestamp", quantity, min, p05, p10, p25, p50, p75, p90
    FROM auctions
    WHERE "interval" = $1 AND realm_id = $2 AND auction_house_id = $3 AND item_id = $4
    ORDER BY "timestamp" DESC
    LIMIT $5::smallint"#;

/// Postgres-backed store holding one connection for the life of the process.
pub struct PgAuctionStore {
    client: Client,
    select: Statement,
}

impl PgAuctionStore {
    pub async fn connect(connection_string: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls)
            .await
            .map_err(StoreError::Connect)?;
        tokio::spawn(async move {
            if let Err(err) = connection.await {
                tracing::error!(%err, "postgres connection error");
            }
        });

        let select = client
            .prepare(SELECT_AUCTIONS)
            .await
            .map_err(StoreError::Prepare)?;
        tracing::info!("connected to auction database");

        Ok(Self { client, select })
    }
}

impl AuctionStore for PgAuctionStore {
    async fn fetch_auctions(&self, query: &AuctionQuery) -> Result<Vec<AuctionSummary>, StoreError> {
        let rows = self
            .client
            .query(
                &self.select,
                &[
                    &query.interval,
                    &query.realm_id,
                    &query.auction_house_id,
                    &query.item_id,
                    &query.limit,
                ],
            )
            .await
            .map_err(StoreError::Query)?;

        rows.iter().map(summary_from_row).collect()
    }
}

fn summary_from_row(row: &Row) -> Result<AuctionSummary, StoreError> {
    let get = |column: &str| row.try_get::<_, i32>(column).map_err(StoreError::Decode);
    Ok(AuctionSummary {
        timestamp: get("timestamp")?,
        quantity: get("quantity")?,
        min: get("min")?,
        p05: get("p05")?,
        p10: get("p10")?,
        p25: get("p25")?,
        p50: get("p50")?,
        p75: get("p75")?,
        p90: get("p90")?,
    })
}

#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryAuctionStore;

#[cfg(any(test, feature = "test-util"))]
mod memory {
    use std::sync::Mutex;

    use super::{AuctionQuery, AuctionStore, AuctionSummary, StoreError};

    /// In-memory store that replays a scripted result and remembers every
    /// query it was asked.
    pub struct MemoryAuctionStore {
        result: Result<Vec<AuctionSummary>, String>,
        queries: Mutex<Vec<AuctionQuery>>,
    }

    impl MemoryAuctionStore {
        pub fn with_rows(rows: Vec<AuctionSummary>) -> Self {
            Self {
                result: Ok(rows),
                queries: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: impl Into<String>) -> Self {
            Self {
                result: Err(message.into()),
                queries: Mutex::new(Vec::new()),
            }
        }

        pub fn queries(&self) -> Vec<AuctionQuery> {
            self.queries.lock().unwrap().clone()
        }
    }

    impl AuctionStore for MemoryAuctionStore {
        async fn fetch_auctions(
            &self,
            query: &AuctionQuery,
        ) -> Result<Vec<AuctionSummary>, StoreError> {
            self.queries.lock().unwrap().push(*query);
            self.result.clone().map_err(StoreError::Other)
        }
    }
}
