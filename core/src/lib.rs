//! Auction price history: range resolution, the store seam and the request
//! handler shared by the Lambda function and the local server.

pub mod auction;
pub mod config;
pub mod handler;
pub mod logging;
pub mod params;
pub mod range;
pub mod store;

pub use auction::{AuctionQuery, AuctionSummary};
pub use config::{Config, ConfigError};
pub use handler::{AuctionApi, CorsHeaders};
pub use params::AuctionParams;
pub use range::{RangeProfile, SamplingParams};
pub use store::{AuctionStore, PgAuctionStore, StoreError};

#[cfg(any(test, feature = "test-util"))]
pub use store::MemoryAuctionStore;
