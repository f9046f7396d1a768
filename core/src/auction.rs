use serde::{Deserialize, Serialize};

use crate::{params::AuctionParams, range::SamplingParams};

/// One sampling bucket of the price distribution for an item.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuctionSummary {
    pub timestamp: i32,
    pub quantity: i32,
    pub min: i32,
    pub p05: i32,
    pub p10: i32,
    pub p25: i32,
    pub p50: i32,
    pub p75: i32,
    pub p90: i32,
}

/// Arguments of the single read the store performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuctionQuery {
    pub interval: i16,
    pub realm_id: i16,
    pub auction_house_id: i16,
    pub item_id: i32,
    pub limit: i16,
}

impl AuctionQuery {
    pub fn new(params: &AuctionParams, sampling: SamplingParams) -> Self {
        Self {
            interval: sampling.interval,
            realm_id: params.realm_id,
            auction_house_id: params.auction_house_id,
            item_id: params.item_id,
            limit: sampling.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_fields_in_order() {
        let summary = AuctionSummary {
            timestamp: 1_700_000,
            quantity: 12,
            min: 100,
            p05: 105,
            p10: 110,
            p25: 125,
            p50: 150,
            p75: 175,
            p90: 190,
        };
        assert_eq!(
            serde_json::to_string(&summary).unwrap(),
            r#"{"timestamp":1700000,"quantity":12,"min":100,"p05":105,"p10":110,"p25":125,"p50":150,"p75":175,"p90":190}"#
        );
    }
}
