use crate::range::{RangeProfile, SamplingParams};

pub const REALM_ID: &str = "realmId";
pub const AUCTION_HOUSE_ID: &str = "auctionHouseId";
pub const ITEM_ID: &str = "itemId";
pub const RANGE: &str = "range";

/// Query string of a history request after best-effort coercion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuctionParams {
    pub realm_id: i16,
    pub auction_house_id: i16,
    pub item_id: i32,
    pub range: String,
}

impl AuctionParams {
    /// Builds params from any query source. Missing or non-numeric ids become
    /// 0 and a missing range becomes the empty token; nothing here fails.
    pub fn from_query<'a, F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        Self {
            realm_id: coerce(lookup(REALM_ID)) as i16,
            auction_house_id: coerce(lookup(AUCTION_HOUSE_ID)) as i16,
            item_id: coerce(lookup(ITEM_ID)) as i32,
            range: lookup(RANGE).unwrap_or_default().to_string(),
        }
    }

    pub fn sampling(&self, profile: RangeProfile) -> SamplingParams {
        profile.resolve(&self.range)
    }
}

// Parsed at 64 bits, then narrowed with wrapping to the column width.
fn coerce(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.parse::<i64>().ok()).unwrap_or(0)
}
