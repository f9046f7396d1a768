use http::{
    header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        CONTENT_TYPE,
    },
    HeaderValue, Response, StatusCode,
};

use crate::{
    auction::AuctionQuery,
    params::AuctionParams,
    range::RangeProfile,
    store::AuctionStore,
};

pub const DEFAULT_ALLOW_ORIGIN: &str = "http://localhost:3000";
pub const ALLOW_METHODS: &str = "GET, OPTIONS";
pub const ALLOW_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept, Authorization";
pub const INTERNAL_ERROR: &str = "An internal error occurred";

/// Header set stamped on every response, success or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsHeaders {
    allow_origin: HeaderValue,
}

impl CorsHeaders {
    pub fn new(allow_origin: HeaderValue) -> Self {
        Self { allow_origin }
    }

    pub fn allow_origin(&self) -> &HeaderValue {
        &self.allow_origin
    }

    fn apply<B>(&self, response: &mut Response<B>) {
        let headers = response.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    }
}

impl Default for CorsHeaders {
    fn default() -> Self {
        Self::new(HeaderValue::from_static(DEFAULT_ALLOW_ORIGIN))
    }
}

/// Everything a request needs, built once at startup and shared by every
/// invocation.
pub struct AuctionApi<S> {
    store: S,
    profile: RangeProfile,
    cors: CorsHeaders,
}

impl<S: AuctionStore> AuctionApi<S> {
    pub fn new(store: S, profile: RangeProfile, cors: CorsHeaders) -> Self {
        Self { store, profile, cors }
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn profile(&self) -> RangeProfile {
        self.profile
    }

    pub fn cors(&self) -> &CorsHeaders {
        &self.cors
    }

    /// Resolves the range, runs the read and renders the JSON response. Store
    /// failures are logged and answered with a generic 500.
    pub async fn get_auctions(&self, params: &AuctionParams) -> Response<String> {
        let sampling = params.sampling(self.profile);
        let query = AuctionQuery::new(params, sampling);
        tracing::debug!(?query, range = %params.range, profile = %self.profile, "fetching auctions");

        let auctions = match self.store.fetch_auctions(&query).await {
            Ok(auctions) => auctions,
            Err(err) => {
                tracing::error!(%err, ?query, "An error occurred");
                return self.internal_error();
            }
        };

        match serde_json::to_string(&auctions) {
            Ok(body) => self.respond(StatusCode::OK, body),
            Err(err) => {
                tracing::error!(%err, "failed to encode auctions");
                self.internal_error()
            }
        }
    }

    fn internal_error(&self) -> Response<String> {
        let body = serde_json::json!({ "error": INTERNAL_ERROR }).to_string();
        self.respond(StatusCode::INTERNAL_SERVER_ERROR, body)
    }

    fn respond(&self, status: StatusCode, body: String) -> Response<String> {
        let mut response = Response::new(body);
        *response.status_mut() = status;
        self.cors.apply(&mut response);
        response
    }
}
