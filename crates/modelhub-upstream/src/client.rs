use std::sync::OnceLock;

use http::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};

/// Catalog host. Serves the per-tier display-model listings.
pub const CATALOG_BASE_URL: &str = "https://www.a4f.co";
/// Generation API host, bearer-token authenticated.
pub const API_BASE_URL: &str = "https://api.a4f.co";

/// Handle to the aggregator. Base URLs are fixed in production and swapped
/// for a mock server in tests.
#[derive(Clone)]
pub struct Upstream {
    pub(crate) client: wreq::Client,
    pub(crate) catalog_base: String,
    pub(crate) api_base: String,
}

impl Upstream {
    pub fn new() -> Self {
        Self::with_base_urls(CATALOG_BASE_URL, API_BASE_URL)
    }

    pub fn with_base_urls(catalog_base: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: shared_client().clone(),
            catalog_base: catalog_base.into(),
            api_base: api_base.into(),
        }
    }
}

impl Default for Upstream {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn shared_client() -> &'static wreq::Client {
    static CLIENT: OnceLock<wreq::Client> = OnceLock::new();
    CLIENT.get_or_init(wreq::Client::new)
}

/// The catalog endpoint only answers browser-looking requests, so the
/// header set mimics Chrome on Windows.
pub(crate) fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-GB,en-US;q=0.9,en;q=0.8"),
    );
    headers.insert(
        HeaderName::from_static("priority"),
        HeaderValue::from_static("u=1, i"),
    );
    headers.insert(
        REFERER,
        HeaderValue::from_static("https://www.a4f.co/models"),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua"),
        HeaderValue::from_static(
            "\"Not;A=Brand\";v=\"99\", \"Google Chrome\";v=\"139\", \"Chromium\";v=\"139\"",
        ),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-mobile"),
        HeaderValue::from_static("?0"),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-platform"),
        HeaderValue::from_static("\"Windows\""),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("empty"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("cors"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36",
        ),
    );
    headers
}
