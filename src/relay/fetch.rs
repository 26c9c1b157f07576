//! Relay list download

use crate::http::{
    FetchError,
    HttpClient,
};
use crate::input::relay::{
    RawLocations,
    RelayList,
};

/// Download the relay list and return its `locations` map.
///
/// Non-2xx responses and malformed bodies abort; nothing is retried.
pub fn fetch_relay_list(http: &dyn HttpClient, url: &str) -> Result<RawLocations, FetchError> {
    tracing::info!("Fetching relay list from {url}");

    let response = http.get(url, &[("Accept", "application/json")])?.error_for_status(url)?;
    let relay_list: RelayList = serde_json::from_str(&response.body)?;

    tracing::debug!(count = relay_list.locations.len(), "Fetched relay locations");
    Ok(relay_list.locations)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::test_utils::FakeHttpClient;

    const URL: &str = "https://api.example.test/app/v1/relays";

    #[googletest::test]
    fn test_fetch_returns_locations() {
        let http = FakeHttpClient::new().with_response(
            URL,
            200,
            r#"{"locations": {"se-got": {"country": "Sweden", "city": "Gothenburg"}}}"#,
        );

        let locations = fetch_relay_list(&http, URL).unwrap();

        expect_that!(locations.len(), eq(1));
        expect_that!(http.requested_urls(), elements_are![eq(URL)]);
    }

    #[googletest::test]
    fn test_non_success_status_aborts() {
        let http = FakeHttpClient::new().with_response(URL, 500, "oops");

        let result = fetch_relay_list(&http, URL);

        expect_that!(matches!(result, Err(FetchError::Status { status: 500, .. })), eq(true));
    }

    #[googletest::test]
    fn test_malformed_body_aborts() {
        let http = FakeHttpClient::new().with_response(URL, 200, "<html></html>");

        let result = fetch_relay_list(&http, URL);

        expect_that!(matches!(result, Err(FetchError::Json(_))), eq(true));
    }
}
