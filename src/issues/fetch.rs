//! GitHub issue download

use std::path::{
    Path,
    PathBuf,
};

use serde_json::Value;

use super::IssuesError;
use crate::http::HttpClient;

pub const GITHUB_API_URL: &str = "https://api.github.com";
const PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    /// Issues written to the output directory.
    pub written: usize,
    pub pages: u32,
    /// Whether the download stopped at an issue that was already on disk.
    pub reached_known_issue: bool,
}

/// Whether a `Link` header advertises a next page.
#[must_use]
pub fn has_next_page(link: Option<&str>) -> bool {
    link.is_some_and(|link| {
        link.split(',').any(|part| part.split(';').skip(1).any(|param| param.trim() == "rel=\"next\""))
    })
}

fn page_url(api_url: &str, owner: &str, repo: &str, page: u32) -> String {
    format!(
        "{api_url}/repos/{owner}/{repo}/issues?state=all&sort=created&direction=desc&per_page={PER_PAGE}&page={page}"
    )
}

/// Download the issues of `owner/repo` newest first into `<out_dir>/<number>.json`.
///
/// Stops at the first issue already present in `out_dir`, so repeated runs
/// only fetch what is new.
pub fn fetch_issues(
    http: &dyn HttpClient,
    api_url: &str,
    owner: &str,
    repo: &str,
    out_dir: &Path,
    token: Option<&str>,
) -> Result<FetchSummary, IssuesError> {
    std::fs::create_dir_all(out_dir).map_err(|source| IssuesError::Io { path: out_dir.to_path_buf(), source })?;

    let authorization = token.map(|token| format!("Bearer {token}"));
    let mut headers = vec![("Accept", "application/vnd.github+json")];
    if let Some(value) = &authorization {
        headers.push(("Authorization", value.as_str()));
    }

    let mut summary = FetchSummary::default();
    for page in 1.. {
        let url = page_url(api_url, owner, repo, page);
        let response = http.get(&url, &headers)?.error_for_status(&url)?;
        summary.pages = page;

        let issues: Vec<Value> = serde_json::from_str(&response.body)?;
        tracing::info!("Fetched page {page} with {} issues", issues.len());

        for issue in &issues {
            let Some(number) = issue.get("number").and_then(Value::as_u64) else {
                tracing::warn!("Skipping an issue without a number");
                continue;
            };
            let path = issue_path(out_dir, number);
            if path.exists() {
                tracing::info!("Issue #{number} is already downloaded, stopping");
                summary.reached_known_issue = true;
                return Ok(summary);
            }
            let content = serde_json::to_string_pretty(issue)?;
            std::fs::write(&path, content).map_err(|source| IssuesError::Io { path, source })?;
            summary.written += 1;
        }

        if issues.is_empty() || !has_next_page(response.link.as_deref()) {
            break;
        }
    }

    Ok(summary)
}

fn issue_path(out_dir: &Path, number: u64) -> PathBuf {
    out_dir.join(format!("{number}.json"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::http::FetchError;
    use crate::test_utils::FakeHttpClient;

    const API: &str = "https://api.example.test";

    fn page(numbers: &[u64]) -> String {
        let issues: Vec<Value> = numbers.iter().map(|n| json!({"number": n, "title": format!("#{n}")})).collect();
        serde_json::to_string(&issues).unwrap()
    }

    const NEXT: &str = r#"<https://api.example.test/repositories/1/issues?page=2>; rel="next", <https://api.example.test/repositories/1/issues?page=3>; rel="last""#;

    #[rstest]
    #[case::next(Some(NEXT), true)]
    #[case::last_only(Some(r#"<https://x/issues?page=1>; rel="first", <https://x/issues?page=2>; rel="prev""#), false)]
    #[case::missing(None, false)]
    fn test_has_next_page(#[case] link: Option<&str>, #[case] expected: bool) {
        assert_eq!(has_next_page(link), expected);
    }

    #[googletest::test]
    fn test_follows_pages_until_no_next_link() {
        let temp_dir = TempDir::new().unwrap();
        let http = FakeHttpClient::new()
            .with_linked_response(&page_url(API, "acme", "app", 1), 200, &page(&[5, 4]), NEXT)
            .with_response(&page_url(API, "acme", "app", 2), 200, &page(&[3]));

        let summary = fetch_issues(&http, API, "acme", "app", temp_dir.path(), None).unwrap();

        expect_that!(summary, eq(FetchSummary { written: 3, pages: 2, reached_known_issue: false }));
        for number in [3, 4, 5] {
            expect_that!(temp_dir.path().join(format!("{number}.json")).is_file(), eq(true));
        }
    }

    #[googletest::test]
    fn test_stops_at_known_issue() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("4.json"), "{}").unwrap();
        let http = FakeHttpClient::new()
            .with_linked_response(&page_url(API, "acme", "app", 1), 200, &page(&[6, 5, 4, 3]), NEXT);

        let summary = fetch_issues(&http, API, "acme", "app", temp_dir.path(), None).unwrap();

        expect_that!(summary, eq(FetchSummary { written: 2, pages: 1, reached_known_issue: true }));
        expect_that!(temp_dir.path().join("3.json").exists(), eq(false));
        expect_that!(fs::read_to_string(temp_dir.path().join("4.json")).unwrap(), eq("{}"));
    }

    #[googletest::test]
    fn test_sends_token_as_bearer() {
        let temp_dir = TempDir::new().unwrap();
        let http = FakeHttpClient::new().with_response(&page_url(API, "acme", "app", 1), 200, "[]");

        fetch_issues(&http, API, "acme", "app", temp_dir.path(), Some("secret")).unwrap();

        let headers = http.requested_headers();
        expect_that!(headers.first().map(|h| h.contains(&("Authorization".to_string(), "Bearer secret".to_string()))), some(eq(true)));
    }

    #[googletest::test]
    fn test_error_status_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let http = FakeHttpClient::new().with_response(&page_url(API, "acme", "app", 1), 403, "rate limited");

        let result = fetch_issues(&http, API, "acme", "app", temp_dir.path(), None);

        expect_that!(matches!(result, Err(IssuesError::Fetch(FetchError::Status { status: 403, .. }))), eq(true));
    }
}
