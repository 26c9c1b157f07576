//! Static HTML page charting open issues per label

use std::fmt::Write as _;

use serde_json::{
    Map,
    Value,
};

use super::timeline::{
    Issue,
    extract_labels,
    timeline,
};

const TEMPLATE: &str = include_str!("template.html");

/// Name of the unfiltered series.
pub const ALL_ISSUES: &str = "All issues";

/// Series colours; the first is reserved for [`ALL_ISSUES`].
const COLORS: &[&str] = &[
    "#2196F3", "#4CAF50", "#FF9800", "#E91E63", "#9C27B0", "#00BCD4", "#FF5722", "#795548", "#607D8B",
    "#FFC107", "#8BC34A", "#3F51B5", "#F44336", "#009688", "#CDDC39", "#FF6F00", "#673AB7", "#00897B",
    "#C62828", "#5E35B1", "#D81B60", "#00ACC1", "#6D4C41", "#1565C0", "#EF6C00",
];

fn color(index: usize) -> &'static str {
    COLORS.get(index % COLORS.len()).copied().unwrap_or("#2196F3")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Embeddable JSON: `</` is escaped so a label cannot close the script tag.
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn filter_checkbox(out: &mut String, index: usize, name: &str, checked: bool) {
    let id = format!("filter-{index}");
    let class = if checked { " class=\"all\"" } else { "" };
    let checked = if checked { " checked" } else { "" };
    let name = escape_html(name);
    let _ = writeln!(
        out,
        "      <div{class}><input type=\"checkbox\" id=\"{id}\" value=\"{name}\"{checked}> <label for=\"{id}\">{name}</label></div>"
    );
}

/// Render the page with a series for all issues and one per label.
///
/// Only the "All issues" series is shown initially.
#[must_use]
pub fn render_html(issues: &[Issue], repo_name: &str) -> String {
    let labels = extract_labels(issues);

    let mut timelines = Map::new();
    let mut colors = Map::new();
    let mut filters = String::new();

    let series = std::iter::once((ALL_ISSUES, None)).chain(labels.iter().map(|label| (label.as_str(), Some(label.as_str()))));
    for (index, (name, label)) in series.enumerate() {
        tracing::debug!("Calculating the timeline of {name}");
        let points = serde_json::to_value(timeline(issues, label)).unwrap_or_default();
        timelines.insert(name.to_string(), points);
        colors.insert(name.to_string(), Value::String(color(index).to_string()));
        filter_checkbox(&mut filters, index, name, label.is_none());
    }

    TEMPLATE
        .replace("{{REPO_NAME}}", &escape_html(repo_name))
        .replace("{{FILTERS}}", filters.trim_end())
        .replace("{{TIMELINES}}", &script_json(&Value::Object(timelines)))
        .replace("{{COLORS}}", &script_json(&Value::Object(colors)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use serde_json::json;

    use super::*;

    fn issues() -> Vec<Issue> {
        serde_json::from_value(json!([
            {"number": 1, "created_at": "2024-01-01T00:00:00Z", "closed_at": null, "labels": [{"name": "bug"}]},
            {"number": 2, "created_at": "2024-02-01T00:00:00Z", "closed_at": null, "labels": [{"name": "<script>"}]},
        ]))
        .unwrap()
    }

    #[googletest::test]
    fn test_render_html_embeds_series_and_repo() {
        let html = render_html(&issues(), "acme/app");

        expect_that!(html, contains_substring("<title>Open Issues Over Time - acme/app</title>"));
        expect_that!(html, contains_substring(r#"const timelines = {"All issues":[{"date":"2024-01-01 00:00:00","count":1}"#));
        expect_that!(html, contains_substring(r##"const colorMap = {"All issues":"#2196F3","<script>":"#4CAF50","bug":"#FF9800"}"##));
        expect_that!(html, contains_substring(r#"value="All issues" checked>"#));
        expect_that!(html, not(contains_substring("{{")));
    }

    #[googletest::test]
    fn test_labels_are_escaped() {
        let html = render_html(&issues(), "acme/app");

        expect_that!(html, contains_substring("<label for=\"filter-1\">&lt;script&gt;</label>"));
        expect_that!(html, not(contains_substring("<label for=\"filter-1\"><script>")));
    }

    #[googletest::test]
    fn test_colors_wrap_around() {
        expect_that!(color(0), eq("#2196F3"));
        expect_that!(color(COLORS.len()), eq("#2196F3"));
    }
}
