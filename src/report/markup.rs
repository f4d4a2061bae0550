//! Small HTML building helpers.
//!
//! Markup is assembled as plain strings; every piece of test data that
//! ends up in the output goes through [`escape_text`] or [`escape_attr`].

use crate::config::GithubConfig;
use crate::models::{BuildTool, Issue, Test};

/// Doctype prepended to every full page.
pub const DOCTYPE: &str = "<!DOCTYPE html>";

/// Escape text content.
pub fn escape_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
pub fn escape_attr(input: &str) -> String {
    escape_text(input)
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Turn rendered body markup into a complete page.
pub fn render_page(markup: &str) -> String {
    format!("{}{}", DOCTYPE, markup)
}

/// Link to a file in the source repository.
///
/// `git_ref` defaults to the configured default branch.
pub fn github_link(github: &GithubConfig, file_path: &str, git_ref: Option<&str>) -> String {
    let git_ref = git_ref.unwrap_or(&github.default_branch);
    format!("{}tree/{}/{}", github.repository, git_ref, file_path)
}

/// Render the issue list of `test` for `tool`.
///
/// Returns `None` when the test has no result for the tool or the result
/// lists no issues.
pub fn render_issue_links(test: &Test, tool: &BuildTool) -> Option<String> {
    let issues = test.result_for(tool)?.meta.issue.as_ref()?;

    let mut html = String::new();
    html.push_str("<h2>Issues</h2>");
    html.push_str("<ul class=\"issues\">");
    for issue in issues {
        html.push_str(&render_issue_item(issue));
    }
    html.push_str("</ul>");

    Some(html)
}

fn render_issue_item(issue: &Issue) -> String {
    let open_tag = if issue.status.is_open() {
        "<li>".to_string()
    } else {
        "<li style=\"text-decoration: line-through\">".to_string()
    };

    let body = if issue.has_no_url() {
        escape_text(&issue.url)
    } else {
        format!(
            "<a href=\"{}\">{}</a>",
            escape_attr(&issue.url),
            escape_text(issue.link_text())
        )
    };

    format!("{}{}</li>", open_tag, body)
}
