//! Report generation.
//!
//! Builds the score summary page and the JSON score dump from the
//! aggregated results, and collects them into an [`OutputMap`] for
//! the writer.

use super::markup::{escape_attr, escape_text, github_link, render_issue_links, render_page};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::models::{BuildTool, Score, Test, TestScores, Tests, ToolSummary};
use crate::output::OutputMap;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Machine readable form of the scores.
#[derive(Debug, Serialize)]
struct ScoreReport<'a> {
    generated_at: DateTime<Utc>,
    totals: &'a [ToolSummary],
    tests: &'a [TestScores],
}

/// Everything the renderers need for one build.
pub struct ReportInput<'a> {
    pub tests: &'a Tests,
    pub totals: &'a [ToolSummary],
    pub per_test: &'a [TestScores],
    pub config: &'a Config,
    pub generated_at: DateTime<Utc>,
}

/// Collect the files to write for the requested format.
pub fn build_output_map(input: &ReportInput<'_>, format: OutputFormat) -> Result<OutputMap> {
    let mut files = OutputMap::new();

    if format.includes_html() {
        files.insert("index.html".to_string(), generate_summary_page(input));
    }
    if format.includes_json() {
        files.insert(
            "scores.json".to_string(),
            generate_json_report(input.totals, input.per_test, input.generated_at)?,
        );
    }

    Ok(files)
}

/// Generate the JSON score dump.
pub fn generate_json_report(
    totals: &[ToolSummary],
    per_test: &[TestScores],
    generated_at: DateTime<Utc>,
) -> Result<String> {
    let report = ScoreReport {
        generated_at,
        totals,
        tests: per_test,
    };
    serde_json::to_string_pretty(&report).map_err(Into::into)
}

/// Generate the complete summary page.
pub fn generate_summary_page(input: &ReportInput<'_>) -> String {
    let mut body = String::new();

    body.push_str("<html lang=\"en\"><head><meta charset=\"utf-8\">");
    body.push_str("<title>Build tool compatibility</title></head><body>");
    body.push_str("<h1>Build tool compatibility</h1>");

    body.push_str(&generate_totals_table(input.totals));
    body.push_str(&generate_test_table(input.per_test, input.config.tools()));
    body.push_str(&generate_details_section(input.tests, input.config.tools(), input.config));
    body.push_str(&generate_footer(input.config, input.generated_at));

    body.push_str("</body></html>");

    render_page(&body)
}

fn format_score(score: &Score) -> String {
    format!("{} / {} ({:.0}%)", score.score, score.possible, score.percent())
}

/// Generate the per-tool totals table.
fn generate_totals_table(totals: &[ToolSummary]) -> String {
    let mut section = String::new();

    section.push_str("<h2>Totals</h2><table class=\"totals\"><thead><tr>");
    section.push_str("<th>Tool</th><th>Score</th></tr></thead><tbody>");
    for summary in totals {
        section.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            escape_text(summary.tool.as_str()),
            format_score(&summary.score)
        ));
    }
    section.push_str("</tbody></table>");

    section
}

/// Generate the test × tool matrix.
fn generate_test_table(per_test: &[TestScores], tools: &[BuildTool]) -> String {
    let mut section = String::new();

    section.push_str("<h2>Tests</h2><table class=\"tests\"><thead><tr><th>Test</th>");
    for tool in tools {
        section.push_str(&format!("<th>{}</th>", escape_text(tool.as_str())));
    }
    section.push_str("</tr></thead><tbody>");

    for row in per_test {
        section.push_str(&format!(
            "<tr><td><a href=\"#{}\">{}</a></td>",
            escape_attr(&row.name),
            escape_text(&row.name)
        ));
        for summary in &row.scores {
            if summary.score.possible == 0 {
                section.push_str("<td>-</td>");
            } else {
                section.push_str(&format!("<td>{}</td>", format_score(&summary.score)));
            }
        }
        section.push_str("</tr>");
    }
    section.push_str("</tbody></table>");

    section
}

/// Generate one section per root test with its issue lists.
fn generate_details_section(tests: &Tests, tools: &[BuildTool], config: &Config) -> String {
    let mut section = String::new();

    for (name, test) in tests {
        let heading = if test.title.is_empty() {
            name.as_str()
        } else {
            test.title.as_str()
        };

        section.push_str(&format!(
            "<section id=\"{}\"><h2>{}</h2>",
            escape_attr(name),
            escape_text(heading)
        ));
        if !test.description.is_empty() {
            section.push_str(&format!("<p>{}</p>", escape_text(&test.description)));
        }
        section.push_str(&format!(
            "<p><a href=\"{}\">View source</a></p>",
            escape_attr(&github_link(&config.github, &format!("tests/{}", name), None))
        ));

        push_issue_lists(&mut section, name, test, tools);
        section.push_str("</section>");
    }

    section
}

/// Append the issue lists of `test` and its subtests, depth first.
fn push_issue_lists(section: &mut String, path: &str, test: &Test, tools: &[BuildTool]) {
    for tool in tools {
        if let Some(issues) = render_issue_links(test, tool) {
            section.push_str(&format!(
                "<div class=\"issue-list\"><h3>{} &middot; {}</h3>{}</div>",
                escape_text(path),
                escape_text(tool.as_str()),
                issues
            ));
        }
    }

    for (name, sub_test) in test.children() {
        push_issue_lists(section, &format!("{} / {}", path, name), sub_test, tools);
    }
}

/// Generate the page footer.
fn generate_footer(config: &Config, generated_at: DateTime<Utc>) -> String {
    format!(
        "<footer><p>Generated {} from <a href=\"{}\">{}</a></p></footer>",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        escape_attr(&github_link(&config.github, "", None)),
        escape_text(&config.github.default_branch)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Issue, IssueStatus, ResultKind, TestResult};
    use crate::scoring::{calculate_score_totals, score_by_test};

    fn create_test_suite() -> Tests {
        let mut tests = Tests::new();

        let mut hashing = Test {
            title: "Hashing".to_string(),
            description: "Content <hashes> in file names".to_string(),
            ..Test::default()
        }
        .with_result("rollup", ResultKind::Pass);
        hashing.results.insert(
            BuildTool::from("webpack"),
            Some(TestResult::new(ResultKind::Partial).with_issues(vec![Issue {
                url: "https://github.com/webpack/webpack/issues/7".to_string(),
                status: IssueStatus::Open,
                github_data: None,
            }])),
        );
        tests.insert("hashing".to_string(), hashing);

        let mut nested = Test::default();
        nested.results.insert(
            BuildTool::from("rollup"),
            Some(TestResult::new(ResultKind::Fail).with_issues(vec![Issue {
                url: "N/A".to_string(),
                status: IssueStatus::Other("closed".to_string()),
                github_data: None,
            }])),
        );
        tests.insert(
            "css".to_string(),
            Test::default().with_sub_test("imports", nested),
        );

        tests
    }

    fn with_input<T>(f: impl FnOnce(&ReportInput<'_>) -> T) -> T {
        let tests = create_test_suite();
        let mut config = Config::default();
        config.subjects.test_subjects = vec![BuildTool::from("rollup"), BuildTool::from("webpack")];
        let totals = calculate_score_totals(&tests, config.tools());
        let per_test = score_by_test(&tests, config.tools());

        let input = ReportInput {
            tests: &tests,
            totals: &totals,
            per_test: &per_test,
            config: &config,
            generated_at: Utc::now(),
        };
        f(&input)
    }

    #[test]
    fn test_generate_summary_page() {
        let html = with_input(generate_summary_page);

        assert!(html.starts_with("<!DOCTYPE html><html"));
        assert!(html.contains("<h2>Totals</h2>"));
        assert!(html.contains("<td>rollup</td><td>1 / 2 (50%)</td>"));
        assert!(html.contains("<td>webpack</td><td>0.5 / 1 (50%)</td>"));
        assert!(html.contains("<h2>Hashing</h2>"));
        assert!(html.contains("Content &lt;hashes&gt; in file names"));
        assert!(html.contains("tree/dev/tests/hashing"));
    }

    #[test]
    fn test_summary_page_lists_nested_issues() {
        let html = with_input(generate_summary_page);

        assert!(html.contains("<h3>css / imports &middot; rollup</h3>"));
        assert!(html.contains("<li style=\"text-decoration: line-through\">N/A</li>"));
        assert!(html.contains("<h3>hashing &middot; webpack</h3>"));
    }

    #[test]
    fn test_test_table_marks_not_applicable() {
        let html = with_input(|input| generate_test_table(input.per_test, input.config.tools()));

        // css has no webpack result anywhere
        assert!(html.contains("<tr><td><a href=\"#css\">css</a></td><td>0 / 1 (0%)</td><td>-</td></tr>"));
    }

    #[test]
    fn test_generate_json_report() {
        let json = with_input(|input| {
            generate_json_report(input.totals, input.per_test, input.generated_at).unwrap()
        });

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["totals"][0]["tool"], "rollup");
        assert_eq!(value["totals"][0]["score"], 1.0);
        assert_eq!(value["totals"][0]["possible"], 2);
        assert_eq!(value["tests"][0]["name"], "css");
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_build_output_map_respects_format() {
        let html_only = with_input(|input| build_output_map(input, OutputFormat::Html).unwrap());
        assert_eq!(html_only.keys().collect::<Vec<_>>(), vec!["index.html"]);

        let all = with_input(|input| build_output_map(input, OutputFormat::All).unwrap());
        assert_eq!(all.keys().collect::<Vec<_>>(), vec!["index.html", "scores.json"]);
    }
}
