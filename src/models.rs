//! Data models for the compatibility matrix.
//!
//! This module contains the core data structures used throughout
//! the application for representing tools, tests, results, issues
//! and the scores computed from them.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Sentinel used in test data for an issue that has no tracker URL.
pub const NO_ISSUE_URL: &str = "N/A";

/// A build tool (bundler) under test, e.g. `rollup` or `webpack`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildTool(String);

impl BuildTool {
    /// Creates a tool identifier from its configured name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the tool name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BuildTool {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Outcome of one test for one tool.
///
/// Only `pass`, `partial` and `fail` are recognised. Any other tag is kept
/// as [`ResultKind::Unknown`] so that unexpected data degrades to a zero
/// score instead of failing the whole build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum ResultKind {
    /// The tool fully supports the capability.
    Pass,
    /// The tool supports the capability with caveats.
    Partial,
    /// The tool does not support the capability.
    Fail,
    /// Any unrecognised tag, including an empty one.
    Unknown(String),
}

impl ResultKind {
    /// Points earned by this outcome.
    pub fn weight(&self) -> f64 {
        match self {
            ResultKind::Pass => 1.0,
            ResultKind::Partial => 0.5,
            ResultKind::Fail | ResultKind::Unknown(_) => 0.0,
        }
    }
}

impl Default for ResultKind {
    fn default() -> Self {
        ResultKind::Unknown(String::new())
    }
}

impl From<String> for ResultKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pass" => ResultKind::Pass,
            "partial" => ResultKind::Partial,
            "fail" => ResultKind::Fail,
            _ => ResultKind::Unknown(s),
        }
    }
}

impl From<&str> for ResultKind {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<ResultKind> for String {
    fn from(kind: ResultKind) -> Self {
        match kind {
            ResultKind::Pass => "pass".to_string(),
            ResultKind::Partial => "partial".to_string(),
            ResultKind::Fail => "fail".to_string(),
            ResultKind::Unknown(s) => s,
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultKind::Pass => write!(f, "pass"),
            ResultKind::Partial => write!(f, "partial"),
            ResultKind::Fail => write!(f, "fail"),
            ResultKind::Unknown(s) => write!(f, "{}", s),
        }
    }
}

/// Tracker status of an issue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum IssueStatus {
    Open,
    /// `closed`, `fixed`, or anything else that is not `open`.
    Other(String),
}

impl IssueStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, IssueStatus::Open)
    }
}

impl Default for IssueStatus {
    fn default() -> Self {
        IssueStatus::Other(String::new())
    }
}

impl From<String> for IssueStatus {
    fn from(s: String) -> Self {
        if s == "open" {
            IssueStatus::Open
        } else {
            IssueStatus::Other(s)
        }
    }
}

impl From<IssueStatus> for String {
    fn from(status: IssueStatus) -> Self {
        match status {
            IssueStatus::Open => "open".to_string(),
            IssueStatus::Other(s) => s,
        }
    }
}

/// Read a tag that should be a string but may be anything.
///
/// `null` becomes the empty tag; numbers, booleans and structures keep
/// their JSON text so they still show up as unrecognised values.
fn lenient_tag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl<'de> Deserialize<'de> for ResultKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient_tag(deserializer).map(ResultKind::from)
    }
}

impl<'de> Deserialize<'de> for IssueStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient_tag(deserializer).map(IssueStatus::from)
    }
}

/// Tracker metadata attached to an issue when it is already known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubData {
    pub title: String,
}

/// An external tracker reference explaining a non-pass result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue URL, or [`NO_ISSUE_URL`].
    pub url: String,
    #[serde(default)]
    pub status: IssueStatus,
    #[serde(
        rename = "githubData",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub github_data: Option<GithubData>,
}

impl Issue {
    /// Returns true if the issue carries the "N/A" sentinel instead of a URL.
    pub fn has_no_url(&self) -> bool {
        self.url == NO_ISSUE_URL
    }

    /// Text shown for the issue link: the known title, else the raw URL.
    pub fn link_text(&self) -> &str {
        match self.github_data {
            Some(ref data) => &data.title,
            None => &self.url,
        }
    }
}

/// Metadata of a single result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultMeta {
    #[serde(default)]
    pub result: ResultKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<Vec<Issue>>,
}

/// The result of one test for one tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    #[serde(default)]
    pub meta: ResultMeta,
}

impl TestResult {
    /// Creates a result with the given outcome and no issues.
    #[cfg(test)]
    pub fn new(kind: ResultKind) -> Self {
        Self {
            meta: ResultMeta {
                result: kind,
                issue: None,
            },
        }
    }

    /// Attaches an issue list to the result.
    #[cfg(test)]
    pub fn with_issues(mut self, issues: Vec<Issue>) -> Self {
        self.meta.issue = Some(issues);
        self
    }
}

/// A named capability check, possibly decomposed into subtests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Test {
    /// Human readable title.
    #[serde(default)]
    pub title: String,
    /// Short description of the capability.
    #[serde(default)]
    pub description: String,
    /// Per-tool results. A missing key and an explicit `null` both mean
    /// the test does not apply to that tool.
    #[serde(default)]
    pub results: BTreeMap<BuildTool, Option<TestResult>>,
    /// Nested subtests keyed by name.
    #[serde(rename = "subTests", default, skip_serializing_if = "Option::is_none")]
    pub sub_tests: Option<BTreeMap<String, Test>>,
}

impl Test {
    /// Returns the result declared for `tool`, if any.
    pub fn result_for(&self, tool: &BuildTool) -> Option<&TestResult> {
        self.results.get(tool).and_then(Option::as_ref)
    }

    /// Iterates over the direct subtests (name, node).
    pub fn children(&self) -> impl Iterator<Item = (&String, &Test)> {
        self.sub_tests.iter().flat_map(|subs| subs.iter())
    }

    /// Adds a result for a tool.
    #[cfg(test)]
    pub fn with_result(mut self, tool: &str, kind: ResultKind) -> Self {
        self.results
            .insert(BuildTool::from(tool), Some(TestResult::new(kind)));
        self
    }

    /// Adds a named subtest.
    #[cfg(test)]
    pub fn with_sub_test(mut self, name: &str, test: Test) -> Self {
        self.sub_tests
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), test);
        self
    }
}

/// The whole test suite: root tests keyed by name.
pub type Tests = BTreeMap<String, Test>;

/// Earned and attainable points for a (sub)tree, for one tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Weighted points earned.
    pub score: f64,
    /// Number of nodes that declare a result.
    pub possible: u32,
}

impl Score {
    pub fn new(score: f64, possible: u32) -> Self {
        Self { score, possible }
    }

    /// Score as a percentage of what was possible; zero when nothing was.
    pub fn percent(&self) -> f64 {
        if self.possible == 0 {
            0.0
        } else {
            self.score / self.possible as f64 * 100.0
        }
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Score {
        Score {
            score: self.score + rhs.score,
            possible: self.possible + rhs.possible,
        }
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Score) {
        self.score += rhs.score;
        self.possible += rhs.possible;
    }
}

impl Sum for Score {
    fn sum<I: Iterator<Item = Score>>(iter: I) -> Score {
        iter.fold(Score::default(), Add::add)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.score, self.possible)
    }
}

/// Aggregated score of one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSummary {
    pub tool: BuildTool,
    #[serde(flatten)]
    pub score: Score,
}

/// Per-tool scores of a single root test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestScores {
    /// Name of the root test.
    pub name: String,
    /// One entry per configured tool, in configured order.
    pub scores: Vec<ToolSummary>,
}
