//! Score aggregation over the test tree.
//!
//! A node that declares a result for a tool adds one possible point and
//! earns the result's weight; nodes without a result for that tool add
//! nothing. Subtests are summed in, so the totals are independent of
//! traversal order.

use crate::models::{BuildTool, Score, Test, TestScores, Tests, ToolSummary};
use tracing::trace;

/// Compute the score of `test` and all of its subtests for one tool.
pub fn calculate_score(test: &Test, tool: &BuildTool) -> Score {
    let mut total = match test.result_for(tool) {
        Some(result) => Score::new(result.meta.result.weight(), 1),
        None => Score::default(),
    };

    for (_, sub_test) in test.children() {
        total += calculate_score(sub_test, tool);
    }

    total
}

/// Compute the score of every configured tool across the whole suite.
///
/// The output has one entry per tool, in the order of `tools`.
pub fn calculate_score_totals(tests: &Tests, tools: &[BuildTool]) -> Vec<ToolSummary> {
    tools
        .iter()
        .map(|tool| {
            let score: Score = tests
                .values()
                .map(|test| calculate_score(test, tool))
                .sum();
            trace!("{}: {}", tool, score);

            ToolSummary {
                tool: tool.clone(),
                score,
            }
        })
        .collect()
}

/// Compute per-tool scores for each root test, in suite order.
pub fn score_by_test(tests: &Tests, tools: &[BuildTool]) -> Vec<TestScores> {
    tests
        .iter()
        .map(|(name, test)| TestScores {
            name: name.clone(),
            scores: tools
                .iter()
                .map(|tool| ToolSummary {
                    tool: tool.clone(),
                    score: calculate_score(test, tool),
                })
                .collect(),
        })
        .collect()
}

/// Sort tool summaries by percentage (best first), keeping ties in order.
pub fn rank_tools(totals: &[ToolSummary]) -> Vec<&ToolSummary> {
    let mut ranked: Vec<&ToolSummary> = totals.iter().collect();
    ranked.sort_by(|a, b| {
        b.score
            .percent()
            .partial_cmp(&a.score.percent())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResultKind;

    fn tool(name: &str) -> BuildTool {
        BuildTool::from(name)
    }

    #[test]
    fn test_no_result_scores_nothing() {
        let test = Test::default();
        assert_eq!(calculate_score(&test, &tool("rollup")), Score::new(0.0, 0));
    }

    #[test]
    fn test_leaf_weights() {
        let pass = Test::default().with_result("rollup", ResultKind::Pass);
        let partial = Test::default().with_result("rollup", ResultKind::Partial);
        let fail = Test::default().with_result("rollup", ResultKind::Fail);
        let unknown = Test::default().with_result("rollup", ResultKind::from("maybe"));

        assert_eq!(calculate_score(&pass, &tool("rollup")), Score::new(1.0, 1));
        assert_eq!(
            calculate_score(&partial, &tool("rollup")),
            Score::new(0.5, 1)
        );
        assert_eq!(calculate_score(&fail, &tool("rollup")), Score::new(0.0, 1));
        assert_eq!(
            calculate_score(&unknown, &tool("rollup")),
            Score::new(0.0, 1)
        );
    }

    #[test]
    fn test_other_tool_is_not_counted() {
        let test = Test::default().with_result("rollup", ResultKind::Pass);
        assert_eq!(calculate_score(&test, &tool("webpack")), Score::default());
    }

    #[test]
    fn test_parent_and_subtest_are_summed() {
        let test = Test::default()
            .with_result("toolX", ResultKind::Pass)
            .with_sub_test(
                "b",
                Test::default().with_result("toolX", ResultKind::Partial),
            );

        assert_eq!(calculate_score(&test, &tool("toolX")), Score::new(1.5, 2));
    }

    #[test]
    fn test_parent_without_result_only_counts_subtests() {
        let test = Test::default().with_sub_test(
            "c",
            Test::default().with_result("toolY", ResultKind::Fail),
        );

        assert_eq!(calculate_score(&test, &tool("toolY")), Score::new(0.0, 1));
    }

    #[test]
    fn test_deep_nesting_is_additive() {
        let leaf = Test::default().with_result("parcel", ResultKind::Pass);
        let middle = Test::default()
            .with_result("parcel", ResultKind::Partial)
            .with_sub_test("leaf", leaf.clone());
        let root = Test::default()
            .with_sub_test("middle", middle.clone())
            .with_sub_test("other", Test::default().with_result("parcel", ResultKind::Fail));

        let parcel = tool("parcel");
        let own = Score::default();
        let expected = own
            + calculate_score(&middle, &parcel)
            + Score::new(0.0, 1);

        assert_eq!(calculate_score(&root, &parcel), expected);
        assert_eq!(calculate_score(&root, &parcel), Score::new(1.5, 3));
    }

    #[test]
    fn test_totals_follow_configured_order() {
        let mut tests = Tests::new();
        tests.insert(
            "a".to_string(),
            Test::default()
                .with_result("rollup", ResultKind::Pass)
                .with_result("webpack", ResultKind::Fail),
        );
        tests.insert(
            "b".to_string(),
            Test::default()
                .with_result("webpack", ResultKind::Partial)
                .with_sub_test("c", Test::default().with_result("rollup", ResultKind::Partial)),
        );

        let tools = vec![tool("webpack"), tool("browserify"), tool("rollup")];
        let totals = calculate_score_totals(&tests, &tools);

        let names: Vec<&str> = totals.iter().map(|t| t.tool.as_str()).collect();
        assert_eq!(names, vec!["webpack", "browserify", "rollup"]);
        assert_eq!(totals[0].score, Score::new(0.5, 2));
        assert_eq!(totals[1].score, Score::new(0.0, 0));
        assert_eq!(totals[2].score, Score::new(1.5, 2));

        for total in &totals {
            let expected: Score = tests
                .values()
                .map(|test| calculate_score(test, &total.tool))
                .sum();
            assert_eq!(total.score, expected);
        }
    }

    #[test]
    fn test_totals_for_empty_suite() {
        let totals = calculate_score_totals(&Tests::new(), &[tool("rollup")]);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].score, Score::default());
    }

    #[test]
    fn test_score_by_test_rows() {
        let mut tests = Tests::new();
        tests.insert(
            "hashing".to_string(),
            Test::default().with_result("rollup", ResultKind::Pass),
        );
        tests.insert(
            "css".to_string(),
            Test::default().with_result("rollup", ResultKind::Partial),
        );

        let rows = score_by_test(&tests, &[tool("rollup"), tool("webpack")]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "css");
        assert_eq!(rows[0].scores[0].score, Score::new(0.5, 1));
        assert_eq!(rows[1].name, "hashing");
        assert_eq!(rows[1].scores[1].score, Score::default());
    }

    #[test]
    fn test_rank_tools() {
        let totals = vec![
            ToolSummary {
                tool: tool("a"),
                score: Score::new(1.0, 4),
            },
            ToolSummary {
                tool: tool("b"),
                score: Score::new(3.0, 4),
            },
            ToolSummary {
                tool: tool("c"),
                score: Score::new(0.0, 0),
            },
        ];

        let ranked = rank_tools(&totals);
        assert_eq!(ranked[0].tool.as_str(), "b");
        assert_eq!(ranked[1].tool.as_str(), "a");
        assert_eq!(ranked[2].tool.as_str(), "c");
    }
}
