//! Complexity Aggregator

use tracing::debug;

use crate::ai::NarrativeService;
use crate::types::{ComplexityMetrics, ComplexitySummary, ParsedFile, ProjectContext};

/// Aggregate file complexity scores.
///
/// Files without a score are skipped. When none carries one the result is
/// [`ComplexitySummary::NoData`] and the narrative service is not consulted.
pub fn compute_metrics(files: &[ParsedFile], threshold: f64) -> Option<ComplexityMetrics> {
    let scores: Vec<f64> = files.iter().filter_map(|f| f.complexity).collect();
    if scores.is_empty() {
        return None;
    }

    let sum: f64 = scores.iter().sum();
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let high_complexity_files = files
        .iter()
        .filter(|f| f.complexity.is_some_and(|c| c > threshold))
        .map(|f| f.path.clone())
        .collect();

    Some(ComplexityMetrics {
        average: sum / scores.len() as f64,
        max,
        min,
        high_complexity_files,
    })
}

/// Build the complexity section, optionally asking for an interpretation
pub async fn summarize_complexity(
    files: &[ParsedFile],
    context: &ProjectContext,
    narrator: &dyn NarrativeService,
    threshold: f64,
    interpret: bool,
) -> ComplexitySummary {
    let Some(metrics) = compute_metrics(files, threshold) else {
        debug!("No file carries a complexity score");
        return ComplexitySummary::no_data();
    };

    let interpretation = if interpret {
        narrator
            .interpret_complexity(&metrics, context)
            .await
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    } else {
        None
    };

    ComplexitySummary::Measured {
        metrics,
        interpretation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::narrative::testing::ScriptedNarrator;

    fn files(scores: &[Option<f64>]) -> Vec<ParsedFile> {
        scores
            .iter()
            .enumerate()
            .map(|(i, score)| {
                let file = ParsedFile::new(format!("src/F{i}.java"), "java");
                match score {
                    Some(s) => file.with_complexity(*s),
                    None => file,
                }
            })
            .collect()
    }

    #[test]
    fn test_metrics_skip_absent_scores() {
        let metrics = compute_metrics(&files(&[Some(2.0), None, Some(14.0), Some(5.0)]), 10.0)
            .expect("scores present");

        assert!((metrics.average - 7.0).abs() < f64::EPSILON);
        assert_eq!(metrics.min, 2.0);
        assert_eq!(metrics.max, 14.0);
        assert_eq!(metrics.high_complexity_files, vec!["src/F2.java"]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let metrics = compute_metrics(&files(&[Some(10.0), Some(10.5)]), 10.0).unwrap();
        assert_eq!(metrics.high_complexity_files, vec!["src/F1.java"]);
    }

    #[test]
    fn test_zero_score_is_still_data() {
        let metrics = compute_metrics(&files(&[Some(0.0)]), 10.0);
        assert!(metrics.is_some());
    }

    #[tokio::test]
    async fn test_no_data_skips_narrative() {
        let narrator = ScriptedNarrator::default().with_interpretation("should not be used");
        let summary = summarize_complexity(
            &files(&[None, None]),
            &ProjectContext::new("java"),
            &narrator,
            10.0,
            true,
        )
        .await;

        assert!(summary.is_no_data());
        assert_eq!(narrator.calls("interpret_complexity"), 0);
    }

    #[tokio::test]
    async fn test_interpretation_attached_when_available() {
        let narrator = ScriptedNarrator::default().with_interpretation("  Complexity is healthy.  ");
        let summary = summarize_complexity(
            &files(&[Some(3.0)]),
            &ProjectContext::new("java"),
            &narrator,
            10.0,
            true,
        )
        .await;

        assert_eq!(summary.interpretation(), Some("Complexity is healthy."));
        assert_eq!(narrator.calls("interpret_complexity"), 1);
    }

    #[tokio::test]
    async fn test_failed_interpretation_keeps_metrics() {
        let narrator = ScriptedNarrator::default();
        let summary = summarize_complexity(
            &files(&[Some(3.0), Some(11.0)]),
            &ProjectContext::new("java"),
            &narrator,
            10.0,
            true,
        )
        .await;

        assert_eq!(summary.interpretation(), None);
        let metrics = summary.metrics().unwrap();
        assert_eq!(metrics.max, 11.0);
        assert_eq!(metrics.high_complexity_files.len(), 1);
    }

    #[tokio::test]
    async fn test_interpretation_disabled() {
        let narrator = ScriptedNarrator::default().with_interpretation("unused");
        let summary = summarize_complexity(
            &files(&[Some(3.0)]),
            &ProjectContext::new("java"),
            &narrator,
            10.0,
            false,
        )
        .await;

        assert_eq!(summary.interpretation(), None);
        assert_eq!(narrator.calls("interpret_complexity"), 0);
    }
}
