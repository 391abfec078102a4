//! Statistics Aggregator

use std::collections::BTreeMap;

use crate::types::{ParsedFile, StatisticsSummary};

/// Compute corpus-wide statistics in a single pass.
///
/// Only business-logic methods are counted. Averages use floor division and
/// are 0 when the divisor is 0.
pub fn compute_statistics(files: &[ParsedFile]) -> StatisticsSummary {
    let mut stats = StatisticsSummary {
        total_files: files.len(),
        file_types: BTreeMap::new(),
        ..Default::default()
    };

    for file in files {
        stats.total_lines += file.total_lines;
        stats.total_code_lines += file.code_lines;
        stats.total_classes += file.classes.len();
        stats.total_methods += file
            .classes
            .iter()
            .map(|c| c.business_methods().count())
            .sum::<usize>();
        *stats.file_types.entry(file.file_type.clone()).or_insert(0) += 1;
    }

    stats.average_file_size = floor_div(stats.total_lines, stats.total_files);
    stats.average_methods_per_class = floor_div(stats.total_methods, stats.total_classes);
    stats
}

fn floor_div(numerator: usize, denominator: usize) -> usize {
    numerator.checked_div(denominator).unwrap_or(0)
}
