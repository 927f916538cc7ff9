//! Output formatter implementations.

use std::fmt::Write as _;

use crate::allocation::AllocationResult;
use crate::operations::AutoAllocationSummary;
use crate::{Error, Result};

use super::{join_ids, OutputFormatter, Tabular};

/// Formatter for tab-separated, human-readable tables.
///
/// Headers are uppercased and empty cells print as `-`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableFormatter;

impl OutputFormatter for TableFormatter {
    fn format<T: Tabular>(&self, rows: &[T]) -> Result<String> {
        let mut out = T::HEADERS
            .iter()
            .map(|h| h.to_uppercase())
            .collect::<Vec<_>>()
            .join("\t");

        for row in rows {
            let cells: Vec<String> = row
                .row()
                .into_iter()
                .map(|cell| if cell.is_empty() { "-".to_string() } else { cell })
                .collect();
            out.push('\n');
            out.push_str(&cells.join("\t"));
        }

        Ok(out)
    }
}

/// Formatter for JSON output.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format<T: Tabular>(&self, rows: &[T]) -> Result<String> {
        serde_json::to_string_pretty(rows).map_err(|e| Error::Validation {
            field: "json_output".to_string(),
            message: format!("failed to serialize to JSON: {e}"),
        })
    }
}

/// Describes an allocation result in one line.
///
/// # Examples
///
/// ```
/// use maitre::allocation::{AllocationFailure, AllocationResult, FailureKind};
/// use maitre::output::format_allocation;
///
/// let failed = AllocationResult::Failed(AllocationFailure {
///     kind: FailureKind::NoTablesFree,
///     message: "no tables are free at that time".into(),
/// });
/// assert_eq!(format_allocation(&failed), "no allocation: no tables are free at that time");
/// ```
#[must_use]
pub fn format_allocation(result: &AllocationResult) -> String {
    match result {
        AllocationResult::Allocated(allocation) => format!(
            "tables {} via {}",
            join_ids(&allocation.table_ids),
            allocation.description
        ),
        AllocationResult::Failed(failure) => format!("no allocation: {}", failure.message),
    }
}

/// Summarizes a pending sweep, one line per processed reservation after
/// the totals line.
#[must_use]
pub fn format_summary(summary: &AutoAllocationSummary) -> String {
    let mut out = format!(
        "{} allocated, {} failed, {} skipped",
        summary.allocated, summary.failed, summary.skipped
    );
    for item in &summary.items {
        let row = item.row();
        let _ = write!(out, "\n  reservation {}: {}", row[0], row[1]);
        if !row[3].is_empty() {
            let _ = write!(out, " ({})", row[3]);
        }
    }
    out
}
