use crate::diff::{DiffLine, DiffStats};

/// Render lines as text for copy/download: each line is its kind prefix (`+`, `-` or a
/// space), a space, then the content.
pub fn to_unified_text(lines: &[DiffLine]) -> String {
    lines
        .iter()
        .map(|line| format!("{} {}", line.kind.prefix(), line.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn summary(stats: &DiffStats) -> String {
    format!(
        "+{} -{} ={} ({} lines)",
        stats.added, stats.removed, stats.unchanged, stats.total
    )
}
