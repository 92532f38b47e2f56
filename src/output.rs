//! CLI output formatting.
//!
//! Every display is built by a pure `format_*` function returning lines, so
//! tests can assert on exact text; thin `print_*` wrappers write to stdout.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! Trace
//!     [14:02:07] - Processing operation: create-thumbnail
//!     [14:02:07] - Creating 256x256 thumbnail
//!     [14:02:07] - Original size: 1200x800
//!     [14:02:07] - Thumbnail: 256x171
//!
//! create-thumbnail → thumb.jpg
//!     Details: Thumbnail 256x171 created
//!     Type: image/jpeg
//!     Dimensions: 256x171
//!     Size: 14.2 KB
//! ```

use crate::operations::TransformResult;
use crate::trace::ExecutionTrace;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte count with one decimal, in binary units.
///
/// ```
/// # use imgrelay::output::format_bytes;
/// assert_eq!(format_bytes(0), "0 B");
/// assert_eq!(format_bytes(512), "512.0 B");
/// assert_eq!(format_bytes(1536), "1.5 KB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if value < 1024.0 {
            return format!("{value:.1} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.1} TB")
}

// ============================================================================
// Run output
// ============================================================================

/// Format the trace block shared by every command that runs a transform.
pub fn format_trace(trace: &ExecutionTrace) -> Vec<String> {
    let mut lines = vec!["Trace".to_string()];
    lines.extend(trace.lines().into_iter().map(|l| format!("{}{l}", indent(1))));
    lines
}

/// Format the result of `imgrelay run`: trace first, then a summary of the
/// written file.
pub fn format_run_output(
    operation: &str,
    result: &TransformResult,
    trace: &ExecutionTrace,
    output_path: &Path,
) -> Vec<String> {
    let mut lines = format_trace(trace);
    lines.push(String::new());
    lines.push(format!("{operation} → {}", output_path.display()));
    lines.push(format!("{}Details: {}", indent(1), result.details));
    lines.push(format!("{}Type: {}", indent(1), result.content_type()));
    let (w, h) = result.dimensions;
    lines.push(format!("{}Dimensions: {w}x{h}", indent(1)));
    lines.push(format!(
        "{}Size: {}",
        indent(1),
        format_bytes(result.buffer.len() as u64)
    ));
    lines
}

/// Print run output to stdout.
pub fn print_run_output(
    operation: &str,
    result: &TransformResult,
    trace: &ExecutionTrace,
    output_path: &Path,
) {
    for line in format_run_output(operation, result, trace, output_path) {
        println!("{}", line);
    }
}

/// Print a trace to stderr. Used when a run fails, so the steps that did
/// happen are still visible.
pub fn print_trace(trace: &ExecutionTrace) {
    for line in format_trace(trace) {
        eprintln!("{}", line);
    }
}
