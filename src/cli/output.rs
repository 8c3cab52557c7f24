//! CLI output formatting

use crate::core::ExecutionStatus;
use crate::execution::ExecutionEvent;
use console::Emoji;
use serde_json::Value;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static DOWN: Emoji<'_, '_> = Emoji("↘️  ", "> ");
pub static UP: Emoji<'_, '_> = Emoji("↗️  ", "< ");

/// Format an execution status for display
pub fn format_status(status: ExecutionStatus) -> String {
    match status {
        ExecutionStatus::Completed => style("COMPLETED").green().to_string(),
        ExecutionStatus::ShortCircuited => style("SHORT-CIRCUITED").yellow().to_string(),
        ExecutionStatus::Recovered => style("RECOVERED").blue().to_string(),
        ExecutionStatus::Failed => style("FAILED").red().to_string(),
    }
}

/// Format an execution event for display
///
/// `names` maps step indices to the names they were configured with.
pub fn format_event(event: &ExecutionEvent, names: &[String]) -> String {
    let name = |index: &usize| {
        names
            .get(*index)
            .cloned()
            .unwrap_or_else(|| format!("#{}", index))
    };

    match event {
        ExecutionEvent::StepStarted { index } => {
            format!("{} {}", DOWN, style(name(index)).cyan())
        }
        ExecutionEvent::StepSuspended { index } => {
            format!("  {} suspended", style(name(index)).dim())
        }
        ExecutionEvent::ShortCircuited { index } => {
            format!("{} {} stopped the chain", WARN, style(name(index)).yellow())
        }
        ExecutionEvent::ArgumentsReplaced { index, count } => format!(
            "{} {} replaced the arguments ({})",
            INFO,
            style(name(index)).cyan(),
            style(count).dim()
        ),
        ExecutionEvent::DestinationInvoked { arguments } => format!(
            "{} destination ({} arguments)",
            DOWN,
            style(arguments).cyan()
        ),
        ExecutionEvent::StepResumed { index, replaced } => {
            if *replaced {
                format!("{} {} (result replaced)", UP, style(name(index)).green())
            } else {
                format!("{} {}", UP, style(name(index)).green())
            }
        }
        ExecutionEvent::ErrorOffered { index } => {
            format!("{} error offered to {}", WARN, style(name(index)).yellow())
        }
        ExecutionEvent::ErrorAbsorbed { index } => {
            format!("{} {} absorbed the error", CHECK, style(name(index)).green())
        }
        ExecutionEvent::ErrorEscaped => format!("{} {}", CROSS, style("error escaped").red()),
        ExecutionEvent::RunFinished { status } => {
            format!("{} Run finished: {}", INFO, format_status(*status))
        }
    }
}

/// Format the final result of a run
pub fn format_result(result: &Option<Value>) -> String {
    match result {
        Some(value) => serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
        None => style("(no result)").dim().to_string(),
    }
}
