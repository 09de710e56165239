pub mod browse;
pub mod config;
pub mod user;

use crate::cli::OutputFormat;
use crate::output::{output_field_errors, output_notice};
use anyhow::{anyhow, Result};
use useradmin_core::{ActionOutcome, NoticeLevel, UsersPage};

/// Print queued notices and turn a failed outcome into an error.
///
/// Error notices become the returned error instead of being printed, so
/// the message appears once.
pub(crate) fn finish_action(
    page: &mut UsersPage<'_>,
    outcome: ActionOutcome,
    format: OutputFormat,
) -> Result<()> {
    let (successes, errors): (Vec<_>, Vec<_>) = page
        .drain_notices()
        .into_iter()
        .partition(|n| n.level == NoticeLevel::Success);
    for notice in &successes {
        output_notice(notice, format);
    }

    match outcome {
        ActionOutcome::Done => {
            // The mutation went through; a failed reload is only reported
            for notice in &errors {
                output_notice(notice, format);
            }
            Ok(())
        }
        ActionOutcome::Declined => {
            eprintln!("Cancelled");
            Ok(())
        }
        ActionOutcome::Invalid => {
            if let Some(dialog) = page.dialog() {
                output_field_errors(dialog.errors(), format);
            }
            Err(anyhow!("Validation failed"))
        }
        ActionOutcome::Busy => Err(anyhow!("Another submission is in progress")),
        ActionOutcome::Failed => {
            if let Some(dialog) = page.dialog() {
                if !dialog.errors().is_empty() {
                    output_field_errors(dialog.errors(), format);
                }
            }
            let message = errors
                .into_iter()
                .last()
                .map(|n| n.message)
                .unwrap_or_else(|| "Request failed".to_string());
            Err(anyhow!(message))
        }
    }
}

/// Print and clear all queued notices
pub(crate) fn flush_notices(page: &mut UsersPage<'_>, format: OutputFormat) {
    for notice in page.drain_notices() {
        output_notice(&notice, format);
    }
}
