use crate::cli::{ColorChoice, OutputFormat};
use colored::Colorize;
use serde::Serialize;
use std::io::IsTerminal;
use useradmin_core::{FieldErrors, Notice, NoticeLevel, UserRecord, UserStatus};

/// Initialize color mode based on CLI choice and environment
pub fn init_color(choice: ColorChoice) {
    let should_color = match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        // Respect NO_COLOR (https://no-color.org/), then require a terminal
        ColorChoice::Auto => std::env::var("NO_COLOR").is_err() && std::io::stdout().is_terminal(),
    };
    colored::control::set_override(should_color);
}

pub fn output_result<T: Serialize + Displayable>(result: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(result) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            println!("{}", result.display());
        }
    }
}

#[derive(Serialize)]
pub struct JsonError {
    pub error: bool,
    pub code: String,
    pub message: String,
}

pub fn output_error(err: &anyhow::Error, format: OutputFormat) {
    let message = match format {
        OutputFormat::Json => {
            let json_err = JsonError {
                error: true,
                code: "error".to_string(),
                message: format!("{:#}", err),
            };
            serde_json::to_string_pretty(&json_err)
                .unwrap_or_else(|_| format!(r#"{{"error": true, "message": "{}"}}"#, err))
        }
        OutputFormat::Text => format!("{}: {:#}", "Error".red().bold(), err),
    };
    eprintln!("{}", message);
}

#[derive(Serialize)]
struct JsonNotice<'a> {
    success: bool,
    message: &'a str,
}

/// Print a controller notice: successes on stdout, errors on stderr
pub fn output_notice(notice: &Notice, format: OutputFormat) {
    let success = notice.level == NoticeLevel::Success;
    let line = match format {
        OutputFormat::Json => serde_json::to_string(&JsonNotice {
            success,
            message: &notice.message,
        })
        .unwrap_or_default(),
        OutputFormat::Text if success => format!("{} {}", "✓".green().bold(), notice.message),
        OutputFormat::Text => format!("{} {}", "✗".red().bold(), notice.message),
    };

    if success {
        println!("{}", line);
    } else {
        eprintln!("{}", line);
    }
}

/// Print field-level validation messages under the form
pub fn output_field_errors(errors: &FieldErrors, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(errors) {
                eprintln!("{}", json);
            }
        }
        OutputFormat::Text => {
            for (field, message) in errors.iter() {
                eprintln!("  {}: {}", field.to_string().yellow(), message);
            }
        }
    }
}

pub trait Displayable {
    fn display(&self) -> String;
}

pub fn status_label(status: UserStatus) -> String {
    match status {
        UserStatus::Active => "Active".green().to_string(),
        UserStatus::Inactive => "Inactive".dimmed().to_string(),
    }
}

impl Displayable for UserRecord {
    fn display(&self) -> String {
        format!(
            "{} - {}\n  {}: {}",
            self.id.to_string().cyan().bold(),
            self.username.white().bold(),
            "Status".dimmed(),
            status_label(self.status)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use useradmin_core::UserId;

    #[test]
    fn user_display_contains_fields() {
        colored::control::set_override(false);
        let user = UserRecord {
            id: UserId::Num(3),
            username: "carol".to_string(),
            status: UserStatus::Inactive,
        };
        let text = user.display();
        assert!(text.starts_with("3 - carol"));
        assert!(text.contains("Status: Inactive"));
    }
}
