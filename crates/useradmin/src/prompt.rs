//! Terminal prompts. Everything is drawn on stderr so stdout stays clean
//! for command output.

use anyhow::Result;
use dialoguer::{console::Term, Confirm, Input, Password};
use useradmin_core::Confirmation;

/// Yes/no confirmation backed by a terminal prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct TermConfirm {
    assume_yes: bool,
}

impl TermConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirmation for TermConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        match Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact_on(&Term::stderr())
        {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "confirmation prompt failed, treating as declined");
                false
            }
        }
    }
}

/// Read a password, masked unless `reveal` is set
pub fn password(prompt: &str, reveal: bool) -> Result<String> {
    let value = if reveal {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text_on(&Term::stderr())?
    } else {
        Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact_on(&Term::stderr())?
    };
    Ok(value)
}

/// Read a line of text, pre-filled with `initial`
pub fn text(prompt: &str, initial: &str) -> Result<String> {
    let value = Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .interact_text_on(&Term::stderr())?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assume_yes_skips_prompt() {
        assert!(TermConfirm::new(true).confirm("Delete user?"));
    }
}
