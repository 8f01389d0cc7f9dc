use inquire::error::InquireError;
use inquire::Confirm;
use sqlgate_db::{ConfirmationGate, GateDecision};
use std::io::{self, BufRead, Write};

/// Existence gate backed by an interactive yes/no prompt.
///
/// Without a terminal the answer is read as one line from stdin, so
/// `echo y | sqlgate` works. A closed stdin yields no answer at all.
pub struct PromptGate;

impl PromptGate {
    fn ask(schema: &str, table: &str) -> Result<bool, InquireError> {
        Confirm::new("Continue anyway?")
            .with_default(false)
            .with_help_message(&format!(
                "{}.{} already exists; migrations may have been run before. Use --force to skip this prompt.",
                schema, table
            ))
            .prompt()
    }
}

impl ConfirmationGate for PromptGate {
    fn confirm(&self, schema: &str, table: &str) -> GateDecision {
        match Self::ask(schema, table) {
            Ok(answer) => decision_from_answer(answer),
            Err(InquireError::NotTTY) => {
                print!("Continue anyway? (y/N): ");
                let _ = io::stdout().flush();
                read_answer(io::stdin().lock())
            }
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
                GateDecision::Abort
            }
            Err(e) => {
                tracing::warn!(error = %e, "confirmation prompt failed");
                GateDecision::Unavailable
            }
        }
    }
}

fn decision_from_answer(answer: bool) -> GateDecision {
    if answer {
        GateDecision::Proceed
    } else {
        GateDecision::Abort
    }
}

/// Read a y/N answer from a non-interactive input
fn read_answer(mut input: impl BufRead) -> GateDecision {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => {
            println!();
            GateDecision::Unavailable
        }
        Ok(_) => {
            let answer = line.trim().to_lowercase();
            decision_from_answer(answer == "y" || answer == "yes")
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to read confirmation from stdin");
            GateDecision::Unavailable
        }
    }
}
