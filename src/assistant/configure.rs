//! Pushes the dataset summary into the assistant's standing instructions.
//!
//! Runs once at session start. The update is a full overwrite of the
//! remote instructions field — any prior customization is lost, and the
//! change is visible to every session using the same assistant id.

use super::{ApiError, AssistantApi};

/// Role preamble prepended to the dataset summary.
const INSTRUCTIONS_PREAMBLE: &str = "You are an AI assistant specializing in credit card \
     fraud detection. Use the following dataset information to provide insights and answer \
     questions:";

/// Instructions update failure. Non-fatal: the caller surfaces it and the
/// rest of the dashboard keeps working.
#[derive(Debug, thiserror::Error)]
#[error("failed to update assistant instructions: {0}")]
pub struct ConfigError(#[from] ApiError);

/// Build the full instructions text from the dataset summary.
pub fn build_instructions(summary: &str) -> String {
    format!("{INSTRUCTIONS_PREAMBLE}\n\n{summary}")
}

/// Overwrite the assistant's instructions with the dataset-grounded text.
pub fn configure(
    api: &dyn AssistantApi,
    assistant_id: &str,
    summary: &str,
) -> Result<(), ConfigError> {
    let instructions = build_instructions(summary);
    api.update_assistant_instructions(assistant_id, &instructions)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_lead_with_role_preamble() {
        let text = build_instructions("Number of rows: 5");
        assert!(text.starts_with("You are an AI assistant specializing in credit card fraud"));
        assert!(text.ends_with("Number of rows: 5"));
    }

    #[test]
    fn instructions_separate_preamble_and_summary() {
        let text = build_instructions("SUMMARY");
        assert!(text.contains("questions:\n\nSUMMARY"));
    }
}
