//! Prompt construction for the active stage.
//!
//! The instruction names the JSON keys the reply must use. Those names are
//! shared with [`crate::decision`] through [`ANSWER_KEY`] and
//! [`DESCRIPTION_KEY`], so the two sides cannot drift apart.

use std::fmt::Write;

use crate::session::StageData;

/// Key under which the model places the chosen zero-based path index.
pub const ANSWER_KEY: &str = "answer";

/// Key under which the model explains its choice.
pub const DESCRIPTION_KEY: &str = "description";

/// Render the stage's lore and enumerated paths into one instruction.
pub fn build_prompt(stage: &StageData) -> String {
    let mut paths = String::new();
    for (i, path) in stage.paths.iter().enumerate() {
        let _ = write!(paths, "- Path {i} - {} - {}\n\n", path.title, path.lore);
    }

    format!(
        "Let's play. I will provide you with a short lore containing different paths to \
         choose from. Please respond in JSON format. You should select one correct path and \
         place it under the key '{ANSWER_KEY}' and provide an explanation for your choice \
         under the key '{DESCRIPTION_KEY}'.\n\
         \n\
         The lore: {}\n\
         Paths:\n\
         {paths}",
        stage.lore
    )
}
