//! Prompt templates for theme extraction

/// Instruction appended after the reviews
pub const THEME_INSTRUCTIONS: &str = "Please extract the top 5 common themes or topics mentioned in these reviews.\n\
Return them as a bullet list with brief descriptions.";

/// Prompt asking for the top themes in a batch of `label` reviews
pub fn theme_prompt(reviews: &[String], label: &str) -> String {
    format!(
        "Here are some {} customer reviews:\n{}\n\n{}",
        label,
        reviews.join("\n"),
        THEME_INSTRUCTIONS
    )
}
