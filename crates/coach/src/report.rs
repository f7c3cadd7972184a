//! Voice report structure and response repair.

use serde::{Deserialize, Serialize};

/// Placeholder value for report sections that could not be separated out of
/// a malformed response. The raw text lands in `talent`.
pub const REPORT_PLACEHOLDER: &str = "See above";

/// The aggregate voice report: eight fixed sections.
///
/// Wire format is camelCase (`directionGo`, `directionAvoid`). Sections the
/// model omits deserialize as empty strings rather than failing the whole
/// parse.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceReport {
    #[serde(default)]
    pub talent: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub direction_go: String,
    #[serde(default)]
    pub direction_avoid: String,
    #[serde(default)]
    pub similar: String,
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub weaknesses: String,
    #[serde(default)]
    pub exercises: String,
}

impl VoiceReport {
    /// Degraded report for responses that were not valid JSON: the raw text
    /// goes in the first section, every other section gets the fixed
    /// placeholder. This is the defined failure contract — callers receive
    /// a well-formed report either way.
    pub fn fallback(raw: String) -> Self {
        Self {
            talent: raw,
            genre: REPORT_PLACEHOLDER.to_string(),
            direction_go: REPORT_PLACEHOLDER.to_string(),
            direction_avoid: REPORT_PLACEHOLDER.to_string(),
            similar: REPORT_PLACEHOLDER.to_string(),
            strengths: REPORT_PLACEHOLDER.to_string(),
            weaknesses: REPORT_PLACEHOLDER.to_string(),
            exercises: REPORT_PLACEHOLDER.to_string(),
        }
    }
}

/// Remove markdown code-fence wrapping that models add despite the "no code
/// blocks" instruction. Strips every ```json and ``` marker, then trims.
pub fn strip_code_fences(content: &str) -> String {
    content.replace("```json", "").replace("```", "").trim().to_string()
}
