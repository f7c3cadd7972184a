//! Fixed prompt templates.
//!
//! These are the two prompt pairs the application sends upstream. The text
//! is part of the product's behavior; change it deliberately, not casually.

/// Appended to the analysis prompt when the request carries no audio.
pub const NO_AUDIO_NOTE: &str =
    "(Note: No audio was provided. Please provide a template analysis.)";

/// System prompt for the single-song vocal analysis.
pub fn analysis_system_prompt() -> String {
    [
        "You are a professional vocal coach and music producer.",
        "Listen carefully to the audio provided and analyze the singer's vocal performance in detail.",
        "Base your analysis ONLY on what you actually hear in the audio.",
    ]
    .join(" ")
}

/// User prompt for the single-song vocal analysis.
pub fn analysis_user_prompt(song_name: &str) -> String {
    [
        format!("Song name: {song_name}"),
        String::new(),
        "Listen to this singing demo and provide a detailed vocal analysis across these dimensions (score each 0\u{2013}10 and give detailed explanation to your scoring - 100 words per dimension):".to_string(),
        "- Breath control & support".to_string(),
        "- Tone quality & timbre".to_string(),
        "- Emotional delivery & storytelling".to_string(),
        "- Pitch & intonation".to_string(),
        "- Vocal technique (register balance, chest/head voice quality, mixed voice use, etc.)".to_string(),
        "- Rhythm & time feel".to_string(),
        "- Dynamics & control".to_string(),
        "- Diction & articulation".to_string(),
        "- Musical phrasing".to_string(),
        "- Style & genre awareness".to_string(),
        "- Vocal health & tension".to_string(),
        "- Professional readiness".to_string(),
        String::new(),
        "Then:".to_string(),
        "1) Give a final score (average).".to_string(),
        "2) List 3\u{2013}5 vocal strengths and 3\u{2013}5 weaknesses based on what you heard.".to_string(),
        "3) Suggest a weekly practice plan with concrete exercises tailored to the issues you identified.".to_string(),
        "4) For each exercise, include 1\u{2013}2 external references (YouTube query terms or article titles).".to_string(),
        String::new(),
        "Output format: clean markdown with headings and bullet lists.".to_string(),
    ]
    .join("\n")
}

/// System prompt for the aggregate voice report.
pub fn report_system_prompt() -> String {
    [
        "You are a professional vocal coach, music producer, and talent scout with 20+ years of experience.",
        "You have analyzed thousands of singers and have a deep understanding of vocal development, genre suitability, and career guidance.",
        "Be encouraging but honest. Provide actionable, specific advice.",
    ]
    .join(" ")
}

/// User prompt for the aggregate voice report, requesting strict JSON with
/// the eight fixed keys.
pub fn report_user_prompt(names: &[String]) -> String {
    let demo_list = names
        .iter()
        .map(|n| if n.is_empty() { "Untitled" } else { n.as_str() })
        .collect::<Vec<_>>()
        .join(", ");

    [
        format!(
            "I have analyzed {} vocal demos from a singer. The songs are: {demo_list}.",
            names.len()
        ),
        String::new(),
        "Based on these performances, please provide a comprehensive voice report with the following sections.".to_string(),
        "Each section should be approximately 200 words with detailed, specific explanations.".to_string(),
        String::new(),
        "Respond in JSON format with these exact keys:".to_string(),
        String::new(),
        "1. 'talent': Assessment of whether this person has vocal talent. Discuss their natural abilities, musicality, and potential. Be honest but encouraging.".to_string(),
        String::new(),
        "2. 'genre': Their general genre/style. What type of music does their voice naturally suit? Consider timbre, range, and stylistic tendencies.".to_string(),
        String::new(),
        "3. 'directionGo': The direction they SHOULD go. What genres, styles, or artistic paths would best showcase their voice? What collaborations or projects should they pursue?".to_string(),
        String::new(),
        "4. 'directionAvoid': The direction they should AVOID. What genres or styles might not suit their voice or could harm their vocal health?".to_string(),
        String::new(),
        "5. 'similar': Recommend 5-8 professional singers and their songs that have similar vocal qualities. Explain WHY each artist is relevant.".to_string(),
        String::new(),
        "6. 'strengths': Their top 5 vocal strengths with detailed explanations of how these manifest in their singing.".to_string(),
        String::new(),
        "7. 'weaknesses': Their top 5 areas for improvement with specific, constructive feedback.".to_string(),
        String::new(),
        "8. 'exercises': The most important weekly vocal exercises tailored to their specific needs. Include specific routines, durations, and external resources (YouTube search terms, article titles).".to_string(),
        String::new(),
        "Return ONLY valid JSON, no markdown code blocks.".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_prompt_names_the_song_and_dimensions() {
        let prompt = analysis_user_prompt("Late Night Demo");
        assert!(prompt.starts_with("Song name: Late Night Demo"));
        assert!(prompt.contains("Breath control & support"));
        assert!(prompt.contains("Professional readiness"));
    }

    #[test]
    fn report_prompt_lists_names_and_substitutes_untitled() {
        let names = vec!["One".to_string(), String::new(), "Three".to_string()];
        let prompt = report_user_prompt(&names);
        assert!(prompt.contains("I have analyzed 3 vocal demos"));
        assert!(prompt.contains("One, Untitled, Three"));
        assert!(prompt.contains("'directionAvoid'"));
        assert!(prompt.contains("Return ONLY valid JSON"));
    }
}
