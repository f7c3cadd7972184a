//! Completion-API bridge for MyVoice Studio.
//!
//! Two fixed prompt templates go out to an OpenAI-style chat-completions
//! endpoint: a per-song vocal analysis (optionally with the audio inlined as
//! base64) and an aggregate multi-demo voice report. Responses come back as
//! free text; the report path additionally tries to parse strict JSON and
//! degrades to a structured fallback when the model ignores that
//! instruction. The degrade path is part of the contract, not an error.

pub mod error;
pub mod prompts;
pub mod report;

pub use error::{CoachError, CoachResult};
pub use report::{REPORT_PLACEHOLDER, VoiceReport};

use myvoice_core::MIN_REPORT_DEMOS;
use myvoice_core::config::CoachConfig;
use serde::{Deserialize, Serialize};

/// Sampling temperature for both prompt templates.
const TEMPERATURE: f32 = 0.7;

/// Token budget for a single-song analysis.
const ANALYSIS_MAX_TOKENS: u32 = 4000;

/// Token budget for the aggregate report.
const REPORT_MAX_TOKENS: u32 = 6000;

/// Upstream error bodies are truncated to this many characters.
const ERROR_DETAIL_LIMIT: usize = 4000;

/// Client for the chat-completions API.
pub struct VoiceCoach {
    client: reqwest::Client,
    api_key: Option<String>,
    api_base: String,
    model: String,
    audio_model: String,
}

impl VoiceCoach {
    /// Build a client from configuration.
    pub fn from_config(config: &CoachConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_key: config.api_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            audio_model: config.audio_model.clone(),
        }
    }

    /// Produce a vocal analysis for one song.
    ///
    /// With audio the request targets the audio-capable model and inlines
    /// the base64 payload; without audio the text model gets the template
    /// prompt plus a fixed no-audio note. Returns the first completion's
    /// content verbatim.
    pub async fn analyze(
        &self,
        song_name: &str,
        audio_base64: Option<&str>,
    ) -> CoachResult<String> {
        let system = prompts::analysis_system_prompt();
        let user = prompts::analysis_user_prompt(song_name);

        let (model, messages) = match audio_base64 {
            Some(audio) => (
                self.audio_model.as_str(),
                vec![
                    ChatMessage::system(system),
                    ChatMessage::user_with_audio(user, audio.to_string()),
                ],
            ),
            None => (
                self.model.as_str(),
                vec![
                    ChatMessage::system(system),
                    ChatMessage::user(format!("{user}\n\n{}", prompts::NO_AUDIO_NOTE)),
                ],
            ),
        };

        let content = self
            .send(ChatRequest {
                model,
                messages,
                temperature: TEMPERATURE,
                max_tokens: ANALYSIS_MAX_TOKENS,
            })
            .await?;

        tracing::debug!(song_name, bytes = content.len(), "Analysis received");
        Ok(content)
    }

    /// Produce the aggregate voice report for a set of demo names.
    ///
    /// Requires at least [`MIN_REPORT_DEMOS`] names; the check runs before
    /// any outbound request. Parse failures degrade to
    /// [`VoiceReport::fallback`], never to an error.
    pub async fn report(&self, names: &[String]) -> CoachResult<VoiceReport> {
        if names.len() < MIN_REPORT_DEMOS {
            return Err(CoachError::TooFewDemos {
                required: MIN_REPORT_DEMOS,
                actual: names.len(),
            });
        }

        let content = self
            .send(ChatRequest {
                model: &self.model,
                messages: vec![
                    ChatMessage::system(prompts::report_system_prompt()),
                    ChatMessage::user(prompts::report_user_prompt(names)),
                ],
                temperature: TEMPERATURE,
                max_tokens: REPORT_MAX_TOKENS,
            })
            .await?;

        let cleaned = report::strip_code_fences(&content);
        match serde_json::from_str::<VoiceReport>(&cleaned) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                tracing::warn!(error = %e, "Report was not valid JSON, degrading to fallback");
                Ok(VoiceReport::fallback(content))
            }
        }
    }

    /// Send one chat-completions request and extract the first choice's
    /// content. No validation of the content's structure.
    async fn send(&self, request: ChatRequest<'_>) -> CoachResult<String> {
        let api_key = self.api_key.as_deref().ok_or(CoachError::MissingApiKey)?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail: String = body.chars().take(ERROR_DETAIL_LIMIT).collect();
            tracing::error!(status = status.as_u16(), "Completion API error");
            return Err(CoachError::Upstream {
                status: status.as_u16(),
                detail,
            });
        }

        let completion: ChatResponse = response.json().await?;
        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

/// One chat message; content is either plain text or mixed parts.
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

impl ChatMessage {
    fn system(text: String) -> Self {
        Self {
            role: "system",
            content: MessageContent::Text(text),
        }
    }

    fn user(text: String) -> Self {
        Self {
            role: "user",
            content: MessageContent::Text(text),
        }
    }

    fn user_with_audio(text: String, audio_base64: String) -> Self {
        Self {
            role: "user",
            content: MessageContent::Parts(vec![
                ContentPart::Text { text },
                ContentPart::InputAudio {
                    input_audio: InputAudio {
                        data: audio_base64,
                        format: "mp3",
                    },
                },
            ]),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    InputAudio { input_audio: InputAudio },
}

#[derive(Debug, Serialize)]
struct InputAudio {
    data: String,
    format: &'static str,
}

/// Chat-completions response body (only what we read).
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;
    use std::net::TcpListener;

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn coach_for(server: &MockServer) -> VoiceCoach {
        VoiceCoach::from_config(&CoachConfig {
            api_key: Some("test-api-key".to_string()),
            api_base: server.base_url(),
            ..CoachConfig::default()
        })
    }

    fn completion_body(content: &str) -> serde_json::Value {
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
    }

    #[tokio::test]
    async fn analyze_without_audio_uses_text_model_and_note() {
        if !can_bind_localhost() {
            eprintln!("Skipping httpmock tests: cannot bind to localhost");
            return;
        }

        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer test-api-key")
                .body_contains("\"model\":\"gpt-4o\"")
                .body_contains("No audio was provided");
            then.status(200).json_body(completion_body("solid mid-range"));
        });

        let coach = coach_for(&server);
        let analysis = coach.analyze("Late Night Demo", None).await.unwrap();

        mock.assert();
        assert_eq!(analysis, "solid mid-range");
    }

    #[tokio::test]
    async fn analyze_with_audio_uses_audio_model_and_inline_payload() {
        if !can_bind_localhost() {
            eprintln!("Skipping httpmock tests: cannot bind to localhost");
            return;
        }

        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .body_contains("\"model\":\"gpt-4o-audio-preview\"")
                .body_contains("\"input_audio\"")
                .body_contains("\"format\":\"mp3\"")
                .body_contains("QUJD");
            then.status(200).json_body(completion_body("breathy tone"));
        });

        let coach = coach_for(&server);
        let analysis = coach
            .analyze("Late Night Demo", Some("QUJD"))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(analysis, "breathy tone");
    }

    #[tokio::test]
    async fn analyze_surfaces_upstream_status_and_truncated_body() {
        if !can_bind_localhost() {
            eprintln!("Skipping httpmock tests: cannot bind to localhost");
            return;
        }

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(429).body("x".repeat(5000));
        });

        let coach = coach_for(&server);
        match coach.analyze("Song", None).await {
            Err(CoachError::Upstream { status, detail }) => {
                assert_eq!(status, 429);
                assert_eq!(detail.len(), ERROR_DETAIL_LIMIT);
            }
            other => panic!("expected Upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn analyze_without_api_key_fails_before_sending() {
        if !can_bind_localhost() {
            eprintln!("Skipping httpmock tests: cannot bind to localhost");
            return;
        }

        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(completion_body("unused"));
        });

        let coach = VoiceCoach::from_config(&CoachConfig {
            api_key: None,
            api_base: server.base_url(),
            ..CoachConfig::default()
        });

        assert!(matches!(
            coach.analyze("Song", None).await,
            Err(CoachError::MissingApiKey)
        ));
        assert_eq!(mock.hits(), 0);
    }

    #[tokio::test]
    async fn report_parses_fenced_json() {
        if !can_bind_localhost() {
            eprintln!("Skipping httpmock tests: cannot bind to localhost");
            return;
        }

        let server = MockServer::start();
        let fenced = format!(
            "```json\n{}\n```",
            json!({
                "talent": "promising",
                "genre": "indie-folk",
                "directionGo": "acoustic pop",
                "directionAvoid": "metal",
                "similar": "Phoebe Bridgers",
                "strengths": "phrasing",
                "weaknesses": "breath support",
                "exercises": "lip trills"
            })
        );
        server.mock(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .body_contains("\"max_tokens\":6000");
            then.status(200).json_body(completion_body(&fenced));
        });

        let coach = coach_for(&server);
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let report = coach.report(&names).await.unwrap();

        assert_eq!(report.talent, "promising");
        assert_eq!(report.direction_go, "acoustic pop");
        assert_eq!(report.exercises, "lip trills");
    }

    #[tokio::test]
    async fn report_degrades_to_fallback_on_non_json() {
        if !can_bind_localhost() {
            eprintln!("Skipping httpmock tests: cannot bind to localhost");
            return;
        }

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200)
                .json_body(completion_body("Here is my assessment in prose."));
        });

        let coach = coach_for(&server);
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let report = coach.report(&names).await.unwrap();

        assert_eq!(report.talent, "Here is my assessment in prose.");
        assert_eq!(report.genre, REPORT_PLACEHOLDER);
        assert_eq!(report.direction_go, REPORT_PLACEHOLDER);
        assert_eq!(report.exercises, REPORT_PLACEHOLDER);
    }

    #[tokio::test]
    async fn report_requires_three_demos_before_any_request() {
        if !can_bind_localhost() {
            eprintln!("Skipping httpmock tests: cannot bind to localhost");
            return;
        }

        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(completion_body("unused"));
        });

        let coach = coach_for(&server);
        let names = vec!["a".to_string(), "b".to_string()];
        match coach.report(&names).await {
            Err(CoachError::TooFewDemos { required, actual }) => {
                assert_eq!(required, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("expected TooFewDemos, got {other:?}"),
        }
        assert_eq!(mock.hits(), 0);
    }
}
