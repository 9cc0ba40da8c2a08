//! Tweet translation and language detection through a chat-completions
//! API.
//!
//! Outcomes are in-band: callers always get a structured result with a
//! `success` flag, and upstream failures become error messages rather
//! than propagated errors, so the web layer can hand them straight to
//! the client.

use crate::config::TranslationConfig;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

/// Target languages offered to readers: code to native display name.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("zh", "中文"),
    ("en", "English"),
    ("ja", "日本語"),
    ("ko", "한국어"),
    ("es", "Español"),
    ("fr", "Français"),
    ("de", "Deutsch"),
    ("ru", "Русский"),
    ("ar", "العربية"),
    ("hi", "हिन्दी"),
    ("pt", "Português"),
    ("it", "Italiano"),
];

#[must_use]
pub fn language_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]+>").unwrap_or_else(|e| panic!("invalid tag regex: {e}"))
});

/// Strip display markup and collapse whitespace before sending text to
/// the translation backend.
#[must_use]
pub fn clean_content(content: &str) -> String {
    let stripped = TAG_RE.replace_all(content, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Result of one translation request.
#[derive(Debug, Clone, Serialize)]
pub struct Translation {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub original: String,
    pub translated: String,
    pub source_lang: String,
    pub target_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_lang_name: Option<String>,
}

impl Translation {
    fn failure(original: &str, source_lang: &str, target_lang: &str, error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
            original: original.to_string(),
            translated: String::new(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            target_lang_name: None,
        }
    }
}

/// Result of one language detection request.
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub detected_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_lang_name: Option<String>,
}

impl Detection {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
            detected_lang: "unknown".to_string(),
            detected_lang_name: None,
        }
    }
}

/// Translation collaborator behind the web API.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, content: &str, target_lang: &str, source_lang: &str) -> Translation;

    async fn detect_language(&self, content: &str) -> Detection;
}

// =============================================================================
// Chat-completions backend
// =============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

const TRANSLATE_PROMPT: &str = "You are a professional tweet translator. \
Translate the following tweet into {language}. Keep the original tone, \
preserve emoji, hashtags and links, and use natural phrasing in the \
target language. Return only the translation, with no explanation.";

const DETECT_PROMPT: &str = "You are a language detection expert. Detect \
the language of the following text and return only its two-letter code. \
Supported codes: zh, en, ja, ko, es, fr, de, ru, ar, hi, pt, it. Return \
only the code.";

/// Translator backed by an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiTranslator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiTranslator {
    /// Build from configuration. `None` when no API key is set.
    #[must_use]
    pub fn from_config(config: &TranslationConfig) -> Option<Self> {
        let api_key = config.api_key.clone().filter(|k| !k.is_empty())?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .ok()?;
        info!("Translation enabled with model {}", config.model);
        Some(Self {
            client,
            api_key,
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_content: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            max_tokens,
            temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }
        let body: ChatResponse = response.json().await.map_err(|e| e.to_string())?;
        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| "empty completion".to_string())
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(&self, content: &str, target_lang: &str, source_lang: &str) -> Translation {
        let clean = clean_content(content);
        if clean.is_empty() {
            return Translation::failure(content, source_lang, target_lang, "empty tweet content".to_string());
        }

        let target_name = language_name(target_lang).unwrap_or("中文");
        let prompt = TRANSLATE_PROMPT.replace("{language}", target_name);

        match self.complete(&prompt, &clean, 500, 0.3).await {
            Ok(translated) => Translation {
                success: true,
                error: None,
                original: content.to_string(),
                translated,
                source_lang: source_lang.to_string(),
                target_lang: target_lang.to_string(),
                target_lang_name: Some(target_name.to_string()),
            },
            Err(e) => {
                error!("Translation failed: {e}");
                Translation::failure(content, source_lang, target_lang, format!("translation failed: {e}"))
            }
        }
    }

    async fn detect_language(&self, content: &str) -> Detection {
        let clean = clean_content(content);
        if clean.is_empty() {
            return Detection::failure("empty text content".to_string());
        }

        match self.complete(DETECT_PROMPT, &clean, 10, 0.1).await {
            Ok(code) => {
                let code = code.to_lowercase();
                let name = language_name(&code);
                Detection {
                    success: true,
                    error: None,
                    detected_lang: code,
                    detected_lang_name: name.map(String::from),
                }
            }
            Err(e) => {
                error!("Language detection failed: {e}");
                Detection::failure(format!("language detection failed: {e}"))
            }
        }
    }
}

/// Stand-in used when no API key is configured. Every request fails in
/// a structured way so the pages can show a clear message.
pub struct DisabledTranslator;

#[async_trait]
impl Translator for DisabledTranslator {
    async fn translate(&self, content: &str, target_lang: &str, source_lang: &str) -> Translation {
        Translation::failure(
            content,
            source_lang,
            target_lang,
            "translation is not configured; set an API key".to_string(),
        )
    }

    async fn detect_language(&self, _content: &str) -> Detection {
        Detection::failure("translation is not configured; set an API key".to_string())
    }
}

/// Pick the backend for the current configuration.
#[must_use]
pub fn build_translator(config: &TranslationConfig) -> std::sync::Arc<dyn Translator> {
    match OpenAiTranslator::from_config(config) {
        Some(t) => std::sync::Arc::new(t),
        None => std::sync::Arc::new(DisabledTranslator),
    }
}
