use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::TranslateConfig;
use crate::error::{Result, RedubError, StageError};
use crate::language::language_name;
use super::Translator;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub response: String,
    pub done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Translator backed by an Ollama server
pub struct OllamaTranslator {
    client: Client,
    config: TranslateConfig,
}

impl OllamaTranslator {
    pub fn new(config: TranslateConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Build translation prompt, asking for JSON output
    fn build_prompt(&self, text: &str, target_language: &str) -> String {
        let language_name = language_name(target_language);

        format!(
            "You are a professional translator of spoken dialogue.\n\
             \n\
             CRITICAL: You must translate the text to {} ONLY. Do not translate to any other language.\n\
             The target language is: {} (language code: {})\n\
             \n\
             Return ONLY the translation in JSON format as {{\"text\":\"your {} translation here\"}}.\n\
             Do not include any explanations, alternatives, or text in other languages.\n\
             \n\
             [Text to translate]\n\
             {}\n",
            language_name, language_name, target_language, language_name, text
        )
    }

    async fn request_translation(&self, text: &str, target_language: &str) -> Result<String> {
        let request = TranslationRequest {
            model: self.config.model.clone(),
            prompt: self.build_prompt(text, target_language),
            stream: false,
            format: "json".to_string(),
        };

        let url = format!("{}/api/generate", self.config.endpoint);
        debug!("Sending translation request to: {}", url);

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(RedubError::Pipeline(format!(
                "Ollama API error {}: {}", status, error_text
            )));
        }

        let translation_response: TranslationResponse = response.json().await?;
        let raw_response = translation_response.response.trim();
        debug!("Raw Ollama response: {}", raw_response);

        let translation = parse_translation(raw_response);
        if translation.is_empty() {
            return Err(RedubError::Pipeline("Empty translation received".to_string()));
        }

        Ok(translation)
    }
}

/// Extract the translation from the model's reply; falls back to the cleaned raw text
pub fn parse_translation(raw_response: &str) -> String {
    if let Ok(result) = serde_json::from_str::<TranslationResult>(raw_response) {
        return result.text.trim().to_string();
    }

    raw_response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
        .trim_matches('"')
        .trim()
        .to_string()
}

#[async_trait]
impl Translator for OllamaTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> std::result::Result<String, StageError> {
        info!("Translating {} characters to {}", text.chars().count(), target_language);

        self.request_translation(text, target_language)
            .await
            .map_err(|e| StageError::Translation(e.to_string()))
    }
}

/// Check if Ollama is reachable and the model is pulled
pub async fn check_ollama_availability(endpoint: &str, model: &str) -> Result<()> {
    let client = Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let url = format!("{}/api/tags", endpoint);
    let response = client.get(&url).send().await
        .map_err(|e| RedubError::Config(format!("Ollama is not reachable at {}: {}", endpoint, e)))?;

    if !response.status().is_success() {
        return Err(RedubError::Config(format!(
            "Ollama returned {} for {}", response.status(), url
        )));
    }

    let tags: TagsResponse = response.json().await?;
    let found = tags.models.iter().any(|m| m.name == model || m.name.starts_with(&format!("{}:", model)));

    if !found {
        return Err(RedubError::Config(format!(
            "Model '{}' is not available in Ollama. Run: ollama pull {}", model, model
        )));
    }

    info!("Ollama is available with model {}", model);
    Ok(())
}
