//! `OpenAI` chat-completions translation provider.

use catalog_core::{Locale, LocalePair};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::TranslationProvider;
use crate::config::TranslationConfig;
use crate::error::TranslationError;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Translator backed by the `OpenAI` chat-completions endpoint.
///
/// Deterministic settings (temperature 0) because translations feed
/// natural keys and must be reproducible across runs.
#[derive(Clone)]
pub struct OpenAiTranslator {
    client: reqwest::Client,
    model: String,
}

impl OpenAiTranslator {
    /// Create a new translator.
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: &TranslationConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
                .expect("Invalid API key for header"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            model: config.model.clone(),
        }
    }
}

/// Language name as the system prompt spells it.
const fn language_name(locale: Locale) -> &'static str {
    match locale {
        Locale::Uk => "украинский",
        Locale::Ru => "русский",
        Locale::En => "английский",
    }
}

fn system_prompt(target: Locale) -> String {
    let language = language_name(target);
    format!(
        "Ты профессиональный переводчик, переводящий текст на {language}. Следуй этим правилам:\n\
         1. При переводе названий товаров не добавляй никаких слов - оставляй только точный перевод исходного названия без изменений технических обозначений.\n\
         2. Сохраняй исходное форматирование, стили и пунктуацию: если оригинал не содержит завершающих знаков, их не добавляй.\n\
         3. Не изменяй числовые значения, технические обозначения, специальные символы и форматирование.\n\
         4. Переводи максимально точно, передавая общий смысл оригинала без добавления лишних слов.\n\
         5. Не добавляй лишние символы (например, кавычки или точки) в начале или в конце перевода, если их нет в исходном тексте.\n\
         6. В названиях товаров не выводи дополнительных пояснений (например, \"переводится как\", \"перевод\", \"->\").\n\
         7. Если перевод совпадает с оригиналом, оставь его без изменений."
    )
}

impl TranslationProvider for OpenAiTranslator {
    #[instrument(skip(self, text), fields(text_len = text.len(), %pair))]
    async fn translate_raw(
        &self,
        text: &str,
        pair: LocalePair,
    ) -> Result<String, TranslationError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: system_prompt(pair.target),
                },
                Message {
                    role: "user".to_string(),
                    content: format!(
                        "Переведи на {}: \"{text}\"",
                        language_name(pair.target)
                    ),
                },
            ],
            temperature: 0.0,
            top_p: 1.0,
        };

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::MalformedResponse(format!(
                "OpenAI API error ({status}): {body}"
            )));
        }

        let response: ChatResponse = response
            .json()
            .await
            .map_err(TranslationError::Http)?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                TranslationError::MalformedResponse("no choices in response".to_string())
            })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}
