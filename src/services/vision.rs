use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::models::ImagePayload;

const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_TIMEOUT_SECS: u64 = 25;
const MAX_TOKENS: u32 = 600;

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        #[serde(rename = "type")]
        content_type: String,
        text: String,
    },
    ImageUrl {
        #[serde(rename = "type")]
        content_type: String,
        image_url: ImageUrlData,
    },
}

#[derive(Debug, Serialize)]
struct ImageUrlData {
    url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: String,
}

/// Seam for the multimodal completion call, so tests can script replies.
#[async_trait::async_trait]
pub trait VisionService: Send + Sync {
    async fn infer(
        &self,
        image: &ImagePayload,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AnalysisError>;
}

/// OpenRouter-compatible chat-completions client. Exactly one call per
/// analysis, hard deadline, no retries.
pub struct OpenRouterVision {
    api_key: String,
    model: String,
    api_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenRouterVision {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_config(
            api_key,
            model,
            DEFAULT_API_URL.to_string(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn with_config(api_key: String, model: String, api_url: String, timeout: Duration) -> Self {
        Self {
            api_key,
            model,
            api_url,
            timeout,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl VisionService for OpenRouterVision {
    async fn infer(
        &self,
        image: &ImagePayload,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AnalysisError> {
        let data_url = format!("data:{};base64,{}", image.media_type.mime(), image.data);
        log::debug!(
            "🖼️ Prepared {} image, {} base64 chars",
            image.media_type.mime(),
            image.data.len()
        );

        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: vec![ContentPart::Text {
                    content_type: "text".to_string(),
                    text: system_prompt.to_string(),
                }],
            },
            ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        content_type: "text".to_string(),
                        text: user_prompt.to_string(),
                    },
                    ContentPart::ImageUrl {
                        content_type: "image_url".to_string(),
                        image_url: ImageUrlData { url: data_url },
                    },
                ],
            },
        ];

        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: MAX_TOKENS,
        };

        log::info!("🤖 Sending vision request with model: {}", self.model);

        // The API key goes into the Authorization header only; it must not
        // appear in log lines or in any error we return.
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    log::warn!("⏱️ Vision request exceeded {:?} deadline", self.timeout);
                    AnalysisError::InferenceTimeout
                } else {
                    AnalysisError::InferenceTransport(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        log::debug!("📥 Vision provider response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("❌ Vision provider error ({}): {}", status, body);
            return Err(AnalysisError::InferenceUpstream {
                status: status.as_u16(),
                body,
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            AnalysisError::InferenceTransport(format!("malformed completion response: {}", e))
        })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                AnalysisError::InferenceTransport("completion contained no choices".to_string())
            })?;

        log::debug!("💬 Model reply: {} chars", content.len());
        Ok(content)
    }
}
