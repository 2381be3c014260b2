//! OpenRouter-compatible vision client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::mock::mock_bill;
use super::response::{ExtractedBill, EXTRACTION_PROMPT};
use super::{BillExtractionGateway, ExtractionError, ReceiptImage};
use crate::config::{ApiConfig, Settings};
use crate::models::BillRecord;

/// Request tuning, taken from the settings file
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
    /// Serve the demo bill when the answer cannot be parsed
    pub mock_fallback: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for RequestOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            timeout: settings.request_timeout(),
            mock_fallback: settings.mock_fallback,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Extracts bills with a vision model behind a chat completions endpoint
pub struct OpenRouterGateway {
    client: Client,
    api: ApiConfig,
    options: RequestOptions,
}

impl OpenRouterGateway {
    pub fn new(api: ApiConfig, options: RequestOptions) -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| ExtractionError::Network(e.to_string()))?;

        info!(
            endpoint = api.api_base(),
            model = api.model().unwrap_or("(service default)"),
            "extraction client ready"
        );
        Ok(Self {
            client,
            api,
            options,
        })
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    async fn request_content(&self, image: &ReceiptImage) -> Result<String, ExtractionError> {
        let request = ChatRequest {
            model: self.api.model(),
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: EXTRACTION_PROMPT,
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image.to_data_url(),
                        },
                    },
                ],
            }],
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
        };

        debug!(image = ?image, "calling extraction service");

        let resp = self
            .client
            .post(self.api.api_base())
            .header("Authorization", format!("Bearer {}", self.api.api_key()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ExtractionError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ExtractionError::MalformedResponse("no choices in response".into()))?;

        debug!(chars = content.len(), "extraction service answered");
        Ok(content)
    }

    fn transport_error(&self, err: reqwest::Error) -> ExtractionError {
        if err.is_timeout() {
            ExtractionError::Timeout(self.options.timeout.as_secs())
        } else {
            ExtractionError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl BillExtractionGateway for OpenRouterGateway {
    async fn extract(&self, image: &ReceiptImage) -> Result<BillRecord, ExtractionError> {
        let content = self.request_content(image).await?;

        match ExtractedBill::from_model_output(&content).and_then(ExtractedBill::into_bill) {
            Ok(bill) => {
                info!(
                    merchant = bill.merchant_name(),
                    items = bill.items().len(),
                    total = %bill.total_amount(),
                    "bill extracted"
                );
                Ok(bill)
            }
            Err(err) if self.options.mock_fallback => {
                warn!(error = %err, "answer could not be parsed, using the demo bill");
                Ok(mock_bill())
            }
            Err(err) => Err(err),
        }
    }

    fn name(&self) -> &str {
        "openrouter"
    }
}
