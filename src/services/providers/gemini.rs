//! Gemini explanation provider
//!
//! Calls the `generateContent` endpoint with a single-turn prompt built from
//! the product details and the user's activity summary.

use crate::{
    error::{AppError, AppResult},
    models::Product,
    services::{explanation::InteractionSummary, providers::ExplanationProvider},
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct GeminiProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        )
    }

    /// Builds the prompt sent to the model
    fn build_prompt(product: &Product, summary: &InteractionSummary) -> String {
        format!(
            "You are an e-commerce recommendation assistant. Generate a brief, compelling \
             explanation (2-3 sentences) for why we're recommending this product to the user.\n\
             \n\
             Product Details:\n\
             - Name: {}\n\
             - Category: {}\n\
             - Price: ${}\n\
             - Description: {}\n\
             \n\
             User's Recent Activity:\n\
             {}\n\
             \n\
             Write a personalized, friendly explanation that connects the product to the \
             user's interests. Be conversational and focus on benefits. Keep it under 50 words.",
            product.name, product.category, product.price, product.description, summary
        )
    }

    fn request_body(product: &Product, summary: &InteractionSummary) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(Self::build_prompt(product, summary)),
                }],
            }],
        }
    }

    /// Pulls the generated text out of a response, rejecting empty answers
    fn extract_text(response: GenerateResponse) -> AppResult<String> {
        if let Some(error) = response.error {
            return Err(AppError::ExternalApi(format!(
                "Gemini returned an error: {}",
                error.message
            )));
        }

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::ExternalApi(
                "Gemini response contained no text".to_string(),
            ));
        }

        Ok(text.to_string())
    }
}

#[async_trait::async_trait]
impl ExplanationProvider for GeminiProvider {
    async fn explain(&self, product: &Product, summary: &InteractionSummary) -> AppResult<String> {
        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::request_body(product, summary))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response.json().await?;
        let text = Self::extract_text(generated)?;

        tracing::debug!(
            product_id = product.id,
            provider = "gemini",
            chars = text.len(),
            "Explanation generated"
        );

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
