use crate::{
    error::AppResult,
    models::Product,
    services::{
        explanation::{fallback_explanation, InteractionSummary},
        providers::ExplanationProvider,
    },
};

/// Offline provider that always answers with the templated rationale
///
/// Used when no LLM credentials are configured.
#[derive(Debug, Clone, Default)]
pub struct TemplateProvider;

#[async_trait::async_trait]
impl ExplanationProvider for TemplateProvider {
    async fn explain(&self, product: &Product, _summary: &InteractionSummary) -> AppResult<String> {
        Ok(fallback_explanation(product))
    }

    fn name(&self) -> &'static str {
        "template"
    }
}
