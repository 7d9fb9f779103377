//! Explanation provider abstraction
//!
//! Rationale text is produced by a pluggable provider (Gemini, a fixed
//! template, or either of those behind a Redis cache). Providers only ever
//! see an already-ranked product, so nothing they do can change ordering.

use crate::{error::AppResult, models::Product, services::explanation::InteractionSummary};

pub mod cached;
pub mod gemini;
pub mod template;

pub use cached::CachedProvider;
pub use gemini::GeminiProvider;
pub use template::TemplateProvider;

/// Trait for explanation providers
///
/// Implementations may fail freely; callers substitute a deterministic
/// fallback on any error.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ExplanationProvider: Send + Sync {
    /// Produce a short rationale for recommending `product` to a user with the given activity
    async fn explain(&self, product: &Product, summary: &InteractionSummary) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
