mod interaction;
mod product;
mod recommendation;

pub use interaction::{Interaction, InteractionType, NewInteraction};
pub use product::{Product, ProductId, ScoredProduct};
pub use recommendation::{Recommendation, RecommendationQuery};
