use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::ProductId;

/// Kind of user interaction with a product
///
/// Records written with a kind the service does not know are kept as
/// `Unrecognized` so they can be stored and read back without loss; they
/// carry no scoring weight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InteractionType {
    View,
    Cart,
    Purchase,
    Unrecognized(String),
}

impl InteractionType {
    pub fn as_str(&self) -> &str {
        match self {
            InteractionType::View => "view",
            InteractionType::Cart => "cart",
            InteractionType::Purchase => "purchase",
            InteractionType::Unrecognized(raw) => raw,
        }
    }
}

impl From<&str> for InteractionType {
    fn from(raw: &str) -> Self {
        match raw {
            "view" => InteractionType::View,
            "cart" => InteractionType::Cart,
            "purchase" => InteractionType::Purchase,
            other => InteractionType::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for InteractionType {
    fn from(raw: String) -> Self {
        InteractionType::from(raw.as_str())
    }
}

impl From<InteractionType> for String {
    fn from(kind: InteractionType) -> Self {
        kind.as_str().to_string()
    }
}

impl Display for InteractionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A timestamped record of a user acting on a product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    pub id: i64,
    pub user_id: String,
    pub product_id: ProductId,
    pub interaction_type: InteractionType,
    pub timestamp: DateTime<Utc>,
}

/// Payload for recording an interaction; the timestamp is assigned by the server
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewInteraction {
    pub user_id: String,
    pub product_id: ProductId,
    pub interaction_type: InteractionType,
}
