//! Market descriptors for Probable Markets Yes/No markets.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Side of a binary market.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// The Yes outcome token.
    #[strum(to_string = "YES", serialize = "yes", serialize = "Yes")]
    #[default]
    Yes,
    /// The No outcome token.
    #[strum(to_string = "NO", serialize = "no", serialize = "No")]
    No,
}

impl Side {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Yes => Side::No,
            Side::No => Side::Yes,
        }
    }
}

/// One tradable Yes/No market discovered from the events API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Market {
    /// Event title shown to the operator.
    pub title: String,
    /// Event slug (used to build the web URL).
    pub event_slug: String,
    /// Market slug, the stable identifier within an event.
    pub market_slug: String,
    /// Web page for the event.
    pub url: String,
    /// Token ID for the Yes outcome book.
    pub yes_token_id: String,
    /// Token ID for the No outcome book.
    pub no_token_id: String,
    /// Display label of the Yes outcome.
    pub yes_outcome: String,
    /// Display label of the No outcome.
    pub no_outcome: String,
}

impl Market {
    /// Get the token ID for a given side.
    pub fn token_id(&self, side: Side) -> &str {
        match side {
            Side::Yes => &self.yes_token_id,
            Side::No => &self.no_token_id,
        }
    }

    /// Get the outcome label for a given side.
    pub fn outcome_label(&self, side: Side) -> &str {
        match side {
            Side::Yes => &self.yes_outcome,
            Side::No => &self.no_outcome,
        }
    }
}

/// Raw event from the discovery API.
#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    /// Event title.
    pub title: Option<String>,
    /// Event slug.
    pub slug: Option<String>,
    /// Markets grouped under this event.
    #[serde(default)]
    pub markets: Vec<EventMarketData>,
}

/// Raw market entry inside an event.
///
/// `clobTokenIds` and `outcomes` arrive as JSON-encoded strings, each
/// expected to hold exactly two entries for a Yes/No market.
#[derive(Debug, Clone, Deserialize)]
pub struct EventMarketData {
    /// Market slug.
    pub market_slug: Option<String>,
    /// Token IDs, JSON-encoded array of two strings.
    #[serde(rename = "clobTokenIds")]
    pub clob_token_ids: Option<String>,
    /// Outcome labels, JSON-encoded array of two strings.
    pub outcomes: Option<String>,
    /// Whether the market has closed.
    pub closed: Option<bool>,
}
