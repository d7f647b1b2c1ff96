//! Search-mode selector chosen at flow start.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The search mode the user picked when starting a flow.
///
/// Fixes both the data-collection path (Custom walks the extended
/// optional-field chain) and the ranking rule applied to results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Cheapest first.
    LowPrice,
    /// Most expensive first.
    HighPrice,
    /// Best rated first.
    BestDeals,
    /// User-supplied price ceiling, original provider order.
    Custom,
}

impl CommandKind {
    /// Returns true if this kind collects the extended optional fields
    /// (children, infants, pets, currency, max price).
    pub fn is_custom(&self) -> bool {
        matches!(self, CommandKind::Custom)
    }

    /// The slash command that triggers this kind.
    pub fn as_command(&self) -> &'static str {
        match self {
            CommandKind::LowPrice => "/lowprice",
            CommandKind::HighPrice => "/highprice",
            CommandKind::BestDeals => "/bestdeals",
            CommandKind::Custom => "/custom",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_command())
    }
}
