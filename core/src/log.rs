//! Append-only action log and the terminal round summary.

use serde::{Deserialize, Serialize};

/// Player actions recorded in the move log.
///
/// Crafting happens in place and is not recorded; code `2` is left unused so
/// the numbering matches logs produced by earlier builds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionCode {
    /// Picked up an ingredient.
    Collect,
    /// Delivered a crafted item.
    Deliver,
}

impl ActionCode {
    /// Numeric code stored alongside each entry.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Collect => 1,
            Self::Deliver => 3,
        }
    }
}

/// Single recorded player action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveLogEntry {
    /// Tile column the player stood on.
    pub column: u32,
    /// Tile row the player stood on.
    pub row: u32,
    /// Action performed.
    pub action: ActionCode,
    /// Round clock reading in milliseconds when the action happened.
    pub timestamp_ms: u64,
}

/// Append-only audit trail of player actions.
///
/// The log is never validated by the arena; it is handed to the result
/// collaborator so an external verifier can consume it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveLog {
    entries: Vec<MoveLogEntry>,
}

impl MoveLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the end of the log.
    pub fn record(&mut self, entry: MoveLogEntry) {
        self.entries.push(entry);
    }

    /// Recorded entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[MoveLogEntry] {
        &self.entries
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no action was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Final record handed to the result collaborator when the round ends.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Points scored by the player.
    pub player_score: u32,
    /// Items delivered by the player.
    pub player_deliveries: u32,
    /// Points scored by the bot.
    pub bot_score: u32,
    /// Recipes completed by the bot.
    pub bot_deliveries: u32,
    /// Player action log.
    pub move_log: MoveLog,
}
