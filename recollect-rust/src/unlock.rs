//! Passcode gate for secret cards.
//!
//! The passcode is a shared four-digit constant compared in plain text. It
//! keeps secret cards out of casual view and is not cryptographically
//! meaningful.

use crate::{Card, RecollectError, RecollectResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

pub const DEFAULT_UNLOCK_CODE: &str = "0000";

/// Remembers which secret cards were opened during this process' lifetime.
/// Nothing here is persisted.
#[derive(Debug)]
pub struct UnlockGate {
    passcode: String,
    unlocked: HashSet<String>,
}

impl Default for UnlockGate {
    fn default() -> Self {
        Self {
            passcode: DEFAULT_UNLOCK_CODE.to_string(),
            unlocked: HashSet::new(),
        }
    }
}

impl UnlockGate {
    /// `passcode` must be exactly four ASCII digits.
    pub fn new(passcode: impl Into<String>) -> RecollectResult<Self> {
        let passcode = passcode.into();
        validate_passcode(&passcode)?;
        Ok(Self {
            passcode,
            unlocked: HashSet::new(),
        })
    }

    /// Try `code` for `card_id`. On success the card stays unlocked for the
    /// rest of the session.
    pub fn attempt(&mut self, card_id: &str, code: &str) -> bool {
        if code != self.passcode {
            warn!(card_id, "wrong unlock code");
            return false;
        }
        debug!(card_id, "card unlocked");
        self.unlocked.insert(card_id.to_string());
        true
    }

    #[must_use]
    pub fn is_unlocked(&self, card_id: &str) -> bool {
        self.unlocked.contains(card_id)
    }

    /// `true` when opening `card` must go through the passcode prompt.
    #[must_use]
    pub fn needs_challenge(&self, card: &Card) -> bool {
        card.is_secret && !self.is_unlocked(&card.id)
    }

    /// The card as the grid may show it.
    #[must_use]
    pub fn present(&self, card: &Card) -> CardView {
        if self.needs_challenge(card) {
            CardView::Locked(LockedCard::from(card))
        } else {
            CardView::Open(card.clone())
        }
    }
}

pub(crate) fn validate_passcode(passcode: &str) -> RecollectResult<()> {
    if passcode.len() == 4 && passcode.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(RecollectError::Config(
            "unlock code must be exactly 4 digits".to_string(),
        ))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum CardView {
    Open(Card),
    Locked(LockedCard),
}

/// A secret card with its content withheld.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LockedCard {
    pub id: String,
    pub is_favorite: bool,
    pub is_secret: bool,
    pub locked: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Card> for LockedCard {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id.clone(),
            is_favorite: card.is_favorite,
            is_secret: true,
            locked: true,
            created_at: card.created_at,
        }
    }
}
