//! Read-side helpers over the card list: grid filtering, "similar ideas" and
//! collection preview chips.

use crate::{Card, ALL_COLLECTION};
use serde::Serialize;
use std::collections::HashSet;

const MAX_SIMILAR: usize = 5;
const MAX_PREVIEW_IMAGES: usize = 3;

/// Compact summary of a collection for its preview chip.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStat {
    pub name: String,
    pub count: usize,
    pub preview_images: Vec<String>,
}

/// `true` when `collection` is `"All"` or one of the card's tags equals it
/// ignoring case.
#[must_use]
pub fn matches_collection(card: &Card, collection: &str) -> bool {
    collection == ALL_COLLECTION || has_tag(card, collection)
}

/// `true` when `query` is empty or occurs, ignoring case, in the title, the
/// summary or any tag.
#[must_use]
pub fn matches_search(card: &Card, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    card.title.to_lowercase().contains(&query)
        || card.summary.to_lowercase().contains(&query)
        || card.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
}

/// Cards matching both the active collection and the search query, in store
/// order.
pub fn filter_cards<'a>(cards: &'a [Card], collection: &str, query: &str) -> Vec<&'a Card> {
    cards
        .iter()
        .filter(|card| matches_collection(card, collection) && matches_search(card, query))
        .collect()
}

/// Up to five other cards sharing a tag with `focal`.
///
/// Secret cards and cards titled exactly like `focal` are skipped, and only
/// the first card of each title is kept.
pub fn similar_cards<'a>(focal: &Card, cards: &'a [Card]) -> Vec<&'a Card> {
    let mut seen_titles = HashSet::new();
    cards
        .iter()
        .filter(|candidate| candidate.id != focal.id)
        .filter(|candidate| candidate.title != focal.title)
        .filter(|candidate| !candidate.is_secret)
        .filter(|candidate| candidate.tags.iter().any(|tag| focal.tags.contains(tag)))
        .filter(|candidate| seen_titles.insert(candidate.title.as_str()))
        .take(MAX_SIMILAR)
        .collect()
}

/// Per-collection counts and up to three cover images, skipping `"All"` and
/// collections no card belongs to.
pub fn collection_stats(collections: &[String], cards: &[Card]) -> Vec<CollectionStat> {
    collections
        .iter()
        .filter(|name| name.as_str() != ALL_COLLECTION)
        .filter_map(|name| {
            let matching: Vec<&Card> = cards.iter().filter(|card| has_tag(card, name)).collect();
            if matching.is_empty() {
                return None;
            }
            Some(CollectionStat {
                name: name.clone(),
                count: matching.len(),
                preview_images: matching
                    .iter()
                    .filter_map(|card| card.image_url.as_deref())
                    .filter(|url| !url.is_empty())
                    .take(MAX_PREVIEW_IMAGES)
                    .map(ToString::to_string)
                    .collect(),
            })
        })
        .collect()
}

fn has_tag(card: &Card, name: &str) -> bool {
    let name = name.to_lowercase();
    card.tags.iter().any(|tag| tag.to_lowercase() == name)
}
