use crate::{model_output, Card, ALL_COLLECTION};
use recollect_genai::{GenerateRequest, LanguageModel};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use tracing::{debug, info, warn};

/// Offered when there are no cards at all.
pub const STARTER_COLLECTIONS: [&str; 4] = ["Design", "Development", "AI", "Inspiration"];
/// Preferred fallback when the model cannot be used or its answer is unusable.
pub const FALLBACK_COLLECTIONS: [&str; 4] = ["Design", "Development", "Life", "Work"];

const MAX_CARDS_IN_PROMPT: usize = 50;
const CURATOR_INSTRUCTION: &str = "You are an expert content curator.";
const SELECTION_TEMPERATURE: f64 = 0.2;
const FREQUENT_TAG_COUNT: usize = 5;

/// The part of a card the deriver looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSummary {
    pub title: String,
    pub tags: Vec<String>,
}

impl From<&Card> for CardSummary {
    fn from(card: &Card) -> Self {
        Self {
            title: card.title.clone(),
            tags: card.tags.clone(),
        }
    }
}

/// Picks which existing tags to promote to top-level collections.
pub struct CollectionDeriver {
    model: Option<Arc<dyn LanguageModel>>,
}

impl CollectionDeriver {
    pub fn new(model: Option<Arc<dyn LanguageModel>>) -> Self {
        Self { model }
    }

    /// Choose 5–7 collection names for `cards`. The result never contains
    /// `"All"`; for a non-empty card set every name is one of the cards' tags.
    pub async fn derive(&self, cards: &[CardSummary]) -> Vec<String> {
        if cards.is_empty() {
            return STARTER_COLLECTIONS.iter().map(ToString::to_string).collect();
        }

        let Some(model) = &self.model else {
            warn!("collection derivation requested without a model credential");
            return fallback_collections(cards);
        };

        let request = GenerateRequest {
            temperature: Some(SELECTION_TEMPERATURE),
            ..GenerateRequest::new([collections_prompt(cards)])
                .with_system_instruction(CURATOR_INSTRUCTION)
        };
        debug!(cards = cards.len(), "requesting collection selection");

        let reply = match model.generate(request).await {
            Ok(response) => response.text().unwrap_or_default(),
            Err(error) => {
                warn!(%error, "collection selection request failed");
                return fallback_collections(cards);
            }
        };

        let chosen = sanitize_choices(
            cards,
            model_output::decode_or_else::<Vec<serde_json::Value>, _>(&reply, Vec::new),
        );
        if chosen.is_empty() {
            warn!(reply = %reply, "model returned no usable collections");
            return fallback_collections(cards);
        }
        info!(collections = ?chosen, "collections derived");
        chosen
    }
}

fn collections_prompt(cards: &[CardSummary]) -> String {
    let card_data = cards
        .iter()
        .take(MAX_CARDS_IN_PROMPT)
        .map(|card| format!("- Title: {}, Tags: {}", card.title, card.tags.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Analyze the following list of User Cards (Title + Tags).

Goal: Select the top 5-7 EXISTING TAGS that would serve as the best high-level "Collections" (Filter Categories) for this library.

Rules:
1. Return ONLY a JSON array of strings: string[].
2. YOU MUST CHOOSE FROM THE EXISTING TAGS provided in the card data. DO NOT INVENT NEW NAMES.
3. Example output: ["Design", "React", "Recipes", "Travel", "Inspiration"].
4. Ensure "All" is NOT in the list (the app adds it itself).
5. The chosen tags should cover the majority of the cards (i.e. popular tags).

Cards:
{card_data}"#
    )
}

/// Keep only string choices naming an existing tag (matched
/// case-insensitively, returned in the cards' spelling), without `"All"` or
/// repeats.
fn sanitize_choices(cards: &[CardSummary], choices: Vec<serde_json::Value>) -> Vec<String> {
    let known = known_tags(cards);
    let mut seen = HashSet::new();
    choices
        .into_iter()
        .filter_map(|choice| choice.as_str().map(str::to_lowercase))
        .filter_map(|lowered| known.get(&lowered).cloned())
        .filter(|tag| !tag.eq_ignore_ascii_case(ALL_COLLECTION))
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .collect()
}

/// The fixed fallback list restricted to tags that exist; when none of them
/// do, the most used tags instead.
fn fallback_collections(cards: &[CardSummary]) -> Vec<String> {
    let known = known_tags(cards);
    let fixed: Vec<String> = FALLBACK_COLLECTIONS
        .iter()
        .filter_map(|name| known.get(&name.to_lowercase()).cloned())
        .collect();
    if fixed.is_empty() {
        most_frequent_tags(cards, FREQUENT_TAG_COUNT)
    } else {
        fixed
    }
}

// Lowercased tag -> first spelling seen in the data.
fn known_tags(cards: &[CardSummary]) -> HashMap<String, String> {
    let mut known = HashMap::new();
    for tag in cards.iter().flat_map(|card| &card.tags) {
        known
            .entry(tag.to_lowercase())
            .or_insert_with(|| tag.clone());
    }
    known
}

fn most_frequent_tags(cards: &[CardSummary], limit: usize) -> Vec<String> {
    // (count, first position, spelling) so ties keep data order.
    let mut counts: HashMap<String, (usize, usize, String)> = HashMap::new();
    for (position, tag) in cards.iter().flat_map(|card| &card.tags).enumerate() {
        if tag.eq_ignore_ascii_case(ALL_COLLECTION) {
            continue;
        }
        counts
            .entry(tag.to_lowercase())
            .or_insert_with(|| (0, position, tag.clone()))
            .0 += 1;
    }
    let mut ranked: Vec<_> = counts.into_values().collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    ranked
        .into_iter()
        .take(limit)
        .map(|(_, _, tag)| tag)
        .collect()
}
