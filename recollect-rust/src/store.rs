use crate::{
    storage::{PersistedState, StateStorage},
    Card, CardDraft, RecollectResult, ALL_COLLECTION,
};
use chrono::Utc;
use tracing::{debug, info};

/// Owns every card and the collection list. All mutation goes through the
/// operations below; each one writes the persisted blob before returning.
///
/// Cards are kept newest first.
pub struct CardStore {
    cards: Vec<Card>,
    collections: Vec<String>,
    storage: Box<dyn StateStorage>,
    last_id_millis: i64,
}

impl CardStore {
    /// Open the store from `storage`, falling back to the seeded state when
    /// nothing usable was persisted.
    pub fn open(storage: Box<dyn StateStorage>) -> RecollectResult<Self> {
        let state = match storage.load()? {
            Some(state) => state,
            None => {
                info!("starting from seeded card state");
                PersistedState::seeded()
            }
        };
        Ok(Self::with_state(storage, state))
    }

    /// Build a store over an explicit initial state without touching
    /// `storage` until the first mutation.
    pub fn with_state(storage: Box<dyn StateStorage>, state: PersistedState) -> Self {
        Self {
            cards: state.cards,
            collections: state.collections,
            storage,
            last_id_millis: 0,
        }
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    /// Assign an id and creation time, mark it not-favorite and put it in
    /// front of every existing card.
    pub fn add_card(&mut self, draft: CardDraft) -> RecollectResult<Card> {
        let created_at = Utc::now();
        let card = Card {
            id: self.next_id(created_at.timestamp_millis()),
            title: draft.title,
            summary: draft.summary,
            image_url: draft.image_url,
            content_image_url: draft.content_image_url,
            visual_focal_point: draft.visual_focal_point,
            tags: draft.tags,
            is_favorite: false,
            is_secret: draft.is_secret,
            created_at,
        };
        info!(id = %card.id, tags = ?card.tags, "card added");
        self.cards.insert(0, card.clone());
        self.persist()?;
        Ok(card)
    }

    /// Remove the card with `id`. Returns whether a card was removed; an
    /// unknown id is not an error.
    pub fn delete_card(&mut self, id: &str) -> RecollectResult<bool> {
        let before = self.cards.len();
        self.cards.retain(|card| card.id != id);
        let removed = self.cards.len() != before;
        debug!(id, removed, "delete card");
        self.persist()?;
        Ok(removed)
    }

    /// Flip `isFavorite` on the card with `id` and return the updated card.
    pub fn toggle_favorite(&mut self, id: &str) -> RecollectResult<Option<Card>> {
        let updated = self.cards.iter_mut().find(|card| card.id == id).map(|card| {
            card.is_favorite = !card.is_favorite;
            card.clone()
        });
        self.persist()?;
        Ok(updated)
    }

    /// Replace the collection list with `"All"` followed by `collections`
    /// minus any `"All"` entries, order preserved.
    pub fn set_collections<I, S>(&mut self, collections: I) -> RecollectResult<&[String]>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.collections = std::iter::once(ALL_COLLECTION.to_string())
            .chain(
                collections
                    .into_iter()
                    .map(Into::into)
                    .filter(|name| name != ALL_COLLECTION),
            )
            .collect();
        info!(collections = ?self.collections, "collections replaced");
        self.persist()?;
        Ok(&self.collections)
    }

    /// A copy of the current state, e.g. to feed the collection deriver
    /// without holding the store.
    #[must_use]
    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            cards: self.cards.clone(),
            collections: self.collections.clone(),
        }
    }

    // Ids are `card-<millis>`; two adds inside the same millisecond bump the
    // later one forward so ids never repeat within a process.
    fn next_id(&mut self, now_millis: i64) -> String {
        let mut millis = now_millis.max(self.last_id_millis + 1);
        while self.cards.iter().any(|card| card.id == format!("card-{millis}")) {
            millis += 1;
        }
        self.last_id_millis = millis;
        format!("card-{millis}")
    }

    fn persist(&mut self) -> RecollectResult<()> {
        let state = self.snapshot();
        self.storage.save(&state)
    }
}
