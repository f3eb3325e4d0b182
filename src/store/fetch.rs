//! Generic fetch-state container.
//!
//! A [`FetchState`] tracks one entity through its lifecycle
//! (idle → fetching → loaded → saving → saved), whether local edits are
//! unsaved, and which instance it currently represents. [`FetchReducer`]
//! applies [`FetchAction`]s to it, delegating edits to an [`EntityReducer`].
//!
//! Responses are committed only when their derived filter equals the filter
//! of the most recent fetch. Overlapping fetches therefore resolve as "last
//! request wins" regardless of the order in which responses arrive.

use super::filter::EntityFilter;
use super::validation::ValidationErrors;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

/// Per-entity behaviour plugged into the generic container.
///
/// `reduce` must return `Some` exactly when the edit changes the data and
/// `None` otherwise. The container relies on this to keep the state (and the
/// `Arc` holding the data) untouched for no-op edits.
pub trait EntityReducer {
    type Data: Clone + Debug;
    type Edit: Debug;
    type Filter: Clone + PartialEq + Debug;

    /// Filter provider: which instance a payload belongs to.
    fn filter_of(&self, data: &Self::Data) -> Self::Filter;

    /// Apply an edit to loaded data.
    fn reduce(&self, data: &Self::Data, edit: &Self::Edit) -> Option<Self::Data>;

    /// Whether a changing edit counts as an unsaved local modification.
    fn is_dirty(&self, _edit: &Self::Edit, _old: &Self::Data, _new: &Self::Data) -> bool {
        true
    }

    /// Whether a save acknowledgement for `saved` belongs to the entity
    /// recorded as `current`.
    fn adopts_saved(&self, current: &Self::Filter, saved: &Self::Filter) -> bool {
        current == saved
    }

    /// Combine a save acknowledgement with the loaded data. `local` is set
    /// when edits were made while the save was in flight; those edits win.
    fn merge_saved(&self, local: Option<&Self::Data>, saved: Self::Data) -> Self::Data {
        match local {
            Some(local) => local.clone(),
            None => saved,
        }
    }

    /// Recompute the full error map for the data.
    fn validate(&self, _data: &Self::Data) -> ValidationErrors {
        ValidationErrors::new()
    }
}

/// Lifecycle actions plus the entity's own edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchAction<T, E, F = EntityFilter> {
    /// A load for `F` was started.
    Fetch(F),
    /// A load completed with this payload.
    Receive(T),
    /// A load for `filter` failed in the transport layer.
    FetchFailed { filter: F, error: String },
    /// A save was started.
    Saving,
    /// A save was acknowledged, optionally with the server's copy.
    Saved(Option<T>),
    /// A save failed in the transport layer.
    SaveFailed(String),
    /// A local edit routed to the entity reducer.
    Edit(E),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchState<T, F = EntityFilter> {
    pub fetching: bool,
    pub saving: bool,
    pub dirty: bool,
    pub filter: Option<F>,
    pub data: Option<Arc<T>>,
    pub errors: ValidationErrors,
    pub fetch_error: Option<String>,
    pub save_error: Option<String>,
    /// Bumped every time `data` is replaced or cleared.
    pub version: u64,
}

impl<T, F> Default for FetchState<T, F> {
    fn default() -> Self {
        Self {
            fetching: false,
            saving: false,
            dirty: false,
            filter: None,
            data: None,
            errors: ValidationErrors::new(),
            fetch_error: None,
            save_error: None,
            version: 0,
        }
    }
}

impl<T, F> FetchState<T, F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// False while `filter` is already loading or loaded.
    pub fn needs_fetch(&self, filter: &F) -> bool
    where
        F: PartialEq,
    {
        self.filter.as_ref() != Some(filter) || (!self.fetching && self.data.is_none())
    }
}

/// The container: routes actions to lifecycle transitions or to the entity
/// reducer.
#[derive(Debug, Clone, Default)]
pub struct FetchReducer<R> {
    reducer: R,
}

pub type StateOf<R> = FetchState<<R as EntityReducer>::Data, <R as EntityReducer>::Filter>;
pub type ActionOf<R> =
    FetchAction<<R as EntityReducer>::Data, <R as EntityReducer>::Edit, <R as EntityReducer>::Filter>;

impl<R: EntityReducer> FetchReducer<R> {
    pub fn new(reducer: R) -> Self {
        Self { reducer }
    }

    pub fn entity(&self) -> &R {
        &self.reducer
    }

    /// Apply `action` in place. Returns `false` when the state is untouched.
    pub fn update(&self, state: &mut StateOf<R>, action: ActionOf<R>) -> bool {
        match action {
            FetchAction::Fetch(filter) => self.fetch(state, filter),
            FetchAction::Receive(data) => self.receive(state, data),
            FetchAction::FetchFailed { filter, error } => self.fetch_failed(state, filter, error),
            FetchAction::Saving => self.saving(state),
            FetchAction::Saved(data) => self.saved(state, data),
            FetchAction::SaveFailed(error) => self.save_failed(state, error),
            FetchAction::Edit(edit) => self.edit(state, edit),
        }
    }

    /// Pure form of [`update`](Self::update). The data is shared, not copied.
    pub fn reduce(&self, state: &StateOf<R>, action: ActionOf<R>) -> StateOf<R> {
        let mut next = state.clone();
        self.update(&mut next, action);
        next
    }

    fn fetch(&self, state: &mut StateOf<R>, filter: R::Filter) -> bool {
        let same_entity = state.filter.as_ref() == Some(&filter);
        if !same_entity && state.data.is_some() {
            self.replace_data(state, None);
        }

        log::debug!("Fetching {:?} (refresh: {})", filter, same_entity);
        state.fetching = true;
        state.fetch_error = None;
        state.filter = Some(filter);
        true
    }

    fn receive(&self, state: &mut StateOf<R>, data: R::Data) -> bool {
        let data_filter = self.reducer.filter_of(&data);
        if state.filter.as_ref() != Some(&data_filter) {
            log::debug!(
                "Dropping stale response for {:?} (current filter {:?})",
                data_filter,
                state.filter
            );
            return false;
        }

        log::info!("Received {:?}", data_filter);
        state.fetching = false;
        state.fetch_error = None;
        self.replace_data(state, Some(Arc::new(data)));
        true
    }

    fn fetch_failed(&self, state: &mut StateOf<R>, filter: R::Filter, error: String) -> bool {
        if state.filter.as_ref() != Some(&filter) {
            log::debug!("Ignoring failure of superseded fetch {:?}: {}", filter, error);
            return false;
        }

        log::warn!("Fetch of {:?} failed: {}", filter, error);
        state.fetching = false;
        state.fetch_error = Some(error);
        true
    }

    fn saving(&self, state: &mut StateOf<R>) -> bool {
        state.saving = true;
        state.dirty = false;
        state.save_error = None;
        true
    }

    fn saved(&self, state: &mut StateOf<R>, data: Option<R::Data>) -> bool {
        state.saving = false;
        state.save_error = None;

        let Some(saved) = data else {
            log::info!("Saved {:?}", state.filter);
            return true;
        };

        let saved_filter = self.reducer.filter_of(&saved);
        let belongs = state
            .filter
            .as_ref()
            .is_some_and(|current| self.reducer.adopts_saved(current, &saved_filter));
        if !belongs {
            log::debug!(
                "Dropping save acknowledgement for {:?} (current filter {:?})",
                saved_filter,
                state.filter
            );
            return true;
        }

        let local = if state.dirty { state.data.clone() } else { None };
        let merged = self.reducer.merge_saved(local.as_deref(), saved);
        log::info!("Saved {:?}", saved_filter);
        state.filter = Some(self.reducer.filter_of(&merged));
        self.replace_data(state, Some(Arc::new(merged)));
        true
    }

    fn save_failed(&self, state: &mut StateOf<R>, error: String) -> bool {
        log::warn!("Save of {:?} failed: {}", state.filter, error);
        state.saving = false;
        state.dirty = true;
        state.save_error = Some(error);
        true
    }

    fn edit(&self, state: &mut StateOf<R>, edit: R::Edit) -> bool {
        let Some(current) = state.data.clone() else {
            log::debug!("Ignoring {:?}: nothing loaded", edit);
            return false;
        };

        match self.reducer.reduce(&current, &edit) {
            Some(next) => {
                if self.reducer.is_dirty(&edit, &current, &next) {
                    state.dirty = true;
                }
                self.replace_data(state, Some(Arc::new(next)));
                true
            }
            None => false,
        }
    }

    fn replace_data(&self, state: &mut StateOf<R>, data: Option<Arc<R::Data>>) {
        state.errors = match data.as_deref() {
            Some(data) => self.reducer.validate(data),
            None => ValidationErrors::new(),
        };
        state.data = data;
        state.version += 1;
    }
}
