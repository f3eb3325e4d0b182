use super::fetch::FetchState;

/// Read-only view of where a fetch state is in its lifecycle.
///
/// Views match on this instead of combining `fetching`, `saving`, `data`
/// and the error fields by hand:
/// - Idle: nothing in flight and nothing loaded
/// - Fetching: a load is in flight and there is nothing to show
/// - Refreshing: the same entity is being reloaded, stale data is shown
/// - Loaded: data is present and no request is in flight
/// - Saving: a save is in flight
/// - Failed: the last load failed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Lifecycle<T, E = String> {
    #[default]
    Idle,
    Fetching,
    Refreshing(T),
    Loaded(T),
    Saving(T),
    Failed(E),
}

impl<'a, T, F> From<&'a FetchState<T, F>> for Lifecycle<&'a T, &'a str> {
    fn from(state: &'a FetchState<T, F>) -> Self {
        if let Some(error) = state.fetch_error.as_deref() {
            return Lifecycle::Failed(error);
        }

        match (state.data(), state.fetching, state.saving) {
            (Some(data), _, true) => Lifecycle::Saving(data),
            (Some(data), true, false) => Lifecycle::Refreshing(data),
            (Some(data), false, false) => Lifecycle::Loaded(data),
            (None, true, _) => Lifecycle::Fetching,
            (None, false, _) => Lifecycle::Idle,
        }
    }
}

impl<T, E> Lifecycle<T, E> {
    /// A request is in flight (load or save).
    pub fn is_busy(&self) -> bool {
        matches!(self, Lifecycle::Fetching | Lifecycle::Refreshing(_) | Lifecycle::Saving(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Lifecycle::Failed(_))
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Lifecycle::Idle)
    }

    /// The data, whatever request is in flight.
    pub fn data(&self) -> Option<&T> {
        match self {
            Lifecycle::Refreshing(data) | Lifecycle::Loaded(data) | Lifecycle::Saving(data) => Some(data),
            _ => None,
        }
    }

    pub fn map<U, M>(self, f: M) -> Lifecycle<U, E>
    where
        M: FnOnce(T) -> U,
    {
        match self {
            Lifecycle::Idle => Lifecycle::Idle,
            Lifecycle::Fetching => Lifecycle::Fetching,
            Lifecycle::Refreshing(data) => Lifecycle::Refreshing(f(data)),
            Lifecycle::Loaded(data) => Lifecycle::Loaded(f(data)),
            Lifecycle::Saving(data) => Lifecycle::Saving(f(data)),
            Lifecycle::Failed(e) => Lifecycle::Failed(e),
        }
    }

    /// Short label for status lines.
    pub fn label(&self) -> &'static str {
        match self {
            Lifecycle::Idle => "idle",
            Lifecycle::Fetching => "fetching",
            Lifecycle::Refreshing(_) => "refreshing",
            Lifecycle::Loaded(_) => "loaded",
            Lifecycle::Saving(_) => "saving",
            Lifecycle::Failed(_) => "failed",
        }
    }
}
