//! Drives the [`Store`] with [`Command`]s: immediate dispatches are applied
//! in order, async work is kept pending until [`Runtime::step`] resolves it.

pub mod actions;
pub mod api;
pub mod command;

pub use api::{FixtureApi, SurveyApi};
pub use command::Command;

use crate::store::{Store, StoreAction};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::future::Future;
use std::pin::Pin;

type PendingAction = Pin<Box<dyn Future<Output = StoreAction> + Send>>;

pub struct Runtime {
    store: Store,
    pending: FuturesUnordered<PendingAction>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(Store::new())
    }
}

impl Runtime {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            pending: FuturesUnordered::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn into_store(self) -> Store {
        self.store
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn dispatch(&mut self, action: StoreAction) -> bool {
        self.store.dispatch(action)
    }

    /// Execute a command. Returns whether any immediate dispatch changed the
    /// store; async work is queued.
    pub fn execute(&mut self, command: Command) -> bool {
        match command {
            Command::None => false,
            Command::Batch(commands) => {
                let mut changed = false;
                for command in commands {
                    changed |= self.execute(command);
                }
                changed
            }
            Command::Dispatch(action) => self.store.dispatch(action),
            Command::Perform(future) => {
                self.pending.push(future);
                false
            }
        }
    }

    /// Wait for the next pending operation to finish and dispatch its action.
    /// Returns `false` once nothing is pending.
    pub async fn step(&mut self) -> bool {
        match self.pending.next().await {
            Some(action) => {
                self.store.dispatch(action);
                true
            }
            None => false,
        }
    }

    pub async fn run_until_idle(&mut self) {
        while self.step().await {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::{Mode, Questionnaire};
    use crate::store::{EntityFilter, FetchAction};
    use tokio::sync::oneshot;

    fn questionnaire(id: i64, name: &str) -> Questionnaire {
        Questionnaire {
            id: Some(id),
            project_id: 1,
            name: name.into(),
            modes: vec![Mode::Sms],
            steps: vec![],
        }
    }

    fn deferred(rx: oneshot::Receiver<Questionnaire>) -> Command {
        Command::perform(async move { rx.await }, |result| {
            StoreAction::Questionnaire(match result {
                Ok(q) => FetchAction::Receive(q),
                Err(_) => FetchAction::FetchFailed {
                    filter: EntityFilter::new(1, None),
                    error: "cancelled".into(),
                },
            })
        })
    }

    fn fetch(id: i64) -> Command {
        Command::dispatch(StoreAction::Questionnaire(FetchAction::Fetch(EntityFilter::new(1, id))))
    }

    #[tokio::test]
    async fn test_last_request_wins_when_responses_arrive_out_of_order() {
        let mut runtime = Runtime::default();
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();

        runtime.execute(Command::batch(vec![fetch(1), deferred(first_rx)]));
        runtime.execute(Command::batch(vec![fetch(2), deferred(second_rx)]));
        assert_eq!(runtime.pending_count(), 2);

        second_tx.send(questionnaire(2, "second")).unwrap();
        assert!(runtime.step().await);
        assert_eq!(runtime.store().questionnaire.data().unwrap().name, "second");

        first_tx.send(questionnaire(1, "first")).unwrap();
        runtime.run_until_idle().await;

        let state = &runtime.store().questionnaire;
        assert_eq!(state.data().unwrap().name, "second");
        assert!(!state.fetching);
        assert_eq!(runtime.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_step_without_pending_work() {
        let mut runtime = Runtime::default();
        assert!(!runtime.execute(Command::None));
        assert!(!runtime.step().await);
    }
}
