use crate::store::StoreAction;
use std::future::Future;
use std::pin::Pin;

/// Side effects produced by an action creator and executed by the
/// [`Runtime`](super::Runtime).
pub enum Command<A = StoreAction> {
    /// Do nothing
    None,

    /// Execute multiple commands in order
    Batch(Vec<Command<A>>),

    /// Dispatch an action right away
    Dispatch(A),

    /// Run an async operation and dispatch the action it resolves to
    Perform(Pin<Box<dyn Future<Output = A> + Send>>),
}

impl<A> Command<A> {
    /// Helper to create a command that performs an async operation
    pub fn perform<F, T>(future: F, to_action: impl FnOnce(T) -> A + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
        A: Send + 'static,
    {
        Command::Perform(Box::pin(async move {
            let result = future.await;
            to_action(result)
        }))
    }

    pub fn dispatch(action: A) -> Self {
        Command::Dispatch(action)
    }

    /// Helper to batch multiple commands
    pub fn batch(commands: Vec<Command<A>>) -> Self {
        Command::Batch(commands)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }
}

impl<A> Default for Command<A> {
    fn default() -> Self {
        Command::None
    }
}

impl<A: std::fmt::Debug> std::fmt::Debug for Command<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::None => write!(f, "None"),
            Command::Batch(commands) => f.debug_tuple("Batch").field(commands).finish(),
            Command::Dispatch(action) => f.debug_tuple("Dispatch").field(action).finish(),
            Command::Perform(_) => write!(f, "Perform(..)"),
        }
    }
}
