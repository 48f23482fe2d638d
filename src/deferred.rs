//! InvokeLater queue.
//!
//! Anything that would tear down or swap the scene currently being updated is
//! pushed here instead and run by [`Game`](crate::game::Game) between passes.
//! The queue is shared behind a mutex so a clone can be handed to another
//! thread.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::game::Game;

pub type Callback = Box<dyn FnOnce(&mut Game) + Send>;

#[derive(Clone, Default)]
pub struct Deferred {
    queue: Arc<Mutex<VecDeque<Callback>>>,
}

impl Deferred {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invoke_later(&self, callback: impl FnOnce(&mut Game) + Send + 'static) {
        self.lock().push_back(Box::new(callback));
    }

    /// Takes every queued callback, oldest first
    pub fn drain(&self) -> Vec<Callback> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Callback>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("pending", &self.len())
            .finish()
    }
}
