//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::messaging::{MessageService, TransportError};

/// A scriptable in-memory message service.
///
/// Pull results and push failures are queued up front; pulls past the end
/// of the script return an empty batch, pushes past the end succeed. Every
/// push is recorded for assertions.
pub struct ScriptedService {
    identity: String,
    endpoint: String,
    pulls: Mutex<VecDeque<Result<Vec<Vec<u8>>, TransportError>>>,
    pull_count: AtomicUsize,
    pushes: Mutex<Vec<(String, String)>>,
    push_errors: Mutex<VecDeque<TransportError>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self {
            identity: "pssst.test".to_string(),
            endpoint: "https://pssst.test".to_string(),
            pulls: Mutex::new(VecDeque::new()),
            pull_count: AtomicUsize::new(0),
            pushes: Mutex::new(Vec::new()),
            push_errors: Mutex::new(VecDeque::new()),
        }
    }

    /// Queues the result of the next unscripted pull.
    pub fn queue_pull(&self, result: Result<Vec<Vec<u8>>, TransportError>) {
        self.pulls.lock().unwrap().push_back(result);
    }

    /// Queues a failure for the next push.
    pub fn queue_push_error(&self, error: TransportError) {
        self.push_errors.lock().unwrap().push_back(error);
    }

    /// All `(receiver, message)` pairs pushed so far.
    pub fn pushes(&self) -> Vec<(String, String)> {
        self.pushes.lock().unwrap().clone()
    }

    /// How many times `pull` has been called.
    pub fn pull_count(&self) -> usize {
        self.pull_count.load(Ordering::Relaxed)
    }
}

impl Default for ScriptedService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageService for ScriptedService {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn push(&self, receiver: &str, message: &str) -> Result<(), TransportError> {
        self.pushes
            .lock()
            .unwrap()
            .push((receiver.to_string(), message.to_string()));
        match self.push_errors.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn pull(&self) -> Result<Vec<Vec<u8>>, TransportError> {
        self.pull_count.fetch_add(1, Ordering::Relaxed);
        self.pulls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
