//! Shared utilities for dispatch integration tests.

use std::sync::{Arc, Mutex};

use switchyard::{handler_fn, DispatchError, SharedHandler};

/// Ordered record of which handlers ran and which errors they observed.
#[derive(Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Handler that records `label` and succeeds.
    pub fn ok(&self, label: &str) -> SharedHandler {
        let journal = self.clone();
        let label = label.to_string();
        handler_fn(move |cx| {
            journal.push(observed(&label, cx.error()));
            Ok(())
        })
    }

    /// Handler that records `label` and fails with `message`.
    pub fn fail(&self, label: &str, message: &str) -> SharedHandler {
        let journal = self.clone();
        let label = label.to_string();
        let message = message.to_string();
        handler_fn(move |cx| {
            journal.push(observed(&label, cx.error()));
            Err(DispatchError::msg(&message))
        })
    }
}

fn observed(label: &str, error: Option<&DispatchError>) -> String {
    match error {
        Some(error) => format!("{label}<{error}>"),
        None => label.to_string(),
    }
}
