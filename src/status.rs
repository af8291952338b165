//! User-facing status line.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

pub const STATUS_HISTORY_CAP: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Idle,
    Active,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

/// Latest status plus a bounded history, shared between the session threads.
#[derive(Debug)]
pub struct StatusBoard {
    history: Mutex<VecDeque<Status>>,
    cap: usize,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::with_capacity(STATUS_HISTORY_CAP)
    }

    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            history: Mutex::new(VecDeque::with_capacity(cap)),
            cap,
        }
    }

    pub fn post(&self, kind: StatusKind, message: impl Into<String>) {
        let message = message.into();
        match kind {
            StatusKind::Error => tracing::warn!(status = %message, "status"),
            StatusKind::Idle | StatusKind::Active => tracing::info!(status = %message, "status"),
        }
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        if history.len() == self.cap {
            history.pop_front();
        }
        history.push_back(Status { kind, message });
    }

    pub fn latest(&self) -> Option<Status> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .back()
            .cloned()
    }

    /// Oldest first.
    pub fn history(&self) -> Vec<Status> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn contains(&self, message: &str) -> bool {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|s| s.message == message)
    }
}
