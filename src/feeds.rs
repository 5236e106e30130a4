use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::models::NewFeed;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("feed url and title are both required")]
    MissingFields,
}

/// Add-feed form as the browser posts it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedForm {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

impl FeedForm {
    /// Required-field check only; URL syntax is left to the browser's
    /// `type=url` input.
    pub fn validate(&self) -> Result<NewFeed, FormError> {
        let url = self.url.trim();
        let title = self.title.trim();
        if url.is_empty() || title.is_empty() {
            return Err(FormError::MissingFields);
        }
        Ok(NewFeed {
            url: url.to_string(),
            title: title.to_string(),
        })
    }
}

/// Delete form posted from the confirmation prompt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirm: Option<String>,
}

impl DeleteForm {
    pub fn confirmed(&self) -> bool {
        self.confirm.as_deref() == Some("yes")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mutation {
    Add(String),
    Delete(i64),
}

/// Tracks feed mutations currently in flight so a double submit does not
/// reach the backend twice.
#[derive(Clone, Default)]
pub struct MutationGuard {
    in_flight: Arc<Mutex<HashSet<Mutation>>>,
}

impl MutationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `mutation`; `None` if the same one is already running. The
    /// claim is released when the returned permit drops.
    pub fn try_start(&self, mutation: Mutation) -> Option<MutationPermit> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(mutation.clone()) {
            info!("Mutation {:?} already in progress, skipping", mutation);
            return None;
        }
        Some(MutationPermit {
            guard: self.in_flight.clone(),
            mutation,
        })
    }
}

pub struct MutationPermit {
    guard: Arc<Mutex<HashSet<Mutation>>>,
    mutation: Mutation,
}

impl Drop for MutationPermit {
    fn drop(&mut self) {
        self.guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.mutation);
    }
}
