use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::models::ItemRecord;
use super::search::BookSearch;
use super::term::SearchTerm;

/// Typed notification published by a running search
#[derive(Debug, Clone)]
pub enum SearchEvent {
    /// A search was submitted
    Started { term: SearchTerm },
    /// Normalized results are available
    Completed {
        term: SearchTerm,
        items: Vec<ItemRecord>,
        at: DateTime<Utc>,
    },
    /// The search could not be completed
    Failed {
        term: SearchTerm,
        error: String,
        at: DateTime<Utc>,
    },
}

impl SearchEvent {
    pub fn term(&self) -> &SearchTerm {
        match self {
            SearchEvent::Started { term }
            | SearchEvent::Completed { term, .. }
            | SearchEvent::Failed { term, .. } => term,
        }
    }
}

/// Run one search in the background and publish its events on `tx`
///
/// `Started` is sent before the task is spawned, followed later by exactly one
/// `Completed` or `Failed`.
pub fn spawn_search(
    search: Arc<dyn BookSearch>,
    term: SearchTerm,
    tx: mpsc::UnboundedSender<SearchEvent>,
) -> JoinHandle<()> {
    let _ = tx.send(SearchEvent::Started { term: term.clone() });

    tokio::spawn(async move {
        let event = match search.search(&term).await {
            Ok(items) => SearchEvent::Completed {
                term,
                items,
                at: Utc::now(),
            },
            Err(e) => {
                tracing::warn!("Search for \"{}\" failed: {}", term, e);
                SearchEvent::Failed {
                    term,
                    error: e.to_string(),
                    at: Utc::now(),
                }
            }
        };

        if tx.send(event).is_err() {
            tracing::debug!("Search result dropped, receiver closed");
        }
    })
}
