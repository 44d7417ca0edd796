use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::CareBuddyApi;
use crate::types::Buddy;
use crate::view::RequestGeneration;

// ---------------------------------------------------------------------------
// RosterSnapshot
// ---------------------------------------------------------------------------

/// What the sidebar renders: the doctor's buddies plus load status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterSnapshot {
    pub loading: bool,
    pub buddies: Vec<Buddy>,
    /// Diagnostic only; never shown to the doctor.
    pub last_error: Option<String>,
}

impl Default for RosterSnapshot {
    fn default() -> Self {
        Self {
            loading: true,
            buddies: Vec::new(),
            last_error: None,
        }
    }
}

impl RosterSnapshot {
    pub fn filter(&self, query: &str) -> Vec<Buddy> {
        filter_buddies(&self.buddies, query)
    }

    /// Placeholder shown when a filtered roster has no rows.
    pub fn empty_message(query: &str) -> &'static str {
        if query.is_empty() {
            "No buddies yet"
        } else {
            "No buddies found"
        }
    }
}

/// Buddies whose name contains `query`, ignoring case, in roster order.
///
/// An empty query matches everything.
pub fn filter_buddies(buddies: &[Buddy], query: &str) -> Vec<Buddy> {
    if query.is_empty() {
        return buddies.to_vec();
    }
    let needle = query.to_lowercase();
    buddies
        .iter()
        .filter(|b| b.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// RosterStore
// ---------------------------------------------------------------------------

/// Session-wide list of the doctor's buddies.
///
/// The list only changes through [`RosterStore::refresh`], which swaps it in
/// one step. Consumers read it with [`RosterStore::snapshot`] or follow it
/// with [`RosterStore::subscribe`].
pub struct RosterStore<A> {
    api: Arc<A>,
    state: watch::Sender<RosterSnapshot>,
    generation: RequestGeneration,
}

impl<A: CareBuddyApi> RosterStore<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (state, _) = watch::channel(RosterSnapshot::default());
        Self {
            api,
            state,
            generation: RequestGeneration::new(),
        }
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RosterSnapshot> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn buddies(&self) -> Vec<Buddy> {
        self.state.borrow().buddies.clone()
    }

    pub fn filter(&self, query: &str) -> Vec<Buddy> {
        filter_buddies(&self.state.borrow().buddies, query)
    }

    /// Re-fetch the roster from the backend.
    ///
    /// On failure the previous list is kept. `loading` always clears once
    /// the latest refresh settles.
    pub async fn refresh(&self) {
        let ticket = self.generation.issue();
        self.state.send_modify(|s| s.loading = true);

        let result = self.api.get_buddies().await;

        if !self.generation.is_current(ticket) {
            debug!("discarding roster response superseded by a newer refresh");
            return;
        }

        match result {
            Ok(buddies) => {
                debug!(count = buddies.len(), "roster refreshed");
                self.state.send_modify(|s| {
                    s.buddies = buddies;
                    s.loading = false;
                    s.last_error = None;
                });
            }
            Err(e) => {
                warn!(error = %e, "failed to refresh buddy roster");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.last_error = Some(e.to_string());
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::testing::{buddy, FakeApi};

    fn roster() -> Vec<Buddy> {
        vec![
            buddy("b1", "Diabetes Care"),
            buddy("b2", "Asthma Helper"),
            buddy("b3", "Pre-diabetes Coach"),
            buddy("b4", "Cardio"),
        ]
    }

    #[test]
    fn filter_matches_case_insensitively_in_order() {
        let got = filter_buddies(&roster(), "DIAB");
        let ids: Vec<_> = got.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["b1", "b3"]);
    }

    #[test]
    fn empty_query_returns_full_list() {
        assert_eq!(filter_buddies(&roster(), ""), roster());
    }

    #[test]
    fn filter_is_sound_and_complete() {
        let list = roster();
        for query in ["a", "care", "o", "x", "Helper", "-", " "] {
            let got = filter_buddies(&list, query);
            let needle = query.to_lowercase();
            for b in &got {
                assert!(b.name.to_lowercase().contains(&needle), "{query}: {b:?}");
            }
            let expected = list
                .iter()
                .filter(|b| b.name.to_lowercase().contains(&needle))
                .count();
            assert_eq!(got.len(), expected, "query {query:?}");
        }
    }

    #[test]
    fn query_is_not_trimmed() {
        assert!(filter_buddies(&roster(), "cardio ").is_empty());
    }

    #[test]
    fn empty_message_depends_on_query() {
        assert_eq!(RosterSnapshot::empty_message(""), "No buddies yet");
        assert_eq!(RosterSnapshot::empty_message("zz"), "No buddies found");
    }

    #[test]
    fn initial_state_is_loading_and_empty() {
        let store = RosterStore::new(Arc::new(FakeApi::new()));
        assert!(store.is_loading());
        assert!(store.buddies().is_empty());
    }

    #[tokio::test]
    async fn refresh_replaces_list_and_clears_loading() {
        let api = Arc::new(FakeApi::new());
        api.set_buddies(Ok(roster()));
        let store = RosterStore::new(Arc::clone(&api));

        store.refresh().await;

        let snap = store.snapshot();
        assert!(!snap.loading);
        assert_eq!(snap.buddies, roster());
        assert_eq!(store.filter("cardio"), vec![buddy("b4", "Cardio")]);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_list() {
        let api = Arc::new(FakeApi::new());
        api.set_buddies(Ok(roster()));
        let store = RosterStore::new(Arc::clone(&api));
        store.refresh().await;

        api.set_buddies(Err(ApiError::Transport("connection refused".into())));
        store.refresh().await;

        let snap = store.snapshot();
        assert!(!snap.loading);
        assert_eq!(snap.buddies, roster());
        assert!(snap.last_error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn failed_first_refresh_leaves_empty_list() {
        let api = Arc::new(FakeApi::new());
        api.set_buddies(Err(ApiError::Status {
            status: 500,
            detail: None,
        }));
        let store = RosterStore::new(api);
        store.refresh().await;
        assert!(!store.is_loading());
        assert!(store.buddies().is_empty());
    }

    #[tokio::test]
    async fn loading_is_true_while_request_is_in_flight() {
        let api = Arc::new(FakeApi::new());
        api.set_buddies(Ok(roster()));
        let release = api.gate("get_buddies");
        let store = RosterStore::new(Arc::clone(&api));
        let mut rx = store.subscribe();

        let observe = async {
            rx.changed().await.unwrap();
            let during = rx.borrow_and_update().clone();
            release.send(()).unwrap();
            during
        };
        let (during, ()) = tokio::join!(observe, store.refresh());

        assert!(during.loading);
        assert!(during.buddies.is_empty());
        assert!(!store.is_loading());
        assert_eq!(store.buddies().len(), 4);
    }
}
