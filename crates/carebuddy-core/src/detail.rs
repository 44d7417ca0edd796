use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::CareBuddyApi;
use crate::error::ConsoleError;
use crate::types::BuddyDetail;
use crate::view::{RequestGeneration, ViewState};

/// Loads one buddy's profile, analytics, and documents for the detail route.
///
/// Only the most recently requested id is ever reflected: a load that
/// resolves after a newer load was issued is dropped on arrival.
pub struct BuddyDetailView<A> {
    api: Arc<A>,
    state: watch::Sender<ViewState<BuddyDetail>>,
    buddy_id: watch::Sender<Option<String>>,
    generation: RequestGeneration,
}

impl<A: CareBuddyApi> BuddyDetailView<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (state, _) = watch::channel(ViewState::pending());
        let (buddy_id, _) = watch::channel(None);
        Self {
            api,
            state,
            buddy_id,
            generation: RequestGeneration::new(),
        }
    }

    pub fn state(&self) -> ViewState<BuddyDetail> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<BuddyDetail>> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn detail(&self) -> Option<BuddyDetail> {
        self.state.borrow().data.clone()
    }

    /// Id of the most recent `load`, if any.
    pub fn requested_id(&self) -> Option<String> {
        self.buddy_id.borrow().clone()
    }

    /// `wa.me/<number>` for the loaded buddy, derived from the current detail.
    pub fn contact_handle(&self) -> Option<String> {
        self.state.borrow().data.as_ref().map(BuddyDetail::contact_handle)
    }

    pub fn connect_command(&self) -> Option<String> {
        self.state.borrow().data.as_ref().map(BuddyDetail::connect_command)
    }

    pub async fn load(&self, buddy_id: &str) {
        let ticket = self.generation.issue();
        let switching = self.buddy_id.borrow().as_deref() != Some(buddy_id);
        self.buddy_id.send_replace(Some(buddy_id.to_string()));
        self.state.send_modify(|s| {
            s.loading = true;
            s.last_error = None;
            if switching {
                s.data = None;
            }
        });

        if buddy_id.is_empty() {
            let err = ConsoleError::EmptyBuddyId;
            warn!(error = %err, "buddy detail load skipped");
            self.state.send_modify(|s| {
                s.loading = false;
                s.data = None;
                s.last_error = Some(err.to_string());
            });
            return;
        }

        let result = self.api.get_buddy_details(buddy_id).await;

        if !self.generation.is_current(ticket) {
            debug!(buddy_id, "discarding stale buddy detail response");
            return;
        }

        match result {
            Ok(detail) => {
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.data = Some(detail);
                    s.last_error = None;
                });
            }
            Err(e) => {
                warn!(buddy_id, error = %e, "failed to load buddy detail");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.data = None;
                    s.last_error = Some(e.to_string());
                });
            }
        }
    }

    /// Drop the loaded detail and ignore anything still in flight.
    pub fn deactivate(&self) {
        self.generation.invalidate();
        self.buddy_id.send_replace(None);
        self.state.send_replace(ViewState::pending());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{detail, FakeApi};

    fn view() -> (Arc<FakeApi>, BuddyDetailView<FakeApi>) {
        let api = Arc::new(FakeApi::new());
        api.add_detail(detail("A", "Asthma Helper", "15550100"));
        api.add_detail(detail("B", "Blood Pressure", "15550199"));
        let view = BuddyDetailView::new(Arc::clone(&api));
        (api, view)
    }

    #[tokio::test]
    async fn load_exposes_detail_and_contact_handle() {
        let (_api, view) = view();
        assert!(view.is_loading());

        view.load("A").await;

        let state = view.state();
        assert!(!state.loading);
        assert_eq!(state.data.unwrap().name, "Asthma Helper");
        assert_eq!(view.contact_handle().as_deref(), Some("wa.me/15550100"));
        assert_eq!(view.connect_command().as_deref(), Some("CONNECT A"));
    }

    #[tokio::test]
    async fn failed_load_exposes_no_detail() {
        let (_api, view) = view();
        view.load("A").await;

        view.load("missing").await;

        let state = view.state();
        assert!(!state.loading);
        assert!(state.data.is_none());
        assert!(state.last_error.is_some());
        assert_eq!(view.contact_handle(), None);
    }

    #[tokio::test]
    async fn late_response_for_superseded_id_is_discarded() {
        let (api, view) = view();
        let release_a = api.gate("detail:A");

        let second = async {
            tokio::task::yield_now().await;
            view.load("B").await;
            release_a.send(()).unwrap();
        };
        tokio::join!(view.load("A"), second);

        let state = view.state();
        assert!(!state.loading);
        assert_eq!(state.data.unwrap().id, "B");
        assert_eq!(view.requested_id().as_deref(), Some("B"));
        assert_eq!(view.contact_handle().as_deref(), Some("wa.me/15550199"));
    }

    #[tokio::test]
    async fn switching_ids_hides_previous_detail_while_loading() {
        let (api, view) = view();
        view.load("A").await;
        let release_b = api.gate("detail:B");

        let observe = async {
            tokio::task::yield_now().await;
            let during = view.state();
            release_b.send(()).unwrap();
            during
        };
        let ((), during) = tokio::join!(view.load("B"), observe);

        assert!(during.loading);
        assert!(during.data.is_none());
        assert_eq!(view.detail().unwrap().id, "B");
    }

    #[tokio::test]
    async fn empty_id_fails_without_network() {
        let (api, view) = view();
        view.load("").await;
        assert_eq!(api.count("detail:"), 0);
        assert!(!view.is_loading());
        assert!(view.detail().is_none());
    }

    #[tokio::test]
    async fn deactivate_ignores_in_flight_load() {
        let (api, view) = view();
        let release = api.gate("detail:A");

        let leave = async {
            tokio::task::yield_now().await;
            view.deactivate();
            release.send(()).unwrap();
        };
        tokio::join!(view.load("A"), leave);

        assert!(view.detail().is_none());
        assert_eq!(view.requested_id(), None);
    }
}
