use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::CareBuddyApi;
use crate::types::{ImpactSummary, ReportingPeriod};
use crate::view::{RequestGeneration, ViewState};

/// Aggregate cross-buddy metrics for the dashboard landing page.
pub struct ImpactView<A> {
    api: Arc<A>,
    state: watch::Sender<ViewState<ImpactSummary>>,
    period: watch::Sender<ReportingPeriod>,
    generation: RequestGeneration,
}

impl<A: CareBuddyApi> ImpactView<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (state, _) = watch::channel(ViewState::pending());
        let (period, _) = watch::channel(ReportingPeriod::default());
        Self {
            api,
            state,
            period,
            generation: RequestGeneration::new(),
        }
    }

    pub fn state(&self) -> ViewState<ImpactSummary> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState<ImpactSummary>> {
        self.state.subscribe()
    }

    pub fn summary(&self) -> Option<ImpactSummary> {
        self.state.borrow().data.clone()
    }

    pub fn period(&self) -> ReportingPeriod {
        *self.period.borrow()
    }

    pub async fn load(&self, period: ReportingPeriod) {
        let ticket = self.generation.issue();
        let switching = *self.period.borrow() != period;
        self.period.send_replace(period);
        self.state.send_modify(|s| {
            s.loading = true;
            s.last_error = None;
            if switching {
                s.data = None;
            }
        });

        let result = self.api.get_doctor_impact(period).await;

        if !self.generation.is_current(ticket) {
            debug!(%period, "discarding stale impact response");
            return;
        }

        match result {
            Ok(summary) => self.state.send_modify(|s| {
                s.loading = false;
                s.data = Some(summary);
            }),
            Err(e) => {
                warn!(%period, error = %e, "failed to load impact summary");
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.data = None;
                    s.last_error = Some(e.to_string());
                });
            }
        }
    }

    pub fn deactivate(&self) {
        self.generation.invalidate();
        self.state.send_replace(ViewState::pending());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::testing::FakeApi;

    fn summary() -> ImpactSummary {
        ImpactSummary {
            total_buddies: 3,
            total_patients: 41,
            total_conversations: 380,
            average_rating: 4.2,
        }
    }

    #[tokio::test]
    async fn load_exposes_summary_for_period() {
        let api = Arc::new(FakeApi::new());
        api.set_impact(Ok(summary()));
        let view = ImpactView::new(Arc::clone(&api));
        assert!(view.state().loading);

        view.load(ReportingPeriod::Month).await;

        let state = view.state();
        assert!(!state.loading);
        assert_eq!(state.data, Some(summary()));
        assert_eq!(api.events(), ["impact:month"]);
    }

    #[tokio::test]
    async fn failure_exposes_no_summary() {
        let api = Arc::new(FakeApi::new());
        api.set_impact(Ok(summary()));
        let view = ImpactView::new(Arc::clone(&api));
        view.load(ReportingPeriod::Month).await;

        api.set_impact(Err(ApiError::Transport("timed out".into())));
        view.load(ReportingPeriod::Week).await;

        let state = view.state();
        assert!(!state.loading);
        assert!(state.data.is_none());
        assert_eq!(view.period(), ReportingPeriod::Week);
    }

    #[tokio::test]
    async fn later_period_wins() {
        let api = Arc::new(FakeApi::new());
        api.set_impact(Ok(summary()));
        let view = ImpactView::new(Arc::clone(&api));
        let release = api.gate("impact:month");

        let second = async {
            tokio::task::yield_now().await;
            view.load(ReportingPeriod::Today).await;
            release.send(()).unwrap();
        };
        tokio::join!(view.load(ReportingPeriod::Month), second);

        assert_eq!(view.period(), ReportingPeriod::Today);
        assert!(!view.state().loading);
        assert!(view.summary().is_some());
    }
}
