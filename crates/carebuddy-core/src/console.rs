use std::fmt;
use std::sync::Arc;

use crate::api::CareBuddyApi;
use crate::config::ConsoleConfig;
use crate::create::{CreationWorkflow, SubmitOutcome};
use crate::detail::BuddyDetailView;
use crate::error::CreateError;
use crate::impact::ImpactView;
use crate::roster::RosterStore;

pub const DASHBOARD_PATH: &str = "/doctors-dashboard";

/// Console destinations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Aggregate impact summary (dashboard landing page).
    Impact,
    Buddy(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Impact => DASHBOARD_PATH.to_string(),
            Route::Buddy(id) => format!("{DASHBOARD_PATH}/buddy/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Receives navigation requests from console workflows.
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

impl<F: FnMut(Route)> Navigator for F {
    fn navigate(&mut self, route: Route) {
        self(route)
    }
}

/// One doctor session: the shared roster plus the new-buddy dialog.
///
/// Detail and impact views are created per route activation with
/// [`Console::detail_view`] and [`Console::impact_view`].
pub struct Console<A> {
    api: Arc<A>,
    roster: RosterStore<A>,
    creation: CreationWorkflow<A>,
}

impl<A: CareBuddyApi> Console<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            roster: RosterStore::new(Arc::clone(&api)),
            creation: CreationWorkflow::new(Arc::clone(&api)),
            api,
        }
    }

    /// Session whose creation dialog expects the configured document types.
    pub fn with_config(api: Arc<A>, config: &ConsoleConfig) -> Self {
        Self {
            roster: RosterStore::new(Arc::clone(&api)),
            creation: CreationWorkflow::new(Arc::clone(&api))
                .with_accepted_extensions(config.accepted_extensions.clone()),
            api,
        }
    }

    pub fn roster(&self) -> &RosterStore<A> {
        &self.roster
    }

    pub fn creation(&self) -> &CreationWorkflow<A> {
        &self.creation
    }

    pub fn detail_view(&self) -> BuddyDetailView<A> {
        BuddyDetailView::new(Arc::clone(&self.api))
    }

    pub fn impact_view(&self) -> ImpactView<A> {
        ImpactView::new(Arc::clone(&self.api))
    }

    /// Submit the new-buddy form, then refresh the roster, then navigate to
    /// the new buddy. Each step starts only after the previous one settled;
    /// nothing after the submit runs unless the buddy was created.
    ///
    /// Returns `Ok(None)` when a submit was already in flight.
    pub async fn create_buddy<N: Navigator>(
        &self,
        navigator: &mut N,
    ) -> Result<Option<String>, CreateError> {
        match self.creation.submit().await? {
            SubmitOutcome::Busy => Ok(None),
            SubmitOutcome::Created(id) => {
                self.roster.refresh().await;
                navigator.navigate(Route::Buddy(id.clone()));
                Ok(Some(id))
            }
        }
    }
}
