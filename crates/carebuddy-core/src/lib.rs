//! State for the CareBuddy doctor console.
//!
//! ```text
//! CareBuddyApi (trait)  ← implemented by carebuddy-client over HTTP
//!     │
//!     ├── RosterStore        sidebar list + search filter, refreshed after creates
//!     ├── CreationWorkflow   new-buddy form: validate → create
//!     ├── BuddyDetailView    one buddy, stale responses dropped
//!     └── ImpactView         aggregate metrics per reporting period
//!
//! Console                ← ties create → roster refresh → navigation together
//! ```
//!
//! View models publish their state through `tokio::sync::watch` channels and
//! never hold a lock across a network call.

pub mod api;
pub mod config;
pub mod console;
pub mod create;
pub mod detail;
pub mod error;
pub mod impact;
pub mod io;
pub mod paths;
pub mod roster;
pub mod types;
pub mod upload;
pub mod view;

#[cfg(test)]
mod testing;

pub use api::{ApiResult, CareBuddyApi};
pub use console::{Console, Navigator, Route};
pub use create::{CreateForm, CreationWorkflow, SubmitOutcome};
pub use detail::BuddyDetailView;
pub use error::{ApiError, ConsoleError, CreateError, Result, ValidationError};
pub use impact::ImpactView;
pub use roster::{filter_buddies, RosterSnapshot, RosterStore};
pub use types::{Analytics, Buddy, BuddyDetail, Document, ImpactSummary, ReportingPeriod};
pub use upload::UploadFile;
pub use view::ViewState;
