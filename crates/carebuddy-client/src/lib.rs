//! HTTP implementation of [`carebuddy_core::CareBuddyApi`].
//!
//! # Architecture
//!
//! ```text
//! console view models
//!     │  CareBuddyApi
//!     ▼
//! HttpApiClient   ← reqwest; JSON bodies decoded straight into core types
//!     │
//!     ▼
//! backend /api    GET  /buddies
//!                 GET  /buddy/{id}
//!                 GET  /doctor/impact?timespan=…
//!                 POST /buddies/create          (form: name)
//!                 POST /buddy/{id}/documents    (multipart: files)
//! ```
//!
//! Non-2xx responses become [`carebuddy_core::ApiError`]; the backend's
//! `{"detail": …}` message is carried through so the console can show it.
//!
//! ```rust,ignore
//! use carebuddy_client::HttpApiClient;
//! use carebuddy_core::CareBuddyApi;
//!
//! let client = HttpApiClient::new("http://localhost:8001/api");
//! for buddy in client.get_buddies().await? {
//!     println!("{} {}", buddy.id, buddy.name);
//! }
//! ```

pub mod client;
pub mod wire;

pub use client::HttpApiClient;
