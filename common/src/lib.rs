//! Taskmap common – framework-independent view state of the project browser:
//! query-string canonicalization, the auth gate, default filters, fetch
//! tracking and view-mode resolution.

pub mod api_params;
pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod filters_panel;
pub mod layout;
pub mod navigation;
pub mod policy;
pub mod query;
pub mod routes;
pub mod session;
pub mod view_mode;

pub use controller::{HistoryMode, ListView, QueryController, QueryViewStateController};
pub use error::FetchError;
pub use fetch::{FetchResult, FetchStatus};
pub use query::{ProjectQuery, QueryUpdate};
pub use session::SessionState;
