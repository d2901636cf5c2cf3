//! Survey server library.
//!
//! A small HTTP/1.1-shaped server on raw TCP that walks each signed-in
//! username through a four-question survey.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod survey;

pub use config::SurveyConfig;
pub use http::SurveyServer;
pub use lifecycle::Shutdown;
pub use survey::IdentityStore;
