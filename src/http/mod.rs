//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, one task per connection)
//!     → request.rs (decode method, path, form value)
//!     → router.rs (resolve route, drive identity store)
//!     → response.rs (render page or redirect)
//!     → Write to client, close
//! ```

pub mod request;
pub mod response;
pub mod router;
pub mod server;

pub use request::{decode_request, Method, Request};
pub use response::{Response, Status};
pub use router::{Dispatcher, Route};
pub use server::{handle_connection, RequestLimits, SurveyServer};
