//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection limits)
//!     → connection.rs (lifecycle tracking, read one request)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Bounded accept queue prevents resource exhaustion
//! - Each connection tracked for graceful shutdown
//! - One request per connection: read, respond, close

pub mod connection;
pub mod listener;

pub use connection::{read_request, ConnectionError, ConnectionId, ConnectionTracker};
pub use listener::{Listener, ListenerError};
