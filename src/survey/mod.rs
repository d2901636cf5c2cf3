//! Survey subsystem.
//!
//! # Data Flow
//! ```text
//! decoded input
//!     → store.rs (look up identity, lock entry)
//!     → identity.rs (apply transition)
//!     → machine.rs (validate input, choose advance / rollback)
//!     → prompts.rs (transcript text)
//! ```
//!
//! # Design Decisions
//! - Identities live for the life of the process; nothing is persisted or evicted
//! - The machine is pure: (step, input) -> transition, applied by the identity
//! - Answers are stored exactly as typed; validation is case-insensitive

pub mod identity;
pub mod machine;
pub mod prompts;
pub mod store;

pub use identity::Identity;
pub use machine::{Outcome, SurveyStep};
pub use store::IdentityStore;
