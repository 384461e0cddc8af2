//! The ad lifecycle core: who may see an ad, which transitions are legal,
//! and how concurrent applications and assignments are reconciled.
//!
//! Everything in here is transport-agnostic; handlers translate
//! [`WorkflowError`] kinds to HTTP statuses.

pub mod actor;
pub mod error;
pub mod lifecycle;
pub mod visibility;

pub use actor::{Actor, Capabilities};
pub use error::WorkflowError;
