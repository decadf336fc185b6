//! Core types and trait definitions for the Roster address book.
//!
//! This crate is deliberately free of HTTP and storage dependencies. The
//! store backends and the HTTP layer depend on it.

pub mod contact;
pub mod error;
pub mod etag;
pub mod precondition;
pub mod store;

pub use contact::{Contact, ContactId, ContactList};
pub use error::{Error, Result};
pub use precondition::Precondition;
pub use store::{ContactStore, WriteOutcome};
