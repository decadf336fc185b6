//! In-memory backend for the Roster contact store.
//!
//! Contacts live in a single lock-guarded vector; ids come from an atomic
//! allocator. The optional contact file is only touched at startup and
//! shutdown, through [`snapshot`].

mod ids;
mod store;

pub mod error;
pub mod snapshot;

pub use error::{Error, Result};
pub use ids::{DEFAULT_ID_FLOOR, IdAllocator};
pub use store::MemoryStore;
