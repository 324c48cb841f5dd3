//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature so the
//! integration suite can drive the HTTP surface without PostgreSQL or Redis.

mod clock;
mod memory_cache;
mod memory_store;

pub use clock::FixedClock;
pub use memory_cache::InMemoryListCache;
pub use memory_store::InMemoryStore;
