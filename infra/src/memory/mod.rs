//! In-memory repositories
//!
//! A single store implements every repository trait over one set of tables,
//! so joins, cascades and the agreement/occupancy write see one consistent
//! state. It keeps the same unique keys and foreign-key behaviour as the
//! MySQL schema.

mod store;


pub use store::InMemoryStore;
