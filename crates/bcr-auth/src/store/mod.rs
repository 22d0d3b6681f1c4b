//! Durable account storage.
//!
//! - [`UserStore`] - the durable-store contract (implement this for new backends)
//! - [`MemoryStore`] - in-process implementation for tests and single-node use
//!
//! The SQL implementation lives in [`crate::sql`] behind the `sql-*` features.
//!
//! # Adding a new backend
//!
//! ```ignore
//! use bcr_auth::store::UserStore;
//!
//! struct MyStore { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl UserStore for MyStore {
//!     async fn get_user(&self, username: &str) -> Result<UserRecord, AuthError> { todo!() }
//!     // ...
//! }
//! ```

mod memory;
mod traits;

pub use memory::MemoryStore;
pub use traits::{Stats, UserStore};
