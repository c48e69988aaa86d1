//! ddbtbl - typed access to key-value tables
//!
//! The runtime that accessor APIs emitted by `ddbtbl-codegen` bind to: an
//! async [`Store`] capability, a [`Db`] connection object, fluent request
//! builders and derive macros for mapping between Rust structs and items.
//!
//! # Features
//!
//! - **Fluent Request API**: `db.table("TUser").get(key).fetch_optional()`
//! - **Derive Macros**: `#[derive(FromItem, ToItem)]` for automatic mapping
//! - **Batch Operations**: `BatchGet` and `BatchWrite` split requests to the store's limits
//! - **In-memory Backend**: `MemoryStore`, provisioned from generated table descriptors
//!
//! # Example
//!
//! ```ignore
//! use ddbtbl::{Db, FromItem, Key, ToItem};
//!
//! #[derive(FromItem, ToItem)]
//! pub struct User {
//!     pub uid: i32,
//!     pub name: String,
//! }
//!
//! async fn find_user(db: &Db, uid: i32) -> ddbtbl::Result<Option<User>> {
//!     db.table("TUser")
//!         .get(Key::hash("uid", uid))
//!         .fetch_optional()
//!         .await
//! }
//! ```

pub mod batch;
pub mod error;
pub mod key;
pub mod memory;
pub mod query;
pub mod spec;
pub mod table;
pub mod traits;
pub mod value;
pub mod write;

// Re-export the derive macros
pub use ddbtbl_derive::{FromItem, ToItem};

// Re-export main types
pub use batch::{BatchGet, BatchWrite, MAX_BATCH_GET_KEYS, MAX_BATCH_WRITE_REQUESTS};
pub use error::{Error, Result};
pub use key::{Key, KeyAttr, Operator, RangeCondition};
pub use memory::MemoryStore;
pub use query::{GetItem, Order, Query, Scan};
pub use spec::{AttrSpec, IndexSpec, KeySpec, TableSpec};
pub use table::{Db, Table};
pub use traits::{
    BatchGetInput, BatchWriteInput, BatchWriteOutput, FromItem, FromValue, Item, ItemExt,
    QueryInput, ScanInput, Store, ToItem, ToValue, UpdateAction,
};
pub use value::{ScalarType, Value};
pub use write::{Delete, Put, Update};
