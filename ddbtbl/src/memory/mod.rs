//! In-memory implementation for ddbtbl

mod store;

pub use store::MemoryStore;
