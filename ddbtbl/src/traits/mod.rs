//! Core traits for ddbtbl

mod from_value;
mod item;
mod store;
mod to_value;

pub use from_value::FromValue;
pub use item::{FromItem, Item, ItemExt, ToItem};
pub use store::{
    BatchGetInput, BatchWriteInput, BatchWriteOutput, QueryInput, ScanInput, Store, UpdateAction,
};
pub use to_value::ToValue;
