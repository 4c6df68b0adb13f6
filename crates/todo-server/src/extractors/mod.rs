//! Request extractors

pub mod item;

pub use item::ItemPayload;
