//! Configuration module

mod collection;

pub use collection::CollectionConfig;
