pub mod error;
pub mod reconcile;
pub mod sorter;
pub mod store;
pub mod tree;
pub mod validate;
