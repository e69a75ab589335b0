//! Storage Module
//!
//! On-disk layout of a store and the one-time loader.
//!
//! ## Responsibilities
//! - Name record and index files
//! - Write files by replace-then-rename
//! - Load every record file into memory, validating names against contents
//!
//! ## Directory Layout
//! ```text
//! {data_dir}/
//!   ├── index.ddps     "4"            next identity to allocate
//!   ├── 1.ddps         <record text>  identity 1
//!   ├── 2.ddps         <record text>  identity 2
//!   └── 3.ddps         <record text>  identity 3
//! ```
//!
//! Only the action queue's worker writes into this directory.

pub mod files;
mod loader;

pub use loader::{DiskLoader, LoadResult};
