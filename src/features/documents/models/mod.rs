pub mod document;

pub use document::{DocumentRecord, Visibility};
