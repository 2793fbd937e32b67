pub mod error;
pub mod formatter;
pub mod model;
pub mod store;

pub use store::JsonBookmarkStore;
