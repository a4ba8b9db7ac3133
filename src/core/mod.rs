//! Core property store implementation

pub mod array;
pub mod delimiter;
pub mod error;
pub mod format;
pub mod io;
pub mod merge;
pub mod prefix;
pub mod store;

pub use delimiter::{Delimiter, DELIMITER_SENTINEL_KEY};
pub use error::{PropertiesError, Result};
pub use format::{Format, PropertyCodec};
pub use prefix::PrefixGroup;
pub use store::{PropertyStore, SharedPropertyStore};
