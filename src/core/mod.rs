pub mod error;
pub mod types;

pub use error::{FatalBatchError, FormatError, FormatErrorCode};
pub use types::{EntityId, MetadataSource, TargetRoleRegistry};
