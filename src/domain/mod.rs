//! Domain logic - pure release rules independent of git operations

pub mod branch;
pub mod commit;
pub mod scope;
pub mod tag;
pub mod version;

pub use branch::BranchPattern;
pub use commit::CommitRecord;
pub use scope::{commit_applies_to, filter_by_scope};
pub use tag::AppTag;
pub use version::{BumpDecision, Version};
