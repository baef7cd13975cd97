//! Issue creation and per-project key sequencing.

pub mod sequence;
pub mod service;

pub use sequence::next_key;
pub use service::IssueService;
