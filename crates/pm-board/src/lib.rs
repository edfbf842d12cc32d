//! # pm-board
//!
//! The issue service's orchestration layer. Every operation works against
//! the capability traits in `pm_core::ports`, so the same code runs over
//! libSQL and Clerk in production and over [`memory`] adapters in tests.
//!
//! - [`IssueReader`]: a creator's live issues as nested issue views
//! - [`BatchPatchProcessor`]: one partial change across many issues
//! - [`IssueCreator`]: append a new issue to its sprint or the backlog
//! - [`MemberLister`]: project members resolved through the directory

pub mod create;
pub mod error;
pub mod gate;
pub mod members;
pub mod memory;
pub mod patch;
pub mod ports;
pub mod reader;

pub use create::IssueCreator;
pub use error::BoardError;
pub use members::MemberLister;
pub use patch::BatchPatchProcessor;
pub use ports::Ports;
pub use reader::IssueReader;

use pm_config::GeneralConfig;

/// All board services over one set of collaborators.
pub struct Board {
    pub reader: IssueReader,
    pub patcher: BatchPatchProcessor,
    pub creator: IssueCreator,
    pub members: MemberLister,
}

impl Board {
    #[must_use]
    pub fn new(ports: &Ports, general: &GeneralConfig) -> Self {
        Self {
            reader: IssueReader::new(ports.clone()),
            patcher: BatchPatchProcessor::new(ports.clone()),
            creator: IssueCreator::new(ports.clone()),
            members: MemberLister::new(ports.clone(), general.member_list_limit),
        }
    }
}
