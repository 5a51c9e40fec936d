//! UDP transport, SNMPv3 discovery, and the manager-side convenience API
//! (Get/GetNext/GetBulk/Set/Walk over both v1/v2c community peers and
//! SNMPv3 USM peers, plus a blocking facade for non-async callers).

pub mod blocking;
pub mod community_target;
pub mod config;
pub mod convenience;
pub mod engine;
pub mod report;
pub mod socket;
pub mod user_target;

pub use blocking::{BlockingCommunityTarget, BlockingUserTarget};
pub use community_target::CommunityTarget;
pub use config::RequestConfig;
pub use engine::Cancellation;
pub use user_target::UserTarget;
