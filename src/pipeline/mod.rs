//! Frame-processing pipeline: classify → resolve → filter → decide.
//!
//! The pipeline is fed one decoded frame at a time by the stream
//! manager and never persists raw frames. Only accepted posts leave a
//! trace: one `message_id|account` line appended to the seen-posts
//! ledger, plus a notification handed to the dispatcher.
//!
//! Module organization:
//! - `classifier` - recognizes new-token announcements across wire shapes
//! - `metadata` - best-effort link resolution from token metadata
//! - `links` - account / message-id extraction from social URLs
//! - `allowlist` - static permitted-account set
//! - `ledger` - durable already-seen `(message_id, account)` set
//! - `gate` - the accept/reject decision over all of the above

pub mod allowlist;
pub mod classifier;
pub mod gate;
pub mod ledger;
pub mod links;
pub mod metadata;

pub use allowlist::Allowlist;
pub use classifier::{classify, TokenCreationEvent};
pub use gate::{Decision, FilterGate, RejectReason};
pub use ledger::DedupLedger;
pub use metadata::{HttpResolver, LinkBundle, LinkResolver, LINK_UNAVAILABLE};
