//! # TokenCatcher
//!
//! Watches the PumpPortal new-token stream, resolves each token's
//! metadata for a social link, and forwards posts from allow-listed
//! accounts to a Telegram channel exactly once.
//!
//! Flow:
//! 1. `stream` holds the websocket open and feeds every text frame in
//! 2. `pipeline::classifier` recognizes new-token announcements
//! 3. `pipeline::gate` resolves links, checks the seen-posts ledger and
//!    the allow-list, and decides accept/reject
//! 4. `notify` delivers accepted posts over a channel so a slow
//!    Telegram call never stalls frame intake

pub mod config;
pub mod notify;
pub mod pipeline;
pub mod stream;
