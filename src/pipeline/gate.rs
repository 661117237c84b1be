//! The filter gate: accept/reject decision for one classified event.
//!
//! Checks run in a fixed order and short-circuit on the first
//! rejection: social link present → link parsable → not already seen →
//! account allowed. Evaluation itself is read-only; the caller commits
//! the dedup key strictly after an `Accept` and before dispatching the
//! notification.

use super::allowlist::Allowlist;
use super::ledger::DedupLedger;
use super::links::{extract_account, extract_message_id};
use super::metadata::LinkResolver;
use crate::pipeline::classifier::TokenCreationEvent;
use std::io;

/// Why an event was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NoSocialLink,
    UnparsableLink,
    AlreadyProcessed,
    AccountNotAllowed,
}

/// Outcome of evaluating one event.
///
/// `Accept` carries the social link alongside the identity so the
/// caller can build the notification without re-resolving metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accept {
        account: String,
        message_id: String,
        link: String,
    },
    Reject(RejectReason),
}

/// Owns the shared filter state (allow-list, seen-posts ledger) and a
/// link resolver, and turns classified events into decisions.
pub struct FilterGate {
    resolver: Box<dyn LinkResolver + Send + Sync>,
    allowlist: Allowlist,
    ledger: DedupLedger,
}

impl FilterGate {
    pub fn new(
        resolver: Box<dyn LinkResolver + Send + Sync>,
        allowlist: Allowlist,
        ledger: DedupLedger,
    ) -> Self {
        Self {
            resolver,
            allowlist,
            ledger,
        }
    }

    /// Evaluate one event. Read-only: no ledger mutation happens here.
    pub async fn evaluate(&self, event: &TokenCreationEvent) -> Decision {
        let links = self
            .resolver
            .resolve_links(event.metadata_uri.as_deref())
            .await;

        if !links.has_social() {
            return Decision::Reject(RejectReason::NoSocialLink);
        }

        let (account, message_id) = match (
            extract_account(&links.social),
            extract_message_id(&links.social),
        ) {
            (Some(account), Some(message_id)) => (account, message_id),
            _ => return Decision::Reject(RejectReason::UnparsableLink),
        };

        if self.ledger.contains(&message_id, &account) {
            return Decision::Reject(RejectReason::AlreadyProcessed);
        }

        if !self.allowlist.contains(&account) {
            return Decision::Reject(RejectReason::AccountNotAllowed);
        }

        Decision::Accept {
            account,
            message_id,
            link: links.social,
        }
    }

    /// Commit an accepted key to the ledger. Must be called before the
    /// notification is dispatched so a replayed frame can never pass
    /// `evaluate` again.
    pub fn commit(&mut self, message_id: &str, account: &str) -> io::Result<()> {
        self.ledger.record(message_id, account)
    }

    pub fn ledger(&self) -> &DedupLedger {
        &self.ledger
    }
}
