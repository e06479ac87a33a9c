//! Mirage Intel — Forensic artifact extraction and scoring.
//!
//! Scammer messages carry artifacts of forensic value: bank account
//! numbers, UPI payment handles, phone numbers, phishing links, email
//! addresses, and scam-indicator keywords. This crate pulls them out of
//! raw text with pattern matching and accumulates them per session in a
//! deduplicating ledger with a weighted quality score.

pub mod extract;
pub mod ledger;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub use extract::extract;
pub use ledger::IntelligenceLedger;

/// Artifacts found in a single message.
///
/// Always fully populated: a message with nothing of interest yields
/// empty sets, never missing fields, so merge logic downstream has no
/// absence cases. `BTreeSet` gives dedup within one extraction and a
/// stable iteration order for reporting.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractionResult {
    pub bank_accounts: BTreeSet<String>,
    pub upi_ids: BTreeSet<String>,
    pub phone_numbers: BTreeSet<String>,
    pub phishing_links: BTreeSet<String>,
    pub email_addresses: BTreeSet<String>,
    pub suspicious_keywords: BTreeSet<String>,
}

impl ExtractionResult {
    /// True when no artifact of any type was found.
    pub fn is_empty(&self) -> bool {
        self.bank_accounts.is_empty()
            && self.upi_ids.is_empty()
            && self.phone_numbers.is_empty()
            && self.phishing_links.is_empty()
            && self.email_addresses.is_empty()
            && self.suspicious_keywords.is_empty()
    }

    /// Total artifact count across all buckets.
    pub fn len(&self) -> usize {
        self.bank_accounts.len()
            + self.upi_ids.len()
            + self.phone_numbers.len()
            + self.phishing_links.len()
            + self.email_addresses.len()
            + self.suspicious_keywords.len()
    }
}
