//! Session-scoped intelligence accumulation and quality scoring.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ExtractionResult;

/// Keywords counted toward the score are capped; breadth of hard
/// artifacts matters, keyword volume does not.
const SCORED_KEYWORDS_MAX: usize = 5;

/// Per-session artifact accumulator.
///
/// Created empty at session start and mutated only by [`merge`], which
/// is a set union per bucket: idempotent, and commutative with respect
/// to the order extractions arrive in.
///
/// [`merge`]: IntelligenceLedger::merge
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntelligenceLedger {
    pub bank_accounts: BTreeSet<String>,
    pub upi_ids: BTreeSet<String>,
    pub phone_numbers: BTreeSet<String>,
    pub phishing_links: BTreeSet<String>,
    pub email_addresses: BTreeSet<String>,
    pub suspicious_keywords: BTreeSet<String>,
}

impl IntelligenceLedger {
    /// Fold one message's extraction into the ledger.
    pub fn merge(&mut self, incoming: &ExtractionResult) {
        self.bank_accounts.extend(incoming.bank_accounts.iter().cloned());
        self.upi_ids.extend(incoming.upi_ids.iter().cloned());
        self.phone_numbers.extend(incoming.phone_numbers.iter().cloned());
        self.phishing_links.extend(incoming.phishing_links.iter().cloned());
        self.email_addresses.extend(incoming.email_addresses.iter().cloned());
        self.suspicious_keywords
            .extend(incoming.suspicious_keywords.iter().cloned());
    }

    /// True once any bucket holds at least one artifact.
    ///
    /// Keywords alone do not count: they signal scam language, not
    /// captured forensics, and the stage engine treats them accordingly.
    pub fn has_hard_artifacts(&self) -> bool {
        !self.bank_accounts.is_empty()
            || !self.upi_ids.is_empty()
            || !self.phone_numbers.is_empty()
            || !self.phishing_links.is_empty()
            || !self.email_addresses.is_empty()
    }

    /// Total artifact count across every bucket.
    pub fn total_items(&self) -> usize {
        self.bank_accounts.len()
            + self.upi_ids.len()
            + self.phone_numbers.len()
            + self.phishing_links.len()
            + self.email_addresses.len()
            + self.suspicious_keywords.len()
    }

    /// Weighted quality score.
    ///
    /// Bank accounts 3.0, UPI IDs and links 2.0, phones and emails 1.0,
    /// keywords 0.5 each with at most five counted. A 1.2x variety bonus
    /// applies when three or more of the four primary artifact types
    /// (bank / upi / link / phone) are non-empty, rewarding breadth over
    /// depth in a single category. Rounded to two decimals.
    pub fn score(&self) -> f64 {
        let mut score = 0.0;

        score += self.bank_accounts.len() as f64 * 3.0;
        score += self.upi_ids.len() as f64 * 2.0;
        score += self.phishing_links.len() as f64 * 2.0;
        score += self.phone_numbers.len() as f64 * 1.0;
        score += self.email_addresses.len() as f64 * 1.0;
        score += self.suspicious_keywords.len().min(SCORED_KEYWORDS_MAX) as f64 * 0.5;

        let variety = [
            !self.bank_accounts.is_empty(),
            !self.upi_ids.is_empty(),
            !self.phishing_links.is_empty(),
            !self.phone_numbers.is_empty(),
        ]
        .iter()
        .filter(|&&present| present)
        .count();

        if variety >= 3 {
            score *= 1.2;
        }

        (score * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract;

    fn sample_extraction() -> ExtractionResult {
        extract("URGENT: account 1234567890123 blocked, pay refund.desk@ybl, call 9876543210")
    }

    #[test]
    fn merge_accumulates_all_buckets() {
        let mut ledger = IntelligenceLedger::default();
        ledger.merge(&sample_extraction());

        assert!(ledger.bank_accounts.contains("1234567890123"));
        assert!(ledger.upi_ids.contains("refund.desk@ybl"));
        assert!(ledger.phone_numbers.contains("9876543210"));
        assert!(ledger.has_hard_artifacts());
    }

    #[test]
    fn merge_is_idempotent() {
        let extraction = sample_extraction();

        let mut once = IntelligenceLedger::default();
        once.merge(&extraction);

        let mut twice = once.clone();
        twice.merge(&extraction);

        assert_eq!(once, twice);
        assert_eq!(once.score(), twice.score());
    }

    #[test]
    fn merge_is_commutative() {
        let a = extract("pay to fraud@okaxis or call 9000000001");
        let b = extract("account 987654321099, link http://bad.example/pay");

        let mut ab = IntelligenceLedger::default();
        ab.merge(&a);
        ab.merge(&b);

        let mut ba = IntelligenceLedger::default();
        ba.merge(&b);
        ba.merge(&a);

        assert_eq!(ab, ba);
    }

    #[test]
    fn score_weights_and_variety_bonus() {
        let mut ledger = IntelligenceLedger::default();
        ledger.bank_accounts.insert("123456789012".to_string());
        ledger.upi_ids.insert("x@ybl".to_string());

        // 3.0 + 2.0, two types: no bonus.
        assert_eq!(ledger.score(), 5.0);

        ledger.phone_numbers.insert("9876543210".to_string());
        // 3.0 + 2.0 + 1.0 = 6.0, three types: 1.2x bonus.
        assert_eq!(ledger.score(), 7.2);
    }

    #[test]
    fn score_caps_keyword_contribution() {
        let mut ledger = IntelligenceLedger::default();
        for kw in ["urgent", "otp", "kyc", "blocked", "verify", "prize", "arrest"] {
            ledger.suspicious_keywords.insert(kw.to_string());
        }
        // Seven keywords, five counted.
        assert_eq!(ledger.score(), 2.5);
    }

    #[test]
    fn score_never_decreases_when_adding_artifacts() {
        let mut ledger = IntelligenceLedger::default();
        let mut previous = ledger.score();

        let additions = [
            "call 9876543210",
            "account 123456789012",
            "pay scammer@okicici",
            "visit http://phish.example/login",
            "write to boss@fraudmart.biz",
        ];
        for text in additions {
            ledger.merge(&extract(text));
            let current = ledger.score();
            assert!(
                current >= previous,
                "score regressed from {previous} to {current} after {text:?}"
            );
            previous = current;
        }
    }

    #[test]
    fn keywords_alone_are_not_hard_artifacts() {
        let mut ledger = IntelligenceLedger::default();
        ledger.merge(&extract("this is urgent, verify your kyc"));
        assert!(!ledger.has_hard_artifacts());
        assert!(ledger.total_items() > 0);
    }
}
