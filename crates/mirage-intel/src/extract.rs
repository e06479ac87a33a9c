//! Pattern-based artifact extraction.
//!
//! Pure and infallible: any input, including garbage, yields a fully
//! populated [`ExtractionResult`]. Patterns are applied independently,
//! with two precision rules layered on top:
//! - payment handles whose provider matches a general email service are
//!   dropped from the UPI bucket (they are ordinary email addresses)
//! - 10-digit runs shaped like mobile numbers are removed from the
//!   bank-account bucket (phone shape wins on overlap)

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ExtractionResult;

/// Scam-indicator vocabulary checked against every message.
const SCAM_KEYWORDS: &[&str] = &[
    "urgent",
    "immediately",
    "verify",
    "blocked",
    "suspended",
    "expired",
    "prize",
    "won",
    "winner",
    "claim",
    "free",
    "gift",
    "offer",
    "account",
    "bank",
    "upi",
    "payment",
    "transfer",
    "send money",
    "otp",
    "password",
    "pin",
    "cvv",
    "confirm",
    "update",
    "kyc",
    "legal action",
    "police",
    "arrest",
    "penalty",
    "fine",
];

/// Providers whose handles are ordinary email, not payment IDs.
const EMAIL_PROVIDERS: &[&str] = &["gmail", "yahoo", "hotmail", "outlook", "email", "mail"];

/// Keywords recorded per message are capped to keep the ledger lean.
const MAX_KEYWORDS_PER_MESSAGE: usize = 5;

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\+91[\s-]?)?[6-9][0-9]{9}").expect("phone regex"));

static UPI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._-]+@[A-Za-z]{2,}").expect("upi regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("email regex")
});

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("url regex"));

static ACCOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{9,18}").expect("account regex"));

static IFSC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{4}0[A-Z0-9]{6}\b").expect("ifsc regex"));

/// Extract all artifacts from a single message.
pub fn extract(text: &str) -> ExtractionResult {
    let mut result = ExtractionResult::default();

    extract_phones(text, &mut result);
    extract_upi_ids(text, &mut result);
    extract_emails(text, &mut result);
    extract_urls(text, &mut result);
    extract_accounts(text, &mut result);
    extract_keywords(text, &mut result);

    if !result.is_empty() {
        tracing::debug!(artifacts = result.len(), "Extraction hit");
    }

    result
}

/// True when the match at `[start, end)` is a maximal digit run, i.e.
/// not embedded inside a longer number.
fn digit_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !matches!(before, Some(c) if c.is_ascii_digit()) && !matches!(after, Some(c) if c.is_ascii_digit())
}

/// Mobile shape: exactly 10 digits with a leading 6-9.
fn is_phone_shaped(digits: &str) -> bool {
    digits.len() == 10 && digits.starts_with(['6', '7', '8', '9'])
}

fn extract_phones(text: &str, result: &mut ExtractionResult) {
    for m in PHONE_RE.find_iter(text) {
        if !digit_bounded(text, m.start(), m.end()) {
            continue;
        }

        // Normalize to the bare 10-digit form: drop separators and the
        // country-code prefix.
        let digits: String = m.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
        let normalized = if digits.len() == 12 && digits.starts_with("91") {
            digits[2..].to_string()
        } else {
            digits
        };

        if is_phone_shaped(&normalized) {
            result.phone_numbers.insert(normalized);
        }
    }
}

fn extract_upi_ids(text: &str, result: &mut ExtractionResult) {
    for m in UPI_RE.find_iter(text) {
        let token = m.as_str();
        let handle = match token.rsplit_once('@') {
            Some((_, h)) => h.to_lowercase(),
            None => continue,
        };

        // General-purpose email providers are not payment rails.
        if EMAIL_PROVIDERS.iter().any(|p| handle.contains(p)) {
            continue;
        }

        result.upi_ids.insert(token.to_string());
    }
}

fn extract_emails(text: &str, result: &mut ExtractionResult) {
    for m in EMAIL_RE.find_iter(text) {
        result.email_addresses.insert(m.as_str().to_string());
    }
}

fn extract_urls(text: &str, result: &mut ExtractionResult) {
    for m in URL_RE.find_iter(text) {
        result.phishing_links.insert(m.as_str().to_string());
    }
}

fn extract_accounts(text: &str, result: &mut ExtractionResult) {
    for m in ACCOUNT_RE.find_iter(text) {
        if !digit_bounded(text, m.start(), m.end()) {
            continue;
        }

        let digits = m.as_str();
        // Phone shape wins: a 10-digit mobile number is never an account.
        if is_phone_shaped(digits) {
            continue;
        }

        result.bank_accounts.insert(digits.to_string());
    }

    // IFSC codes ride along in the bank bucket.
    for m in IFSC_RE.find_iter(text) {
        result.bank_accounts.insert(m.as_str().to_string());
    }
}

fn extract_keywords(text: &str, result: &mut ExtractionResult) {
    let lower = text.to_lowercase();
    for kw in SCAM_KEYWORDS {
        if result.suspicious_keywords.len() >= MAX_KEYWORDS_PER_MESSAGE {
            break;
        }
        if lower.contains(kw) {
            result.suspicious_keywords.insert((*kw).to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_all_artifact_types_from_mixed_message() {
        let result = extract(
            "URGENT: your account 1234567890123 will be blocked, \
             pay refund.desk@ybl now, call 9876543210",
        );

        assert_eq!(
            result.bank_accounts.iter().collect::<Vec<_>>(),
            vec!["1234567890123"]
        );
        assert_eq!(result.upi_ids.iter().collect::<Vec<_>>(), vec!["refund.desk@ybl"]);
        assert_eq!(
            result.phone_numbers.iter().collect::<Vec<_>>(),
            vec!["9876543210"]
        );
        assert!(result.suspicious_keywords.contains("urgent"));
        assert!(result.suspicious_keywords.contains("blocked"));
    }

    #[test]
    fn phone_number_not_classified_as_bank_account() {
        let result = extract("call me at 9876543210");
        assert!(result.phone_numbers.contains("9876543210"));
        assert!(result.bank_accounts.is_empty());
    }

    #[test]
    fn country_code_prefix_normalized() {
        let result = extract("reach us on +91 9876543210 or +919123456780");
        assert!(result.phone_numbers.contains("9876543210"));
        assert!(result.phone_numbers.contains("9123456780"));
        assert_eq!(result.phone_numbers.len(), 2);
    }

    #[test]
    fn phone_embedded_in_longer_run_not_matched() {
        // 13 digits: an account number, not a phone with trailing noise.
        let result = extract("account 9876543210123 here");
        assert!(result.phone_numbers.is_empty());
        assert!(result.bank_accounts.contains("9876543210123"));
    }

    #[test]
    fn email_provider_handles_excluded_from_upi() {
        let result = extract("contact support.team@gmail.com or pay victim@okhdfc");
        assert!(result.upi_ids.contains("victim@okhdfc"));
        assert!(!result.upi_ids.iter().any(|u| u.contains("gmail")));
        // The email itself is still captured in its own bucket.
        assert!(result.email_addresses.contains("support.team@gmail.com"));
    }

    #[test]
    fn urls_stop_at_whitespace_and_quotes() {
        let result = extract(r#"click http://scam.example/verify?id=12 "now" or https://bad.link/a"#);
        assert!(result.phishing_links.contains("http://scam.example/verify?id=12"));
        assert!(result.phishing_links.contains("https://bad.link/a"));
        assert_eq!(result.phishing_links.len(), 2);
    }

    #[test]
    fn ifsc_code_lands_in_bank_bucket() {
        let result = extract("transfer to 123456789012, IFSC SBIN0001234");
        assert!(result.bank_accounts.contains("SBIN0001234"));
        assert!(result.bank_accounts.contains("123456789012"));
    }

    #[test]
    fn keywords_capped_per_message() {
        let result = extract(
            "urgent! verify your blocked account immediately, pay the penalty \
             fine or face arrest and legal action from police, otp expired",
        );
        assert_eq!(result.suspicious_keywords.len(), 5);
    }

    #[test]
    fn duplicate_artifacts_deduplicated_within_one_call() {
        let result = extract("pay fraud@ybl, I said fraud@ybl, to 9876543210 or 9876543210");
        assert_eq!(result.upi_ids.len(), 1);
        assert_eq!(result.phone_numbers.len(), 1);
    }

    #[test]
    fn garbage_input_yields_empty_result() {
        let result = extract("\u{0000}\u{FFFD} ---- @@@@ 123");
        assert!(result.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_result() {
        assert!(extract("").is_empty());
    }
}
