//! Engagement stage progression.
//!
//! A session moves through stages as the message count grows. The only
//! input besides the count is whether the ledger already holds hard
//! artifacts: mid-conversation, a session that has produced nothing
//! plays hesitant to provoke the scammer into volunteering details,
//! while a productive one leans compliant to keep them talking.

use serde::{Deserialize, Serialize};

/// Where the conversation currently sits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    BuildingTrust,
    ShowingInterest,
    ProbingDetails,
    Resistance,
    GradualCompliance,
    IntelligenceMining,
    Prolonging,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BuildingTrust => "building_trust",
            Self::ShowingInterest => "showing_interest",
            Self::ProbingDetails => "probing_details",
            Self::Resistance => "resistance",
            Self::GradualCompliance => "gradual_compliance",
            Self::IntelligenceMining => "intelligence_mining",
            Self::Prolonging => "prolonging",
        }
    }

    /// Tactical instruction folded into the synthesis prompt.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::BuildingTrust => {
                "Respond warmly but with mild confusion. Ask who is contacting you \
                 and why. Do not volunteer any personal information."
            }
            Self::ShowingInterest => {
                "Show cautious interest in what they are offering or claiming. Ask a \
                 clarifying question about how the process works."
            }
            Self::ProbingDetails => {
                "Ask for specifics you would need to comply: which account to pay, \
                 what number to call, where exactly to send money. Sound willing but \
                 slightly disorganized."
            }
            Self::Resistance => {
                "Hesitate. Mention a doubt or a practical obstacle, and make them \
                 re-explain the payment details to convince you."
            }
            Self::GradualCompliance => {
                "Appear nearly convinced. Confirm their details back with one small \
                 mistake so they correct you and repeat the information."
            }
            Self::IntelligenceMining => {
                "Extract actively: claim you lost or mistyped the payment details \
                 and ask them to send the account, ID, or number again. Ask for an \
                 alternative contact in case the first one fails."
            }
            Self::Prolonging => {
                "Stall with a believable interruption. Promise to complete the step \
                 soon and ask them to stay available."
            }
        }
    }
}

/// Map a session's inbound-message count to its engagement stage.
///
/// The compliance hold spans both mid-conversation bands: from message 7
/// through 12, a session whose ledger holds hard artifacts stays in
/// GradualCompliance, while an unproductive one escalates from hesitance
/// to active extraction.
pub fn determine_stage(message_count: u32, has_intelligence: bool) -> Stage {
    match message_count {
        0..=2 => Stage::BuildingTrust,
        3..=4 => Stage::ShowingInterest,
        5..=6 => Stage::ProbingDetails,
        7..=8 => {
            if has_intelligence {
                Stage::GradualCompliance
            } else {
                Stage::Resistance
            }
        }
        9..=12 => {
            if has_intelligence {
                Stage::GradualCompliance
            } else {
                Stage::IntelligenceMining
            }
        }
        _ => Stage::Prolonging,
    }
}
