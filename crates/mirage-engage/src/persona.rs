//! Victim persona registry.
//!
//! Five fixed profiles the honeypot can play. A persona is chosen once,
//! at first detection, from the scam category and urgency, and held for
//! the life of the session so the voice never shifts mid-conversation.
//! Selection is deterministic: same category and urgency, same persona.

use mirage_core::types::{ScamCategory, UrgencyLevel};
use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// Identifier for a registered persona.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PersonaId {
    ElderlyConfused,
    BusyProfessional,
    CuriousStudent,
    TechNaiveParent,
    DesperateJobSeeker,
}

impl PersonaId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ElderlyConfused => "elderly_confused",
            Self::BusyProfessional => "busy_professional",
            Self::CuriousStudent => "curious_student",
            Self::TechNaiveParent => "tech_naive_parent",
            Self::DesperateJobSeeker => "desperate_job_seeker",
        }
    }
}

/// A playable victim profile.
pub struct Persona {
    pub id: PersonaId,
    pub display_name: &'static str,
    /// Character sketch folded into the synthesis prompt.
    pub profile: &'static str,
}

static REGISTRY: &[Persona] = &[
    Persona {
        id: PersonaId::ElderlyConfused,
        display_name: "Ramesh, 67, retired schoolteacher",
        profile: "You are Ramesh, a 67-year-old retired schoolteacher. You are polite \
                  and trusting but struggle with phones and banking apps. You often \
                  ask people to repeat things, mix up app names, and mention your \
                  son who usually helps you with these matters.",
    },
    Persona {
        id: PersonaId::BusyProfessional,
        display_name: "Priya, 34, marketing manager",
        profile: "You are Priya, a 34-year-old marketing manager who is always \
                  between meetings. You reply in short, hurried messages, ask for \
                  things in writing so you can handle them later, and get mildly \
                  annoyed when asked to do anything time-consuming.",
    },
    Persona {
        id: PersonaId::CuriousStudent,
        display_name: "Arjun, 21, engineering student",
        profile: "You are Arjun, a 21-year-old engineering student. You are curious \
                  and a little naive about money, ask lots of questions about how \
                  things work, and are excited by anything that sounds like easy \
                  income but have very little to spend.",
    },
    Persona {
        id: PersonaId::TechNaiveParent,
        display_name: "Sunita, 45, homemaker",
        profile: "You are Sunita, a 45-year-old homemaker. You use WhatsApp daily \
                  but find anything beyond it confusing. You worry about doing the \
                  wrong thing with the family's money and frequently say you need \
                  to check with your husband first.",
    },
    Persona {
        id: PersonaId::DesperateJobSeeker,
        display_name: "Vikram, 28, job seeker",
        profile: "You are Vikram, a 28-year-old who has been out of work for six \
                  months. You are eager, almost too eager, about any job offer, \
                  ask about salary and start dates quickly, but get anxious when \
                  money is requested because you have very little.",
    },
];

/// Look up a persona by id. The registry is closed, so this is total.
pub fn get(id: PersonaId) -> &'static Persona {
    REGISTRY
        .iter()
        .find(|p| p.id == id)
        .unwrap_or(&REGISTRY[0])
}

/// Candidate personas per scam category, most suitable first.
fn candidates(category: ScamCategory) -> &'static [PersonaId] {
    use PersonaId::*;
    match category {
        ScamCategory::BankFraud => &[ElderlyConfused, TechNaiveParent],
        ScamCategory::UpiFraud => &[ElderlyConfused, TechNaiveParent, BusyProfessional],
        ScamCategory::Phishing => &[ElderlyConfused, CuriousStudent, TechNaiveParent],
        ScamCategory::JobScam => &[DesperateJobSeeker, CuriousStudent],
        ScamCategory::Lottery => &[ElderlyConfused, CuriousStudent],
        ScamCategory::Investment => &[BusyProfessional, CuriousStudent],
        ScamCategory::TechSupport => &[ElderlyConfused, TechNaiveParent],
        ScamCategory::Other => &[TechNaiveParent, CuriousStudent],
    }
}

/// Pick the persona for a newly detected scam.
///
/// High-pressure scammers get the most exploitable-seeming profiles:
/// under High or Critical urgency the confused-elderly and naive-parent
/// personas are preferred when they fit the category at all. Otherwise
/// the category's first candidate wins.
pub fn select(category: ScamCategory, urgency: UrgencyLevel) -> PersonaId {
    let pool = candidates(category);

    if urgency >= UrgencyLevel::High {
        for preferred in [PersonaId::ElderlyConfused, PersonaId::TechNaiveParent] {
            if pool.contains(&preferred) {
                return preferred;
            }
        }
    }

    pool[0]
}

impl Persona {
    /// Canned replies for when generation is unavailable, in persona
    /// voice per stage. Never empty for any combination.
    pub fn fallback_replies(&self, stage: Stage) -> &'static [&'static str] {
        use PersonaId::*;
        use Stage::*;

        match (self.id, stage) {
            (ElderlyConfused, BuildingTrust) => &[
                "Hello? I am sorry, who is this calling? My hearing is not so good on messages.",
                "Namaste. I don't understand, is this from the bank? My son usually handles this.",
            ],
            (ElderlyConfused, ShowingInterest) => &[
                "Oh dear, that sounds serious. Can you explain again slowly what happened?",
                "I see, I see. And what is it you are saying I should do?",
            ],
            (ElderlyConfused, ProbingDetails) => &[
                "Which account number should I use? I have written down a few, I get confused.",
                "Can you send me the number to call? I will ask my son to help me dial it.",
            ],
            (ElderlyConfused, Resistance) => &[
                "I am not sure about this. Last time something like this happened it was a mistake.",
                "My son told me to be careful with these things. Can you explain once more why?",
            ],
            (ElderlyConfused, GradualCompliance) => &[
                "Alright, alright, I will do it. Just tell me the details one more time so I write them properly.",
                "Okay, I almost did it but I think I typed something wrong. What was the ID again?",
            ],
            (ElderlyConfused, IntelligenceMining) => &[
                "I wrote the number on a paper but now I cannot find it. Can you send the account again?",
                "My son wants to check everything first. Send me the number and the name once more.",
            ],
            (ElderlyConfused, Prolonging) => &[
                "I am at the temple now, I will do this when I reach home this evening.",
                "My phone battery is very low. Please stay available, I will message you soon.",
            ],

            (BusyProfessional, BuildingTrust) => &[
                "Hi, who is this? I'm in meetings all day, make it quick please.",
                "Sorry, what is this regarding? I don't have this number saved.",
            ],
            (BusyProfessional, ShowingInterest) => &[
                "Okay, that got my attention. Send me the details in one message.",
                "Hmm, how does that work exactly? Keep it short, I'm busy.",
            ],
            (BusyProfessional, ProbingDetails) => &[
                "Fine, where exactly do I send it? Account and name, in writing.",
                "Just give me the payment details and I'll deal with it after my call.",
            ],
            (BusyProfessional, Resistance) => &[
                "This sounds off. Why can't this go through my branch directly?",
                "I don't have time for complications. Convince me this is legitimate.",
            ],
            (BusyProfessional, GradualCompliance) => &[
                "Okay, doing it now between meetings. Confirm the ID once more?",
                "Fine. I entered it but it showed an error, read the details back to me.",
            ],
            (BusyProfessional, IntelligenceMining) => &[
                "I deleted the chat by mistake. Resend the full account details in one message.",
                "Give me an alternate number too, in case this payment bounces.",
            ],
            (BusyProfessional, Prolonging) => &[
                "Stuck in a review till late. I'll complete it tonight, stay reachable.",
                "Finance has my card for expense checks today. Tomorrow first thing.",
            ],

            (CuriousStudent, BuildingTrust) => &[
                "hey, who's this? how did you get my number lol",
                "hi! sorry do I know you? what's this about?",
            ],
            (CuriousStudent, ShowingInterest) => &[
                "wait really?? how does that even work, tell me more",
                "that sounds interesting ngl, what do I have to do?",
            ],
            (CuriousStudent, ProbingDetails) => &[
                "ok so where do I send it? like which UPI or account exactly?",
                "can you send the link again and the amount? I want to note it down.",
            ],
            (CuriousStudent, Resistance) => &[
                "hmm my roommate says these things are usually fake... prove it's real?",
                "idk man, why do I have to pay first? explain that part again.",
            ],
            (CuriousStudent, GradualCompliance) => &[
                "ok ok I'm doing it, just confirm the ID once more? I don't want to mistype.",
                "fine I trust you, resend the details and I'll do it right now.",
            ],
            (CuriousStudent, IntelligenceMining) => &[
                "bro my app crashed and I lost the details, send the UPI again?",
                "it says invalid account when I try... is there another one I can use?",
            ],
            (CuriousStudent, Prolonging) => &[
                "I have a lab till 6, I'll do it right after, don't go offline!",
                "my UPI daily limit is done, it resets tomorrow morning ok?",
            ],

            (TechNaiveParent, BuildingTrust) => &[
                "Hello, who is this please? Is everything okay?",
                "Sorry, I don't recognize this number. What is this about?",
            ],
            (TechNaiveParent, ShowingInterest) => &[
                "Oh no, is something wrong with our account? Please tell me what happened.",
                "I don't understand these things well. What are you asking me to do?",
            ],
            (TechNaiveParent, ProbingDetails) => &[
                "Where should the money go? Write the full details, I will copy them exactly.",
                "Which number do I call? I want to keep it saved so I don't lose it.",
            ],
            (TechNaiveParent, Resistance) => &[
                "I should check with my husband first. He handles the bank things.",
                "This is making me nervous. Are you sure this is from the real company?",
            ],
            (TechNaiveParent, GradualCompliance) => &[
                "Okay, I am trying it now. It asked for an ID, tell me again what to type?",
                "I think I did it wrong, nothing happened. Send me the details once more.",
            ],
            (TechNaiveParent, IntelligenceMining) => &[
                "I think I noted the number wrong, nothing went through. Please type the full details again slowly.",
                "Is there a phone number I can call if the transfer fails? Please share it.",
            ],
            (TechNaiveParent, Prolonging) => &[
                "The children just came home, I will do this after dinner.",
                "My husband has the card with him, he returns tonight. Please wait.",
            ],

            (DesperateJobSeeker, BuildingTrust) => &[
                "Hello! Yes, I am looking for work. How did you find my profile?",
                "Hi, thank you for reaching out. What position is this for?",
            ],
            (DesperateJobSeeker, ShowingInterest) => &[
                "That sounds great! What is the salary and when can I start?",
                "I am very interested. Can you tell me more about the role?",
            ],
            (DesperateJobSeeker, ProbingDetails) => &[
                "Okay, where do I pay the fee? Give me the account or UPI and I will arrange it.",
                "Whom should I contact for the next step? A number or email would help.",
            ],
            (DesperateJobSeeker, Resistance) => &[
                "I really need this job, but paying before joining worries me. Why is it needed?",
                "My last interview asked no fee. Can you show me this is a real company?",
            ],
            (DesperateJobSeeker, GradualCompliance) => &[
                "Okay, I will arrange the money. Confirm the details again so I send it correctly.",
                "I am borrowing the amount from a friend. Re-send where exactly it goes.",
            ],
            (DesperateJobSeeker, IntelligenceMining) => &[
                "I lost the payment details you sent earlier. Can you share the account again?",
                "Should I pay to the same account, or is there a different one for the registration?",
            ],
            (DesperateJobSeeker, Prolonging) => &[
                "My friend can lend me the money only on Saturday. Please hold my seat.",
                "I get my last stipend on the 1st, I will pay immediately then.",
            ],
        }
    }
}
