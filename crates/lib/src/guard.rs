//! Content guard: fixed denylist screening applied before any upstream call.

/// Terms that short-circuit the pipeline with a refusal. Substring match, not
/// word-boundary: a term inside a longer string still triggers.
const DENYLIST: &[&str] = &["政治", "政府", "领导人", "宗教", "色情", "成人"];

/// Refusal sent when a denylist term is found.
pub const REFUSAL: &str = "I can't discuss this topic. Let's learn English!";

/// Outcome of screening a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Message is clean; go on to generate a reply.
    Pass,
    /// A denylist term was found; reply with [`REFUSAL`] and never call upstream.
    Refuse,
}

/// Screen a message against the denylist. The message is lowercased before
/// matching; the terms are used as written (they are Chinese-script, so ASCII
/// case does not apply to them). First match wins.
pub fn screen(text: &str) -> Verdict {
    let lowered = text.to_lowercase();
    for term in DENYLIST {
        if lowered.contains(term) {
            return Verdict::Refuse;
        }
    }
    Verdict::Pass
}
