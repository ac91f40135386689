use chrono::{TimeZone, Utc};
use form_answer::{MemoryApi, PersistedAnswer};

use crate::{ana, bruno, caio, dora, onboarding, peer_review, peer_review_v2};

/// The answer left open for the demo user to fill in.
pub const PENDING_ANSWER_ID: i64 = 1000;

/// Peer reviews written by Ana about her team, in every state the viewer handles.
pub fn peer_review_answers() -> Vec<PersistedAnswer> {
    let at = |day| Utc.with_ymd_and_hms(2024, 4, day, 14, 30, 0).single();

    let mut answers = vec![
        PersistedAnswer::unanswered(1001, peer_review(), ana())
            .evaluating(bruno())
            .answered_with(
                r#"{"101":"Led the billing migration without downtime.","102":"Excellent","103":["Technical depth","Ownership","Delivery"],"104":"Share more context in design reviews."}"#,
            ),
        PersistedAnswer::unanswered(1002, peer_review(), ana())
            .evaluating(caio())
            .answered_with(
                r#"{"101":"Patient mentor for the new hires.","102":"Good","103":["Communication","Mentoring"],"104":"Take on a larger project."}"#,
            ),
        // Stored before the alternatives were renamed; the grade no longer decodes.
        PersistedAnswer::unanswered(1003, peer_review(), ana())
            .evaluating(dora())
            .answered_with(
                r#"{"101":"Reliable on call.","102":"Outstanding","103":["Ownership"],"104":"Write more docs."}"#,
            ),
        PersistedAnswer::unanswered(1004, peer_review_v2(), ana())
            .evaluating(bruno())
            .answered_with(
                r#"{"101":"Great follow-through.","102":"Good","103":["Communication","Technical depth","Ownership","Mentoring","Delivery"],"105":"Yes"}"#,
            ),
        PersistedAnswer::unanswered(1005, peer_review(), ana()).evaluating(dora()),
    ];
    for (answer, day) in answers.iter_mut().zip([3, 5, 8, 22]) {
        answer.updated_at = at(day);
    }
    answers
}

/// An in-memory backend seeded with every sample form and answer.
pub fn demo_api() -> MemoryApi {
    let api = peer_review_answers()
        .into_iter()
        .fold(MemoryApi::new(), MemoryApi::with_answer);
    api.with_form(onboarding())
        .with_answer(PersistedAnswer::unanswered(PENDING_ANSWER_ID, onboarding(), bruno()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_answer::{Replay, codec};

    #[test]
    fn committed_samples_decode() {
        for answer in peer_review_answers().iter().filter(|a| a.user_has_answered) {
            let decoded = codec::decode_answer(answer);
            if answer.id.0 == 1003 {
                assert_eq!(decoded.issues.len(), 1);
            } else {
                assert!(decoded.is_clean(), "answer {} should decode", answer.id);
                assert!(form_answer::validation::is_complete(&answer.form, &decoded.draft));
            }
        }
    }

    #[test]
    fn pending_review_replays_empty() {
        let answers = peer_review_answers();
        let pending = answers.iter().find(|a| !a.user_has_answered).unwrap();
        assert!(Replay::new(pending).items().iter().all(|i| !i.is_answered()));
    }
}
