use form_answer::{Form, Question};

use crate::people::engineering;

pub const PEER_REVIEW_ID: i64 = 10;

/// Quarterly peer review. Every question kind, a five-way multiple choice included.
pub fn peer_review() -> Form {
    Form::new(
        PEER_REVIEW_ID,
        "Quarterly peer review",
        vec![
            Question::long_text(101, "What did this colleague do especially well?"),
            Question::single_choice(
                102,
                "How would you rate their collaboration?",
                ["Excellent", "Good", "Fair", "Poor"],
            ),
            Question::multiple_choice(
                103,
                "Which strengths stood out?",
                [
                    "Communication",
                    "Technical depth",
                    "Ownership",
                    "Mentoring",
                    "Delivery",
                ],
            ),
            Question::long_text(104, "What should they focus on next quarter?"),
        ],
    )
    .with_category("Evaluation")
    .with_description("Answers are shared with the colleague's manager.")
    .with_team(engineering())
}

/// The next revision of the review: one question dropped, one added.
pub fn peer_review_v2() -> Form {
    let mut form = peer_review();
    form.id = (PEER_REVIEW_ID + 1).into();
    form.name = "Quarterly peer review (v2)".to_string();
    form.questions.retain(|q| q.id.0 != 104);
    form.questions.push(Question::single_choice(
        105,
        "Would you like to work with them again?",
        ["Yes", "No"],
    ));
    form
}
