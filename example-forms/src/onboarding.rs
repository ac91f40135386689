use form_answer::{Form, Question};

pub const ONBOARDING_ID: i64 = 20;

/// Feedback on the first weeks at the company.
pub fn onboarding() -> Form {
    Form::new(
        ONBOARDING_ID,
        "Onboarding feedback",
        vec![
            Question::single_choice(
                201,
                "How ready did you feel after your first week?",
                ["Very ready", "Somewhat ready", "Not ready"],
            ),
            Question::multiple_choice(
                202,
                "Which resources helped you most?",
                ["Buddy", "Documentation", "Pairing sessions"],
            ),
            Question::long_text(203, "What would you change about onboarding?"),
        ],
    )
    .with_category("Feedback")
}
