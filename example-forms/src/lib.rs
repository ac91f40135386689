pub mod answers;
pub mod onboarding;
pub mod people;
pub mod peer_review;

// Re-export people
pub use people::{ENGINEERING, ana, bruno, caio, dora, engineering};

// Re-export forms
pub use onboarding::{ONBOARDING_ID, onboarding};
pub use peer_review::{PEER_REVIEW_ID, peer_review, peer_review_v2};

// Re-export answers
pub use answers::{PENDING_ANSWER_ID, demo_api, peer_review_answers};
