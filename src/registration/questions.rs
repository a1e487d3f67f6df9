//! Security questions offered on the recovery page.

use super::model::{RecoverySlot, RegistrationRecord};

/// The fixed question list, in display order.
pub const QUESTION_OPTIONS: [&str; 5] = [
    "What was the name of your first pet?",
    "What is your mother's maiden name?",
    "What was the name of your first school?",
    "What was your favorite food as a child?",
    "What city were you born in?",
];

/// Questions selectable for `slot`: every option except the one currently
/// chosen in the other slot. Recomputed from the record on each call.
pub fn available_questions(record: &RegistrationRecord, slot: RecoverySlot) -> Vec<&'static str> {
    let taken = record.recovery(slot.other()).question.as_str();
    QUESTION_OPTIONS
        .iter()
        .copied()
        .filter(|q| *q != taken)
        .collect()
}
