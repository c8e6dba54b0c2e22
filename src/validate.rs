use std::collections::BTreeMap;

use crate::store::StudentDraft;

/// Programs offered by the form's picker. The picker is the only
/// thing constraining membership; validation checks length only.
pub const PROGRAMS: [&str; 10] = [
    "Informatics Engineering",
    "Information Systems",
    "Computer Engineering",
    "Computer Science",
    "Information Technology",
    "Electrical Engineering",
    "Mechanical Engineering",
    "Civil Engineering",
    "Management",
    "Accounting",
];

pub type FieldErrors = BTreeMap<&'static str, String>;

/// Field-level checks over an already-trimmed draft. The draft is
/// valid iff the returned map is empty.
pub fn validate(draft: &StudentDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if draft.id <= 0 {
        errors.insert("id", "id must be a positive number".to_string());
    }

    if draft.name.is_empty() {
        errors.insert("name", "name is required".to_string());
    } else if draft.name.chars().count() < 2 {
        errors.insert("name", "name must be at least 2 characters".to_string());
    } else if draft.name.chars().count() > 50 {
        errors.insert("name", "name must be at most 50 characters".to_string());
    }

    if draft.address.is_empty() {
        errors.insert("address", "address is required".to_string());
    } else if draft.address.chars().count() > 255 {
        errors.insert("address", "address must be at most 255 characters".to_string());
    }

    if draft.program.is_empty() {
        errors.insert("program", "program must be selected".to_string());
    } else if draft.program.chars().count() > 50 {
        errors.insert("program", "program must be at most 50 characters".to_string());
    }

    errors
}
