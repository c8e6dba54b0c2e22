use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::store::Student;

/// Dashboard counts, recomputed from the full collection on demand.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_students: usize,
    pub distinct_programs: usize,
    pub recent_students: usize,
    pub distinct_localities: usize,
}

/// City/region heuristic: the part of the address before the first
/// comma, trimmed. Not validated; commaless addresses count whole.
pub fn locality(address: &str) -> &str {
    address.split(',').next().unwrap_or(address).trim()
}

pub fn summarize(students: &[Student], now: DateTime<Utc>) -> Summary {
    let week_ago = now - Duration::days(7);
    let programs: HashSet<&str> = students.iter().map(|s| s.program.as_str()).collect();
    let localities: HashSet<&str> = students.iter().map(|s| locality(&s.address)).collect();
    Summary {
        total_students: students.len(),
        distinct_programs: programs.len(),
        // Strictly inside the trailing window: createdAt exactly seven
        // days ago does not count.
        recent_students: students.iter().filter(|s| s.created_at > week_ago).count(),
        distinct_localities: localities.len(),
    }
}
