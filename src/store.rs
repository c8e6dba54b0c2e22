use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Single file holding the serialized student collection. The whole
/// collection is rewritten after every mutation.
pub const STORE_FILE: &str = "students.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub program: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Candidate field values as submitted by the form. Timestamps are
/// assigned by the store, never by the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub program: String,
}

impl StudentDraft {
    pub fn trimmed(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.address = self.address.trim().to_string();
        self.program = self.program.trim().to_string();
        self
    }
}

/// Owner of the authoritative in-memory collection. Identifier
/// uniqueness is the caller's job (see `exists_by_id`); the store
/// appends and rewrites without checking.
pub struct RecordStore {
    path: PathBuf,
    students: Vec<Student>,
}

impl RecordStore {
    /// Missing file means an empty collection. Unparseable content is
    /// logged and also yields an empty collection; the old bytes are
    /// overwritten on the next mutation.
    pub fn load(workspace: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(workspace)
            .with_context(|| format!("create workspace {}", workspace.display()))?;
        let path = workspace.join(STORE_FILE);
        let students = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<Student>>(&raw) {
                Ok(v) => v,
                Err(e) => {
                    log::warn!(
                        "unparseable student data in {}: {}; starting empty",
                        path.display(),
                        e
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e).context(format!("read {}", path.display())),
        };
        Ok(Self { path, students })
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn add(&mut self, draft: StudentDraft, now: DateTime<Utc>) -> anyhow::Result<Student> {
        let student = Student {
            id: draft.id,
            name: draft.name,
            address: draft.address,
            program: draft.program,
            created_at: now,
            updated_at: now,
        };
        self.students.push(student.clone());
        self.save()?;
        Ok(student)
    }

    /// Keyed by the current `id`; the draft's own `id` is not used to
    /// re-key storage. Unknown ids are a silent no-op.
    pub fn update(
        &mut self,
        id: i64,
        draft: StudentDraft,
        now: DateTime<Utc>,
    ) -> anyhow::Result<bool> {
        let Some(student) = self.students.iter_mut().find(|s| s.id == id) else {
            return Ok(false);
        };
        student.name = draft.name;
        student.address = draft.address;
        student.program = draft.program;
        student.updated_at = now;
        self.save()?;
        Ok(true)
    }

    pub fn delete(&mut self, id: i64) -> anyhow::Result<bool> {
        let Some(pos) = self.students.iter().position(|s| s.id == id) else {
            return Ok(false);
        };
        self.students.remove(pos);
        self.save()?;
        Ok(true)
    }

    pub fn find_by_id(&self, id: i64) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// True iff some record carries `id` other than the excluded one.
    /// Pass the record's own current id during edit so it keeps its id.
    pub fn exists_by_id(&self, id: i64, excluding: Option<i64>) -> bool {
        self.students
            .iter()
            .any(|s| s.id == id && Some(s.id) != excluding)
    }

    fn save(&self) -> anyhow::Result<()> {
        let raw = serde_json::to_string(&self.students)?;
        fs::write(&self.path, raw).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_workspace(prefix: &str) -> PathBuf {
        let p = std::env::temp_dir().join(format!(
            "{}-{}",
            prefix,
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));
        std::fs::create_dir_all(&p).expect("create temp dir");
        p
    }

    fn draft(id: i64, name: &str, address: &str, program: &str) -> StudentDraft {
        StudentDraft {
            id,
            name: name.to_string(),
            address: address.to_string(),
            program: program.to_string(),
        }
    }

    #[test]
    fn add_then_find_returns_payload_with_timestamps() {
        let ws = temp_workspace("rosterd-store-add");
        let mut store = RecordStore::load(&ws).expect("load");
        let now = Utc::now();
        let created = store
            .add(
                draft(101, "Alice Tan", "12 Hill Road, Arcadia", "Computer Science"),
                now,
            )
            .expect("add");
        assert_eq!(created.created_at, created.updated_at);

        let found = store.find_by_id(101).expect("present");
        assert_eq!(found, &created);
        assert_eq!(found.name, "Alice Tan");
        assert_eq!(found.program, "Computer Science");
    }

    #[test]
    fn update_preserves_id_and_created_at() {
        let ws = temp_workspace("rosterd-store-update");
        let mut store = RecordStore::load(&ws).expect("load");
        let t0 = Utc::now();
        store
            .add(draft(7, "Bob Lee", "1 Main St, Speyside", "Management"), t0)
            .expect("add");

        let t1 = t0 + Duration::seconds(5);
        let updated = store
            .update(
                7,
                draft(7, "Robert Lee", "2 Main St, Speyside", "Accounting"),
                t1,
            )
            .expect("update");
        assert!(updated);

        let s = store.find_by_id(7).expect("present");
        assert_eq!(s.id, 7);
        assert_eq!(s.created_at, t0);
        assert_eq!(s.updated_at, t1);
        assert!(s.updated_at >= s.created_at);
        assert_eq!(s.name, "Robert Lee");
        assert_eq!(s.address, "2 Main St, Speyside");
        assert_eq!(s.program, "Accounting");
    }

    #[test]
    fn update_unknown_id_is_a_silent_no_op() {
        let ws = temp_workspace("rosterd-store-update-missing");
        let mut store = RecordStore::load(&ws).expect("load");
        store
            .add(draft(1, "Cara Diaz", "9 Dock Rd, Lowtide", "Management"), Utc::now())
            .expect("add");

        let updated = store
            .update(99, draft(99, "Nobody", "Nowhere", "Accounting"), Utc::now())
            .expect("update");
        assert!(!updated);
        assert_eq!(store.students().len(), 1);
        assert_eq!(store.find_by_id(1).expect("kept").name, "Cara Diaz");
    }

    #[test]
    fn delete_removes_exactly_one_matching_record() {
        let ws = temp_workspace("rosterd-store-delete");
        let mut store = RecordStore::load(&ws).expect("load");
        let now = Utc::now();
        store
            .add(draft(1, "Dana Wu", "3 Elm St, Ferndale", "Accounting"), now)
            .expect("add");
        store
            .add(draft(2, "Eli Roy", "4 Oak St, Ferndale", "Management"), now)
            .expect("add");

        assert!(store.delete(1).expect("delete"));
        assert_eq!(store.students().len(), 1);
        assert!(store.find_by_id(1).is_none());

        // Absent ids leave the collection untouched.
        assert!(!store.delete(1).expect("delete again"));
        assert_eq!(store.students().len(), 1);
    }

    #[test]
    fn exists_by_id_supports_self_exclusion() {
        let ws = temp_workspace("rosterd-store-exists");
        let mut store = RecordStore::load(&ws).expect("load");
        store
            .add(draft(5, "Finn Ode", "8 Bay Ave, Norwich", "Management"), Utc::now())
            .expect("add");

        assert!(store.exists_by_id(5, None));
        assert!(!store.exists_by_id(5, Some(5)));
        assert!(!store.exists_by_id(6, None));
    }

    #[test]
    fn reload_round_trips_records_in_insertion_order() {
        let ws = temp_workspace("rosterd-store-roundtrip");
        let now = Utc::now();
        let originals;
        {
            let mut store = RecordStore::load(&ws).expect("load");
            store
                .add(draft(3, "Gus Ito", "5 Pine Rd, Kettle Falls", "Accounting"), now)
                .expect("add");
            store
                .add(draft(1, "Hana Sol", "6 Fir Rd, Kettle Falls", "Management"), now)
                .expect("add");
            store
                .add(draft(2, "Ivy Nash", "7 Ash Rd, Speyside", "Computer Science"), now)
                .expect("add");
            originals = store.students().to_vec();
        }

        let reloaded = RecordStore::load(&ws).expect("reload");
        assert_eq!(reloaded.students(), originals.as_slice());
        let ids: Vec<i64> = reloaded.students().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn malformed_file_falls_back_to_empty() {
        let ws = temp_workspace("rosterd-store-malformed");
        std::fs::write(ws.join(STORE_FILE), "{not json at all").expect("write junk");

        let mut store = RecordStore::load(&ws).expect("load despite junk");
        assert!(store.students().is_empty());

        // The store stays usable; the next mutation overwrites the junk.
        store
            .add(draft(1, "Jo King", "2 Low St, Arcadia", "Management"), Utc::now())
            .expect("add");
        let reloaded = RecordStore::load(&ws).expect("reload");
        assert_eq!(reloaded.students().len(), 1);
    }

    #[test]
    fn missing_file_loads_empty() {
        let ws = temp_workspace("rosterd-store-missing");
        let store = RecordStore::load(&ws).expect("load");
        assert!(store.students().is_empty());
    }
}
