use chrono::Utc;
use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::query;
use crate::store::StudentDraft;
use crate::validate;

const DEFAULT_PAGE_SIZE: usize = 10;

fn parse_draft(value: &serde_json::Value) -> Result<StudentDraft, String> {
    let draft: StudentDraft = serde_json::from_value(value.clone())
        .map_err(|e| format!("invalid student payload: {}", e))?;
    Ok(draft.trimmed())
}

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let search = req
        .params
        .get("search")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let page = req.params.get("page").and_then(|v| v.as_u64()).unwrap_or(0) as usize;
    let page_size = req
        .params
        .get("pageSize")
        .and_then(|v| v.as_u64())
        .unwrap_or(DEFAULT_PAGE_SIZE as u64) as usize;

    let filtered = query::filter(store.students(), search);
    let page_rows = query::paginate(&filtered, page, page_size);

    ok(
        &req.id,
        json!({
            "students": page_rows,
            "filteredCount": filtered.len(),
            "totalCount": store.students().len(),
            "page": page,
            "pageSize": page_size
        }),
    )
}

fn handle_students_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(id) = req.params.get("id").and_then(|v| v.as_i64()) else {
        return err(&req.id, "bad_params", "missing id", None);
    };
    // Absent ids are not an error; the lookup answers with null.
    ok(&req.id, json!({ "student": store.find_by_id(id) }))
}

fn handle_students_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let draft = match parse_draft(&req.params) {
        Ok(d) => d,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };

    let errors = validate::validate(&draft);
    if !errors.is_empty() {
        return err(
            &req.id,
            "validation_failed",
            "student payload failed validation",
            Some(json!({ "fields": errors })),
        );
    }
    if store.exists_by_id(draft.id, None) {
        return err(
            &req.id,
            "duplicate_id",
            format!("student id {} is already registered", draft.id),
            None,
        );
    }

    match store.add(draft, Utc::now()) {
        Ok(student) => ok(&req.id, json!({ "student": student })),
        Err(e) => err(&req.id, "store_write_failed", e.to_string(), None),
    }
}

fn handle_students_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(id) = req.params.get("id").and_then(|v| v.as_i64()) else {
        return err(&req.id, "bad_params", "missing id", None);
    };
    let Some(patch) = req.params.get("patch") else {
        return err(&req.id, "bad_params", "missing patch", None);
    };
    let mut draft = match parse_draft(patch) {
        Ok(d) => d,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };
    if draft.id == 0 {
        // The form echoes the record's own id back; fill it in when the
        // patch leaves it out.
        draft.id = id;
    }

    let errors = validate::validate(&draft);
    if !errors.is_empty() {
        return err(
            &req.id,
            "validation_failed",
            "student payload failed validation",
            Some(json!({ "fields": errors })),
        );
    }
    // Self-exclusion: a record keeps its own id during edit. The
    // patch's id is checked for collisions but never re-keys storage.
    if store.exists_by_id(draft.id, Some(id)) {
        return err(
            &req.id,
            "duplicate_id",
            format!("student id {} is already registered", draft.id),
            None,
        );
    }

    match store.update(id, draft, Utc::now()) {
        Ok(updated) => ok(&req.id, json!({ "updated": updated })),
        Err(e) => err(&req.id, "store_write_failed", e.to_string(), None),
    }
}

fn handle_students_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(id) = req.params.get("id").and_then(|v| v.as_i64()) else {
        return err(&req.id, "bad_params", "missing id", None);
    };
    match store.delete(id) {
        Ok(removed) => ok(&req.id, json!({ "removed": removed })),
        Err(e) => err(&req.id, "store_write_failed", e.to_string(), None),
    }
}

fn handle_students_programs(req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "programs": validate::PROGRAMS }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_students_list(state, req)),
        "students.get" => Some(handle_students_get(state, req)),
        "students.create" => Some(handle_students_create(state, req)),
        "students.update" => Some(handle_students_update(state, req)),
        "students.delete" => Some(handle_students_delete(state, req)),
        "students.programs" => Some(handle_students_programs(req)),
        _ => None,
    }
}
