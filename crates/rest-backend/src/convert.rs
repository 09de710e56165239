//! Normalization of backend payloads into useradmin-core types

use serde_json::Value;
use useradmin_core::{UserId, UserPage, UserRecord, UserStatus};

use crate::models::BackendUserRaw;

/// Envelope keys that may hold the row list, in lookup order
pub const ROW_KEYS: [&str; 3] = ["data", "items", "users"];

/// JSON pointers that may hold the total count, in lookup order
pub const TOTAL_POINTERS: [&str; 3] = ["/total", "/count", "/meta/total"];

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn to_user_id(value: &Value) -> Option<UserId> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(UserId::Num)
            .or_else(|| n.as_u64().map(|u| UserId::Text(u.to_string()))),
        Value::String(s) => Some(UserId::Text(s.clone())),
        _ => None,
    }
}

/// Interpret a status value: strings compare case-insensitively to
/// `"active"`, booleans map `true` to active, anything else is inactive.
fn to_status(value: Option<&Value>) -> UserStatus {
    match value {
        Some(Value::String(s)) if s.eq_ignore_ascii_case("active") => UserStatus::Active,
        Some(Value::Bool(true)) => UserStatus::Active,
        _ => UserStatus::Inactive,
    }
}

/// Convert a raw row into a canonical record.
///
/// Returns `None` when no usable id is present; such rows cannot be edited,
/// toggled or deleted, so they are left out of the list.
pub fn raw_user_to_core(raw: &BackendUserRaw) -> Option<UserRecord> {
    let id = raw
        .id_candidates()
        .into_iter()
        .find_map(|v| present(v).and_then(to_user_id))?;

    let username = raw
        .username_candidates()
        .into_iter()
        .find_map(|v| present(v).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();

    let status = to_status(raw.status_candidates().into_iter().find_map(present));

    Some(UserRecord {
        id,
        username,
        status,
    })
}

/// Normalize one untrusted JSON row, logging and skipping rejects
pub fn normalize_user(row: &Value) -> Option<UserRecord> {
    let raw: BackendUserRaw = match serde_json::from_value(row.clone()) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, "skipping user row that is not an object");
            return None;
        }
    };

    let user = raw_user_to_core(&raw);
    if user.is_none() {
        tracing::warn!(row = %row, "skipping user row without id, userId or _id");
    }
    user
}

/// Locate the row array: a bare array body, or the first present envelope key
pub fn extract_rows(body: &Value) -> &[Value] {
    if let Value::Array(rows) = body {
        return rows;
    }

    ROW_KEYS
        .iter()
        .find_map(|key| present(body.get(key)))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Coerce a total value the way a lenient numeric cast would: numbers and
/// numeric strings count, everything unparseable is zero.
fn to_total(value: &Value) -> u64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if n.is_finite() && n > 0.0 {
        n as u64
    } else {
        0
    }
}

/// The first present total, if the backend reported one
pub fn extract_total(body: &Value) -> Option<u64> {
    if body.is_array() {
        return None;
    }
    TOTAL_POINTERS
        .iter()
        .find_map(|pointer| present(body.pointer(pointer)))
        .map(to_total)
}

/// Build a page from a list response body
pub fn list_response_to_page(body: &Value) -> UserPage {
    let users: Vec<UserRecord> = extract_rows(body).iter().filter_map(normalize_user).collect();
    let total = extract_total(body).unwrap_or(users.len() as u64);
    UserPage { users, total }
}

/// Best-effort parse of a single-user response (`{...}` or `{data: {...}}`)
pub fn single_user_response(body: &Value) -> Option<UserRecord> {
    let row = match present(body.get("data")) {
        Some(inner) if inner.is_object() => inner,
        _ => body,
    };
    let raw: BackendUserRaw = serde_json::from_value(row.clone()).ok()?;
    raw_user_to_core(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(row: Value) -> Option<UserRecord> {
        normalize_user(&row)
    }

    #[test]
    fn active_flag_without_status_is_active() {
        let user = normalize(json!({"id": 1, "username": "a", "active": true})).unwrap();
        assert_eq!(user.status, UserStatus::Active);
    }

    #[test]
    fn status_string_is_case_insensitive() {
        let user = normalize(json!({"id": 1, "status": "ACTIVE"})).unwrap();
        assert_eq!(user.status, UserStatus::Active);

        let user = normalize(json!({"id": 1, "status": "Disabled"})).unwrap();
        assert_eq!(user.status, UserStatus::Inactive);
    }

    #[test]
    fn missing_status_fields_default_to_inactive() {
        let user = normalize(json!({"id": 1, "username": "a"})).unwrap();
        assert_eq!(user.status, UserStatus::Inactive);
    }

    #[test]
    fn status_string_wins_over_active_flag() {
        let user = normalize(json!({"id": 1, "status": "inactive", "active": true})).unwrap();
        assert_eq!(user.status, UserStatus::Inactive);
    }

    #[test]
    fn null_status_falls_back_to_active_flag() {
        let user = normalize(json!({"id": 1, "status": null, "active": true})).unwrap();
        assert_eq!(user.status, UserStatus::Active);
    }

    #[test]
    fn non_string_status_is_inactive() {
        let user = normalize(json!({"id": 1, "status": 1, "active": true})).unwrap();
        assert_eq!(user.status, UserStatus::Inactive);
    }

    #[test]
    fn string_ids_match_the_typed_id() {
        let backend = normalize(json!({"id": "42", "username": "dora"})).unwrap().id;
        assert!(backend.same_as(&UserId::parse("42")));

        let padded = normalize(json!({"id": "007"})).unwrap().id;
        assert_eq!(padded, UserId::parse("007"));
        assert_eq!(UserId::parse("007").to_string(), "007");
    }

    #[test]
    fn ids_above_i64_range_are_kept() {
        let user = normalize(json!({"id": 18446744073709551615u64, "_id": "fallback"})).unwrap();
        assert_eq!(user.id, UserId::Text("18446744073709551615".to_string()));
    }

    #[test]
    fn id_falls_back_in_order() {
        assert_eq!(
            normalize(json!({"id": 1, "userId": 2, "_id": "x"})).unwrap().id,
            UserId::Num(1)
        );
        assert_eq!(
            normalize(json!({"userId": 2, "_id": "x"})).unwrap().id,
            UserId::Num(2)
        );
        assert_eq!(
            normalize(json!({"id": null, "_id": "65a1"})).unwrap().id,
            UserId::Text("65a1".to_string())
        );
    }

    #[test]
    fn username_falls_back_in_order() {
        let user = normalize(json!({"id": 1, "name": "Alice", "email": "a@x.io"})).unwrap();
        assert_eq!(user.username, "Alice");

        let user = normalize(json!({"id": 1, "email": "a@x.io"})).unwrap();
        assert_eq!(user.username, "a@x.io");

        let user = normalize(json!({"id": 1})).unwrap();
        assert_eq!(user.username, "");
    }

    #[test]
    fn row_without_id_is_skipped() {
        assert_eq!(normalize(json!({"username": "ghost"})), None);
        assert_eq!(normalize(json!("not an object")), None);
    }

    #[test]
    fn malformed_fields_still_yield_a_record() {
        let user = normalize(json!({"id": 4, "username": 12, "status": {"x": 1}})).unwrap();
        assert_eq!(user.username, "");
        assert_eq!(user.status, UserStatus::Inactive);
    }

    #[test]
    fn rows_come_from_first_present_envelope_key() {
        let body = json!({"items": [{"id": 1}], "users": [{"id": 2}, {"id": 3}]});
        assert_eq!(extract_rows(&body).len(), 1);

        let body = json!({"data": null, "users": [{"id": 2}, {"id": 3}]});
        assert_eq!(extract_rows(&body).len(), 2);

        let body = json!([{"id": 1}]);
        assert_eq!(extract_rows(&body).len(), 1);

        let body = json!({"data": "nope", "users": [{"id": 2}]});
        assert!(extract_rows(&body).is_empty());
    }

    #[test]
    fn total_comes_from_first_present_key() {
        assert_eq!(extract_total(&json!({"total": 40, "count": 2})), Some(40));
        assert_eq!(extract_total(&json!({"count": "17"})), Some(17));
        assert_eq!(extract_total(&json!({"meta": {"total": 9}})), Some(9));
        assert_eq!(extract_total(&json!({"total": "many"})), Some(0));
        assert_eq!(extract_total(&json!({"data": []})), None);
    }

    #[test]
    fn total_falls_back_to_normalized_length() {
        let body = json!({"data": [{"id": 1}, {"id": 2}, {"username": "no id"}]});
        let page = list_response_to_page(&body);
        assert_eq!(page.users.len(), 2);
        assert_eq!(page.total, 2);
    }

    #[test]
    fn single_user_accepts_data_wrapper() {
        let user = single_user_response(&json!({"data": {"_id": "u1", "name": "Ann"}})).unwrap();
        assert_eq!(user.id, UserId::Text("u1".to_string()));
        assert_eq!(user.username, "Ann");

        assert!(single_user_response(&json!({"ok": true})).is_none());
    }
}
