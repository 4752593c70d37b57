//! Duck-typed normalization of collection responses.
//!
//! The backend's serialization is inconsistent across endpoints: a
//! collection listing may be a bare array of ids, an array of objects
//! carrying an id field, or an array of wrappers nesting a full wine
//! record. This module is the single place that tolerance lives; the rest
//! of the crate only ever sees `Vec<WineId>`.

use serde_json::Value;

use crate::domain::WineId;

/// Extract member ids from a collection response body, in server order.
///
/// Per element, the first matching shape wins:
/// 1. a bare string or number id,
/// 2. an object with `id`, `wineId`, or `_id`,
/// 3. an object nesting `wine.id` or `wine._id`.
///
/// Elements matching none of these are dropped. A non-array body yields
/// an empty result rather than an error, keeping reads resilient to
/// backend inconsistencies.
#[must_use]
pub fn member_ids(body: &Value) -> Vec<WineId> {
    let Some(items) = body.as_array() else {
        return Vec::new();
    };

    items.iter().filter_map(element_id).collect()
}

fn element_id(item: &Value) -> Option<WineId> {
    match item {
        Value::String(s) => Some(WineId::new(s.clone())),
        Value::Number(n) => Some(WineId::new(n.to_string())),
        Value::Object(object) => {
            // Wrapper shape takes precedence: a `{wine: {...}, id: ...}`
            // row's own id is the junction row, not the wine.
            if let Some(wine) = object.get("wine") {
                if let Some(id) = scalar_id(wine.get("id").or_else(|| wine.get("_id"))) {
                    return Some(id);
                }
            }
            scalar_id(
                object
                    .get("id")
                    .or_else(|| object.get("wineId"))
                    .or_else(|| object.get("_id")),
            )
        }
        _ => None,
    }
}

fn scalar_id(value: Option<&Value>) -> Option<WineId> {
    match value? {
        Value::String(s) => Some(WineId::new(s.clone())),
        Value::Number(n) => Some(WineId::new(n.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(body: Value) -> Vec<String> {
        member_ids(&body)
            .into_iter()
            .map(|id| id.as_str().to_string())
            .collect()
    }

    #[test]
    fn bare_id_array() {
        assert_eq!(ids(json!(["a", "b", 3])), vec!["a", "b", "3"]);
    }

    #[test]
    fn object_array_with_id_variants() {
        let body = json!([
            { "id": "a" },
            { "wineId": 2 },
            { "_id": "c" },
        ]);
        assert_eq!(ids(body), vec!["a", "2", "c"]);
    }

    #[test]
    fn wrapper_array_nesting_wine() {
        let body = json!([
            { "wine": { "id": 7, "name": "Malbec" } },
            { "wine": { "_id": "w-8" } },
        ]);
        assert_eq!(ids(body), vec!["7", "w-8"]);
    }

    #[test]
    fn wrapper_wine_id_beats_row_id() {
        let body = json!([{ "id": "row-1", "wine": { "id": "w-1" } }]);
        assert_eq!(ids(body), vec!["w-1"]);
    }

    #[test]
    fn mixed_shapes_in_one_array() {
        let body = json!(["a", { "id": "b" }, { "wine": { "id": "c" } }, null, true]);
        assert_eq!(ids(body), vec!["a", "b", "c"]);
    }

    #[test]
    fn non_array_yields_empty() {
        assert!(ids(json!({ "message": "oops" })).is_empty());
        assert!(ids(json!("plain text")).is_empty());
        assert!(ids(json!(null)).is_empty());
    }

    #[test]
    fn unmatchable_elements_are_dropped() {
        let body = json!([{ "wine": {} }, { "foo": 1 }, []]);
        assert!(ids(body).is_empty());
    }
}
