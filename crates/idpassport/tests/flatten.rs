//! Flattening properties over decoded ID token payloads

use idpassport::*;
use serde_json::{Value, json};

fn claims(value: &Value) -> ClaimsObject {
    ClaimsObject::from_json(&value.to_string()).unwrap()
}

fn pairs(object: &ClaimsObject) -> Vec<(String, String)> {
    flatten(object)
        .into_iter()
        .map(|row| (row.title, row.value))
        .collect()
}

#[test]
fn test_flat_object_one_row_per_key_in_order() {
    let objects = [
        json!({"sub": "u1"}),
        json!({"z": 1, "y": true, "x": null, "w": "s", "v": [1, 2]}),
        json!({"acr": "ts.bind_id.ama", "auth_time": 1700000000, "nonce": "n-0S6_WzA2Mj"}),
    ];

    for value in &objects {
        let object = claims(value);
        let rows = flatten(&object);
        assert_eq!(rows.len(), object.len());

        for (row, (key, claim)) in rows.iter().zip(object.iter()) {
            assert_eq!(row.title, key);
            assert_eq!(row.value, flatten::display_value(claim));
            assert_eq!(row.path, format!("/{key}"));
        }
    }
}

#[test]
fn test_nested_object_rows_replace_its_key() {
    let outer = claims(&json!({
        "before": 1,
        "k": {"a": "x", "b": {"c": "y"}},
        "after": 2
    }));
    let inner = outer.get("k").and_then(ClaimsValue::as_object).unwrap();

    let mut expected = vec![("before".to_string(), "1".to_string())];
    expected.extend(pairs(inner));
    expected.push(("after".to_string(), "2".to_string()));

    assert_eq!(pairs(&outer), expected);
    assert!(flatten(&outer).iter().all(|row| row.title != "k"));
}

#[test]
fn test_profile_claims_scenarios() {
    assert_eq!(
        pairs(&claims(&json!({
            "sub": "abc123",
            "name": {"first": "Jane", "last": "Doe"},
            "email": "jane@x.com"
        }))),
        vec![
            ("sub".to_string(), "abc123".to_string()),
            ("first".to_string(), "Jane".to_string()),
            ("last".to_string(), "Doe".to_string()),
            ("email".to_string(), "jane@x.com".to_string()),
        ]
    );

    assert_eq!(
        pairs(&claims(&json!({"roles": ["admin", "user"]}))),
        vec![("roles".to_string(), "admin,user".to_string())]
    );

    assert_eq!(
        pairs(&claims(&json!({"a": {"b": {"c": 1}}}))),
        vec![("c".to_string(), "1".to_string())]
    );

    assert!(flatten(&claims(&json!({}))).is_empty());
}

#[test]
fn test_objects_inside_arrays_not_expanded() {
    let rows = flatten(&claims(&json!({
        "emails": [{"address": "a@x.com", "primary": true}, {"address": "b@x.com"}]
    })));

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "emails");
    assert_eq!(
        rows[0].value,
        r#"{"address":"a@x.com","primary":true},{"address":"b@x.com"}"#
    );
}

#[test]
fn test_paths_unique_when_titles_collide() {
    let rows = flatten(&claims(&json!({
        "name": "Jane Doe",
        "given": {"name": "Jane"},
        "family": {"name": "Doe"},
        "org": {"unit": {"name": "Payments"}}
    })));

    assert!(rows.iter().all(|row| row.title == "name"));

    let mut paths: Vec<_> = rows.iter().map(|row| row.path.clone()).collect();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), rows.len());
}

#[test]
fn test_repeated_calls_identical() {
    let object = claims(&json!({"a": [1, {"b": 2}], "c": {"d": null}}));
    let first = flatten(&object);
    for _ in 0..3 {
        assert_eq!(flatten(&object), first);
    }
}

#[test]
fn test_flatten_from_decoded_token() {
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

    let payload = json!({
        "iss": "https://signin.bindid-sandbox.io",
        "sub": "abc123",
        "bindid_info": {"capp_first_login": 1700000000, "capp_last_login_from_authenticating_device": 1700000500},
        "bindid_alias_key": null
    });
    let token = format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","kid":"key-1"}"#),
        URL_SAFE_NO_PAD.encode(payload.to_string()),
        URL_SAFE_NO_PAD.encode("sig")
    );

    let decoded = token::decode(&token).unwrap();
    assert_eq!(decoded.header.key_id.as_deref(), Some("key-1"));

    let rows: Vec<_> = decoded
        .claims
        .flatten()
        .into_iter()
        .map(|row| (row.path, row.value))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("/iss".to_string(), "https://signin.bindid-sandbox.io".to_string()),
            ("/sub".to_string(), "abc123".to_string()),
            ("/bindid_info/capp_first_login".to_string(), "1700000000".to_string()),
            (
                "/bindid_info/capp_last_login_from_authenticating_device".to_string(),
                "1700000500".to_string()
            ),
            ("/bindid_alias_key".to_string(), String::new()),
        ]
    );
}

#[test]
fn test_rows_serialize_to_json() {
    let rows = flatten(&claims(&json!({"sub": "abc123"})));
    assert_eq!(
        miniserde::json::to_string(&rows),
        r#"[{"title":"sub","value":"abc123","path":"/sub"}]"#
    );
}
