//! Authenticated URL construction.
//!
//! # Design
//! Credentials reach the wire in exactly one place: here. Resources pass a
//! page path and structured parameters; the builder percent-encodes every
//! value and appends `key`/`token` last. Compound values follow Trello's
//! documented query conventions — lists are comma-joined, nested maps
//! serialize as dotted sub-keys (`prefs.permissionLevel=public`).

use std::collections::BTreeMap;

use crate::error::Error;

/// A query parameter value. Covers the shapes the Trello API accepts.
#[derive(Debug, Clone)]
pub enum ParamValue {
    Str(String),
    Bool(bool),
    Int(i64),
    /// Comma-joined on the wire, e.g. `value=id1,id2`.
    List(Vec<String>),
    /// Dotted sub-keys on the wire, e.g. `prefs.permissionLevel=public`.
    Map(BTreeMap<String, String>),
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

/// Compose an authenticated URL for `page` under `base`.
///
/// `page` must be non-empty; a leading `/` is added when missing and a
/// trailing `/` on `base` is ignored. Pure function — never logs, and the
/// credentials appear only in the returned string.
pub fn build_url(
    base: &str,
    page: &str,
    params: &[(&str, ParamValue)],
    key: &str,
    token: Option<&str>,
) -> Result<String, Error> {
    if page.is_empty() {
        return Err(Error::Validation("URL page must not be empty".to_string()));
    }

    let mut url = base.trim_end_matches('/').to_string();
    if !page.starts_with('/') {
        url.push('/');
    }
    url.push_str(page);
    url.push('?');

    let mut pairs: Vec<String> = Vec::new();
    for (name, value) in params {
        match value {
            ParamValue::Str(s) => pairs.push(format!("{name}={}", urlencoding::encode(s))),
            ParamValue::Bool(b) => pairs.push(format!("{name}={b}")),
            ParamValue::Int(i) => pairs.push(format!("{name}={i}")),
            ParamValue::List(items) => {
                let joined = items.join(",");
                pairs.push(format!("{name}={}", urlencoding::encode(&joined)));
            }
            ParamValue::Map(map) => {
                for (sub, v) in map {
                    pairs.push(format!("{name}.{sub}={}", urlencoding::encode(v)));
                }
            }
        }
    }
    pairs.push(format!("key={}", urlencoding::encode(key)));
    if let Some(token) = token {
        pairs.push(format!("token={}", urlencoding::encode(token)));
    }

    url.push_str(&pairs.join("&"));
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.trello.com/1";

    #[test]
    fn empty_page_is_a_validation_error() {
        let err = build_url(BASE, "", &[], "k", None).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn appends_auth_and_params_with_single_question_mark() {
        let url = build_url(BASE, "/boards", &[("name", "x".into())], "k1", Some("t1")).unwrap();
        assert_eq!(url, "https://api.trello.com/1/boards?name=x&key=k1&token=t1");
        assert_eq!(url.matches('?').count(), 1);
        assert_eq!(url.matches("name=x").count(), 1);
    }

    #[test]
    fn token_is_omitted_when_absent() {
        let url = build_url(BASE, "/boards", &[], "k1", None).unwrap();
        assert_eq!(url, "https://api.trello.com/1/boards?key=k1");
        assert!(!url.contains("token"));
    }

    #[test]
    fn values_are_percent_encoded() {
        let url = build_url(BASE, "/boards", &[("name", "a b&c".into())], "k", None).unwrap();
        assert!(url.contains("name=a%20b%26c"));
    }

    #[test]
    fn missing_leading_slash_is_tolerated() {
        let url = build_url("https://api.trello.com/1/", "boards", &[], "k", None).unwrap();
        assert!(url.starts_with("https://api.trello.com/1/boards?"));
    }

    #[test]
    fn lists_are_comma_joined() {
        let value = ParamValue::List(vec!["id1".to_string(), "id2".to_string()]);
        let url = build_url(BASE, "/cards/abc/idLabels", &[("value", value)], "k", None).unwrap();
        assert!(url.contains("value=id1%2Cid2"));
    }

    #[test]
    fn maps_serialize_as_dotted_sub_keys() {
        let mut prefs = std::collections::BTreeMap::new();
        prefs.insert("permissionLevel".to_string(), "public".to_string());
        let url = build_url(BASE, "/boards/abc", &[("prefs", ParamValue::Map(prefs))], "k", None)
            .unwrap();
        assert!(url.contains("prefs.permissionLevel=public"));
    }

    #[test]
    fn bools_and_ints_render_bare() {
        let url = build_url(
            BASE,
            "/boards",
            &[("closed", true.into()), ("pos", ParamValue::Int(3))],
            "k",
            None,
        )
        .unwrap();
        assert!(url.contains("closed=true"));
        assert!(url.contains("pos=3"));
    }
}
