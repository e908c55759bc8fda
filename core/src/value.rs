//! Argument value tree.
//!
//! Parsed arguments are stored as a small tagged tree: leaves are booleans
//! (flags) or strings, branches are insertion-ordered maps. The evaluation
//! pass in [`crate::render`] walks this tree without knowing anything about
//! the `html`/proxy layout built on top of it.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered map of argument values.
pub type ArgMap = IndexMap<String, ArgValue>;

/// A single node in the argument tree.
///
/// Serializes untagged, so a parsed structure renders as plain JSON/YAML:
/// `true`, `"text"` or a nested object.
///
/// # Examples
///
/// ```
/// use tag_args_core::ArgValue;
///
/// assert_eq!(ArgValue::flag().to_string(), "true");
/// assert_eq!(ArgValue::from("x").as_str(), Some("x"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Flag-style value. The parser only ever stores `true`.
    Bool(bool),
    /// String value, possibly a template expression until resolved.
    Text(String),
    /// Nested map (`html` or a proxy's sub-keys).
    Map(ArgMap),
}

impl ArgValue {
    /// The value stored for a flag given without a value.
    pub fn flag() -> Self {
        ArgValue::Bool(true)
    }

    /// Creates an empty branch.
    pub fn map() -> Self {
        ArgValue::Map(ArgMap::new())
    }

    /// Returns the string payload of a [`Text`](ArgValue::Text) leaf.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean payload of a [`Bool`](ArgValue::Bool) leaf.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ArgMap> {
        match self {
            ArgValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut ArgMap> {
        match self {
            ArgValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns `true` for a [`Map`](ArgValue::Map) branch.
    pub fn is_map(&self) -> bool {
        matches!(self, ArgValue::Map(_))
    }

    /// Rewrites every string leaf with `f`, recursing into maps.
    ///
    /// Booleans pass through untouched. The first error aborts the walk and
    /// is returned as-is.
    ///
    /// # Examples
    ///
    /// ```
    /// use tag_args_core::{ArgMap, ArgValue};
    ///
    /// let mut inner = ArgMap::new();
    /// inner.insert("alt".into(), ArgValue::from("hello"));
    /// inner.insert("async".into(), ArgValue::flag());
    ///
    /// let upper = ArgValue::Map(inner)
    ///     .try_map_text(&mut |s| Ok::<_, ()>(s.to_uppercase()))
    ///     .unwrap();
    /// let map = upper.as_map().unwrap();
    /// assert_eq!(map["alt"], ArgValue::from("HELLO"));
    /// assert_eq!(map["async"], ArgValue::flag());
    /// ```
    pub fn try_map_text<E, F>(self, f: &mut F) -> Result<Self, E>
    where
        F: FnMut(String) -> Result<String, E>,
    {
        match self {
            ArgValue::Bool(b) => Ok(ArgValue::Bool(b)),
            ArgValue::Text(s) => f(s).map(ArgValue::Text),
            ArgValue::Map(map) => {
                let mut out = ArgMap::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(key, value.try_map_text(f)?);
                }
                Ok(ArgValue::Map(out))
            }
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Bool(b) => write!(f, "{b}"),
            ArgValue::Text(s) => f.write_str(s),
            ArgValue::Map(map) => {
                let mut first = true;
                for (key, value) in map {
                    if !first {
                        f.write_str(" ")?;
                    }
                    first = false;
                    write!(f, "{key}:{value}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Text(s)
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Text(s.to_string())
    }
}

impl From<ArgMap> for ArgValue {
    fn from(map: ArgMap) -> Self {
        ArgValue::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_leaves() {
        assert_eq!(ArgValue::flag().to_string(), "true");
        assert_eq!(ArgValue::Bool(false).to_string(), "false");
        assert_eq!(ArgValue::from("a b").to_string(), "a b");
    }

    #[test]
    fn test_display_map_keeps_order() {
        let mut map = ArgMap::new();
        map.insert("resize".into(), ArgValue::from("50%"));
        map.insert("2x".into(), ArgValue::flag());
        assert_eq!(ArgValue::Map(map).to_string(), "resize:50% 2x:true");
    }

    #[test]
    fn test_try_map_text_recurses_two_levels() {
        let mut inner = ArgMap::new();
        inner.insert("deep".into(), ArgValue::from("a"));
        let mut outer = ArgMap::new();
        outer.insert("nested".into(), ArgValue::Map(inner));
        outer.insert("leaf".into(), ArgValue::from("b"));
        outer.insert("flag".into(), ArgValue::flag());

        let mut seen = Vec::new();
        let out = ArgValue::Map(outer)
            .try_map_text(&mut |s| {
                seen.push(s.clone());
                Ok::<_, ()>(format!("<{s}>"))
            })
            .unwrap();

        assert_eq!(seen, vec!["a", "b"]);
        let map = out.as_map().unwrap();
        assert_eq!(
            map["nested"].as_map().unwrap()["deep"],
            ArgValue::from("<a>")
        );
        assert_eq!(map["leaf"], ArgValue::from("<b>"));
        assert_eq!(map["flag"], ArgValue::flag());
    }

    #[test]
    fn test_try_map_text_stops_on_error() {
        let mut map = ArgMap::new();
        map.insert("a".into(), ArgValue::from("ok"));
        map.insert("b".into(), ArgValue::from("bad"));
        map.insert("c".into(), ArgValue::from("never"));

        let mut calls = 0;
        let result = ArgValue::Map(map).try_map_text(&mut |s| {
            calls += 1;
            if s == "bad" { Err("boom") } else { Ok(s) }
        });
        assert_eq!(result, Err("boom"));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_serializes_untagged() {
        let mut map = ArgMap::new();
        map.insert("class".into(), ArgValue::from("x"));
        map.insert("async".into(), ArgValue::flag());
        let json = serde_json::to_string(&ArgValue::Map(map)).unwrap();
        assert_eq!(json, r#"{"class":"x","async":true}"#);
    }
}
