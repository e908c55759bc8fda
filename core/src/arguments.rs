//! Parsed tag arguments.
//!
//! [`ParsedArguments`] wraps the top-level argument tree produced by
//! [`ArgumentParser`](crate::ArgumentParser). It exposes plain map access
//! (get/insert/fetch/iterate) plus the queries consumers actually need:
//! the subject [`file`](ParsedArguments::file), the rendered
//! [`to_html`](ParsedArguments::to_html) attribute string and the proxy
//! sub-maps.

use serde::{Serialize, Serializer};

use crate::value::{ArgMap, ArgValue};

/// Top-level key holding the first positional token.
pub const FILE_KEY: &str = "file";
/// Top-level key holding HTML attributes.
pub const HTML_KEY: &str = "html";

/// Structured arguments of one tag invocation.
///
/// Created once per invocation, mutated during parsing and the optional
/// [`resolve`](ParsedArguments::resolve) pass, read-only afterwards.
///
/// # Examples
///
/// ```
/// use tag_args_core::{ArgumentParser, NoProxies};
///
/// let args = ArgumentParser::new(NoProxies)
///     .parse("img.png class:hero async", "img")
///     .unwrap();
/// assert_eq!(args.file(), Some("img.png"));
/// assert_eq!(args.to_html(), r#" class="hero" async="true""#);
/// assert!(!args.has_proxies());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArguments {
    raw: String,
    tag: String,
    entries: ArgMap,
    reserved: Vec<String>,
}

impl ParsedArguments {
    /// Creates an empty structure for `raw` arguments of `tag`.
    ///
    /// `reserved` lists top-level keys besides `file` and `html` that are
    /// never reported as proxies.
    pub fn new(raw: impl Into<String>, tag: impl Into<String>, reserved: Vec<String>) -> Self {
        Self {
            raw: raw.into(),
            tag: tag.into(),
            entries: ArgMap::new(),
            reserved,
        }
    }

    /// The raw argument string this structure was parsed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Name of the tag these arguments belong to.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The subject value (first positional token), if any.
    pub fn file(&self) -> Option<&str> {
        self.entries.get(FILE_KEY).and_then(ArgValue::as_str)
    }

    /// HTML attributes in insertion order.
    pub fn html(&self) -> Option<&ArgMap> {
        self.entries.get(HTML_KEY).and_then(ArgValue::as_map)
    }

    /// Sub-keys recorded for proxy `name`.
    pub fn proxy(&self, name: &str) -> Option<&ArgMap> {
        if self.is_reserved(name) {
            return None;
        }
        self.entries.get(name).and_then(ArgValue::as_map)
    }

    /// Renders every `html` entry as ` key="value"`.
    ///
    /// Values are substituted verbatim; flags render their stored `true`.
    pub fn to_html(&self) -> String {
        self.html()
            .map(|html| {
                html.iter()
                    .map(|(key, value)| format!(" {key}=\"{value}\""))
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Names of every proxy with recorded arguments, in insertion order.
    pub fn proxy_names(&self) -> Vec<&str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(|key| !self.is_reserved(key))
            .collect()
    }

    /// Proxy entries with their sub-maps, in insertion order.
    pub fn proxies(&self) -> impl Iterator<Item = (&str, &ArgMap)> {
        self.entries.iter().filter_map(|(key, value)| {
            if self.is_reserved(key) {
                return None;
            }
            value.as_map().map(|map| (key.as_str(), map))
        })
    }

    /// Returns `true` if at least one proxy entry is present.
    pub fn has_proxies(&self) -> bool {
        !self.proxy_names().is_empty()
    }

    /// Returns `true` if `key` is `file`, `html` or a registry base key.
    pub fn is_reserved(&self, key: &str) -> bool {
        key == FILE_KEY || key == HTML_KEY || self.reserved.iter().any(|k| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ArgValue> {
        self.entries.get_mut(key)
    }

    /// Looks up `key`, falling back to `default` when absent.
    pub fn fetch<'a>(&'a self, key: &str, default: &'a ArgValue) -> &'a ArgValue {
        self.entries.get(key).unwrap_or(default)
    }

    /// Stores `value` under `key`, returning the previous value.
    ///
    /// An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ArgValue>) -> Option<ArgValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ArgValue> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies the top-level map out.
    pub fn to_map(&self) -> ArgMap {
        self.entries.clone()
    }

    /// Consumes the structure, returning the top-level map.
    pub fn into_map(self) -> ArgMap {
        self.entries
    }

    /// Stores `value` at `section.key`, creating the section on first use.
    ///
    /// A non-map value already stored under `section` is replaced.
    pub(crate) fn insert_nested(&mut self, section: &str, key: &str, value: ArgValue) {
        let slot = self
            .entries
            .entry(section.to_string())
            .or_insert_with(ArgValue::map);
        if !slot.is_map() {
            *slot = ArgValue::map();
        }
        if let Some(map) = slot.as_map_mut() {
            map.insert(key.to_string(), value);
        }
    }

    pub(crate) fn entries_mut(&mut self) -> &mut ArgMap {
        &mut self.entries
    }
}

impl<'a> IntoIterator for &'a ParsedArguments {
    type Item = (&'a String, &'a ArgValue);
    type IntoIter = indexmap::map::Iter<'a, String, ArgValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Serializes as the bare top-level map.
impl Serialize for ParsedArguments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}
