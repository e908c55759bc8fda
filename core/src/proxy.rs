//! Proxy capability lookup.
//!
//! A proxy is a named sub-processor addressed from a tag as
//! `name:arg` (flag form) or `name:arg:value`. The parser never hardcodes
//! proxy names; it asks a [`ProxyRegistry`] instead.

use serde::{Deserialize, Serialize};

/// Prefix marking a flag-style argument in [`ProxyRegistry::supports`]
/// queries and in [`ProxyDefinition::args`].
pub const FLAG_PREFIX: char = '@';

/// Capability the parser queries while classifying colon tokens.
pub trait ProxyRegistry {
    /// Returns `true` if `name` is a known proxy for any tag.
    fn is_proxy(&self, name: &str) -> bool;

    /// Returns `true` if proxy `name` accepts `arg` on `tag`.
    ///
    /// An `arg` prefixed with [`FLAG_PREFIX`] asks about flag-style
    /// support (`name:arg`); an unprefixed one asks about keyed values
    /// (`name:arg:value`).
    fn supports(&self, name: &str, tag: &str, arg: &str) -> bool;

    /// Reserved top-level keys that are never reported as proxies.
    fn base_keys(&self) -> &[String];
}

impl<R: ProxyRegistry + ?Sized> ProxyRegistry for &R {
    fn is_proxy(&self, name: &str) -> bool {
        (**self).is_proxy(name)
    }

    fn supports(&self, name: &str, tag: &str, arg: &str) -> bool {
        (**self).supports(name, tag, arg)
    }

    fn base_keys(&self) -> &[String] {
        (**self).base_keys()
    }
}

/// Registry with no proxies at all.
///
/// Every colon token then resolves to an `html` attribute or is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProxies;

impl ProxyRegistry for NoProxies {
    fn is_proxy(&self, _name: &str) -> bool {
        false
    }

    fn supports(&self, _name: &str, _tag: &str, _arg: &str) -> bool {
        false
    }

    fn base_keys(&self) -> &[String] {
        &[]
    }
}

/// Definition of a single proxy.
///
/// # Examples
///
/// ```
/// use tag_args_core::ProxyDefinition;
///
/// let magick = ProxyDefinition::new("magick")
///     .with_tags(["img"])
///     .with_args(["resize", "@2x"]);
/// assert!(magick.accepts("img", "resize"));
/// assert!(magick.accepts("img", "@2x"));
/// assert!(!magick.accepts("css", "resize"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyDefinition {
    /// Proxy name as written before the first colon.
    pub name: String,
    /// Tags the proxy applies to. Empty means every tag.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Accepted arguments; `@`-prefixed entries are flags.
    #[serde(default)]
    pub args: Vec<String>,
}

impl ProxyDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            args: Vec::new(),
        }
    }

    /// Restricts the proxy to the given tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Adds accepted arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Returns `true` if the proxy applies to `tag`.
    pub fn applies_to(&self, tag: &str) -> bool {
        self.tags.is_empty() || self.tags.iter().any(|t| t == tag)
    }

    /// Returns `true` if the proxy accepts `arg` on `tag`.
    pub fn accepts(&self, tag: &str, arg: &str) -> bool {
        self.applies_to(tag) && self.args.iter().any(|a| a == arg)
    }

    /// Iterates flag-style arguments without their prefix.
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.args
            .iter()
            .filter_map(|a| a.strip_prefix(FLAG_PREFIX))
    }

    /// Iterates keyed arguments.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.args
            .iter()
            .filter(|a| !a.starts_with(FLAG_PREFIX))
            .map(String::as_str)
    }
}

/// In-memory [`ProxyRegistry`] backed by a list of definitions.
///
/// # Examples
///
/// ```
/// use tag_args_core::{ProxyDefinition, ProxyRegistry, ProxySet};
///
/// let set = ProxySet::new()
///     .with_proxy(ProxyDefinition::new("sprockets").with_args(["accept"]));
/// assert!(set.is_proxy("sprockets"));
/// assert!(set.supports("sprockets", "css", "accept"));
/// assert!(!set.supports("sprockets", "css", "@accept"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxySet {
    proxies: Vec<ProxyDefinition>,
    base_keys: Vec<String>,
}

impl ProxySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from definitions and reserved keys.
    pub fn from_parts(proxies: Vec<ProxyDefinition>, base_keys: Vec<String>) -> Self {
        Self { proxies, base_keys }
    }

    pub fn with_proxy(mut self, proxy: ProxyDefinition) -> Self {
        self.insert(proxy);
        self
    }

    pub fn with_base_key(mut self, key: impl Into<String>) -> Self {
        self.base_keys.push(key.into());
        self
    }

    /// Adds a definition, replacing any existing one with the same name.
    pub fn insert(&mut self, proxy: ProxyDefinition) {
        match self.proxies.iter_mut().find(|p| p.name == proxy.name) {
            Some(existing) => *existing = proxy,
            None => self.proxies.push(proxy),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ProxyDefinition> {
        self.proxies.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProxyDefinition> {
        self.proxies.iter()
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}

impl ProxyRegistry for ProxySet {
    fn is_proxy(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn supports(&self, name: &str, tag: &str, arg: &str) -> bool {
        self.get(name).is_some_and(|p| p.accepts(tag, arg))
    }

    fn base_keys(&self) -> &[String] {
        &self.base_keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn magick() -> ProxyDefinition {
        ProxyDefinition::new("magick")
            .with_tags(["img", "image"])
            .with_args(["resize", "format", "@2x"])
    }

    #[test]
    fn test_no_proxies() {
        assert!(!NoProxies.is_proxy("magick"));
        assert!(!NoProxies.supports("magick", "img", "resize"));
        assert!(NoProxies.base_keys().is_empty());
    }

    #[test]
    fn test_definition_tag_scope() {
        let proxy = magick();
        assert!(proxy.applies_to("img"));
        assert!(!proxy.applies_to("css"));
        assert!(ProxyDefinition::new("any").applies_to("css"));
    }

    #[test]
    fn test_definition_flags_and_keys() {
        let proxy = magick();
        assert_eq!(proxy.flags().collect::<Vec<_>>(), vec!["2x"]);
        assert_eq!(proxy.keys().collect::<Vec<_>>(), vec!["resize", "format"]);
    }

    #[test]
    fn test_set_supports_respects_flag_prefix() {
        let set = ProxySet::new().with_proxy(magick());
        assert!(set.supports("magick", "img", "@2x"));
        assert!(!set.supports("magick", "img", "2x"));
        assert!(set.supports("magick", "img", "resize"));
        assert!(!set.supports("magick", "img", "@resize"));
        assert!(!set.supports("magick", "css", "resize"));
        assert!(!set.supports("other", "img", "resize"));
    }

    #[test]
    fn test_set_insert_replaces_by_name() {
        let mut set = ProxySet::new().with_proxy(magick());
        set.insert(ProxyDefinition::new("magick").with_args(["quality"]));
        assert_eq!(set.len(), 1);
        assert!(set.supports("magick", "css", "quality"));
        assert!(!set.supports("magick", "img", "resize"));
    }

    #[test]
    fn test_registry_through_reference() {
        let set = ProxySet::new().with_proxy(magick()).with_base_key("sprockets");
        let by_ref: &dyn ProxyRegistry = &set;
        assert!(by_ref.is_proxy("magick"));
        assert_eq!(by_ref.base_keys(), ["sprockets".to_string()]);
    }
}
