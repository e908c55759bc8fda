//! Tokenize-and-classify parser for tag argument strings.
//!
//! Each word produced by [`shellwords::split`](crate::shellwords::split) is
//! classified exactly once, in order:
//!
//! | Word                        | Result                                   |
//! |-----------------------------|------------------------------------------|
//! | first word                  | `file`, verbatim apart from `\:`         |
//! | `name`                      | `html[name] = true`                      |
//! | `key:value`                 | `proxy[key][value] = true` if `key` has flag `@value`, else `html[key] = value` |
//! | `proxy:key:value`           | `proxy[proxy][key] = value`              |
//! | more than two unescaped `:` | [`ArgumentError::UnescapedColon`]        |
//!
//! A colon preceded by a backslash (`\:`) never splits; it is turned back
//! into `:` in the final (value) segment.

use tracing::{debug, trace};

use crate::arguments::{FILE_KEY, HTML_KEY, ParsedArguments};
use crate::error::{ArgumentError, Result};
use crate::proxy::{FLAG_PREFIX, ProxyRegistry};
use crate::shellwords;
use crate::value::ArgValue;

/// Proxy that receives the injected content type.
pub const ACCEPT_PROXY: &str = "sprockets";
/// Sub-key of [`ACCEPT_PROXY`] holding the content type.
pub const ACCEPT_KEY: &str = "accept";

/// Default content type per tag name.
pub const DEFAULT_ACCEPT: [(&str, &str); 2] =
    [("css", "text/css"), ("js", "application/javascript")];

const ESCAPED_COLON: &str = "\\:";

/// Returns the default content type injected for `tag`.
///
/// # Examples
///
/// ```
/// use tag_args_core::default_accept;
///
/// assert_eq!(default_accept("css"), Some("text/css"));
/// assert_eq!(default_accept("img"), None);
/// ```
pub fn default_accept(tag: &str) -> Option<&'static str> {
    DEFAULT_ACCEPT
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, mime)| *mime)
}

/// Parser bound to a proxy registry.
///
/// The registry is consulted at parse time, so the same text may classify
/// differently under different registries.
///
/// # Examples
///
/// ```
/// use tag_args_core::{ArgValue, ArgumentParser, ProxyDefinition, ProxySet};
///
/// let registry = ProxySet::new().with_proxy(
///     ProxyDefinition::new("magick").with_args(["resize", "@2x"]),
/// );
/// let parser = ArgumentParser::new(registry);
///
/// let args = parser
///     .parse(r#"cat.png magick:resize:50% magick:2x alt:"a cat""#, "img")
///     .unwrap();
/// let magick = args.proxy("magick").unwrap();
/// assert_eq!(magick["resize"], ArgValue::from("50%"));
/// assert_eq!(magick["2x"], ArgValue::flag());
/// assert_eq!(args.to_html(), r#" alt="a cat""#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArgumentParser<R> {
    registry: R,
}

impl<R: ProxyRegistry> ArgumentParser<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Parses the raw arguments of one `tag` invocation.
    ///
    /// Empty input yields an empty structure without `file`.
    ///
    /// # Errors
    ///
    /// - [`ArgumentError::Tokenize`] if a quote is left open.
    /// - [`ArgumentError::UnescapedColon`] if a word has more than two
    ///   unescaped colons.
    /// - [`ArgumentError::UnknownProxy`] if `proxy:key:value` names a known
    ///   proxy that does not accept `key` on this tag.
    pub fn parse(&self, raw: &str, tag: &str) -> Result<ParsedArguments> {
        let words = shellwords::split(raw)?;
        let mut args = ParsedArguments::new(raw, tag, self.registry.base_keys().to_vec());

        for (index, word) in words.into_iter().enumerate() {
            if index == 0 {
                let file = unescape(&word);
                trace!(%file, "Subject");
                args.insert(FILE_KEY, file);
                continue;
            }

            let segments = split_unescaped(&word);
            match segments.as_slice() {
                [_] => {
                    let name = unescape(&word);
                    trace!(attribute = %name, "Flag attribute");
                    args.insert_nested(HTML_KEY, &name, ArgValue::flag());
                }
                [key, value] => self.classify_pair(&mut args, tag, key, &unescape(value)),
                [key, sub_key, value] => {
                    self.classify_triple(&mut args, tag, key, sub_key, &unescape(value))?
                }
                _ => return Err(ArgumentError::UnescapedColon),
            }
        }

        inject_accept(&mut args, tag);

        debug!(
            tag,
            attributes = args.html().map_or(0, |h| h.len()),
            proxies = ?args.proxy_names(),
            "Parsed tag arguments"
        );
        Ok(args)
    }

    /// `key:value`: a proxy flag when the registry knows `@value`, an HTML
    /// attribute otherwise.
    fn classify_pair(&self, args: &mut ParsedArguments, tag: &str, key: &str, value: &str) {
        let flag = format!("{FLAG_PREFIX}{value}");
        if !is_structural(key) && self.registry.supports(key, tag, &flag) {
            trace!(proxy = key, flag = value, "Proxy flag");
            args.insert_nested(key, value, ArgValue::flag());
        } else {
            trace!(attribute = key, value, "Attribute");
            args.insert_nested(HTML_KEY, key, ArgValue::from(value));
        }
    }

    /// `proxy:key:value`: recorded for a supported key, rejected for a known
    /// proxy, dropped otherwise.
    fn classify_triple(
        &self,
        args: &mut ParsedArguments,
        tag: &str,
        proxy: &str,
        key: &str,
        value: &str,
    ) -> Result<()> {
        if !is_structural(proxy) && self.registry.supports(proxy, tag, key) {
            trace!(proxy, key, value, "Proxy argument");
            args.insert_nested(proxy, key, ArgValue::from(value));
            Ok(())
        } else if self.registry.is_proxy(proxy) {
            Err(ArgumentError::UnknownProxy)
        } else {
            debug!(proxy, key, tag, "Dropping argument for unregistered proxy");
            Ok(())
        }
    }
}

/// Parses `raw` arguments of `tag` against `registry`.
///
/// Shorthand for [`ArgumentParser::new`] followed by
/// [`parse`](ArgumentParser::parse).
pub fn parse_arguments<R: ProxyRegistry>(
    raw: &str,
    tag: &str,
    registry: R,
) -> Result<ParsedArguments> {
    ArgumentParser::new(registry).parse(raw, tag)
}

/// `file` and `html` are never proxy names.
fn is_structural(key: &str) -> bool {
    key == FILE_KEY || key == HTML_KEY
}

/// Splits on colons not preceded by a backslash. Empty segments are kept.
fn split_unescaped(word: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut prev = None;

    for (i, c) in word.char_indices() {
        if c == ':' && prev != Some('\\') {
            segments.push(&word[start..i]);
            start = i + c.len_utf8();
        }
        prev = Some(c);
    }
    segments.push(&word[start..]);

    segments
}

fn unescape(segment: &str) -> String {
    segment.replace(ESCAPED_COLON, ":")
}

/// Adds `sprockets.accept` for tags with a default content type unless
/// already present.
fn inject_accept(args: &mut ParsedArguments, tag: &str) {
    let Some(mime) = default_accept(tag) else {
        return;
    };

    let explicit = args
        .get(ACCEPT_PROXY)
        .and_then(ArgValue::as_map)
        .is_some_and(|m| m.contains_key(ACCEPT_KEY));
    if !explicit {
        trace!(tag, mime, "Injecting default accept");
        args.insert_nested(ACCEPT_PROXY, ACCEPT_KEY, ArgValue::from(mime));
    }
}
