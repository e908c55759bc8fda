//! Registry validation.
//!
//! Catches definitions the parser could never match (empty names, arguments
//! containing `:` or whitespace) and ambiguous ones (duplicates) before a
//! registry is used.
//!
//! # Examples
//!
//! ```
//! use tag_args_core::ProxyDefinition;
//! use tag_args_registry::{RegistryFile, ValidationError, validate_registry};
//!
//! let mut file = RegistryFile::new();
//! file.proxies.push(ProxyDefinition::new("magick").with_args(["resize", "@2x"]));
//! assert!(validate_registry(&file).is_empty());
//!
//! file.proxies.push(ProxyDefinition::new("magick"));
//! assert_eq!(
//!     validate_registry(&file),
//!     vec![ValidationError::DuplicateProxy("magick".to_string())]
//! );
//! ```

use std::collections::HashSet;

use tag_args_core::{FILE_KEY, FLAG_PREFIX, HTML_KEY, ProxyDefinition};
use thiserror::Error;

use crate::config::RegistryFile;

/// Registry validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Registry version string is empty.
    #[error("registry version cannot be empty")]
    EmptyVersion,
    /// Proxy name is empty or whitespace-only.
    #[error("proxy name cannot be empty")]
    EmptyProxyName,
    /// Proxy name cannot be written as the first segment of a colon word.
    #[error("invalid proxy name: {0}")]
    InvalidProxyName(String),
    /// Proxy name collides with `file` or `html`.
    #[error("reserved proxy name: {0}")]
    ReservedProxyName(String),
    /// Two proxies share a name.
    #[error("duplicate proxy: {0}")]
    DuplicateProxy(String),
    /// Argument is empty, a bare `@`, or contains `:` or whitespace.
    #[error("invalid argument for proxy {proxy}: {arg:?}")]
    InvalidArgument { proxy: String, arg: String },
    /// The same argument is listed twice for one proxy.
    #[error("duplicate argument for proxy {proxy}: {arg}")]
    DuplicateArgument { proxy: String, arg: String },
    /// A base key is listed twice or is empty.
    #[error("invalid base key: {0:?}")]
    InvalidBaseKey(String),
}

/// Validates a full registry file.
///
/// Checks the version, base keys and each proxy definition. Stops at the
/// first problem.
pub fn validate_registry(file: &RegistryFile) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if file.version.trim().is_empty() {
        errors.push(ValidationError::EmptyVersion);
        return errors;
    }

    let mut seen_keys: HashSet<&str> = HashSet::new();
    for key in &file.base_keys {
        if key.trim().is_empty() || !seen_keys.insert(key.as_str()) {
            errors.push(ValidationError::InvalidBaseKey(key.clone()));
            return errors;
        }
    }

    let mut seen_proxies: HashSet<&str> = HashSet::new();
    for proxy in &file.proxies {
        errors.extend(validate_proxy(proxy));
        if !errors.is_empty() {
            return errors;
        }
        if !seen_proxies.insert(proxy.name.as_str()) {
            errors.push(ValidationError::DuplicateProxy(proxy.name.clone()));
            return errors;
        }
    }

    errors
}

/// Validates a single proxy definition.
pub fn validate_proxy(proxy: &ProxyDefinition) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let name = proxy.name.trim();

    if name.is_empty() {
        errors.push(ValidationError::EmptyProxyName);
        return errors;
    }
    if !is_plain_word(&proxy.name) {
        errors.push(ValidationError::InvalidProxyName(proxy.name.clone()));
        return errors;
    }
    if name == FILE_KEY || name == HTML_KEY {
        errors.push(ValidationError::ReservedProxyName(name.to_string()));
        return errors;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for arg in &proxy.args {
        let bare = arg.strip_prefix(FLAG_PREFIX).unwrap_or(arg);
        if bare.is_empty() || !is_plain_word(bare) {
            errors.push(ValidationError::InvalidArgument {
                proxy: proxy.name.clone(),
                arg: arg.clone(),
            });
            return errors;
        }
        if !seen.insert(arg.as_str()) {
            errors.push(ValidationError::DuplicateArgument {
                proxy: proxy.name.clone(),
                arg: arg.clone(),
            });
            return errors;
        }
    }

    errors
}

/// No separators: neither `:` nor whitespace.
fn is_plain_word(s: &str) -> bool {
    !s.chars().any(|c| c == ':' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_with(proxies: Vec<ProxyDefinition>) -> RegistryFile {
        let mut file = RegistryFile::new();
        file.proxies = proxies;
        file
    }

    #[test]
    fn test_accepts_valid_registry() {
        let file = file_with(vec![
            ProxyDefinition::new("magick").with_args(["resize", "@2x"]),
            ProxyDefinition::new("sprockets").with_args(["accept"]),
        ]);
        assert!(validate_registry(&file).is_empty());
    }

    #[test]
    fn test_base_key_may_name_a_proxy() {
        let mut file = file_with(vec![ProxyDefinition::new("sprockets").with_args(["accept"])]);
        file.base_keys = vec!["sprockets".into()];
        assert!(validate_registry(&file).is_empty());
    }

    #[test]
    fn test_reports_only_first_problem() {
        let mut file = file_with(vec![
            ProxyDefinition::new("html"),
            ProxyDefinition::new("a:b"),
        ]);
        file.base_keys = vec!["sprockets".into()];
        assert_eq!(
            validate_registry(&file),
            vec![ValidationError::ReservedProxyName("html".into())]
        );
    }

    #[test]
    fn test_rejects_empty_version() {
        let mut file = RegistryFile::new();
        file.version = " ".into();
        assert_eq!(validate_registry(&file), vec![ValidationError::EmptyVersion]);
    }

    #[test]
    fn test_rejects_duplicate_base_key() {
        let mut file = RegistryFile::new();
        file.base_keys = vec!["sprockets".into(), "sprockets".into()];
        assert_eq!(
            validate_registry(&file),
            vec![ValidationError::InvalidBaseKey("sprockets".into())]
        );
    }

    #[test]
    fn test_rejects_reserved_name() {
        let errors = validate_proxy(&ProxyDefinition::new("html"));
        assert_eq!(errors, vec![ValidationError::ReservedProxyName("html".into())]);
    }

    #[test]
    fn test_rejects_name_with_colon() {
        let errors = validate_proxy(&ProxyDefinition::new("a:b"));
        assert_eq!(errors, vec![ValidationError::InvalidProxyName("a:b".into())]);
    }

    #[test]
    fn test_rejects_bare_flag_prefix() {
        let errors = validate_proxy(&ProxyDefinition::new("magick").with_args(["@"]));
        assert_eq!(
            errors,
            vec![ValidationError::InvalidArgument {
                proxy: "magick".into(),
                arg: "@".into(),
            }]
        );
    }

    #[test]
    fn test_rejects_argument_with_space() {
        let errors = validate_proxy(&ProxyDefinition::new("magick").with_args(["a b"]));
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::InvalidArgument { .. }]
        ));
    }

    #[test]
    fn test_flag_and_key_with_same_name_are_distinct() {
        let errors = validate_proxy(&ProxyDefinition::new("magick").with_args(["2x", "@2x"]));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_rejects_duplicate_argument() {
        let errors = validate_proxy(&ProxyDefinition::new("magick").with_args(["resize", "resize"]));
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateArgument {
                proxy: "magick".into(),
                arg: "resize".into(),
            }]
        );
    }
}
