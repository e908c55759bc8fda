//! Argument parsing for template tag invocations.
//!
//! A tag such as `{% img cat.png magick:resize:50% alt:"a cat" %}` receives
//! its arguments as one raw string. This crate turns that string into a
//! structured [`ParsedArguments`]:
//!
//! - the first word becomes the subject `file`;
//! - bare words and `key:value` pairs become HTML attributes;
//! - `proxy:key:value` and flag-style `proxy:flag` words are routed to named
//!   sub-processors ("proxies") known to a [`ProxyRegistry`].
//!
//! Values can be resolved later against a host template engine through
//! [`TemplateRenderer`] and [`ParsedArguments::resolve`].
//!
//! # Example
//!
//! ```
//! use tag_args_core::*;
//!
//! let registry = ProxySet::new()
//!     .with_proxy(ProxyDefinition::new("magick").with_tags(["img"]).with_args(["resize"]));
//!
//! let args = ArgumentParser::new(&registry)
//!     .parse(r#"cat.png magick:resize:50% alt:"a cat" lazy"#, "img")
//!     .unwrap();
//!
//! assert_eq!(args.file(), Some("cat.png"));
//! assert_eq!(args.to_html(), r#" alt="a cat" lazy="true""#);
//! assert_eq!(args.proxy_names(), vec!["magick"]);
//!
//! // Unknown key for a known proxy.
//! let err = ArgumentParser::new(&registry)
//!     .parse("cat.png magick:rotate:90", "img")
//!     .unwrap_err();
//! assert_eq!(err, ArgumentError::UnknownProxy);
//! ```

mod arguments;
mod error;
mod parser;
mod proxy;
mod render;
pub mod shellwords;
mod value;

pub use arguments::{FILE_KEY, HTML_KEY, ParsedArguments};
pub use error::{ArgumentError, Result, TokenizeError};
pub use parser::{
    ACCEPT_KEY, ACCEPT_PROXY, ArgumentParser, DEFAULT_ACCEPT, default_accept, parse_arguments,
};
pub use proxy::{FLAG_PREFIX, NoProxies, ProxyDefinition, ProxyRegistry, ProxySet};
pub use render::TemplateRenderer;
pub use value::{ArgMap, ArgValue};
