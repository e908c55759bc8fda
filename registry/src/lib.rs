//! Proxy registry files and catalog loading.
//!
//! The parser in [`tag_args_core`] only asks a
//! [`ProxyRegistry`](tag_args_core::ProxyRegistry) which proxies exist. This
//! crate supplies that registry from configuration:
//!
//! - [`RegistryFile`] — YAML/JSON document listing proxies and base keys.
//! - [`ProxyCatalog`] — validated registry loaded from a file, a directory of
//!   per-proxy files, or the built-in defaults, with [`CatalogBuilder`] for
//!   fallback chains.
//! - [`validate_registry`] — structural checks run on every load.
//!
//! # Quick start
//!
//! ```
//! use tag_args_core::ArgumentParser;
//! use tag_args_registry::ProxyCatalog;
//!
//! let catalog = ProxyCatalog::builder()
//!     .from_file("_proxies.yml")
//!     .with_builtin()
//!     .build()
//!     .unwrap();
//!
//! let args = ArgumentParser::new(&catalog)
//!     .parse("cat.png magick:resize:50%", "img")
//!     .unwrap();
//! assert!(args.has_proxies());
//! ```

mod config;
mod error;
mod loader;
mod validate;

pub use config::{REGISTRY_FORMAT_VERSION, RegistryFile, RegistryFormat};
pub use error::{RegistryError, Result};
pub use loader::{CatalogBuilder, CatalogSource, ProxyCatalog};
pub use validate::{ValidationError, validate_proxy, validate_registry};
