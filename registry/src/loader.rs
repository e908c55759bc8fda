//! Proxy catalog loading with builder pattern and fallback chains.
//!
//! Provides [`ProxyCatalog`], a validated registry the parser can query, and
//! [`CatalogBuilder`] for loading it from the first usable source.
//!
//! # Loading patterns
//!
//! ```no_run
//! use tag_args_registry::ProxyCatalog;
//!
//! // A single registry file (YAML, or JSON by extension)
//! let catalog = ProxyCatalog::from_file("_proxies.yml").unwrap();
//!
//! // A directory with one proxy definition per file
//! let catalog = ProxyCatalog::from_dir("_proxies/").unwrap();
//!
//! // Site registry, falling back to the built-in defaults
//! let catalog = ProxyCatalog::builder()
//!     .from_file("_proxies.yml")
//!     .with_builtin()
//!     .build()
//!     .unwrap();
//! ```

use std::path::{Path, PathBuf};

use tag_args_core::{ProxyDefinition, ProxyRegistry, ProxySet};
use tracing::debug;

use crate::config::{RegistryFile, RegistryFormat};
use crate::error::{RegistryError, Result};
use crate::validate::{validate_proxy, validate_registry};

/// Describes where a [`ProxyCatalog`] was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// A single registry file.
    File(PathBuf),
    /// A directory of per-proxy definition files.
    Directory(PathBuf),
    /// The registry embedded in this crate.
    Builtin,
    /// Loaded via a fallback chain of multiple sources.
    Multiple(Vec<CatalogSource>),
}

/// Validated collection of proxy definitions.
///
/// # Examples
///
/// ```
/// use tag_args_core::{ArgumentParser, ProxyRegistry};
/// use tag_args_registry::ProxyCatalog;
///
/// let catalog = ProxyCatalog::builtin().unwrap();
/// assert!(catalog.supports("magick", "img", "@2x"));
///
/// let args = ArgumentParser::new(&catalog)
///     .parse("cat.png magick:2x", "img")
///     .unwrap();
/// assert_eq!(args.proxy_names(), vec!["magick"]);
/// ```
#[derive(Debug, Clone)]
pub struct ProxyCatalog {
    proxies: ProxySet,
    source: CatalogSource,
}

impl ProxyCatalog {
    /// Returns a new [`CatalogBuilder`] for configuring a fallback chain.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Loads and validates a registry file.
    ///
    /// # Errors
    ///
    /// Returns an I/O or parse error if the file cannot be loaded, or
    /// [`RegistryError::Invalid`] for the first validation problem.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = RegistryFile::load(path)?;
        Self::from_registry(file, CatalogSource::File(path.to_path_buf()))
    }

    /// Loads one [`ProxyDefinition`] from each `*.yaml`, `*.yml` or `*.json`
    /// file in `path`.
    ///
    /// Files are read in name order, so a later file replaces an earlier
    /// definition with the same name. Directory catalogs have no base keys.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            let is_definition = matches!(
                file_path.extension().and_then(|e| e.to_str()),
                Some("yaml" | "yml" | "json")
            );
            if is_definition {
                files.push(file_path);
            }
        }
        files.sort();

        let mut proxies = ProxySet::new();
        for file_path in files {
            let reader = std::io::BufReader::new(std::fs::File::open(&file_path)?);
            let proxy: ProxyDefinition = match RegistryFormat::from_path(&file_path) {
                RegistryFormat::Json => serde_json::from_reader(reader)?,
                RegistryFormat::Yaml => serde_yaml::from_reader(reader)?,
            };
            if let Some(err) = validate_proxy(&proxy).into_iter().next() {
                return Err(err.into());
            }
            debug!(proxy = %proxy.name, path = %file_path.display(), "Loaded proxy definition");
            proxies.insert(proxy);
        }

        Ok(Self {
            proxies,
            source: CatalogSource::Directory(path.to_path_buf()),
        })
    }

    /// Loads the registry embedded in this crate.
    pub fn builtin() -> Result<Self> {
        Self::from_registry(RegistryFile::builtin()?, CatalogSource::Builtin)
    }

    /// Validates an in-memory registry file.
    pub fn from_registry(file: RegistryFile, source: CatalogSource) -> Result<Self> {
        if let Some(err) = validate_registry(&file).into_iter().next() {
            return Err(err.into());
        }
        Ok(Self {
            proxies: file.into_proxy_set(),
            source,
        })
    }

    /// Looks up a proxy definition by name.
    pub fn get(&self, name: &str) -> Option<&ProxyDefinition> {
        self.proxies.get(name)
    }

    /// Returns `true` if the catalog defines `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.proxies.get(name).is_some()
    }

    /// Iterates definitions in load order.
    pub fn proxies(&self) -> impl Iterator<Item = &ProxyDefinition> {
        self.proxies.iter()
    }

    /// Returns an iterator over proxy names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.proxies.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// Returns a reference to the source metadata.
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Converts back into a serializable registry file.
    pub fn to_registry_file(&self) -> RegistryFile {
        let mut file = RegistryFile::new();
        file.base_keys = self.proxies.base_keys().to_vec();
        file.proxies = self.proxies.iter().cloned().collect();
        file
    }
}

impl ProxyRegistry for ProxyCatalog {
    fn is_proxy(&self, name: &str) -> bool {
        self.proxies.is_proxy(name)
    }

    fn supports(&self, name: &str, tag: &str, arg: &str) -> bool {
        self.proxies.supports(name, tag, arg)
    }

    fn base_keys(&self) -> &[String] {
        self.proxies.base_keys()
    }
}

/// Builder for constructing a [`ProxyCatalog`] with a fallback chain.
///
/// Sources are tried in the order they are added. The first one that loads
/// and validates wins; if all fail, [`RegistryError::NoSourcesAvailable`]
/// is returned.
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    sources: Vec<CatalogSource>,
}

impl CatalogBuilder {
    /// Creates a new builder with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a registry file as a source.
    pub fn from_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(CatalogSource::File(path.into()));
        self
    }

    /// Adds a directory of definition files as a source.
    pub fn from_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(CatalogSource::Directory(path.into()));
        self
    }

    /// Adds the built-in registry as a source.
    pub fn with_builtin(mut self) -> Self {
        self.sources.push(CatalogSource::Builtin);
        self
    }

    /// Attempts to load the catalog from configured sources in order.
    pub fn build(self) -> Result<ProxyCatalog> {
        if self.sources.is_empty() {
            return Err(RegistryError::NoSourcesAvailable);
        }

        for source in &self.sources {
            let result = match source {
                CatalogSource::File(path) => ProxyCatalog::from_file(path),
                CatalogSource::Directory(path) => ProxyCatalog::from_dir(path),
                CatalogSource::Builtin => ProxyCatalog::builtin(),
                CatalogSource::Multiple(_) => continue,
            };

            match result {
                Ok(mut catalog) => {
                    debug!(source = ?source, proxies = catalog.len(), "Loaded proxy catalog");
                    catalog.source = CatalogSource::Multiple(self.sources.clone());
                    return Ok(catalog);
                }
                Err(err) => debug!(source = ?source, error = %err, "Catalog source failed"),
            }
        }

        Err(RegistryError::NoSourcesAvailable)
    }
}
