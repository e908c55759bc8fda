//! Registry file format.
//!
//! A registry file declares the proxies a site understands and the
//! top-level keys that are reserved rather than proxies. YAML is the usual
//! format; files ending in `.json` are read and written as JSON.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! base_keys:
//!   - sprockets
//! proxies:
//!   - name: magick
//!     tags: [img]
//!     args: [resize, format, "@2x"]
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tag_args_core::{ProxyDefinition, ProxySet};

use crate::error::Result;

/// Version written by [`RegistryFile::new`].
pub const REGISTRY_FORMAT_VERSION: &str = "1.0";

const BUILTIN_YAML: &str = include_str!("../defaults/proxies.yaml");

/// On-disk serialization format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryFormat {
    Yaml,
    Json,
}

impl RegistryFormat {
    /// `.json` selects JSON; anything else is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => RegistryFormat::Json,
            _ => RegistryFormat::Yaml,
        }
    }
}

/// Serializable proxy registry.
///
/// # Examples
///
/// ```
/// use tag_args_core::ProxyRegistry;
/// use tag_args_registry::RegistryFile;
///
/// let file = RegistryFile::from_yaml_str(
///     "version: \"1.0\"\nproxies:\n  - name: magick\n    args: [resize]\n",
/// )
/// .unwrap();
/// let set = file.to_proxy_set();
/// assert!(set.supports("magick", "img", "resize"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryFile {
    /// Registry format version (e.g., `"1.0"`).
    pub version: String,
    /// Top-level keys never reported as proxies.
    #[serde(default)]
    pub base_keys: Vec<String>,
    /// Proxy definitions.
    #[serde(default)]
    pub proxies: Vec<ProxyDefinition>,
}

impl RegistryFile {
    /// Creates an empty registry at the current format version.
    pub fn new() -> Self {
        Self {
            version: REGISTRY_FORMAT_VERSION.to_string(),
            base_keys: Vec::new(),
            proxies: Vec::new(),
        }
    }

    /// The registry shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`YamlError`](crate::RegistryError::YamlError) only if the
    /// embedded defaults are malformed.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_YAML)
    }

    /// Parses a registry from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a registry from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a registry file, picking the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::RegistryError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::RegistryError::YamlError) /
    /// [`JsonError`](crate::RegistryError::JsonError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let file: Self = match RegistryFormat::from_path(path) {
            RegistryFormat::Json => serde_json::from_reader(reader)?,
            RegistryFormat::Yaml => serde_yaml::from_reader(reader)?,
        };
        Ok(file)
    }

    /// Saves the registry, picking the format from the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(std::fs::File::create(path)?);
        match RegistryFormat::from_path(path) {
            RegistryFormat::Json => serde_json::to_writer_pretty(writer, self)?,
            RegistryFormat::Yaml => serde_yaml::to_writer(writer, self)?,
        }
        Ok(())
    }

    /// Looks up a proxy definition by name.
    pub fn find_proxy(&self, name: &str) -> Option<&ProxyDefinition> {
        self.proxies.iter().find(|p| p.name == name)
    }

    /// Builds the in-memory registry the parser queries.
    pub fn to_proxy_set(&self) -> ProxySet {
        ProxySet::from_parts(self.proxies.clone(), self.base_keys.clone())
    }

    /// Consuming variant of [`to_proxy_set`](Self::to_proxy_set).
    pub fn into_proxy_set(self) -> ProxySet {
        ProxySet::from_parts(self.proxies, self.base_keys)
    }
}

impl Default for RegistryFile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use tag_args_core::ProxyRegistry;

    use super::*;
    use crate::validate_registry;

    #[test]
    fn test_builtin_is_valid() {
        let file = RegistryFile::builtin().unwrap();
        assert!(validate_registry(&file).is_empty());
        assert!(file.find_proxy("magick").is_some());
        assert_eq!(file.base_keys, vec!["sprockets"]);
    }

    #[test]
    fn test_builtin_proxy_set() {
        let set = RegistryFile::builtin().unwrap().into_proxy_set();
        assert!(set.supports("magick", "img", "resize"));
        assert!(set.supports("magick", "img", "@2x"));
        assert!(!set.supports("magick", "css", "resize"));
        assert!(set.supports("sprockets", "css", "accept"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(RegistryFormat::from_path(Path::new("a.json")), RegistryFormat::Json);
        assert_eq!(RegistryFormat::from_path(Path::new("a.JSON")), RegistryFormat::Json);
        assert_eq!(RegistryFormat::from_path(Path::new("a.yml")), RegistryFormat::Yaml);
        assert_eq!(RegistryFormat::from_path(Path::new("a")), RegistryFormat::Yaml);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let file = RegistryFile::from_yaml_str("version: \"1.0\"\n").unwrap();
        assert!(file.base_keys.is_empty());
        assert!(file.proxies.is_empty());
    }

    #[test]
    fn test_json_text() {
        let file = RegistryFile::from_json_str(
            r#"{"version":"1.0","proxies":[{"name":"magick","tags":["img"],"args":["@2x"]}]}"#,
        )
        .unwrap();
        let proxy = file.find_proxy("magick").unwrap();
        assert_eq!(proxy.tags, vec!["img"]);
        assert_eq!(proxy.flags().collect::<Vec<_>>(), vec!["2x"]);
    }

    #[test]
    fn test_save_and_load_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let file = RegistryFile::builtin().unwrap();

        for name in ["registry.yaml", "registry.json"] {
            let path = dir.path().join(name);
            file.save(&path).unwrap();
            assert_eq!(RegistryFile::load(&path).unwrap(), file, "{name}");
        }
    }
}
