//! Discovery of which package to operate on, from `Cargo.toml` and the
//! on-disk package layout.

use crate::error::ConfigError;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use toml::Value;

/// Which package a project manages with incremental, and where its sources
/// live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConfig {
    /// The package name, as configured.
    pub package: String,
    /// The package's source directory.
    pub path: PathBuf,
}

/// Reads the `Cargo.toml` at `manifest` and decides whether the project has
/// opted in to incremental versioning.
///
/// Opt-in is a `[package.metadata.incremental]` table, or `implied_opt_in`
/// for surfaces where registration already implies it. The package name comes
/// from the marker's `name` key, falling back to `[package] name`; a marker
/// name that disagrees with the package name wins, with a warning. Returns
/// `Ok(None)` when the file is absent or the project has not opted in.
///
/// # Errors
///
/// Each way the configuration can be malformed gets its own
/// [`ConfigError`] variant: a non-table marker, unexpected marker keys, a
/// missing or non-string name, and a package name no directory matches.
pub fn load_config(
    manifest: &Path,
    implied_opt_in: bool,
) -> Result<Option<VersionConfig>, ConfigError> {
    let text = match fs::read_to_string(manifest) {
        Ok(text) => text,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(error) => {
            return Err(ConfigError::Unreadable {
                path: manifest.to_owned(),
                message: error.to_string(),
            })
        }
    };
    let value: Value = text.parse().map_err(|error: toml::de::Error| ConfigError::Toml {
        path: manifest.to_owned(),
        message: error.message().to_owned(),
    })?;

    let package_table = value.get("package");
    let marker = match package_table
        .and_then(|package| package.get("metadata"))
        .and_then(|metadata| metadata.get("incremental"))
    {
        Some(Value::Table(table)) => Some(table),
        Some(_) => return Err(ConfigError::MarkerNotATable),
        None => None,
    };

    if marker.is_none() && !implied_opt_in {
        return Ok(None);
    }

    let marker_name = match marker {
        Some(table) => {
            if let Some(key) = table.keys().find(|key| *key != "name") {
                return Err(ConfigError::UnexpectedKey { key: key.clone() });
            }
            match table.get("name") {
                Some(Value::String(name)) => Some(name.clone()),
                Some(_) => return Err(ConfigError::NameNotAString),
                None => None,
            }
        }
        None => None,
    };
    let fallback_name = match package_table.and_then(|package| package.get("name")) {
        Some(Value::String(name)) => Some(name.clone()),
        Some(_) => return Err(ConfigError::NameNotAString),
        None => None,
    };

    let package = match (marker_name, fallback_name) {
        (Some(marker_name), Some(fallback_name)) => {
            if !marker_name.eq_ignore_ascii_case(&fallback_name) {
                eprintln!(
                    "warning: `[package.metadata.incremental]` name `{marker_name}` overrides `[package]` name `{fallback_name}`"
                );
            }
            marker_name
        }
        (Some(name), None) | (None, Some(name)) => name,
        (None, None) => return Err(ConfigError::NameMissing),
    };

    let root = manifest.parent().unwrap_or_else(|| Path::new("."));
    let path = find_package_path(root, &package)?;

    Ok(Some(VersionConfig { package, path }))
}

/// Resolves the source directory of `package` under `root`: `src/<name>`
/// first, then `<name>`, the name lowercased either way.
pub fn find_package_path(root: &Path, package: &str) -> Result<PathBuf, ConfigError> {
    let name = package.to_ascii_lowercase();
    [root.join("src").join(&name), root.join(&name)]
        .into_iter()
        .find(|candidate| candidate.is_dir())
        .ok_or_else(|| ConfigError::PackageDirNotFound {
            package: package.to_owned(),
            root: root.to_owned(),
        })
}
