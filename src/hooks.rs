//! The build-backend surface: read the stored version for a project, refuse
//! to set it, and emit it as `cargo:` directives from a build script.

use crate::artifact;
use crate::config::{self, VersionConfig};
use crate::error::HookError;
use std::path::Path;

/// Returns the public version string stored for the project rooted at `root`.
/// Being wired up as a version source implies opt-in, so a `Cargo.toml` with
/// no marker still resolves; a project with no `Cargo.toml` at all is
/// [`HookError::NotConfigured`].
pub fn get_version(root: &Path) -> Result<String, HookError> {
    let config = load_required(root)?;
    let version = artifact::read(&artifact::artifact_path(&config.path))?;
    Ok(version.public())
}

/// Setting the version through the backend is unsupported: always fails,
/// naming the `incremental update --newversion` invocation to run instead.
pub fn set_version(root: &Path, version: &str) -> Result<(), HookError> {
    let config = load_required(root)?;
    Err(HookError::SetVersionUnsupported {
        package: config.package,
        version: version.to_owned(),
    })
}

/// Build-script helper: prints the `cargo:rustc-env=INCREMENTAL_VERSION=…`
/// and `cargo:rerun-if-changed=…` directives for the project rooted at
/// `root`, returning the emitted version string. A project that has not opted
/// in emits nothing and returns `None`.
pub fn emit_version(root: &Path) -> Result<Option<String>, HookError> {
    let Some(config) = config::load_config(&root.join("Cargo.toml"), false)? else {
        return Ok(None);
    };
    let path = artifact::artifact_path(&config.path);
    let version = artifact::read(&path)?.public();

    println!("cargo:rustc-env=INCREMENTAL_VERSION={version}");
    println!("cargo:rerun-if-changed={}", path.display());
    Ok(Some(version))
}

fn load_required(root: &Path) -> Result<VersionConfig, HookError> {
    config::load_config(&root.join("Cargo.toml"), true)?.ok_or_else(|| {
        HookError::NotConfigured {
            root: root.to_owned(),
        }
    })
}
