//! # incremental
//!
//! A versioning tool that stores a package's version in a generated source
//! file and bumps it for you.
//!
//! The version itself is a [`Version`] value in the
//! `major.minor.micro[.rcN][.postN][.devN]` scheme, with a `NEXT` placeholder
//! major for "whatever the next release turns out to be":
//!
//! ```
//! use incremental::Version;
//!
//! let candidate = Version::new("widget", 24, 6, 0, Some(1), None, None);
//! let released = Version::new("widget", 24, 6, 0, None, None, None);
//!
//! assert_eq!(candidate.public(), "24.6.0.rc1");
//! assert!(candidate < released);
//! assert!(released < Version::next("widget"));
//! ```
//!
//! Versions of two different packages never compare quietly:
//!
//! ```
//! use incremental::Version;
//!
//! let widget = Version::new("widget", 1, 0, 0, None, None, None);
//! let gizmo = Version::new("gizmo", 2, 0, 0, None, None, None);
//! assert!(widget.compare(&gizmo).is_err());
//! ```
//!
//! ## Storing a version
//!
//! A managed package keeps its version in a generated `_version.rs` next to
//! its sources, holding nothing but a `pub static VERSION: Version`
//! construction. The `incremental update` command computes the next version
//! from release-type flags (`--rc`, `--patch`, `--post`, `--dev`, `--create`,
//! or an explicit `--newversion`) and rewrites that file, along with any
//! `INTRODUCED_IN` / `NEXT_RELEASED_VERSION` scaffolding in the package's
//! entry file. See [`update`] for the engine behind the command.
//!
//! ## Build-time access
//!
//! The [`hooks`] module reads the stored version back out for build tooling:
//! [`hooks::get_version`] for a plain query, and [`hooks::emit_version`] for
//! build scripts, which makes the version available to the host crate as the
//! `INCREMENTAL_VERSION` environment variable:
//!
//! ```no_run
//! // build.rs
//! fn main() {
//!     incremental::hooks::emit_version(std::path::Path::new(".")).unwrap();
//! }
//! ```
//!
//! Projects opt in through a `[package.metadata.incremental]` table in their
//! `Cargo.toml`; see [`config`].
#![warn(missing_docs)]

pub mod artifact;
pub mod config;
mod error;
pub mod hooks;
pub mod update;
mod version;

pub use crate::error::{ArtifactError, ConfigError, HookError, UpdateError, VersionError};
pub use crate::version::{Major, Qualifiers, Version};
