//! The update engine: validates one bump request, computes the next version,
//! and rewrites the files that declare it.

use crate::artifact;
use crate::config;
use crate::error::UpdateError;
use crate::version::{Qualifiers, Version};
use chrono::{Datelike, NaiveDate};
use std::path::{Path, PathBuf};

/// The calendar scheme maps a date to `{year - 2000}.{month}.0`.
const YEAR_EPOCH: i32 = 2000;

/// One `incremental update` invocation, as the CLI hands it over. At most one
/// of the bump fields may be set; [`run`] validates that before touching
/// anything.
#[derive(Debug, Clone, Default)]
pub struct BumpRequest {
    /// The package whose version to update.
    pub package: String,
    /// The package directory, overriding discovery when given.
    pub path: Option<PathBuf>,
    /// An explicit next version, bypassing the bump logic.
    pub newversion: Option<String>,
    /// Increment the micro version.
    pub patch: bool,
    /// Start or advance a release candidate.
    pub rc: bool,
    /// Number a post-release correction.
    pub post: bool,
    /// Mark or advance a development snapshot.
    pub dev: bool,
    /// Write the first version file for the package.
    pub create: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Mode {
    Create,
    Dev,
    Patch,
    Rc,
    Post,
    Final,
    New(String),
}

impl BumpRequest {
    fn mode(&self) -> Result<Mode, UpdateError> {
        let picked = [self.patch, self.rc, self.post, self.dev, self.create]
            .into_iter()
            .filter(|&flag| flag)
            .count()
            + usize::from(self.newversion.is_some());
        if picked > 1 {
            return Err(UpdateError::FlagConflict);
        }

        Ok(if let Some(text) = &self.newversion {
            Mode::New(text.clone())
        } else if self.create {
            Mode::Create
        } else if self.dev {
            Mode::Dev
        } else if self.patch {
            Mode::Patch
        } else if self.rc {
            Mode::Rc
        } else if self.post {
            Mode::Post
        } else {
            Mode::Final
        })
    }
}

/// What [`run`] did: the version now stored for the package and the files it
/// rewrote, in the order they were written.
#[derive(Debug)]
pub struct UpdateOutcome {
    /// The version now stored for the package.
    pub version: Version,
    /// The files rewritten, in write order.
    pub written: Vec<PathBuf>,
}

/// Performs one bump for `request`. The package directory is `request.path`
/// when given, otherwise discovered under `base`; `today` feeds the calendar
/// scheme (callers pass the clock, tests pass a pinned date).
///
/// All validation happens before any write: an invalid flag combination, a
/// missing or unexpectedly present artifact, or a final release without a
/// prior rc each fail with the files untouched.
pub fn run(
    request: &BumpRequest,
    base: &Path,
    today: NaiveDate,
) -> Result<UpdateOutcome, UpdateError> {
    let mode = request.mode()?;

    let package_dir = match &request.path {
        Some(path) => path.clone(),
        None => config::find_package_path(base, &request.package)?,
    };
    let version_path = artifact::artifact_path(&package_dir);

    let (existing, next) = if mode == Mode::Create {
        if version_path.exists() {
            return Err(UpdateError::AlreadyCreated {
                package: request.package.clone(),
                path: version_path,
            });
        }
        // a fresh version also seeds the entry-file patch, pinning any
        // NEXT scaffolding to it
        let created = calendar_version(&request.package, today, None)?;
        (created.clone(), created)
    } else {
        if !version_path.is_file() {
            return Err(UpdateError::NoExistingVersion {
                package: request.package.clone(),
            });
        }
        let existing = artifact::read(&version_path)?;
        let next = next_version(&request.package, &existing, &mode, today)?;
        (existing, next)
    };

    let mut written = Vec::new();

    if let Some(entry) = entry_file(&package_dir) {
        if artifact::patch_entry(&entry, &existing, &next)? {
            written.push(entry);
        }
    }

    artifact::write(&version_path, &next)?;
    written.push(version_path);

    Ok(UpdateOutcome {
        version: next,
        written,
    })
}

/// The bump state machine: one arm per mode, each building a fresh
/// [`Version`] from the existing one.
fn next_version(
    package: &str,
    existing: &Version,
    mode: &Mode,
    today: NaiveDate,
) -> Result<Version, UpdateError> {
    let package = package.to_owned();
    let next = match mode {
        Mode::Create => unreachable!("create never reads an existing version"),

        Mode::New(text) => Version::parse(package, text)?,

        // dev keeps any rc, drops any post
        Mode::Dev => Version::from_parts(
            package,
            existing.major(),
            existing.minor(),
            existing.micro(),
            Qualifiers {
                release_candidate: existing.release_candidate(),
                dev: Some(existing.dev().map_or(0, |dev| dev + 1)),
                ..Qualifiers::default()
            },
        )?,

        // patch releases are always final
        Mode::Patch => Version::from_parts(
            package,
            existing.major(),
            existing.minor(),
            existing.micro() + 1,
            Qualifiers::default(),
        )?,

        Mode::Rc => match existing.release_candidate() {
            Some(rc) => Version::from_parts(
                package,
                existing.major(),
                existing.minor(),
                existing.micro(),
                Qualifiers {
                    release_candidate: Some(rc + 1),
                    ..Qualifiers::default()
                },
            )?,
            None => calendar_version(&package, today, Some(1))?,
        },

        Mode::Post => Version::from_parts(
            package,
            existing.major(),
            existing.minor(),
            existing.micro(),
            Qualifiers {
                post: Some(existing.post().map_or(0, |post| post + 1)),
                ..Qualifiers::default()
            },
        )?,

        Mode::Final => {
            if existing.release_candidate().is_none() {
                return Err(UpdateError::FinalWithoutRc);
            }
            Version::from_parts(
                package,
                existing.major(),
                existing.minor(),
                existing.micro(),
                Qualifiers::default(),
            )?
        }
    };
    Ok(next)
}

fn calendar_version(
    package: &str,
    today: NaiveDate,
    release_candidate: Option<u32>,
) -> Result<Version, UpdateError> {
    let year = today.year();
    if year < YEAR_EPOCH {
        return Err(UpdateError::YearBeforeEpoch { year });
    }
    let version = Version::from_parts(
        package.to_owned(),
        crate::version::Major::Value((year - YEAR_EPOCH) as u32),
        today.month(),
        0,
        Qualifiers {
            release_candidate,
            ..Qualifiers::default()
        },
    )?;
    Ok(version)
}

/// The package's entry-point file, which may carry the optional scaffolding
/// declarations.
fn entry_file(package_dir: &Path) -> Option<PathBuf> {
    ["lib.rs", "mod.rs"]
        .into_iter()
        .map(|name| package_dir.join(name))
        .find(|candidate| candidate.is_file())
}
