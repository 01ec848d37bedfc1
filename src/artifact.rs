//! The generated `_version.rs` artifact: byte-exact template rendering, the
//! construction-expression read path, and the entry-file scaffolding patch.

use crate::error::ArtifactError;
use crate::version::{Major, Qualifiers, Version};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// The version file of the package rooted at `package_dir`.
pub fn artifact_path(package_dir: &Path) -> PathBuf {
    package_dir.join("_version.rs")
}

/// Renders the full `_version.rs` text for `version`. Fixed shape; readers of
/// the artifact depend on it byte for byte.
pub fn render(version: &Version) -> String {
    format!(
        "//! Provides {package} version information.\n\
         \n\
         // This file is auto-generated! Do not edit!\n\
         // Use `incremental` to change this file.\n\
         \n\
         use incremental::Version;\n\
         \n\
         pub static VERSION: Version = {construction};\n",
        package = version.package(),
        construction = construction(version),
    )
}

/// Renders the construction expression for `version`, e.g.
/// `Version::new("widget", 1, 2, 3, Some(1), None, None)` or
/// `Version::next("widget")`.
pub fn construction(version: &Version) -> String {
    match version.major() {
        Major::Next => format!("Version::next(\"{}\")", version.package()),
        Major::Value(major) => format!(
            "Version::new(\"{}\", {}, {}, {}, {}, {}, {})",
            version.package(),
            major,
            version.minor(),
            version.micro(),
            option(version.release_candidate()),
            option(version.post()),
            option(version.dev()),
        ),
    }
}

fn option(value: Option<u32>) -> String {
    match value {
        Some(value) => format!("Some({value})"),
        None => "None".to_owned(),
    }
}

/// Writes the artifact for `version` at `path`, clobbering whatever is there.
pub fn write(path: &Path, version: &Version) -> Result<(), ArtifactError> {
    fs::write(path, render(version)).map_err(|source| ArtifactError::Io {
        path: path.to_owned(),
        source,
    })
}

/// Reads the version stored at `path` by evaluating its single construction
/// expression. The artifact's only supported shape is the one [`render`]
/// produces (plus the deprecated `.with_prerelease(N)` trailer), so this is a
/// read of structured data, not a Rust parser.
pub fn read(path: &Path) -> Result<Version, ArtifactError> {
    if !path.is_file() {
        return Err(ArtifactError::Missing {
            path: path.to_owned(),
        });
    }
    let text = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_owned(),
        source,
    })?;

    for line in text.lines() {
        if let Some(expression) = line.trim().strip_prefix("pub static VERSION: Version =") {
            let expression = expression.trim().trim_end_matches(';');
            return parse_construction(expression, path);
        }
    }

    Err(ArtifactError::MissingConstruction {
        path: path.to_owned(),
    })
}

fn parse_construction(expression: &str, path: &Path) -> Result<Version, ArtifactError> {
    let malformed = || ArtifactError::MalformedConstruction {
        path: path.to_owned(),
        expression: expression.to_owned(),
    };

    if let Some(arguments) = call_arguments(expression, "Version::next") {
        let package = quoted(&arguments).ok_or_else(malformed)?;
        let version =
            Version::from_parts(package.to_owned(), Major::Next, 0, 0, Qualifiers::default())?;
        return Ok(version);
    }

    // `.with_prerelease(N)` is the deprecated alias's spelling; peel it off
    // and let construction normalization handle it.
    let (expression_head, prerelease) = match expression.rfind(".with_prerelease") {
        Some(at) => {
            let trailer = &expression[at + 1..];
            let arguments = call_arguments(trailer, "with_prerelease").ok_or_else(malformed)?;
            let prerelease = arguments.parse().map_err(|_| malformed())?;
            (&expression[..at], Some(prerelease))
        }
        None => (expression, None),
    };

    let arguments = call_arguments(expression_head, "Version::new").ok_or_else(malformed)?;
    let arguments: Vec<&str> = arguments.split(',').map(str::trim).collect();
    let [package, major, minor, micro, release_candidate, post, dev] = arguments[..] else {
        return Err(malformed());
    };

    let package = quoted(package).ok_or_else(malformed)?;
    let major = major.parse().map_err(|_| malformed())?;
    let minor = minor.parse().map_err(|_| malformed())?;
    let micro = micro.parse().map_err(|_| malformed())?;
    let qualifiers = Qualifiers {
        release_candidate: parse_option(release_candidate).ok_or_else(malformed)?,
        prerelease,
        post: parse_option(post).ok_or_else(malformed)?,
        dev: parse_option(dev).ok_or_else(malformed)?,
    };

    let version = Version::from_parts(
        package.to_owned(),
        Major::Value(major),
        minor,
        micro,
        qualifiers,
    )?;
    Ok(version)
}

/// Strips `name(` and the closing `)` from a call expression, returning the
/// argument text.
fn call_arguments<'e>(expression: &'e str, name: &str) -> Option<&'e str> {
    expression
        .trim()
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .trim_end()
        .strip_suffix(')')
        .map(str::trim)
}

fn quoted(argument: &str) -> Option<&str> {
    let inner = argument.strip_prefix('"')?.strip_suffix('"')?;
    (!inner.is_empty() && !inner.contains('"')).then_some(inner)
}

fn parse_option(argument: &str) -> Option<Option<u32>> {
    if argument == "None" {
        return Some(None);
    }
    let inner = call_arguments(argument, "Some")?;
    inner.parse().ok().map(Some)
}

/// Rewrites the scaffolding declarations of the entry file at `path` to point
/// at `next`, leaving every other line untouched. Returns whether the file
/// changed; a file without scaffolding passes through as a no-op.
pub fn patch_entry(
    path: &Path,
    previous: &Version,
    next: &Version,
) -> Result<bool, ArtifactError> {
    let io = |source| ArtifactError::Io {
        path: path.to_owned(),
        source,
    };

    let original = fs::read_to_string(path).map_err(io)?;
    let patched = patch_text(&original, previous, next);
    if patched == original {
        return Ok(false);
    }
    fs::write(path, patched).map_err(io)?;
    Ok(true)
}

/// The pure half of [`patch_entry`]: replaces NEXT-sentinel scaffolding, and,
/// while the previous version is a release candidate, the previous rc's
/// scaffolding too. Already-final "introduced in" markers are left alone, so
/// a final release pins them for good.
pub fn patch_text(text: &str, previous: &Version, next: &Version) -> String {
    let package = next.package();
    let next_construction = construction(next);
    let next_described = next.describe();

    let mut patched = text.to_owned();

    if previous.release_candidate().is_some() {
        patched = patched.replace(&construction(previous), &next_construction);
        patched = patched.replace(&previous.describe(), &next_described);
    }

    patched = patched.replace(
        &format!("Version::next(\"{package}\")"),
        &next_construction,
    );
    patched = patched.replace(&format!("{package} NEXT"), &next_described);

    patched
}
