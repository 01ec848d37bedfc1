use std::path::PathBuf;

/// Errors from constructing, parsing, or comparing [`Version`](crate::Version)
/// values.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum VersionError {
    #[error("When using NEXT, all other values except package must be 0")]
    NextWithNonZeroFields,

    #[error("Supply either release_candidate or prerelease, not both")]
    ConflictingPrerelease,

    #[error("Package name should not be empty")]
    EmptyPackage,

    #[error("Versions of `{left}` and `{right}` are not comparable")]
    IncomparablePackages { left: String, right: String },

    #[error("Cannot parse `{text}` as a version")]
    Unparseable { text: String },
}

/// Errors from reading or writing the generated `_version.rs` artifact and
/// from patching entry-file scaffolding.
#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    #[error("No version file found at `{path}`")]
    Missing { path: PathBuf },

    #[error("`{path}` does not declare a VERSION")]
    MissingConstruction { path: PathBuf },

    #[error("`{path}` holds `{expression}`, which is not a Version construction")]
    MalformedConstruction { path: PathBuf, expression: String },

    #[error("Could not access `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Errors from the `Cargo.toml` discovery contract.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("`[package.metadata.incremental]` should be a table")]
    MarkerNotATable,

    #[error("Unexpected key `{key}` in `[package.metadata.incremental]`")]
    UnexpectedKey { key: String },

    #[error("The package name should be a string")]
    NameNotAString,

    #[error(
        "No package name found: add `name` under `[package.metadata.incremental]` or `[package]`"
    )]
    NameMissing,

    #[error("No directory for package `{package}` under `{root}` or `{root}/src`")]
    PackageDirNotFound { package: String, root: PathBuf },

    #[error("Could not read `{path}`: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("`{path}` is not valid TOML: {message}")]
    Toml { path: PathBuf, message: String },
}

/// Errors from one `incremental update` invocation.
#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error("Only give one of --newversion, --patch, --rc, --post, --dev, --create")]
    FlagConflict,

    #[error("No version file exists for `{package}` yet. Use --create to make one")]
    NoExistingVersion { package: String },

    #[error("A version file already exists for `{package}` at `{path}`")]
    AlreadyCreated { package: String, path: PathBuf },

    #[error("You need to issue a rc before updating the major/minor")]
    FinalWithoutRc,

    #[error("The clock year {year} is before the calendar scheme epoch")]
    YearBeforeEpoch { year: i32 },

    #[error("Could not write `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors from the build-backend hook surface.
#[derive(thiserror::Error, Debug)]
pub enum HookError {
    #[error(
        "`{root}` is not set up for incremental: add `[package.metadata.incremental]` to its Cargo.toml"
    )]
    NotConfigured { root: PathBuf },

    #[error(
        "Run `incremental update {package} --newversion {version}` to set the version.\n\nSee `incremental --help` for more options."
    )]
    SetVersionUnsupported { package: String, version: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}
