use crate::error::VersionError;
use core::{
    cmp::Ordering,
    fmt::{self, Display},
};
use std::borrow::Cow;

/// The major part of a version: either a concrete number or the `NEXT`
/// placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Major {
    /// "Whatever the next release turns out to be." Orders above every
    /// concrete major.
    Next,

    /// A released (or explicitly chosen) major number.
    Value(u32),
}

/// The optional trailing parts of a version, accepted by
/// [`Version::from_parts`].
///
/// `prerelease` is a deprecated alias for `release_candidate`: supplying it
/// alone maps it onto `release_candidate` with a warning, supplying both is an
/// error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Qualifiers {
    /// The release candidate number; absent means final.
    pub release_candidate: Option<u32>,
    /// Deprecated alias for `release_candidate`.
    pub prerelease: Option<u32>,
    /// The post-release number.
    pub post: Option<u32>,
    /// The development snapshot number.
    pub dev: Option<u32>,
}

/// The comparison key: each optional part maps to a pair whose first
/// element settles the absent-versus-present direction, so plain tuple
/// comparison gives the right answer without infinity sentinels.
type OrderingKey = ((bool, u32), u32, u32, (bool, u32), (bool, u32), (bool, u32));

/// A version of a named package, in the `major.minor.micro[.rcN][.postN][.devN]`
/// scheme.
///
/// Versions are immutable values: every bump builds a new one. They render
/// with [`Version::public`] and compare with [`Version::compare`] (or the
/// comparison operators, which go mute instead of loud across packages).
///
/// ```
/// use incremental::Version;
///
/// let candidate = Version::new("widget", 24, 6, 0, Some(1), None, None);
/// let released = Version::new("widget", 24, 6, 0, None, None, None);
/// assert_eq!(candidate.public(), "24.6.0.rc1");
/// assert!(candidate < released);
/// ```
///
/// The `const` constructors work in `static` position, which is what the
/// generated `_version.rs` artifact relies on:
///
/// ```
/// use incremental::Version;
///
/// pub static VERSION: Version = Version::new("widget", 24, 6, 0, None, None, None);
/// ```
#[derive(Debug, Clone)]
pub struct Version {
    package: Cow<'static, str>,
    major: Major,
    minor: u32,
    micro: u32,
    release_candidate: Option<u32>,
    post: Option<u32>,
    dev: Option<u32>,
}

impl Version {
    /// Builds a concrete version. Usable in `const`/`static` position.
    pub const fn new(
        package: &'static str,
        major: u32,
        minor: u32,
        micro: u32,
        release_candidate: Option<u32>,
        post: Option<u32>,
        dev: Option<u32>,
    ) -> Self {
        Self {
            package: Cow::Borrowed(package),
            major: Major::Value(major),
            minor,
            micro,
            release_candidate,
            post,
            dev,
        }
    }

    /// Builds the `NEXT` placeholder version of a package. The only
    /// ways to get a `NEXT` major are this constructor and
    /// [`Version::from_parts`], both of which hold the other fields at
    /// zero/absent.
    pub const fn next(package: &'static str) -> Self {
        Self {
            package: Cow::Borrowed(package),
            major: Major::Next,
            minor: 0,
            micro: 0,
            release_candidate: None,
            post: None,
            dev: None,
        }
    }

    /// Runtime constructor: validates the `NEXT` invariant and normalizes the
    /// deprecated `prerelease` alias.
    ///
    /// # Errors
    ///
    /// - [`VersionError::EmptyPackage`] when `package` is empty.
    /// - [`VersionError::ConflictingPrerelease`] when both `release_candidate`
    ///   and `prerelease` are supplied.
    /// - [`VersionError::NextWithNonZeroFields`] when `major` is
    ///   [`Major::Next`] but any other field is nonzero or present.
    pub fn from_parts(
        package: impl Into<Cow<'static, str>>,
        major: Major,
        minor: u32,
        micro: u32,
        qualifiers: Qualifiers,
    ) -> Result<Self, VersionError> {
        let package = package.into();
        if package.is_empty() {
            return Err(VersionError::EmptyPackage);
        }

        let Qualifiers {
            release_candidate,
            prerelease,
            post,
            dev,
        } = qualifiers;

        let release_candidate = match (release_candidate, prerelease) {
            (Some(_), Some(_)) => return Err(VersionError::ConflictingPrerelease),
            (None, Some(prerelease)) => {
                eprintln!(
                    "warning: `prerelease` is deprecated, pass `release_candidate` instead"
                );
                Some(prerelease)
            }
            (release_candidate, None) => release_candidate,
        };

        if major == Major::Next
            && (minor != 0
                || micro != 0
                || release_candidate.is_some()
                || post.is_some()
                || dev.is_some())
        {
            return Err(VersionError::NextWithNonZeroFields);
        }

        Ok(Self {
            package,
            major,
            minor,
            micro,
            release_candidate,
            post,
            dev,
        })
    }

    /// Parses a version out of the `--newversion` grammar:
    /// `major[.minor[.micro]][.rcN][.postN][.devN]`, the dots before the
    /// qualifiers being optional, or the literal `NEXT`. Omitted minor/micro
    /// default to 0.
    ///
    /// # Errors
    ///
    /// - [`VersionError::Unparseable`] when `text` does not match the grammar.
    pub fn parse(
        package: impl Into<Cow<'static, str>>,
        text: &str,
    ) -> Result<Self, VersionError> {
        let unparseable = || VersionError::Unparseable {
            text: text.to_owned(),
        };

        if text == "NEXT" {
            return Self::from_parts(package, Major::Next, 0, 0, Qualifiers::default());
        }

        let mut rest = text;

        let major = take_number(&mut rest).ok_or_else(unparseable)?;
        let minor = take_release_part(&mut rest).unwrap_or(0);
        let micro = take_release_part(&mut rest).unwrap_or(0);

        let qualifiers = Qualifiers {
            release_candidate: take_qualifier(&mut rest, "rc"),
            post: take_qualifier(&mut rest, "post"),
            dev: take_qualifier(&mut rest, "dev"),
            ..Qualifiers::default()
        };

        if !rest.is_empty() {
            return Err(unparseable());
        }

        Self::from_parts(package, Major::Value(major), minor, micro, qualifiers)
            .map_err(|_| unparseable())
    }

    /// Compares two versions of the same package over the key
    /// `(major, minor, micro, release_candidate, post, dev)`, where a missing
    /// release candidate or dev number counts as greater than any present one
    /// and a missing post number counts as less.
    ///
    /// # Errors
    ///
    /// - [`VersionError::IncomparablePackages`] when the package names differ
    ///   (case-insensitively).
    pub fn compare(&self, other: &Self) -> Result<Ordering, VersionError> {
        if !self.package.eq_ignore_ascii_case(&other.package) {
            return Err(VersionError::IncomparablePackages {
                left: self.package.clone().into_owned(),
                right: other.package.clone().into_owned(),
            });
        }
        Ok(self.ordering_key().cmp(&other.ordering_key()))
    }

    /// Returns the PEP-440-style public string, e.g. `16.4.1`, `1.2.3.rc1`,
    /// `24.6.0.rc1.post2.dev3`, or the literal `NEXT`.
    pub fn public(&self) -> String {
        let major = match self.major {
            Major::Next => return "NEXT".to_owned(),
            Major::Value(major) => major,
        };

        let mut rendered = format!("{}.{}.{}", major, self.minor, self.micro);
        if let Some(rc) = self.release_candidate {
            rendered.push_str(&format!(".rc{rc}"));
        }
        if let Some(post) = self.post {
            rendered.push_str(&format!(".post{post}"));
        }
        if let Some(dev) = self.dev {
            rendered.push_str(&format!(".dev{dev}"));
        }
        rendered
    }

    /// Returns the friendly `"{package} {public}"` string.
    pub fn describe(&self) -> String {
        format!("{} {}", self.package, self.public())
    }

    /// The package this is a version of.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The major part, concrete or `NEXT`.
    pub const fn major(&self) -> Major {
        self.major
    }

    /// The minor part.
    pub const fn minor(&self) -> u32 {
        self.minor
    }

    /// The micro part.
    pub const fn micro(&self) -> u32 {
        self.micro
    }

    /// The release candidate number, if this is a release candidate.
    pub const fn release_candidate(&self) -> Option<u32> {
        self.release_candidate
    }

    /// The post-release number, if this is a post-release.
    pub const fn post(&self) -> Option<u32> {
        self.post
    }

    /// The development snapshot number, if this is a dev build.
    pub const fn dev(&self) -> Option<u32> {
        self.dev
    }

    fn ordering_key(&self) -> OrderingKey {
        let major = match self.major {
            Major::Next => (true, 0),
            Major::Value(major) => (false, major),
        };
        // absent rc/dev order above any present value, absent post below
        let release_candidate = match self.release_candidate {
            None => (true, 0),
            Some(rc) => (false, rc),
        };
        let post = match self.post {
            None => (false, 0),
            Some(post) => (true, post),
        };
        let dev = match self.dev {
            None => (true, 0),
            Some(dev) => (false, dev),
        };
        (major, self.minor, self.micro, release_candidate, post, dev)
    }
}

impl PartialEq for Version {
    /// Versions of differently-named packages are never equal; package names
    /// compare case-insensitively.
    fn eq(&self, other: &Self) -> bool {
        self.package.eq_ignore_ascii_case(&other.package)
            && self.ordering_key() == other.ordering_key()
    }
}

impl PartialOrd for Version {
    /// Returns `None` across packages. Use [`Version::compare`] where the
    /// failure should be loud.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.public())
    }
}

/// Consumes the leading digit run of `rest` as a number. Leaves `rest`
/// untouched and returns `None` when it does not start with a digit.
fn take_number(rest: &mut &str) -> Option<u32> {
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let (number, tail) = rest.split_at(digits);
    let number = number.parse().ok()?;
    *rest = tail;
    Some(number)
}

/// Consumes a `.{number}` release part, but not a `.rc1`-style qualifier.
fn take_release_part(rest: &mut &str) -> Option<u32> {
    let mut tail = rest.strip_prefix('.')?;
    let number = take_number(&mut tail)?;
    *rest = tail;
    Some(number)
}

/// Consumes a `[.]{label}{number}` qualifier such as `rc1` or `.post2`.
fn take_qualifier(rest: &mut &str, label: &str) -> Option<u32> {
    let mut tail = rest
        .strip_prefix('.')
        .unwrap_or(rest)
        .strip_prefix(label)?;
    let number = take_number(&mut tail)?;
    *rest = tail;
    Some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rstest::rstest;

    fn concrete(
        major: u32,
        minor: u32,
        micro: u32,
        release_candidate: Option<u32>,
        post: Option<u32>,
        dev: Option<u32>,
    ) -> Version {
        Version::new("whatever", major, minor, micro, release_candidate, post, dev)
    }

    #[test]
    fn test_const_construction() {
        static VERSION: Version = Version::new("whatever", 16, 4, 1, None, None, None);
        static PLACEHOLDER: Version = Version::next("whatever");

        assert_eq!(VERSION.public(), "16.4.1");
        assert_eq!(PLACEHOLDER.public(), "NEXT");
        assert_eq!(PLACEHOLDER.major(), Major::Next);
    }

    #[rstest]
    #[case(concrete(14, 4, 0, None, None, None), "14.4.0")]
    #[case(concrete(1, 2, 3, Some(1), None, None), "1.2.3.rc1")]
    #[case(concrete(1, 2, 3, None, Some(0), None), "1.2.3.post0")]
    #[case(concrete(16, 4, 0, None, None, Some(0)), "16.4.0.dev0")]
    #[case(concrete(14, 2, 1, Some(1), None, Some(9)), "14.2.1.rc1.dev9")]
    #[case(concrete(1, 2, 3, Some(1), Some(2), Some(3)), "1.2.3.rc1.post2.dev3")]
    #[case(Version::next("whatever"), "NEXT")]
    fn test_public(#[case] version: Version, #[case] expected: &str) {
        assert_eq!(version.public(), expected);
        assert_eq!(version.to_string(), expected);
    }

    #[test]
    fn test_describe() {
        let version = concrete(1, 2, 3, Some(1), None, None);
        assert_eq!(version.describe(), "whatever 1.2.3.rc1");
    }

    #[rstest]
    #[case("1", concrete(1, 0, 0, None, None, None))]
    #[case("1.1", concrete(1, 1, 0, None, None, None))]
    #[case("1.2.3", concrete(1, 2, 3, None, None, None))]
    #[case("1.2.3rc1", concrete(1, 2, 3, Some(1), None, None))]
    #[case("1.2.3.rc1", concrete(1, 2, 3, Some(1), None, None))]
    #[case("1.2.3rc1.post2.dev3", concrete(1, 2, 3, Some(1), Some(2), Some(3)))]
    #[case("1.2.3.post0", concrete(1, 2, 3, None, Some(0), None))]
    #[case("1.2.3dev0", concrete(1, 2, 3, None, None, Some(0)))]
    #[case("NEXT", Version::from_parts("whatever", Major::Next, 0, 0, Qualifiers::default()).unwrap())]
    fn test_parse(#[case] text: &str, #[case] expected: Version) {
        let parsed = Version::parse("whatever", text).unwrap();
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case("")]
    #[case("next")]
    #[case("a.b.c")]
    #[case("1.")]
    #[case("1.2.3.rc")]
    #[case("1.2.3.beta1")]
    #[case("1.2.3rc1extra")]
    #[case("1.2.3.dev1.rc1")] // qualifiers only parse in rc, post, dev order
    fn test_parse_rejects(#[case] text: &str) {
        let parsed = Version::parse("whatever", text);
        assert_eq!(
            parsed,
            Err(VersionError::Unparseable {
                text: text.to_owned()
            })
        );
    }

    #[test]
    fn test_render_parse_round_trip() {
        let versions = [
            concrete(1, 0, 0, None, None, None),
            concrete(1, 2, 3, Some(1), None, None),
            concrete(16, 4, 1, Some(2), Some(1), Some(3)),
            concrete(24, 6, 0, None, Some(0), None),
            concrete(24, 6, 0, None, None, Some(7)),
        ];

        for version in &versions {
            let reparsed = Version::parse("whatever", &version.public()).unwrap();
            assert_eq!(&reparsed, version);
        }
    }

    /// Versions in strictly ascending order; every pair must agree with the
    /// list order, which exercises the absent-rc/post/dev sentinels and the
    /// NEXT ceiling together.
    #[test]
    fn test_total_order() {
        let ascending = [
            "1.0.0.rc1.dev0",
            "1.0.0.rc1.dev1",
            "1.0.0.rc1",
            "1.0.0.rc1.post0.dev0",
            "1.0.0.rc1.post0",
            "1.0.0.rc2",
            "1.0.0.dev0",
            "1.0.0.dev1",
            "1.0.0",
            "1.0.0.post0.dev0",
            "1.0.0.post0",
            "1.0.0.post1",
            "1.0.1.rc1",
            "1.0.1",
            "1.1.0",
            "2.0.0",
            "NEXT",
        ]
        .map(|text| Version::parse("whatever", text).unwrap());

        for ((i, a), (j, b)) in ascending.iter().enumerate().tuple_combinations() {
            assert!(i < j);
            assert_eq!(a.compare(b).unwrap(), Ordering::Less, "{a} < {b}");
            assert_eq!(b.compare(a).unwrap(), Ordering::Greater, "{b} > {a}");
            assert!(a < b);
        }

        for version in &ascending {
            assert_eq!(version.compare(version).unwrap(), Ordering::Equal);
        }
    }

    #[rstest]
    #[case(Qualifiers { dev: Some(0), ..Qualifiers::default() })]
    #[case(Qualifiers { post: Some(3), ..Qualifiers::default() })]
    #[case(Qualifiers { release_candidate: Some(1), ..Qualifiers::default() })]
    fn test_qualified_versus_bare(#[case] qualifiers: Qualifiers) {
        let bare = concrete(1, 2, 3, None, None, None);
        let qualified =
            Version::from_parts("whatever", Major::Value(1), 2, 3, qualifiers).unwrap();

        if qualifiers.post.is_some() {
            assert!(qualified > bare);
        } else {
            assert!(qualified < bare);
        }
    }

    #[test]
    fn test_next_above_everything() {
        let placeholder = Version::next("whatever");
        let concretes = [
            concrete(u32::MAX, 99, 99, None, Some(99), None),
            concrete(1, 2, 3, Some(1), None, Some(2)),
            concrete(0, 0, 0, None, None, None),
        ];

        for version in &concretes {
            assert!(placeholder > *version);
            assert!(*version < placeholder);
        }
    }

    #[test]
    fn test_package_case_insensitive() {
        let lower = concrete(1, 2, 3, None, None, None);
        let upper = Version::new("Whatever", 1, 2, 3, None, None, None);
        assert_eq!(lower, upper);
        assert_eq!(lower.compare(&upper).unwrap(), Ordering::Equal);
    }

    #[test]
    fn test_incomparable_packages() {
        let gizmo = Version::new("gizmo", 1, 2, 3, None, None, None);
        let widget = Version::new("widget", 1, 2, 3, None, None, None);

        assert_eq!(
            gizmo.compare(&widget),
            Err(VersionError::IncomparablePackages {
                left: "gizmo".to_owned(),
                right: "widget".to_owned(),
            })
        );
        assert!(gizmo.partial_cmp(&widget).is_none());
        assert_ne!(gizmo, widget);
    }

    #[rstest]
    #[case(1, 0, Qualifiers::default())]
    #[case(0, 1, Qualifiers::default())]
    #[case(0, 0, Qualifiers { release_candidate: Some(1), ..Qualifiers::default() })]
    #[case(0, 0, Qualifiers { post: Some(0), ..Qualifiers::default() })]
    #[case(0, 0, Qualifiers { dev: Some(0), ..Qualifiers::default() })]
    fn test_next_invariant(#[case] minor: u32, #[case] micro: u32, #[case] qualifiers: Qualifiers) {
        let version = Version::from_parts("whatever", Major::Next, minor, micro, qualifiers);
        assert_eq!(version, Err(VersionError::NextWithNonZeroFields));
    }

    #[test]
    fn test_prerelease_alias() {
        let qualifiers = Qualifiers {
            prerelease: Some(2),
            ..Qualifiers::default()
        };
        let version =
            Version::from_parts("whatever", Major::Value(1), 2, 3, qualifiers).unwrap();
        assert_eq!(version.release_candidate(), Some(2));
        assert_eq!(version.public(), "1.2.3.rc2");
    }

    #[test]
    fn test_prerelease_conflict() {
        let qualifiers = Qualifiers {
            release_candidate: Some(1),
            prerelease: Some(2),
            ..Qualifiers::default()
        };
        let version = Version::from_parts("whatever", Major::Value(1), 2, 3, qualifiers);
        assert_eq!(version, Err(VersionError::ConflictingPrerelease));
    }

    #[test]
    fn test_empty_package() {
        let version = Version::from_parts("", Major::Value(1), 0, 0, Qualifiers::default());
        assert_eq!(version, Err(VersionError::EmptyPackage));
    }
}
