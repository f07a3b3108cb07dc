//! Distribution identity and package-management family.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Identity reported for hosts no detection source could identify.
pub const UNKNOWN_ID: &str = "unknown";

/// Raw identity strings and the family each one belongs to.
///
/// The first column is what `/etc/os-release` `ID`, `lsb_release -si`
/// (lowercased) or a release-marker token may produce.
const FAMILY_TABLE: &[(&str, DistroFamily)] = &[
    ("debian", DistroFamily::DebianLike),
    ("ubuntu", DistroFamily::DebianLike),
    ("kali", DistroFamily::DebianLike),
    ("linuxmint", DistroFamily::DebianLike),
    ("pop", DistroFamily::DebianLike),
    ("raspbian", DistroFamily::DebianLike),
    ("fedora", DistroFamily::RpmLike),
    ("centos", DistroFamily::RpmLike),
    ("rhel", DistroFamily::RpmLike),
    ("redhatenterprise", DistroFamily::RpmLike),
    ("redhatenterpriseserver", DistroFamily::RpmLike),
    // First token of "Red Hat Enterprise Linux release N" in /etc/redhat-release
    ("red", DistroFamily::RpmLike),
    ("arch", DistroFamily::ArchLike),
    ("archlinux", DistroFamily::ArchLike),
    ("manjaro", DistroFamily::ArchLike),
    ("manjarolinux", DistroFamily::ArchLike),
    ("endeavouros", DistroFamily::ArchLike),
];

/// The package-management ecosystem a host belongs to.
///
/// Each supported family has exactly one installation recipe; matching on
/// this enum is exhaustive, so adding a family forces every consumer to
/// handle it.
///
/// # Example
///
/// ```rust
/// use steam_bootstrap::DistroFamily;
///
/// assert_eq!(DistroFamily::from_id("ubuntu"), DistroFamily::DebianLike);
/// assert_eq!(DistroFamily::from_id("Fedora"), DistroFamily::RpmLike);
/// assert_eq!(DistroFamily::from_id("gentoo"), DistroFamily::Unsupported);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter)]
pub enum DistroFamily {
    /// apt/dpkg based (Debian, Ubuntu and derivatives).
    DebianLike,
    /// dnf/rpm based (Fedora, CentOS, RHEL).
    RpmLike,
    /// pacman based (Arch and derivatives).
    ArchLike,
    /// No recipe exists for this host.
    Unsupported,
}

impl DistroFamily {
    /// Map a raw identity string to its family.
    ///
    /// Matching is case-insensitive; anything not in the table is
    /// [`DistroFamily::Unsupported`].
    pub fn from_id(id: &str) -> Self {
        let id = id.trim().to_lowercase();
        FAMILY_TABLE
            .iter()
            .find(|(raw, _)| *raw == id)
            .map(|(_, family)| *family)
            .unwrap_or(Self::Unsupported)
    }

    /// The package manager every recipe of this family drives.
    ///
    /// `None` for [`DistroFamily::Unsupported`].
    pub fn package_manager(&self) -> Option<&'static str> {
        match self {
            Self::DebianLike => Some("apt-get"),
            Self::RpmLike => Some("dnf"),
            Self::ArchLike => Some("pacman"),
            Self::Unsupported => None,
        }
    }

    /// Human-readable display name for the family.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::DebianLike => "Debian-like",
            Self::RpmLike => "RPM-like",
            Self::ArchLike => "Arch-like",
            Self::Unsupported => "unsupported",
        }
    }

    /// Whether a recipe exists for this family.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }

    /// Iterator over all families, including [`DistroFamily::Unsupported`].
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as IntoEnumIterator>::iter()
    }

    /// The raw identities that map to this family.
    pub fn known_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        FAMILY_TABLE
            .iter()
            .filter(move |(_, family)| family == self)
            .map(|(raw, _)| *raw)
    }
}

/// A detected distribution.
///
/// Computed once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    /// Normalized lowercase identity; never empty.
    pub id: String,

    /// `VERSION_ID` from os-release, when known.
    pub version_id: Option<String>,

    /// Family derived from `id`.
    pub family: DistroFamily,
}

impl Distribution {
    /// Build a distribution from a raw identity.
    ///
    /// The identity is trimmed and lowercased; an empty identity becomes
    /// [`UNKNOWN_ID`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use steam_bootstrap::{Distribution, DistroFamily};
    ///
    /// let distro = Distribution::new(" Ubuntu ", Some("24.04".to_string()));
    /// assert_eq!(distro.id, "ubuntu");
    /// assert_eq!(distro.family, DistroFamily::DebianLike);
    ///
    /// assert_eq!(Distribution::new("", None).id, "unknown");
    /// ```
    pub fn new(id: &str, version_id: Option<String>) -> Self {
        let id = id.trim().to_lowercase();
        let id = if id.is_empty() {
            UNKNOWN_ID.to_string()
        } else {
            id
        };
        let family = DistroFamily::from_id(&id);
        Self {
            id,
            version_id,
            family,
        }
    }

    /// The sentinel distribution for unidentifiable hosts.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_ID, None)
    }
}
