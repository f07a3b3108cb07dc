//! Installation recipes for each supported distribution family.
//!
//! Every function here is pure: it only assembles [`Recipe`] values. Which
//! recipe applies to a host is decided by [`recipe_for`].

use super::recipe::{Recipe, RecipeStep, StepAction};
use crate::{CommandSpec, Distribution, DistroFamily, HostPaths, InstallError};

/// Package and executable name of the target application.
pub const TARGET_PACKAGE: &str = "steam";

/// Pinned package-file URL used when the apt repository install fails.
pub const STEAM_DEB_URL: &str = "https://cdn.akamai.steamstatic.com/client/installer/steam.deb";

/// File name the downloaded package is stored under.
const STEAM_DEB_FILE: &str = "steam.deb";

const DEBIAN_CRITICAL_LIBS: &[&str] = &["libgl1-mesa-dri:i386", "libgl1:i386", "libdrm2:i386"];
const DEBIAN_EXTRA_LIBS: &[&str] = &["libvulkan1:i386", "mesa-vulkan-drivers:i386", "libgbm1:i386"];

const RPM_CRITICAL_LIBS: &[&str] = &["mesa-libGL.i686", "mesa-dri-drivers.i686", "libdrm.i686"];
const RPM_EXTRA_LIBS: &[&str] = &["mesa-vulkan-drivers.i686", "vulkan-loader.i686"];

const ARCH_CRITICAL_LIBS: &[&str] = &["lib32-mesa", "lib32-libglvnd", "lib32-libdrm"];
const ARCH_EXTRA_LIBS: &[&str] = &["lib32-vulkan-icd-loader", "lib32-systemd"];

/// Select the recipe for `distro`.
///
/// `release_major` is only consulted for RPM-like hosts, where it
/// parameterizes the RPM Fusion repository URL. Without it, or for any
/// unsupported identity, an [`InstallError::UnsupportedEnvironment`] is
/// returned and nothing has been run.
///
/// # Example
///
/// ```rust
/// use steam_bootstrap::{recipe_for, Distribution, HostPaths};
///
/// let ubuntu = Distribution::new("ubuntu", Some("24.04".to_string()));
/// let recipe = recipe_for(&ubuntu, None, &HostPaths::default()).unwrap();
/// assert!(!recipe.steps.is_empty());
///
/// let gentoo = Distribution::new("gentoo", None);
/// assert!(recipe_for(&gentoo, None, &HostPaths::default()).is_err());
/// ```
pub fn recipe_for(
    distro: &Distribution,
    release_major: Option<u32>,
    paths: &HostPaths,
) -> Result<Recipe, InstallError> {
    match distro.family {
        DistroFamily::DebianLike => Ok(debian_recipe(paths)),
        DistroFamily::RpmLike => match release_major {
            Some(major) => Ok(rpm_recipe(distro, major)),
            None => Err(InstallError::UnsupportedEnvironment {
                id: distro.id.clone(),
                reason: "could not determine the release version".to_string(),
                fix: "Set VERSION_ID in /etc/os-release or install rpmfusion-nonfree-release and steam manually with dnf".to_string(),
            }),
        },
        DistroFamily::ArchLike => Ok(arch_recipe(paths)),
        DistroFamily::Unsupported => Err(InstallError::UnsupportedEnvironment {
            id: distro.id.clone(),
            reason: "no installation recipe for this distribution".to_string(),
            fix: format!(
                "Supported families: {}. Install Steam with your distribution's package manager",
                DistroFamily::all()
                    .filter(DistroFamily::is_supported)
                    .map(|f| f.display_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }),
    }
}

fn apt_get() -> CommandSpec {
    CommandSpec::new("apt-get").env("DEBIAN_FRONTEND", "noninteractive")
}

fn apt_install(packages: &[&str]) -> CommandSpec {
    apt_get().args(["install", "-y"]).args(packages.iter().copied())
}

fn apt_fix_broken() -> CommandSpec {
    apt_get().args(["install", "-f", "-y"])
}

/// apt/dpkg recipe. Falls back to the pinned `.deb` when the repository
/// install is exhausted.
pub fn debian_recipe(paths: &HostPaths) -> Recipe {
    let deb = paths
        .download_dir
        .join(STEAM_DEB_FILE)
        .to_string_lossy()
        .into_owned();

    let direct_download = Recipe::new("Direct package download")
        .step(RecipeStep::critical(
            "Ensure wget is installed",
            StepAction::EnsureProgram {
                program: "wget".to_string(),
                install: apt_install(&["wget"]),
            },
        ))
        .step(RecipeStep::critical(
            "Download Steam package",
            StepAction::Retry(CommandSpec::new("wget").args(["-O", deb.as_str(), STEAM_DEB_URL])),
        ))
        .step(RecipeStep::critical(
            "Install downloaded package",
            StepAction::RepairingInstall {
                install: CommandSpec::new("dpkg").args(["-i", deb.as_str()]),
                repair: apt_fix_broken(),
            },
        ));

    Recipe::new(DistroFamily::DebianLike.display_name())
        .step(RecipeStep::critical(
            "Check package manager",
            StepAction::RequireProgram("apt-get".to_string()),
        ))
        .step(RecipeStep::critical(
            "Enable i386 architecture",
            StepAction::Once(CommandSpec::new("dpkg").args(["--add-architecture", "i386"])),
        ))
        .step(RecipeStep::critical(
            "Refresh package index",
            StepAction::Retry(apt_get().arg("update")),
        ))
        .step(
            RecipeStep::critical(
                "Install Steam",
                StepAction::Retry(apt_install(&[TARGET_PACKAGE])),
            )
            .with_fallback(direct_download),
        )
        .step(RecipeStep::critical(
            "Install 32-bit graphics libraries",
            StepAction::Retry(apt_install(DEBIAN_CRITICAL_LIBS)),
        ))
        .step(RecipeStep::recommended(
            "Install 32-bit Vulkan libraries",
            StepAction::Retry(apt_install(DEBIAN_EXTRA_LIBS)),
        ))
        .step(RecipeStep::critical(
            "Repair broken dependencies",
            StepAction::Retry(apt_fix_broken()),
        ))
}

/// RPM Fusion nonfree release package URL for `distro`.
///
/// Fedora uses the `fedora` tree; CentOS and RHEL use `el`.
pub fn rpmfusion_nonfree_url(distro: &Distribution, major: u32) -> String {
    let tree = if distro.id == "fedora" { "fedora" } else { "el" };
    format!(
        "https://mirrors.rpmfusion.org/nonfree/{}/rpmfusion-nonfree-release-{}.noarch.rpm",
        tree, major
    )
}

fn dnf_install(packages: &[&str]) -> CommandSpec {
    CommandSpec::new("dnf")
        .args(["install", "-y"])
        .args(packages.iter().copied())
}

/// dnf recipe for release `major`.
pub fn rpm_recipe(distro: &Distribution, major: u32) -> Recipe {
    let repo = rpmfusion_nonfree_url(distro, major);
    let mut packages = vec![TARGET_PACKAGE];
    packages.extend_from_slice(RPM_CRITICAL_LIBS);

    Recipe::new(DistroFamily::RpmLike.display_name())
        .step(RecipeStep::critical(
            "Check package manager",
            StepAction::RequireProgram("dnf".to_string()),
        ))
        .step(RecipeStep::critical(
            "Add RPM Fusion nonfree repository",
            StepAction::Retry(dnf_install(&[repo.as_str()])),
        ))
        .step(RecipeStep::recommended(
            "Upgrade system packages",
            StepAction::Retry(CommandSpec::new("dnf").args(["upgrade", "--refresh", "-y"])),
        ))
        .step(RecipeStep::critical(
            "Install Steam and 32-bit graphics libraries",
            StepAction::Retry(dnf_install(&packages)),
        ))
        .step(RecipeStep::recommended(
            "Install 32-bit Vulkan libraries",
            StepAction::Retry(dnf_install(RPM_EXTRA_LIBS)),
        ))
}

fn pacman_sync(packages: &[&str]) -> CommandSpec {
    CommandSpec::new("pacman")
        .args(["-S", "--needed", "--noconfirm"])
        .args(packages.iter().copied())
}

/// pacman recipe. Enables `[multilib]` before anything is synced.
pub fn arch_recipe(paths: &HostPaths) -> Recipe {
    let mut packages = vec![TARGET_PACKAGE];
    packages.extend_from_slice(ARCH_CRITICAL_LIBS);

    Recipe::new(DistroFamily::ArchLike.display_name())
        .step(RecipeStep::critical(
            "Check package manager",
            StepAction::RequireProgram("pacman".to_string()),
        ))
        .step(RecipeStep::critical(
            "Enable multilib repository",
            StepAction::EnableMultilib {
                config: paths.pacman_conf.clone(),
            },
        ))
        .step(RecipeStep::critical(
            "Refresh package index",
            StepAction::Retry(CommandSpec::new("pacman").args(["-Sy", "--noconfirm"])),
        ))
        .step(RecipeStep::critical(
            "Install Steam and 32-bit graphics libraries",
            StepAction::Retry(pacman_sync(&packages)),
        ))
        .step(RecipeStep::recommended(
            "Install 32-bit Vulkan libraries",
            StepAction::Retry(pacman_sync(ARCH_EXTRA_LIBS)),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::Severity;

    fn rendered(recipe: &Recipe) -> Vec<String> {
        recipe
            .steps
            .iter()
            .flat_map(|s| s.action.commands())
            .map(|c| c.to_string())
            .collect()
    }

    #[test]
    fn test_every_supported_family_has_recipe() {
        let paths = HostPaths::default();
        for family in DistroFamily::all().filter(DistroFamily::is_supported) {
            for id in family.known_ids() {
                let distro = Distribution::new(id, None);
                let recipe = recipe_for(&distro, Some(9), &paths)
                    .unwrap_or_else(|e| panic!("{} should have a recipe: {}", id, e));
                assert!(!recipe.steps.is_empty(), "{} recipe is empty", id);
                assert_eq!(recipe.name, family.display_name());
            }
        }
    }

    #[test]
    fn test_unsupported_names_identity() {
        let err = recipe_for(&Distribution::unknown(), None, &HostPaths::default()).unwrap_err();
        assert!(matches!(
            &err,
            InstallError::UnsupportedEnvironment { id, .. } if id == "unknown"
        ));
        assert!(err.fix_suggestion().contains("Debian"));
    }

    #[test]
    fn test_rpm_without_major_is_unsupported() {
        let fedora = Distribution::new("fedora", None);
        let err = recipe_for(&fedora, None, &HostPaths::default()).unwrap_err();
        assert!(matches!(err, InstallError::UnsupportedEnvironment { .. }));
    }

    #[test]
    fn test_debian_recipe_order() {
        let mut paths = HostPaths::default();
        paths.download_dir = "/var/tmp".into();
        let recipe = debian_recipe(&paths);

        assert_eq!(recipe.steps[0].action, StepAction::RequireProgram("apt-get".to_string()));
        assert_eq!(
            rendered(&recipe),
            vec![
                "dpkg --add-architecture i386",
                "apt-get update",
                "apt-get install -y steam",
                "apt-get install -y libgl1-mesa-dri:i386 libgl1:i386 libdrm2:i386",
                "apt-get install -y libvulkan1:i386 mesa-vulkan-drivers:i386 libgbm1:i386",
                "apt-get install -f -y",
            ]
        );

        let install = recipe.find("Install Steam").unwrap();
        let fallback = install.fallback.as_ref().unwrap();
        assert_eq!(
            rendered(fallback),
            vec![
                "apt-get install -y wget",
                "wget -O /var/tmp/steam.deb https://cdn.akamai.steamstatic.com/client/installer/steam.deb",
                "dpkg -i /var/tmp/steam.deb",
                "apt-get install -f -y",
            ]
        );
    }

    #[test]
    fn test_debian_apt_is_noninteractive() {
        let recipe = debian_recipe(&HostPaths::default());
        for command in recipe.steps.iter().flat_map(|s| s.action.commands()) {
            if command.program == "apt-get" {
                assert!(command
                    .env_vars
                    .contains(&("DEBIAN_FRONTEND".to_string(), "noninteractive".to_string())));
            }
        }
    }

    #[test]
    fn test_debian_severities() {
        let recipe = debian_recipe(&HostPaths::default());
        let recommended: Vec<&str> = recipe
            .steps
            .iter()
            .filter(|s| s.severity == Severity::Recommended)
            .map(|s| s.label.as_str())
            .collect();
        assert_eq!(recommended, vec!["Install 32-bit Vulkan libraries"]);
    }

    #[test]
    fn test_rpmfusion_url() {
        assert_eq!(
            rpmfusion_nonfree_url(&Distribution::new("fedora", None), 40),
            "https://mirrors.rpmfusion.org/nonfree/fedora/rpmfusion-nonfree-release-40.noarch.rpm"
        );
        assert_eq!(
            rpmfusion_nonfree_url(&Distribution::new("rhel", None), 9),
            "https://mirrors.rpmfusion.org/nonfree/el/rpmfusion-nonfree-release-9.noarch.rpm"
        );
    }

    #[test]
    fn test_rpm_recipe() {
        let recipe = rpm_recipe(&Distribution::new("fedora", None), 39);
        assert_eq!(
            rendered(&recipe),
            vec![
                "dnf install -y https://mirrors.rpmfusion.org/nonfree/fedora/rpmfusion-nonfree-release-39.noarch.rpm",
                "dnf upgrade --refresh -y",
                "dnf install -y steam mesa-libGL.i686 mesa-dri-drivers.i686 libdrm.i686",
                "dnf install -y mesa-vulkan-drivers.i686 vulkan-loader.i686",
            ]
        );
        assert_eq!(recipe.steps[2].severity, Severity::Recommended);
        assert_eq!(recipe.steps[3].severity, Severity::Critical);
    }

    #[test]
    fn test_arch_recipe() {
        let recipe = arch_recipe(&HostPaths::default());
        assert_eq!(
            recipe.steps[1].action,
            StepAction::EnableMultilib {
                config: "/etc/pacman.conf".into()
            }
        );
        assert_eq!(
            rendered(&recipe),
            vec![
                "pacman -Sy --noconfirm",
                "pacman -S --needed --noconfirm steam lib32-mesa lib32-libglvnd lib32-libdrm",
                "pacman -S --needed --noconfirm lib32-vulkan-icd-loader lib32-systemd",
            ]
        );
    }
}
