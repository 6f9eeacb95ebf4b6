//! Desktop-side facts about the Android environment installation.

use std::{fs, io, path::Path, process::Command};
use tracing::{debug, warn};

const CPUINFO: &str = "/proc/cpuinfo";

/// Packages shared by every supported platform.
const COMMON_PACKAGES: [&str; 5] = [
    "docker.io",
    "kylin-kmre-daemon",
    "kylin-kmre-window",
    "kylin-kmre-manager",
    "kylin-kmre-display-control",
];

/// Whether dpkg reports `name` as installed. Any failure to ask counts as no.
pub fn is_deb_package_installed(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let output = match Command::new("dpkg-query")
        .args(dpkg_query_args(name))
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            warn!("dpkg-query failed to run: {e}");
            return false;
        }
    };
    let installed = output.status.success() && status_is_installed(&output.stdout);
    debug!("deb package {name} installed: {installed}");
    installed
}

/// `--showformat` with `=`, since `-f` would swallow the `=` into the format.
fn dpkg_query_args(name: &str) -> [&str; 3] {
    ["-W", "--showformat=${Status}\n", name]
}

fn status_is_installed(status: &[u8]) -> bool {
    String::from_utf8_lossy(status)
        .lines()
        .any(|line| line.contains("ok installed"))
}

/// Whether every package the Android environment needs on this machine is present.
pub fn is_android_env_installed() -> bool {
    match required_packages() {
        Some(extra) => COMMON_PACKAGES
            .iter()
            .chain(extra.iter())
            .all(|pkg| is_deb_package_installed(pkg)),
        None => false,
    }
}

/// Architecture specific packages, `None` where the environment is unsupported.
fn required_packages() -> Option<[&'static str; 2]> {
    if cfg!(target_arch = "x86_64") {
        return Some(["libkylin-kmre-emugl", "kylin-kmre-image-data-x64"]);
    }
    if cfg!(target_arch = "aarch64") {
        let cpuinfo = fs::read_to_string(CPUINFO).unwrap_or_default();
        return Some(aarch64_packages(&cpuinfo));
    }
    None
}

fn aarch64_packages(cpuinfo: &str) -> [&'static str; 2] {
    let hisilicon = hardware_field(cpuinfo)
        .map(|hw| hw.starts_with("Kirin") || hw.starts_with("PANGU"))
        .unwrap_or(false)
        || cpuinfo.contains("Kirin")
        || cpuinfo.contains("PANGU");
    if hisilicon {
        ["libkylin-kmre-emugl-wayland", "kylin-kmre-image-data"]
    } else {
        ["libkylin-kmre-emugl", "kylin-kmre-image-data"]
    }
}

/// Value of the first `Hardware : ...` line.
fn hardware_field(cpuinfo: &str) -> Option<&str> {
    cpuinfo.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        (key.trim() == "Hardware").then(|| value.trim())
    })
}

/// Remove the desktop launcher and icons generated for `package_name`.
pub fn remove_desktop_entry(home: &Path, package_name: &str) {
    let share = home.join(".local/share");
    let files = [
        share.join("applications").join(format!("{package_name}.desktop")),
        share.join("icons").join(format!("{package_name}.svg")),
        share.join("icons").join(format!("{package_name}.png")),
    ];
    for file in files {
        match fs::remove_file(&file) {
            Ok(()) => debug!("removed {}", file.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("failed to remove {}: {e}", file.display()),
        }
    }
}
