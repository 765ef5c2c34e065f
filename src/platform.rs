//! Platform detection

use std::fs;

/// Detect WSL from /proc/version or the distro variable WSL sets
///
/// WSL matters twice: epoll does not work on its TTYs, and espeak-ng is
/// the more reliable voice there.
pub fn is_wsl() -> bool {
    let from_kernel = fs::read_to_string("/proc/version")
        .map(|v| {
            let v = v.to_lowercase();
            v.contains("microsoft") || v.contains("wsl")
        })
        .unwrap_or(false);
    from_kernel || std::env::var_os("WSL_DISTRO_NAME").is_some()
}
