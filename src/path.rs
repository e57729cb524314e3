//! Translating Windows-style source paths when running under WSL.

use std::path::PathBuf;

/// Convert a user-supplied path into the host's native form.
///
/// Only does anything under WSL, where `C:\work\repo` becomes `/mnt/c/work/repo`.
pub fn to_native(raw: &str) -> PathBuf {
    if is_wsl() {
        if let Some(converted) = wsl_path(raw) {
            tracing::debug!(raw, converted = %converted, "translated windows path");
            return PathBuf::from(converted);
        }
    }
    PathBuf::from(raw)
}

/// Rewrite a Windows drive path as its `/mnt/<drive>` mount, or `None` if
/// `raw` is not a drive path.
pub fn wsl_path(raw: &str) -> Option<String> {
    let mut chars = raw.chars();
    let drive = chars.next().filter(char::is_ascii_alphabetic)?;
    if chars.next() != Some(':') {
        return None;
    }

    let rest = chars.as_str();
    if !(rest.is_empty() || rest.starts_with(['\\', '/'])) {
        // `C:foo` is drive-relative; there is no sensible mount path for it.
        return None;
    }

    let rest = rest.replace('\\', "/");
    let rest = rest.trim_end_matches('/');
    Some(format!("/mnt/{}{}", drive.to_ascii_lowercase(), rest))
}

/// Whether this process is running inside the Windows Subsystem for Linux.
pub fn is_wsl() -> bool {
    if std::env::var_os("WSL_DISTRO_NAME").is_some() {
        return true;
    }
    std::fs::read_to_string("/proc/sys/kernel/osrelease")
        .map(|release| release.to_ascii_lowercase().contains("microsoft"))
        .unwrap_or(false)
}
