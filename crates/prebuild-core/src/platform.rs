//! Platform token resolution.
//!
//! Maps a logical token (`desktop`, `mac`, `windows-x64`, ...) plus the host's
//! OS and CPU architecture onto a canonical platform identifier, i.e. a key of
//! the [`ChecksumTable`].

use crate::checksum_table::ChecksumTable;
use crate::error::{FetchError, Result};

/// OS families that need the host architecture appended.
const OS_FAMILIES: &[&str] = &["windows", "mac", "linux"];

/// `desktop` -> os family -> `{os}-{arch}` -> canonical.
const MAX_RESOLVE_STEPS: usize = 3;

/// Host facts the resolver depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub os: String,
    pub arch: String,
}

impl HostInfo {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// OS of the running process and architecture of the running machine.
    ///
    /// The architecture is asked of the kernel (`uname` on unix, the
    /// `PROCESSOR_ARCHITE*` variables on Windows), so a binary built for one
    /// target but run on another machine still reports the host. The compile
    /// target's architecture is used only when that query yields nothing.
    pub fn detect() -> Self {
        let arch = machine_arch().unwrap_or_else(|| std::env::consts::ARCH.to_string());
        Self::new(std::env::consts::OS, arch)
    }
}

#[cfg(unix)]
fn machine_arch() -> Option<String> {
    let mut uts: libc::utsname = unsafe { std::mem::zeroed() };
    if unsafe { libc::uname(&mut uts) } != 0 {
        return None;
    }
    let machine = unsafe { std::ffi::CStr::from_ptr(uts.machine.as_ptr()) };
    let machine = machine.to_string_lossy().trim().to_string();
    (!machine.is_empty()).then_some(machine)
}

// A 32-bit or emulated process sees its own architecture in
// PROCESSOR_ARCHITECTURE and the machine's in PROCESSOR_ARCHITEW6432.
#[cfg(windows)]
fn machine_arch() -> Option<String> {
    ["PROCESSOR_ARCHITEW6432", "PROCESSOR_ARCHITECTURE"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

#[cfg(not(any(unix, windows)))]
fn machine_arch() -> Option<String> {
    None
}

/// Normalizes a machine architecture name to the prebuild naming scheme.
pub fn normalize_arch(arch: &str) -> Result<&'static str> {
    match arch.to_ascii_lowercase().as_str() {
        "x86_64" | "amd64" => Ok("x64"),
        "arm64" | "aarch64" => Ok("arm64"),
        _ => Err(FetchError::UnsupportedArchitecture(arch.to_string())),
    }
}

/// Maps a host OS name to a platform token: Darwin family becomes `mac`,
/// anything else passes through lowercased.
pub fn os_token(os: &str) -> String {
    let os = os.to_ascii_lowercase();
    match os.as_str() {
        "darwin" | "macos" => "mac".to_string(),
        _ => os,
    }
}

pub struct PlatformResolver<'a> {
    table: &'a ChecksumTable,
    host: HostInfo,
}

impl<'a> PlatformResolver<'a> {
    pub fn new(table: &'a ChecksumTable, host: HostInfo) -> Self {
        Self { table, host }
    }

    /// Resolves `token` to a canonical platform identifier.
    pub fn resolve(&self, token: &str) -> Result<String> {
        let mut current = token.to_string();
        for _ in 0..MAX_RESOLVE_STEPS {
            if self.table.contains(&current) {
                return Ok(current);
            }
            current = self.expand(&current)?;
        }
        if self.table.contains(&current) {
            return Ok(current);
        }
        Err(FetchError::UnsupportedPlatform(current))
    }

    /// One alias expansion step.
    fn expand(&self, token: &str) -> Result<String> {
        if OS_FAMILIES.contains(&token) {
            let arch = normalize_arch(&self.host.arch)?;
            return Ok(format!("{}-{}", token, arch));
        }
        if token == "desktop" {
            return Ok(os_token(&self.host.os));
        }
        Err(FetchError::UnsupportedPlatform(token.to_string()))
    }
}
