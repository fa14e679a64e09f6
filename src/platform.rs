//! Host platform metadata recorded alongside each compiler.

use std::fmt;

/// Operating system and target architecture of the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    /// Distribution-qualified OS name, e.g. `ubuntu22.04` or `macos`.
    pub operating_system: String,
    /// CPU architecture, e.g. `x86_64`.
    pub target: String,
}

impl Platform {
    pub fn new(operating_system: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            operating_system: operating_system.into(),
            target: target.into(),
        }
    }

    /// Detect the current host.
    pub fn current() -> Self {
        Self::new(detect_operating_system(), std::env::consts::ARCH)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.operating_system, self.target)
    }
}

fn detect_operating_system() -> String {
    if cfg!(target_os = "macos") {
        "macos".to_string()
    } else if cfg!(target_os = "windows") {
        "windows".to_string()
    } else if cfg!(target_os = "linux") {
        std::fs::read_to_string("/etc/os-release")
            .ok()
            .and_then(|content| parse_os_release(&content))
            .unwrap_or_else(|| "linux".to_string())
    } else {
        std::env::consts::OS.to_string()
    }
}

/// Build `<ID><VERSION_ID>` from os-release content.
///
/// Returns `None` when there is no `ID`. A missing `VERSION_ID` (rolling
/// releases) yields the bare ID.
pub fn parse_os_release(content: &str) -> Option<String> {
    let mut id = None;
    let mut version = None;

    for line in content.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').trim_matches('\'');
        match key {
            "ID" => id = Some(value.to_lowercase()),
            "VERSION_ID" => version = Some(value.to_string()),
            _ => {}
        }
    }

    let id = id.filter(|id| !id.is_empty())?;
    Some(format!("{}{}", id, version.unwrap_or_default()))
}
