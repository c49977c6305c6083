use core::fmt;
use core::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    /// Probe the host with `uname -s` when make runs
    #[default]
    Auto,
    Macos,
    Linux,
    Windows,
    /// Same runtime probe as `Auto`
    All,
}

/// Output suffix and link flags for one host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostSettings {
    pub suffix: &'static str,
    pub ldflags: &'static str,
}

pub const DARWIN: HostSettings = HostSettings {
    suffix: ".dylib",
    ldflags: "-dynamiclib -undefined dynamic_lookup",
};

pub const LINUX: HostSettings = HostSettings {
    suffix: ".so",
    ldflags: "-shared",
};

pub const WINDOWS: HostSettings = HostSettings {
    suffix: ".dll",
    ldflags: "-shared",
};

impl Platform {
    /// Fixed settings, or `None` when the choice is left to make.
    pub fn host_settings(self) -> Option<(&'static str, HostSettings)> {
        match self {
            Platform::Auto | Platform::All => None,
            Platform::Macos => Some(("macOS", DARWIN)),
            Platform::Linux => Some(("Linux", LINUX)),
            Platform::Windows => Some(("Windows", WINDOWS)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlatform;

impl fmt::Display for UnknownPlatform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "expected one of: auto, macos, linux, windows, all")
    }
}

impl core::error::Error for UnknownPlatform {}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Platform::Auto),
            "macos" => Ok(Platform::Macos),
            "linux" => Ok(Platform::Linux),
            "windows" => Ok(Platform::Windows),
            "all" => Ok(Platform::All),
            _ => Err(UnknownPlatform),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Platform::Auto => "auto",
            Platform::Macos => "macos",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::All => "all",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for name in ["auto", "macos", "linux", "windows", "all"] {
            assert_eq!(name.parse::<Platform>().unwrap().to_string(), name);
        }
        assert_eq!("darwin".parse::<Platform>(), Err(UnknownPlatform));
    }

    #[test]
    fn test_only_concrete_platforms_are_fixed() {
        assert_eq!(Platform::Auto.host_settings(), None);
        assert_eq!(Platform::All.host_settings(), None);
        assert_eq!(Platform::Macos.host_settings(), Some(("macOS", DARWIN)));
        assert_eq!(Platform::Windows.host_settings().unwrap().1.suffix, ".dll");
    }
}
