use alloc::string::String;
use alloc::vec::Vec;

const DEFAULT_STANDARD: &str = "c++11";

/// Compiler facts harvested from the cross-compiler invocations.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerProfile {
    /// Always spelled `c++NN`, even when the build file says `gnu++NN`.
    pub language_standard: String,
    /// Host-safe flags in the order they were first seen, without repeats.
    pub flags: Vec<String>,
}

impl Default for CompilerProfile {
    fn default() -> Self {
        Self {
            language_standard: DEFAULT_STANDARD.into(),
            flags: Vec::new(),
        }
    }
}

impl CompilerProfile {
    /// Folds one compiler-bearing line into the profile.
    pub fn extract(&mut self, line: &str) {
        if let Some(standard) = language_standard(line) {
            tracing::debug!(standard = %standard, "detected language standard");
            self.language_standard = standard;
        }

        for token in line.split_whitespace() {
            if is_host_safe_flag(token) && !self.flags.iter().any(|f| f == token) {
                self.flags.push(token.into());
            }
        }
    }
}

/// First `-std=c++NN` / `-std=gnu++NN` on the line, normalized to `c++NN`.
fn language_standard(line: &str) -> Option<String> {
    line.match_indices("-std=").find_map(|(idx, flag)| {
        let rest = &line[idx + flag.len()..];
        let version = rest
            .strip_prefix("gnu++")
            .or_else(|| rest.strip_prefix("c++"))?;
        if !version.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        let end = version
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(version.len());
        let mut standard = String::from("c++");
        standard.push_str(&version[..end]);
        Some(standard)
    })
}

/// Allow-list of flags that mean the same thing on any host compiler.
/// Target-specific flags (`-mcpu`, `-mfloat-abi`, ...) never match.
fn is_host_safe_flag(token: &str) -> bool {
    match token {
        "-Wall" | "-g" | "-MMD" | "-MP" | "-ffunction-sections" | "-fdata-sections" => true,
        "-Os" | "-O0" | "-O1" | "-O2" | "-O3" => true,
        _ => token.strip_prefix("-Wno-").is_some_and(|name| {
            !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_standard() {
        assert_eq!(CompilerProfile::default().language_standard, "c++11");
    }

    #[test]
    fn test_gnu_standard_is_normalized() {
        let mut profile = CompilerProfile::default();
        profile.extract("\tarm-none-eabi-c++ -std=gnu++17 -c -o $@ $<");
        assert_eq!(profile.language_standard, "c++17");
    }

    #[test]
    fn test_last_standard_wins() {
        let mut profile = CompilerProfile::default();
        profile.extract("CXXFLAGS := -std=c++14");
        profile.extract("\tarm-none-eabi-g++ -std=c++2a $<");
        assert_eq!(profile.language_standard, "c++2a");
    }

    #[test]
    fn test_malformed_standard_is_ignored() {
        let mut profile = CompilerProfile::default();
        profile.extract("CXXFLAGS := -std=c++ -std=gnu11");
        assert_eq!(profile.language_standard, "c++11");
    }

    #[test]
    fn test_flags_allow_list() {
        let mut profile = CompilerProfile::default();
        profile.extract(
            "\tarm-none-eabi-c++ -std=c++11 -mcpu=cortex-m7 -mfpu=fpv5-d16 -mfloat-abi=hard \
             -Os -Wall -Wno-unused-parameter -g -MMD -MP -ffunction-sections -fdata-sections \
             -fno-rtti -fno-exceptions -c -o $@ $<",
        );
        assert_eq!(
            profile.flags,
            vec![
                "-Os",
                "-Wall",
                "-Wno-unused-parameter",
                "-g",
                "-MMD",
                "-MP",
                "-ffunction-sections",
                "-fdata-sections",
            ]
        );
    }

    #[test]
    fn test_flags_deduplicate_across_lines() {
        let mut profile = CompilerProfile::default();
        profile.extract("CXXFLAGS := -std=c++11 -O2 -Wall");
        profile.extract("\tarm-none-eabi-g++ -Wall -O2 -g");
        assert_eq!(profile.flags, vec!["-O2", "-Wall", "-g"]);
    }

    #[test]
    fn test_no_partial_matches() {
        let mut profile = CompilerProfile::default();
        profile.extract("\tarm-none-eabi-g++ -ggdb -O2x -Wno- -Wallx");
        assert!(profile.flags.is_empty());
    }
}
