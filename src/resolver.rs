use core::fmt;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::parser::{VariableBinding, VariableTable};

/// Source-list variable names, most preferred first. Matched case-insensitively.
const SOURCE_LIST_NAMES: &[&str] = &["inputs", "sources", "srcs", "src", "src_files", "source"];
const WILDCARD: &str = "$(wildcard";
const HEADER_EXTENSIONS: &[&str] = &[".h", ".hh", ".hpp", ".hxx"];
const COMPILABLE_EXTENSIONS: &[&str] = &[".cpp", ".cc", ".cxx", ".c++"];

pub const DEFAULT_EXTENSION: &str = ".cpp";
pub const MIXED_EXTENSIONS: &[&str] = &[".cpp", ".cc"];
pub const DSP_EXTENSION: &str = ".dsp";

#[derive(Debug, Clone, PartialEq)]
pub enum SourceExtension {
    Single(String),
    /// Both `.cc` and `.cpp` files in the same source list.
    Mixed,
}

impl Default for SourceExtension {
    fn default() -> Self {
        SourceExtension::Single(DEFAULT_EXTENSION.into())
    }
}

impl SourceExtension {
    pub fn is_default(&self) -> bool {
        matches!(self, SourceExtension::Single(ext) if ext == DEFAULT_EXTENSION)
    }

    pub fn is_compilable(&self) -> bool {
        match self {
            SourceExtension::Single(ext) => COMPILABLE_EXTENSIONS.contains(&ext.as_str()),
            SourceExtension::Mixed => true,
        }
    }

    /// `$(wildcard ...)` expression matching files of this kind.
    pub fn wildcard(&self) -> String {
        match self {
            SourceExtension::Single(ext) => format!("$(wildcard *{ext})"),
            SourceExtension::Mixed => MIXED_EXTENSIONS
                .iter()
                .map(|ext| format!("$(wildcard *{ext})"))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    pub fn is_dsp(&self) -> bool {
        matches!(self, SourceExtension::Single(ext) if ext == DSP_EXTENSION)
    }
}

impl fmt::Display for SourceExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceExtension::Single(ext) => write!(f, "{ext}"),
            SourceExtension::Mixed => write!(f, "mixed"),
        }
    }
}

/// Where the project's sources live and what kind of files they are.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourcePattern {
    pub extension: SourceExtension,
    /// Variable to reuse as the source list, when there is one.
    pub source_variable: Option<String>,
    /// Values of every source-list or wildcard binding, in declaration order.
    pub candidate_values: Vec<String>,
}

/// Picks the source list and derives the extension from the same binding, so
/// the reused variable and the generated rules always agree.
///
/// Only names from [`SOURCE_LIST_NAMES`] are reused, the first bound one
/// winning. Without one, the first declared binding that globs non-header
/// files contributes its extension alone; the generator then globs for that
/// extension itself instead of reusing an unrelated variable.
pub fn resolve(variables: &VariableTable) -> SourcePattern {
    let candidate_values = variables
        .iter()
        .filter(|b| is_source_list_name(&b.name) || b.raw_value.contains(WILDCARD))
        .map(|b| b.raw_value.clone())
        .collect();

    if let Some(binding) = SOURCE_LIST_NAMES
        .iter()
        .find_map(|name| variables.get_ignore_case(name))
    {
        return SourcePattern {
            extension: extension_of(&binding.raw_value).unwrap_or_default(),
            source_variable: Some(binding.name.clone()),
            candidate_values,
        };
    }

    let extension = variables
        .iter()
        .find(|b| globs_sources(b))
        .and_then(|b| extension_of(&b.raw_value))
        .unwrap_or_default();

    SourcePattern {
        extension,
        source_variable: None,
        candidate_values,
    }
}

fn is_source_list_name(name: &str) -> bool {
    SOURCE_LIST_NAMES
        .iter()
        .any(|candidate| name.eq_ignore_ascii_case(candidate))
}

fn globs_sources(binding: &VariableBinding) -> bool {
    glob_extension(&binding.raw_value).is_some_and(|ext| !HEADER_EXTENSIONS.contains(&ext.as_str()))
}

fn extension_of(value: &str) -> Option<SourceExtension> {
    let has_cc = value.contains(".cc");
    let has_cpp = value.contains(".cpp");

    if has_cc && has_cpp {
        Some(SourceExtension::Mixed)
    } else if let Some(ext) = glob_extension(value) {
        Some(SourceExtension::Single(ext))
    } else if has_cc {
        Some(SourceExtension::Single(".cc".into()))
    } else if has_cpp {
        Some(SourceExtension::Single(".cpp".into()))
    } else {
        None
    }
}

/// Extension globbed by `$(wildcard ...*.ext)`; `*ext` without the dot works too.
fn glob_extension(value: &str) -> Option<String> {
    let (_, rest) = value.split_once(WILDCARD)?;
    let (_, pattern) = rest.split_once('*')?;
    let pattern = pattern.strip_prefix('.').unwrap_or(pattern);
    let end = pattern
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(pattern.len());
    if end == 0 {
        return None;
    }

    let mut ext = String::from(".");
    ext.push_str(&pattern[..end]);
    Some(ext)
}
