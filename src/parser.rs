use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::SENTINEL;
use crate::document::Document;

mod compiler;

pub use compiler::CompilerProfile;

const CROSS_COMPILERS: &[&str] = &["arm-none-eabi-c++", "arm-none-eabi-g++"];
const FLAGS_VARIABLE: &str = "CXXFLAGS";
const STANDARD_FLAG: &str = "-std=";
const CUSTOM_TOOLS: &[&str] = &["faust2distingnt", "custom"];

/// `NAME = value`, `NAME := value` or `NAME ?= value` at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// What a single line of the build file contributes to the facts.
#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    SentinelMarker,
    CompilerInvocation { binding: Option<Assignment<'a>> },
    FlagsDefinition { binding: Option<Assignment<'a>> },
    CustomBuildCommand(&'a str),
    VariableAssignment(Assignment<'a>),
    Other,
}

pub fn classify(line: &str) -> Line<'_> {
    if line.contains(SENTINEL) {
        return Line::SentinelMarker;
    }

    let binding = assignment(line);

    if CROSS_COMPILERS.iter().any(|cc| line.contains(cc)) {
        return Line::CompilerInvocation { binding };
    }
    if line.contains(FLAGS_VARIABLE) && line.contains(STANDARD_FLAG) {
        return Line::FlagsDefinition { binding };
    }
    if let Some(command) = custom_command(line) {
        return Line::CustomBuildCommand(command);
    }

    match binding {
        Some(binding) => Line::VariableAssignment(binding),
        None => Line::Other,
    }
}

fn assignment(line: &str) -> Option<Assignment<'_>> {
    let name_len = line
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(line.len());
    if name_len == 0 {
        return None;
    }

    let (name, rest) = line.split_at(name_len);
    let rest = rest.trim_start();
    let value = [":=", "?=", "="]
        .iter()
        .find_map(|op| rest.strip_prefix(op))?;

    Some(Assignment {
        name,
        value: value.trim_start().trim_end_matches('\r'),
    })
}

/// A visible recipe line that hands work to an external tool.
fn custom_command(line: &str) -> Option<&str> {
    let command = line.strip_prefix('\t')?.trim();
    if command.starts_with('@') {
        return None;
    }
    let lower = command.to_ascii_lowercase();
    CUSTOM_TOOLS
        .iter()
        .any(|tool| lower.contains(tool))
        .then_some(command)
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableBinding {
    pub name: String,
    pub raw_value: String,
    pub line_index: usize,
}

/// Every assignment in declaration order. A name assigned twice keeps both
/// bindings; lookups by name see the last one.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    bindings: Vec<VariableBinding>,
    by_name: HashMap<String, Vec<usize>>,
}

impl VariableTable {
    fn push(&mut self, binding: VariableBinding) {
        self.by_name
            .entry(binding.name.to_ascii_lowercase())
            .or_default()
            .push(self.bindings.len());
        self.bindings.push(binding);
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableBinding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&VariableBinding> {
        self.by_name
            .get(name.to_ascii_lowercase().as_str())?
            .iter()
            .rev()
            .map(|&idx| &self.bindings[idx])
            .find(|binding| binding.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get_ignore_case(&self, name: &str) -> Option<&VariableBinding> {
        let idx = *self.by_name.get(name.to_ascii_lowercase().as_str())?.last()?;
        Some(&self.bindings[idx])
    }
}

/// Everything one pass over the document learns.
#[derive(Debug, Clone, Default)]
pub struct Facts {
    pub variables: VariableTable,
    pub profile: CompilerProfile,
    pub custom_commands: Vec<String>,
    pub already_augmented: bool,
}

impl Facts {
    pub fn scan(document: &Document) -> Self {
        let mut facts = Facts::default();

        for (line_index, line) in document.lines().iter().enumerate() {
            let binding = match classify(line) {
                Line::SentinelMarker => {
                    facts.already_augmented = true;
                    None
                }
                Line::CompilerInvocation { binding } | Line::FlagsDefinition { binding } => {
                    facts.profile.extract(line);
                    binding
                }
                Line::CustomBuildCommand(command) => {
                    tracing::debug!(line = line_index + 1, command, "custom build command");
                    facts.custom_commands.push(command.into());
                    None
                }
                Line::VariableAssignment(binding) => Some(binding),
                Line::Other => None,
            };

            if let Some(Assignment { name, value }) = binding {
                facts.variables.push(VariableBinding {
                    name: name.into(),
                    raw_value: value.into(),
                    line_index,
                });
            }
        }

        facts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assign<'a>(name: &'a str, value: &'a str) -> Assignment<'a> {
        Assignment { name, value }
    }

    #[test]
    fn test_classify_assignments() {
        assert_eq!(
            classify("INPUTS := $(wildcard *.cpp)"),
            Line::VariableAssignment(assign("INPUTS", "$(wildcard *.cpp)"))
        );
        assert_eq!(
            classify("NT_API_PATH ?= ../api"),
            Line::VariableAssignment(assign("NT_API_PATH", "../api"))
        );
        assert_eq!(
            classify("output=plugin.o"),
            Line::VariableAssignment(assign("output", "plugin.o"))
        );
        assert_eq!(
            classify("SRCS = a.cc b.cc\r"),
            Line::VariableAssignment(assign("SRCS", "a.cc b.cc"))
        );
        assert_eq!(classify("SOURCES += more.cpp"), Line::Other);
        assert_eq!(classify("ifeq ($(X),y)"), Line::Other);
        assert_eq!(classify("\tFOO=1 ./run"), Line::Other);
        assert_eq!(classify("%.o: %.cpp"), Line::Other);
    }

    #[test]
    fn test_classify_compiler_lines() {
        assert_eq!(
            classify("\tarm-none-eabi-c++ -std=c++11 -c -o $@ $<"),
            Line::CompilerInvocation { binding: None }
        );
        assert_eq!(
            classify("CXX := arm-none-eabi-g++"),
            Line::CompilerInvocation {
                binding: Some(assign("CXX", "arm-none-eabi-g++"))
            }
        );
        assert_eq!(
            classify("CXXFLAGS = -std=gnu++17 -Os"),
            Line::FlagsDefinition {
                binding: Some(assign("CXXFLAGS", "-std=gnu++17 -Os"))
            }
        );
        assert_eq!(
            classify("CXXFLAGS = -Os"),
            Line::VariableAssignment(assign("CXXFLAGS", "-Os"))
        );
    }

    #[test]
    fn test_classify_custom_commands() {
        assert_eq!(
            classify("\tfaust2distingnt $< -o $@"),
            Line::CustomBuildCommand("faust2distingnt $< -o $@")
        );
        assert_eq!(
            classify("\t./Custom-Tool --in $<"),
            Line::CustomBuildCommand("./Custom-Tool --in $<")
        );
        assert_eq!(classify("\t@echo custom"), Line::Other);
        assert_eq!(classify("    faust2distingnt $<"), Line::Other);
    }

    #[test]
    fn test_classify_sentinel() {
        assert_eq!(
            classify("# === VCV Emulator Test Builds (added by mkhost) ==="),
            Line::SentinelMarker
        );
        assert_eq!(
            classify("# === End VCV Emulator Test Builds ==="),
            Line::SentinelMarker
        );
    }

    #[test]
    fn test_scan() {
        let content = r#"NT_API_PATH := ../distingNT_API
INCLUDE_PATH := $(NT_API_PATH)/include
inputs := $(wildcard *.cpp)
outputs := $(patsubst %.cpp,plugins/%.o,$(inputs))

all: $(outputs)

plugins/%.o: %.cpp
	mkdir -p $(@D)
	arm-none-eabi-c++ -std=c++11 -mcpu=cortex-m7 -Os -Wall -fPIC -I$(INCLUDE_PATH) -c -o $@ $^
	custom-strip $@
"#;
        let facts = Facts::scan(&Document::parse(content));

        let names: Vec<_> = facts.variables.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["NT_API_PATH", "INCLUDE_PATH", "inputs", "outputs"]);
        assert_eq!(facts.variables.get("inputs").unwrap().line_index, 2);
        assert_eq!(facts.profile.language_standard, "c++11");
        assert_eq!(facts.profile.flags, vec!["-Os", "-Wall"]);
        assert_eq!(facts.custom_commands, vec!["custom-strip $@"]);
        assert!(!facts.already_augmented);
    }

    #[test]
    fn test_scan_keeps_every_binding() {
        let facts = Facts::scan(&Document::parse("SRC = a.cpp\nsrc = b.cc\nSRC = c.cpp\n"));
        assert_eq!(facts.variables.len(), 3);
        assert_eq!(facts.variables.get("SRC").unwrap().raw_value, "c.cpp");
        assert_eq!(facts.variables.get("src").unwrap().raw_value, "b.cc");
        assert_eq!(facts.variables.get("Src"), None);
        assert_eq!(
            facts.variables.get_ignore_case("Src").unwrap().raw_value,
            "c.cpp"
        );
    }

    #[test]
    fn test_scan_continues_after_sentinel() {
        let content = "# VCV Emulator Test Builds\nCXXFLAGS := -std=c++20\n";
        let facts = Facts::scan(&Document::parse(content));
        assert!(facts.already_augmented);
        assert_eq!(facts.profile.language_standard, "c++20");
        assert!(facts.variables.contains("CXXFLAGS"));
    }
}
