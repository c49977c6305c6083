use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use crate::SENTINEL;
use crate::parser::{CompilerProfile, VariableTable};
use crate::platform::{DARWIN, HostSettings, LINUX, Platform, WINDOWS};
use crate::resolver::{DEFAULT_EXTENSION, MIXED_EXTENSIONS, SourceExtension, SourcePattern};

mod line;

pub use line::{AssignOp, MakeLine};

pub const HOST_COMPILER: &str = "clang++";
pub const INSTALL_DIR: &str = "../test_plugins";

const FIXED_FLAGS: &[&str] = &["-fPIC", "-Wall"];
const COMBINED_SOURCES_THRESHOLD: usize = 3;
const PHONY_TARGETS: &[&str] = &["host-plugins", "clean-host", "install-host", "help-host"];

/// The generated host build rules, still in typed form.
#[derive(Debug, Clone, PartialEq)]
pub struct HostBlock {
    lines: Vec<MakeLine>,
}

impl HostBlock {
    pub fn lines(&self) -> &[MakeLine] {
        &self.lines
    }

    pub fn render(&self) -> Vec<String> {
        self.lines.iter().map(ToString::to_string).collect()
    }
}

pub fn generate(
    profile: &CompilerProfile,
    sources: &SourcePattern,
    variables: &VariableTable,
    platform: Platform,
) -> HostBlock {
    let mut builder = Builder {
        profile,
        sources,
        variables,
        lines: Vec::new(),
    };

    builder.header();
    builder.source_notes();
    builder.combined_build_warning();
    builder.compiler_settings();
    builder.platform_settings(platform);
    let reference = builder.source_reference();
    builder.transform(&reference);
    builder.build_rules();
    builder.convenience_targets();
    builder.help_target();
    builder.push(MakeLine::comment(format!("=== End {SENTINEL} ===")));

    HostBlock {
        lines: builder.lines,
    }
}

struct Builder<'a> {
    profile: &'a CompilerProfile,
    sources: &'a SourcePattern,
    variables: &'a VariableTable,
    lines: Vec<MakeLine>,
}

impl Builder<'_> {
    fn push(&mut self, line: MakeLine) {
        self.lines.push(line);
    }

    fn comment(&mut self, text: impl Into<String>) {
        self.push(MakeLine::comment(text));
    }

    fn blank(&mut self) {
        self.push(MakeLine::Blank);
    }

    fn header(&mut self) {
        self.blank();
        self.comment(format!("=== {SENTINEL} (added by mkhost) ==="));
        self.comment("Build plugins as host platform dynamic libraries for VCV Rack emulator testing");
    }

    fn source_notes(&mut self) {
        let sources = self.sources;
        let extension = &sources.extension;
        if extension.is_default() {
            return;
        }

        match extension {
            SourceExtension::Mixed => self.comment("NOTE: Original Makefile mixes .cpp and .cc files"),
            SourceExtension::Single(ext) => {
                self.comment(format!("NOTE: Original Makefile uses {ext} files"))
            }
        }
        if extension.is_dsp() {
            self.comment("For Faust DSP files, you'll need to compile to C++ first");
            self.comment("Consider using faust2vcv or similar tool");
        }
        self.blank();
    }

    fn combined_build_warning(&mut self) {
        if !self.variables.contains("SOURCES") && !self.variables.contains("OBJECTS") {
            return;
        }
        let count = self
            .variables
            .get("SOURCES")
            .map_or(0, |b| b.raw_value.split_whitespace().count());
        if count <= COMBINED_SOURCES_THRESHOLD {
            return;
        }

        self.comment("WARNING: This Makefile appears to build multiple source files into one plugin");
        self.comment("The host build rules below will create separate plugins for each source file");
        self.comment("You may need to create a combined build rule for full functionality");
        self.blank();
    }

    fn compiler_settings(&mut self) {
        self.comment("Host compiler settings");
        self.push(MakeLine::var("HOST_CXX", AssignOp::Default, HOST_COMPILER));

        let variables = self.variables;
        let include = match variables.get("INCLUDES") {
            Some(includes) if includes.raw_value.contains("-I") => "$(INCLUDES)",
            Some(_) => "-I$(INCLUDES)",
            None => {
                if !variables.contains("INCLUDE_PATH") && variables.contains("NT_API_PATH") {
                    self.push(MakeLine::var(
                        "INCLUDE_PATH",
                        AssignOp::Default,
                        "$(NT_API_PATH)/include",
                    ));
                }
                "-I$(INCLUDE_PATH)"
            }
        };

        let profile = self.profile;
        let standard = format!("-std={}", profile.language_standard);
        let extra = profile
            .flags
            .iter()
            .map(String::as_str)
            .filter(|flag| !FIXED_FLAGS.contains(flag));
        let flags: Vec<&str> = [standard.as_str()]
            .into_iter()
            .chain(FIXED_FLAGS.iter().copied())
            .chain(extra)
            .chain([include])
            .collect();

        self.push(MakeLine::var("HOST_CXXFLAGS", AssignOp::Simple, flags.join(" ")));
        self.blank();
    }

    fn platform_settings(&mut self, platform: Platform) {
        match platform.host_settings() {
            Some((label, settings)) => {
                self.comment(format!("{label} build settings"));
                self.lines.extend(host_variables(settings));
            }
            None => {
                self.comment("Detect host platform");
                self.push(MakeLine::var("HOST_OS", AssignOp::Simple, "$(shell uname -s)"));
                self.blank();
                self.push(MakeLine::Conditional("ifeq ($(HOST_OS),Darwin)".into()));
                self.lines
                    .extend(host_variables(DARWIN).into_iter().map(MakeLine::indented));
                self.push(MakeLine::Conditional("else ifeq ($(HOST_OS),Linux)".into()));
                self.lines
                    .extend(host_variables(LINUX).into_iter().map(MakeLine::indented));
                self.push(MakeLine::Conditional("else".into()));
                self.push(MakeLine::comment("Windows/MinGW").indented());
                self.lines
                    .extend(host_variables(WINDOWS).into_iter().map(MakeLine::indented));
                self.push(MakeLine::Conditional("endif".into()));
            }
        }
        self.blank();
    }

    /// Make expression naming the source files, e.g. `$(INPUTS)`.
    fn source_reference(&mut self) -> String {
        let sources = self.sources;
        match &sources.source_variable {
            Some(name) => {
                self.comment("Use existing source file list");
                format!("$({name})")
            }
            None => {
                self.comment("Source files");
                self.push(MakeLine::var(
                    "host_inputs",
                    AssignOp::Simple,
                    sources.extension.wildcard(),
                ));
                "$(host_inputs)".into()
            }
        }
    }

    fn transform(&mut self, reference: &str) {
        let sources = self.sources;
        self.comment("Transform source files to host plugins");
        match &sources.extension {
            SourceExtension::Mixed => {
                self.comment("Original sources use mixed .cpp and .cc extensions");
                let mut parts = Vec::new();
                for ext in MIXED_EXTENSIONS {
                    let name = format!("host_plugins_{}", &ext[1..]);
                    self.push(MakeLine::var(
                        name.as_str(),
                        AssignOp::Simple,
                        format!("$(patsubst %{ext},%$(HOST_SUFFIX),$(filter %{ext},{reference}))"),
                    ));
                    parts.push(format!("$({name})"));
                }
                self.push(MakeLine::var("host_plugins", AssignOp::Simple, parts.join(" ")));
            }
            SourceExtension::Single(ext) => {
                if ext != DEFAULT_EXTENSION {
                    self.comment(format!("Original sources use {ext} extension"));
                }
                self.push(MakeLine::var(
                    "host_plugins",
                    AssignOp::Simple,
                    format!("$(patsubst %{ext},%$(HOST_SUFFIX),{reference})"),
                ));
            }
        }
        self.blank();
    }

    fn build_rules(&mut self) {
        let sources = self.sources;
        self.comment("Build rule for host plugins");
        match &sources.extension {
            SourceExtension::Mixed => {
                for (idx, ext) in MIXED_EXTENSIONS.iter().enumerate() {
                    if idx > 0 {
                        self.blank();
                    }
                    self.compile_rule(ext);
                }
            }
            SourceExtension::Single(ext) if sources.extension.is_compilable() => {
                self.compile_rule(ext);
            }
            SourceExtension::Single(ext) => {
                self.comment(format!("NOTE: You'll need to adapt this rule for {ext} files"));
                self.push(MakeLine::rule("%$(HOST_SUFFIX)", format!("%{ext}")));
                self.push(MakeLine::recipe(format!(
                    "@echo \"ERROR: Cannot directly build host plugins from {ext} files\""
                )));
                self.push(MakeLine::recipe(
                    "@echo \"Please convert to C++ first or modify this rule\"",
                ));
                self.push(MakeLine::recipe("@false"));
            }
        }
        self.blank();
    }

    fn compile_rule(&mut self, ext: &str) {
        self.push(MakeLine::rule("%$(HOST_SUFFIX)", format!("%{ext}")));
        self.push(MakeLine::recipe("@echo \"Building host plugin: $@\""));
        self.push(MakeLine::recipe(
            "$(HOST_CXX) $(HOST_CXXFLAGS) $(HOST_LDFLAGS) -o $@ $<",
        ));
    }

    fn convenience_targets(&mut self) {
        self.comment("Convenience targets");
        self.push(MakeLine::Phony(
            PHONY_TARGETS.iter().map(|t| t.to_string()).collect(),
        ));
        self.blank();

        self.push(MakeLine::rule("host-plugins", "$(host_plugins)"));
        self.push(MakeLine::recipe(
            "@echo \"Built $(words $(host_plugins)) host plugin(s)\"",
        ));
        self.blank();

        self.push(MakeLine::rule("clean-host", ""));
        self.push(MakeLine::recipe("rm -f *.dylib *.so *.dll"));
        self.blank();

        self.comment("Install to a test directory (customize INSTALL_DIR as needed)");
        self.push(MakeLine::var("INSTALL_DIR", AssignOp::Default, INSTALL_DIR));
        self.push(MakeLine::rule("install-host", "host-plugins"));
        self.push(MakeLine::recipe("@mkdir -p $(INSTALL_DIR)"));
        self.push(MakeLine::recipe("cp $(host_plugins) $(INSTALL_DIR)/"));
        self.push(MakeLine::recipe("@echo \"Installed to $(INSTALL_DIR)\""));
        self.blank();
    }

    fn help_target(&mut self) {
        self.comment("Help for host builds");
        self.push(MakeLine::rule("help-host", ""));
        for text in [
            "Host build targets for VCV Rack emulator testing:",
            "  make host-plugins    - Build all plugins for host platform",
            "  make clean-host      - Remove host plugin builds",
            "  make install-host    - Copy plugins to test directory",
            "",
            "Individual plugin targets:",
            "  make <plugin>$(HOST_SUFFIX)",
        ] {
            self.push(MakeLine::recipe(format!("@echo \"{text}\"")));
        }
        self.blank();
    }
}

fn host_variables(settings: HostSettings) -> Vec<MakeLine> {
    vec![
        MakeLine::var("HOST_SUFFIX", AssignOp::Simple, settings.suffix),
        MakeLine::var("HOST_LDFLAGS", AssignOp::Simple, settings.ldflags),
    ]
}
