use core::fmt;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `:=`
    Simple,
    /// `?=`
    Default,
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssignOp::Simple => ":=",
            AssignOp::Default => "?=",
        };
        write!(f, "{s}")
    }
}

/// One line of generated make syntax.
#[derive(Debug, Clone, PartialEq)]
pub enum MakeLine {
    Blank,
    Comment(String),
    Variable {
        name: String,
        op: AssignOp,
        value: String,
    },
    /// `ifeq`, `else`, `endif`
    Conditional(String),
    Rule {
        target: String,
        prerequisites: String,
    },
    Recipe(String),
    Phony(Vec<String>),
    /// Inside a conditional branch
    Indented(Box<MakeLine>),
}

impl MakeLine {
    pub fn comment(text: impl Into<String>) -> Self {
        MakeLine::Comment(text.into())
    }

    pub fn var(name: impl Into<String>, op: AssignOp, value: impl Into<String>) -> Self {
        MakeLine::Variable {
            name: name.into(),
            op,
            value: value.into(),
        }
    }

    pub fn rule(target: impl Into<String>, prerequisites: impl Into<String>) -> Self {
        MakeLine::Rule {
            target: target.into(),
            prerequisites: prerequisites.into(),
        }
    }

    pub fn recipe(command: impl Into<String>) -> Self {
        MakeLine::Recipe(command.into())
    }

    pub fn indented(self) -> Self {
        MakeLine::Indented(Box::new(self))
    }
}

impl fmt::Display for MakeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MakeLine::Blank => Ok(()),
            MakeLine::Comment(text) => write!(f, "# {text}"),
            MakeLine::Variable { name, op, value } => write!(f, "{name} {op} {value}"),
            MakeLine::Conditional(directive) => write!(f, "{directive}"),
            MakeLine::Rule {
                target,
                prerequisites,
            } if prerequisites.is_empty() => write!(f, "{target}:"),
            MakeLine::Rule {
                target,
                prerequisites,
            } => write!(f, "{target}: {prerequisites}"),
            MakeLine::Recipe(command) => write!(f, "\t{command}"),
            MakeLine::Phony(targets) => write!(f, ".PHONY: {}", targets.join(" ")),
            MakeLine::Indented(line) => write!(f, "    {line}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        assert_eq!(MakeLine::Blank.to_string(), "");
        assert_eq!(MakeLine::comment("note").to_string(), "# note");
        assert_eq!(
            MakeLine::var("HOST_CXX", AssignOp::Default, "clang++").to_string(),
            "HOST_CXX ?= clang++"
        );
        assert_eq!(MakeLine::rule("clean-host", "").to_string(), "clean-host:");
        assert_eq!(
            MakeLine::rule("%$(HOST_SUFFIX)", "%.cpp").to_string(),
            "%$(HOST_SUFFIX): %.cpp"
        );
        assert_eq!(MakeLine::recipe("rm -f x").to_string(), "\trm -f x");
        assert_eq!(
            MakeLine::Phony(vec!["a".into(), "b".into()]).to_string(),
            ".PHONY: a b"
        );
        assert_eq!(
            MakeLine::var("HOST_SUFFIX", AssignOp::Simple, ".so")
                .indented()
                .to_string(),
            "    HOST_SUFFIX := .so"
        );
    }
}
