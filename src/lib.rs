#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod document;
mod error;
pub mod generator;
pub mod os;
pub mod parser;
pub mod platform;
pub mod resolver;
mod run;

use alloc::string::String;

pub use crate::document::Document;
pub use crate::error::AugmentError;
pub use crate::platform::Platform;
pub use crate::run::{BACKUP_SUFFIX, Outcome, RunOptions, run};

use crate::parser::Facts;

/// Marker carried by every generated block. Its presence anywhere in a build
/// file means the file has been augmented already.
pub const SENTINEL: &str = "VCV Emulator Test Builds";

#[derive(Debug, Clone, PartialEq)]
pub struct Augmentation {
    pub text: String,
    pub already_augmented: bool,
    /// Line index the host block was inserted at.
    pub inserted_at: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Augmenter {
    platform: Platform,
}

impl Augmenter {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn platform(&mut self, platform: Platform) -> &mut Self {
        self.platform = platform;
        self
    }

    pub fn augment(&self, text: &str) -> Augmentation {
        let mut document = Document::parse(text);
        let facts = Facts::scan(&document);

        if facts.already_augmented {
            document.mark_augmented();
        }
        if document.already_augmented() {
            tracing::debug!("sentinel found, leaving the build file untouched");
            return Augmentation {
                text: document.render(),
                already_augmented: true,
                inserted_at: None,
            };
        }

        if !facts.custom_commands.is_empty() {
            tracing::info!(
                count = facts.custom_commands.len(),
                "custom build commands found; host rules compile the sources directly"
            );
        }

        let sources = resolver::resolve(&facts.variables);
        tracing::info!(
            extension = %sources.extension,
            source_variable = ?sources.source_variable,
            standard = %facts.profile.language_standard,
            flags = ?facts.profile.flags,
            platform = %self.platform,
            "generating host build targets"
        );

        let block = generator::generate(&facts.profile, &sources, &facts.variables, self.platform);
        let at = document.insertion_point();
        tracing::debug!(at, lines = block.lines().len(), "inserting host block");
        let inserted = document.insert(at, block.render());

        Augmentation {
            text: document.render(),
            already_augmented: false,
            inserted_at: inserted.then_some(at),
        }
    }
}

/// Returns `text` with host build targets added, or unchanged when it already has them.
pub fn augment(text: &str, platform: Platform) -> String {
    Augmenter::new(platform).augment(text).text
}
