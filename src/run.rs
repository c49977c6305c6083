use alloc::format;
use alloc::string::String;

use crate::error::AugmentError;
use crate::os::Os;
use crate::platform::Platform;
use crate::Augmenter;

pub const BACKUP_SUFFIX: &str = ".bak";

#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub input: String,
    /// `None` overwrites the input, keeping a one-time backup.
    pub output: Option<String>,
    pub platform: Platform,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The input already carries the sentinel; nothing was written.
    AlreadyAugmented,
    /// Dry run. Holds the text that would have been written.
    DryRun(String),
    Written {
        output: String,
        backup: Option<String>,
    },
}

/// Reads the input, augments it and writes the result.
///
/// When the input is overwritten in place, its original content is copied
/// to `<input>.bak` first, unless that file already exists.
pub fn run(os: &dyn Os, options: &RunOptions) -> Result<Outcome, AugmentError> {
    let input = options.input.as_str();

    let exists = os.exists(input).map_err(|e| AugmentError::read(input, e))?;
    if !exists {
        return Err(AugmentError::InputNotFound(input.into()));
    }
    let bytes = os.read_file(input).map_err(|e| AugmentError::read(input, e))?;
    let content = String::from_utf8(bytes)
        .map_err(|e| AugmentError::read(input, anyhow::Error::msg(e)))?;

    let augmentation = Augmenter::new(options.platform).augment(&content);

    if augmentation.already_augmented {
        tracing::info!(path = input, "already has host build targets");
        if !options.dry_run {
            return Ok(Outcome::AlreadyAugmented);
        }
    }
    if options.dry_run {
        return Ok(Outcome::DryRun(augmentation.text));
    }

    let output = options.output.as_deref().unwrap_or(input);

    let mut backup = None;
    if options.output.is_none() {
        let backup_path = format!("{input}{BACKUP_SUFFIX}");
        let backup_exists = os
            .exists(&backup_path)
            .map_err(|e| AugmentError::write(&backup_path, e))?;
        if !backup_exists {
            os.write_file(&backup_path, content.as_bytes())
                .map_err(|e| AugmentError::write(&backup_path, e))?;
            tracing::info!(path = %backup_path, "original backed up");
            backup = Some(backup_path);
        }
    }

    os.write_file(output, augmentation.text.as_bytes())
        .map_err(|e| AugmentError::write(output, e))?;
    tracing::info!(path = output, "augmented build file written");

    Ok(Outcome::Written {
        output: output.into(),
        backup,
    })
}
