//! entigen CLI library

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

pub mod commands;

pub use commands::{EntityCommand, EntityOutcome, TemplateStatus, TemplatesCommand, Workspace};

use entigen::observability::LogFormat;
use entigen::StylePreset;

/// Log output format flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormatArg {
    /// Compact human-readable lines (default)
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

/// Entity formatting flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StyleArg {
    /// Import statements end with `;`
    Semicolon,
    /// Import statements carry no terminator
    Bare,
}

impl From<StyleArg> for StylePreset {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Semicolon => Self::Semicolon,
            StyleArg::Bare => Self::Bare,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_arg_conversion() {
        assert_eq!(StylePreset::from(StyleArg::Semicolon), StylePreset::Semicolon);
        assert_eq!(StylePreset::from(StyleArg::Bare), StylePreset::Bare);
    }

    #[test]
    fn test_log_format_conversion() {
        assert_eq!(LogFormat::from(LogFormatArg::default()), LogFormat::Pretty);
        assert_eq!(LogFormat::from(LogFormatArg::Json), LogFormat::Json);
    }
}
