// Error types and location-aware error constructors
//
// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Diomidis Spinellis
//
// This file is part of the uutils linesed package.
// It is licensed under the MIT License.
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use crate::script_char_provider::ScriptCharProvider;
use crate::script_line_provider::ScriptLineProvider;

use std::fmt;
use std::io;
use thiserror::Error;
use uucore::error::UError;

/// Result type used by the compiler and the execution engine.
pub type SedResult<T> = Result<T, SedError>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Position of a construct in the script sources
pub struct ScriptLocation {
    pub input_name: String,
    pub line_number: usize,
    pub column_number: usize,
}

impl ScriptLocation {
    /// Construct from the current position of the given providers.
    pub fn at_position(lines: &ScriptLineProvider, line: &ScriptCharProvider) -> Self {
        Self {
            input_name: lines.get_input_name().to_string(),
            line_number: lines.get_line_number(),
            column_number: line.get_pos() + 1,
        }
    }
}

impl fmt::Display for ScriptLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.input_name, self.line_number, self.column_number
        )
    }
}

/// Errors raised while compiling or executing a script
#[derive(Debug, Error)]
pub enum SedError {
    /// Malformed address, condition, or command syntax
    #[error("{location}: error: {message}")]
    Grammar {
        location: ScriptLocation,
        message: String,
    },

    /// A pattern the regex engine rejects, or a bad group reference
    #[error("{location}: error: invalid regular expression `{pattern}': {message}")]
    RegexCompile {
        location: ScriptLocation,
        pattern: String,
        message: String,
    },

    /// The two strings of a `y` command differ in length
    #[error(
        "{location}: error: strings for `y' command are different lengths ({source_len} and {target_len})"
    )]
    TranslateLengthMismatch {
        location: ScriptLocation,
        source_len: usize,
        target_len: usize,
    },

    /// The regex engine failed while matching input
    #[error("{location}: command `{code}': error: {message}")]
    RegexRuntime {
        location: ScriptLocation,
        code: char,
        message: String,
    },

    /// An input file could not be opened
    #[error("can't read {name}: {source}")]
    Input { name: String, source: io::Error },

    #[error("{0}")]
    Io(#[from] io::Error),
}

impl SedError {
    /// The script location the error refers to, if any.
    pub fn location(&self) -> Option<&ScriptLocation> {
        match self {
            SedError::Grammar { location, .. }
            | SedError::RegexCompile { location, .. }
            | SedError::TranslateLengthMismatch { location, .. }
            | SedError::RegexRuntime { location, .. } => Some(location),
            SedError::Input { .. } | SedError::Io(_) => None,
        }
    }
}

impl UError for SedError {
    fn code(&self) -> i32 {
        match self {
            SedError::Grammar { .. }
            | SedError::RegexCompile { .. }
            | SedError::TranslateLengthMismatch { .. } => 1,
            SedError::RegexRuntime { .. } | SedError::Input { .. } => 2,
            SedError::Io(_) => 4,
        }
    }
}

/// Fail with msg as a compile error at the provider location.
pub fn compilation_error<T>(
    lines: &ScriptLineProvider,
    line: &ScriptCharProvider,
    msg: impl ToString,
) -> SedResult<T> {
    Err(SedError::Grammar {
        location: ScriptLocation::at_position(lines, line),
        message: msg.to_string(),
    })
}

/// Return msg as a runtime error of the command defined at location.
pub fn runtime_error(location: &ScriptLocation, code: char, msg: impl ToString) -> SedError {
    SedError::RegexRuntime {
        location: location.clone(),
        code,
        message: msg.to_string(),
    }
}
