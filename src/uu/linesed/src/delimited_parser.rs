// Parse delimited character sequences
//
// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Diomidis Spinellis
//
// This file is part of the uutils linesed package.
// It is licensed under the MIT License.
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use crate::error_handling::{SedResult, compilation_error};
use crate::script_char_provider::ScriptCharProvider;
use crate::script_line_provider::ScriptLineProvider;

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// The raw segments of an `s` or `y` command
pub struct DelimitedCommand {
    pub code: char,
    pub delimiter: char,
    pub pattern: String,
    pub replacement: String,
    pub flags: String, // Always empty for `y`
}

impl fmt::Display for DelimitedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.delimiter;
        write!(
            f,
            "{}{d}{}{d}{}{d}{}",
            self.code, self.pattern, self.replacement, self.flags
        )
    }
}

/// Scan and return the delimiter that follows a command letter.
/// Advances the line past the delimiter.
pub fn scan_delimiter(
    lines: &ScriptLineProvider,
    line: &mut ScriptCharProvider,
    code: char,
) -> SedResult<char> {
    match line.peek() {
        Some(c) if !c.is_whitespace() && !c.is_control() => {
            line.advance();
            Ok(c)
        }
        _ if line.eol() => compilation_error(lines, line, format!("unterminated `{code}' command")),
        Some(c) => compilation_error(
            lines,
            line,
            format!("{c:?} cannot be used as a `{code}' delimiter"),
        ),
        None => compilation_error(lines, line, format!("unterminated `{code}' command")),
    }
}

/// Scan the characters up to the delimiter and return them.
/// No escape processing takes place. Advances the line past the
/// delimiter.
pub fn scan_segment(
    lines: &ScriptLineProvider,
    line: &mut ScriptCharProvider,
    code: char,
    delimiter: char,
) -> SedResult<String> {
    let segment = line.take_while(|c| c != delimiter && c != '\n');
    if !line.at(delimiter) {
        return compilation_error(lines, line, format!("unterminated `{code}' command"));
    }
    line.advance();
    Ok(segment)
}

/// Scan an `s` or `y` command starting at its command letter.
/// On return the line is past the final delimiter and, for `s`, past
/// the flag characters.
pub fn parse_delimited_command(
    lines: &ScriptLineProvider,
    line: &mut ScriptCharProvider,
) -> SedResult<DelimitedCommand> {
    let code = line.current();
    line.advance();

    let delimiter = scan_delimiter(lines, line, code)?;
    let pattern = scan_segment(lines, line, code, delimiter)?;
    let replacement = scan_segment(lines, line, code, delimiter)?;
    let flags = if code == 's' {
        line.take_while(|c| c.is_ascii_alphanumeric())
    } else {
        String::new()
    };

    Ok(DelimitedCommand {
        code,
        delimiter,
        pattern,
        replacement,
        flags,
    })
}

/// Parse a `/`-delimited regular expression address and return its body.
/// At entry the line is on the opening `/`; on return it is past the
/// closing one.
pub fn parse_regex_address(
    lines: &ScriptLineProvider,
    line: &mut ScriptCharProvider,
) -> SedResult<String> {
    line.advance(); // skip opening '/'
    let body = line.take_while(|c| c != '/' && c != '\n');
    if !line.at('/') {
        return compilation_error(lines, line, "unterminated address regex");
    }
    line.advance();

    if body.is_empty() {
        return compilation_error(lines, line, "empty address regex");
    }
    Ok(body)
}
