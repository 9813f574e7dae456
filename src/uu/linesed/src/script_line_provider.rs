// Provide the script contents line by line
//
// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Diomidis Spinellis
//
// This file is part of the uutils linesed package.
// It is licensed under the MIT License.
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
/// The specification of a script: through a string or a file
pub enum ScriptValue {
    StringVal(String),
    PathVal(PathBuf),
}

/// Concatenate all script sources into a single sequence of lines,
/// keeping track of where each line came from.
pub struct ScriptLineProvider {
    sources: std::vec::IntoIter<ScriptValue>,
    expression_count: usize,
    state: State,
}

enum State {
    Idle,
    Active {
        reader: Box<dyn BufRead>,
        input_name: String,
        line_number: usize,
    },
}

impl ScriptLineProvider {
    pub fn new(sources: Vec<ScriptValue>) -> Self {
        Self {
            sources: sources.into_iter(),
            expression_count: 0,
            state: State::Idle,
        }
    }

    /// Number of the line last returned, within its source.
    pub fn get_line_number(&self) -> usize {
        match &self.state {
            State::Active { line_number, .. } => *line_number,
            State::Idle => 0,
        }
    }

    /// Name of the source the last line was read from.
    pub fn get_input_name(&self) -> &str {
        match &self.state {
            State::Active { input_name, .. } => input_name.as_str(),
            State::Idle => "",
        }
    }

    /// Return the next script line, including its newline (if any),
    /// or `None` once all sources are exhausted.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            if let State::Active {
                reader,
                line_number,
                ..
            } = &mut self.state
            {
                let mut line = String::new();
                if reader.read_line(&mut line)? > 0 {
                    *line_number += 1;
                    return Ok(Some(line));
                }
            }

            match self.sources.next() {
                Some(source) => self.open(source)?,
                None => return Ok(None),
            }
        }
    }

    fn open(&mut self, source: ScriptValue) -> io::Result<()> {
        let (reader, input_name): (Box<dyn BufRead>, String) = match source {
            ScriptValue::StringVal(s) => {
                self.expression_count += 1;
                (
                    Box::new(Cursor::new(s)),
                    format!("-e expression #{}", self.expression_count),
                )
            }
            ScriptValue::PathVal(p) if p.as_os_str() == "-" => {
                (Box::new(BufReader::new(io::stdin())), "<stdin>".to_string())
            }
            ScriptValue::PathVal(p) => {
                let file = File::open(&p).map_err(|e| {
                    io::Error::new(
                        e.kind(),
                        format!("couldn't open file {}: {}", p.display(), e),
                    )
                })?;
                (Box::new(BufReader::new(file)), p.display().to_string())
            }
        };

        self.state = State::Active {
            reader,
            input_name,
            line_number: 0,
        };
        Ok(())
    }
}

#[cfg(test)]
impl ScriptLineProvider {
    /// A provider positioned on the given source name and line.
    pub fn with_active_state(input_name: &str, line_number: usize) -> Self {
        Self {
            sources: Vec::new().into_iter(),
            expression_count: 0,
            state: State::Active {
                reader: Box::new(Cursor::new(String::new())),
                input_name: input_name.to_string(),
                line_number,
            },
        }
    }
}
