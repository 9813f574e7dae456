// Process the input lines with the compiled program
//
// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Diomidis Spinellis
//
// This file is part of the uutils linesed package.
// It is licensed under the MIT License.
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use crate::command::{
    Address, Command, CompiledEntry, Condition, ExecutionState, ProcessingContext, Program,
};
use crate::error_handling::{SedResult, runtime_error};
use crate::fast_io::{InputLines, OutputBuffer};

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

/// What to do after a command has executed
enum Flow {
    Continue, // Run the next command
    Delete,   // End the line's cycle without further output
}

/// Return the text with its line separator (if any) removed, for diagnostics.
fn chomp(text: &str) -> &str {
    text.strip_suffix(['\n', '\0']).unwrap_or(text)
}

/// Write the canonical form of the program to standard error.
fn debug_program(program: &Program) {
    eprintln!("PROGRAM:");
    for entry in program.entries() {
        eprintln!("  {entry}");
    }
    eprintln!("END-OF-PROGRAM");
}

/// Return true if the address matches the current line.
fn match_address(
    addr: &Address,
    entry: &CompiledEntry,
    state: &ExecutionState,
) -> SedResult<bool> {
    match addr {
        Address::Line(n) => Ok(state.line_number == *n),
        Address::LineWithStep(first, 0) => Ok(state.line_number == *first),
        Address::LineWithStep(first, step) => {
            Ok(state.line_number >= *first && (state.line_number - first) % step == 0)
        }
        Address::EndOfInput => Ok(state.last_line),
        Address::Regex(re) => re
            .regex
            .is_match(&state.pattern_space)
            .map_err(|e| runtime_error(&entry.location, entry.command.code(), e)),
    }
}

/// Return true if the range end closes on the line that opened the range.
fn closes_on_opening_line(end: &Address, state: &ExecutionState) -> bool {
    match end {
        Address::Line(n) => *n <= state.line_number,
        Address::EndOfInput => state.last_line,
        _ => false,
    }
}

/// Return true if the entry at index applies to the current line,
/// updating the state of its range.
fn applies(index: usize, entry: &CompiledEntry, state: &mut ExecutionState) -> SedResult<bool> {
    match &entry.condition {
        Condition::Always => Ok(true),
        Condition::At(addr) => match_address(addr, entry, state),
        Condition::Range(start, end) => {
            if state.range_active(index) {
                let closed = match end {
                    Address::Line(n) => state.line_number >= *n,
                    _ => match_address(end, entry, state)?,
                };
                if closed {
                    state.set_range_active(index, false);
                }
                return Ok(true);
            }

            if !match_address(start, entry, state)? {
                return Ok(false);
            }
            if !closes_on_opening_line(end, state) {
                state.set_range_active(index, true);
            }
            Ok(true)
        }
    }
}

/// Execute a single command, appending what it emits to output.
fn execute(
    entry: &CompiledEntry,
    state: &mut ExecutionState,
    output: &mut String,
    context: &ProcessingContext,
) -> SedResult<Flow> {
    match &entry.command {
        Command::Substitute(subst) => {
            let replaced = subst
                .apply(&state.pattern_space)
                .map_err(|e| runtime_error(&entry.location, 's', e))?;
            if let Some(text) = replaced {
                state.pattern_space = text;
            }
            if subst.delete_line {
                return Ok(Flow::Delete);
            }

            if !context.quiet {
                output.push_str(&state.pattern_space);
            }
            if subst.print_extra {
                output.push_str(&state.pattern_space);
            }
        }
        Command::Translate(trans) => {
            state.pattern_space = trans.apply(&state.pattern_space);
            if !context.quiet {
                output.push_str(&state.pattern_space);
            }
        }
    }
    Ok(Flow::Continue)
}

/// Run the program over the line held in the pattern space and return
/// the text it emits.
fn process_line(
    program: &Program,
    state: &mut ExecutionState,
    context: &ProcessingContext,
) -> SedResult<String> {
    let mut output = String::new();
    let mut executed = false;

    if context.debug {
        eprintln!("INPUT: line {}", state.line_number);
        eprintln!("PATTERN: {}", chomp(&state.pattern_space));
    }

    for (index, entry) in program.entries().iter().enumerate() {
        if !applies(index, entry, state)? {
            continue;
        }
        executed = true;

        let flow = execute(entry, state, &mut output, context)?;
        if context.debug {
            eprintln!("COMMAND: {entry}");
            eprintln!("PATTERN: {}", chomp(&state.pattern_space));
        }
        if let Flow::Delete = flow {
            if context.debug {
                eprintln!("DELETE");
            }
            return Ok(output);
        }
    }

    if !executed && !context.quiet {
        output.push_str(&state.pattern_space);
    }
    if context.debug {
        eprintln!("END-OF-CYCLE");
    }
    Ok(output)
}

/// Run the program over a sequence of lines, writing the result to output.
/// One execution state is used for the whole sequence.
pub fn process_lines<I, W>(
    program: &Program,
    input: I,
    output: &mut W,
    context: &ProcessingContext,
) -> SedResult<()>
where
    I: IntoIterator<Item = SedResult<String>>,
    W: Write,
{
    let mut state = ExecutionState::new();
    let mut lines = input.into_iter().peekable();

    while let Some(line) = lines.next() {
        let line = line?;
        let last_line = lines.peek().is_none();
        state.next_line(line, last_line);

        let emitted = process_line(program, &mut state, context)?;
        output.write_all(emitted.as_bytes())?;
        if context.unbuffered {
            output.flush()?;
        }
    }
    Ok(())
}

/// Process all input files
pub fn process_all_files(
    program: &Program,
    files: Vec<PathBuf>,
    mut context: ProcessingContext,
) -> SedResult<()> {
    context.unbuffered = context.unbuffered || io::stdout().is_terminal();
    if context.debug {
        debug_program(program);
    }

    let separator = context.line_separator();
    let mut output = OutputBuffer::new(Box::new(io::stdout()));
    let result = if context.separate {
        files.into_iter().try_for_each(|path| {
            process_lines(
                program,
                InputLines::new(vec![path], separator),
                &mut output,
                &context,
            )
        })
    } else {
        process_lines(
            program,
            InputLines::new(files, separator),
            &mut output,
            &context,
        )
    };

    // Keep the output of the lines processed before any failure.
    output.flush()?;
    result
}
