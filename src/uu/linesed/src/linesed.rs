// Program entry point and CLI processing
//
// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Diomidis Spinellis
//
// This file is part of the uutils linesed package.
// It is licensed under the MIT License.
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

pub mod command;
pub mod compiler;
pub mod delimited_parser;
pub mod error_handling;
pub mod fast_io;
pub mod fast_regex;
pub mod processor;
pub mod script_char_provider;
pub mod script_line_provider;

use crate::command::ProcessingContext;
use crate::compiler::compile;
use crate::processor::process_all_files;
use crate::script_line_provider::ScriptValue;
use clap::{Arg, ArgMatches, Command, arg};
use std::path::PathBuf;
use uucore::error::{UResult, UUsageError};
use uucore::format_usage;

const ABOUT: &str = "Apply substitution and transliteration scripts to text lines";
const USAGE: &str = "linesed [OPTION]... [script] [file]...";

#[uucore::main]
pub fn uumain(args: impl uucore::Args) -> UResult<()> {
    let matches = uu_app().try_get_matches_from(args)?;
    let (scripts, files) = get_scripts_files(&matches)?;
    let processing_context = build_context(&matches);

    let program = compile(scripts)?;
    process_all_files(&program, files, processing_context)?;
    Ok(())
}

pub fn uu_app() -> Command {
    Command::new(uucore::util_name())
        .about(ABOUT)
        .override_usage(format_usage(USAGE))
        .infer_long_args(true)
        .args([
            arg!([script] "Script to execute if not otherwise provided."),
            Arg::new("file")
                .help("Input files")
                .value_parser(clap::value_parser!(PathBuf))
                .num_args(0..),
            arg!(--debug "Annotate program execution."),
            arg!(-e --expression <SCRIPT> "Add script to executed commands.")
                .action(clap::ArgAction::Append),
            // Access with .get_many::<PathBuf>("script-file")
            Arg::new("script-file")
                .short('f')
                .long("script-file")
                .help("Specify script file.")
                .value_parser(clap::value_parser!(PathBuf))
                .action(clap::ArgAction::Append),
            arg!(-n --quiet "Suppress automatic printing of pattern space.").aliases(["silent"]),
            arg!(-s --separate "Consider files as separate rather than as a long stream."),
            arg!(-u --unbuffered "Flush output buffers after every line."),
            Arg::new("null-data")
                .short('z')
                .long("null-data")
                .help("Separate lines by NUL characters.")
                .action(clap::ArgAction::SetTrue),
        ])
}

// Iterate through script and file arguments specified in matches and
// return vectors of all scripts and input files in the specified order.
// If no script is specified fail with "missing script" error.
fn get_scripts_files(matches: &ArgMatches) -> UResult<(Vec<ScriptValue>, Vec<PathBuf>)> {
    let mut indexed_scripts: Vec<(usize, ScriptValue)> = Vec::new();
    let mut files: Vec<PathBuf> = Vec::new();

    let script_through_options =
        matches.contains_id("expression") || matches.contains_id("script-file");

    if script_through_options {
        // The script positional is actually an input file:
        // linesed [-n] -e script [-e script]... [-f script_file]... [file...]
        if let Some(val) = matches.get_one::<String>("script") {
            files.push(PathBuf::from(val.to_owned()));
        }
    } else if let Some(val) = matches.get_one::<String>("script") {
        // linesed [-n] script [file...]
        indexed_scripts.push((0, ScriptValue::StringVal(val.to_owned())));
    } else {
        return Err(UUsageError::new(1, "missing script"));
    }

    if let Some(indices) = matches.indices_of("expression") {
        for (idx, val) in indices.zip(matches.get_many::<String>("expression").unwrap_or_default())
        {
            indexed_scripts.push((idx, ScriptValue::StringVal(val.to_owned())));
        }
    }

    if let Some(indices) = matches.indices_of("script-file") {
        for (idx, val) in indices.zip(
            matches
                .get_many::<PathBuf>("script-file")
                .unwrap_or_default(),
        ) {
            indexed_scripts.push((idx, ScriptValue::PathVal(val.to_owned())));
        }
    }

    // Sort by index to preserve argument order.
    indexed_scripts.sort_by_key(|k| k.0);
    let scripts = indexed_scripts
        .into_iter()
        .map(|(_, value)| value)
        .collect();

    files.extend(
        matches
            .get_many::<PathBuf>("file")
            .unwrap_or_default()
            .cloned(),
    );

    // Read from stdin if no file has been specified.
    if files.is_empty() {
        files.push(PathBuf::from("-"));
    }

    Ok((scripts, files))
}

// Parse CLI flag arguments and return a ProcessingContext struct based on them
fn build_context(matches: &ArgMatches) -> ProcessingContext {
    ProcessingContext {
        debug: matches.get_flag("debug"),
        null_data: matches.get_flag("null-data"),
        quiet: matches.get_flag("quiet"),
        separate: matches.get_flag("separate"),
        unbuffered: matches.get_flag("unbuffered"),
    }
}
