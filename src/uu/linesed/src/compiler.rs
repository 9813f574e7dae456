// Compile the scripts into the internal representation of commands
//
// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Diomidis Spinellis
//
// This file is part of the uutils linesed package.
// It is licensed under the MIT License.
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use crate::command::{
    Address, Command, CompiledEntry, Condition, Program, RegexAddress, ReplacementPart,
    ReplacementTemplate, Substitution, Transliteration,
};
use crate::delimited_parser::{DelimitedCommand, parse_delimited_command, parse_regex_address};
use crate::error_handling::{ScriptLocation, SedError, SedResult, compilation_error};
use crate::fast_regex::Regex;
use crate::script_char_provider::ScriptCharProvider;
use crate::script_line_provider::{ScriptLineProvider, ScriptValue};

use std::mem;

/// Compile the scripts into an executable program.
pub fn compile(scripts: Vec<ScriptValue>) -> SedResult<Program> {
    let mut lines = ScriptLineProvider::new(scripts);
    let mut line = ScriptCharProvider::new("");
    let mut program = Program::default();

    loop {
        line.eat_spaces();
        if line.eol() || line.current() == '#' {
            match lines.next_line()? {
                None => return Ok(program),
                Some(line_string) => line = ScriptCharProvider::new(&line_string),
            }
            continue;
        } else if line.current() == ';' {
            line.advance();
            continue;
        }

        program.push(compile_entry(&lines, &mut line)?);
    }
}

/// Compile a single script string.
pub fn compile_script(script: &str) -> SedResult<Program> {
    compile(vec![ScriptValue::StringVal(script.to_string())])
}

/// Compile a condition and the command that follows it.
fn compile_entry(
    lines: &ScriptLineProvider,
    line: &mut ScriptCharProvider,
) -> SedResult<CompiledEntry> {
    let condition = compile_condition(lines, line)?;

    line.eat_spaces();
    if line.eol() {
        return compilation_error(lines, line, "missing command");
    }

    let location = ScriptLocation::at_position(lines, line);
    let command = match line.current() {
        's' | 'y' => {
            let tokens = parse_delimited_command(lines, line)?;
            if tokens.code == 's' {
                compile_subst_command(lines, line, tokens, &location)?
            } else {
                compile_trans_command(tokens, &location)?
            }
        }
        c => return compilation_error(lines, line, format!("unknown command: `{c}'")),
    };

    parse_command_ending(lines, line)?;
    Ok(CompiledEntry {
        condition,
        command,
        location,
    })
}

/// Return true if c is a valid character for starting an address
fn is_address_char(c: char) -> bool {
    matches!(c, '0'..='9' | '/' | '$')
}

/// Compile a command's optional address or address range.
fn compile_condition(
    lines: &ScriptLineProvider,
    line: &mut ScriptCharProvider,
) -> SedResult<Condition> {
    line.eat_spaces();
    if line.eol() || !is_address_char(line.current()) {
        return Ok(Condition::Always);
    }
    let start = compile_address(lines, line)?;

    line.eat_spaces();
    if !line.at(',') {
        return Ok(Condition::At(start));
    }
    line.advance();
    line.eat_spaces();
    if line.eol() || !is_address_char(line.current()) {
        return compilation_error(lines, line, "unexpected `,'");
    }
    let end = compile_address(lines, line)?;

    Ok(Condition::Range(start, end))
}

/// Compile and return a single address specification.
fn compile_address(
    lines: &ScriptLineProvider,
    line: &mut ScriptCharProvider,
) -> SedResult<Address> {
    match line.current() {
        '/' => {
            let location = ScriptLocation::at_position(lines, line);
            let pattern = parse_regex_address(lines, line)?;

            let ignore_case = line.at('i') || line.at('I');
            if ignore_case {
                line.advance();
            }

            let regex = compile_regex(&pattern, ignore_case, &location)?;
            Ok(Address::Regex(Box::new(RegexAddress {
                pattern,
                ignore_case,
                regex,
            })))
        }
        '$' => {
            line.advance();
            Ok(Address::EndOfInput)
        }
        _ => {
            let first = parse_number(lines, line)?;
            if line.at('~') {
                line.advance();
                if !line.peek().is_some_and(|c| c.is_ascii_digit()) {
                    return compilation_error(lines, line, "expected step after `~'");
                }
                let step = parse_number(lines, line)?;
                return Ok(Address::LineWithStep(first, step));
            }

            if first == 0 {
                return compilation_error(lines, line, "invalid usage of line address 0");
            }
            Ok(Address::Line(first))
        }
    }
}

/// Parse and return the decimal number at the current line position.
/// Advance the line to first non-digit or EOL.
fn parse_number(lines: &ScriptLineProvider, line: &mut ScriptCharProvider) -> SedResult<usize> {
    let num_str = line.take_while(|c| c.is_ascii_digit());

    match num_str.parse::<usize>() {
        Ok(n) => Ok(n),
        Err(_) => compilation_error(lines, line, format!("invalid number '{num_str}'")),
    }
}

/// Parse the end of a command, failing with an error on extra characters.
fn parse_command_ending(
    lines: &ScriptLineProvider,
    line: &mut ScriptCharProvider,
) -> SedResult<()> {
    line.eat_spaces();
    if line.eol() || line.at('#') {
        return Ok(());
    }
    if line.at(';') {
        line.advance();
        return Ok(());
    }

    compilation_error(lines, line, "extra characters after command")
}

/// Compile the provided regular expression string into a corresponding engine.
fn compile_regex(pattern: &str, icase: bool, location: &ScriptLocation) -> SedResult<Regex> {
    let full_pattern = if icase {
        format!("(?i){pattern}")
    } else {
        pattern.to_string()
    };

    Regex::new(&full_pattern).map_err(|message| SedError::RegexCompile {
        location: location.clone(),
        pattern: pattern.to_string(),
        message,
    })
}

/// Return the escaped character for \c in a replacement, if any.
fn replacement_escape(c: char) -> Option<char> {
    match c {
        'a' => Some('\x07'),
        'b' => Some('\x08'),
        'f' => Some('\x0c'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\x0b'),
        '\\' => Some('\\'),
        _ => None,
    }
}

/// Compile a regular expression replacement string.
/// Supports \1 to \99, \g<number>, \g<name>, \0 octal escapes, and
/// character escapes.
pub fn compile_replacement(
    text: &str,
    regex: &Regex,
    location: &ScriptLocation,
) -> SedResult<ReplacementTemplate> {
    let invalid_reference = |reference: &str| SedError::RegexCompile {
        location: location.clone(),
        pattern: text.to_string(),
        message: format!("invalid group reference {reference}"),
    };

    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            literal.push(c);
            continue;
        }

        match chars.peek().copied() {
            Some(d) if d.is_ascii_digit() && d != '0' => {
                let mut number = String::new();
                while number.len() < 2 {
                    match chars.peek() {
                        Some(d) if d.is_ascii_digit() => {
                            number.push(*d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                // The caller's regex defines which groups exist.
                let group: usize = number.parse().map_err(|_| invalid_reference(&number))?;
                parts.push(ReplacementPart::Literal(mem::take(&mut literal)));
                parts.push(ReplacementPart::Group(group));
            }
            Some('g') => {
                chars.next();
                if chars.next() != Some('<') {
                    return Err(invalid_reference("\\g"));
                }
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('>') => break,
                        Some(c) => name.push(c),
                        None => return Err(invalid_reference(&format!("\\g<{name}"))),
                    }
                }
                if name.is_empty() {
                    return Err(invalid_reference("\\g<>"));
                }
                parts.push(ReplacementPart::Literal(mem::take(&mut literal)));
                match name.parse::<usize>() {
                    Ok(group) => parts.push(ReplacementPart::Group(group)),
                    Err(_) => parts.push(ReplacementPart::Named(name)),
                }
            }
            Some('0') => {
                // \0 starts an octal escape of up to three digits.
                let mut code = 0;
                for _ in 0..3 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                literal.push(char::from_u32(code).unwrap_or('\0'));
            }
            Some(e) => {
                chars.next();
                match replacement_escape(e) {
                    Some(decoded) => literal.push(decoded),
                    None => {
                        literal.push('\\');
                        literal.push(e);
                    }
                }
            }
            None => literal.push('\\'),
        }
    }
    parts.push(ReplacementPart::Literal(literal));
    parts.retain(|part| !matches!(part, ReplacementPart::Literal(s) if s.is_empty()));

    let template = ReplacementTemplate::new(parts);
    let max_group_number = template.max_group_number();
    if max_group_number >= regex.captures_len() {
        return Err(invalid_reference(&format!("\\{max_group_number}")));
    }
    if let Some(name) = template.group_names().find(|name| !regex.has_group_name(name)) {
        return Err(invalid_reference(&format!("\\g<{name}>")));
    }

    Ok(template)
}

#[derive(Debug, Default)]
/// Flags that follow the replacement of an `s` command
struct SubstFlags {
    global: bool,
    print_extra: bool,
    ignore_case: bool,
    delete_line: bool,
}

/// Validate the substitution command's flags against the set {g, p, i, d}.
fn compile_subst_flags(
    lines: &ScriptLineProvider,
    line: &ScriptCharProvider,
    flags: &str,
) -> SedResult<SubstFlags> {
    let mut result = SubstFlags::default();
    for flag in flags.chars() {
        let seen = match flag {
            'g' => mem::replace(&mut result.global, true),
            'p' => mem::replace(&mut result.print_extra, true),
            'i' => mem::replace(&mut result.ignore_case, true),
            'd' => mem::replace(&mut result.delete_line, true),
            _ => return compilation_error(lines, line, format!("unknown option to `s': {flag}")),
        };
        if seen {
            return compilation_error(
                lines,
                line,
                format!("multiple `{flag}' options to `s' command"),
            );
        }
    }
    Ok(result)
}

fn compile_subst_command(
    lines: &ScriptLineProvider,
    line: &ScriptCharProvider,
    tokens: DelimitedCommand,
    location: &ScriptLocation,
) -> SedResult<Command> {
    let flags = compile_subst_flags(lines, line, &tokens.flags)?;
    let regex = compile_regex(&tokens.pattern, flags.ignore_case, location)?;
    let replacement = compile_replacement(&tokens.replacement, &regex, location)?;

    Ok(Command::Substitute(Box::new(Substitution {
        regex,
        pattern: tokens.pattern,
        replacement_text: tokens.replacement,
        replacement,
        delimiter: tokens.delimiter,
        global: flags.global,
        ignore_case: flags.ignore_case,
        print_extra: flags.print_extra,
        delete_line: flags.delete_line,
    })))
}

fn compile_trans_command(
    tokens: DelimitedCommand,
    location: &ScriptLocation,
) -> SedResult<Command> {
    let source_len = tokens.pattern.chars().count();
    let target_len = tokens.replacement.chars().count();
    if source_len != target_len {
        return Err(SedError::TranslateLengthMismatch {
            location: location.clone(),
            source_len,
            target_len,
        });
    }

    let mut transliteration = Transliteration::from_strings(&tokens.pattern, &tokens.replacement);
    transliteration.delimiter = tokens.delimiter;
    Ok(Command::Translate(Box::new(transliteration)))
}
