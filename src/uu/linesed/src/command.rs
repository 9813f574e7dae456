// Definitions for the compiled code data structures
//
// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Diomidis Spinellis
//
// This file is part of the uutils linesed package.
// It is licensed under the MIT License.
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use crate::error_handling::ScriptLocation;
use crate::fast_regex::{Captures, Regex};

use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Default, Clone)]
/// Processing options provided through the command-line interface
pub struct ProcessingContext {
    pub debug: bool,
    pub null_data: bool,
    pub quiet: bool,
    pub separate: bool,
    pub unbuffered: bool,
}

impl ProcessingContext {
    /// The byte that terminates input lines.
    pub fn line_separator(&self) -> u8 {
        if self.null_data { b'\0' } else { b'\n' }
    }
}

#[derive(Debug)]
/// A regular expression used as an address
pub struct RegexAddress {
    pub pattern: String, // Pattern as written in the script
    pub ignore_case: bool,
    pub regex: Regex,
}

#[derive(Debug)]
/// Types of address specifications that precede commands
pub enum Address {
    Line(usize),                 // Specific line
    LineWithStep(usize, usize),  // first~step
    EndOfInput,                  // Last line
    Regex(Box<RegexAddress>),    // Line that matches regex
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Line(n) => write!(f, "{n}"),
            Address::LineWithStep(first, step) => write!(f, "{first}~{step}"),
            Address::EndOfInput => write!(f, "$"),
            Address::Regex(re) => {
                write!(f, "/{}/", re.pattern)?;
                if re.ignore_case {
                    write!(f, "i")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Default)]
/// Lines a command applies to
pub enum Condition {
    #[default]
    Always,
    At(Address),
    Range(Address, Address),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Always => Ok(()),
            Condition::At(addr) => write!(f, "{addr}"),
            Condition::Range(start, end) => write!(f, "{start},{end}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A single part of an RE replacement
pub enum ReplacementPart {
    Literal(String), // Normal text
    Group(usize),    // \1 to \99, \g<1>
    Named(String),   // \g<name>
}

#[derive(Debug, Clone, Default, PartialEq)]
/// All specified replacements for an RE
pub struct ReplacementTemplate {
    pub parts: Vec<ReplacementPart>,
}

impl ReplacementTemplate {
    pub fn new(parts: Vec<ReplacementPart>) -> Self {
        Self { parts }
    }

    /// Highest group number referenced (0 if none).
    pub fn max_group_number(&self) -> usize {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ReplacementPart::Group(n) => Some(*n),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Names of the groups referenced by name.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            ReplacementPart::Named(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Append the expansion of the template for the given captures to
    /// `result`. Groups that did not take part in the match expand to
    /// the empty string.
    pub fn apply_captures(&self, caps: &Captures, result: &mut String) {
        for part in &self.parts {
            match part {
                ReplacementPart::Literal(s) => result.push_str(s),
                ReplacementPart::Group(n) => {
                    if let Some(m) = caps.get(*n) {
                        result.push_str(m.as_str());
                    }
                }
                ReplacementPart::Named(name) => {
                    if let Some(m) = caps.name(name) {
                        result.push_str(m.as_str());
                    }
                }
            }
        }
    }
}

#[derive(Debug)]
/// Substitution command
pub struct Substitution {
    pub regex: Regex,                     // Compiled pattern
    pub pattern: String,                  // Pattern as written in the script
    pub replacement_text: String,         // Replacement as written in the script
    pub replacement: ReplacementTemplate, // Broken-down replacement
    pub delimiter: char,
    pub global: bool,       // True if 'g' flag
    pub ignore_case: bool,  // True if 'i' flag
    pub print_extra: bool,  // True if 'p' flag
    pub delete_line: bool,  // True if 'd' flag
}

impl Substitution {
    /// Substitute the first (or, if global, every) match of the regex in
    /// `text`. Return `None` if nothing matched.
    pub fn apply(&self, text: &str) -> Result<Option<String>, fancy_regex::Error> {
        let mut result = String::with_capacity(text.len());
        let mut last_end = 0;
        let mut replaced = false;

        for caps in self.regex.captures_iter(text) {
            let caps = caps?;
            let Some(m) = caps.get(0) else {
                continue;
            };
            result.push_str(&text[last_end..m.start()]);
            self.replacement.apply_captures(&caps, &mut result);
            last_end = m.end();
            replaced = true;

            if !self.global {
                break;
            }
        }

        if !replaced {
            return Ok(None);
        }
        result.push_str(&text[last_end..]);
        Ok(Some(result))
    }
}

/// The block of the first and most common Unicode characters:
/// ASCII, Latin Extended, Greek, Cyrillic, Coptic, Arabic, etc.
/// We use a fast lookup array for these.
const COMMON_UNICODE: usize = 2048;

#[derive(Debug)]
/// Transliteration command (y)
pub struct Transliteration {
    mapping: Vec<(char, char)>, // Pairs in declaration order
    fast: Box<[char; COMMON_UNICODE]>,
    pub delimiter: char,
}

impl Default for Transliteration {
    /// Create a transliteration that maps every character to itself.
    fn default() -> Self {
        let mut fast = Box::new(['\0'; COMMON_UNICODE]);
        for (i, slot) in fast.iter_mut().enumerate() {
            *slot = char::from_u32(i as u32).unwrap_or('\0');
        }
        Self {
            mapping: Vec::new(),
            fast,
            delimiter: '/',
        }
    }
}

impl Transliteration {
    /// Create from the pairwise mapping of `source` to `target`
    /// characters. The caller checks that the lengths match.
    pub fn from_strings(source: &str, target: &str) -> Self {
        let mut result = Self::default();
        for (from, to) in source.chars().zip(target.chars()) {
            result.push(from, to);
        }
        result
    }

    /// Append a mapping pair. An earlier pair for the same source wins.
    fn push(&mut self, from: char, to: char) {
        if self.mapping.iter().any(|&(f, _)| f == from) {
            self.mapping.push((from, to));
            return;
        }
        let cp = from as usize;
        if cp < COMMON_UNICODE {
            self.fast[cp] = to;
        }
        self.mapping.push((from, to));
    }

    /// Look up a character transliteration.
    pub fn lookup(&self, ch: char) -> char {
        let cp = ch as usize;
        if cp < COMMON_UNICODE {
            self.fast[cp]
        } else {
            self.mapping
                .iter()
                .find(|&&(from, _)| from == ch)
                .map_or(ch, |&(_, to)| to)
        }
    }

    /// Transliterate all characters of `text`.
    pub fn apply(&self, text: &str) -> String {
        text.chars().map(|c| self.lookup(c)).collect()
    }

    /// The mapping pairs in declaration order.
    pub fn mapping(&self) -> &[(char, char)] {
        &self.mapping
    }
}

#[derive(Debug)]
/// An executable command
pub enum Command {
    Substitute(Box<Substitution>),
    Translate(Box<Transliteration>),
}

impl Command {
    /// The script letter of the command.
    pub fn code(&self) -> char {
        match self {
            Command::Substitute(_) => 's',
            Command::Translate(_) => 'y',
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Substitute(s) => {
                let d = s.delimiter;
                write!(f, "s{d}{}{d}{}{d}", s.pattern, s.replacement_text)?;
                for (set, flag) in [
                    (s.global, 'g'),
                    (s.print_extra, 'p'),
                    (s.ignore_case, 'i'),
                    (s.delete_line, 'd'),
                ] {
                    if set {
                        write!(f, "{flag}")?;
                    }
                }
                Ok(())
            }
            Command::Translate(t) => {
                let d = t.delimiter;
                let source: String = t.mapping.iter().map(|&(from, _)| from).collect();
                let target: String = t.mapping.iter().map(|&(_, to)| to).collect();
                write!(f, "y{d}{source}{d}{target}{d}")
            }
        }
    }
}

#[derive(Debug)]
/// A command together with the lines it applies to
pub struct CompiledEntry {
    pub condition: Condition,
    pub command: Command,
    pub location: ScriptLocation, // Command's definition location
}

impl fmt::Display for CompiledEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.condition, self.command)
    }
}

#[derive(Debug, Default)]
/// A compiled script: its commands in execution order
pub struct Program {
    entries: Vec<CompiledEntry>,
}

impl Program {
    pub(crate) fn push(&mut self, entry: CompiledEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[CompiledEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
/// The state of a single run of a program over an input sequence
pub struct ExecutionState {
    /// Current input line number (1-based once a line is read)
    pub line_number: usize,
    /// True if the current line is the last one
    pub last_line: bool,
    /// Working copy of the current line
    pub pattern_space: String,
    /// Hold space; no supported command fills it
    pub hold_space: Option<String>,
    /// Open/closed status of each entry's range condition
    range_active: HashMap<usize, bool>,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the next input line into the pattern space.
    pub fn next_line(&mut self, line: String, last_line: bool) {
        self.line_number += 1;
        self.last_line = last_line;
        self.pattern_space = line;
    }

    /// True if the range condition of the entry at index is open.
    pub fn range_active(&self, index: usize) -> bool {
        self.range_active.get(&index).copied().unwrap_or(false)
    }

    pub fn set_range_active(&mut self, index: usize, active: bool) {
        self.range_active.insert(index, active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subst(pattern: &str, parts: Vec<ReplacementPart>, global: bool) -> Substitution {
        Substitution {
            regex: Regex::new(pattern).unwrap(),
            pattern: pattern.to_string(),
            replacement_text: String::new(),
            replacement: ReplacementTemplate::new(parts),
            delimiter: '/',
            global,
            ignore_case: false,
            print_extra: false,
            delete_line: false,
        }
    }

    fn lit(s: &str) -> ReplacementPart {
        ReplacementPart::Literal(s.to_string())
    }

    #[test]
    fn test_apply_first_only() {
        let s = subst("a", vec![lit("b")], false);
        assert_eq!(s.apply("aa").unwrap().as_deref(), Some("ba"));
    }

    #[test]
    fn test_apply_global() {
        let s = subst("a", vec![lit("b")], true);
        assert_eq!(s.apply("aXa").unwrap().as_deref(), Some("bXb"));
    }

    #[test]
    fn test_apply_no_match() {
        let s = subst("z", vec![lit("b")], true);
        assert_eq!(s.apply("aaa").unwrap(), None);
    }

    #[test]
    fn test_apply_empty_pattern_global() {
        let s = subst("", vec![lit("-")], true);
        assert_eq!(s.apply("ab").unwrap().as_deref(), Some("-a-b-"));
    }

    #[test]
    fn test_apply_groups() {
        let s = subst(
            r"(\w+):(\d+)",
            vec![
                lit("key: "),
                ReplacementPart::Group(1),
                lit(", value: "),
                ReplacementPart::Group(2),
            ],
            false,
        );
        assert_eq!(
            s.apply("x:123").unwrap().as_deref(),
            Some("key: x, value: 123")
        );
    }

    #[test]
    fn test_apply_unmatched_group_is_empty() {
        let s = subst(
            "(a)|(b)",
            vec![lit("<"), ReplacementPart::Group(1), lit(">")],
            false,
        );
        assert_eq!(s.apply("b").unwrap().as_deref(), Some("<>"));
    }

    #[test]
    fn test_apply_named_group_with_backreference() {
        let s = subst(
            r"(?P<word>\w+) (?P=word)",
            vec![ReplacementPart::Named("word".to_string())],
            false,
        );
        assert!(!s.regex.is_plain());
        assert_eq!(s.apply("the the end").unwrap().as_deref(), Some("the end"));
    }

    #[test]
    fn test_max_group_number() {
        let template = ReplacementTemplate::new(vec![
            lit("a"),
            ReplacementPart::Group(2),
            ReplacementPart::Named("x".to_string()),
            ReplacementPart::Group(5),
        ]);
        assert_eq!(template.max_group_number(), 5);
        assert_eq!(template.group_names().collect::<Vec<_>>(), vec!["x"]);
        assert_eq!(ReplacementTemplate::default().max_group_number(), 0);
    }

    #[test]
    fn test_identity_lookup() {
        let t = Transliteration::default();
        assert_eq!(t.lookup('A'), 'A');
        assert_eq!(t.lookup('\u{07FF}'), '\u{07FF}');
        assert_eq!(t.lookup('\u{1F600}'), '\u{1F600}');
    }

    #[test]
    fn test_basic_transliteration() {
        let t = Transliteration::from_strings("abcδ", "1234");
        assert_eq!(t.lookup('a'), '1');
        assert_eq!(t.lookup('δ'), '4');
        assert_eq!(t.lookup('e'), 'e');
        assert_eq!(t.apply("a2c"), "123");
    }

    #[test]
    fn test_unicode_slow_path() {
        let t = Transliteration::from_strings("é漢🦀", "e文c");
        assert_eq!(t.lookup('漢'), '文');
        assert_eq!(t.lookup('🦀'), 'c');
        assert_eq!(t.lookup('文'), '文');
    }

    #[test]
    fn test_first_mapping_wins() {
        let t = Transliteration::from_strings("aa", "12");
        assert_eq!(t.lookup('a'), '1');

        let t = Transliteration::from_strings("🦀🦀", "xy");
        assert_eq!(t.lookup('🦀'), 'x');
        assert_eq!(t.mapping(), &[('🦀', 'x'), ('🦀', 'y')]);
    }

    #[test]
    fn test_range_state() {
        let mut state = ExecutionState::new();
        assert!(!state.range_active(3));
        state.set_range_active(3, true);
        assert!(state.range_active(3));
        assert!(!state.range_active(0));
    }

    #[test]
    fn test_next_line() {
        let mut state = ExecutionState::new();
        state.next_line("one\n".to_string(), false);
        state.next_line("two\n".to_string(), true);
        assert_eq!(state.line_number, 2);
        assert!(state.last_line);
        assert_eq!(state.pattern_space, "two\n");
        assert_eq!(state.hold_space, None);
    }
}
