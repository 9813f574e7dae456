// Provide a script line character by character
//
// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Diomidis Spinellis
//
// This file is part of the uutils linesed package.
// It is licensed under the MIT License.
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

/// A cursor over the characters of a single script line.
#[derive(Debug)]
pub struct ScriptCharProvider {
    line: Vec<char>,
    pos: usize,
}

impl ScriptCharProvider {
    pub fn new(line_string: &str) -> Self {
        Self {
            line: line_string.chars().collect(),
            pos: 0,
        }
    }

    /// Advances to the next character, if not at end of line.
    pub fn advance(&mut self) {
        if self.pos < self.line.len() {
            self.pos += 1;
        }
    }

    /// Returns the current character. Panics if out of bounds.
    pub fn current(&self) -> char {
        self.line[self.pos]
    }

    /// Returns the current character, or `None` at end of line.
    pub fn peek(&self) -> Option<char> {
        self.line.get(self.pos).copied()
    }

    /// Returns true if the current character is `c`.
    pub fn at(&self, c: char) -> bool {
        self.peek() == Some(c)
    }

    /// Consume the longest run of characters satisfying `pred`.
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut result = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            result.push(c);
            self.pos += 1;
        }
        result
    }

    /// Returns true if at the end of the line.
    /// A trailing newline counts as the end of the line.
    pub fn eol(&self) -> bool {
        self.pos >= self.line.len()
            || (self.line[self.pos] == '\n' && self.pos + 1 == self.line.len())
    }

    /// Advances the position past blanks (spaces and tabs).
    pub fn eat_spaces(&mut self) {
        while self.pos < self.line.len() && matches!(self.line[self.pos], ' ' | '\t') {
            self.pos += 1;
        }
    }

    /// Return current position
    pub fn get_pos(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_navigation() {
        let mut provider = ScriptCharProvider::new("abc");
        assert_eq!(provider.get_pos(), 0);
        assert_eq!(provider.current(), 'a');
        provider.advance();
        assert_eq!(provider.current(), 'b');
        provider.advance();
        assert_eq!(provider.current(), 'c');
        provider.advance();
        assert_eq!(provider.get_pos(), 3);
        assert!(provider.eol());
        provider.advance();
        assert_eq!(provider.get_pos(), 3);
    }

    #[test]
    #[should_panic]
    fn test_current_panics_out_of_bounds() {
        let mut provider = ScriptCharProvider::new("x");
        provider.advance();
        provider.current();
    }

    #[test]
    fn test_trailing_newline_is_eol() {
        let mut provider = ScriptCharProvider::new("s\n");
        assert!(!provider.eol());
        provider.advance();
        assert!(provider.eol());
        assert_eq!(provider.peek(), Some('\n'));
    }

    #[test]
    fn test_embedded_newline_is_not_eol() {
        let mut provider = ScriptCharProvider::new("\nx");
        assert!(!provider.eol());
        provider.advance();
        assert_eq!(provider.current(), 'x');
    }

    #[test]
    fn test_eol_on_empty() {
        let provider = ScriptCharProvider::new("");
        assert!(provider.eol());
        assert_eq!(provider.peek(), None);
    }

    #[test]
    fn test_eat_spaces_stops_at_newline() {
        let mut provider = ScriptCharProvider::new(" \t \nabc");
        provider.eat_spaces();
        assert_eq!(provider.current(), '\n');
    }

    #[test]
    fn test_at() {
        let mut provider = ScriptCharProvider::new("ab");
        assert!(provider.at('a'));
        provider.advance();
        assert!(provider.at('b'));
        provider.advance();
        assert!(!provider.at('b'));
    }

    #[test]
    fn test_take_while() {
        let mut provider = ScriptCharProvider::new("123~4");
        assert_eq!(provider.take_while(|c| c.is_ascii_digit()), "123");
        assert!(provider.at('~'));
        assert_eq!(provider.take_while(|c| c.is_ascii_digit()), "");
        assert_eq!(provider.get_pos(), 3);
    }
}
