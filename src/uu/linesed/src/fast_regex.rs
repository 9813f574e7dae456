// A unified interface to the regex and fancy-regex engines
//
// This allows using the linear-time regex crate when possible,
// resorting to the slower backtracking fancy_regex crate when a
// pattern needs back-references or look-around.
//
// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Diomidis Spinellis
//
// This file is part of the uutils linesed package.
// It is licensed under the MIT License.
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use fancy_regex::{
    CaptureMatches as FancyCaptureMatches, Captures as FancyCaptures, Regex as FancyRegex,
};
use once_cell::sync::Lazy;
use regex::{
    CaptureMatches as PlainCaptureMatches, Captures as PlainCaptures, Regex as PlainRegex,
};

#[derive(Clone, Debug)]
/// A regular expression implemented through regex or fancy-regex
pub enum Regex {
    Plain(PlainRegex),
    Fancy(FancyRegex),
}

impl Regex {
    /// Construct the most efficient engine possible
    pub fn new(pattern: &str) -> Result<Self, String> {
        // Constructs that only fancy_regex supports, when they
        // appear outside a backslash escape:
        //   \1 .. \9         Back-references
        //   (?P=name)        Named back-reference
        //   (?= (?! (?<= (?<!  Look-ahead and look-behind
        //   (?>              Atomic group
        static NEEDS_FANCY_RE: Lazy<PlainRegex> = Lazy::new(|| {
            PlainRegex::new(
                r"(?x) # Turn on verbose mode
                  (?: ^ | [^\\] )          # At BOL or after a non \
                  (?: \\\\ )*              # followed by escaped backslashes
                  (?:
                    \\ [1-9]               # Back-reference
                    | \( \? (?: P= | = | ! | <= | <! | > )  # Extended group
                  )
                ",
            )
            .expect("valid fancy detection RE")
        });

        if NEEDS_FANCY_RE.is_match(pattern) {
            FancyRegex::new(pattern)
                .map(Self::Fancy)
                .map_err(|e| e.to_string())
        } else {
            PlainRegex::new(pattern)
                .map(Self::Plain)
                .map_err(|e| e.to_string())
        }
    }

    /// Return true if this uses the regex crate engine.
    pub fn is_plain(&self) -> bool {
        matches!(self, Regex::Plain(_))
    }

    /// Check if the regex matches anywhere in text.
    pub fn is_match(&self, text: &str) -> Result<bool, fancy_regex::Error> {
        match self {
            Regex::Plain(re) => Ok(re.is_match(text)),
            Regex::Fancy(re) => re.is_match(text),
        }
    }

    /// Return an iterator over the successive non-overlapping captures.
    pub fn captures_iter<'r, 't>(&'r self, text: &'t str) -> CaptureMatches<'r, 't> {
        match self {
            Regex::Plain(re) => CaptureMatches::Plain(re.captures_iter(text)),
            Regex::Fancy(re) => CaptureMatches::Fancy(re.captures_iter(text)),
        }
    }

    /// Return the number of capture groups, including group 0.
    pub fn captures_len(&self) -> usize {
        match self {
            Regex::Plain(re) => re.captures_len(),
            Regex::Fancy(re) => re.captures_len(),
        }
    }

    /// Return true if the regex defines a group with the given name.
    pub fn has_group_name(&self, name: &str) -> bool {
        match self {
            Regex::Plain(re) => re.capture_names().flatten().any(|n| n == name),
            Regex::Fancy(re) => re.capture_names().flatten().any(|n| n == name),
        }
    }
}

/// Unified enum for holding either plain or fancy capture iterators.
pub enum CaptureMatches<'r, 't> {
    Plain(PlainCaptureMatches<'r, 't>),
    Fancy(FancyCaptureMatches<'r, 't>),
}

impl<'t> Iterator for CaptureMatches<'_, 't> {
    type Item = Result<Captures<'t>, fancy_regex::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            CaptureMatches::Plain(iter) => iter.next().map(|caps| Ok(Captures::Plain(caps))),
            CaptureMatches::Fancy(iter) => iter.next().map(|caps| caps.map(Captures::Fancy)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
/// Result type for RE capture get(n)
pub struct Match<'t> {
    start: usize,  // Match start
    end: usize,    // Match end
    text: &'t str, // Actual match
}

/// Provide interface compatible with regex::Match.
impl<'t> Match<'t> {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn as_str(&self) -> &'t str {
        self.text
    }
}

/// Provide interface compatible with regex::Captures.
pub enum Captures<'t> {
    Plain(PlainCaptures<'t>),
    Fancy(FancyCaptures<'t>),
}

impl<'t> Captures<'t> {
    /// Get capture group at index `i`, or `None` if the group didn't match.
    pub fn get(&self, i: usize) -> Option<Match<'t>> {
        match self {
            Captures::Plain(caps) => caps.get(i).map(|m| Match {
                start: m.start(),
                end: m.end(),
                text: m.as_str(),
            }),
            Captures::Fancy(caps) => caps.get(i).map(|m| Match {
                start: m.start(),
                end: m.end(),
                text: m.as_str(),
            }),
        }
    }

    /// Get the named capture group, or `None` if it didn't match.
    pub fn name(&self, name: &str) -> Option<Match<'t>> {
        match self {
            Captures::Plain(caps) => caps.name(name).map(|m| Match {
                start: m.start(),
                end: m.end(),
                text: m.as_str(),
            }),
            Captures::Fancy(caps) => caps.name(name).map(|m| Match {
                start: m.start(),
                end: m.end(),
                text: m.as_str(),
            }),
        }
    }

    /// Return the number of capture groups (including group 0).
    pub fn len(&self) -> usize {
        match self {
            Captures::Plain(caps) => caps.len(),
            Captures::Fancy(caps) => caps.len(),
        }
    }

    /// Return true if there are no captures.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
