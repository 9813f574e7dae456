// Integration tests
//
// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Diomidis Spinellis
//
// This file is part of the uutils linesed package.
// It is licensed under the MIT License.
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use std::io::Write;
use tempfile::NamedTempFile;
use uutests::new_ucmd;
use uutests::util::TestScenario;
use uutests::util_name;

// Test application's invocation
#[test]
fn test_invalid_arg() {
    new_ucmd!().arg("--definitely-invalid").fails().code_is(1);
}

#[test]
fn test_missing_script_argument() {
    new_ucmd!()
        .fails()
        .code_is(1)
        .stderr_contains("missing script");
}

#[test]
fn test_empty_script_passes_lines_through() {
    new_ucmd!()
        .arg("")
        .pipe_in("one\ntwo\n")
        .succeeds()
        .stdout_is("one\ntwo\n");
}

#[test]
fn test_silent_alias() {
    new_ucmd!()
        .args(&["--silent", ""])
        .pipe_in("one\n")
        .succeeds()
        .no_stdout();
}

#[test]
fn test_e_script_ok() {
    new_ucmd!()
        .args(&["-e", "s/a/b/", "-e", "y/b/c/"])
        .pipe_in("a\n")
        .succeeds()
        .stdout_is("b\nc\n");
}

#[test]
fn test_f_script_ok() {
    let mut temp = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(temp, "# swap the words").expect("Failed to write to temp file");
    writeln!(temp, r"s/(\w+) (\w+)/\2 \1/").expect("Failed to write to temp file");
    let path = temp.path();

    new_ucmd!()
        .arg("-f")
        .arg(path)
        .pipe_in("hello world\n")
        .succeeds()
        .stdout_is("world hello\n");
}

#[test]
fn test_missing_script_file() {
    new_ucmd!()
        .args(&["-f", "/nonexistent/linesed/script"])
        .fails()
        .stderr_contains("couldn't open file /nonexistent/linesed/script");
}

// Test substitutions
#[test]
fn test_subst_first_and_global() {
    new_ucmd!()
        .arg("s/a/b/")
        .pipe_in("a\naa\n")
        .succeeds()
        .stdout_is("b\nba\n");
    new_ucmd!()
        .arg("s/a/b/g")
        .pipe_in("aa\n")
        .succeeds()
        .stdout_is("bb\n");
}

#[test]
fn test_subst_ignore_case() {
    new_ucmd!()
        .arg("s/a/b/ig")
        .pipe_in("Aa\n")
        .succeeds()
        .stdout_is("bb\n");
}

#[test]
fn test_subst_print_quiet() {
    new_ucmd!()
        .args(&["-n", "/x/s/x/y/p"])
        .pipe_in("a\nx\nb\n")
        .succeeds()
        .stdout_is("y\n");
}

#[test]
fn test_subst_delete() {
    new_ucmd!()
        .arg("/drop/s/drop/keep/d")
        .pipe_in("one\ndrop me\ntwo\n")
        .succeeds()
        .stdout_is("one\ntwo\n");
}

#[test]
fn test_delimiter_is_not_escapable() {
    new_ucmd!()
        .arg(r"s/a/\/b/")
        .fails()
        .code_is(1)
        .stderr_contains("unknown option to `s': b");
}

#[test]
fn test_subst_named_group() {
    new_ucmd!()
        .arg(r"s_(?P<year>\d{4})-(?P<month>\d{2})_\g<month>/\g<year>_")
        .pipe_in("2024-05\n")
        .succeeds()
        .stdout_is("05/2024\n");
}

#[test]
fn test_subst_backreference_pattern() {
    new_ucmd!()
        .arg(r"s/(\w+) \1/\1/g")
        .pipe_in("the the cat\n")
        .succeeds()
        .stdout_is("the cat\n");
}

#[test]
fn test_no_new_line_is_kept() {
    new_ucmd!()
        .args(&["$s/$/!/", "input/no-new-line.txt"])
        .succeeds()
        .stdout_is("first\nlast without newline!");
}

#[test]
fn test_null_data() {
    new_ucmd!()
        .args(&["-z", "s/a/b/"])
        .pipe_in("a\0a\0")
        .succeeds()
        .stdout_is("b\0b\0");
}

#[test]
fn test_unbuffered() {
    new_ucmd!()
        .args(&["-u", "y/abc/ABC/"])
        .pipe_in("cab\n")
        .succeeds()
        .stdout_is("CAB\n");
}

#[test]
fn test_debug() {
    new_ucmd!()
        .args(&["--debug", "s/a/b/"])
        .pipe_in("a\n")
        .succeeds()
        .stdout_is("b\n")
        .stderr_contains("PROGRAM:")
        .stderr_contains("COMMAND: s/a/b/")
        .stderr_contains("PATTERN: b");
}

// Test error handling
#[test]
fn test_regex_compile_error() {
    new_ucmd!()
        .arg("s/[/x/")
        .fails()
        .code_is(1)
        .no_stdout()
        .stderr_contains("-e expression #1:1:1: error: invalid regular expression `['");
}

#[test]
fn test_invalid_group_reference() {
    new_ucmd!()
        .arg(r"s/(a)/\2/")
        .fails()
        .code_is(1)
        .stderr_contains("invalid group reference");
}

#[test]
fn test_translate_length_mismatch() {
    new_ucmd!()
        .arg("y/abc/xy/")
        .fails()
        .code_is(1)
        .no_stdout()
        .stderr_contains("strings for `y' command are different lengths");
}

#[test]
fn test_unknown_command() {
    new_ucmd!()
        .arg("1p")
        .fails()
        .code_is(1)
        .stderr_contains("-e expression #1:1:2: error: unknown command: `p'");
}

#[test]
fn test_unterminated_command() {
    new_ucmd!()
        .arg("s/a/b")
        .fails()
        .code_is(1)
        .stderr_contains("unterminated `s' command");
}

#[test]
fn test_blank_delimiter() {
    new_ucmd!()
        .arg("s a b ")
        .fails()
        .code_is(1)
        .stderr_contains("cannot be used as a `s' delimiter");
}

#[test]
fn test_line_zero() {
    new_ucmd!()
        .arg("0s/a/b/")
        .fails()
        .code_is(1)
        .stderr_contains("invalid usage of line address 0");
}

#[test]
fn test_error_location_in_second_expression() {
    new_ucmd!()
        .args(&["-e", "s/a/b/", "-e", "s/a/b/x"])
        .fails()
        .code_is(1)
        .stderr_contains("-e expression #2:1:");
}

#[test]
fn test_missing_input_file() {
    new_ucmd!()
        .args(&["s/a/b/", "input/lines1", "nonexistent"])
        .fails()
        .code_is(2)
        .stdout_is("l1_1\nl1_2\nl1_3\nl1_4\nl1_5\nl1_6\n")
        .stderr_contains("can't read nonexistent");
}

/// Create a new test function to verify an execution for specified output.
macro_rules! check_output {
    ($name:ident, $args:expr) => {
        #[test]
        fn $name() {
            new_ucmd!()
                .args(&$args)
                .succeeds()
                .stdout_is_fixture(&format!("output/{}", stringify!($name)));
        }
    };
}

// Input files
const LINES1: &str = "input/lines1";
const LINES2: &str = "input/lines2";

// Test addresses and ranges
check_output!(addr_range_straddle, ["-n", "5,7s/_/-/p", LINES1, LINES2]);
check_output!(addr_last_two_files, ["-n", "$s/^/>/p", LINES1, LINES2]);
check_output!(addr_last_separate, ["-ns", "$s/^/>/p", LINES1, LINES2]);
check_output!(
    addr_first_separate,
    ["-n", "--separate", "1s/l/L/p", LINES1, LINES2]
);
check_output!(
    addr_pattern_to_pattern,
    ["-n", "/1_4/,/2_2/s/_/-/p", LINES1, LINES2]
);
check_output!(addr_step, ["-n", "0~3s/l/L/p", LINES1, LINES2]);
check_output!(
    range_emission_per_command,
    ["/1_2/,4s/l/L/;y/_/-/", LINES1]
);

// Test commands
check_output!(subst_custom_delimiter, ["s|_|/|", LINES1]);
check_output!(trans_digits, ["y/123456/abcdef/", LINES1]);
