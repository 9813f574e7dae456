// Line-based I/O over the input files and the output stream
//
// Input lines keep their terminator, so that the pattern space
// holds exactly the bytes read. Output is buffered and flushed
// on request or when the buffer is dropped.
//
// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Diomidis Spinellis
//
// This file is part of the uutils linesed package.
// It is licensed under the MIT License.
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

use crate::error_handling::{SedError, SedResult};

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::vec;

/// Buffered line reader from any input.
pub struct LineReader {
    reader: Box<dyn BufRead>,
    separator: u8,
    buffer: Vec<u8>,
}

impl LineReader {
    /// Construct from anything that implements `Read`.
    pub fn new<R: Read + 'static>(r: R, separator: u8) -> Self {
        Self {
            reader: Box::new(BufReader::new(r)),
            separator,
            buffer: Vec::new(),
        }
    }

    /// Open the specified file for reading; "-" is standard input.
    pub fn open(path: &Path, separator: u8) -> SedResult<Self> {
        if path.as_os_str() == "-" {
            return Ok(Self::new(io::stdin(), separator));
        }

        let file = File::open(path).map_err(|source| SedError::Input {
            name: path.display().to_string(),
            source,
        })?;
        Ok(Self::new(file, separator))
    }

    /// Return the next line including its separator, if available, or None.
    pub fn get_line(&mut self) -> io::Result<Option<String>> {
        self.buffer.clear();
        let bytes_read = self.reader.read_until(self.separator, &mut self.buffer)?;
        if bytes_read == 0 {
            return Ok(None);
        }

        let bytes = std::mem::take(&mut self.buffer);
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// The lines of a sequence of files, read one after the other.
/// A file is opened only when the preceding one is exhausted.
pub struct InputLines {
    files: vec::IntoIter<PathBuf>,
    current: Option<LineReader>,
    separator: u8,
}

impl InputLines {
    pub fn new(files: Vec<PathBuf>, separator: u8) -> Self {
        Self {
            files: files.into_iter(),
            current: None,
            separator,
        }
    }
}

impl Iterator for InputLines {
    type Item = SedResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(reader) = self.current.as_mut() {
                match reader.get_line() {
                    Ok(Some(line)) => return Some(Ok(line)),
                    Ok(None) => self.current = None,
                    Err(e) => {
                        self.current = None;
                        return Some(Err(SedError::Io(e)));
                    }
                }
            }

            let path = self.files.next()?;
            match LineReader::open(&path, self.separator) {
                Ok(reader) => self.current = Some(reader),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Buffered sink for the program's output
pub struct OutputBuffer {
    out: BufWriter<Box<dyn Write>>,
}

impl OutputBuffer {
    pub fn new(w: Box<dyn Write>) -> Self {
        Self {
            out: BufWriter::new(w),
        }
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
