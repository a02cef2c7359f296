// Copyright 2021 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
use std::fmt;

/// A position within a piece of source text, tracked in both byte offset
/// and line/column terms so diagnostics can point a user at the right spot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    label: String,
    line_number: usize,
    offset: usize,
}

impl Location {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            line_number: 1,
            offset: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Advance past `text`, correctly tracking newlines (including `\r\n`).
    pub fn incr(&mut self, text: &str) {
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            self.offset += c.len_utf8();
            match c {
                '\n' => self.line_number += 1,
                '\r' => {
                    if chars.peek() != Some(&'\n') {
                        self.line_number += 1;
                    }
                }
                _ => (),
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (line {})", self.label, self.line_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_advance() {
        let mut loc = Location::new("test");
        loc.incr("abc");
        assert_eq!(loc.line_number(), 1);
        assert_eq!(loc.offset(), 3);
    }

    #[test]
    fn newline_advance() {
        let mut loc = Location::new("test");
        loc.incr("abc\ndef");
        assert_eq!(loc.line_number(), 2);
    }

    #[test]
    fn crlf_counts_once() {
        let mut loc = Location::new("test");
        loc.incr("abc\r\ndef");
        assert_eq!(loc.line_number(), 2);
    }
}
