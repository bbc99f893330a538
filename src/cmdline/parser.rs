use crate::cmdline::ast::{ParsedCommand, RedirectMode};

/// Splits a line into adb arguments plus an optional redirection or pipeline.
///
/// Operators are searched in strict precedence: `|`, then `>>`, then `>`.
/// Operators inside single or double quotes are skipped, but the quote
/// tracking is a plain toggle: no escapes, no nesting, and an unbalanced
/// quote simply hides everything after it.
///
/// Tokenizing is run-of-whitespace splitting and does NOT honour quotes,
/// so `shell echo "a b"` yields the arguments `echo`, `"a` and `b"`.
/// Quotes only matter while looking for operators.
pub fn parse_command(line: &str) -> ParsedCommand {
    let ops: Vec<usize> = UnquotedBytes::new(line)
        .filter(|&(_, b)| b == b'|' || b == b'>')
        .map(|(idx, _)| idx)
        .collect();
    let bytes = line.as_bytes();

    // 1. Pipe wins over any redirection
    if let Some(&idx) = ops.iter().find(|&&idx| bytes[idx] == b'|') {
        return ParsedCommand::piped(tokenize(&line[..idx]), tokenize(&line[idx + 1..]));
    }

    // 2. Append must be checked before the single form, which would split ">>" in two
    if let Some(&idx) = ops
        .iter()
        .find(|&&idx| bytes.get(idx + 1) == Some(&b'>'))
    {
        return ParsedCommand::redirected(
            tokenize(&line[..idx]),
            line[idx + 2..].trim().to_string(),
            RedirectMode::Append,
        );
    }

    // 3. Overwrite. Any ">" left at this point stands alone.
    if let Some(&idx) = ops.first() {
        return ParsedCommand::redirected(
            tokenize(&line[..idx]),
            line[idx + 1..].trim().to_string(),
            RedirectMode::Overwrite,
        );
    }

    ParsedCommand::simple(tokenize(line))
}

pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Yields `(index, byte)` for every byte outside a quoted span.
/// Quote characters themselves are never yielded.
struct UnquotedBytes<'a> {
    bytes: &'a [u8],
    pos: usize,
    in_single: bool,
    in_double: bool,
}

impl<'a> UnquotedBytes<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            bytes: line.as_bytes(),
            pos: 0,
            in_single: false,
            in_double: false,
        }
    }
}

impl Iterator for UnquotedBytes<'_> {
    type Item = (usize, u8);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&b) = self.bytes.get(self.pos) {
            let idx = self.pos;
            self.pos += 1;
            match b {
                b'\'' if !self.in_double => self.in_single = !self.in_single,
                b'"' if !self.in_single => self.in_double = !self.in_double,
                _ if self.in_single || self.in_double => {}
                _ => return Some((idx, b)),
            }
        }
        None
    }
}
