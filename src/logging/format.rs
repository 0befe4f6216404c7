//! Line formatting with a bounded body
//!
//! A line is `YYYY-MM-DD HH:MM:SS.ffffff [level]: <body>\n`. The whole line,
//! plus one reserved terminator byte, must fit in the configured buffer size;
//! bodies that do not fit are cut at the last UTF-8 boundary that does.

use super::LogLevel;
use crate::constants::{LINE_RESERVED_BYTES, LINE_TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use std::fmt::{self, Write};

/// `fmt::Write` sink that silently stops accepting text at `limit` bytes
struct BoundedWriter<'a> {
    buf: &'a mut String,
    limit: usize,
}

impl Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.limit.saturating_sub(self.buf.len());
        if s.len() <= room {
            self.buf.push_str(s);
            return Ok(());
        }

        let mut cut = room;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        self.buf.push_str(&s[..cut]);
        // Stop the formatter; the caller treats this as truncation.
        Err(fmt::Error)
    }
}

/// Format one complete line, newline included.
///
/// The returned string is never longer than `buf_size - 1` bytes.
pub fn format_line(
    now: NaiveDateTime,
    level: LogLevel,
    args: fmt::Arguments<'_>,
    buf_size: usize,
) -> String {
    let mut line = String::with_capacity(64);
    // Writing into a String cannot fail.
    let _ = write!(line, "{} {} ", now.format(LINE_TIMESTAMP_FORMAT), level.tag());

    let limit = buf_size.saturating_sub(LINE_RESERVED_BYTES).max(line.len());
    let mut body = BoundedWriter {
        buf: &mut line,
        limit,
    };
    // An error here only means the body was truncated.
    let _ = body.write_fmt(args);

    line.push('\n');
    line
}
