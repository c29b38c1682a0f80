use std::io::{BufRead, BufReader, Read, Write};

use crate::error::Result;

/// Blocking line-oriented I/O over a pair of byte streams.
///
/// The slave protocol has no request correlation, so every interaction is a
/// strictly ordered write (and, for `get_` commands, one paired read). Each
/// written line is flushed immediately — one command, one transaction.
pub trait LineIo {
    /// Write one protocol line. The trailing newline is appended here.
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Read one protocol line, blocking. Returns `None` at end of stream.
    ///
    /// The trailing newline (and any `\r`) is stripped.
    fn read_line(&mut self) -> Result<Option<String>>;
}

/// [`LineIo`] over any `Read`/`Write` pair.
///
/// The live player channel wraps child stdio in one of these; tests wrap
/// in-memory buffers.
#[derive(Debug)]
pub struct LineStream<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl<R: Read, W: Write> LineStream<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }

    /// Consume the stream and return the underlying reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.reader.into_inner(), self.writer)
    }
}

impl<R: Read, W: Write> LineIo for LineStream<R, W> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn stream(input: &str) -> LineStream<Cursor<Vec<u8>>, Vec<u8>> {
        LineStream::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn write_line_appends_newline_and_flushes() {
        let mut io = stream("");
        io.write_line("get_property loop").unwrap();
        io.write_line("quit").unwrap();

        let (_, written) = io.into_inner();
        assert_eq!(written, b"get_property loop\nquit\n");
    }

    #[test]
    fn read_line_strips_terminators() {
        let mut io = stream("ANS_loop=-1\r\nANS_volume=50.0\n");
        assert_eq!(io.read_line().unwrap().as_deref(), Some("ANS_loop=-1"));
        assert_eq!(io.read_line().unwrap().as_deref(), Some("ANS_volume=50.0"));
    }

    #[test]
    fn read_line_returns_none_at_eof() {
        let mut io = stream("last\n");
        assert_eq!(io.read_line().unwrap().as_deref(), Some("last"));
        assert_eq!(io.read_line().unwrap(), None);
    }

    #[test]
    fn read_line_handles_missing_final_newline() {
        let mut io = stream("partial");
        assert_eq!(io.read_line().unwrap().as_deref(), Some("partial"));
        assert_eq!(io.read_line().unwrap(), None);
    }

    #[test]
    fn empty_line_is_distinct_from_eof() {
        let mut io = stream("\n");
        assert_eq!(io.read_line().unwrap().as_deref(), Some(""));
        assert_eq!(io.read_line().unwrap(), None);
    }
}
