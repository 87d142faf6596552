use std::io::{self, BufRead};

/// Reads logical lines through a reusable scratch buffer.
///
/// The underlying reader hands out chunks of at most its buffer capacity; a line longer than
/// one chunk is reassembled from continuation reads rather than truncated. The `\n`
/// terminator is not part of the returned line. A final line without terminator is still a
/// line, and a trailing terminator does not produce an extra empty line.
pub(crate) struct LineReader<R> {
    inner: R,
    line: Vec<u8>,
    lines_read: usize,
}

impl<R: BufRead> LineReader<R> {
    pub(crate) fn new(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            line: Vec::with_capacity(capacity),
            lines_read: 0,
        }
    }

    /// Number of lines returned or skipped so far (1-based number of the last line).
    pub(crate) fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Read the next line, or `None` at end of input.
    pub(crate) fn next_line(&mut self) -> io::Result<Option<&[u8]>> {
        self.line.clear();
        let mut any = false;
        loop {
            let chunk = match self.inner.fill_buf() {
                Ok(chunk) => chunk,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if chunk.is_empty() {
                break;
            }
            any = true;
            match chunk.iter().position(|&b| b == b'\n') {
                Some(end) => {
                    self.line.extend_from_slice(&chunk[..end]);
                    self.inner.consume(end + 1);
                    self.lines_read += 1;
                    return Ok(Some(&self.line));
                }
                None => {
                    let len = chunk.len();
                    self.line.extend_from_slice(chunk);
                    self.inner.consume(len);
                }
            }
        }

        if any {
            self.lines_read += 1;
            Ok(Some(&self.line))
        } else {
            Ok(None)
        }
    }

    /// Discard one line. Returns `false` if the input was already exhausted.
    pub(crate) fn skip_line(&mut self) -> io::Result<bool> {
        Ok(self.next_line()?.is_some())
    }
}
