// Copyright (C) 2019 O.S. Systems Sofware LTDA
//
// SPDX-License-Identifier: Apache-2.0

use pkg_schema::definitions::Count;
use slog_scope::trace;
use std::io::{self, Write};

/// Writer that forwards data to `inner` in blocks of `chunk_size`
/// bytes, stopping once `count` blocks were written. The first `skip`
/// bytes it receives are dropped.
///
/// A trailing partial block is only written by [`ChunkWriter::finish`],
/// where it still counts as one block.
pub(crate) struct ChunkWriter<W: Write> {
    inner: W,
    buffer: Vec<u8>,
    chunk_size: usize,
    count: Count,
    skip: u64,
    chunks: u64,
    written: u64,
}

impl<W: Write> ChunkWriter<W> {
    pub(crate) fn new(inner: W, chunk_size: usize, count: Count) -> Self {
        ChunkWriter {
            inner,
            buffer: Vec::with_capacity(chunk_size),
            chunk_size,
            count,
            skip: 0,
            chunks: 0,
            written: 0,
        }
    }

    pub(crate) fn skip(self, skip: u64) -> Self {
        ChunkWriter { skip, ..self }
    }

    fn write_chunk(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        if !self.count.is_reached(self.chunks) {
            self.inner.write_all(&self.buffer)?;
            self.written += self.buffer.len() as u64;
            self.chunks += 1;
        }
        self.buffer.clear();

        Ok(())
    }

    /// Writes any pending partial block and returns the inner writer
    /// along with the number of bytes written to it.
    pub(crate) fn finish(mut self) -> io::Result<(W, u64)> {
        self.write_chunk()?;
        self.inner.flush()?;
        trace!("{} bytes written in {} chunks", self.written, self.chunks);

        Ok((self.inner, self.written))
    }
}

impl<W: Write> Write for ChunkWriter<W> {
    fn write(&mut self, mut buf: &[u8]) -> io::Result<usize> {
        let len = buf.len();

        if self.skip > 0 {
            let n = std::cmp::min(self.skip, buf.len() as u64) as usize;
            self.skip -= n as u64;
            buf = &buf[n..];
        }

        while !buf.is_empty() && !self.count.is_reached(self.chunks) {
            let n = std::cmp::min(self.chunk_size - self.buffer.len(), buf.len());
            self.buffer.extend_from_slice(&buf[..n]);
            buf = &buf[n..];

            if self.buffer.len() == self.chunk_size {
                self.write_chunk()?;
            }
        }

        // Data past the requested count is consumed and dropped.
        Ok(len)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_whole_source() {
        let mut writer = ChunkWriter::new(Vec::new(), 4, Count::All);
        writer.write_all(b"0123456789").unwrap();
        let (out, written) = writer.finish().unwrap();

        assert_eq!(out, b"0123456789");
        assert_eq!(written, 10);
    }

    #[test]
    fn limits_to_count() {
        let mut writer = ChunkWriter::new(Vec::new(), 4, Count::Limited(2));
        writer.write_all(b"0123").unwrap();
        writer.write_all(b"456789").unwrap();
        let (out, written) = writer.finish().unwrap();

        assert_eq!(out, b"01234567");
        assert_eq!(written, 8);
    }

    #[test]
    fn partial_last_chunk_counts() {
        let mut writer = ChunkWriter::new(Vec::new(), 4, Count::Limited(3));
        writer.write_all(b"0123456789").unwrap();
        let (out, written) = writer.finish().unwrap();

        assert_eq!(out, b"0123456789");
        assert_eq!(written, 10);
    }

    #[test]
    fn skips_leading_bytes() {
        let mut writer = ChunkWriter::new(Vec::new(), 4, Count::Limited(1)).skip(6);
        writer.write_all(b"01").unwrap();
        writer.write_all(b"23456789").unwrap();
        let (out, written) = writer.finish().unwrap();

        assert_eq!(out, b"6789");
        assert_eq!(written, 4);
    }

    #[test]
    fn zero_count_writes_nothing() {
        let mut writer = ChunkWriter::new(Vec::new(), 4, Count::Limited(0));
        writer.write_all(b"0123456789").unwrap();
        let (out, written) = writer.finish().unwrap();

        assert!(out.is_empty());
        assert_eq!(written, 0);
    }
}
