//! Byte streams consumed by the reader and writer engines.
//!
//! The engines are generic over [`std::io::Read`] and [`std::io::Write`];
//! any stream works. Two concrete implementations ship with the crate: a
//! memory-backed pair over caller-provided buffers and a file-backed pair
//! over buffered host file handles.

use crate::error::{AvroliteErr, AvroliteResult};
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

/// A sequential reader over an in-memory byte slice.
///
/// Reading past the end of the slice yields end-of-stream, which the
/// decoding engines surface as `Malformed` when it lands inside a value.
#[derive(Debug)]
pub struct MemoryReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> MemoryReader<'a> {
    /// Creates a reader over the given buffer.
    pub fn new(buf: &'a [u8]) -> Self {
        MemoryReader { buf, pos: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl Read for MemoryReader<'_> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.buf[self.pos..];
        let n = remaining.len().min(out.len());
        out[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

/// A sequential writer over a fixed in-memory buffer.
///
/// Writing past the end of the buffer is an error; the buffer never grows.
#[derive(Debug)]
pub struct MemoryWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> MemoryWriter<'a> {
    /// Creates a writer over the given fixed buffer.
    pub fn new(buf: &'a mut [u8]) -> Self {
        MemoryWriter { buf, pos: 0 }
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The written prefix of the buffer.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}

impl Write for MemoryWriter<'_> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let remaining = &mut self.buf[self.pos..];
        if data.len() > remaining.len() {
            return Err(io::Error::new(
                ErrorKind::WriteZero,
                "memory writer buffer exhausted",
            ));
        }
        remaining[..data.len()].copy_from_slice(data);
        self.pos += data.len();
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A buffered reader over a host file.
#[derive(Debug)]
pub struct FileReader {
    inner: BufReader<File>,
}

impl FileReader {
    /// Opens the file at `path` for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).open(path)?;
        Ok(FileReader {
            inner: BufReader::new(file),
        })
    }
}

impl Read for FileReader {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        self.inner.read(out)
    }
}

/// A buffered writer over a host file.
#[derive(Debug)]
pub struct FileWriter {
    inner: BufWriter<File>,
}

impl FileWriter {
    /// Creates (or truncates) the file at `path` for writing.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(FileWriter {
            inner: BufWriter::new(file),
        })
    }
}

impl Write for FileWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.inner.write(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// Discards exactly `n` bytes from the stream.
pub(crate) fn skip_bytes<R: Read>(reader: &mut R, n: u64) -> AvroliteResult<()> {
    let copied = io::copy(&mut reader.by_ref().take(n), &mut io::sink())
        .map_err(AvroliteErr::DecodeFailed)?;
    if copied < n {
        return Err(AvroliteErr::UnexpectedEof);
    }
    Ok(())
}
