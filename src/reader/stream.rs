// Tue Aug 11 2026 - Alex

use std::io::{self, Read, Seek, SeekFrom};

use crate::provider::{Address, Provider};

use super::BufferedReader;

/// `std::io::Read + Seek` adapter over a reader's `[start, end]` range.
///
/// Stream offset zero is the reader's start address. Reads past the range
/// end (or over a hole below the provider base) report end-of-stream.
pub struct ReaderStream<'p, P: Provider + ?Sized> {
    reader: BufferedReader<'p, P>,
    position: Address,
}

impl<'p, P: Provider + ?Sized> ReaderStream<'p, P> {
    pub fn new(reader: BufferedReader<'p, P>) -> Self {
        let position = reader.start_address();
        Self { reader, position }
    }

    pub fn position(&self) -> Address {
        self.position
    }

    pub fn into_inner(self) -> BufferedReader<'p, P> {
        self.reader
    }

    fn range_end(&self) -> u64 {
        self.reader.end_address().as_u64().wrapping_add(1)
    }
}

impl<'p, P: Provider + ?Sized> Read for ReaderStream<'p, P> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let end = self.range_end();
        if self.position.as_u64() >= end {
            return Ok(0);
        }

        let remaining = end - self.position.as_u64();
        let count = (buf.len() as u64).min(remaining);
        let copied = {
            let view = self.reader.read(self.position, count);
            buf[..view.len()].copy_from_slice(&view);
            view.len()
        };
        self.position += copied as u64;
        Ok(copied)
    }
}

impl<'p, P: Provider + ?Sized> Seek for ReaderStream<'p, P> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let start = self.reader.start_address().as_u64();
        let target = match pos {
            SeekFrom::Start(offset) => start.checked_add(offset),
            SeekFrom::End(offset) => self.range_end().checked_add_signed(offset),
            SeekFrom::Current(offset) => self.position.as_u64().checked_add_signed(offset),
        };
        let target = target
            .filter(|&t| t >= start)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "seek before stream start"))?;
        self.position = Address::new(target);
        Ok(target - start)
    }
}
