// Wed Aug 12 2026 - Alex

use std::time::Instant;

use log::debug;
use rayon::prelude::*;

use crate::provider::{Address, Provider};
use crate::reader::{BufferedReader, DEFAULT_MAX_BUFFER_SIZE};

/// Default chunk for the find-all scan: 64 KiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 0x10000;

/// Finds the first occurrence of `needle` at or after the reader's start
/// address, walking forward cursors. Returns the match start address.
pub fn search_forward<P: Provider + ?Sized>(
    reader: &BufferedReader<'_, P>,
    needle: &[u8],
) -> Option<Address> {
    if needle.is_empty() {
        return None;
    }
    let length = needle.len() as i64;
    let end = reader.end();
    let mut cursor = reader.begin();

    while end - cursor >= length {
        if cursor.value() == needle[0] {
            let mut matched = true;
            for (i, &byte) in needle.iter().enumerate().skip(1) {
                if cursor.at(i as i64) != byte {
                    matched = false;
                    break;
                }
            }
            if matched {
                return Some(cursor.address());
            }
        }
        cursor += 1;
    }
    None
}

/// Finds the occurrence of `needle` closest below the reader's start
/// address, walking reverse cursors over the reversed needle. The caller
/// seeks the reader to the high end of the range of interest first; the
/// returned address is the match start, after the downward-position
/// adjustment of `needle.len() - 1`.
pub fn search_backward<P: Provider + ?Sized>(
    reader: &BufferedReader<'_, P>,
    needle: &[u8],
) -> Option<Address> {
    if needle.is_empty() {
        return None;
    }
    let length = needle.len() as i64;
    let rend = reader.rend();
    let mut cursor = reader.rbegin();

    while rend - cursor >= length {
        if cursor.value() == needle[needle.len() - 1] {
            let mut matched = true;
            for i in 1..needle.len() {
                if cursor.at(i as i64) != needle[needle.len() - 1 - i] {
                    matched = false;
                    break;
                }
            }
            if matched {
                return Some(cursor.address() - (needle.len() as u64 - 1));
            }
        }
        cursor += 1;
    }
    None
}

/// Chunked needle scanner over a whole provider.
///
/// `find_first`/`find_last` drive the cursor searches through one buffered
/// reader. `find_all` splits the provider into chunks read with an overlap
/// of `needle.len() - 1` bytes, each through its own reader, optionally
/// fanned out with rayon.
pub struct Scanner<'p, P: Provider + ?Sized> {
    provider: &'p P,
    chunk_size: u64,
    parallel: bool,
    max_buffer_size: u64,
}

impl<'p, P: Provider + ?Sized> Scanner<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        Self {
            provider,
            chunk_size: DEFAULT_CHUNK_SIZE,
            parallel: true,
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_max_buffer_size(mut self, max_buffer_size: u64) -> Self {
        self.max_buffer_size = max_buffer_size.max(1);
        self
    }

    /// First match at or after the provider base.
    pub fn find_first(&self, needle: &[u8]) -> Option<Address> {
        if !self.provider.is_readable() {
            return None;
        }
        let reader =
            BufferedReader::new(self.provider).with_max_buffer_size(self.max_buffer_size);
        search_forward(&reader, needle)
    }

    /// Last match, scanning backward from the provider end.
    pub fn find_last(&self, needle: &[u8]) -> Option<Address> {
        if !self.provider.is_readable() {
            return None;
        }
        let mut reader =
            BufferedReader::new(self.provider).with_max_buffer_size(self.max_buffer_size);
        reader.seek(reader.end_address());
        search_backward(&reader, needle)
    }

    /// Every match, in address order.
    pub fn find_all(&self, needle: &[u8]) -> Vec<Address>
    where
        P: Sync,
    {
        if needle.is_empty() || !self.provider.is_readable() {
            return Vec::new();
        }
        let total = self.provider.actual_size();
        if total < needle.len() as u64 {
            return Vec::new();
        }

        let started = Instant::now();
        let chunk_count = total
            .saturating_add(self.chunk_size - 1)
            / self.chunk_size;

        let mut results: Vec<Address> = if self.parallel {
            (0..chunk_count)
                .into_par_iter()
                .flat_map_iter(|index| self.scan_chunk(needle, index))
                .collect()
        } else {
            (0..chunk_count)
                .flat_map(|index| self.scan_chunk(needle, index))
                .collect()
        };
        results.sort_unstable();

        debug!(
            "scan for {}-byte needle over {} bytes found {} matches in {:?}",
            needle.len(),
            total,
            results.len(),
            started.elapsed()
        );
        results
    }

    // Matches whose start falls inside the chunk proper; the trailing
    // overlap belongs to the next chunk.
    fn scan_chunk(&self, needle: &[u8], index: u64) -> Vec<Address> {
        let base = self.provider.base_address();
        let total = self.provider.actual_size();
        let start = index * self.chunk_size;
        let overlap = needle.len() as u64 - 1;
        let want = self.chunk_size.saturating_add(overlap).min(total - start);

        let mut reader = BufferedReader::new(self.provider)
            .with_max_buffer_size(self.max_buffer_size.min(want.max(1)));
        let view = reader.read(base + start, want);

        let mut found = Vec::new();
        for (position, window) in view.windows(needle.len()).enumerate() {
            if (position as u64) < self.chunk_size && window == needle {
                found.push(base + start + position as u64);
            }
        }
        found
    }
}
