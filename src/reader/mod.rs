// Tue Aug 11 2026 - Alex

pub mod cursor;
pub mod stream;

pub use cursor::{ForwardCursor, ReverseCursor};
pub use stream::ReaderStream;

use std::borrow::Cow;
use std::cell::RefCell;

use log::trace;

use crate::provider::{Address, Provider};

/// Default refill window: 16 MiB.
pub const DEFAULT_MAX_BUFFER_SIZE: u64 = 16 * 1024 * 1024;

// Byte handed out for dereferences outside the addressable range.
const SENTINEL: u8 = 0x00;

/// The cached window: one contiguous run of provider bytes starting at
/// `address`, refilled in place on miss.
struct Window {
    data: Vec<u8>,
    address: Address,
    valid: bool,
}

impl Window {
    fn new(max_buffer_size: u64) -> Self {
        Self {
            data: Vec::with_capacity(max_buffer_size as usize),
            address: Address::zero(),
            valid: false,
        }
    }

    fn invalidate(&mut self) {
        self.valid = false;
        self.data.clear();
    }

    fn contains(&self, address: Address, size: u64) -> bool {
        if !self.valid || address < self.address {
            return false;
        }
        let offset = address.as_u64() - self.address.as_u64();
        match offset.checked_add(size) {
            Some(end) => end <= self.data.len() as u64,
            None => false,
        }
    }

    /// Forward refill: anchor the window at the requested address, never
    /// extend past `end_address`, at most one provider read.
    fn refill_forward<P: Provider + ?Sized>(
        &mut self,
        provider: &P,
        end_address: Address,
        max_buffer_size: u64,
        address: Address,
        size: u64,
    ) {
        if address > end_address {
            return;
        }
        if self.contains(address, size) {
            return;
        }

        let remaining = (end_address.as_u64() - address.as_u64()).saturating_add(1);
        let length = remaining.min(max_buffer_size);
        self.data.clear();
        self.data.resize(length as usize, 0);
        provider.read(address, &mut self.data);
        self.address = address;
        self.valid = true;
        trace!("window refill at {} ({} bytes)", address, length);
    }

    /// Reverse refill: on miss, anchor as far backward as possible while
    /// still covering `[address, address + size)`, clipped to
    /// `base_address`. The hit check runs against the requested span, so a
    /// scan walking downward inside the window never refills.
    fn refill_reverse<P: Provider + ?Sized>(
        &mut self,
        provider: &P,
        base_address: Address,
        end_address: Address,
        max_buffer_size: u64,
        address: Address,
        size: u64,
    ) {
        let span_end = address
            .as_u64()
            .saturating_add(size)
            .min(end_address.as_u64().saturating_add(1));
        if self.contains(address, span_end.saturating_sub(address.as_u64())) {
            return;
        }
        let anchor = span_end
            .saturating_sub(max_buffer_size)
            .max(base_address.as_u64());
        self.refill_forward(
            provider,
            end_address,
            max_buffer_size,
            Address::new(anchor),
            span_end - anchor,
        );
    }

    fn byte(&self, address: Address) -> Option<u8> {
        if !self.valid || address < self.address {
            return None;
        }
        let offset = address.as_u64() - self.address.as_u64();
        (offset < self.data.len() as u64).then(|| self.data[offset as usize])
    }

    fn view(&self, address: Address, size: u64) -> &[u8] {
        if !self.valid || address < self.address {
            return &[];
        }
        let offset = address.as_u64() - self.address.as_u64();
        let length = self.data.len() as u64;
        if offset >= length {
            return &[];
        }
        let count = size.min(length - offset) as usize;
        let offset = offset as usize;
        &self.data[offset..offset + count]
    }
}

/// Buffered random-access reader over a [`Provider`].
///
/// The reader caches one contiguous byte window and serves reads out of it,
/// issuing at most one provider read per cache miss. Forward reads anchor the
/// window at the requested address; reverse reads anchor it as far backward
/// as possible while still covering the request, so a downward scan keeps
/// hitting the cache. Requests larger than the window bypass the cache
/// entirely.
///
/// Views returned by [`read`](Self::read) and
/// [`read_reverse`](Self::read_reverse) borrow the cache; the borrow checker
/// enforces that they are dropped before the next reader call. Callers that
/// need to retain bytes use `Cow::into_owned`.
///
/// The reader is a single-threaded view over a stable provider snapshot: it
/// is deliberately unsynchronized, and a caller that mutates the provider
/// must call [`invalidate`](Self::invalidate) or rebuild the reader.
pub struct BufferedReader<'p, P: Provider + ?Sized> {
    provider: &'p P,
    base_address: Address,
    actual_size: u64,
    start_address: Address,
    end_address: Address,
    max_buffer_size: u64,
    window: RefCell<Window>,
}

impl<'p, P: Provider + ?Sized> BufferedReader<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        let base_address = provider.base_address();
        let actual_size = provider.actual_size();
        let end_address = base_address
            .as_u64()
            .wrapping_add(actual_size)
            .wrapping_sub(1);
        Self {
            provider,
            base_address,
            actual_size,
            start_address: base_address,
            end_address: Address::new(end_address),
            max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
            window: RefCell::new(Window::new(DEFAULT_MAX_BUFFER_SIZE)),
        }
    }

    pub fn with_max_buffer_size(mut self, max_buffer_size: u64) -> Self {
        assert!(max_buffer_size >= 1, "max buffer size must be nonzero");
        self.max_buffer_size = max_buffer_size;
        self.window = RefCell::new(Window::new(max_buffer_size));
        self
    }

    pub fn base_address(&self) -> Address {
        self.base_address
    }

    pub fn start_address(&self) -> Address {
        self.start_address
    }

    pub fn end_address(&self) -> Address {
        self.end_address
    }

    pub fn max_buffer_size(&self) -> u64 {
        self.max_buffer_size
    }

    fn is_empty(&self) -> bool {
        self.actual_size == 0
    }

    /// Moves the cursor range's start. Out-of-range values yield an empty
    /// traversal; the cache is address-indexed and stays valid.
    pub fn seek(&mut self, address: Address) {
        self.start_address = address;
    }

    /// Narrows (or restores) the cursor range's inclusive end, clamped to
    /// the last provider address.
    pub fn set_end_address(&mut self, address: Address) {
        if self.actual_size == 0 {
            self.end_address = Address::new(self.base_address.as_u64().wrapping_sub(1));
            return;
        }
        let offset = address.as_u64().wrapping_sub(self.base_address.as_u64());
        self.end_address = if offset >= self.actual_size {
            self.base_address + (self.actual_size - 1)
        } else {
            address
        };
    }

    /// Drops the cached window. The next read refills from the provider.
    pub fn invalidate(&mut self) {
        self.window.get_mut().invalidate();
    }

    /// Reads `size` bytes at `address`. The returned view borrows the cache
    /// unless the request exceeds the window size, in which case a fresh
    /// owned buffer is filled with a single provider read and the cache is
    /// left untouched. Out-of-range requests yield an empty view.
    pub fn read(&mut self, address: Address, size: u64) -> Cow<'_, [u8]> {
        if size > self.max_buffer_size {
            return Cow::Owned(self.read_bypass(address, size));
        }
        if size == 0 || self.is_empty() || address < self.base_address || address > self.end_address
        {
            return Cow::Borrowed(&[]);
        }
        // Clamp before the hit check, so a window cached before an
        // end-address narrowing cannot serve bytes past the new end.
        let size = size.min(self.remaining_from(address));

        let provider = self.provider;
        let end_address = self.end_address;
        let max_buffer_size = self.max_buffer_size;
        let window = self.window.get_mut();
        window.refill_forward(provider, end_address, max_buffer_size, address, size);
        Cow::Borrowed(window.view(address, size))
    }

    /// Same view shape as [`read`](Self::read), but a miss anchors the
    /// window backward from the request so that a reverse scan keeps
    /// hitting the cache as it walks down.
    pub fn read_reverse(&mut self, address: Address, size: u64) -> Cow<'_, [u8]> {
        if size > self.max_buffer_size {
            return Cow::Owned(self.read_bypass(address, size));
        }
        if size == 0 || self.is_empty() || address < self.base_address || address > self.end_address
        {
            return Cow::Borrowed(&[]);
        }
        let size = size.min(self.remaining_from(address));

        let provider = self.provider;
        let base_address = self.base_address;
        let end_address = self.end_address;
        let max_buffer_size = self.max_buffer_size;
        let window = self.window.get_mut();
        window.refill_reverse(
            provider,
            base_address,
            end_address,
            max_buffer_size,
            address,
            size,
        );
        Cow::Borrowed(window.view(address, size))
    }

    // Bytes addressable from `address` up to the inclusive range end.
    // Callers guarantee `address <= end_address`.
    fn remaining_from(&self, address: Address) -> u64 {
        (self.end_address.as_u64() - address.as_u64()).saturating_add(1)
    }

    fn read_bypass(&self, address: Address, size: u64) -> Vec<u8> {
        trace!("bypass read at {} ({} bytes)", address, size);
        let mut data = vec![0u8; size as usize];
        self.provider.read(address, &mut data);
        data
    }

    pub(crate) fn byte_at(&self, address: Address) -> u8 {
        if self.is_empty() || address < self.base_address || address > self.end_address {
            return SENTINEL;
        }
        let mut window = self.window.borrow_mut();
        window.refill_forward(self.provider, self.end_address, self.max_buffer_size, address, 1);
        window.byte(address).unwrap_or(SENTINEL)
    }

    pub(crate) fn byte_at_reverse(&self, address: Address) -> u8 {
        if self.is_empty() || address < self.base_address || address > self.end_address {
            return SENTINEL;
        }
        let mut window = self.window.borrow_mut();
        window.refill_reverse(
            self.provider,
            self.base_address,
            self.end_address,
            self.max_buffer_size,
            address,
            1,
        );
        window.byte(address).unwrap_or(SENTINEL)
    }

    /// Forward cursor at the range start.
    pub fn begin(&self) -> ForwardCursor<'_, P> {
        ForwardCursor::new(self, self.start_address)
    }

    /// Forward cursor one past the range end.
    pub fn end(&self) -> ForwardCursor<'_, P> {
        ForwardCursor::new(self, Address::new(self.end_address.as_u64().wrapping_add(1)))
    }

    /// Reverse cursor at the range start (callers seek to a high address
    /// before a reverse sweep).
    pub fn rbegin(&self) -> ReverseCursor<'_, P> {
        if self.is_empty() {
            return self.rend();
        }
        ReverseCursor::new(self, self.start_address)
    }

    /// Reverse cursor at the downward sentinel, address zero.
    pub fn rend(&self) -> ReverseCursor<'_, P> {
        ReverseCursor::new(self, Address::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryProvider;
    use crate::testutil::{sample_bytes, CountingProvider};

    #[test]
    fn test_round_trip_single_bytes() {
        let content = sample_bytes(64);
        let provider =
            MemoryProvider::new(content.clone()).with_base_address(Address::new(0x1000));
        let mut reader = BufferedReader::new(&provider).with_max_buffer_size(16);

        for (i, &expected) in content.iter().enumerate() {
            let view = reader.read(Address::new(0x1000 + i as u64), 1);
            assert_eq!(view.as_ref(), &[expected]);
        }
    }

    #[test]
    fn test_contiguity() {
        let content = sample_bytes(48);
        let provider = MemoryProvider::new(content);
        let mut reader = BufferedReader::new(&provider).with_max_buffer_size(8);

        for start in [0u64, 1, 7, 13, 40] {
            for size in [1u64, 2, 5, 8] {
                if start + size > 48 {
                    continue;
                }
                let chunk = reader.read(Address::new(start), size).into_owned();
                let mut singles = Vec::new();
                for i in 0..size {
                    singles.extend_from_slice(&reader.read(Address::new(start + i), 1));
                }
                assert_eq!(chunk, singles, "mismatch at {}+{}", start, size);
            }
        }
    }

    #[test]
    fn test_forward_scan_reads_once_per_window() {
        let provider = CountingProvider::new(MemoryProvider::new(sample_bytes(256)));
        let mut reader = BufferedReader::new(&provider).with_max_buffer_size(16);

        for address in 0..256u64 {
            reader.read(Address::new(address), 1);
        }
        assert_eq!(provider.reads(), 16);
    }

    #[test]
    fn test_reverse_scan_reads_once_per_window() {
        let provider = CountingProvider::new(MemoryProvider::new(sample_bytes(256)));
        let mut reader = BufferedReader::new(&provider).with_max_buffer_size(16);

        for address in (0..256u64).rev() {
            let view = reader.read_reverse(Address::new(address), 1);
            assert_eq!(view.len(), 1);
        }
        assert_eq!(provider.reads(), 16);
    }

    #[test]
    fn test_reverse_read_anchors_backward() {
        let content = sample_bytes(256);
        let provider = MemoryProvider::new(content.clone());
        let mut reader = BufferedReader::new(&provider).with_max_buffer_size(16);

        let view = reader.read_reverse(Address::new(0xf0), 8);
        assert_eq!(view.as_ref(), &content[0xf0..0xf8]);

        // The window ends just past the request and spans backward from it.
        let window = reader.window.borrow();
        assert!(window.valid);
        assert_eq!(window.address, Address::new(0xe8));
        assert_eq!(window.data.len(), 16);
    }

    #[test]
    fn test_buffer_never_exceeds_max() {
        let provider = MemoryProvider::new(sample_bytes(100));
        let mut reader = BufferedReader::new(&provider).with_max_buffer_size(8);

        reader.read(Address::new(0), 8);
        assert!(reader.window.borrow().data.len() <= 8);
        reader.read(Address::new(95), 8);
        assert!(reader.window.borrow().data.len() <= 8);
        reader.read_reverse(Address::new(50), 4);
        assert!(reader.window.borrow().data.len() <= 8);
    }

    #[test]
    fn test_read_past_end_is_empty_and_silent() {
        let provider = CountingProvider::new(MemoryProvider::new(sample_bytes(32)));
        let mut reader = BufferedReader::new(&provider).with_max_buffer_size(16);

        assert!(reader.read(Address::new(32), 1).is_empty());
        assert!(reader.read(Address::new(1000), 4).is_empty());
        assert!(reader.read_reverse(Address::new(32), 1).is_empty());
        assert_eq!(provider.reads(), 0);
    }

    #[test]
    fn test_oversized_read_bypasses_cache() {
        let content = sample_bytes(12_000);
        let provider = CountingProvider::new(MemoryProvider::new(content.clone()));
        let mut reader = BufferedReader::new(&provider).with_max_buffer_size(16);

        // Prime the cache.
        reader.read(Address::new(4), 4);
        assert_eq!(provider.reads(), 1);
        let (address, length) = {
            let window = reader.window.borrow();
            (window.address, window.data.len())
        };

        let view = reader.read(Address::new(0), 10_000);
        assert!(matches!(view, Cow::Owned(_)));
        assert_eq!(view.as_ref(), &content[..10_000]);
        assert_eq!(provider.reads(), 2);

        // Cache untouched by the bypass.
        let window = reader.window.borrow();
        assert!(window.valid);
        assert_eq!(window.address, address);
        assert_eq!(window.data.len(), length);
    }

    #[test]
    fn test_empty_provider() {
        let provider = CountingProvider::new(MemoryProvider::new(Vec::new()));
        let mut reader = BufferedReader::new(&provider);

        assert_eq!(reader.begin(), reader.end());
        assert_eq!(reader.rbegin(), reader.rend());
        assert!(reader.read(Address::new(0), 1).is_empty());
        assert!(reader.read_reverse(Address::new(0), 1).is_empty());
        assert_eq!(provider.reads(), 0);
    }

    #[test]
    fn test_empty_provider_nonzero_base() {
        let provider = MemoryProvider::new(Vec::new()).with_base_address(Address::new(0x1000));
        let mut reader = BufferedReader::new(&provider);

        assert_eq!(reader.begin(), reader.end());
        assert_eq!(reader.rbegin(), reader.rend());
        assert!(reader.read(Address::new(0x1000), 1).is_empty());
    }

    #[test]
    fn test_single_byte_provider() {
        let provider =
            MemoryProvider::new(vec![0x42]).with_base_address(Address::new(0x1000));
        let mut reader = BufferedReader::new(&provider);

        assert_eq!(reader.read(Address::new(0x1000), 1).as_ref(), &[0x42]);
        assert!(reader.read(Address::new(0x1001), 1).is_empty());
        assert!(reader.read(Address::new(0xfff), 1).is_empty());
    }

    #[test]
    fn test_sequential_reads_hit_cache() {
        let provider = CountingProvider::new(MemoryProvider::new(sample_bytes(1024)));
        let mut reader = BufferedReader::new(&provider).with_max_buffer_size(1024);

        for address in 0..1024u64 {
            let view = reader.read(Address::new(address), 1);
            assert_eq!(view.len(), 1);
        }
        assert_eq!(provider.reads(), 1);
    }

    #[test]
    fn test_set_end_address_clamps() {
        let provider = MemoryProvider::new(sample_bytes(100)).with_base_address(Address::new(0x1000));
        let mut reader = BufferedReader::new(&provider);
        assert_eq!(reader.end_address(), Address::new(0x1063));

        reader.set_end_address(Address::new(0x2000));
        assert_eq!(reader.end_address(), Address::new(0x1063));

        reader.set_end_address(Address::new(0x1005));
        assert_eq!(reader.end_address(), Address::new(0x1005));

        // Reads past the narrowed end are refused.
        assert!(reader.read(Address::new(0x1006), 1).is_empty());
        assert_eq!(reader.read(Address::new(0x1000), 16).len(), 6);
    }

    #[test]
    fn test_warm_cache_respects_narrowed_end() {
        let content = sample_bytes(100);
        let provider = MemoryProvider::new(content.clone());
        let mut reader = BufferedReader::new(&provider).with_max_buffer_size(16);

        assert_eq!(reader.read(Address::new(0), 16).len(), 16);
        reader.set_end_address(Address::new(5));

        // The cached window still spans past the new end; the result must
        // not depend on that.
        let warm = reader.read(Address::new(0), 16).into_owned();
        reader.invalidate();
        let cold = reader.read(Address::new(0), 16).into_owned();
        assert_eq!(warm, cold);
        assert_eq!(warm, &content[..6]);

        let reverse = reader.read_reverse(Address::new(2), 8).into_owned();
        assert_eq!(reverse, &content[2..6]);
    }

    #[test]
    fn test_seek_stores_raw() {
        let provider = MemoryProvider::new(sample_bytes(16));
        let mut reader = BufferedReader::new(&provider);

        reader.seek(Address::new(12));
        assert_eq!(reader.start_address(), Address::new(12));
        assert_eq!(reader.begin().address(), Address::new(12));

        // Past-end seeks make the traversal empty but stay stored.
        reader.seek(Address::new(100));
        assert_eq!(reader.start_address(), Address::new(100));
        assert!(reader.begin() > reader.end());
    }

    #[test]
    fn test_read_clamped_at_end() {
        let content = sample_bytes(32);
        let provider = MemoryProvider::new(content.clone());
        let mut reader = BufferedReader::new(&provider).with_max_buffer_size(16);

        let view = reader.read(Address::new(30), 10);
        assert_eq!(view.as_ref(), &content[30..]);
    }

    #[test]
    fn test_invalidate_forces_refill() {
        let provider = CountingProvider::new(MemoryProvider::new(sample_bytes(64)));
        let mut reader = BufferedReader::new(&provider).with_max_buffer_size(32);

        reader.read(Address::new(0), 1);
        reader.read(Address::new(1), 1);
        assert_eq!(provider.reads(), 1);

        reader.invalidate();
        reader.read(Address::new(2), 1);
        assert_eq!(provider.reads(), 2);
    }

    #[test]
    fn test_zero_size_read() {
        let provider = MemoryProvider::new(sample_bytes(8));
        let mut reader = BufferedReader::new(&provider);
        assert!(reader.read(Address::new(0), 0).is_empty());
    }

    #[test]
    #[should_panic(expected = "max buffer size")]
    fn test_zero_max_buffer_size_rejected() {
        let provider = MemoryProvider::new(vec![1, 2, 3]);
        let _ = BufferedReader::new(&provider).with_max_buffer_size(0);
    }
}
