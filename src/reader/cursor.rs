// Tue Aug 11 2026 - Alex

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::provider::{Address, Provider};

use super::BufferedReader;

/// Forward cursor over a reader's address range.
///
/// Cheap to copy: a reader reference and an address. Dereferences route
/// through the reader's cache and yield `0x00` outside the addressable
/// range, so equality-driven scan loops terminate at the end cursor without
/// extra bounds plumbing. Comparisons and subtraction look only at the
/// address.
pub struct ForwardCursor<'r, P: Provider + ?Sized> {
    reader: &'r BufferedReader<'r, P>,
    address: Address,
}

impl<'r, P: Provider + ?Sized> ForwardCursor<'r, P> {
    pub(crate) fn new(reader: &'r BufferedReader<'r, P>, address: Address) -> Self {
        Self { reader, address }
    }

    /// Byte at the cursor position.
    pub fn value(&self) -> u8 {
        self.reader.byte_at(self.address)
    }

    /// Byte at a signed displacement from the cursor position.
    pub fn at(&self, offset: i64) -> u8 {
        self.reader.byte_at(self.address.offset(offset))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn set_address(&mut self, address: Address) {
        self.address = address;
    }
}

impl<'r, P: Provider + ?Sized> Clone for ForwardCursor<'r, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'r, P: Provider + ?Sized> Copy for ForwardCursor<'r, P> {}

impl<'r, P: Provider + ?Sized> fmt::Debug for ForwardCursor<'r, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ForwardCursor({})", self.address)
    }
}

impl<'r, P: Provider + ?Sized> PartialEq for ForwardCursor<'r, P> {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl<'r, P: Provider + ?Sized> Eq for ForwardCursor<'r, P> {}

impl<'r, P: Provider + ?Sized> PartialOrd for ForwardCursor<'r, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'r, P: Provider + ?Sized> Ord for ForwardCursor<'r, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address.cmp(&other.address)
    }
}

impl<'r, P: Provider + ?Sized> Add<u64> for ForwardCursor<'r, P> {
    type Output = Self;

    fn add(mut self, rhs: u64) -> Self {
        self.address += rhs;
        self
    }
}

impl<'r, P: Provider + ?Sized> Sub<u64> for ForwardCursor<'r, P> {
    type Output = Self;

    fn sub(mut self, rhs: u64) -> Self {
        self.address -= rhs;
        self
    }
}

impl<'r, P: Provider + ?Sized> AddAssign<u64> for ForwardCursor<'r, P> {
    fn add_assign(&mut self, rhs: u64) {
        self.address += rhs;
    }
}

impl<'r, P: Provider + ?Sized> SubAssign<u64> for ForwardCursor<'r, P> {
    fn sub_assign(&mut self, rhs: u64) {
        self.address -= rhs;
    }
}

impl<'r, P: Provider + ?Sized> Sub for ForwardCursor<'r, P> {
    type Output = i64;

    fn sub(self, rhs: Self) -> i64 {
        self.address.distance(rhs.address)
    }
}

impl<'r, P: Provider + ?Sized> Iterator for ForwardCursor<'r, P> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        // An empty provider stores a wrapped-around end address, and a seek
        // below the base yields an empty traversal; neither may loop.
        if self.reader.is_empty()
            || self.address < self.reader.base_address()
            || self.address > self.reader.end_address()
        {
            return None;
        }
        let value = self.value();
        self.address += 1;
        Some(value)
    }
}

/// Reverse cursor: same shape as [`ForwardCursor`] with the stride flipped.
///
/// Advancing moves the address downward, indexed access counts downward, and
/// cursor subtraction yields `rhs.address - self.address` so that distances
/// grow as a reverse sweep advances. The downward sentinel (`rend`) sits at
/// address zero.
pub struct ReverseCursor<'r, P: Provider + ?Sized> {
    reader: &'r BufferedReader<'r, P>,
    address: Address,
}

impl<'r, P: Provider + ?Sized> ReverseCursor<'r, P> {
    pub(crate) fn new(reader: &'r BufferedReader<'r, P>, address: Address) -> Self {
        Self { reader, address }
    }

    /// Byte at the cursor position.
    pub fn value(&self) -> u8 {
        self.reader.byte_at_reverse(self.address)
    }

    /// Byte at a displacement counted downward from the cursor position.
    pub fn at(&self, offset: i64) -> u8 {
        let delta = 0i64.saturating_sub(offset);
        self.reader.byte_at_reverse(self.address.offset(delta))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn set_address(&mut self, address: Address) {
        self.address = address;
    }
}

impl<'r, P: Provider + ?Sized> Clone for ReverseCursor<'r, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'r, P: Provider + ?Sized> Copy for ReverseCursor<'r, P> {}

impl<'r, P: Provider + ?Sized> fmt::Debug for ReverseCursor<'r, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReverseCursor({})", self.address)
    }
}

impl<'r, P: Provider + ?Sized> PartialEq for ReverseCursor<'r, P> {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl<'r, P: Provider + ?Sized> Eq for ReverseCursor<'r, P> {}

impl<'r, P: Provider + ?Sized> PartialOrd for ReverseCursor<'r, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'r, P: Provider + ?Sized> Ord for ReverseCursor<'r, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.address.cmp(&other.address)
    }
}

impl<'r, P: Provider + ?Sized> Add<u64> for ReverseCursor<'r, P> {
    type Output = Self;

    fn add(mut self, rhs: u64) -> Self {
        self.address -= rhs;
        self
    }
}

impl<'r, P: Provider + ?Sized> Sub<u64> for ReverseCursor<'r, P> {
    type Output = Self;

    fn sub(mut self, rhs: u64) -> Self {
        self.address += rhs;
        self
    }
}

impl<'r, P: Provider + ?Sized> AddAssign<u64> for ReverseCursor<'r, P> {
    fn add_assign(&mut self, rhs: u64) {
        self.address -= rhs;
    }
}

impl<'r, P: Provider + ?Sized> SubAssign<u64> for ReverseCursor<'r, P> {
    fn sub_assign(&mut self, rhs: u64) {
        self.address += rhs;
    }
}

impl<'r, P: Provider + ?Sized> Sub for ReverseCursor<'r, P> {
    type Output = i64;

    fn sub(self, rhs: Self) -> i64 {
        rhs.address.distance(self.address)
    }
}

impl<'r, P: Provider + ?Sized> Iterator for ReverseCursor<'r, P> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.reader.is_empty() || self.address == Address::zero() {
            return None;
        }
        let value = self.value();
        self.address -= 1;
        Some(value)
    }
}
