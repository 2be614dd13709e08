// Mon Aug 10 2026 - Alex

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A logical address inside a provider's address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(u64);

impl Address {
    pub fn new(addr: u64) -> Self {
        Address(addr)
    }

    pub fn zero() -> Self {
        Address(0)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Signed displacement, saturating at the ends of the address space.
    pub fn offset(self, delta: i64) -> Self {
        Address(self.0.saturating_add_signed(delta))
    }

    /// Distance to another address, clamped into the signed range.
    pub fn distance(self, other: Address) -> i64 {
        let diff = self.0 as i128 - other.0 as i128;
        diff.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }

    pub fn saturating_add(self, rhs: u64) -> Self {
        Address(self.0.saturating_add(rhs))
    }

    pub fn saturating_sub(self, rhs: u64) -> Self {
        Address(self.0.saturating_sub(rhs))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl Add<u64> for Address {
    type Output = Address;

    fn add(self, rhs: u64) -> Address {
        Address(self.0.saturating_add(rhs))
    }
}

impl AddAssign<u64> for Address {
    fn add_assign(&mut self, rhs: u64) {
        self.0 = self.0.saturating_add(rhs);
    }
}

impl Sub<u64> for Address {
    type Output = Address;

    fn sub(self, rhs: u64) -> Address {
        Address(self.0.saturating_sub(rhs))
    }
}

impl SubAssign<u64> for Address {
    fn sub_assign(&mut self, rhs: u64) {
        self.0 = self.0.saturating_sub(rhs);
    }
}

impl Sub<Address> for Address {
    type Output = i64;

    fn sub(self, rhs: Address) -> i64 {
        self.distance(rhs)
    }
}

impl From<u64> for Address {
    fn from(addr: u64) -> Self {
        Address(addr)
    }
}

impl From<Address> for u64 {
    fn from(addr: Address) -> u64 {
        addr.0
    }
}
