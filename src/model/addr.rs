//! Addresses and byte offsets, and the fixed-width hex rendering used for
//! the address column.
//!
//! Byte offsets into a stream are signed 64-bit values. `-1` is reserved to
//! mean "no selection", so valid offsets lie in `[0, 2^63-1)`. Addresses are
//! what the user sees: an offset rebased onto the configured address offset.

use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::util;

/// Signed byte offset into a stream.
pub type Offset = i64;

/// Absolute address as displayed to the user.
pub type Address = u64;

/// Sentinel used for both ends of an empty selection.
pub const NO_SELECTION: Offset = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressSize {
    #[serde(rename = "32")]
    Address32,
    #[serde(rename = "64")]
    Address64,
}

impl AddressSize {
    /// Width of the host's pointers.
    pub const fn native() -> Self {
        #[cfg(target_pointer_width = "32")]
        {
            AddressSize::Address32
        }

        #[cfg(not(target_pointer_width = "32"))]
        {
            AddressSize::Address64
        }
    }

    pub fn bits(&self) -> usize {
        match self {
            AddressSize::Address32 => 32,
            AddressSize::Address64 => 64,
        }
    }
}

impl Default for AddressSize {
    fn default() -> Self {
        Self::native()
    }
}

/// Everything needed to turn an address into address-column text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressFormat {
    pub size: AddressSize,
    pub separator: bool,
    pub hide_leading_zeros: bool,
}

impl AddressFormat {
    /// Renders `address` as fixed-width lowercase hex, split into a high and
    /// a low half with an optional `:` between them.
    pub fn format(&self, address: Address) -> String {
        let (hi, hi_digits, lo, lo_digits) = match self.size {
            AddressSize::Address32 => ((address >> 16) & 0xffff, 4, address & 0xffff, 4),
            AddressSize::Address64 if self.hide_leading_zeros => ((address >> 32) & 0xffff, 4, address & 0xffff_ffff, 8),
            AddressSize::Address64 => ((address >> 32) & 0xffff_ffff, 8, address & 0xffff_ffff, 8),
        };

        let mut acc = String::with_capacity(self.length());
        util::write_hex_fixed(&mut acc, hi, hi_digits);
        if self.separator {
            acc.push(':');
        }
        util::write_hex_fixed(&mut acc, lo, lo_digits);
        acc
    }

    /// Length in characters of every string `format` produces.
    pub fn length(&self) -> usize {
        let mut digits = self.size.bits() / 4;
        if self.size == AddressSize::Address64 && self.hide_leading_zeros {
            digits-= 4;
        }
        digits + if self.separator { 1 } else { 0 }
    }
}

/// Adds a (possibly negative) offset onto a base address, wrapping around the
/// address space instead of overflowing.
pub fn rebase(base: Address, offset: Offset) -> Address {
    base.wrapping_add_signed(offset)
}

/// Serde representation for addresses: `"0x..."` hex strings, since TOML
/// integers stop at `i64::MAX`. Plain non-negative integers are still read.
pub mod serde_hex {
    use super::Address;

    pub fn serialize<S>(address: &Address, ser: S) -> Result<S::Ok, S::Error> where S: serde::Serializer {
        ser.serialize_str(&format!("0x{:x}", address))
    }

    pub fn deserialize<'de, D>(de: D) -> Result<Address, D::Error> where D: serde::Deserializer<'de> {
        de.deserialize_any(Visitor)
    }

    struct Visitor;

    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = Address;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
            write!(f, "an address as a \"0x\"-prefixed hex string or a non-negative integer")
        }

        fn visit_str<E>(self, v: &str) -> Result<Address, E> where E: serde::de::Error {
            let digits = v.strip_prefix("0x").or_else(|| v.strip_prefix("0X")).unwrap_or(v);
            Address::from_str_radix(digits, 16).map_err(|_| E::invalid_value(serde::de::Unexpected::Str(v), &self))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Address, E> where E: serde::de::Error {
            Ok(v)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Address, E> where E: serde::de::Error {
            Address::try_from(v).map_err(|_| E::invalid_value(serde::de::Unexpected::Signed(v), &self))
        }
    }
}
