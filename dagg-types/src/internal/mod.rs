//! Minimal, fast, order-preserving codecs.
//!
//! All fixed-width numeric codecs are **big-endian**, with a sign-bit flip for
//! signed and floating-point types, so a byte-wise comparison of two encodings
//! agrees with the numeric comparison of the values. Variable-width payloads
//! carry a `be32` length prefix so concatenated components stay unambiguous.
//!
//! - `BeU64`, `BeI64`, `BeI128`: integers, lexicographic order == numeric order.
//! - `BeF64`: IEEE-754 total order.
//! - `LenBytes`: opaque bytes, length-prefixed.
//! - `Utf8CaseFold`: NFKC + Unicode default case fold, length-prefixed.
//!
//! `EncodeInto` lets you write `v.encode_into(&mut buf)` for the fixed-width
//! native types, whose encoding cannot fail.

#![forbid(unsafe_code)]

pub mod codec;
pub use codec::*;

pub mod be_u64;
pub use be_u64::*;

pub mod be_i64;
pub use be_i64::*;

pub mod be_i128;
pub use be_i128::*;

pub mod be_f64;
pub use be_f64::*;

pub mod len_bytes;
pub use len_bytes::*;

pub mod utf8_case_fold;
pub use utf8_case_fold::*;

/* ---------------------- Value-side encode convenience ------------------- */

/// Default, value-side encoding: `v.encode_into(&mut buf)`.
pub trait EncodeInto {
    fn encode_into(&self, dst: &mut Vec<u8>);
}

impl EncodeInto for u64 {
    #[inline]
    fn encode_into(&self, dst: &mut Vec<u8>) {
        BeU64::put(dst, *self);
    }
}

impl EncodeInto for i64 {
    #[inline]
    fn encode_into(&self, dst: &mut Vec<u8>) {
        BeI64::put(dst, *self);
    }
}

impl EncodeInto for i128 {
    #[inline]
    fn encode_into(&self, dst: &mut Vec<u8>) {
        BeI128::put(dst, *self);
    }
}

impl EncodeInto for f64 {
    #[inline]
    fn encode_into(&self, dst: &mut Vec<u8>) {
        BeF64::put(dst, *self);
    }
}
