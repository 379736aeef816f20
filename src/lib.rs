/*
 * Copyright (C) 2026 taylor.fish <contact@taylor.fish>
 *
 * This file is part of base41.
 *
 * base41 is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * base41 is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with base41. If not, see <https://www.gnu.org/licenses/>.
 */

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![cfg_attr(feature = "doc_cfg", feature(doc_cfg))]

//! Base41: two bytes in, three printable characters out.
//!
//! Every pair of input bytes `lo, hi` is read as the little-endian number
//! `x = lo + 256 * hi` and written as three base-41 digits, least significant
//! first. Digits map onto the contiguous run of ASCII bytes
//! <code>)</code> (41) through <code>Q</code> (81), see [`ALPHABET`]. An
//! input with an odd number of bytes is encoded as if it ended in an extra
//! zero byte.
//!
//! ```
//! let data = [26, 168, 48, 178, 7, 162, 52, 188, 199, 36];
//! assert_eq!(base41::encode_to_string(&data), "BABA.DEDA.DECA.");
//! assert_eq!(base41::decode_str("BABA.DEDA.DECA.").unwrap(), data);
//! ```
//!
//! Besides the slice functions in [`encode`] and [`decode`], the `std`
//! feature provides [`EncoderWriter`] and [`DecoderReader`], which encode and
//! decode incrementally on top of any [`std::io::Write`] or [`std::io::Read`].

pub mod decode;
mod digit;
pub mod encode;
#[cfg(feature = "std")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "std")))]
pub mod read;
#[cfg(feature = "std")]
mod sticky;
#[cfg(feature = "std")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "std")))]
pub mod write;


#[cfg(feature = "alloc")]
extern crate alloc;

const BYTES_PER_BLOCK: usize = 2;
const DIGITS_PER_BLOCK: usize = 3;

const BASE: u8 = 41;

/// The byte representing the digit 0.
pub const ALPHABET_START: u8 = b')';

/// All 41 symbols, in digit order.
pub const ALPHABET: &str = ")*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQ";

use digit::Digit;

pub use decode::decode_slice;
pub use decode::decode_slice_with;
pub use decode::decoded_len;
pub use decode::{DecodeConfig, DecodeError, PartialDecodeError};
#[cfg(feature = "alloc")]
pub use decode::{decode_str, decode_to_vec, decode_to_vec_with};

pub use encode::encode_slice;
pub use encode::encoded_len;
#[cfg(feature = "alloc")]
pub use encode::{encode_to_string, encode_to_vec};

#[cfg(feature = "std")]
pub use read::DecoderReader;
#[cfg(feature = "std")]
pub use write::EncoderWriter;
