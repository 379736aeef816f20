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

//! Functions for encoding base-41 data.

use super::Digit;
use super::{BASE, BYTES_PER_BLOCK, DIGITS_PER_BLOCK};

#[cfg(feature = "alloc")]
use alloc::{string::String, vec, vec::Vec};

/// Encodes the two bytes of one block.
pub(crate) fn encode_block(lo: u8, hi: u8) -> [u8; DIGITS_PER_BLOCK] {
    let mut x = u16::from_le_bytes([lo, hi]);
    let mut block = [0; DIGITS_PER_BLOCK];
    block.iter_mut().for_each(|s| {
        *s = Digit::from_rem(x).symbol();
        x /= u16::from(BASE);
    });
    block
}

/// Returns the length of the base-41 encoding of `n` bytes, or [`None`] if
/// it does not fit in a [`usize`].
///
/// This is always a multiple of 3: odd inputs are padded to a whole block.
pub const fn encoded_len(n: usize) -> Option<usize> {
    let blocks = n / BYTES_PER_BLOCK + (n % BYTES_PER_BLOCK != 0) as usize;
    blocks.checked_mul(DIGITS_PER_BLOCK)
}

/// Encodes `src` into the start of `dst`, returning the number of bytes
/// written.
///
/// If `src` has an odd number of bytes, its last byte is encoded as if it
/// were followed by a zero byte.
///
/// # Panics
///
/// Panics if `dst` is shorter than <code>[encoded_len]\(src.len())</code>.
pub fn encode_slice(src: &[u8], dst: &mut [u8]) -> usize {
    let len = match encoded_len(src.len()) {
        Some(len) if len <= dst.len() => len,
        _ => panic!(
            "output buffer too small: {} bytes for {} input bytes",
            dst.len(),
            src.len(),
        ),
    };

    let mut blocks = dst[..len].chunks_exact_mut(DIGITS_PER_BLOCK);
    let pairs = src.chunks_exact(BYTES_PER_BLOCK);
    let last = pairs.remainder().first().copied();
    pairs.zip(blocks.by_ref()).for_each(|(pair, block)| {
        block.copy_from_slice(&encode_block(pair[0], pair[1]));
    });
    if let (Some(lo), Some(block)) = (last, blocks.next()) {
        block.copy_from_slice(&encode_block(lo, 0));
    }
    len
}

/// Encodes `bytes` into a newly allocated [`Vec`].
///
/// # Panics
///
/// Panics if the encoded length overflows a [`usize`].
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn encode_to_vec(bytes: &[u8]) -> Vec<u8> {
    let len = encoded_len(bytes.len()).unwrap_or_else(|| {
        panic!("encoded length of {} bytes overflows usize", bytes.len())
    });
    let mut out = vec![0; len];
    encode_slice(bytes, &mut out);
    out
}

/// Encodes `bytes` into a [`String`].
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn encode_to_string(bytes: &[u8]) -> String {
    let ascii = encode_to_vec(bytes);

    #[cfg(debug_assertions)]
    let ascii = String::from_utf8(ascii)
        .expect("[debug] encoded data is not valid utf-8 -- this is UB!")
        .into_bytes();

    // SAFETY: Every symbol in the alphabet is ASCII.
    unsafe { String::from_utf8_unchecked(ascii) }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    use crate::ALPHABET;
    use test_case::test_case;

    #[test]
    fn encodes_known_data() {
        let data = [26, 168, 48, 178, 7, 162, 52, 188, 199, 36];
        assert_eq!(encode_to_string(&data), "BABA.DEDA.DECA.");
    }

    #[test_case(0, 0; "empty")]
    #[test_case(1, 3; "single byte")]
    #[test_case(2, 3; "one block")]
    #[test_case(3, 6; "one block and a half")]
    #[test_case(10, 15; "five blocks")]
    #[test_case(11, 18; "five blocks and a half")]
    fn encoded_len_rounds_up(n: usize, expected: usize) {
        assert_eq!(encoded_len(n), Some(expected));
        assert_eq!(encode_to_vec(&vec![0xa5; n]).len(), expected);
    }

    #[test]
    fn encoded_len_overflow() {
        assert_eq!(encoded_len(usize::MAX), None);
        assert!(encoded_len(usize::MAX / 3).is_some());
    }

    #[test]
    fn every_pair_stays_in_alphabet() {
        for x in 0..=u16::MAX {
            let [lo, hi] = x.to_le_bytes();
            for s in encode_block(lo, hi) {
                assert!(
                    ALPHABET.as_bytes().contains(&s),
                    "{:?} encoded to {:?}",
                    (lo, hi),
                    s,
                );
            }
        }
    }

    #[test]
    fn block_extremes() {
        assert_eq!(&encode_block(0, 0), b")))");
        // 65535 = 17 + 41 * 40 + 1681 * 38
        assert_eq!(&encode_block(0xff, 0xff), b":QO");
    }

    #[test]
    fn odd_byte_is_padded_with_zero() {
        assert_eq!(encode_to_vec(&[7]), encode_to_vec(&[7, 0]));
        let mut out = encode_to_vec(&[1, 2, 3]);
        assert_eq!(out.split_off(3), encode_block(3, 0));
        assert_eq!(out, encode_block(1, 2));
    }

    #[test]
    fn leaves_rest_of_output_untouched() {
        let mut out = [b'!'; 8];
        assert_eq!(encode_slice(&[1, 2], &mut out), 3);
        assert_eq!(&out[3..], b"!!!!!");
    }

    #[test]
    #[should_panic(expected = "output buffer too small")]
    fn panics_on_short_output() {
        let mut out = [0; 5];
        encode_slice(&[1, 2, 3], &mut out);
    }
}
