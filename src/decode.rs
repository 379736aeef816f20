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

//! Functions and types for decoding base-41 data.

use super::Digit;
use super::{ALPHABET_START, BASE, BYTES_PER_BLOCK, DIGITS_PER_BLOCK};

use core::fmt::{self, Display, Formatter};

#[cfg(feature = "alloc")]
use alloc::{vec, vec::Vec};

/// An error encountered while decoding base-41 data.
///
/// The `remaining` fields count the input bytes that had not yet been decoded
/// when the error occurred, including the offending block. They are positions
/// measured from the end of the input passed to the failing call, not from
/// the start of a stream.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// A block decoded to a value that does not fit in two bytes.
    CorruptInput {
        /// Bytes left in the input, starting at the corrupt block.
        remaining: usize,
    },
    /// Encountered a byte outside the alphabet while
    /// [`DecodeConfig::strict_alphabet`] was true.
    BadChar {
        /// The offending byte.
        byte: u8,
        /// Bytes left in the input, starting at the block containing
        /// `byte`.
        remaining: usize,
    },
    /// The input ended partway through a block while
    /// [`DecodeConfig::require_full_blocks`] was true.
    BadLength {
        /// The number of bytes (1 or 2) in the incomplete block.
        trailing: usize,
    },
}

use DecodeError as Error;

/// Alias of <code>[Result]\<T, [DecodeError]></code>.
pub type DecodeResult<T> = Result<T, DecodeError>;

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::CorruptInput {
                remaining,
            } => write!(
                f,
                "illegal base-41 data: block out of range ({} bytes remaining)",
                remaining,
            ),
            Self::BadChar {
                byte,
                remaining,
            } => write!(
                f,
                "bad character: {:?} ({} bytes remaining)",
                char::from(*byte),
                remaining,
            ),
            Self::BadLength {
                trailing,
            } => write!(
                f,
                "bad input length: {} trailing bytes after the last block",
                trailing,
            ),
        }
    }
}

#[cfg(feature = "std")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "std")))]
impl std::error::Error for DecodeError {}

/// Error returned by [`decode_slice`]: a [`DecodeError`] together with the
/// number of bytes decoded before it.
///
/// The first [`Self::written`] bytes of the output buffer hold valid decoded
/// data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartialDecodeError {
    written: usize,
    error: DecodeError,
}

impl PartialDecodeError {
    /// The number of bytes written to the output before the error occurred.
    pub fn written(&self) -> usize {
        self.written
    }

    /// The error that stopped decoding.
    pub fn error(&self) -> DecodeError {
        self.error
    }
}

impl From<PartialDecodeError> for DecodeError {
    fn from(e: PartialDecodeError) -> Self {
        e.error
    }
}

impl Display for PartialDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} (after {} decoded bytes)", self.error, self.written)
    }
}

#[cfg(feature = "std")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "std")))]
impl std::error::Error for PartialDecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Used by the `decode_*_with` functions and
/// [`DecoderReader`](crate::DecoderReader) to configure the decoding process.
///
/// The default configuration accepts any input whose blocks decode to values
/// that fit in two bytes, and ignores 1 or 2 bytes left over after the last
/// complete block.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Whether every input byte must be one of the 41 alphabet symbols.
    /// Without this check, a block containing bytes outside the alphabet is
    /// only rejected if its value ends up out of range. [default: false]
    pub strict_alphabet: bool,
    /// Whether input ending partway through a block is an error rather than
    /// silently truncated. [default: false]
    pub require_full_blocks: bool,
}

impl DecodeConfig {
    /// Returns the default configuration.
    pub const fn new() -> Self {
        Self {
            strict_alphabet: false,
            require_full_blocks: false,
        }
    }

    /// Returns a configuration with every check enabled.
    pub const fn strict() -> Self {
        Self {
            strict_alphabet: true,
            require_full_blocks: true,
        }
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

enum BlockError {
    OutOfRange,
    BadChar(u8),
}

impl BlockError {
    fn at(self, remaining: usize) -> DecodeError {
        match self {
            Self::OutOfRange => Error::CorruptInput {
                remaining,
            },
            Self::BadChar(byte) => Error::BadChar {
                byte,
                remaining,
            },
        }
    }
}

fn decode_block(
    block: &[u8],
    config: DecodeConfig,
) -> Result<[u8; BYTES_PER_BLOCK], BlockError> {
    if config.strict_alphabet {
        let bad = block.iter().find(|b| Digit::from_symbol(**b).is_none());
        if let Some(&b) = bad {
            return Err(BlockError::BadChar(b));
        }
    }

    // Bytes below the alphabet give negative digits, so the sum is signed.
    let x = block.iter().rev().fold(0_i32, |sum, &b| {
        sum * i32::from(BASE) + (i32::from(b) - i32::from(ALPHABET_START))
    });
    u16::try_from(x)
        .map(u16::to_le_bytes)
        .map_err(|_| BlockError::OutOfRange)
}

/// Returns the maximum length of the data decoded from `n` bytes of base-41
/// input. This is exact when `n` is a multiple of 3.
pub const fn decoded_len(n: usize) -> usize {
    n / DIGITS_PER_BLOCK * BYTES_PER_BLOCK
}

/// Decodes `src` into the start of `dst`, returning the number of bytes
/// written.
///
/// This is [`decode_slice_with`] with the default [`DecodeConfig`]: 1 or 2
/// bytes left over after the last complete block are ignored.
///
/// # Panics
///
/// Panics if `dst` is shorter than <code>[decoded_len]\(src.len())</code>.
pub fn decode_slice(
    src: &[u8],
    dst: &mut [u8],
) -> Result<usize, PartialDecodeError> {
    decode_slice_with(src, dst, DecodeConfig::new())
}

/// Decodes `src` into the start of `dst` with the given config.
///
/// On error, the bytes decoded before the offending block are left in `dst`
/// and counted by [`PartialDecodeError::written`].
///
/// # Panics
///
/// Panics if `dst` is shorter than <code>[decoded_len]\(src.len())</code>.
pub fn decode_slice_with(
    src: &[u8],
    dst: &mut [u8],
    config: DecodeConfig,
) -> Result<usize, PartialDecodeError> {
    let len = decoded_len(src.len());
    assert!(
        len <= dst.len(),
        "output buffer too small: {} bytes for {} input bytes",
        dst.len(),
        src.len(),
    );

    let blocks = src.chunks_exact(DIGITS_PER_BLOCK);
    let trailing = blocks.remainder().len();
    let mut written = 0;
    for (block, out) in blocks.zip(dst.chunks_exact_mut(BYTES_PER_BLOCK)) {
        let consumed = written / BYTES_PER_BLOCK * DIGITS_PER_BLOCK;
        let bytes = decode_block(block, config).map_err(|e| {
            PartialDecodeError {
                written,
                error: e.at(src.len() - consumed),
            }
        })?;
        out.copy_from_slice(&bytes);
        written += BYTES_PER_BLOCK;
    }

    if config.require_full_blocks && trailing != 0 {
        return Err(PartialDecodeError {
            written,
            error: Error::BadLength {
                trailing,
            },
        });
    }
    Ok(written)
}

/// Decodes `bytes` into a newly allocated [`Vec`].
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn decode_to_vec(bytes: &[u8]) -> DecodeResult<Vec<u8>> {
    decode_to_vec_with(bytes, DecodeConfig::new())
}

/// Decodes `bytes` into a newly allocated [`Vec`] with the given config.
///
/// This function is like [`decode_to_vec`], but takes a configuration object.
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn decode_to_vec_with(
    bytes: &[u8],
    config: DecodeConfig,
) -> DecodeResult<Vec<u8>> {
    let mut out = vec![0; decoded_len(bytes.len())];
    let len = decode_slice_with(bytes, &mut out, config)?;
    out.truncate(len);
    Ok(out)
}

/// Decodes a base-41 `str`.
#[cfg(feature = "alloc")]
#[cfg_attr(feature = "doc_cfg", doc(cfg(feature = "alloc")))]
pub fn decode_str(s: &str) -> DecodeResult<Vec<u8>> {
    decode_to_vec(s.as_bytes())
}
