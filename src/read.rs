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

//! Streaming decoder.

use super::decode::{
    decode_slice_with, decoded_len, DecodeConfig, PartialDecodeError,
};
use super::sticky::Failure;
use super::DecodeError;
use super::DIGITS_PER_BLOCK;

use std::collections::VecDeque;
use std::fmt::{self, Debug, Formatter};
use std::io::{self, Read};

const INPUT_LEN: usize = 1024;
const STAGING_LEN: usize = decoded_len(INPUT_LEN);

enum State {
    Active,
    Failed(Failure),
}

/// Reads base-41 data from an inner reader and decodes it.
///
/// Reads of any size are supported. Input bytes that don't yet form a whole
/// block, and decoded bytes that didn't fit in the caller's buffer, are kept
/// for the next call.
///
/// When the inner reader reaches end of data, so does the decoder: it
/// returns `Ok(0)`, ignoring 1 or 2 bytes of incomplete final block unless
/// [`DecodeConfig::require_full_blocks`] is set. Invalid input produces an
/// error of kind [`io::ErrorKind::InvalidData`] wrapping a [`DecodeError`],
/// once every byte decoded before it has been returned. Invalid input and
/// inner reader errors are sticky: every later call fails with the same
/// error.
///
/// ```
/// use base41::DecoderReader;
/// use std::io::Read;
///
/// let mut decoder = DecoderReader::new(&b"BABA.DEDA.DECA."[..]);
/// let mut buf = [0; 3];
/// decoder.read_exact(&mut buf)?;
/// assert_eq!(buf, [26, 168, 48]);
///
/// let mut rest = Vec::new();
/// decoder.read_to_end(&mut rest)?;
/// assert_eq!(rest, [178, 7, 162, 52, 188, 199, 36]);
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct DecoderReader<R> {
    inner: R,
    config: DecodeConfig,
    /// Encoded bytes not yet decoded. Holds at most 2 bytes between calls.
    input: Vec<u8>,
    /// Decoded bytes not yet returned.
    output: VecDeque<u8>,
    state: State,
}

impl<R: Read> DecoderReader<R> {
    /// Creates a new decoder that reads base-41 data from `inner`.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, DecodeConfig::new())
    }

    /// Creates a new decoder with the given config.
    pub fn with_config(inner: R, config: DecodeConfig) -> Self {
        Self {
            inner,
            config,
            input: Vec::with_capacity(INPUT_LEN),
            output: VecDeque::new(),
            state: State::Active,
        }
    }

    /// Records `failure` and returns it as an [`io::Error`].
    fn fail(&mut self, failure: Failure) -> io::Error {
        tracing::debug!(?failure, "base-41 decoder failed");
        let err = failure.to_io_error();
        self.state = State::Failed(failure);
        err
    }

    /// Reads from the inner reader until at least one whole block is
    /// buffered or the inner reader reaches end of data. At most `limit`
    /// bytes are buffered.
    fn fill(&mut self, limit: usize) -> io::Result<()> {
        while self.input.len() < DIGITS_PER_BLOCK {
            let start = self.input.len();
            self.input.resize(limit, 0);
            let result = self.inner.read(&mut self.input[start..]);
            self.input.truncate(start + *result.as_ref().unwrap_or(&0));
            match result {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Handles end of data with fewer than 3 bytes buffered.
    fn end(&mut self) -> io::Result<usize> {
        let trailing = self.input.len();
        if trailing != 0 && self.config.require_full_blocks {
            let e = DecodeError::BadLength {
                trailing,
            };
            return Err(self.fail(e.into()));
        }
        tracing::trace!(trailing, "base-41 decoder reached end of data");
        Ok(0)
    }

    /// Returns a reference to the inner reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Returns a mutable reference to the inner reader.
    ///
    /// Reading directly from the inner reader may cause the decoder to see
    /// misaligned blocks.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Returns the inner reader. Buffered input and decoded bytes not yet
    /// read are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for DecoderReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        // Bytes decoded by an earlier call go out before anything else,
        // including a recorded failure.
        if !self.output.is_empty() {
            return self.output.read(buf);
        }

        if let State::Failed(f) = &self.state {
            return Err(f.to_io_error());
        }

        let limit = (buf.len() / 2 * DIGITS_PER_BLOCK)
            .clamp(DIGITS_PER_BLOCK, INPUT_LEN);
        if let Err(e) = self.fill(limit) {
            return Err(self.fail(e.into()));
        }
        if self.input.len() < DIGITS_PER_BLOCK {
            return self.end();
        }

        let usable = self.input.len() - self.input.len() % DIGITS_PER_BLOCK;
        let src = &self.input[..usable];
        let (written, error) = if decoded_len(usable) <= buf.len() {
            split(decode_slice_with(src, buf, self.config))
        } else {
            let mut staging = [0; STAGING_LEN];
            let (n, error) =
                split(decode_slice_with(src, &mut staging, self.config));
            self.output.extend(&staging[..n]);
            (self.output.read(buf)?, error)
        };
        self.input.drain(..usable);

        match error {
            Some(e) => {
                let err = self.fail(e.into());
                if written == 0 {
                    Err(err)
                } else {
                    Ok(written)
                }
            }
            None => Ok(written),
        }
    }
}

fn split(
    result: Result<usize, PartialDecodeError>,
) -> (usize, Option<DecodeError>) {
    match result {
        Ok(n) => (n, None),
        Err(e) => (e.written(), Some(e.error())),
    }
}

impl<R: Debug> Debug for DecoderReader<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderReader")
            .field("inner", &self.inner)
            .field("config", &self.config)
            .field("buffered_input", &self.input.len())
            .field("buffered_output", &self.output.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{FailAfter, Trickle};
    use crate::{decode_to_vec, encode_to_vec};
    use test_case::test_case;

    const DATA: [u8; 10] = [26, 168, 48, 178, 7, 162, 52, 188, 199, 36];
    const ENCODED: &[u8] = b"BABA.DEDA.DECA.";

    fn decode_error(err: &io::Error) -> Option<DecodeError> {
        err.get_ref()
            .and_then(|e| e.downcast_ref::<DecodeError>())
            .copied()
    }

    #[test]
    fn small_buffer_receives_pending_output_first() {
        let mut decoder = DecoderReader::new(Trickle::new(ENCODED, 6));
        let mut buf = [0; 1];
        let mut out = Vec::new();
        while decoder.read(&mut buf).unwrap() == 1 {
            out.push(buf[0]);
            if out.len() % 2 == 1 {
                // The second byte of the block is already decoded, so the
                // source must not be touched.
                let left = decoder.get_ref().data.len();
                assert_eq!(decoder.read(&mut buf).unwrap(), 1);
                assert_eq!(decoder.get_ref().data.len(), left);
                out.push(buf[0]);
            }
        }
        assert_eq!(out, DATA);
    }

    #[test]
    fn keeps_partial_blocks_between_reads() {
        let mut decoder = DecoderReader::new(Trickle::new(ENCODED, 4));
        let mut buf = [0; 64];
        assert_eq!(decoder.read(&mut buf).unwrap(), 2);
        assert_eq!(decoder.input.len(), 1);
        assert_eq!(decoder.read(&mut buf).unwrap(), 2);
        assert_eq!(decoder.input.len(), 2);
        assert_eq!(&buf[..2], &DATA[2..4]);
    }

    #[test]
    fn retries_interrupted_reads() {
        let mut source = Trickle::new(ENCODED, 1);
        source.interrupt = true;
        let mut out = Vec::new();
        DecoderReader::new(source).read_to_end(&mut out).unwrap();
        assert_eq!(out, DATA);
    }

    #[test]
    fn empty_buffer_reads_nothing() {
        let mut decoder = DecoderReader::new(ENCODED);
        assert_eq!(decoder.read(&mut []).unwrap(), 0);
        assert_eq!(decoder.get_ref().len(), ENCODED.len());
    }

    #[test]
    fn end_of_data_is_not_sticky() {
        let mut decoder = DecoderReader::new(io::Cursor::new(Vec::new()));
        let mut buf = [0; 8];
        assert_eq!(decoder.read(&mut buf).unwrap(), 0);
        decoder.get_mut().get_mut().extend_from_slice(b"BAB");
        assert_eq!(decoder.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &DATA[..2]);
    }

    #[test_case(b"BABA", 1; "one trailing byte")]
    #[test_case(b"BABA.", 2; "two trailing bytes")]
    fn trailing_bytes(input: &[u8], trailing: usize) {
        let mut out = Vec::new();
        DecoderReader::new(input).read_to_end(&mut out).unwrap();
        assert_eq!(out, DATA[..2]);

        let mut decoder =
            DecoderReader::with_config(input, DecodeConfig::strict());
        let mut out = Vec::new();
        let err = decoder.read_to_end(&mut out).unwrap_err();
        assert_eq!(out, DATA[..2]);
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(
            decode_error(&err),
            Some(DecodeError::BadLength {
                trailing,
            }),
        );
        assert!(decoder.read(&mut [0; 4]).is_err());
    }

    #[test]
    fn corrupt_input_after_valid_blocks() {
        let mut decoder = DecoderReader::new(&b"BABA.DQQQEDA"[..]);
        let mut buf = [0; 64];
        assert_eq!(decoder.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], &DATA[..4]);
        for _ in 0..3 {
            let err = decoder.read(&mut buf).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidData);
            assert_eq!(
                decode_error(&err),
                Some(DecodeError::CorruptInput {
                    remaining: 6,
                }),
            );
        }
    }

    #[test]
    fn corrupt_input_after_pending_output() {
        let mut decoder = DecoderReader::new(&b"BABA.DQQQ"[..]);
        let mut buf = [0; 1];
        for &b in &DATA[..4] {
            assert_eq!(decoder.read(&mut buf).unwrap(), 1);
            assert_eq!(buf[0], b);
        }
        let err = decoder.read(&mut buf).unwrap_err();
        assert_eq!(
            decode_error(&err),
            Some(DecodeError::CorruptInput {
                remaining: 3,
            }),
        );
    }

    #[test]
    fn corrupt_first_block() {
        let mut decoder = DecoderReader::new(&b"QQQBAB"[..]);
        let err = decoder.read(&mut [0; 16]).unwrap_err();
        assert_eq!(
            decode_error(&err),
            Some(DecodeError::CorruptInput {
                remaining: 6,
            }),
        );
    }

    #[test]
    fn strict_alphabet() {
        let config = DecodeConfig::strict();
        let mut decoder = DecoderReader::with_config(&b"BAB(R)"[..], config);
        let mut out = Vec::new();
        let err = decoder.read_to_end(&mut out).unwrap_err();
        assert_eq!(out, DATA[..2]);
        assert_eq!(
            decode_error(&err),
            Some(DecodeError::BadChar {
                byte: b'(',
                remaining: 3,
            }),
        );
    }

    #[test]
    fn source_error_is_sticky() {
        let mut decoder = DecoderReader::new(FailAfter {
            data: b"BABA",
        });
        let mut buf = [0; 64];
        assert_eq!(decoder.read(&mut buf).unwrap(), 2);
        for _ in 0..2 {
            let err = decoder.read(&mut buf).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
            assert_eq!(err.to_string(), "reset");
        }
        assert_eq!(decoder.get_ref().data.len(), 0);
    }

    #[test]
    fn large_input_round_trips() {
        let data: Vec<u8> = (0..=255).cycle().take(5000).collect();
        let encoded = encode_to_vec(&data);
        let mut decoder = DecoderReader::new(&encoded[..]);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        assert_eq!(out, decode_to_vec(&encoded).unwrap());
        assert_eq!(out, data);
    }
}
