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

//! Streaming encoder.

use super::encode::{encode_block, encode_slice};
use super::sticky::Failure;
use super::{BYTES_PER_BLOCK, DIGITS_PER_BLOCK};

use std::fmt::{self, Debug, Formatter};
use std::io::{self, Write};

const STAGING_LEN: usize = 1024 / DIGITS_PER_BLOCK * DIGITS_PER_BLOCK;
const STAGING_INPUT_LEN: usize =
    STAGING_LEN / DIGITS_PER_BLOCK * BYTES_PER_BLOCK;

enum State {
    Active,
    Finished,
    Failed(Failure),
}

/// Encodes data written to it and writes the encoded data to an inner
/// writer.
///
/// Encoding works on pairs of bytes, so a single byte may be held back
/// between writes until the next byte arrives. After the last write,
/// [`Self::finish`] must be called to encode that byte (padded with zero) and
/// flush the inner writer. Dropping the encoder without finishing it loses
/// the held byte.
///
/// If the inner writer fails, the error is recorded and every later call
/// fails with the same error.
///
/// ```
/// use base41::EncoderWriter;
/// use std::io::Write;
///
/// let mut encoder = EncoderWriter::new(Vec::new());
/// encoder.write_all(&[26, 168, 48])?;
/// encoder.write_all(&[178, 7])?;
/// encoder.finish()?;
/// assert_eq!(encoder.into_inner(), b"BABA.D0))");
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EncoderWriter<W> {
    inner: W,
    pending: Option<u8>,
    staging: [u8; STAGING_LEN],
    state: State,
}

impl<W: Write> EncoderWriter<W> {
    /// Creates a new encoder that writes base-41 data to `inner`.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            pending: None,
            staging: [0; STAGING_LEN],
            state: State::Active,
        }
    }

    fn check_active(&self) -> io::Result<()> {
        match &self.state {
            State::Active => Ok(()),
            State::Finished => Err(io::Error::new(
                io::ErrorKind::Other,
                "base-41 encoder used after finish",
            )),
            State::Failed(f) => Err(f.to_io_error()),
        }
    }

    /// Records `e` as the sticky failure and returns it as an [`io::Error`].
    fn fail(&mut self, e: io::Error) -> io::Error {
        tracing::debug!(error = %e, "base-41 encoder failed");
        let failure = Failure::from(e);
        let err = failure.to_io_error();
        self.state = State::Failed(failure);
        err
    }

    /// Encodes the held-back byte, if any, writes the last block, and flushes
    /// the inner writer.
    ///
    /// Calling this again after it has succeeded does nothing. Writing after
    /// this method has been called is an error.
    pub fn finish(&mut self) -> io::Result<()> {
        match &self.state {
            State::Finished => return Ok(()),
            State::Failed(f) => return Err(f.to_io_error()),
            State::Active => {}
        }

        let result = match self.pending.take() {
            Some(lo) => self.inner.write_all(&encode_block(lo, 0)),
            None => Ok(()),
        }
        .and_then(|_| self.inner.flush());

        if let Err(e) = result {
            return Err(self.fail(e));
        }
        tracing::trace!("base-41 encoder finished");
        self.state = State::Finished;
        Ok(())
    }

    /// Returns a reference to the inner writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Returns a mutable reference to the inner writer.
    ///
    /// Writing directly to the inner writer may corrupt the encoded output.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Returns the inner writer. This does not call [`Self::finish`].
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for EncoderWriter<W> {
    /// Encodes `buf` and writes the result to the inner writer.
    ///
    /// All of `buf` is consumed unless the inner writer fails. If it fails
    /// after part of `buf` has been consumed, the consumed length is returned
    /// and the error is reported by the next call.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.check_active()?;
        let mut consumed = 0;
        let mut rest = buf;

        let next = rest.split_first();
        if let (Some(lo), Some((&hi, tail))) = (self.pending, next) {
            self.pending = None;
            consumed += 1;
            rest = tail;
            if let Err(e) = self.inner.write_all(&encode_block(lo, hi)) {
                let err = self.fail(e);
                return consumed_or(consumed, err);
            }
        }

        while rest.len() >= BYTES_PER_BLOCK {
            let take = (rest.len() - rest.len() % BYTES_PER_BLOCK)
                .min(STAGING_INPUT_LEN);
            let (chunk, tail) = rest.split_at(take);
            let len = encode_slice(chunk, &mut self.staging);
            if let Err(e) = self.inner.write_all(&self.staging[..len]) {
                let err = self.fail(e);
                return consumed_or(consumed, err);
            }
            consumed += take;
            rest = tail;
        }

        if let [last] = rest {
            self.pending = Some(*last);
            consumed += 1;
        }
        Ok(consumed)
    }

    /// Flushes the inner writer. A held-back byte stays held back; only
    /// [`Self::finish`] writes it.
    fn flush(&mut self) -> io::Result<()> {
        self.check_active()?;
        self.inner.flush().map_err(|e| self.fail(e))
    }
}

/// Reports `err` now if nothing was consumed, otherwise on the next call.
fn consumed_or(consumed: usize, err: io::Error) -> io::Result<usize> {
    if consumed == 0 {
        Err(err)
    } else {
        Ok(consumed)
    }
}

impl<W: Debug> Debug for EncoderWriter<W> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncoderWriter")
            .field("inner", &self.inner)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
