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

use super::DecodeError;

use std::io;
use std::sync::Arc;

/// A failure recorded by a streaming adapter. Once recorded, the adapter
/// reports it from every later call.
#[derive(Clone, Debug)]
pub enum Failure {
    Decode(DecodeError),
    Io(Arc<io::Error>),
}

impl Failure {
    /// Builds an [`io::Error`] describing this failure.
    ///
    /// Decode failures have kind [`io::ErrorKind::InvalidData`] and wrap the
    /// [`DecodeError`]. I/O failures keep their original kind and wrap the
    /// original error.
    pub fn to_io_error(&self) -> io::Error {
        match self {
            Self::Decode(e) => io::Error::new(io::ErrorKind::InvalidData, *e),
            Self::Io(e) => io::Error::new(e.kind(), Arc::clone(e)),
        }
    }
}

impl From<io::Error> for Failure {
    fn from(e: io::Error) -> Self {
        Self::Io(Arc::new(e))
    }
}

impl From<DecodeError> for Failure {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}
