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

use super::{ALPHABET_START, BASE};

/// A base-41 digit, always less than 41.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Digit(u8);

impl Digit {
    pub fn new(x: u8) -> Option<Self> {
        (x < BASE).then(|| Self(x))
    }

    /// The digit `x % 41`.
    pub fn from_rem(x: u16) -> Self {
        // `x % 41` is always less than 41.
        Self((x % u16::from(BASE)) as u8)
    }

    /// Returns the digit represented by alphabet symbol `b`, if there is one.
    pub fn from_symbol(b: u8) -> Option<Self> {
        b.checked_sub(ALPHABET_START).and_then(Self::new)
    }

    pub fn symbol(self) -> u8 {
        self.0 + ALPHABET_START
    }
}

impl From<Digit> for u8 {
    fn from(d: Digit) -> u8 {
        d.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ALPHABET;

    #[test]
    fn symbols_match_alphabet() {
        let symbols: Vec<u8> =
            (0..BASE).map(|x| Digit::new(x).unwrap().symbol()).collect();
        assert_eq!(symbols, ALPHABET.as_bytes());
    }

    #[test]
    fn from_symbol_rejects_bytes_outside_alphabet() {
        assert_eq!(Digit::from_symbol(b'('), None);
        assert_eq!(Digit::from_symbol(b'R'), None);
        assert_eq!(Digit::from_symbol(0), None);
        assert_eq!(Digit::from_symbol(b')').map(u8::from), Some(0));
        assert_eq!(Digit::from_symbol(b'Q').map(u8::from), Some(40));
    }

    #[test]
    fn from_rem_wraps() {
        assert_eq!(u8::from(Digit::from_rem(41)), 0);
        assert_eq!(u8::from(Digit::from_rem(u16::MAX)), (65535 % 41) as u8);
    }
}
