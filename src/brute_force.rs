//! Exhaustive enumeration of every string of a fixed length over an alphabet.
//!
//! Candidates are ordered lexicographically by alphabet position with the
//! first character most significant: for alphabet `ab` and length 2 the
//! order is `aa, ab, ba, bb`. `candidate_at` reconstructs the candidate for
//! any index so the space can be split without materialising it.
use std::ops::Range;

use tracing::warn;

use crate::CrackError;

/// Spaces above this size get a warning before the job starts.
pub const LARGE_SPACE_WARNING: u64 = 100_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BruteForce {
    alphabet: Vec<char>,
    length: usize,
    size: u64,
}

impl BruteForce {
    /// Duplicate characters in `alphabet` are dropped, keeping the first.
    pub fn new(alphabet: &str, length: usize) -> Result<Self, CrackError> {
        let mut chars: Vec<char> = Vec::new();
        for c in alphabet.chars() {
            if !chars.contains(&c) {
                chars.push(c);
            }
        }
        if chars.is_empty() {
            return Err(CrackError::Config("alphabet must not be empty".into()));
        }
        if length == 0 {
            return Err(CrackError::Config("length must be at least 1".into()));
        }

        let size = u32::try_from(length)
            .ok()
            .and_then(|exp| (chars.len() as u64).checked_pow(exp))
            .ok_or_else(|| {
                CrackError::SearchSpaceTooLarge(format!(
                    "{} symbols ^ length {}",
                    chars.len(),
                    length
                ))
            })?;

        if size > LARGE_SPACE_WARNING {
            warn!(
                candidates = size,
                "brute-force space grows exponentially with length; this may take very long"
            );
        }

        Ok(Self {
            alphabet: chars,
            length,
            size,
        })
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// `alphabet.len() ^ length`.
    pub fn size(&self) -> u64 {
        self.size
    }

    fn digits_at(&self, mut index: u64) -> Vec<usize> {
        let base = self.alphabet.len() as u64;
        let mut digits = vec![0usize; self.length];
        for slot in digits.iter_mut().rev() {
            *slot = (index % base) as usize;
            index /= base;
        }
        digits
    }

    /// Candidate at `index`, or `None` past the end of the space.
    pub fn candidate_at(&self, index: u64) -> Option<String> {
        if index >= self.size {
            return None;
        }
        Some(self.render(&self.digits_at(index)))
    }

    fn render(&self, digits: &[usize]) -> String {
        digits.iter().map(|&d| self.alphabet[d]).collect()
    }

    /// Iterate the candidates whose indices fall in `range`.
    pub fn iter_range(&self, range: Range<u64>) -> Combinations<'_> {
        let end = range.end.min(self.size);
        let start = range.start.min(end);
        Combinations {
            space: self,
            digits: self.digits_at(start),
            remaining: end - start,
        }
    }
}

/// Odometer over a contiguous index range of a [`BruteForce`] space.
#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    space: &'a BruteForce,
    digits: Vec<usize>,
    remaining: u64,
}

impl Combinations<'_> {
    fn advance(&mut self) {
        let base = self.space.alphabet.len();
        for slot in self.digits.iter_mut().rev() {
            *slot += 1;
            if *slot < base {
                return;
            }
            *slot = 0;
        }
    }
}

impl Iterator for Combinations<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.remaining == 0 {
            return None;
        }
        let out = self.space.render(&self.digits);
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (n, usize::try_from(self.remaining).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_letters_length_two() {
        let bf = BruteForce::new("ab", 2).unwrap();
        assert_eq!(bf.size(), 4);
        let all: Vec<String> = bf.iter_range(0..bf.size()).collect();
        assert_eq!(all, ["aa", "ab", "ba", "bb"]);
    }

    #[test]
    fn index_matches_iteration() {
        let bf = BruteForce::new("xyz", 3).unwrap();
        for (i, cand) in bf.iter_range(0..bf.size()).enumerate() {
            assert_eq!(bf.candidate_at(i as u64).unwrap(), cand);
        }
        assert!(bf.candidate_at(bf.size()).is_none());
    }

    #[test]
    fn duplicate_alphabet_characters_collapse() {
        let bf = BruteForce::new("aab", 1).unwrap();
        assert_eq!(bf.alphabet(), ['a', 'b']);
        assert_eq!(bf.size(), 2);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(BruteForce::new("", 3), Err(CrackError::Config(_))));
        assert!(matches!(BruteForce::new("ab", 0), Err(CrackError::Config(_))));
        assert!(matches!(
            BruteForce::new("0123456789abcdef", 17),
            Err(CrackError::SearchSpaceTooLarge(_))
        ));
    }

    #[test]
    fn mid_range_iteration_starts_at_offset() {
        let bf = BruteForce::new("abc", 2).unwrap();
        let mid: Vec<String> = bf.iter_range(2..5).collect();
        assert_eq!(mid, ["ac", "ba", "bb"]);
    }
}
