//! Wordlist-backed candidate source.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::io_utils::format_io_error;

/// Deduplicated words gathered from one or more wordlists.
///
/// Words keep the order in which they were first seen, so enumeration is
/// stable for a given set of input files.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: Vec<String>,
    skipped: Vec<PathBuf>,
}

impl Dictionary {
    /// Read every file, trimming lines and dropping blanks and duplicates.
    ///
    /// Files that are missing or not valid UTF-8 are logged and skipped.
    /// An empty result is not an error here; [`crate::CrackJob::new`]
    /// rejects it.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Self {
        let mut dict = Self::default();
        let mut seen = HashSet::new();

        for path in paths {
            let path = path.as_ref();
            let text = match fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("{}", format_io_error("reading wordlist", path, &e));
                    dict.skipped.push(path.to_path_buf());
                    continue;
                }
            };
            let before = dict.words.len();
            dict.extend_unique(text.lines(), &mut seen);
            info!(
                path = %path.display(),
                added = dict.words.len() - before,
                "loaded wordlist"
            );
        }
        dict
    }

    /// Build a dictionary from in-memory words with the same trimming and
    /// deduplication rules as [`Dictionary::load`].
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dict = Self::default();
        let mut seen = HashSet::new();
        dict.extend_unique(words, &mut seen);
        dict
    }

    fn extend_unique<I, S>(&mut self, lines: I, seen: &mut HashSet<String>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            let word = line.as_ref().trim();
            if word.is_empty() || seen.contains(word) {
                continue;
            }
            seen.insert(word.to_string());
            self.words.push(word.to_string());
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Paths that could not be read.
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_drops_blank_lines() {
        let dict = Dictionary::from_words(["  alpha ", "", "\t", "beta\r"]);
        assert_eq!(dict.words(), ["alpha", "beta"]);
    }

    #[test]
    fn keeps_first_seen_order() {
        let dict = Dictionary::from_words(["b", "a", "b", "c", "a"]);
        assert_eq!(dict.words(), ["b", "a", "c"]);
    }
}
