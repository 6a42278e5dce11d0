//! Candidate sources and their division into per-worker partitions.

use std::borrow::Cow;
use std::ops::Range;
use std::slice;

use crate::brute_force::{BruteForce, Combinations};
use crate::dictionary::Dictionary;

/// Finite, ordered sequence of candidate plaintexts.
#[derive(Debug, Clone)]
pub enum CandidateSource {
    Dictionary(Dictionary),
    BruteForce(BruteForce),
}

/// Contiguous slice of a [`CandidateSource`] handed to one worker.
#[derive(Debug, Clone)]
pub enum Partition<'a> {
    Words(&'a [String]),
    Combinations {
        space: &'a BruteForce,
        range: Range<u64>,
    },
}

/// Iterator over the candidates of one [`Partition`].
pub enum PartitionIter<'a> {
    Words(slice::Iter<'a, String>),
    Combinations(Combinations<'a>),
}

/// Split `total` items into `parts` contiguous ranges.
///
/// The first `total % parts` ranges hold one extra item, so sizes differ
/// by at most one and concatenating the ranges yields `0..total`.
pub fn partition_bounds(total: u64, parts: usize) -> Vec<Range<u64>> {
    if parts == 0 {
        return Vec::new();
    }
    let parts = parts as u64;
    let base = total / parts;
    let extra = total % parts;

    let mut start = 0;
    (0..parts)
        .map(|i| {
            let len = base + u64::from(i < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}

impl CandidateSource {
    /// Number of candidates, known before iteration starts.
    pub fn size(&self) -> u64 {
        match self {
            CandidateSource::Dictionary(dict) => dict.len() as u64,
            CandidateSource::BruteForce(space) => space.size(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Split into exactly `n` in-order, disjoint partitions.
    pub fn partition(&self, n: usize) -> Vec<Partition<'_>> {
        let bounds = partition_bounds(self.size(), n);
        match self {
            CandidateSource::Dictionary(dict) => bounds
                .into_iter()
                .map(|r| Partition::Words(&dict.words()[r.start as usize..r.end as usize]))
                .collect(),
            CandidateSource::BruteForce(space) => bounds
                .into_iter()
                .map(|range| Partition::Combinations { space, range })
                .collect(),
        }
    }

    /// The whole sequence, in enumeration order.
    pub fn iter(&self) -> PartitionIter<'_> {
        match self {
            CandidateSource::Dictionary(dict) => PartitionIter::Words(dict.words().iter()),
            CandidateSource::BruteForce(space) => {
                PartitionIter::Combinations(space.iter_range(0..space.size()))
            }
        }
    }

    /// Short description for job events.
    pub fn describe(&self) -> String {
        match self {
            CandidateSource::Dictionary(dict) => {
                let mut text = format!("dictionary ({} unique words", dict.len());
                if !dict.skipped().is_empty() {
                    text.push_str(&format!(", {} files skipped", dict.skipped().len()));
                }
                text.push(')');
                text
            }
            CandidateSource::BruteForce(space) => format!(
                "brute force ({} symbols, length {}, {} candidates)",
                space.alphabet().len(),
                space.length(),
                space.size()
            ),
        }
    }
}

impl From<Dictionary> for CandidateSource {
    fn from(dict: Dictionary) -> Self {
        CandidateSource::Dictionary(dict)
    }
}

impl From<BruteForce> for CandidateSource {
    fn from(space: BruteForce) -> Self {
        CandidateSource::BruteForce(space)
    }
}

impl<'a> Partition<'a> {
    pub fn len(&self) -> u64 {
        match self {
            Partition::Words(words) => words.len() as u64,
            Partition::Combinations { range, .. } => range.end - range.start,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> PartitionIter<'a> {
        match *self {
            Partition::Words(words) => PartitionIter::Words(words.iter()),
            Partition::Combinations { space, ref range } => {
                PartitionIter::Combinations(space.iter_range(range.clone()))
            }
        }
    }
}

impl<'a> Iterator for PartitionIter<'a> {
    type Item = Cow<'a, str>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            PartitionIter::Words(it) => it.next().map(|w| Cow::Borrowed(w.as_str())),
            PartitionIter::Combinations(it) => it.next().map(Cow::Owned),
        }
    }
}
