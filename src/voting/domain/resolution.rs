//! Shared resolution strategy for both voting subsystems.
//!
//! Binary votes and session votes decide the same thing: either one draft
//! wins, or none satisfied the voters. Both subsystems feed their ballots
//! through [`Tally`], differing only in candidate cardinality and how the
//! buckets are keyed, so strict-majority selection and tie handling exist
//! exactly once.

use super::ResolutionTie;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// One option a ballot can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "choice", rename_all = "snake_case")]
pub enum Bucket<K> {
    /// A concrete draft option.
    Option(K),
    /// No draft satisfied the voter.
    NoneSatisfied,
}

/// One bucket with its vote count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyEntry<K> {
    /// The counted bucket.
    pub bucket: Bucket<K>,
    /// Votes cast into the bucket.
    pub votes: u32,
}

/// Ordered vote counts over a closed set of buckets.
///
/// Every bucket supplied at construction is present in the tally, zero
/// count included, so callers always see the full option set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally<K> {
    entries: Vec<TallyEntry<K>>,
}

impl<K: Eq + Clone> Tally<K> {
    /// Counts ballots into the given option buckets plus `NoneSatisfied`.
    ///
    /// Ballots referencing an option outside `options` are ignored; vote
    /// casting validates membership before any ballot reaches a tally.
    #[must_use]
    pub fn count(options: &[K], ballots: &[Bucket<K>]) -> Self {
        let mut entries: Vec<TallyEntry<K>> = options
            .iter()
            .map(|option| TallyEntry {
                bucket: Bucket::Option(option.clone()),
                votes: 0,
            })
            .collect();
        entries.push(TallyEntry {
            bucket: Bucket::NoneSatisfied,
            votes: 0,
        });

        for ballot in ballots {
            if let Some(entry) = entries.iter_mut().find(|entry| entry.bucket == *ballot) {
                entry.votes += 1;
            }
        }

        Self { entries }
    }

    /// Returns the entries in option order, `NoneSatisfied` last.
    #[must_use]
    pub fn entries(&self) -> &[TallyEntry<K>] {
        &self.entries
    }

    /// Returns the votes counted for one bucket.
    #[must_use]
    pub fn votes_for(&self, bucket: &Bucket<K>) -> u32 {
        self.entries
            .iter()
            .find(|entry| entry.bucket == *bucket)
            .map_or(0, |entry| entry.votes)
    }

    /// Returns the total number of ballots counted.
    #[must_use]
    pub fn total_votes(&self) -> u32 {
        self.entries.iter().map(|entry| entry.votes).sum()
    }

    /// Selects the bucket holding the strict maximum vote count.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionTie`] when two or more buckets share the lead,
    /// including the zero-ballot case, where every bucket ties at zero.
    pub fn resolve(&self) -> Result<&Bucket<K>, ResolutionTie> {
        let leading = self
            .entries
            .iter()
            .map(|entry| entry.votes)
            .max()
            .unwrap_or(0);
        let mut leaders = self
            .entries
            .iter()
            .filter(|entry| entry.votes == leading);

        let first = leaders.next();
        let contenders = 1 + leaders.count();
        match first {
            Some(entry) if contenders == 1 => Ok(&entry.bucket),
            _ => Err(ResolutionTie {
                votes: leading,
                contenders,
            }),
        }
    }
}
