//! Candidate date sets for meeting variables.
//!
//! A [`Domain`] holds the dates still considered possible for one meeting.
//! [`Domains`] is the arena of all domains of a problem, indexed by
//! [`VarId`]. Domains only ever shrink: filtering removes dates, nothing
//! adds them back.

use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::ops::{Deref, Index, IndexMut};

use chrono::NaiveDate;

use crate::VarId;

/// A set of candidate dates, iterated in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Domain(BTreeSet<NaiveDate>);

// ─────────────────────────────────────────────────────────────────────
// Constructors
// ─────────────────────────────────────────────────────────────────────

impl Domain {
    /// Creates an empty domain.
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Creates a domain holding every date in the inclusive `[start, end]`.
    ///
    /// An inverted range yields an empty domain.
    pub fn from_range(start: NaiveDate, end: NaiveDate) -> Self {
        Self(start.iter_days().take_while(|day| *day <= end).collect())
    }
}

impl FromIterator<NaiveDate> for Domain {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ─────────────────────────────────────────────────────────────────────
// Queries
// ─────────────────────────────────────────────────────────────────────

impl Domain {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.0.contains(date)
    }

    pub fn iter(&self) -> btree_set::Iter<'_, NaiveDate> {
        self.0.iter()
    }

    /// Earliest remaining date.
    pub fn first(&self) -> Option<NaiveDate> {
        self.0.first().copied()
    }

    /// Latest remaining date.
    pub fn last(&self) -> Option<NaiveDate> {
        self.0.last().copied()
    }

    /// Returns true if every date of `self` is also in `other`.
    pub fn is_subset(&self, other: &Domain) -> bool {
        self.0.is_subset(&other.0)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Shrinking
// ─────────────────────────────────────────────────────────────────────

impl Domain {
    /// Removes a single date. Returns true if it was present.
    pub fn remove(&mut self, date: &NaiveDate) -> bool {
        self.0.remove(date)
    }

    /// Keeps only the dates for which `keep` returns true.
    ///
    /// Returns the number of dates removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(NaiveDate) -> bool,
    {
        let before = self.0.len();
        self.0.retain(|date| keep(*date));
        before - self.0.len()
    }
}

impl<'a> IntoIterator for &'a Domain {
    type Item = &'a NaiveDate;
    type IntoIter = btree_set::Iter<'a, NaiveDate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, date) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{date}")?;
        }
        write!(f, "}}")
    }
}

/// One [`Domain`] per meeting variable, indexed by [`VarId`].
///
/// Read access goes through `Deref<Target = [Domain]>`. Mutation goes through
/// `IndexMut` or [`Domains::split_pair`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Domains(Vec<Domain>);

impl Domains {
    /// Creates `n` domains, each covering the inclusive `[start, end]`.
    pub fn full(n: usize, start: NaiveDate, end: NaiveDate) -> Self {
        let domain = Domain::from_range(start, end);
        Self(vec![domain; n])
    }

    /// Total number of candidate dates across all variables.
    pub fn total_size(&self) -> usize {
        self.0.iter().map(Domain::len).sum()
    }

    /// First variable whose domain has been emptied, if any.
    pub fn first_empty(&self) -> Option<VarId> {
        self.0.iter().position(Domain::is_empty)
    }

    /// Borrows one domain mutably and another immutably.
    ///
    /// # Panics
    ///
    /// Panics if `target == support` or either index is out of range.
    pub fn split_pair(&mut self, target: VarId, support: VarId) -> (&mut Domain, &Domain) {
        assert_ne!(target, support, "split_pair needs two distinct variables");
        if target < support {
            let (low, high) = self.0.split_at_mut(support);
            (&mut low[target], &high[0])
        } else {
            let (low, high) = self.0.split_at_mut(target);
            (&mut high[0], &low[support])
        }
    }

    /// Returns true if each domain of `self` is a subset of the matching
    /// domain in `other`.
    pub fn is_subset(&self, other: &Domains) -> bool {
        self.0.len() == other.0.len()
            && self.0.iter().zip(other.0.iter()).all(|(a, b)| a.is_subset(b))
    }
}

impl From<Vec<Domain>> for Domains {
    fn from(domains: Vec<Domain>) -> Self {
        Self(domains)
    }
}

impl Deref for Domains {
    type Target = [Domain];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Index<VarId> for Domains {
    type Output = Domain;

    fn index(&self, var: VarId) -> &Self::Output {
        &self.0[var]
    }
}

impl IndexMut<VarId> for Domains {
    fn index_mut(&mut self, var: VarId) -> &mut Self::Output {
        &mut self.0[var]
    }
}
