use chrono::NaiveDate;
use std::fmt::Display;
use std::ops::Index;

use crate::constraints::Constraint;
use crate::VarId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};


/// A full assignment of dates to meetings.
///
/// Index `i` holds the date of meeting `i`. A `Schedule` is only produced by a
/// successful solve and is never persisted by this crate.
///
/// # Examples
///
/// ```
/// use calsat::constraints::{Comparison, Constraint};
/// use calsat::schedule::Schedule;
/// use chrono::NaiveDate;
///
/// let mon = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
/// let tue = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// let schedule = Schedule::from(vec![mon, tue]);
///
/// assert_eq!(schedule.len(), 2);
/// assert_eq!(schedule[1], tue);
/// assert!(schedule.satisfies(&[Constraint::binary(0, Comparison::Before, 1)]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Schedule(Vec<NaiveDate>);

impl Schedule {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Date assigned to `meeting`, if the meeting exists.
    pub fn get(&self, meeting: VarId) -> Option<NaiveDate> {
        self.0.get(meeting).copied()
    }

    /// Iterates over `(meeting, date)` pairs in meeting order.
    pub fn iter(&self) -> impl Iterator<Item = (VarId, NaiveDate)> + '_ {
        self.0.iter().copied().enumerate()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.0
    }

    pub fn into_dates(self) -> Vec<NaiveDate> {
        self.0
    }

    /// Returns the first constraint violated by this schedule.
    ///
    /// A constraint that references a meeting beyond the end of the schedule
    /// counts as violated.
    pub fn first_violation<'c>(&self, constraints: &'c [Constraint]) -> Option<&'c Constraint> {
        constraints
            .iter()
            .find(|c| !c.check(&self.0).unwrap_or(false))
    }

    /// Checks every constraint directly against the assigned dates.
    pub fn satisfies(&self, constraints: &[Constraint]) -> bool {
        self.first_violation(constraints).is_none()
    }

    /// Earliest and latest assigned dates.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.0.iter().min()?;
        let last = self.0.iter().max()?;
        Some((*first, *last))
    }
}

impl From<Vec<NaiveDate>> for Schedule {
    fn from(dates: Vec<NaiveDate>) -> Self {
        Self(dates)
    }
}

impl From<Schedule> for Vec<NaiveDate> {
    fn from(schedule: Schedule) -> Self {
        schedule.0
    }
}

impl Index<VarId> for Schedule {
    type Output = NaiveDate;

    fn index(&self, meeting: VarId) -> &Self::Output {
        &self.0[meeting]
    }
}

impl Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (meeting, date) in self.iter() {
            writeln!(f, "m{meeting}: {date}")?;
        }
        Ok(())
    }
}
