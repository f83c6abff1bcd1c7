//! Shared helpers for unit tests.

use chrono::NaiveDate;

use crate::constraints::Constraint;

/// Day `day` of March 2024.
pub fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

/// Every day from `d(first)` to `d(last)`, inclusive.
pub fn dates(first: u32, last: u32) -> Vec<NaiveDate> {
    (first..=last).map(d).collect()
}

/// Enumerates every assignment of `n` meetings over `[start, end]` and keeps
/// the ones satisfying all constraints.
pub fn brute_force_solutions(
    n: usize,
    start: NaiveDate,
    end: NaiveDate,
    constraints: &[Constraint],
) -> Vec<Vec<NaiveDate>> {
    let days: Vec<NaiveDate> = start.iter_days().take_while(|day| *day <= end).collect();
    let mut solutions = Vec::new();
    let mut current = Vec::with_capacity(n);
    enumerate(n, &days, constraints, &mut current, &mut solutions);
    solutions
}

fn enumerate(
    n: usize,
    days: &[NaiveDate],
    constraints: &[Constraint],
    current: &mut Vec<NaiveDate>,
    solutions: &mut Vec<Vec<NaiveDate>>,
) {
    if current.len() == n {
        if constraints.iter().all(|c| c.check(current) == Some(true)) {
            solutions.push(current.clone());
        }
        return;
    }
    for &day in days {
        current.push(day);
        enumerate(n, days, constraints, current, solutions);
        current.pop();
    }
}
