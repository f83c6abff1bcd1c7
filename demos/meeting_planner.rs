//! Plans a short series of project meetings over two weeks.
//!
//! Run with `RUST_LOG=debug` to see each solver phase.

use calsat::{CalendarProblem, Comparison, Constraint, CspSolver, SolverConfig};
use chrono::NaiveDate;

const MEETINGS: [&str; 4] = ["Kickoff", "Design review", "Demo", "Retrospective"];

fn main() {
    env_logger::init();

    let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).expect("valid June date");
    let (kickoff, review, demo, retro) = (0, 1, 2, 3);

    let problem = CalendarProblem::new(MEETINGS.len(), day(3), day(14)).with_constraints([
        // Kickoff in the first week, not on the Monday
        Constraint::unary(kickoff, Comparison::Before, day(8)),
        Constraint::unary(kickoff, Comparison::NotEqual, day(3)),
        // Design review exactly one week after the kickoff
        Constraint::binary(review, Comparison::DaysApart(7), kickoff),
        // Demo after the review, at most two days later
        Constraint::binary(demo, Comparison::After, review),
        Constraint::binary(demo, Comparison::WithinDays(2), review),
        // Retrospective on or after the demo, never on the 13th
        Constraint::binary(retro, Comparison::OnOrAfter, demo),
        Constraint::unary(retro, Comparison::NotEqual, day(13)),
    ]);

    let solver = CspSolver::new(SolverConfig::default());
    let solution = match solver.solve(&problem) {
        Ok(solution) => solution,
        Err(e) => {
            eprintln!("Invalid problem: {e}");
            std::process::exit(1);
        }
    };

    println!("Meeting plan:");
    println!("=============");
    match &solution.schedule {
        Some(schedule) => {
            for (meeting, date) in schedule.iter() {
                println!("{:<14} {}", MEETINGS[meeting], date.format("%a %Y-%m-%d"));
            }
        }
        None => println!("No schedule satisfies every constraint."),
    }

    let stats = solution.stats;
    println!();
    println!(
        "node consistency: {} date(s) removed",
        stats.node_consistency.removed
    );
    println!(
        "arc consistency:  {} revision(s), {} date(s) removed",
        stats.arc_consistency.revisions, stats.arc_consistency.removed
    );
    println!(
        "search:           {} node(s), {} backtrack(s)",
        stats.search.nodes, stats.search.backtracks
    );
}
