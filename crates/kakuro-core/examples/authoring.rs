//! Basic example of driving an authoring session end to end with a
//! canned solver standing in for the real service.

use kakuro_core::{Phase, Session, SolveError, SolveRequest, SolveResponse, Solver};

/// Pretends to solve by echoing back a fixed pair of snapshots
struct CannedSolver;

impl Solver for CannedSolver {
    fn solve(&self, request: &SolveRequest) -> Result<SolveResponse, SolveError> {
        println!(
            "Solving a {}x{} board with {} row constraint line(s)...\n",
            request.board.len(),
            request.board[0].len(),
            request.row_constraints.len(),
        );
        let step = |top: [&str; 2], bottom: [&str; 2]| {
            vec![
                top.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
                bottom.iter().map(|s| s.to_string()).collect(),
            ]
        };
        Ok(SolveResponse {
            success: true,
            is_solved: Some(true),
            steps: Some(vec![
                step(["X", "."], [".", "X"]),
                step(["X", "1"], [".", "X"]),
                step(["X", "1"], ["2", "X"]),
            ]),
            error: None,
        })
    }
}

fn main() {
    // Author a 2x2 puzzle with the anti-diagonal selected
    let mut session = Session::new(2, 2).expect("dimensions are valid");
    session.press_cell(0, 1);
    session.release();
    session.press_cell(1, 0);
    session.release();
    println!("Selection:\n{}\n", session.grid());

    // Freeze the grid; the runs are derived now
    let solver = CannedSolver;
    session.advance(&solver).expect("segmentation cannot fail");
    assert_eq!(session.phase(), Phase::Annotating);
    println!(
        "Found {} row line(s) and {} column line(s) of runs",
        session.row_sentences().len(),
        session.col_sentences().len(),
    );

    // Annotate every run
    session.set_row_sum(0, 0, 1).unwrap();
    session.set_row_sum(1, 0, 2).unwrap();
    session.set_col_sum(0, 0, 2).unwrap();
    session.set_col_sum(1, 0, 1).unwrap();

    // Solve and walk the snapshots
    session.advance(&solver).expect("canned solver succeeds");
    println!("\nSolution in {} step(s):", session.step_count());
    loop {
        println!(
            "--- step {}/{} ---\n{}",
            session.step_index() + 1,
            session.step_count(),
            session.grid()
        );
        if !session.next_step() {
            break;
        }
    }
}
