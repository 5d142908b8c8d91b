//! The AST-to-AST optimizer: three ordered passes over a validated
//! program (constant folding, dead-code elimination, unused-variable
//! elimination), each reporting its transformations for `--debug` and
//! the visualizer.

pub mod dce;
pub mod fold;
pub mod report;
pub mod unused;

pub use report::{OptimizationDetail, OptimizationKind, OptimizationReport};

use ilc_par::ast::Program;

/// Runs the three passes in order and returns the rewritten program
/// together with the combined report.
pub fn optimize(program: Program) -> (Program, OptimizationReport) {
    let mut report = OptimizationReport::default();
    let program = fold::fold_program(program, &mut report);
    let program = dce::dce_stmts(program, &mut report);
    let program = unused::strip_unused_vars(program, &mut report);
    (program, report)
}
