//! Tests for the extra-constraint protocol itself, driven through a probe
//! constraint that records every notification it receives.
//!
//! The probe forces nothing and never conflicts, so it can sit next to an
//! arbitrary clause set and observe the contract: `propagate` once per
//! assignment of a watched literal with the literal true at that moment,
//! `undo` strictly LIFO against it, and at the end of solving only the
//! root-level assignments still absorbed.

extern crate extsat;

use std::cell::RefCell;
use std::rc::Rc;

use extsat::{
    lbool, BasicSolver, ConstraintArg, ExtraConstraint, Lit, Solver, SolverInterface, SolverOpts,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Propagate(Lit),
    Undo(Lit),
}

/// Watches both polarities of its external literals and logs what happens.
struct Probe {
    elits: Vec<i32>,
    lits: Vec<Lit>,
    stack: Vec<Lit>,
    log: Rc<RefCell<Vec<Event>>>,
}

impl Probe {
    fn new(elits: Vec<i32>, log: Rc<RefCell<Vec<Event>>>) -> Self {
        Self {
            elits,
            lits: vec![],
            stack: vec![],
            log,
        }
    }
}

impl ExtraConstraint for Probe {
    fn initialize(&mut self, solver: &mut ConstraintArg) -> bool {
        for i in 0..self.elits.len() {
            let lit = solver.internalize(self.elits[i]);
            self.lits.push(lit);
            solver.require_extra_watch(lit);
            solver.require_extra_watch(!lit);
        }
        for &lit in &self.lits {
            assert_eq!(solver.val(lit), lbool::UNDEF, "probe added under assignments");
        }
        true
    }

    fn propagate(&mut self, solver: &mut ConstraintArg, p: Lit) -> bool {
        // the engine reports an assignment exactly once, and `p` is true
        assert_eq!(solver.val(p), lbool::TRUE);
        assert!(self.stack.iter().all(|&l| l.var() != p.var()));
        self.stack.push(p);
        self.log.borrow_mut().push(Event::Propagate(p));
        true
    }

    fn calc_reason(&mut self, _solver: &mut ConstraintArg, _p: Lit, _out: &mut Vec<Lit>) {
        unreachable!("the probe never forces or conflicts");
    }

    fn undo(&mut self, _solver: &mut ConstraintArg, p: Lit) {
        // strictly LIFO with respect to propagate
        assert_eq!(self.stack.pop(), Some(p), "undo out of order");
        self.log.borrow_mut().push(Event::Undo(p));
    }
}

fn mk_solver() -> BasicSolver {
    Solver::new(SolverOpts::default(), Default::default())
}

/// A small formula with enough structure to cause conflicts and
/// backtracking over the probed variables.
fn pigeonhole_ish(solver: &mut BasicSolver) {
    // 3 pigeons, 2 holes, vars p_ij = 2*i + j + 1 for i in 0..3, j in 0..2
    for i in 0..3i32 {
        solver.add_ext_clause(&[2 * i + 1, 2 * i + 2]);
    }
    for j in 1..=2i32 {
        for i1 in 0..3i32 {
            for i2 in (i1 + 1)..3i32 {
                solver.add_ext_clause(&[-(2 * i1 + j), -(2 * i2 + j)]);
            }
        }
    }
}

#[test]
fn propagate_undo_pairing_on_unsat() {
    let log = Rc::new(RefCell::new(vec![]));
    let mut solver = mk_solver();

    solver.add_extra(Box::new(Probe::new((1..=6).collect(), log.clone())));
    pigeonhole_ish(&mut solver);
    assert_eq!(solver.solve(), 20);

    // replaying the log must never underflow and must end balanced except
    // for root-level assignments (which are never retracted)
    let log = log.borrow();
    assert!(!log.is_empty(), "probe never notified");
    let mut stack: Vec<Lit> = vec![];
    for &ev in log.iter() {
        match ev {
            Event::Propagate(p) => {
                assert!(stack.iter().all(|&l| l.var() != p.var()));
                stack.push(p);
            }
            Event::Undo(p) => {
                assert_eq!(stack.pop(), Some(p));
            }
        }
    }
    for &l in &stack {
        assert_ne!(
            solver.value_lvl_0(l),
            lbool::FALSE,
            "a still-absorbed literal must not be false at root"
        );
    }
}

#[test]
fn probe_sees_model_assignments_on_sat() {
    let log = Rc::new(RefCell::new(vec![]));
    let mut solver = mk_solver();

    solver.add_extra(Box::new(Probe::new(vec![1, 2, 3], log.clone())));
    solver.add_ext_clause(&[1, 2]);
    solver.add_ext_clause(&[-1, 3]);
    assert_eq!(solver.solve(), 10);

    // every watched variable is assigned in the model; the probe saw each
    // assignment that still stands
    let model_ok = (1..=3).all(|v| solver.ext_val(v) != 0);
    assert!(model_ok);

    let log = log.borrow();
    let mut stack: Vec<Lit> = vec![];
    for &ev in log.iter() {
        match ev {
            Event::Propagate(p) => stack.push(p),
            Event::Undo(p) => {
                assert_eq!(stack.pop(), Some(p));
            }
        }
    }
}
