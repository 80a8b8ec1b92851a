//! Clauses expressed through the [`ExtraConstraint`] protocol.
//!
//! These are much less efficient than the solver's native clauses and exist
//! as reference implementations: a well-understood constraint whose behavior
//! can be checked against the native clause machinery.

use crate::clause::{lbool, Lit};
use crate::core::ConstraintArg;
use crate::extra::ExtraConstraint;

/// A clause as an extra constraint.
///
/// Watches only the falsifying polarity of each literal and rescans the
/// whole clause on every notification.
pub struct ExtClause {
    elits: Vec<i32>,
    lits: Vec<Lit>,

    assignment_stack: Vec<Lit>, // mirrors the trail restricted to watched lits
}

impl ExtClause {
    pub fn new(elits: Vec<i32>) -> Self {
        Self {
            elits,
            lits: vec![],
            assignment_stack: vec![],
        }
    }
}

impl ExtraConstraint for ExtClause {
    fn initialize(&mut self, solver: &mut ConstraintArg) -> bool {
        for i in 0..self.elits.len() {
            let lit = solver.internalize(self.elits[i]);
            solver.require_extra_watch(!lit);
            self.lits.push(lit);
        }

        let mut prop_list = vec![];
        for &lit in &self.lits {
            if solver.val(lit) == lbool::FALSE {
                prop_list.push(!lit);
            }
        }

        for lit in prop_list {
            if !self.propagate(solver, lit) {
                return false;
            }
        }

        true
    }

    fn propagate(&mut self, solver: &mut ConstraintArg, lit: Lit) -> bool {
        debug_assert!(self.assignment_stack.iter().all(|&l| l != lit));
        self.assignment_stack.push(lit);

        let mut undet_lit = Lit::UNDEF;
        for &l in &self.lits {
            let b = solver.val(l);
            if b == lbool::TRUE {
                // already satisfied
                return true;
            }
            if b == lbool::UNDEF {
                if undet_lit != Lit::UNDEF {
                    // more than one undecided lit
                    return true;
                }
                undet_lit = l;
            }
        }

        if undet_lit != Lit::UNDEF {
            solver.search_assign_ext(undet_lit);
            true
        } else {
            false
        }
    }

    fn calc_reason(&mut self, solver: &mut ConstraintArg, lit: Lit, out: &mut Vec<Lit>) {
        out.clear();
        for &l in &self.lits {
            if l == lit {
                continue;
            }
            out.push(!l);
            debug_assert_eq!(solver.val_analyze(l), lbool::FALSE);
        }
    }

    fn undo(&mut self, _solver: &mut ConstraintArg, lit: Lit) {
        debug_assert!(!self.assignment_stack.is_empty());
        debug_assert_eq!(*self.assignment_stack.last().unwrap(), lit);
        self.assignment_stack.pop();
    }
}

/// The same semantics as [`ExtClause`], but propagating "lazily": values are
/// recognized only after being notified through `propagate`, by counting,
/// without rescanning the clause.
pub struct LazyExtClause {
    elits: Vec<i32>,
    lits: Vec<Lit>,
    n_undet: usize,
    n_sat: usize,
    /// The literal this clause wanted to force but which was already false.
    /// Its negation belongs in the conflict reason.
    prop_fail: Lit,

    assignment_stack: Vec<Lit>,
    is_assigned: Vec<bool>,
}

impl LazyExtClause {
    pub fn new(elits: Vec<i32>) -> Self {
        let n = elits.len();
        Self {
            elits,
            lits: vec![],
            n_undet: n,
            n_sat: 0,
            prop_fail: Lit::UNDEF,
            assignment_stack: vec![],
            is_assigned: vec![false; n],
        }
    }

    /// Position of `lit` in the clause: `(index, true)` if the clause
    /// contains `lit` itself, `(index, false)` for its negation.
    fn literal_index(&self, lit: Lit) -> (usize, bool) {
        for (i, &l) in self.lits.iter().enumerate() {
            if l == lit {
                return (i, true);
            } else if l == !lit {
                return (i, false);
            }
        }
        panic!("literal {:?} does not occur in the clause", lit);
    }
}

impl ExtraConstraint for LazyExtClause {
    fn initialize(&mut self, solver: &mut ConstraintArg) -> bool {
        for i in 0..self.elits.len() {
            let lit = solver.internalize(self.elits[i]);
            self.lits.push(lit);
            solver.require_extra_watch(!lit);
            solver.require_extra_watch(lit);
        }

        // We first collect the list of literals which have already been
        // assigned for calling `propagate`. We should NOT call `propagate`
        // immediately after checking values, because this may result in
        // calling `propagate` for literals decided in `propagate` again.
        let mut prop_list = vec![];
        for &lit in &self.lits {
            let v = solver.val(lit);
            if v == lbool::TRUE {
                prop_list.push(lit);
            } else if v == lbool::FALSE {
                prop_list.push(!lit);
            }
        }

        for lit in prop_list {
            if !self.propagate(solver, lit) {
                return false;
            }
        }

        true
    }

    fn propagate(&mut self, solver: &mut ConstraintArg, lit: Lit) -> bool {
        debug_assert!(self
            .assignment_stack
            .iter()
            .all(|&l| l != lit && l != !lit));
        self.assignment_stack.push(lit);

        let (idx, positive) = self.literal_index(lit);
        if positive {
            self.n_sat += 1;
        }
        debug_assert!(!self.is_assigned[idx]);
        self.is_assigned[idx] = true;

        debug_assert!(self.n_undet > 0);
        self.n_undet -= 1;

        if self.n_sat > 0 {
            return true;
        }

        self.prop_fail = Lit::UNDEF;

        if self.n_undet == 0 {
            false
        } else if self.n_undet == 1 {
            let mut p = Lit::UNDEF;
            for i in 0..self.lits.len() {
                if !self.is_assigned[i] {
                    debug_assert_eq!(p, Lit::UNDEF);
                    p = self.lits[i];
                }
            }
            debug_assert_ne!(p, Lit::UNDEF);

            // Even in "lazy" propagators like this, we should check the value
            // of the literal to be assigned, because `search_assign_ext`
            // expects that the given literal is not assigned yet. If this
            // assignment fails because the literal is already set to false,
            // the literal also belongs in the reason, so we memorize it
            // (`prop_fail`).
            let v = solver.val(p);
            if v == lbool::TRUE {
                true
            } else if v == lbool::UNDEF {
                solver.search_assign_ext(p);
                true
            } else {
                self.prop_fail = p;
                false
            }
        } else {
            true
        }
    }

    fn calc_reason(&mut self, solver: &mut ConstraintArg, lit: Lit, out: &mut Vec<Lit>) {
        out.clear();

        if lit == Lit::UNDEF {
            // conflict: either the whole clause is falsified, or the literal
            // we wanted to force was found to be false already
            debug_assert_eq!(self.n_sat, 0);
            if self.prop_fail == Lit::UNDEF {
                debug_assert_eq!(self.n_undet, 0);
                for &l in &self.lits {
                    out.push(!l);
                }
            } else {
                debug_assert_eq!(self.n_undet, 1);
                out.push(!self.prop_fail);
                for i in 0..self.lits.len() {
                    if self.is_assigned[i] {
                        out.push(!self.lits[i]);
                    }
                }
            }
        } else {
            // the clause forced `lit`: every other literal is false. The
            // forced literal itself is back on our books by now (we watch
            // both polarities), so it is excluded by position.
            for i in 0..self.lits.len() {
                let l = self.lits[i];
                if l == lit {
                    continue;
                }
                debug_assert!(self.is_assigned[i]);
                out.push(!l);
            }
        }

        debug_assert!(out.iter().all(|&l| solver.val_analyze(l) == lbool::TRUE));
    }

    fn undo(&mut self, _solver: &mut ConstraintArg, lit: Lit) {
        debug_assert!(!self.assignment_stack.is_empty());
        debug_assert_eq!(*self.assignment_stack.last().unwrap(), lit);
        self.assignment_stack.pop();

        let (idx, positive) = self.literal_index(lit);
        if positive {
            debug_assert!(self.n_sat > 0);
            self.n_sat -= 1;
        }
        debug_assert!(self.is_assigned[idx]);
        self.is_assigned[idx] = false;

        self.n_undet += 1;
        self.prop_fail = Lit::UNDEF;
    }
}
