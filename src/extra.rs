use crate::clause::Lit;
use crate::core::ConstraintArg;

/// Index of an extra constraint owned by the solver.
///
/// Watch lists and reason records refer to constraints through this index,
/// so no constraint ever holds a pointer back into the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CstrRef(u32);

impl CstrRef {
    #[inline(always)]
    pub(crate) fn from_idx(idx: u32) -> Self {
        CstrRef(idx)
    }
    #[inline(always)]
    pub fn idx(&self) -> u32 {
        self.0
    }
}

/// A non-clausal ("extra") constraint, as suggested for constraint types
/// beyond clauses in the MiniSat paper [Een, Sorensson, 2004].
///
/// Conceptually, an extra constraint can be seen as a collection of
/// (typically far too many) clauses. Any literal appearing in these virtual
/// clauses is "related" and must be declared with
/// [`ConstraintArg::require_extra_watch`] during [`initialize`].
///
/// The solver drives a constraint through four entry points, always passing
/// a borrowed engine handle:
///
/// - [`initialize`] once, at decision level 0, when the constraint is added;
/// - [`propagate`] once per trail assignment of a watched literal;
/// - [`undo`] once per retracted assignment, strictly LIFO with respect to
///   the matching `propagate` calls;
/// - [`calc_reason`] during conflict analysis, to justify a propagation or
///   the most recent conflict.
///
/// [`initialize`]: ExtraConstraint::initialize
/// [`propagate`]: ExtraConstraint::propagate
/// [`undo`]: ExtraConstraint::undo
/// [`calc_reason`]: ExtraConstraint::calc_reason
pub trait ExtraConstraint {
    /// Hook up the constraint with the solver. This method should:
    ///
    /// - translate its external literals with [`ConstraintArg::internalize`],
    /// - declare every literal it must observe with
    ///   [`ConstraintArg::require_extra_watch`] (which also freezes the
    ///   literal so no preprocessing may eliminate it),
    /// - absorb the already-assigned part of the trail, running the
    ///   equivalent of [`propagate`](ExtraConstraint::propagate) for it,
    ///
    /// and return `false` iff the current assignment already falsifies the
    /// constraint.
    ///
    /// A constraint whose propagation can be triggered by either assignment
    /// of a variable must watch both polarities of its literal; a one-sided
    /// propagator (like a clause) only needs the falsifying polarity.
    fn initialize(&mut self, solver: &mut ConstraintArg) -> bool;

    /// The solver has just assigned the watched literal `p` (so
    /// `solver.val(p)` is true). Update internal state, force implied
    /// literals with [`ConstraintArg::search_assign_ext`] (checking first
    /// that they are unassigned), and return `false` on conflict.
    ///
    /// A `false` return obliges the constraint to answer a subsequent
    /// `calc_reason(solver, Lit::UNDEF, ..)` call for this conflict.
    fn propagate(&mut self, solver: &mut ConstraintArg, p: Lit) -> bool;

    /// Compute the reason why the literal `p` was derived: a set of
    /// literals, all currently true, whose conjunction forces `p` under
    /// this constraint. With `p == Lit::UNDEF` the reason justifies the
    /// conflict reported by the last failed `propagate` instead, and the
    /// conjunction is contradictory under this constraint.
    fn calc_reason(&mut self, solver: &mut ConstraintArg, p: Lit, out: &mut Vec<Lit>);

    /// Called just before the solver retracts the assignment of `p`.
    /// Reverse exactly the state changes made by the matching
    /// `propagate(solver, p)` call. Literals the constraint forced in
    /// response are retracted by the solver through their own `undo` calls.
    fn undo(&mut self, solver: &mut ConstraintArg, p: Lit);
}
