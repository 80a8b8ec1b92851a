/*****************************************************************************************[lib.rs]
Copyright (c) 2003-2006, Niklas Een, Niklas Sorensson (MiniSat)
Copyright (c) 2007-2010, Niklas Sorensson (MiniSat)

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the "Software"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute,
sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or
substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT
OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
**************************************************************************************************/

//! A CDCL SAT solver in the MiniSat lineage, extended with support for
//! non-clausal ("extra") constraints.
//!
//! Extra constraints implement [`ExtraConstraint`] and are added through
//! [`Solver::add_extra`]. The solver notifies them of assignments to their
//! watched literals, lets them force further literals, asks them for reasons
//! during conflict analysis, and unwinds them on backtracking. Two constraint
//! implementations ship with the crate: clauses re-expressed through the
//! protocol ([`ExtClause`], [`LazyExtClause`]), used to validate the
//! machinery against native clauses, and [`SubgraphConnectivity`], which
//! forces the subgraph induced by the true literals of a vertex set to stay
//! connected.

//======== LOG ============

// stubs when logging is not enabled
#[cfg(not(feature = "logging"))]
#[macro_use]
pub(crate) mod log {
    macro_rules! trace {
        ($( $x:expr ),*) => {};
    }
    macro_rules! debug {
        ($( $x:expr ),*) => {};
    }
    macro_rules! info {
        ($( $x:expr ),*) => {};
    }
}

#[cfg(feature = "logging")]
#[macro_use]
pub extern crate log;

//======== PUBLIC INTERFACE ============

pub mod callbacks;
pub mod clause;
pub mod connectivity;
pub mod core;
pub mod ext_clause;
pub mod extra;
pub mod interface;
pub mod intmap;

pub use crate::{
    callbacks::{Basic as BasicCallbacks, Callbacks, ProgressStatus, Stats as StatsCallbacks},
    clause::{lbool, Kind as ClauseKind, LMap, LSet, Lit, VMap, Var},
    connectivity::SubgraphConnectivity,
    core::{ConstraintArg, Solver, SolverOpts},
    ext_clause::{ExtClause, LazyExtClause},
    extra::{CstrRef, ExtraConstraint},
    interface::SolverInterface,
};

/// Basic solver with basic callbacks
pub type BasicSolver = Solver<BasicCallbacks>;
