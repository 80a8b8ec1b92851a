//! Subgraph connectivity as an extra constraint.
//!
//! The constraint is built over a fixed vertex set, each vertex identified
//! with an external literal, and a fixed edge set. A vertex is part of the
//! induced subgraph iff its literal is true; the constraint forces this
//! induced subgraph to be connected (the empty subgraph counts as
//! connected).
//!
//! Propagation recomputes a DFS forest of the non-excluded vertices on every
//! call and derives two kinds of consequences: vertices outside the unique
//! component holding the current "in" vertices can never join it and are
//! forced out, and articulation vertices separating two "in" vertices are
//! forced in. Reasons are reconstructed on demand with a reversible
//! union-find, dropping every assignment that is not needed for the
//! inference.

use crate::clause::{lbool, Lit, Var};
use crate::core::ConstraintArg;
use crate::extra::ExtraConstraint;

/// One reverted write in the [`RevUnionFind`] redo log.
#[derive(Debug, Clone, Copy)]
enum UndoRec {
    Parent { at: usize, old: i32 },
    ActiveCount { at: usize, old: i32 },
    ActiveClusters { old: i32 },
}

/// Union-find whose every mutation is journaled, so the state can be rolled
/// back to the last commit point.
///
/// Weighted union by size; roots store the negated size of their cluster.
/// There is no path compression: compression writes would bloat the redo
/// log, while the trees stay shallow enough under union by size.
struct RevUnionFind {
    parent: Vec<i32>,
    n_active: Vec<i32>, // per root, how many active vertices in the cluster
    n_active_clusters: i32,
    redo: Vec<UndoRec>,
}

impl RevUnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: vec![-1; n],
            n_active: vec![0; n],
            n_active_clusters: 0,
            redo: vec![],
        }
    }

    fn root(&self, mut p: usize) -> usize {
        while self.parent[p] >= 0 {
            p = self.parent[p] as usize;
        }
        p
    }

    /// Number of clusters containing at least one active vertex.
    fn num_active_clusters(&self) -> i32 {
        self.n_active_clusters
    }

    fn merge(&mut self, p: usize, q: usize) {
        let mut p = self.root(p);
        let mut q = self.root(q);
        if p == q {
            return;
        }
        // the root with the larger cluster (more negative parent) survives
        if self.parent[p] > self.parent[q] {
            std::mem::swap(&mut p, &mut q);
        }

        self.update_parent(p, self.parent[p] + self.parent[q]);
        self.update_parent(q, p as i32);

        let mut nac = self.n_active_clusters;
        nac -= (self.n_active[p] > 0) as i32;
        nac -= (self.n_active[q] > 0) as i32;
        nac += (self.n_active[p] + self.n_active[q] > 0) as i32;
        self.update_n_active(p, self.n_active[p] + self.n_active[q]);
        self.update_n_active(q, 0);
        self.update_n_active_clusters(nac);
    }

    fn add_active_count(&mut self, p: usize, d: i32) {
        let p = self.root(p);
        let mut nac = self.n_active_clusters;
        nac -= (self.n_active[p] > 0) as i32;
        self.update_n_active(p, self.n_active[p] + d);
        nac += (self.n_active[p] > 0) as i32;
        self.update_n_active_clusters(nac);
    }

    /// Discard the log; the current state becomes the rollback target.
    fn commit(&mut self) {
        self.redo.clear();
    }

    /// Restore the state at the last commit point.
    fn rollback(&mut self) {
        while let Some(rec) = self.redo.pop() {
            match rec {
                UndoRec::Parent { at, old } => self.parent[at] = old,
                UndoRec::ActiveCount { at, old } => self.n_active[at] = old,
                UndoRec::ActiveClusters { old } => self.n_active_clusters = old,
            }
        }
    }

    fn update_parent(&mut self, p: usize, v: i32) {
        if self.parent[p] == v {
            return;
        }
        self.redo.push(UndoRec::Parent {
            at: p,
            old: self.parent[p],
        });
        self.parent[p] = v;
    }

    fn update_n_active(&mut self, p: usize, v: i32) {
        if self.n_active[p] == v {
            return;
        }
        self.redo.push(UndoRec::ActiveCount {
            at: p,
            old: self.n_active[p],
        });
        self.n_active[p] = v;
    }

    fn update_n_active_clusters(&mut self, v: i32) {
        if self.n_active_clusters == v {
            return;
        }
        self.redo.push(UndoRec::ActiveClusters {
            old: self.n_active_clusters,
        });
        self.n_active_clusters = v;
    }
}

/// Vertex state, mirroring the assignment of the vertex's literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Undecided,
    Active,
    Inactive,
}

/// Why the last `propagate` failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConflictCause {
    /// No conflict recorded
    None,
    /// Two components already hold active vertices
    Disconnected,
    /// Vertex `pos` had to take one value but was found assigned `lit`,
    /// the opposite, before that assignment reached us
    Forced { pos: usize, lit: Lit },
}

const UNVISITED: i32 = -1;

/// Forces the subgraph induced by the true vertex literals to be connected.
pub struct SubgraphConnectivity {
    elits: Vec<i32>,
    lits: Vec<Lit>,
    var_to_idx: Vec<(Var, usize)>, // sorted, for equal-range lookup
    adj: Vec<Vec<usize>>,

    state: Vec<NodeState>,
    /// Vertices in the order their assignments entered the trail; popped
    /// strictly LIFO by `undo`, walked newest-first by `calc_reason`.
    decision_order: Vec<usize>,
    n_active_vertices: i32,
    conflict: ConflictCause,

    // DFS forest, rebuilt by each propagate call
    rank: Vec<i32>,
    lowlink: Vec<i32>,
    parent: Vec<i32>,
    subtree_active: Vec<i32>,
    cluster_id: Vec<i32>,
    dfs_stack: Vec<(usize, usize)>,
    next_rank: i32,
}

impl SubgraphConnectivity {
    /// Build the constraint from one external literal per vertex and
    /// index-based edges. Duplicate edges are tolerated; self-loops are
    /// meaningless but harmless.
    pub fn new(elits: Vec<i32>, edges: &[(usize, usize)]) -> Self {
        let n = elits.len();
        let mut adj = vec![Vec::new(); n];
        for &(u, v) in edges {
            adj[u].push(v);
            adj[v].push(u);
        }
        Self {
            elits,
            lits: vec![],
            var_to_idx: vec![],
            adj,
            state: vec![NodeState::Undecided; n],
            decision_order: vec![],
            n_active_vertices: 0,
            conflict: ConflictCause::None,
            rank: vec![0; n],
            lowlink: vec![0; n],
            parent: vec![0; n],
            subtree_active: vec![0; n],
            cluster_id: vec![0; n],
            dfs_stack: vec![],
            next_rank: 0,
        }
    }

    /// DFS from `root`, filling rank, lowlink, parent, cluster id and
    /// per-subtree active counts for its whole component. Iterative, so deep
    /// graphs cannot overflow the call stack.
    fn build_tree(&mut self, root: usize) {
        let cid = root as i32;
        self.rank[root] = self.next_rank;
        self.next_rank += 1;
        self.lowlink[root] = self.rank[root];
        self.cluster_id[root] = cid;
        self.parent[root] = -1;
        self.subtree_active[root] = (self.state[root] == NodeState::Active) as i32;

        debug_assert!(self.dfs_stack.is_empty());
        self.dfs_stack.push((root, 0));
        while let Some(&(v, e)) = self.dfs_stack.last() {
            if e < self.adj[v].len() {
                self.dfs_stack.last_mut().unwrap().1 = e + 1;
                let w = self.adj[v][e];
                if w as i32 == self.parent[v] || self.state[w] == NodeState::Inactive {
                    continue;
                }
                if self.rank[w] == UNVISITED {
                    self.rank[w] = self.next_rank;
                    self.next_rank += 1;
                    self.lowlink[w] = self.rank[w];
                    self.cluster_id[w] = cid;
                    self.parent[w] = v as i32;
                    self.subtree_active[w] = (self.state[w] == NodeState::Active) as i32;
                    self.dfs_stack.push((w, 0));
                } else if self.rank[w] < self.lowlink[v] {
                    self.lowlink[v] = self.rank[w];
                }
            } else {
                self.dfs_stack.pop();
                if let Some(&(u, _)) = self.dfs_stack.last() {
                    if self.lowlink[v] < self.lowlink[u] {
                        self.lowlink[u] = self.lowlink[v];
                    }
                    self.subtree_active[u] += self.subtree_active[v];
                }
            }
        }
    }
}

impl ExtraConstraint for SubgraphConnectivity {
    fn initialize(&mut self, solver: &mut ConstraintArg) -> bool {
        for i in 0..self.elits.len() {
            let lit = solver.internalize(self.elits[i]);
            self.lits.push(lit);
        }

        for (i, &lit) in self.lits.iter().enumerate() {
            self.var_to_idx.push((solver.vidx(lit), i));
        }
        self.var_to_idx.sort_unstable();

        // seed from the current root assignment
        for i in 0..self.lits.len() {
            let val = solver.val(self.lits[i]);
            if val != lbool::UNDEF {
                self.decision_order.push(i);
            }
            if val == lbool::TRUE {
                self.state[i] = NodeState::Active;
            } else if val == lbool::FALSE {
                self.state[i] = NodeState::Inactive;
            }
        }

        // both polarities can trigger propagation
        let mut watch = Vec::with_capacity(self.lits.len() * 2);
        for &l in &self.lits {
            watch.push(l);
            watch.push(!l);
        }
        watch.sort_unstable();
        watch.dedup();
        for &l in &watch {
            solver.require_extra_watch(l);
        }

        // replay the seeded assignments through `propagate`; this absorbs
        // each of them a second time, which is harmless (level-0 entries are
        // never undone) and keeps the initial inferences complete
        let mut prop_list: Vec<Lit> = vec![];
        for i in 0..self.lits.len() {
            match self.state[i] {
                NodeState::Active => prop_list.push(self.lits[i]),
                NodeState::Inactive => prop_list.push(!self.lits[i]),
                NodeState::Undecided => {}
            }
        }
        prop_list.sort_unstable();
        prop_list.dedup();
        for l in prop_list {
            if !self.propagate(solver, l) {
                return false;
            }
        }
        true
    }

    fn propagate(&mut self, solver: &mut ConstraintArg, p: Lit) -> bool {
        let n = self.lits.len();

        // absorb the assignment of every vertex sharing `p`'s variable
        let pv = solver.vidx(p);
        let start = self.var_to_idx.partition_point(|&(v, _)| v < pv);
        for k in start..self.var_to_idx.len() {
            let (v, i) = self.var_to_idx[k];
            if v != pv {
                break;
            }
            let val = solver.val(self.lits[i]);
            if val == lbool::TRUE {
                self.state[i] = NodeState::Active;
                self.n_active_vertices += 1;
            } else if val == lbool::FALSE {
                self.state[i] = NodeState::Inactive;
            } else {
                unreachable!("watched literal {:?} unassigned in propagate", p);
            }
            // `state[i]` may already be recorded here when we are replaying
            // the seeded root assignment from `initialize`
            self.decision_order.push(i);
        }

        if self.n_active_vertices == 0 {
            return true;
        }

        // rebuild the DFS forest over the non-inactive vertices
        for x in self.rank.iter_mut() {
            *x = UNVISITED;
        }
        for x in self.lowlink.iter_mut() {
            *x = UNVISITED;
        }
        for x in self.parent.iter_mut() {
            *x = -1;
        }
        for x in self.subtree_active.iter_mut() {
            *x = 0;
        }
        for x in self.cluster_id.iter_mut() {
            *x = -1;
        }
        self.next_rank = 0;

        let mut nonempty_cluster: i32 = -1;
        let mut n_empty_clusters = 0;
        for i in 0..n {
            if self.state[i] != NodeState::Inactive && self.rank[i] == UNVISITED {
                self.build_tree(i);
                if self.subtree_active[i] >= 1 {
                    if nonempty_cluster != -1 {
                        // two components with active vertices
                        self.conflict = ConflictCause::Disconnected;
                        return false;
                    }
                    nonempty_cluster = i as i32;
                } else {
                    n_empty_clusters += 1;
                }
            }
        }

        if self.n_active_vertices <= 1 && n_empty_clusters == 0 {
            return true;
        }

        debug_assert!(nonempty_cluster >= 0);
        let c_star = nonempty_cluster as usize;

        for v in 0..n {
            if self.state[v] != NodeState::Undecided {
                continue;
            }

            if self.cluster_id[v] != c_star as i32 {
                // vertices outside the one component holding actives can
                // never reconnect to it: force them out
                let lv = self.lits[v];
                let val = solver.val(lv);
                if val == lbool::FALSE {
                    // already out, nothing to do
                } else if val == lbool::UNDEF {
                    solver.search_assign_ext(!lv);
                } else {
                    self.conflict = ConflictCause::Forced { pos: v, lit: lv };
                    return false;
                }
            } else {
                if self.n_active_vertices <= 1 {
                    continue;
                }
                // would removing `v` separate two active vertices? Count the
                // sides of the split at `v` that hold at least one active.
                // Children reconnectable above `v` belong to the parent side.
                let mut parent_side = self.subtree_active[c_star] - self.subtree_active[v];
                let mut n_nonempty_sides = 0;
                for &w in &self.adj[v] {
                    if self.rank[v] < self.rank[w] && self.parent[w] == v as i32 {
                        // `w` is a DFS child of `v`
                        if self.lowlink[w] < self.rank[v] {
                            // `w` stays attached to `v`'s parent side even
                            // without `v`
                            parent_side += self.subtree_active[w];
                        } else if self.subtree_active[w] > 0 {
                            n_nonempty_sides += 1;
                        }
                    }
                }
                if parent_side > 0 {
                    n_nonempty_sides += 1;
                }
                if n_nonempty_sides >= 2 {
                    // `v` is a mandatory articulation vertex
                    let lv = self.lits[v];
                    let val = solver.val(lv);
                    if val == lbool::TRUE {
                        // already in, nothing to do
                    } else if val == lbool::UNDEF {
                        solver.search_assign_ext(lv);
                    } else {
                        self.conflict = ConflictCause::Forced { pos: v, lit: !lv };
                        return false;
                    }
                }
            }
        }
        true
    }

    fn calc_reason(&mut self, solver: &mut ConstraintArg, p: Lit, out: &mut Vec<Lit>) {
        let n = self.lits.len();

        // A conflict caused by a not-yet-delivered opposite assignment is
        // absorbed for the duration of this computation and taken back at
        // the end.
        let witness = if p == Lit::UNDEF {
            match self.conflict {
                ConflictCause::None => panic!("calc_reason without a recorded conflict"),
                ConflictCause::Disconnected => None,
                ConflictCause::Forced { pos, lit } => {
                    self.decision_order.push(pos);
                    self.state[pos] = if lit == self.lits[pos] {
                        NodeState::Active
                    } else {
                        NodeState::Inactive
                    };
                    Some(pos)
                }
            }
        } else {
            None
        };

        // The assignment being explained is factored out: vertices of its
        // variable count as undecided, and the explained literal itself must
        // not end up in its own reason.
        let pvar = if p == Lit::UNDEF { None } else { Some(p.var()) };

        let mut uf = RevUnionFind::new(n);
        let mut activated = vec![false; n];
        for i in 0..n {
            let st = if pvar == Some(self.lits[i].var()) {
                NodeState::Undecided
            } else {
                self.state[i]
            };
            if st == NodeState::Active {
                uf.add_active_count(i, 1);
            }
            if st != NodeState::Inactive && p != self.lits[i] {
                activated[i] = true;
            }
        }
        for v in 0..n {
            if !activated[v] {
                continue;
            }
            for &w in &self.adj[v] {
                if activated[w] {
                    uf.merge(v, w);
                }
            }
        }
        if p != Lit::UNDEF {
            // explaining a forced inactivation: if the vertex were active
            // after all, its cluster would stay separated from the actives
            for i in 0..n {
                if self.lits[i] == !p {
                    uf.add_active_count(i, 1);
                }
            }
        }
        uf.commit();
        assert!(
            uf.num_active_clusters() >= 2,
            "nothing to explain: the active vertices are not separated"
        );

        out.clear();

        // Walk the recorded assignments newest to oldest. Re-admitting one
        // means clearing its active mark and re-adding the vertex to the
        // graph; if the actives stay separated the assignment is not needed
        // for the inference, otherwise it goes into the reason. Newest-first
        // traversal biases the reason toward older, lower-level literals.
        for k in (0..self.decision_order.len()).rev() {
            let v = self.decision_order[k];
            if pvar == Some(self.lits[v].var()) {
                // the assignment being explained cannot justify itself
                continue;
            }

            if self.state[v] == NodeState::Active {
                uf.add_active_count(v, -1);
            }
            for &w in &self.adj[v] {
                if activated[w] {
                    uf.merge(v, w);
                }
            }

            if uf.num_active_clusters() >= 2 {
                uf.commit();
                activated[v] = true;
            } else {
                uf.rollback();
                match self.state[v] {
                    NodeState::Active => out.push(self.lits[v]),
                    NodeState::Inactive => out.push(!self.lits[v]),
                    NodeState::Undecided => unreachable!("unassigned vertex in decision order"),
                }
            }
        }

        if let Some(pos) = witness {
            let popped = self.decision_order.pop();
            debug_assert_eq!(popped, Some(pos));
            self.state[pos] = NodeState::Undecided;
        }

        debug_assert!(out.iter().all(|&l| solver.val_analyze(l) == lbool::TRUE));
    }

    fn undo(&mut self, solver: &mut ConstraintArg, p: Lit) {
        let pv = solver.vidx(p);
        let start = self.var_to_idx.partition_point(|&(v, _)| v < pv);
        let end = self.var_to_idx.partition_point(|&(v, _)| v <= pv);
        // the matching `propagate` pushed these vertices in forward order
        for k in (start..end).rev() {
            let (_, i) = self.var_to_idx[k];
            if self.state[i] == NodeState::Active {
                self.n_active_vertices -= 1;
            }
            self.state[i] = NodeState::Undecided;
            let popped = self.decision_order.pop();
            debug_assert_eq!(popped, Some(i));
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn union_find_counts_active_clusters() {
        let mut uf = RevUnionFind::new(4);
        assert_eq!(uf.num_active_clusters(), 0);
        uf.add_active_count(0, 1);
        uf.add_active_count(2, 1);
        assert_eq!(uf.num_active_clusters(), 2);
        uf.merge(0, 1);
        assert_eq!(uf.num_active_clusters(), 2);
        uf.merge(1, 2);
        assert_eq!(uf.num_active_clusters(), 1);
        assert_eq!(uf.root(0), uf.root(2));
    }

    #[test]
    fn union_find_rollback_restores_last_commit() {
        let mut uf = RevUnionFind::new(5);
        uf.add_active_count(0, 1);
        uf.add_active_count(4, 1);
        uf.commit();
        assert_eq!(uf.num_active_clusters(), 2);

        uf.merge(0, 1);
        uf.merge(1, 4);
        uf.add_active_count(2, 1);
        assert_eq!(uf.num_active_clusters(), 2);
        uf.rollback();

        assert_eq!(uf.num_active_clusters(), 2);
        assert_ne!(uf.root(0), uf.root(4));
        assert_ne!(uf.root(0), uf.root(1));
        assert_eq!(uf.n_active[2], 0);
    }

    #[test]
    fn union_find_rollback_after_commit_is_a_noop() {
        let mut uf = RevUnionFind::new(3);
        uf.merge(0, 1);
        uf.add_active_count(0, 1);
        uf.commit();
        let roots: Vec<usize> = (0..3).map(|i| uf.root(i)).collect();
        uf.rollback();
        assert_eq!(roots, (0..3).map(|i| uf.root(i)).collect::<Vec<_>>());
        assert_eq!(uf.num_active_clusters(), 1);
    }

    #[test]
    fn union_find_merge_by_size() {
        let mut uf = RevUnionFind::new(6);
        uf.merge(0, 1);
        uf.merge(0, 2);
        let big_root = uf.root(0);
        uf.merge(3, 4);
        uf.merge(0, 3);
        // the three-element cluster absorbs the two-element one
        assert_eq!(uf.root(3), big_root);
        assert_eq!(uf.parent[big_root], -5);
    }
}
