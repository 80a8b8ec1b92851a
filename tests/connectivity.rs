//! End-to-end tests for the subgraph-connectivity constraint: model counting
//! over graph families with known counts, cross-checking against brute-force
//! enumeration, and propagation triggered by the root assignment.

extern crate extsat;

use extsat::{BasicSolver, Solver, SolverOpts, SubgraphConnectivity};

fn mk_solver() -> BasicSolver {
    Solver::new(SolverOpts::default(), Default::default())
}

/// Count models over the external variables `1..=nvars`, excluding each
/// found model with a blocking clause.
fn count_sat_assignments(solver: &mut BasicSolver, nvars: i32) -> usize {
    let mut cnt = 0;

    loop {
        if solver.solve() == 20 {
            break;
        }
        cnt += 1;

        let refutation: Vec<i32> = (1..=nvars).map(|v| -solver.ext_val(v)).collect();
        assert!(refutation.iter().all(|&l| l != 0));
        solver.add_ext_clause(&refutation);
    }

    cnt
}

fn enumerate_connected_subgraphs_by_sat(n: usize, edges: &[(usize, usize)]) -> usize {
    let mut solver = mk_solver();

    let lits: Vec<i32> = (1..=n as i32).collect();
    solver.add_extra(Box::new(SubgraphConnectivity::new(lits, edges)));

    count_sat_assignments(&mut solver, n as i32)
}

fn visit(p: usize, mask: usize, adj: &[Vec<usize>], visited: &mut [bool]) {
    if visited[p] || (mask >> p) & 1 == 0 {
        return;
    }
    visited[p] = true;
    for &q in &adj[p] {
        visit(q, mask, adj, visited);
    }
}

fn enumerate_connected_subgraphs_naive(n: usize, edges: &[(usize, usize)]) -> usize {
    let mut adj = vec![Vec::new(); n];
    for &(u, v) in edges {
        adj[u].push(v);
        adj[v].push(u);
    }

    let mut ret = 0;
    for mask in 0..1usize << n {
        let mut visited = vec![false; n];
        let mut n_components = 0;
        for i in 0..n {
            if (mask >> i) & 1 == 1 && !visited[i] {
                n_components += 1;
                visit(i, mask, &adj, &mut visited);
            }
        }

        if n_components <= 1 {
            ret += 1;
        }
    }

    ret
}

fn path_edges(n: usize) -> Vec<(usize, usize)> {
    (0..n - 1).map(|i| (i, i + 1)).collect()
}

fn cycle_edges(n: usize) -> Vec<(usize, usize)> {
    let mut edges = vec![(0, n - 1)];
    edges.extend((0..n - 1).map(|i| (i, i + 1)));
    edges
}

#[test]
fn count_path_subgraphs() {
    for &n in &[1usize, 2, 5, 50] {
        // connected-or-empty subsets of a path: contiguous runs, plus one
        let expected = n * (n + 1) / 2 + 1;
        assert_eq!(
            enumerate_connected_subgraphs_by_sat(n, &path_edges(n)),
            expected,
            "path on {} vertices",
            n
        );
    }
}

#[test]
fn count_cycle_subgraphs() {
    for &n in &[1usize, 2, 5, 50] {
        let expected = n * (n - 1) + 2;
        assert_eq!(
            enumerate_connected_subgraphs_by_sat(n, &cycle_edges(n)),
            expected,
            "cycle on {} vertices",
            n
        );
    }
}

#[test]
fn count_grid_subgraphs_matches_naive() {
    // 3x3 grid
    let edges = [
        (0, 1),
        (1, 2),
        (3, 4),
        (4, 5),
        (6, 7),
        (7, 8),
        (0, 3),
        (1, 4),
        (2, 5),
        (3, 6),
        (4, 7),
        (5, 8),
    ];

    let by_sat = enumerate_connected_subgraphs_by_sat(9, &edges);
    let naive = enumerate_connected_subgraphs_naive(9, &edges);
    assert_eq!(by_sat, naive);
}

#[test]
fn articulation_forced_on_init() {
    // path 1 - 2 - 3 with both endpoints already in: the middle vertex is
    // an articulation and must be forced in
    let mut solver = mk_solver();

    solver.add_ext_clause(&[1]);
    solver.add_ext_clause(&[3]);

    solver.add_extra(Box::new(SubgraphConnectivity::new(
        vec![1, 2, 3],
        &[(0, 1), (1, 2)],
    )));

    assert_eq!(solver.solve(), 10);
    assert!(solver.ext_val(2) > 0, "vertex 2 must be forced active");
}

#[test]
fn broken_path_is_unsat() {
    let mut solver = mk_solver();

    solver.add_ext_clause(&[1]);
    solver.add_ext_clause(&[-2]);
    solver.add_ext_clause(&[3]);

    solver.add_extra(Box::new(SubgraphConnectivity::new(
        vec![1, 2, 3],
        &[(0, 1), (1, 2)],
    )));

    assert_eq!(solver.solve(), 20);
}

#[test]
fn no_edges_forces_singleton() {
    // without edges, activating one vertex forces every other vertex out
    let mut solver = mk_solver();

    solver.add_ext_clause(&[2]);
    solver.add_extra(Box::new(SubgraphConnectivity::new(vec![1, 2, 3], &[])));

    assert_eq!(solver.solve(), 10);
    assert!(solver.ext_val(1) < 0);
    assert!(solver.ext_val(3) < 0);
}

#[test]
fn empty_vertex_set_is_trivial() {
    let mut solver = mk_solver();
    solver.add_extra(Box::new(SubgraphConnectivity::new(vec![], &[])));
    solver.add_ext_clause(&[1, 2]);
    assert_eq!(solver.solve(), 10);
}

#[test]
fn duplicate_edges_and_self_loops_are_harmless() {
    let edges = [(0, 1), (0, 1), (1, 1), (1, 2)];
    let expected = 3 * 4 / 2 + 1; // same counts as the plain path on 3 vertices
    assert_eq!(enumerate_connected_subgraphs_by_sat(3, &edges), expected);
}
