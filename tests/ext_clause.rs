//! Conformance tests for the clause-as-extra-constraint implementations.
//!
//! Clauses are the one constraint with a trusted native implementation, so
//! every behavior of the extra-constraint machinery can be cross-checked
//! against ordinary clause solving.

extern crate extsat;

use extsat::{BasicSolver, ExtClause, LazyExtClause, Solver, SolverOpts};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn mk_solver() -> BasicSolver {
    Solver::new(SolverOpts::default(), Default::default())
}

fn add_clause_constraint(solver: &mut BasicSolver, clause: &[i32], lazy: bool) -> bool {
    if lazy {
        solver.add_extra(Box::new(LazyExtClause::new(clause.to_vec())))
    } else {
        solver.add_extra(Box::new(ExtClause::new(clause.to_vec())))
    }
}

fn run_check(clauses: &[Vec<i32>], is_sat: bool) {
    for &use_lazy in &[false, true] {
        let mut solver = mk_solver();

        for clause in clauses {
            add_clause_constraint(&mut solver, clause, use_lazy);
        }

        let res = solver.solve();
        if is_sat {
            assert_eq!(res, 10, "expected sat (lazy: {})", use_lazy);

            for clause in clauses {
                let satisfied = clause.iter().any(|&lit| solver.ext_val(lit) == lit);
                assert!(
                    satisfied,
                    "model does not satisfy {:?} (lazy: {})",
                    clause, use_lazy
                );
            }
        } else {
            assert_eq!(res, 20, "expected unsat (lazy: {})", use_lazy);
        }
    }
}

/// Incrementally add the same random clauses to a native solver and to two
/// extra-constraint solvers; all three must agree after every addition.
fn compare_large_sat(seed: u64, nvar: i32) {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut solver = mk_solver();
    let mut ext_solver = mk_solver();
    let mut lazy_ext_solver = mk_solver();

    loop {
        let clause_size = rng.gen_range(2..=5);
        let mut vars: Vec<i32> = vec![];
        while vars.len() < clause_size {
            let v = rng.gen_range(1..=nvar);
            if !vars.contains(&v) {
                vars.push(v);
            }
        }
        vars.sort_unstable();

        let clause: Vec<i32> = vars
            .iter()
            .map(|&v| if rng.gen_bool(0.5) { v } else { -v })
            .collect();

        solver.add_ext_clause(&clause);
        let res_solver = solver.solve();
        assert!(res_solver == 10 || res_solver == 20);

        add_clause_constraint(&mut ext_solver, &clause, false);
        let res_ext_solver = ext_solver.solve();
        assert_eq!(
            res_solver, res_ext_solver,
            "eager diverges (seed {}, nvar {})",
            seed, nvar
        );

        add_clause_constraint(&mut lazy_ext_solver, &clause, true);
        let res_lazy_ext_solver = lazy_ext_solver.solve();
        assert_eq!(
            res_solver, res_lazy_ext_solver,
            "lazy diverges (seed {}, nvar {})",
            seed, nvar
        );

        if res_solver == 20 {
            break;
        }
    }
}

#[test]
fn propagate_on_init() {
    for &use_lazy in &[false, true] {
        {
            let mut solver = mk_solver();

            solver.add_ext_clause(&[1]);
            solver.add_ext_clause(&[2]);

            // falsified by the root assignment as soon as it is added
            add_clause_constraint(&mut solver, &[-1, -2], use_lazy);

            assert_eq!(solver.solve(), 20);
        }

        {
            let mut solver = mk_solver();

            solver.add_ext_clause(&[1]);
            solver.add_ext_clause(&[2]);

            add_clause_constraint(&mut solver, &[-1, -2, -3], use_lazy);

            assert_eq!(solver.solve(), 10);
            assert!(solver.ext_val(3) < 0, "3 must be forced false on init");
        }
    }
}

#[test]
fn small_instances() {
    run_check(&[vec![1, 2], vec![1, -2], vec![-1, 2]], true);

    run_check(
        &[
            vec![4, 1],
            vec![-4, -1],
            vec![2, 3],
            vec![-2, -3],
            vec![1, 2],
            vec![-1, -2],
            vec![3, 4],
            vec![-3, -4],
        ],
        true,
    );

    run_check(
        &[
            vec![4, 5],
            vec![-4, -5],
            vec![2, 3],
            vec![-2, -3],
            vec![1, 2],
            vec![-1, -2],
            vec![3, 4],
            vec![-3, -4],
            vec![5, 1],
            vec![-5, -1],
        ],
        false,
    );
}

#[test]
fn fixed_3sat_instance() {
    let mut instance_3sat: Vec<Vec<i32>> = vec![
        vec![10, -2, 9],
        vec![10, -9, -8],
        vec![-4, -2, -6],
        vec![-6, -5, 8],
        vec![-9, 2, 7],
        vec![5, -9, 4],
        vec![-6, -4, 8],
        vec![-10, -7, -8],
        vec![-2, 3, 1],
        vec![3, -8, -1],
        vec![7, -2, -5],
        vec![1, -7, 4],
        vec![3, 8, -2],
        vec![-1, -9, 6],
        vec![-4, 5, 8],
        vec![2, -8, -5],
        vec![-5, -3, 8],
        vec![-7, -1, -10],
        vec![-8, 1, 7],
        vec![-9, -2, -7],
        vec![-2, -8, -6],
        vec![10, -3, 2],
        vec![-1, 8, -3],
        vec![-4, -8, 7],
        vec![8, -4, 7],
        vec![2, 9, -8],
        vec![-1, -10, -8],
        vec![6, 10, -1],
        vec![-4, -6, 10],
        vec![9, 2, 1],
        vec![4, -3, 1],
        vec![-3, -6, 9],
        vec![10, -7, 8],
        vec![-10, -9, -5],
        vec![-2, -7, -10],
        vec![-8, 5, -7],
        vec![8, -5, -1],
        vec![5, 6, 9],
        vec![1, -3, 6],
        vec![-5, 8, 6],
        vec![-9, 5, -6],
        vec![6, 5, -8],
        vec![9, 2, -4],
        vec![-6, 4, 7],
    ];

    run_check(&instance_3sat, false);

    instance_3sat.pop();
    run_check(&instance_3sat, true);
}

#[test]
fn compare_with_native_clauses() {
    for &seed in &[37, 42, 100] {
        for &nvar in &[20, 50, 100, 200] {
            compare_large_sat(seed, nvar);
        }
    }
}
