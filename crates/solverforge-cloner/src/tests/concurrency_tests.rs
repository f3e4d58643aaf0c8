use std::sync::Arc;

use rayon::prelude::*;
use solverforge_test::chained::{build_chain, chained_descriptor, chained_model};

use super::*;

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_cloner_is_send_and_sync() {
    assert_send_sync::<SolutionCloner>();
    assert_send_sync::<ObjectRef>();
}

#[test]
fn test_concurrent_clones_of_same_original() {
    let model = chained_model().unwrap();
    let cloner = cloner_for(chained_descriptor(model.clone()).unwrap());
    let solution = build_chain(&model, 200).unwrap();

    let clones = (0..8)
        .into_par_iter()
        .map(|_| cloner.clone_solution(&solution))
        .collect::<solverforge_core::Result<Vec<_>>>()
        .unwrap();

    let originals = objects(&field(&model, &solution, "customers"));
    for (i, clone) in clones.iter().enumerate() {
        let customers = objects(&field(&model, clone, "customers"));
        assert_eq!(customers.len(), originals.len());
        assert!(!Arc::ptr_eq(&customers[0], &originals[0]));
        assert!(Arc::ptr_eq(
            &object_field(&model, &customers[1], "previous"),
            &customers[0]
        ));
        for other in &clones[i + 1..] {
            let other_customers = objects(&field(&model, other, "customers"));
            assert!(!Arc::ptr_eq(&customers[0], &other_customers[0]));
        }
    }
}

#[test]
fn test_shared_cloner_across_threads() {
    let model = chained_model().unwrap();
    let cloner = cloner_for(chained_descriptor(model.clone()).unwrap());
    let solution = build_chain(&model, 50).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cloner = cloner.clone();
            let solution = solution.clone();
            std::thread::spawn(move || {
                cloner
                    .clone_solution(&solution)
                    .map(|clone| clone.class_name().to_string())
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), "ChainSolution");
    }
}
