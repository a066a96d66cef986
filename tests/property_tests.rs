use dpam::algorithms::{fit, run_build, run_swap};
use dpam::group::{LocalComm, SoloComm, WorkerPool};
use dpam::measure::{matrix::DissimilarityMatrix, Measurable};
use proptest::prelude::*;

fn points_and_k() -> impl Strategy<Value = (Vec<f64>, usize, usize)> {
    (1usize..4, 1usize..20).prop_flat_map(|(dim, n)| {
        (
            prop::collection::vec(-10.0f64..10.0, n * dim),
            Just(dim),
            1..=n,
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_matrix_symmetric_zero_diagonal(
        (values, dim, _k) in points_and_k()
    ) {
        let d = DissimilarityMatrix::from_vectors(&values, dim).unwrap();
        prop_assert!(d.is_symmetric());
        for i in 0..d.num_elements() {
            prop_assert_eq!(d.measure(i, i), 0.0);
            for j in 0..d.num_elements() {
                prop_assert!(d.measure(i, j) >= 0.0);
            }
        }
    }

    #[test]
    fn prop_k_distinct_medoids_and_swap_no_worse(
        (values, dim, k) in points_and_k()
    ) {
        let d = DissimilarityMatrix::from_vectors(&values, dim).unwrap();
        let n = d.num_elements();

        let built = run_build(&d, k, &SoloComm).unwrap();
        let build_cost = built.total_cost();
        let outcome = run_swap(&d, built, 0, &SoloComm).unwrap();

        let mut medoids = outcome.medoids.clone();
        medoids.sort();
        medoids.dedup();
        prop_assert_eq!(medoids.len(), k);
        prop_assert!(medoids.iter().all(|&m| m < n));
        prop_assert!(outcome.cost <= build_cost);
    }

    #[test]
    fn prop_result_independent_of_group_size(
        (values, dim, k) in points_and_k(),
        p in 2usize..5
    ) {
        let d = DissimilarityMatrix::from_vectors(&values, dim).unwrap();
        let solo = fit(&d, k, 0, &SoloComm).unwrap();

        let group = WorkerPool::new(p).split(p).unwrap();
        let outcomes = group
            .run(|comm: &LocalComm<f64>| fit(&d, k, 0, comm))
            .unwrap();

        for outcome in outcomes {
            prop_assert_eq!(&outcome.medoids, &solo.medoids);
            prop_assert_eq!(outcome.cost.to_bits(), solo.cost.to_bits());
            prop_assert_eq!(outcome.iterations, solo.iterations);
        }
    }
}
