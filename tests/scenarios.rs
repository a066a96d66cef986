use dpam::algorithms::{fit, run_build, Build, BuildPhase, MedoidState, Swap, SwapPhase};
use dpam::group::{LocalComm, SoloComm, WorkerPool};
use dpam::measure::matrix::DissimilarityMatrix;

fn line() -> DissimilarityMatrix<f64> {
    DissimilarityMatrix::from_vectors(&[0.0, 1.0, 2.0, 10.0], 1).unwrap()
}

#[test]
fn four_points_two_medoids() {
    let d = line();

    let built = run_build(&d, 2, &SoloComm).unwrap();
    assert_eq!(built.medoids(), &[1, 3]);
    assert_eq!(built.total_cost(), 2.0);

    let outcome = fit(&d, 2, 0, &SoloComm).unwrap();
    assert_eq!(outcome.medoids, vec![1, 3]);
    assert_eq!(outcome.cost, 2.0);
    assert_eq!(outcome.iterations, 0);
    assert_eq!(outcome.phase, SwapPhase::Converged);
}

#[test]
fn four_points_in_every_group_size() {
    let d = line();

    // Groups larger than the candidate list leave some ranks with nothing to scan.
    for p in 1..=6 {
        let group = WorkerPool::new(6).split(p).unwrap();
        let outcomes = group
            .run(|comm: &LocalComm<f64>| fit(&d, 2, 0, comm))
            .unwrap();

        assert_eq!(outcomes.len(), p);
        for outcome in outcomes {
            assert_eq!(outcome.medoids, vec![1, 3], "p = {}", p);
            assert_eq!(outcome.cost, 2.0);
            assert_eq!(outcome.phase, SwapPhase::Converged);
        }
    }
}

#[test]
fn cost_never_increases() {
    let values: Vec<f64> = (0..30)
        .flat_map(|i| {
            let angle = i as f64 * 0.7;
            vec![angle.cos() * (i % 5) as f64, angle.sin() * (i % 3) as f64]
        })
        .collect();
    let d = DissimilarityMatrix::from_vectors(&values, 2).unwrap();

    let mut build = Build::new(&d, 5).unwrap();
    let mut previous = build.state().total_cost();
    while build.step(&d, &SoloComm).unwrap().is_some() {
        let cost = build.state().total_cost();
        assert!(cost <= previous);
        previous = cost;
    }
    assert_eq!(build.phase(), BuildPhase::Built);

    // Start the swap from a deliberately poor medoid set so it has work to do.
    let poor = MedoidState::from_medoids(&d, &[0, 1, 2, 3, 4]).unwrap();
    let mut swap = Swap::new(&d, poor, 0);
    let mut previous = swap.cost();
    loop {
        let phase = swap.step(&d, &SoloComm).unwrap();
        assert!(swap.cost() < previous || phase == SwapPhase::Converged);
        if phase == SwapPhase::Converged {
            break;
        }
        previous = swap.cost();
    }
    assert!(swap.iterations() > 0);

    let mut medoids = swap.state().medoids().to_vec();
    medoids.sort();
    medoids.dedup();
    assert_eq!(medoids.len(), 5);
}

#[test]
fn parallel_swap_matches_solo_from_same_start() {
    let values: Vec<f64> = (0..40).map(|i| ((i * 37) % 23) as f64).collect();
    let d = DissimilarityMatrix::from_vectors(&values, 1).unwrap();
    let start = [0, 1, 2];

    let solo = Swap::new(&d, MedoidState::from_medoids(&d, &start).unwrap(), 0);
    let solo = run_to_end(solo, &d);

    let group = WorkerPool::new(3).split(3).unwrap();
    let outcomes = group
        .run(|comm: &LocalComm<f64>| {
            let state = MedoidState::from_medoids(&d, &start)?;
            dpam::algorithms::run_swap(&d, state, 0, comm)
        })
        .unwrap();

    for outcome in outcomes {
        assert_eq!(outcome.medoids, solo.0);
        assert_eq!(outcome.cost.to_bits(), solo.1.to_bits());
    }
}

fn run_to_end(mut swap: Swap<f64>, d: &DissimilarityMatrix<f64>) -> (Vec<usize>, f64) {
    while !swap.step(d, &SoloComm).unwrap().is_terminal() {}
    (swap.state().medoids().to_vec(), swap.cost())
}
