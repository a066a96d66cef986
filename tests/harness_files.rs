use std::fs::{self, File};
use std::io::{BufReader, Write};

use dpam::group::WorkerPool;
use dpam::harness::points::{generate_points, load_points, write_points};
use dpam::harness::settings::{parse_settings, Setting};
use dpam::harness::{Benchmark, BenchmarkConfig};

#[test]
fn settings_file_has_no_spurious_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.txt");
    fs::write(&path, "100 4\n50 2\n").unwrap();

    let settings = parse_settings(BufReader::new(File::open(&path).unwrap())).unwrap();
    assert_eq!(
        settings,
        vec![Setting { n: 100, p: 4 }, Setting { n: 50, p: 2 }]
    );
}

#[test]
fn benchmark_appends_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("points.txt");
    let output = dir.path().join("results.txt");

    let values = generate_points(100, 5, 42);
    write_points(File::create(&input).unwrap(), &values, 5).unwrap();
    fs::write(&output, "previous\n").unwrap();

    let points = load_points(File::open(&input).unwrap(), 100, 5).unwrap();
    assert_eq!(points, values);

    let config = BenchmarkConfig {
        repeats: 2,
        ..BenchmarkConfig::default()
    };
    let bench = Benchmark::new(WorkerPool::new(4), &points, config);
    let settings = [Setting { n: 100, p: 4 }, Setting { n: 50, p: 2 }];

    let mut out = fs::OpenOptions::new().append(true).open(&output).unwrap();
    let written = bench.run_all(&settings, &mut out).unwrap();
    out.flush().unwrap();
    assert_eq!(written, 4);

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("previous\n"));
    assert_eq!(text.matches("n= 100 m= 5 k= 2 p= 4\n").count(), 2);
    assert_eq!(text.matches("n= 50 m= 5 k= 1 p= 2\n").count(), 2);
    assert_eq!(text.matches("buildTimeDuration= ").count(), 4);
    assert_eq!(text.matches("nano-seconds\n").count(), 12);
    assert!(text.ends_with("nano-seconds\n\n"));
}
