use std::time::Instant;

use midi_features::{BatchExtractor, FeatureConfig};

fn main() {
    env_logger::init();

    let mut config = FeatureConfig {
        retain_performances: true,
        ..Default::default()
    };
    let mut paths = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--jobs" => {
                config.threads = args
                    .next()
                    .and_then(|v| v.parse().ok())
                    .expect("--jobs requires a number");
            }
            _ => paths.push(arg),
        }
    }

    if paths.is_empty() {
        eprintln!("Usage: batch [--jobs N] <file1.mid> <file2.mid> ...");
        std::process::exit(2);
    }

    println!("Summarising {} files...", paths.len());
    let now = Instant::now();
    let report = BatchExtractor::new(config).unwrap().run(&paths);
    println!("Processed {} files in {:?}", report.processed(), now.elapsed());

    for (path, summary) in report.successes() {
        println!(
            "{}: notes={} density={:.3} used_pitch={} avg_ioi={:.4}",
            path.display(),
            summary.num_notes,
            summary.note_density,
            summary.used_pitch,
            summary.avg_ioi
        );
    }
    for (path, error) in report.failures() {
        println!("{}: FAILED ({error})", path.display());
    }

    if let Some(used) = report.used_pitch_across() {
        println!("Pitches used across all files: {used}");
    }
}
