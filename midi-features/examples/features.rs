use std::time::Instant;

use midi_features::{
    features::PITCH_CLASSES, load, num_notes, pitch_class_histogram,
    pitch_class_transition_matrix, used_pitch, TransitionNormalization,
};

fn main() {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .expect("Usage: features <file.mid>");

    println!("Opening midi...");
    let now = Instant::now();
    let perf = load(&path).unwrap();
    println!("Loaded {} in {:?}", path, now.elapsed());

    println!("Instruments: {}", perf.instruments().len());
    println!("Length: {:.2}s", perf.end_time());
    println!("Notes: {}", num_notes(&perf));
    println!("Used pitches: {}", used_pitch(&perf));

    match midi_features::note_density(&perf, 5.0) {
        Ok(density) => println!("Note density (5s): {density:.3}"),
        Err(e) => println!("Note density: {e}"),
    }
    match midi_features::avg_ioi(&perf) {
        Ok(ioi) => println!("Average IOI: {ioi:.4}s"),
        Err(e) => println!("Average IOI: {e}"),
    }

    match pitch_class_histogram(&perf) {
        Ok(histogram) => {
            println!("Pitch class histogram:");
            for (name, value) in PITCH_CLASSES.iter().zip(histogram.iter()) {
                println!("  {name:<2} {value:.4}");
            }
        }
        Err(e) => println!("Pitch class histogram: {e}"),
    }

    let matrix = pitch_class_transition_matrix(&perf, TransitionNormalization::Row);
    println!("Pitch class transitions (row normalized):");
    println!("     {}", PITCH_CLASSES.map(|n| format!("{n:>5}")).join(""));
    for (name, row) in PITCH_CLASSES.iter().zip(matrix.iter()) {
        let cells: Vec<String> = row.iter().map(|v| format!("{v:>5.2}")).collect();
        println!("  {name:<2} {}", cells.join(""));
    }
}
