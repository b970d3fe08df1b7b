#![no_main]

use libfuzzer_sys::fuzz_target;

use midi_features::{
    pitch_class_transition_matrix, used_pitch, Performance, TransitionNormalization,
};

fuzz_target!(|data: &[u8]| {
    if let Ok(perf) = Performance::from_bytes(data) {
        used_pitch(&perf);
        pitch_class_transition_matrix(&perf, TransitionNormalization::Total);
    }
});
