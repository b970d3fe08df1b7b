//! Summarising many files at once

use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{
    config::FeatureConfig,
    error::FeatureError,
    features::{
        avg_ioi, note_density, num_notes, pitch_class_histogram, pitch_class_transition_matrix,
        used_pitch, used_pitch_multiple, TransitionMatrix,
    },
    performance::{load, Performance},
};

/// Every statistic for one performance.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSummary {
    pub num_notes: usize,
    pub note_density: f64,
    pub used_pitch: usize,
    pub pitch_class_histogram: [f64; 12],
    pub pitch_class_transition_matrix: TransitionMatrix,
    pub avg_ioi: f64,
}

/// Computes every statistic for `perf`, stopping at the first one that fails.
pub fn extract_features(
    perf: &Performance,
    config: &FeatureConfig,
) -> Result<FeatureSummary, FeatureError> {
    Ok(FeatureSummary {
        num_notes: num_notes(perf),
        note_density: note_density(perf, config.density_interval)?,
        used_pitch: used_pitch(perf),
        pitch_class_histogram: pitch_class_histogram(perf)?,
        pitch_class_transition_matrix: pitch_class_transition_matrix(
            perf,
            config.transition_normalization,
        ),
        avg_ioi: avg_ioi(perf)?,
    })
}

/// The outcome for one input path.
#[derive(Debug)]
pub struct BatchItem {
    pub path: PathBuf,
    pub result: Result<FeatureSummary, FeatureError>,
}

/// Results of [`BatchExtractor::run`], in input order.
#[derive(Debug)]
pub struct BatchReport {
    items: Vec<BatchItem>,
    performances: Option<Vec<Performance>>,
}

impl BatchReport {
    pub fn items(&self) -> &[BatchItem] {
        &self.items
    }

    pub fn successes(&self) -> impl Iterator<Item = (&Path, &FeatureSummary)> {
        self.items
            .iter()
            .filter_map(|item| item.result.as_ref().ok().map(|s| (item.path.as_path(), s)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &FeatureError)> {
        self.items
            .iter()
            .filter_map(|item| item.result.as_ref().err().map(|e| (item.path.as_path(), e)))
    }

    /// Number of files handled, successful or not.
    pub fn processed(&self) -> usize {
        self.items.len()
    }

    /// Every performance that loaded, if the extractor was asked to keep them.
    pub fn performances(&self) -> Option<&[Performance]> {
        self.performances.as_deref()
    }

    /// [`used_pitch_multiple`] over every performance that loaded.
    ///
    /// `None` unless `retain_performances` was set in the config.
    pub fn used_pitch_across(&self) -> Option<usize> {
        self.performances
            .as_ref()
            .map(|perfs| used_pitch_multiple(perfs.iter()))
    }
}

/// Loads and summarises files in parallel, isolating failures per file.
pub struct BatchExtractor {
    config: FeatureConfig,
}

impl BatchExtractor {
    /// Fails with [`FeatureError::InvalidArgument`] if `config` does not validate.
    pub fn new(config: FeatureConfig) -> Result<Self, FeatureError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    fn process(&self, path: &Path) -> (BatchItem, Option<Performance>) {
        let (result, perf) = match load(path) {
            Ok(perf) => (extract_features(&perf, &self.config), Some(perf)),
            Err(e) => (Err(e), None),
        };

        if let Err(e) = &result {
            log::error!("{}: {}", path.display(), e);
        }

        let item = BatchItem {
            path: path.to_path_buf(),
            result,
        };
        (item, perf)
    }

    fn in_pool<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        if self.config.threads == 0 {
            return op();
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()
        {
            Ok(pool) => pool.install(op),
            Err(e) => {
                log::warn!(
                    "Failed to build a {}-thread pool, using the global pool: {}",
                    self.config.threads,
                    e
                );
                op()
            }
        }
    }

    /// Summarises every path. A failing file is logged and recorded, the rest
    /// carry on.
    pub fn run<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> BatchReport {
        let total = paths.len();
        let processed = AtomicUsize::new(0);

        let outputs: Vec<(BatchItem, Option<Performance>)> = self.in_pool(|| {
            paths
                .par_iter()
                .map(|path| {
                    let output = self.process(path.as_ref());
                    let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                    log::info!("Processed {}/{} files", done, total);
                    output
                })
                .collect()
        });

        let mut items = Vec::with_capacity(outputs.len());
        let mut performances = Vec::new();
        for (item, perf) in outputs {
            items.push(item);
            if let Some(perf) = perf {
                performances.push(perf);
            }
        }

        BatchReport {
            items,
            performances: self.config.retain_performances.then_some(performances),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        features::TransitionNormalization,
        test_util::{approx_eq, SmfBuilder},
    };

    use super::*;

    fn scale_file() -> Vec<u8> {
        // C D E F, one per beat at 120 bpm
        SmfBuilder::new(0, 480)
            .track(|t| {
                t.note(0, 0, 60, 100, 480)
                    .note(480, 0, 62, 100, 480)
                    .note(960, 0, 64, 100, 480)
                    .note(1440, 0, 65, 100, 480)
            })
            .build()
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "midi-features-batch-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn summarises_a_scale() {
        let perf = Performance::from_bytes(&scale_file()).unwrap();
        let config = FeatureConfig {
            density_interval: 1.0,
            transition_normalization: TransitionNormalization::Row,
            ..Default::default()
        };
        let summary = extract_features(&perf, &config).unwrap();

        assert_eq!(summary.num_notes, 4);
        assert_eq!(summary.note_density, 2.0);
        assert_eq!(summary.used_pitch, 4);
        assert!(approx_eq(summary.pitch_class_histogram[5], 0.25));
        assert_eq!(summary.pitch_class_transition_matrix[0][2], 1.0);
        assert_eq!(summary.pitch_class_transition_matrix[4][5], 1.0);
        assert_eq!(summary.avg_ioi, 0.5);
    }

    #[test]
    fn summary_stops_at_first_error() {
        let bytes = SmfBuilder::new(0, 480)
            .track(|t| t.note(0, 0, 60, 100, 480))
            .build();
        let perf = Performance::from_bytes(&bytes).unwrap();
        assert!(matches!(
            extract_features(&perf, &FeatureConfig::default()),
            Err(FeatureError::InsufficientData { .. })
        ));
    }

    #[test]
    fn batch_isolates_failures_and_keeps_order() {
        let dir = temp_dir("isolate");
        let good = dir.join("good.mid");
        let corrupt = dir.join("corrupt.mid");
        let missing = dir.join("missing.mid");
        std::fs::write(&good, scale_file()).unwrap();
        std::fs::write(&corrupt, b"MThd not really").unwrap();

        let extractor = BatchExtractor::new(FeatureConfig {
            threads: 2,
            ..Default::default()
        })
        .unwrap();
        let report = extractor.run(&[&missing, &good, &corrupt, &good]);

        assert_eq!(report.processed(), 4);
        let paths: Vec<&Path> = report.items().iter().map(|i| i.path.as_path()).collect();
        assert_eq!(
            paths,
            vec![
                missing.as_path(),
                good.as_path(),
                corrupt.as_path(),
                good.as_path()
            ]
        );

        let successes: Vec<_> = report.successes().collect();
        assert_eq!(successes.len(), 2);
        assert!(successes.iter().all(|(_, s)| s.num_notes == 4));

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 2);
        assert!(failures.iter().all(|(_, e)| e.is_parse_error()));

        assert!(report.performances().is_none());
        assert_eq!(report.used_pitch_across(), None);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn retained_performances_give_used_pitch_across_files() {
        let dir = temp_dir("retain");
        let low = dir.join("low.mid");
        let high = dir.join("high.mid");
        std::fs::write(&low, scale_file()).unwrap();
        std::fs::write(
            &high,
            SmfBuilder::new(0, 480)
                .track(|t| t.note(0, 0, 64, 100, 480).note(480, 0, 72, 100, 480))
                .build(),
        )
        .unwrap();

        let extractor = BatchExtractor::new(FeatureConfig {
            retain_performances: true,
            ..Default::default()
        })
        .unwrap();
        let report = extractor.run(&[low, high]);

        assert_eq!(report.performances().map(|p| p.len()), Some(2));
        // 60 62 64 65 plus 72
        assert_eq!(report.used_pitch_across(), Some(5));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn extractor_rejects_invalid_config_up_front() {
        let result = BatchExtractor::new(FeatureConfig {
            density_interval: -1.0,
            ..Default::default()
        });
        assert!(matches!(result, Err(FeatureError::InvalidArgument(_))));
    }
}
