//! Wall-clock timing of inference calls.

use crate::error::{Error, Result};
use crate::segmentation::{NormalizedTensor, ProbabilityTensor, SegmentationModel};
use std::time::Instant;

/// Run `f` and return its result with the elapsed wall-clock time in whole
/// milliseconds.
pub fn measure<T, F: FnOnce() -> T>(f: F) -> (T, u64) {
    let start = Instant::now();
    let result = f();
    let elapsed_ms = start.elapsed().as_millis() as u64;
    (result, elapsed_ms)
}

/// One model's output for a benchmarked input
#[derive(Debug, Clone)]
pub struct BenchmarkRun {
    pub name: String,
    pub output: ProbabilityTensor,
    pub elapsed_ms: u64,
}

/// Outputs of several models on the same input, in run order.
///
/// Outputs are not compared with each other.
#[derive(Debug, Clone, Default)]
pub struct Benchmark {
    runs: Vec<BenchmarkRun>,
}

impl Benchmark {
    pub fn runs(&self) -> &[BenchmarkRun] {
        &self.runs
    }

    pub fn get(&self, name: &str) -> Option<&BenchmarkRun> {
        self.runs.iter().find(|run| run.name == name)
    }

    /// The first model's run
    pub fn primary(&self) -> Option<&BenchmarkRun> {
        self.runs.first()
    }

    pub fn into_primary(self) -> Option<BenchmarkRun> {
        self.runs.into_iter().next()
    }

    pub fn timings(&self) -> Vec<ModelTiming> {
        self.runs
            .iter()
            .map(|run| ModelTiming {
                model: run.name.clone(),
                elapsed_ms: run.elapsed_ms,
            })
            .collect()
    }
}

/// How long one model took for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTiming {
    pub model: String,
    pub elapsed_ms: u64,
}

impl std::fmt::Display for ModelTiming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Inference of {} took {} ms.", self.model, self.elapsed_ms)
    }
}

/// Run every model against the same tensor.
///
/// Model errors are wrapped in [`Error::InferenceFailure`] with the failing
/// model's name and stop the benchmark.
pub fn benchmark(
    models: &mut [Box<dyn SegmentationModel>],
    input: &NormalizedTensor,
) -> Result<Benchmark> {
    let mut runs = Vec::with_capacity(models.len());

    for model in models.iter_mut() {
        let _span = tracing::debug_span!("inference", model = model.name()).entered();

        let (output, elapsed_ms) = measure(|| model.infer(input));
        let output = output.map_err(|source| Error::InferenceFailure {
            model: model.name().to_string(),
            source: source.into(),
        })?;

        tracing::debug!("Model {} finished in {}ms", model.name(), elapsed_ms);

        runs.push(BenchmarkRun {
            name: model.name().to_string(),
            output,
            elapsed_ms,
        });
    }

    Ok(Benchmark { runs })
}
