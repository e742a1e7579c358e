use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for a sorting run.
///
/// `SortFacesUseCase` reports to it without knowing where the numbers end up.
pub trait PipelineLogger: Send {
    /// One more image finished, out of `total`.
    fn progress(&mut self, current: usize, total: usize);

    /// Milliseconds spent in `stage` (walk, extract, cluster, distribute).
    fn timing(&mut self, stage: &str, duration_ms: f64);

    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// Called once after files are copied.
    fn summary(&self) {}
}

/// Drops every event. Used when no logger is configured.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _: usize, _: usize) {}
    fn timing(&mut self, _: &str, _: f64) {}
    fn metric(&mut self, _: &str, _: f64) {}
    fn info(&mut self, _: &str) {}
}

/// Collects what a run reports and logs it as one block at the end.
///
/// Progress only updates the image count; live progress is the caller's
/// job (see `SortFacesUseCase::with_progress`).
pub struct SummaryPipelineLogger {
    started: Instant,
    images: usize,
    /// Stage name and accumulated milliseconds, in the order first seen.
    stages: Vec<(String, f64)>,
    metrics: BTreeMap<String, Vec<f64>>,
}

impl SummaryPipelineLogger {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            images: 0,
            stages: Vec::new(),
            metrics: BTreeMap::new(),
        }
    }

    /// The end-of-run block, or `None` before anything was timed or measured.
    pub fn summary_string(&self) -> Option<String> {
        if self.stages.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let wall_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let mut out = format!(
            "Run summary ({} images, {:.1}s wall clock):",
            self.images,
            wall_ms / 1000.0
        );

        for (stage, ms) in &self.stages {
            out.push_str(&format!("\n  {stage:<10} {ms:>9.0} ms"));
            if stage == "extract" && self.images > 0 && *ms > 0.0 {
                let rate = self.images as f64 / (ms / 1000.0);
                out.push_str(&format!("  ({rate:.1} images/s)"));
            }
        }

        for (name, values) in &self.metrics {
            let Some(stats) = Stats::of(values) else {
                continue;
            };
            out.push_str(&format!(
                "\n  {name}: {} values, min {:.0}, max {:.0}, mean {:.1}",
                values.len(),
                stats.min,
                stats.max,
                stats.mean
            ));
        }

        Some(out)
    }
}

impl Default for SummaryPipelineLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineLogger for SummaryPipelineLogger {
    fn progress(&mut self, _current: usize, total: usize) {
        self.images = total;
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        match self.stages.iter_mut().find(|(name, _)| name == stage) {
            Some((_, ms)) => *ms += duration_ms,
            None => self.stages.push((stage.to_string(), duration_ms)),
        }
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().push(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

struct Stats {
    min: f64,
    max: f64,
    mean: f64,
}

impl Stats {
    fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Some(Self { min, max, mean })
    }
}
