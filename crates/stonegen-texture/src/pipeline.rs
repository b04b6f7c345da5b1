//! Generation pipeline: sequences the height field and map derivation,
//! reporting fixed progress checkpoints along the way.
//!
//! A run walks a strictly linear state machine:
//!
//! ```text
//! Idle -> GeneratingBase -> Warping -> Refining -> Albedo -> Normal
//!      -> Roughness -> Finalizing -> Done
//! ```
//!
//! Any non-terminal state may move to `Failed`. Outputs are all-or-nothing:
//! a failed or cancelled run returns no maps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use stonegen_spec::{validate_params, GenerationParams, HIGH_MEMORY_RESOLUTION};

use crate::error::GenerateError;
use crate::field::estimate_peak_bytes;
use crate::heightfield::{self, Normalization};
use crate::maps::{
    AlbedoGenerator, HeightGenerator, MaterialMapSet, NormalGenerator, RoughnessGenerator,
};

/// States of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Idle,
    GeneratingBase,
    Warping,
    Refining,
    Albedo,
    Normal,
    Roughness,
    Finalizing,
    Done,
    Failed,
}

impl PipelineState {
    /// Linear successor, `None` for terminal states.
    pub fn next(self) -> Option<Self> {
        use PipelineState::*;
        match self {
            Idle => Some(GeneratingBase),
            GeneratingBase => Some(Warping),
            Warping => Some(Refining),
            Refining => Some(Albedo),
            Albedo => Some(Normal),
            Normal => Some(Roughness),
            Roughness => Some(Finalizing),
            Finalizing => Some(Done),
            Done | Failed => None,
        }
    }

    /// Whether the run has finished.
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    /// Progress percentage reported on entering this state.
    pub fn percent(self) -> Option<u8> {
        use PipelineState::*;
        match self {
            GeneratingBase => Some(10),
            Warping => Some(30),
            Refining => Some(40),
            Albedo => Some(50),
            Normal => Some(70),
            Roughness => Some(85),
            Finalizing => Some(95),
            Done => Some(100),
            Idle | Failed => None,
        }
    }

    /// Human-readable label reported with the checkpoint.
    pub fn label(self) -> &'static str {
        use PipelineState::*;
        match self {
            Idle => "Ready",
            GeneratingBase => "Generating Height Map (Base)...",
            Warping => "Applying Domain Warping...",
            Refining => "Refining Details...",
            Albedo => "Generating Albedo...",
            Normal => "Generating Normal Map (3D Calculation)...",
            Roughness => "Generating Roughness Map...",
            Finalizing => "Finalizing Output...",
            Done => "Done",
            Failed => "Error",
        }
    }

    /// Short stage name for logs and timing reports.
    pub fn name(self) -> &'static str {
        use PipelineState::*;
        match self {
            Idle => "idle",
            GeneratingBase => "base_noise",
            Warping => "domain_warp",
            Refining => "contrast",
            Albedo => "albedo",
            Normal => "normal",
            Roughness => "roughness",
            Finalizing => "finalize",
            Done => "done",
            Failed => "failed",
        }
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Receives progress from a running pipeline.
///
/// Called synchronously on the pipeline's thread; implementations must not block.
pub trait ProgressSink {
    /// The run entered `state`, reported as `percent` with `label`.
    fn checkpoint(&mut self, state: PipelineState, percent: u8, label: &'static str);

    /// The run failed while in `state`. No checkpoint follows.
    fn failed(&mut self, state: PipelineState, error: &GenerateError) {
        let _ = (state, error);
    }
}

impl<F> ProgressSink for F
where
    F: FnMut(u8, &str),
{
    fn checkpoint(&mut self, _state: PipelineState, percent: u8, label: &'static str) {
        self(percent, label)
    }

    /// Reported at the failing stage's percentage so the sequence never decreases.
    fn failed(&mut self, state: PipelineState, error: &GenerateError) {
        let label = format!("{}: {}", PipelineState::Failed.label(), error);
        self(state.percent().unwrap_or(0), &label)
    }
}

/// A sink that ignores all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn checkpoint(&mut self, _state: PipelineState, _percent: u8, _label: &'static str) {}
}

/// Cooperative cancellation flag, checked at every stage boundary.
#[derive(Debug, Default, Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The run stops at its next stage boundary.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Wall-clock time spent in one stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageTiming {
    pub stage: PipelineState,
    pub duration: Duration,
}

impl StageTiming {
    pub fn duration_ms(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

/// A successful run: the maps plus run diagnostics.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub maps: MaterialMapSet,
    pub timings: Vec<StageTiming>,
    /// Whether the height field had to be replaced by a flat field.
    pub normalization: Normalization,
}

/// One pipeline run over a parameter set.
pub struct Pipeline<'a, P: ProgressSink + ?Sized> {
    params: &'a GenerationParams,
    progress: &'a mut P,
    cancel: CancelToken,
    state: PipelineState,
    stage_start: Instant,
    timings: Vec<StageTiming>,
}

impl<'a, P: ProgressSink + ?Sized> Pipeline<'a, P> {
    pub fn new(params: &'a GenerationParams, progress: &'a mut P) -> Self {
        Self {
            params,
            progress,
            cancel: CancelToken::new(),
            state: PipelineState::Idle,
            stage_start: Instant::now(),
            timings: Vec::new(),
        }
    }

    /// Observe `cancel` at every stage boundary.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Current state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Execute the run. A pipeline runs at most once.
    pub fn run(&mut self) -> Result<GenerationReport, GenerateError> {
        let span = tracing::info_span!(
            "generate_maps",
            width = self.params.width,
            height = self.params.height,
            seed = self.params.seed
        );
        let _enter = span.enter();

        if self.state != PipelineState::Idle {
            return Err(GenerateError::InvalidParameter(format!(
                "pipeline already ran (state {})",
                self.state
            )));
        }

        let started = Instant::now();
        match self.run_stages() {
            Ok((maps, normalization)) => {
                tracing::info!(
                    elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                    "material set generated"
                );
                Ok(GenerationReport {
                    maps,
                    timings: std::mem::take(&mut self.timings),
                    normalization,
                })
            }
            Err(err) => {
                let at = self.state;
                self.state = PipelineState::Failed;
                tracing::warn!(stage = %at, error = %err, "generation failed");
                self.progress.failed(at, &err);
                Err(err)
            }
        }
    }

    fn run_stages(&mut self) -> Result<(MaterialMapSet, Normalization), GenerateError> {
        let params = self.params;
        validate_params(params).into_result()?;
        if params.width.max(params.height) > HIGH_MEMORY_RESOLUTION {
            tracing::warn!(
                estimated_bytes = estimate_peak_bytes(params.width, params.height),
                "high-memory run"
            );
        }

        self.advance(PipelineState::GeneratingBase)?;
        let mut field = heightfield::generate_base(params)?;

        self.advance(PipelineState::Warping)?;
        heightfield::apply_domain_warp(&mut field, params)?;
        let (mut structure, normalization) = heightfield::normalize(field)?;

        self.advance(PipelineState::Refining)?;
        heightfield::apply_contrast(&mut structure, params.contrast);

        self.advance(PipelineState::Albedo)?;
        let albedo = AlbedoGenerator::new(params.color1, params.color2).generate(&structure)?;

        self.advance(PipelineState::Normal)?;
        let normal = NormalGenerator::new()
            .with_depth(params.depth_strength)
            .generate(&structure)?;

        self.advance(PipelineState::Roughness)?;
        let roughness = RoughnessGenerator::new(params.roughness_factor).generate(&structure)?;

        self.advance(PipelineState::Finalizing)?;
        let height = HeightGenerator::new().generate(&structure)?;
        drop(structure);

        self.advance(PipelineState::Done)?;
        Ok((
            MaterialMapSet {
                albedo,
                normal,
                roughness,
                height,
            },
            normalization,
        ))
    }

    /// Close the current stage and enter `next`, reporting its checkpoint.
    fn advance(&mut self, next: PipelineState) -> Result<(), GenerateError> {
        debug_assert_eq!(self.state.next(), Some(next));

        if self.cancel.is_cancelled() {
            return Err(GenerateError::Cancelled);
        }

        let now = Instant::now();
        if self.state != PipelineState::Idle {
            let duration = now - self.stage_start;
            tracing::debug!(
                stage = %self.state,
                elapsed_ms = duration.as_secs_f64() * 1000.0,
                "stage complete"
            );
            self.timings.push(StageTiming {
                stage: self.state,
                duration,
            });
        }
        self.stage_start = now;
        self.state = next;

        if let Some(percent) = next.percent() {
            self.progress.checkpoint(next, percent, next.label());
        }
        Ok(())
    }
}

/// Generate a material set, reporting progress to `progress`.
///
/// # Example
///
/// ```
/// use stonegen_spec::GenerationParams;
/// use stonegen_texture::generate_maps;
///
/// let params = GenerationParams::builder().resolution(32, 32).seed(42).octaves(3).build();
/// let mut last = 0;
/// let maps = generate_maps(&params, &mut |percent: u8, _label: &str| last = percent).unwrap();
/// assert_eq!(maps.width(), 32);
/// assert_eq!(last, 100);
/// ```
pub fn generate_maps<P: ProgressSink + ?Sized>(
    params: &GenerationParams,
    progress: &mut P,
) -> Result<MaterialMapSet, GenerateError> {
    Pipeline::new(params, progress).run().map(|out| out.maps)
}

/// Generate a material set that stops early once `cancel` is set.
pub fn generate_maps_with_cancel<P: ProgressSink + ?Sized>(
    params: &GenerationParams,
    progress: &mut P,
    cancel: &CancelToken,
) -> Result<GenerationReport, GenerateError> {
    Pipeline::new(params, progress)
        .with_cancel(cancel.clone())
        .run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        checkpoints: Vec<(PipelineState, u8)>,
        failures: Vec<PipelineState>,
    }

    impl ProgressSink for Recorder {
        fn checkpoint(&mut self, state: PipelineState, percent: u8, _label: &'static str) {
            self.checkpoints.push((state, percent));
        }

        fn failed(&mut self, state: PipelineState, _error: &GenerateError) {
            self.failures.push(state);
        }
    }

    fn small_params() -> GenerationParams {
        GenerationParams::builder()
            .resolution(16, 16)
            .seed(3)
            .octaves(2)
            .build()
    }

    #[test]
    fn state_machine_is_linear() {
        let mut state = PipelineState::Idle;
        let mut visited = vec![state];
        while let Some(next) = state.next() {
            visited.push(next);
            state = next;
        }
        assert_eq!(visited.len(), 9);
        assert_eq!(state, PipelineState::Done);
        assert!(PipelineState::Failed.next().is_none());
        assert!(PipelineState::Failed.is_terminal());
    }

    #[test]
    fn checkpoints_follow_fixed_percentages() {
        let params = small_params();
        let mut recorder = Recorder::default();
        let mut pipeline = Pipeline::new(&params, &mut recorder);
        let out = pipeline.run().unwrap();
        assert_eq!(pipeline.state(), PipelineState::Done);
        assert_eq!(out.timings.len(), 7);
        assert_eq!(out.normalization, Normalization::Stretched);

        let percents: Vec<u8> = recorder.checkpoints.iter().map(|c| c.1).collect();
        assert_eq!(percents, vec![10, 30, 40, 50, 70, 85, 95, 100]);
        assert!(recorder.failures.is_empty());
    }

    #[test]
    fn invalid_params_fail_from_idle() {
        let params = GenerationParams {
            octaves: 0,
            ..small_params()
        };
        let mut recorder = Recorder::default();
        let err = generate_maps(&params, &mut recorder).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidParameter(_)));
        assert!(recorder.checkpoints.is_empty());
        assert_eq!(recorder.failures, vec![PipelineState::Idle]);
    }

    #[test]
    fn cancelled_before_start() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut recorder = Recorder::default();
        let err = generate_maps_with_cancel(&small_params(), &mut recorder, &cancel).unwrap_err();
        assert!(matches!(err, GenerateError::Cancelled));
        assert!(recorder.checkpoints.is_empty());
        assert_eq!(recorder.failures, vec![PipelineState::Idle]);
    }

    #[test]
    fn cancelled_mid_run_reports_no_further_checkpoints() {
        let cancel = CancelToken::new();
        let trigger = cancel.clone();
        let mut seen = Vec::new();
        let mut sink = |percent: u8, _label: &str| {
            seen.push(percent);
            if percent == 50 {
                trigger.cancel();
            }
        };
        let result = generate_maps_with_cancel(&small_params(), &mut sink, &cancel);
        assert!(matches!(result, Err(GenerateError::Cancelled)));
        assert_eq!(seen, vec![10, 30, 40, 50]);
    }

    #[test]
    fn pipeline_runs_once() {
        let params = small_params();
        let mut sink = NoProgress;
        let mut pipeline = Pipeline::new(&params, &mut sink);
        assert!(pipeline.run().is_ok());
        assert!(pipeline.run().is_err());
    }
}
