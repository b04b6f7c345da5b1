//! End-to-end tests for map generation.
//!
//! Covers determinism, output shapes and ranges, progress ordering,
//! cancellation and failure reporting.

use pretty_assertions::assert_eq;
use stonegen_spec::{GenerationParams, Rgb8};
use stonegen_texture::heightfield::{self, Normalization};
use stonegen_texture::{
    generate_maps, generate_maps_with_cancel, CancelToken, GenerateError, MapKind, NoProgress,
    PipelineState, ProgressSink,
};

fn scenario_params() -> GenerationParams {
    GenerationParams::builder()
        .resolution(64, 64)
        .seed(42)
        .scale(5.0)
        .octaves(3)
        .contrast(1.0)
        .depth_strength(5.0)
        .roughness_factor(1.0)
        .colors(Rgb8::new(43, 43, 43), Rgb8::new(138, 138, 138))
        .build()
}

#[derive(Default)]
struct Recorder {
    checkpoints: Vec<(PipelineState, u8, String)>,
    failures: Vec<PipelineState>,
}

impl ProgressSink for Recorder {
    fn checkpoint(&mut self, state: PipelineState, percent: u8, label: &'static str) {
        self.checkpoints.push((state, percent, label.to_string()));
    }

    fn failed(&mut self, state: PipelineState, _error: &GenerateError) {
        self.failures.push(state);
    }
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_same_params_same_maps() {
    let params = scenario_params();
    let a = generate_maps(&params, &mut NoProgress).unwrap();
    let b = generate_maps(&params, &mut NoProgress).unwrap();
    assert!(a == b, "identical parameters must yield identical maps");
}

#[test]
fn test_different_seed_different_height() {
    let a = generate_maps(&scenario_params(), &mut NoProgress).unwrap();
    let params = GenerationParams {
        seed: 43,
        ..scenario_params()
    };
    let b = generate_maps(&params, &mut NoProgress).unwrap();
    assert_ne!(a.height.data, b.height.data);
}

#[test]
fn test_maps_match_structure_map() {
    let params = scenario_params();
    let structure = heightfield::build(&params).unwrap();
    let maps = generate_maps(&params, &mut NoProgress).unwrap();
    for (i, &s) in structure.data().iter().enumerate() {
        assert_eq!(maps.height.data[i], (s * 255.0).round() as u8);
    }
}

// ============================================================================
// Shapes and ranges
// ============================================================================

#[test]
fn test_scenario_shapes_and_ranges() {
    let maps = generate_maps(&scenario_params(), &mut NoProgress).unwrap();

    assert_eq!((maps.width(), maps.height()), (64, 64));
    for kind in MapKind::ALL {
        let map = maps.map(kind);
        assert_eq!(map.dimensions(), (64, 64));
        assert_eq!(map.bytes().len(), 64 * 64 * kind.channels());
    }

    // Contrast 1.0 keeps the stretched range intact.
    assert_eq!(maps.height.data.iter().min(), Some(&0));
    assert_eq!(maps.height.data.iter().max(), Some(&255));

    for px in maps.albedo.data.chunks_exact(3) {
        assert!(px.iter().all(|&c| (43..=138).contains(&c)), "albedo {:?}", px);
        assert!(px[0] == px[1] && px[1] == px[2], "gray ramp stays gray");
    }

    for px in maps.normal.data.chunks_exact(3) {
        assert!(px[2] >= 128, "normals face outward, got {:?}", px);
    }

    for (&r, &h) in maps.roughness.data.iter().zip(&maps.height.data) {
        let sum = r as i32 + h as i32;
        assert!((254..=256).contains(&sum), "roughness {} height {}", r, h);
    }
}

#[test]
fn test_non_square_output() {
    let params = GenerationParams::builder()
        .resolution(48, 20)
        .seed(9)
        .octaves(4)
        .build();
    let maps = generate_maps(&params, &mut NoProgress).unwrap();
    assert_eq!((maps.width(), maps.height()), (48, 20));
    assert_eq!(maps.normal.data.len(), 48 * 20 * 3);
    assert_eq!(maps.roughness.data.len(), 48 * 20);
}

#[test]
fn test_single_pixel_is_flat() {
    let params = GenerationParams::builder()
        .resolution(1, 1)
        .seed(1)
        .octaves(1)
        .build();
    let structure = heightfield::build(&params).unwrap();
    assert_eq!(structure.data(), &[0.5]);

    let field = heightfield::generate_base(&params).unwrap();
    let (_, outcome) = heightfield::normalize(field).unwrap();
    assert_eq!(outcome, Normalization::Flat);

    let maps = generate_maps(&params, &mut NoProgress).unwrap();
    assert_eq!(maps.normal.get(0, 0), [128, 128, 255]);
    assert_eq!(maps.height.get(0, 0), 128);
}

#[test]
fn test_zero_contrast_is_mid_gray() {
    let params = GenerationParams {
        contrast: 0.0,
        ..scenario_params()
    };
    let maps = generate_maps(&params, &mut NoProgress).unwrap();
    assert!(maps.height.data.iter().all(|&v| v == 128));
    assert!(maps.normal.data.chunks_exact(3).all(|px| px == [128, 128, 255]));
}

// ============================================================================
// Progress
// ============================================================================

#[test]
fn test_progress_sequence() {
    let mut recorder = Recorder::default();
    generate_maps(&scenario_params(), &mut recorder).unwrap();

    let expected = vec![
        (PipelineState::GeneratingBase, 10, "Generating Height Map (Base)..."),
        (PipelineState::Warping, 30, "Applying Domain Warping..."),
        (PipelineState::Refining, 40, "Refining Details..."),
        (PipelineState::Albedo, 50, "Generating Albedo..."),
        (PipelineState::Normal, 70, "Generating Normal Map (3D Calculation)..."),
        (PipelineState::Roughness, 85, "Generating Roughness Map..."),
        (PipelineState::Finalizing, 95, "Finalizing Output..."),
        (PipelineState::Done, 100, "Done"),
    ];
    let expected: Vec<_> = expected
        .into_iter()
        .map(|(s, p, l)| (s, p, l.to_string()))
        .collect();
    assert_eq!(recorder.checkpoints, expected);
    assert!(recorder.failures.is_empty());
}

#[test]
fn test_closure_sink() {
    let mut percents = Vec::new();
    generate_maps(&scenario_params(), &mut |p: u8, _: &str| percents.push(p)).unwrap();
    assert_eq!(percents, vec![10, 30, 40, 50, 70, 85, 95, 100]);
}

#[test]
fn test_closure_sink_sees_failure() {
    let params = GenerationParams {
        octaves: 0,
        ..scenario_params()
    };
    let mut reports: Vec<(u8, String)> = Vec::new();
    let err = generate_maps(&params, &mut |p: u8, label: &str| {
        reports.push((p, label.to_string()))
    })
    .unwrap_err();
    assert!(matches!(err, GenerateError::InvalidParameter(_)));
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0, 0);
    assert_eq!(reports[0].1, format!("Error: {}", err));
}

#[test]
fn test_closure_sink_failure_keeps_percent_monotonic() {
    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let mut reports: Vec<(u8, String)> = Vec::new();
    let mut sink = |p: u8, label: &str| {
        if p == 70 {
            trigger.cancel();
        }
        reports.push((p, label.to_string()));
    };
    let err = generate_maps_with_cancel(&scenario_params(), &mut sink, &cancel).unwrap_err();
    assert!(matches!(err, GenerateError::Cancelled));
    let percents: Vec<u8> = reports.iter().map(|r| r.0).collect();
    assert_eq!(percents, vec![10, 30, 40, 50, 70, 70]);
    assert!(reports[5].1.starts_with("Error: "));
}

// ============================================================================
// Extreme parameter values
// ============================================================================

#[test]
fn test_huge_depth_and_contrast_keep_maps_valid() {
    let params = GenerationParams {
        width: 8,
        height: 8,
        depth_strength: 1e38,
        contrast: 1e39,
        roughness_factor: 1e39,
        ..scenario_params()
    };
    let maps = generate_maps(&params, &mut NoProgress).unwrap();
    for px in maps.normal.data.chunks_exact(3) {
        let n: Vec<f32> = px.iter().map(|&c| c as f32 / 255.0 * 2.0 - 1.0).collect();
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!((len - 1.0).abs() < 0.02, "normal {:?} has length {}", px, len);
        assert!(px[2] >= 127);
    }
    for (r, h) in maps.roughness.data.iter().zip(&maps.height.data) {
        assert!((254..=256).contains(&(*r as u16 + *h as u16)));
    }

    let single = GenerationParams {
        width: 1,
        height: 1,
        ..params
    };
    let maps = generate_maps(&single, &mut NoProgress).unwrap();
    assert_eq!(maps.height.get(0, 0), 128);
    assert_eq!(maps.normal.get(0, 0), [128, 128, 255]);
}

// ============================================================================
// Failures and cancellation
// ============================================================================

#[test]
fn test_invalid_params_produce_nothing() {
    for params in [
        GenerationParams {
            width: 0,
            ..scenario_params()
        },
        GenerationParams {
            octaves: 9,
            ..scenario_params()
        },
        GenerationParams {
            scale: -1.0,
            ..scenario_params()
        },
        GenerationParams {
            depth_strength: f64::NAN,
            ..scenario_params()
        },
    ] {
        let mut recorder = Recorder::default();
        let err = generate_maps(&params, &mut recorder).unwrap_err();
        assert!(
            matches!(err, GenerateError::InvalidParameter(_)),
            "unexpected error {:?}",
            err
        );
        assert!(err.is_recoverable());
        assert!(recorder.checkpoints.is_empty());
        assert_eq!(recorder.failures, vec![PipelineState::Idle]);
    }
}

#[test]
fn test_cancel_between_stages() {
    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let mut recorder = Recorder::default();

    struct CancelAt<'a> {
        inner: &'a mut Recorder,
        trigger: CancelToken,
    }
    impl ProgressSink for CancelAt<'_> {
        fn checkpoint(&mut self, state: PipelineState, percent: u8, label: &'static str) {
            self.inner.checkpoint(state, percent, label);
            if state == PipelineState::Normal {
                self.trigger.cancel();
            }
        }
        fn failed(&mut self, state: PipelineState, error: &GenerateError) {
            self.inner.failed(state, error);
        }
    }

    let mut sink = CancelAt {
        inner: &mut recorder,
        trigger,
    };
    let err = generate_maps_with_cancel(&scenario_params(), &mut sink, &cancel).unwrap_err();
    assert!(matches!(err, GenerateError::Cancelled));

    let last = recorder.checkpoints.last().map(|c| c.1);
    assert_eq!(last, Some(70));
    assert_eq!(recorder.failures, vec![PipelineState::Normal]);
}

#[test]
fn test_report_contains_stage_timings() {
    let out =
        generate_maps_with_cancel(&scenario_params(), &mut NoProgress, &CancelToken::new())
            .unwrap();
    let stages: Vec<_> = out.timings.iter().map(|t| t.stage).collect();
    assert_eq!(
        stages,
        vec![
            PipelineState::GeneratingBase,
            PipelineState::Warping,
            PipelineState::Refining,
            PipelineState::Albedo,
            PipelineState::Normal,
            PipelineState::Roughness,
            PipelineState::Finalizing,
        ]
    );
    assert_eq!(out.normalization, Normalization::Stretched);

    let names: Vec<_> = out.timings.iter().map(|t| t.stage.name()).collect();
    assert_eq!(
        names,
        vec!["base_noise", "domain_warp", "contrast", "albedo", "normal", "roughness", "finalize"]
    );
}
