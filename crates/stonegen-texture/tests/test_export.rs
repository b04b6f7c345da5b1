//! Tests for PNG export and background generation.

use pretty_assertions::assert_eq;
use stonegen_spec::GenerationParams;
use stonegen_texture::png::hash_png;
use stonegen_texture::{
    generate_maps, save_material_set, submit, GenerateError, MapKind, NoProgress, PngConfig,
    TaskEvent,
};

fn small_params(seed: u32) -> GenerationParams {
    GenerationParams::builder()
        .resolution(32, 24)
        .seed(seed)
        .octaves(3)
        .build()
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn test_export_writes_four_named_files() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("nested").join("out");
    let maps = generate_maps(&small_params(5), &mut NoProgress).unwrap();

    let manifest =
        save_material_set(&maps, &out_dir, "Stone", 1700000000, &PngConfig::default()).unwrap();

    let names: Vec<String> = manifest
        .files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "Stone_1700000000_Albedo.png",
            "Stone_1700000000_Normal.png",
            "Stone_1700000000_Roughness.png",
            "Stone_1700000000_Height.png",
        ]
    );

    for file in &manifest.files {
        let bytes = std::fs::read(&file.path).unwrap();
        assert_eq!(hash_png(&bytes), file.hash);
        assert_eq!(bytes.len() as u64, file.size_bytes);
    }
}

#[test]
fn test_exported_pngs_decode_to_map_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let maps = generate_maps(&small_params(11), &mut NoProgress).unwrap();
    let manifest = save_material_set(&maps, dir.path(), "T", 1, &PngConfig::fast()).unwrap();

    for kind in [MapKind::Normal, MapKind::Height] {
        let path = &manifest.get(kind).unwrap().path;
        let decoder = png::Decoder::new(std::fs::File::open(path).unwrap());
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        assert_eq!((info.width, info.height), (32, 24));
        assert_eq!(&buf[..info.buffer_size()], maps.map(kind).bytes());
    }
}

#[test]
fn test_export_hashes_are_deterministic() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let config = PngConfig::default();

    let a = generate_maps(&small_params(77), &mut NoProgress).unwrap();
    let b = generate_maps(&small_params(77), &mut NoProgress).unwrap();
    let ma = save_material_set(&a, dir_a.path(), "Stone", 1, &config).unwrap();
    let mb = save_material_set(&b, dir_b.path(), "Stone", 2, &config).unwrap();

    let ha: Vec<_> = ma.files.iter().map(|f| f.hash.clone()).collect();
    let hb: Vec<_> = mb.files.iter().map(|f| f.hash.clone()).collect();
    assert_eq!(ha, hb);
}

// ============================================================================
// Background tasks
// ============================================================================

#[test]
fn test_task_streams_progress_then_completes() {
    let handle = submit(small_params(3)).unwrap();
    let mut percents = Vec::new();
    let maps = loop {
        match handle.events().recv().unwrap() {
            TaskEvent::Progress { percent, .. } => percents.push(percent),
            TaskEvent::Completed(maps) => break maps,
            TaskEvent::Failed(err) => panic!("unexpected failure: {}", err),
        }
    };
    assert_eq!(percents, vec![10, 30, 40, 50, 70, 85, 95, 100]);
    assert_eq!(maps, generate_maps(&small_params(3), &mut NoProgress).unwrap());
}

#[test]
fn test_task_wait_reports_invalid_params() {
    let params = GenerationParams {
        octaves: 0,
        ..small_params(1)
    };
    let err = submit(params).unwrap().wait().unwrap_err();
    assert!(matches!(err, GenerateError::InvalidParameter(_)));
}

#[test]
fn test_task_cancel_ends_with_one_terminal_event() {
    let params = GenerationParams::builder()
        .resolution(256, 256)
        .seed(8)
        .octaves(8)
        .build();
    let handle = submit(params).unwrap();
    handle.cancel();

    let mut terminal = 0;
    for event in handle.events().iter() {
        if event.is_terminal() {
            terminal += 1;
            match event {
                // The run may finish before it observes the request.
                TaskEvent::Completed(_) | TaskEvent::Failed(GenerateError::Cancelled) => {}
                other => panic!("unexpected terminal event {:?}", other),
            }
        }
    }
    assert_eq!(terminal, 1);
}
