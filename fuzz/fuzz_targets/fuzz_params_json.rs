#![no_main]

use libfuzzer_sys::fuzz_target;
use stonegen_spec::{parse_seed, validate_params, GenerationParams, Rgb8};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = Rgb8::from_hex(text);
    let _ = parse_seed(text);

    if let Ok(params) = GenerationParams::from_json(text) {
        let _ = validate_params(&params);
        let json = params.to_json_pretty().expect("params serialize");
        let back = GenerationParams::from_json(&json).expect("serialized params parse");
        assert_eq!(back.seed, params.seed);
        assert_eq!(back.color1, params.color1);
    }
});
