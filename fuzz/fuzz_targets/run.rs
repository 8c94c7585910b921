#![no_main]

use libfuzzer_sys::fuzz_target;
use testduel::engine::{EngineConfig, RunRequest, run_to_end};
use testduel::runtime::Limits;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else { return };
    // Split the input into program and tests at the first NUL.
    let (program, tests) = s.split_once('\0').unwrap_or((s, "function t() {}"));
    let config = EngineConfig::default()
        .with_limits(Limits::default().with_max_steps(20_000).with_max_collection_len(1 << 12))
        .with_random_seed(Some(0));
    if let Ok((results, outcome)) = run_to_end(RunRequest::new(program, tests), &config) {
        assert_eq!(results.len(), outcome.total);
    }
});
