// IDE: cargo-fuzz target
// Run with: cargo fuzz run fuzz_policy_json
// Purpose: fuzz the process argument -> RetentionPolicy::parse -> cutoff_before path
#![no_main]

use chrono::NaiveDateTime;
use gdprbot::domain::{Operation, RetentionPolicy, cutoff_before};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(policy) = RetentionPolicy::parse(raw) else {
        return;
    };

    // any parsed threshold must be safe to turn into a cutoff
    for op in Operation::ALL {
        if policy.is_enabled(op) {
            let days = policy.threshold(op);
            let _ = cutoff_before(NaiveDateTime::MIN, days);
            let _ = cutoff_before(NaiveDateTime::MAX, days);
        }
    }
});
