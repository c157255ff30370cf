//! Fuzz target for HAR parsing and normalization.
//!
//! Archives are attacker-controlled. Parsing, normalization and the traffic
//! rendering must only ever return errors, never panic.

#![no_main]

use hr_har::{normalize, parse_har_bytes};
use hr_report::{DocumentGenerator, RenderOptions, Translations};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(har) = parse_har_bytes(data) else {
        return;
    };
    let Ok(entries) = normalize(&har) else {
        return;
    };

    let Ok(translations) = Translations::bundled() else {
        return;
    };
    let options = RenderOptions::default().with_truncate_content(Some(256));
    let _ = DocumentGenerator::new(&translations, options).generate_traffic(&entries);
});
