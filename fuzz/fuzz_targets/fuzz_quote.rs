//! Fuzz target for raw block quoting.
//!
//! A quoted string must never contain a closing delimiter before its end and
//! must unquote to the original text.

#![no_main]

use hr_report::markup::RAW_DELIMITER;
use hr_report::{quote, unquote};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|s: String| {
    let quoted = quote(&s);

    let inner = &quoted[RAW_DELIMITER.len()..quoted.len() - RAW_DELIMITER.len()];
    assert!(!inner.contains("``"), "adjacent backticks in {quoted:?}");

    assert_eq!(unquote(&quoted).as_deref(), Some(s.as_str()));
});
