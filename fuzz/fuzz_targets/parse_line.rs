#![no_main]

use libfuzzer_sys::fuzz_target;

use aglint::RuleParser;

// Parsing must never panic, and for every line the parser accepts, the
// generated text must re-parse and generate the same text again.
fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    if line.contains('\n') || line.contains('\r') {
        return;
    }
    let Ok(rule) = RuleParser::parse(line) else {
        return;
    };
    let once = RuleParser::generate(&rule);
    let Ok(reparsed) = RuleParser::parse(&once) else {
        panic!("generated text failed to parse: {once:?} (from {line:?})");
    };
    let twice = RuleParser::generate(&reparsed);
    assert_eq!(once, twice, "generation did not stabilize for {line:?}");
});
