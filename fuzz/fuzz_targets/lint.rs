#![no_main]

use libfuzzer_sys::fuzz_target;

use aglint::{Linter, LinterConfig};

// Linting arbitrary content must never panic, counters must partition the
// problems, and with nothing fixed the output must equal the input.
fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(mut linter) = Linter::new(true, LinterConfig::default()) else {
        return;
    };
    let result = linter.lint(content, true);
    let counted = result.warning_count + result.error_count + result.fatal_error_count;
    assert_eq!(
        counted,
        result
            .problems
            .iter()
            .filter(|p| p.severity.as_number() > 0)
            .count()
    );
    let no_fixes = result.problems.iter().all(|p| p.fix.is_none());
    if no_fixes {
        assert_eq!(result.fixed.as_deref(), Some(content));
    }
});
