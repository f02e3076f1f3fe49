//! Built-in diagnostic rules.

pub mod duplicated_modifiers;
pub mod if_closed;
pub mod inconsistent_hint_platforms;
pub mod single_selector;
pub mod unknown_preprocessor_directives;

use std::sync::Arc;

use crate::linter::rule::LinterRule;

pub use duplicated_modifiers::DuplicatedModifiers;
pub use if_closed::IfClosed;
pub use inconsistent_hint_platforms::InconsistentHintPlatforms;
pub use single_selector::SingleSelector;
pub use unknown_preprocessor_directives::UnknownPreProcessorDirectives;

/// The default rule set, in registration order.
pub fn default_rules() -> Vec<Arc<dyn LinterRule>> {
    vec![
        Arc::new(IfClosed),
        Arc::new(SingleSelector),
        Arc::new(DuplicatedModifiers),
        Arc::new(UnknownPreProcessorDirectives),
        Arc::new(InconsistentHintPlatforms),
    ]
}
