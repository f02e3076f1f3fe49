//! Opaque sub-parser registry.
//!
//! The kernel delegates external sub-grammars (CSS selector lists,
//! declaration blocks, media query lists, regex bodies) to pluggable
//! sub-parsers keyed by an AST-path selector such as
//! `CosmeticRule.body.selector_list`. Sub-parser trees are opaque
//! payloads; the kernel only ever asks for start/end offsets.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

/// Opaque tree produced by a sub-parser. The kernel never inspects the
/// payload beyond the offset accessors of the owning [`SubParser`].
#[derive(Debug, Clone, PartialEq)]
pub struct SubTree(pub serde_json::Value);

/// Error raised by a sub-parser, carrying a precise location within the
/// sub-parsed source. The kernel maps it onto a problem at the right line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubParserError {
    pub message: String,
    /// `(line, column)` of the error start.
    pub start: (usize, usize),
    /// `(line, column)` of the error end.
    pub end: (usize, usize),
}

/// Capability set of a sub-parser. `parse` receives the source fragment,
/// its byte offset within the line, the 1-based line number and the byte
/// offset of the line start within the filter list.
pub trait SubParser: Send + Sync {
    fn name(&self) -> &'static str;

    fn parse(
        &self,
        source: &str,
        offset: usize,
        line: usize,
        line_start_offset: usize,
    ) -> Result<SubTree, SubParserError>;

    /// Key under which a node stores its type tag.
    fn node_type_key(&self) -> &'static str;

    /// Keys under which a node stores child nodes.
    fn child_node_keys(&self) -> &'static [&'static str];

    fn start_offset(&self, node: &SubTree) -> usize;

    fn end_offset(&self, node: &SubTree) -> usize;
}

/// Registry mapping AST-path selectors to sub-parsers.
#[derive(Default)]
pub struct SubParserRegistry {
    parsers: HashMap<String, Arc<dyn SubParser>>,
}

impl SubParserRegistry {
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// Register a sub-parser for an AST-path selector, replacing any
    /// previous registration for the same path.
    pub fn register(&mut self, path: &str, parser: Arc<dyn SubParser>) {
        self.parsers.insert(path.to_string(), parser);
    }

    pub fn unregister(&mut self, path: &str) -> bool {
        self.parsers.remove(path).is_some()
    }

    pub fn get(&self, path: &str) -> Option<&Arc<dyn SubParser>> {
        self.parsers.get(path)
    }

    pub fn has(&self, path: &str) -> bool {
        self.parsers.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal sub-parser splitting on commas, recording offsets.
    struct CommaListParser;

    impl SubParser for CommaListParser {
        fn name(&self) -> &'static str {
            "comma-list"
        }

        fn parse(
            &self,
            source: &str,
            offset: usize,
            line: usize,
            _line_start_offset: usize,
        ) -> Result<SubTree, SubParserError> {
            if source.is_empty() {
                return Err(SubParserError {
                    message: "empty selector list".to_string(),
                    start: (line, offset),
                    end: (line, offset),
                });
            }
            let mut children = Vec::new();
            let mut cursor = offset;
            for part in source.split(',') {
                children.push(serde_json::json!({
                    "type": "item",
                    "start": cursor,
                    "end": cursor + part.len(),
                }));
                cursor += part.len() + 1;
            }
            Ok(SubTree(serde_json::json!({
                "type": "list",
                "start": offset,
                "end": offset + source.len(),
                "children": children,
            })))
        }

        fn node_type_key(&self) -> &'static str {
            "type"
        }

        fn child_node_keys(&self) -> &'static [&'static str] {
            &["children"]
        }

        fn start_offset(&self, node: &SubTree) -> usize {
            node.0["start"].as_u64().unwrap_or(0) as usize
        }

        fn end_offset(&self, node: &SubTree) -> usize {
            node.0["end"].as_u64().unwrap_or(0) as usize
        }
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = SubParserRegistry::new();
        assert!(registry.is_empty());
        registry.register("CosmeticRule.body.selector_list", Arc::new(CommaListParser));
        assert!(registry.has("CosmeticRule.body.selector_list"));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("NetworkRule.pattern").is_none());
    }

    #[test]
    fn unregister() {
        let mut registry = SubParserRegistry::new();
        registry.register("x", Arc::new(CommaListParser));
        assert!(registry.unregister("x"));
        assert!(!registry.unregister("x"));
    }

    #[test]
    fn offsets_are_visible_through_the_capability_set() {
        let parser = CommaListParser;
        let tree = parser.parse(".a,.b", 13, 1, 0).unwrap();
        assert_eq!(parser.start_offset(&tree), 13);
        assert_eq!(parser.end_offset(&tree), 18);
        assert_eq!(parser.node_type_key(), "type");
        assert_eq!(parser.child_node_keys(), &["children"]);
    }

    #[test]
    fn errors_carry_location() {
        let parser = CommaListParser;
        let err = parser.parse("", 5, 3, 100).unwrap_err();
        assert_eq!(err.start, (3, 5));
        assert_eq!(err.message, "empty selector list");
    }
}
