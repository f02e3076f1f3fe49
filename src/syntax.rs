use std::fmt;

/// Adblock syntax dialect of a parsed rule.
///
/// `Common` means the rule is valid in every dialect the parser knows about;
/// the generator and several rules use the tag to pick dialect-specific
/// behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdblockSyntax {
    /// Adblock Plus
    Abp,
    /// uBlock Origin
    Ubo,
    /// AdGuard
    Adg,
    /// Undetermined / dialect-independent
    Common,
}

impl fmt::Display for AdblockSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdblockSyntax::Abp => "AdblockPlus",
            AdblockSyntax::Ubo => "uBlockOrigin",
            AdblockSyntax::Adg => "AdGuard",
            AdblockSyntax::Common => "Common",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(format!("{}", AdblockSyntax::Abp), "AdblockPlus");
        assert_eq!(format!("{}", AdblockSyntax::Ubo), "uBlockOrigin");
        assert_eq!(format!("{}", AdblockSyntax::Adg), "AdGuard");
        assert_eq!(format!("{}", AdblockSyntax::Common), "Common");
    }
}
