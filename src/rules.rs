//! Static table of surface-blocking rules.

pub const INSTAGRAM_PACKAGE: &str = "com.instagram.android";

/// The one side effect a rule may request. The OS-side bridge translates it
/// into the platform's global back command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NavigateBack,
}

#[derive(Debug, PartialEq, Eq)]
pub struct BlockRule {
    /// CLI-facing rule name.
    pub name: &'static str,
    /// Preference key gating the rule.
    pub pref_key: &'static str,
    /// Package the rule applies to.
    pub package: &'static str,
    /// Accessible label of the surface's tab node.
    pub label: &'static str,
}

/// Evaluation order is load-bearing: the first rule to match wins the event
/// and the rest are not consulted.
pub const RULES: &[BlockRule] = &[
    BlockRule {
        name: "explore",
        pref_key: "block_instagram_explore_enabled",
        package: INSTAGRAM_PACKAGE,
        label: "Search and explore",
    },
    BlockRule {
        name: "reels",
        pref_key: "block_instagram_reels_enabled",
        package: INSTAGRAM_PACKAGE,
        label: "Reels",
    },
];

/// Look up a rule by its CLI name.
pub fn rule_by_name(name: &str) -> Option<&'static BlockRule> {
    RULES.iter().find(|rule| rule.name == name)
}
