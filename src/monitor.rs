//! Per-event rule evaluation.

use crate::prefs::PrefStore;
use crate::rules::{Action, BlockRule, RULES};
use crate::ui::tree::{find_selected, UiNode};

/// One UI-change notification as delivered by the OS-side bridge. Both
/// fields can be absent: events without an active window carry no tree.
#[derive(Debug, Clone, Default)]
pub struct UiEvent {
    pub package_name: Option<String>,
    pub tree: Option<UiNode>,
}

/// Evaluates the rule table against incoming accessibility events.
///
/// Holds only the injected preference store. Flags are read fresh on every
/// event, so a toggle flip takes effect on the next event without any
/// cache invalidation.
pub struct Monitor<S: PrefStore> {
    prefs: S,
}

impl<S: PrefStore> Monitor<S> {
    pub fn new(prefs: S) -> Self {
        Self { prefs }
    }

    pub fn prefs(&self) -> &S {
        &self.prefs
    }

    /// Evaluate one event against the rule table, in table order.
    ///
    /// Returns the action to perform and the rule that produced it, or
    /// `None` when nothing matched. At most one rule fires per event; the
    /// first match short-circuits the rest. Absent inputs are no-ops, not
    /// errors.
    pub fn on_event(&self, event: &UiEvent) -> Option<(Action, &'static BlockRule)> {
        let tree = event.tree.as_ref()?;

        for rule in RULES {
            if event.package_name.as_deref() != Some(rule.package) {
                continue;
            }
            let enabled = self.prefs.get_bool(rule.pref_key, false);
            tracing::debug!(rule = rule.name, enabled, "rule flag read");
            if enabled && find_selected(rule.label, Some(tree)) {
                return Some((Action::NavigateBack, rule));
            }
        }

        None
    }
}
