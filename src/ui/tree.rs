use serde::{Deserialize, Serialize};

/// One on-screen element in an accessibility snapshot.
///
/// The OS-side bridge captures the whole tree into this value type before
/// sending it over, so the tree cannot change mid-traversal. The snapshot is
/// read-only here; nothing in this crate mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiNode {
    /// Accessible label (content description). Structural containers
    /// usually have none.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub label: Option<String>,
    #[serde(default)]
    pub selected: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<UiNode>,
}

/// Search a snapshot for a node whose label equals `label` and which is
/// currently selected. Exact string equality, no case folding.
///
/// Depth-first: checks the node itself, then its children in reverse index
/// order (last child first), returning on the first hit. The input tree is
/// acyclic by construction.
pub fn find_selected(label: &str, node: Option<&UiNode>) -> bool {
    let Some(node) = node else { return false };
    if node.selected && node.label.as_deref() == Some(label) {
        return true;
    }
    node.children
        .iter()
        .rev()
        .any(|child| find_selected(label, Some(child)))
}

/// Count nodes recursively.
pub fn count_nodes(node: &UiNode) -> usize {
    1 + node.children.iter().map(count_nodes).sum::<usize>()
}

/// Format a snapshot as compact indented text, one node per line.
pub fn format_compact(node: &UiNode) -> String {
    let mut out = String::new();
    format_node(&mut out, node, 0);
    out
}

fn format_node(out: &mut String, node: &UiNode, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push('[');
    match &node.label {
        Some(label) => out.push_str(&format!("\"{}\"", label)),
        None => out.push_str("el"),
    }
    if node.selected {
        out.push_str(" selected");
    }
    out.push_str("]\n");

    for child in &node.children {
        format_node(out, child, depth + 1);
    }
}
