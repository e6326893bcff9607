//! Upstream state providers
//!
//! Sub-components that describe some aspect of the agent's situation as
//! text. The selector reads them; it never owns or mutates them.

use indexmap::IndexMap;
use std::sync::Arc;

/// A named source of textual agent state
pub trait StateProvider: Send + Sync {
    /// Current textual state. Must not have side effects.
    fn read_context(&self) -> String;
}

impl<F> StateProvider for F
where
    F: Fn() -> String + Send + Sync,
{
    fn read_context(&self) -> String {
        self()
    }
}

/// Providers keyed by name, iterated in insertion order
pub type ComponentMap = IndexMap<String, Arc<dyn StateProvider>>;

/// Provider that always reports the same text
#[derive(Debug, Clone)]
pub struct ConstantState {
    text: String,
}

impl ConstantState {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl StateProvider for ConstantState {
    fn read_context(&self) -> String {
        self.text.clone()
    }
}

/// Render every provider as `"<agent>'s <key>:\n<text>"`, newline-joined.
pub fn render_component_states(agent_name: &str, components: &ComponentMap) -> String {
    components
        .iter()
        .map(|(key, component)| {
            format!("{}'s {}:\n{}", agent_name, key, component.read_context())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_preserves_insertion_order() {
        let mut components = ComponentMap::new();
        components.insert(
            "observation".to_string(),
            Arc::new(ConstantState::new("It is raining.")),
        );
        components.insert(
            "identity".to_string(),
            Arc::new(ConstantState::new("A baker.")),
        );

        let rendered = render_component_states("Alice", &components);
        assert_eq!(
            rendered,
            "Alice's observation:\nIt is raining.\nAlice's identity:\nA baker."
        );
    }

    #[test]
    fn test_empty_components_render_empty_block() {
        let components = ComponentMap::new();
        assert_eq!(render_component_states("Alice", &components), "");
    }

    #[test]
    fn test_closure_provider() {
        let provider: Arc<dyn StateProvider> = Arc::new(|| "hungry".to_string());
        assert_eq!(provider.read_context(), "hungry");
    }
}
