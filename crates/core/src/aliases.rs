use std::sync::LazyLock;

use dashmap::{DashMap, mapref::entry::Entry};
use tracing::debug;

/// Building blocks a legacy name can stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Interactor,
    Contract,
}

/// Lookup table from alternate names to components.
#[derive(Debug, Default)]
pub struct AliasRegistry {
    names: DashMap<String, Component>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` unless it is already taken. Returns whether it was added.
    pub fn register(&self, name: &str, component: Component) -> bool {
        match self.names.entry(name.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(component);
                true
            }
            Entry::Occupied(_) => {
                debug!(name, "alias already defined; keeping existing entry");
                false
            }
        }
    }

    pub fn resolve(&self, name: &str) -> Option<Component> {
        self.names.get(name).map(|entry| *entry.value())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The names existing host code uses for the interactor base and its contract.
    pub fn install_legacy(&self) {
        self.register("BaseInteractor", Component::Interactor);
        self.register("BaseService", Component::Interactor);
        self.register("BaseContract", Component::Contract);
    }
}

static GLOBAL: LazyLock<AliasRegistry> = LazyLock::new(AliasRegistry::new);

pub fn registry() -> &'static AliasRegistry {
    &GLOBAL
}

/// Startup step: register the legacy names in the process-wide table.
pub fn install_legacy_aliases() {
    registry().install_legacy();
}
