#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use crate::aliases::{self, AliasRegistry, Component};

    #[test]
    fn legacy_names_resolve_to_their_components() {
        let registry = AliasRegistry::new();
        registry.install_legacy();

        assert_eq!(registry.resolve("BaseInteractor"), Some(Component::Interactor));
        assert_eq!(registry.resolve("BaseService"), Some(Component::Interactor));
        assert_eq!(registry.resolve("BaseContract"), Some(Component::Contract));
        assert_eq!(registry.resolve("Unknown"), None);
    }

    #[test]
    fn existing_names_are_never_overwritten() {
        let registry = AliasRegistry::new();

        assert!(registry.register("BaseService", Component::Contract));
        registry.install_legacy();

        assert_eq!(registry.resolve("BaseService"), Some(Component::Contract));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn global_installation_is_idempotent() {
        aliases::install_legacy_aliases();
        aliases::install_legacy_aliases();

        assert_eq!(
            aliases::registry().resolve("BaseInteractor"),
            Some(Component::Interactor)
        );
    }

    #[test]
    fn concurrent_registrations_keep_the_first_winner() {
        let registry = Arc::new(AliasRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                let component = if i % 2 == 0 {
                    Component::Interactor
                } else {
                    Component::Contract
                };
                thread::spawn(move || (component, registry.register("Shared", component)))
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("thread finished"))
            .collect();

        let winners: Vec<_> = results.iter().filter(|(_, added)| *added).collect();
        assert_eq!(winners.len(), 1);
        assert_eq!(registry.resolve("Shared"), Some(winners[0].0));
    }
}
