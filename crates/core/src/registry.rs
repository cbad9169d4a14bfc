//! Font identity to state mapping.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use log::debug;

use crate::{IftState, config::ResolveOptions};

/// Holds at most one [`IftState`] per font identifier.
///
/// Owned by the application context; entries live as long as the registry.
#[derive(Debug, Default)]
pub struct StateRegistry {
    options: ResolveOptions,
    states: Mutex<HashMap<String, Arc<IftState>>>,
}

impl StateRegistry {
    pub fn new(options: ResolveOptions) -> Self {
        Self { options, states: Mutex::default() }
    }

    fn states(&self) -> MutexGuard<'_, HashMap<String, Arc<IftState>>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the state for `font_id`, creating an empty one on first use.
    ///
    /// Lookup and insertion happen under one lock, so concurrent callers
    /// always observe the same state object.
    pub fn get_or_create(&self, font_id: &str) -> Arc<IftState> {
        let mut states = self.states();
        if let Some(state) = states.get(font_id) {
            return state.clone();
        }
        debug!("Creating state for font '{font_id}'");
        let state = Arc::new(IftState::new(font_id, self.options));
        states.insert(font_id.to_string(), state.clone());
        state
    }

    pub fn get(&self, font_id: &str) -> Option<Arc<IftState>> {
        self.states().get(font_id).cloned()
    }

    pub fn font_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.states().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.states().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_get_or_create_returns_same_state() {
        let registry = StateRegistry::default();
        let a = registry.get_or_create("Roboto");
        let b = registry.get_or_create("Roboto");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_states_are_per_font() {
        let registry = StateRegistry::default();
        let a = registry.get_or_create("Roboto");
        let b = registry.get_or_create("NotoSans");
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.font_ids(), vec!["NotoSans", "Roboto"]);
        assert!(registry.get("NotoSerif").is_none());
    }

    #[test]
    fn test_options_propagate() {
        let registry = StateRegistry::new(ResolveOptions::new().max_iterations(3));
        assert_eq!(registry.get_or_create("font").options().max_iterations, 3);
    }

    #[test]
    fn test_concurrent_creation_yields_one_state() {
        let registry = StateRegistry::default();
        let states: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> =
                (0..8).map(|_| scope.spawn(|| registry.get_or_create("shared"))).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(states.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
        assert_eq!(registry.len(), 1);
    }
}
