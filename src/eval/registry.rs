use std::collections::HashMap;

use crate::apps::{self, Registered};
use crate::config::Config;

/// Registry of all applications, keyed by the name a call uses.
pub struct ApplicationRegistry {
    apps: HashMap<String, Registered>,
}

impl ApplicationRegistry {
    /// Build the registry from configuration: every builtin except the
    /// names listed in `applications.disabled`.
    pub fn from_config(config: &Config) -> Self {
        let disabled = &config.applications.disabled;
        let apps = apps::builtins()
            .into_iter()
            .filter(|(name, _)| !disabled.iter().any(|d| d == name))
            .map(|(name, app)| (name.to_string(), app))
            .collect();
        Self { apps }
    }

    /// Install an application, replacing any existing entry of that name.
    pub fn register(&mut self, name: impl Into<String>, app: Registered) {
        self.apps.insert(name.into(), app);
    }

    pub fn get(&self, name: &str) -> Option<&Registered> {
        self.apps.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.apps.contains_key(name)
    }

    /// Registered names, sorted.
    #[cfg(test)]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.apps.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::{AppError, Application, Context};

    struct Noop;

    impl Application for Noop {
        fn run(&self, _ctx: Context<'_>) -> Result<(), AppError> {
            Ok(())
        }
    }

    #[test]
    fn default_registry_has_every_builtin() {
        let registry = ApplicationRegistry::from_config(&Config::default_config());
        assert_eq!(registry.names().len(), apps::builtins().len());
        assert!(registry.contains("cd"));
        assert!(matches!(registry.get("cd"), Some(Registered::Stateful(_))));
        assert!(matches!(registry.get("echo"), Some(Registered::Stateless(_))));
    }

    #[test]
    fn disabled_builtins_are_left_out() {
        let mut config = Config::default_config();
        config.applications.disabled = vec!["rm".into(), "mv".into()];
        let registry = ApplicationRegistry::from_config(&config);
        assert!(!registry.contains("rm"));
        assert!(!registry.contains("mv"));
        assert!(registry.contains("mkdir"));
    }

    #[test]
    fn register_adds_and_replaces() {
        let mut registry = ApplicationRegistry::from_config(&Config::default_config());
        registry.register("noop", Registered::Stateless(Box::new(Noop)));
        assert!(registry.contains("noop"));
        registry.register("cd", Registered::Stateless(Box::new(Noop)));
        assert!(matches!(registry.get("cd"), Some(Registered::Stateless(_))));
    }
}
