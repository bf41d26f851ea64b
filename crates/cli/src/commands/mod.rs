//! Console command framework.
//!
//! Every command carries a [`Signature`] and an async `handle`. Commands are
//! registered once in a [`CommandRegistry`] which dispatches by name.

pub(crate) mod config_types;
pub(crate) mod list;
pub(crate) mod migrate;
pub(crate) mod serve;
pub(crate) mod tinker;

use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use kaname_core::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Signature {
    pub name: &'static str,
    pub description: &'static str,
}

#[async_trait]
pub(crate) trait Command: Send + Sync {
    fn signature(&self) -> Signature;

    async fn handle(&self) -> Result<()>;
}

/// Shared inputs resolved from the global CLI flags.
#[derive(Debug, Clone)]
pub(crate) struct Context {
    pub config_dir: PathBuf,
}

impl Context {
    pub(crate) const fn new(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub(crate) fn load_config(&self) -> Result<AppConfig> {
        Ok(AppConfig::load(&self.config_dir)?)
    }
}

#[derive(Default)]
pub(crate) struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
}

impl CommandRegistry {
    pub(crate) fn register(&mut self, command: impl Command + 'static) -> &mut Self {
        self.commands.push(Box::new(command));
        self
    }

    pub(crate) fn signatures(&self) -> Vec<Signature> {
        self.commands.iter().map(|c| c.signature()).collect()
    }

    pub(crate) fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.iter().find(|c| c.signature().name == name).map(AsRef::as_ref)
    }

    pub(crate) async fn run(&self, name: &str) -> Result<()> {
        let command = self.get(name).ok_or_else(|| anyhow::anyhow!("unknown command: {name}"))?;
        tracing::debug!(command = name, "running command");
        command.handle().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Counting {
        name: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Command for Counting {
        fn signature(&self) -> Signature {
            Signature { name: self.name, description: "counts calls" }
        }

        async fn handle(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_registry_dispatches_by_name() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let mut registry = CommandRegistry::default();
        registry
            .register(Counting { name: "one", calls: Arc::clone(&first) })
            .register(Counting { name: "two", calls: Arc::clone(&second) });

        registry.run("two").await.unwrap();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);

        let names: Vec<_> = registry.signatures().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_registry_unknown_command() {
        let registry = CommandRegistry::default();
        let err = registry.run("nope").await.unwrap_err();
        assert_eq!(err.to_string(), "unknown command: nope");
    }
}
