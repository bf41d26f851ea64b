use anyhow::Result;
use async_trait::async_trait;

use super::{Command, Signature};

/// Prints the signatures registered before it.
pub(crate) struct ListCommand {
    signatures: Vec<Signature>,
}

impl ListCommand {
    pub(crate) const fn new(signatures: Vec<Signature>) -> Self {
        Self { signatures }
    }

    fn render(&self) -> String {
        let own = self.signature();
        let all: Vec<&Signature> = self.signatures.iter().chain(std::iter::once(&own)).collect();
        let width = all.iter().map(|s| s.name.len()).max().unwrap_or(0);
        all.iter()
            .map(|s| format!("  {:width$}  {}", s.name, s.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl Command for ListCommand {
    fn signature(&self) -> Signature {
        Signature { name: "list", description: "List available commands" }
    }

    async fn handle(&self) -> Result<()> {
        println!("Available commands:\n{}", self.render());
        Ok(())
    }
}
