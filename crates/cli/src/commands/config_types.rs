use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;

use super::{Command, Signature};
use crate::codegen;

pub(crate) struct ConfigTypesCommand {
    pub dir: PathBuf,
    pub out: PathBuf,
}

impl ConfigTypesCommand {
    pub(crate) const fn new(dir: PathBuf, out: PathBuf) -> Self {
        Self { dir, out }
    }
}

#[async_trait]
impl Command for ConfigTypesCommand {
    fn signature(&self) -> Signature {
        Signature { name: "config:types", description: "Generate Rust types from the configuration directory" }
    }

    async fn handle(&self) -> Result<()> {
        let modules = codegen::generate_to(&self.dir, &self.out)?;
        tracing::info!(dir = %self.dir.display(), modules, "config types generated");
        println!("Wrote {}", self.out.display());
        Ok(())
    }
}
