//! Applies pending migrations for the configured backend.
//!
//! Both backends migrate on connect; this command connects and reports.

use anyhow::Result;
use async_trait::async_trait;
use kaname_storage::{StorageBackend, UserStore};

use super::{Command, Context, Signature};

pub(crate) struct MigrateCommand {
    ctx: Context,
}

impl MigrateCommand {
    pub(crate) const fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Command for MigrateCommand {
    fn signature(&self) -> Signature {
        Signature { name: "migrate", description: "Apply database migrations and exit" }
    }

    async fn handle(&self) -> Result<()> {
        let config = self.ctx.load_config()?;
        let storage = StorageBackend::connect(&config.database).await?;
        storage.ping().await?;
        println!("Migrations applied ({} backend)", storage.kind());
        Ok(())
    }
}
