use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use kaname_http::AppState;
use kaname_service::Container;

use super::{Command, Context, Signature};

pub(crate) struct ServeCommand {
    ctx: Context,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl ServeCommand {
    pub(crate) const fn new(ctx: Context) -> Self {
        Self { ctx, host: None, port: None }
    }
}

#[async_trait]
impl Command for ServeCommand {
    fn signature(&self) -> Signature {
        Signature { name: "serve", description: "Run the HTTP server" }
    }

    async fn handle(&self) -> Result<()> {
        let mut config = self.ctx.load_config()?;
        if let Some(host) = &self.host {
            config.app.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.app.port = port;
        }
        let (host, port) = (config.app.host.clone(), config.app.port);

        let container = Container::build(config).await?;
        let state = Arc::new(AppState::new(container));
        kaname_http::serve(state, &host, port).await
    }
}
