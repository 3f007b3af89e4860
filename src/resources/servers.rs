use super::require;
use crate::models::{ServerDetailRoot, ServerList};
use crate::{BackupServer, Client, Response, Result};

/// Backup server operations. Obtained from [`Client::servers`].
pub struct Servers<'a> {
    client: &'a Client,
}

impl<'a> Servers<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List all backup servers known to the Operations Center.
    pub async fn list(&self) -> Result<Response<ServerList>> {
        let path = self.client.rules().servers_path();
        self.client.get(path).await
    }

    /// Details of a single backup server.
    pub async fn get(&self, server: &str) -> Result<Response<BackupServer>> {
        require(server, "serverName")?;

        let path = format!("{}/details", self.client.rules().server_path(server));
        let root: Response<ServerDetailRoot> = self.client.get(path).await?;
        Ok(root.map(|root| root.serverdetail))
    }
}
