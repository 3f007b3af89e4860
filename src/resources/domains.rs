use super::require;
use crate::models::{DomainDetailRoot, DomainList};
use crate::scheme::segment;
use crate::{BackupDomain, Client, Response, Result};

/// Policy domain operations. Obtained from [`Client::domains`].
pub struct Domains<'a> {
    client: &'a Client,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List the policy domains of every managed server.
    pub async fn list(&self) -> Result<Response<DomainList>> {
        let path = self.client.rules().api_path("domains");
        self.client.get(path).await
    }

    /// Details of one policy domain on `server`.
    pub async fn get(&self, server: &str, domain: &str) -> Result<Response<BackupDomain>> {
        require(server, "serverName")?;
        require(domain, "domainName")?;

        let path = format!(
            "{}/domains/{}/details",
            self.client.rules().server_path(server),
            segment(domain)
        );
        let root: Response<DomainDetailRoot> = self.client.get(path).await?;
        Ok(root.map(|root| root.domaindetail))
    }
}
