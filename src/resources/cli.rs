use super::require;
use crate::scheme::segment;
use crate::{Client, RequestSpec, Response, Result};

/// Administrative command issuance. Obtained from [`Client::cli`].
///
/// Commands are sent as plain text and the server's output comes back
/// unparsed.
pub struct Cli<'a> {
    client: &'a Client,
}

impl<'a> Cli<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Issue a command, optionally routed to `server`.
    pub async fn issue_command(
        &self,
        server: Option<&str>,
        command: &str,
    ) -> Result<Response<String>> {
        self.issue("issueCommand", server, command).await
    }

    /// Issue a command that would otherwise prompt for confirmation.
    pub async fn issue_confirmed_command(
        &self,
        server: Option<&str>,
        command: &str,
    ) -> Result<Response<String>> {
        self.issue("issueConfirmedCommand", server, command).await
    }

    async fn issue(
        &self,
        endpoint: &str,
        server: Option<&str>,
        command: &str,
    ) -> Result<Response<String>> {
        require(command, "command")?;

        let mut path = self.client.rules().cli_path(endpoint);
        if let Some(server) = server.filter(|s| !s.is_empty()) {
            path.push('/');
            path.push_str(&segment(server));
        }

        let request = self
            .client
            .build_text_request(&RequestSpec::post(path), command)?;

        let mut output = Vec::new();
        let response = self.client.execute_raw(request, &mut output).await?;
        Ok(response.map(|_| String::from_utf8_lossy(&output).into_owned()))
    }
}
