use serde::Serialize;

use super::require;
use crate::models::{ClientAtRiskRoot, ClientDetailRoot, ClientList};
use crate::scheme::segment;
use crate::{
    BackupClient, BackupClientAtRisk, Client, ClientSchedule, Error, Flag, RegisterClientRequest,
    RequestSpec, Response, Result, UpdateClientRequest,
};

#[derive(Serialize)]
struct DefineScheduleBody<'a> {
    defineschedule: ScheduleName<'a>,
}

#[derive(Serialize)]
struct ScheduleName<'a> {
    schedule: &'a str,
}

#[derive(Serialize)]
struct UpdatePasswordBody<'a> {
    updatepassword: Password<'a>,
}

#[derive(Serialize)]
struct Password<'a> {
    password: &'a str,
}

/// Backup client (node) operations. Obtained from [`Client::clients`].
///
/// Lock, unlock, decommission, schedule assignment and password changes have
/// dedicated endpoints in the 7.1.4 layout. In the 8.1.0 layout the same
/// intent is sent as an [`UpdateClientRequest`]. The wrapper picks the right
/// form from the client's [`SchemeRules`](crate::SchemeRules).
pub struct BackupClients<'a> {
    client: &'a Client,
}

impl<'a> BackupClients<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// List every backup client.
    pub async fn list(&self) -> Result<Response<ClientList>> {
        let path = self.client.rules().api_path("clients");
        self.client.get(path).await
    }

    /// Details of a single backup client.
    pub async fn details(&self, server: &str, client: &str) -> Result<Response<BackupClient>> {
        require(server, "serverName")?;
        require(client, "clientName")?;

        let path = self.client.rules().client_path(server, client);
        let root: Response<ClientDetailRoot> = self.client.get(path).await?;
        Ok(root.map(|root| root.clientdetail))
    }

    /// At-risk status of a single backup client.
    pub async fn at_risk(
        &self,
        server: &str,
        client: &str,
    ) -> Result<Response<BackupClientAtRisk>> {
        require(server, "serverName")?;
        require(client, "clientName")?;

        let path = format!("{}/atrisk", self.client.rules().client_path(server, client));
        let root: Response<ClientAtRiskRoot> = self.client.get(path).await?;
        Ok(root.map(|root| root.clientatrisk))
    }

    /// Register a new node on `server`.
    pub async fn register(
        &self,
        server: &str,
        registration: &RegisterClientRequest,
    ) -> Result<Response<()>> {
        require(server, "serverName")?;
        require(&registration.name, "name")?;

        let path = format!("{}/clients", self.client.rules().server_path(server));
        self.client
            .submit(RequestSpec::post(path), Some(registration))
            .await
    }

    /// Prevent a node from accessing the server.
    pub async fn lock(&self, server: &str, client: &str) -> Result<Response<()>> {
        self.action::<()>(
            server,
            client,
            "lock",
            None,
            UpdateClientRequest {
                lock: Some(Flag::Yes),
                ..Default::default()
            },
        )
        .await
    }

    /// Allow a locked node to access the server again.
    pub async fn unlock(&self, server: &str, client: &str) -> Result<Response<()>> {
        self.action::<()>(
            server,
            client,
            "unlock",
            None,
            UpdateClientRequest {
                lock: Some(Flag::No),
                ..Default::default()
            },
        )
        .await
    }

    /// Decommission a node.
    pub async fn decommission(&self, server: &str, client: &str) -> Result<Response<()>> {
        self.action::<()>(
            server,
            client,
            "decommissionclient",
            None,
            UpdateClientRequest {
                decommission: Some(Flag::Yes),
                ..Default::default()
            },
        )
        .await
    }

    /// Associate a node with a client schedule.
    ///
    /// The 7.1.4 layout cannot move a node to another policy domain, so
    /// `domain` is ignored there. The 8.1.0 layout requires it.
    pub async fn assign_schedule(
        &self,
        server: &str,
        client: &str,
        domain: &str,
        schedule: &str,
    ) -> Result<Response<()>> {
        require(server, "serverName")?;
        require(client, "clientName")?;
        require(schedule, "scheduleName")?;
        if self.client.rules().schedule_domain_required() {
            require(domain, "scheduleDomain")?;
        }

        let body = DefineScheduleBody {
            defineschedule: ScheduleName { schedule },
        };
        self.action(
            server,
            client,
            "assignschedule",
            Some(&body),
            UpdateClientRequest {
                schedule: Some(ClientSchedule {
                    domain: domain.to_string(),
                    schedule: schedule.to_string(),
                }),
                ..Default::default()
            },
        )
        .await
    }

    /// Change a node's password.
    pub async fn update_password(
        &self,
        server: &str,
        client: &str,
        password: &str,
    ) -> Result<Response<()>> {
        require(server, "serverName")?;
        require(client, "clientName")?;
        require(password, "password")?;

        let body = UpdatePasswordBody {
            updatepassword: Password { password },
        };
        self.action(
            server,
            client,
            "passwords",
            Some(&body),
            UpdateClientRequest {
                password: Some(password.to_string()),
                ..Default::default()
            },
        )
        .await
    }

    /// Decommission a virtual machine backed up by a data mover node.
    pub async fn decommission_vm(
        &self,
        server: &str,
        client: &str,
        vm: &str,
    ) -> Result<Response<()>> {
        require(server, "serverName")?;
        require(client, "clientName")?;
        require(vm, "vmName")?;

        let rules = self.client.rules();
        let path = format!(
            "{}/{}/{}/decommissionclient",
            rules.client_path(server, client),
            rules.vm_segment(),
            segment(vm)
        );
        self.client.submit::<()>(RequestSpec::put(path), None).await
    }

    /// Apply a general update document to a node (8.1.0 layout only).
    pub async fn update(
        &self,
        server: &str,
        client: &str,
        update: &UpdateClientRequest,
    ) -> Result<Response<()>> {
        let rules = self.client.rules();
        if !rules.has_general_client_update() {
            return Err(Error::Unsupported {
                operation: "update",
                scheme: rules.scheme(),
            });
        }

        require(server, "serverName")?;
        require(client, "clientName")?;

        let path = rules.client_path(server, client);
        self.client.submit(RequestSpec::put(path), Some(update)).await
    }

    /// Either `PUT` the dedicated `action` sub-resource, or send `fallback`
    /// as a general update when the scheme has no such endpoint.
    async fn action<B>(
        &self,
        server: &str,
        client: &str,
        action: &str,
        body: Option<&B>,
        fallback: UpdateClientRequest,
    ) -> Result<Response<()>>
    where
        B: Serialize + ?Sized,
    {
        require(server, "serverName")?;
        require(client, "clientName")?;

        let rules = self.client.rules();
        if !rules.has_dedicated_client_actions() {
            return self.update(server, client, &fallback).await;
        }

        let path = format!("{}/{}", rules.client_path(server, client), action);
        self.client.submit(RequestSpec::put(path), body).await
    }
}
