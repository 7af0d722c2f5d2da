//! DNSimple API client.

use log::{debug, info};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::{ClientConfig, Credentials};
use crate::error::{Error, Result, classify_status};
use crate::http::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
use crate::types::{
    CreateDomainRequest, DomainPayload, DomainWrapper, TransferDomainRequest, TransferOrder,
    validate_domain_name,
};

/// Client bound to one account and one API host.
///
/// Credentials and configuration are fixed at construction. Every operation
/// performs its own request(s) and keeps nothing between calls. Synchronous
/// callers drive an operation to completion with a tokio runtime's
/// `block_on`, which blocks the calling thread until the exchange finishes.
pub struct DnsimpleClient<T: Transport = ReqwestTransport> {
    transport: T,
    credentials: Credentials,
    config: ClientConfig,
}

impl DnsimpleClient<ReqwestTransport> {
    /// Creates a client for the production API with default settings.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let credentials = Credentials::new(username, password)?;
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Creates a client with custom settings (API host, timeout, user agent).
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(credentials, config, transport))
    }
}

impl<T: Transport> DnsimpleClient<T> {
    pub fn with_transport(credentials: Credentials, config: ClientConfig, transport: T) -> Self {
        Self {
            transport,
            credentials,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    /// Lists every domain in the account, in the order the server returns them.
    #[tracing::instrument(skip(self))]
    pub async fn list_domains(&self) -> Result<Vec<DomainWrapper>> {
        let domains: Vec<DomainWrapper> = self.request(Method::Get, "/domains", None::<&()>).await?;
        debug!("Fetched {} domain(s)", domains.len());
        Ok(domains)
    }

    /// Fetches a single domain by name.
    #[tracing::instrument(skip(self))]
    pub async fn get_domain(&self, name: &str) -> Result<DomainWrapper> {
        validate_domain_name(name)?;
        self.request(Method::Get, &format!("/domains/{}", name), None::<&()>)
            .await
    }

    /// Registers a domain name.
    ///
    /// When `registrant_id` is `None`, the registrant of the first domain in
    /// the account is used. This costs an extra `list_domains` request and
    /// fails with [`Error::Precondition`] if the account has no domain to
    /// borrow a registrant from.
    ///
    /// Registration has real-world side effects and is not idempotent.
    #[tracing::instrument(skip(self))]
    pub async fn register_domain(
        &self,
        name: &str,
        registrant_id: Option<u64>,
    ) -> Result<DomainWrapper> {
        validate_domain_name(name)?;

        let registrant_id = match registrant_id {
            Some(id) => id,
            None => self.default_registrant_id().await?,
        };

        info!("Registering {} for registrant {}", name, registrant_id);

        let body = CreateDomainRequest {
            domain: DomainPayload {
                name: name.to_string(),
                registrant_id: Some(registrant_id),
            },
        };
        self.request(Method::Post, "/domains", Some(&body)).await
    }

    /// Adds a domain to the account without registering it.
    #[tracing::instrument(skip(self))]
    pub async fn add_domain(&self, name: &str) -> Result<DomainWrapper> {
        validate_domain_name(name)?;

        let body = CreateDomainRequest {
            domain: DomainPayload {
                name: name.to_string(),
                registrant_id: None,
            },
        };
        self.request(Method::Post, "/domains", Some(&body)).await
    }

    /// Transfers a domain from another registrar into the account.
    #[tracing::instrument(skip(self, auth_code))]
    pub async fn transfer_domain(
        &self,
        name: &str,
        registrant_id: u64,
        auth_code: &str,
    ) -> Result<DomainWrapper> {
        validate_domain_name(name)?;
        if auth_code.is_empty() {
            return Err(Error::InvalidArgument(
                "transfer authorization code must not be empty".into(),
            ));
        }

        info!("Transferring {} for registrant {}", name, registrant_id);

        let body = TransferDomainRequest {
            domain: DomainPayload {
                name: name.to_string(),
                registrant_id: Some(registrant_id),
            },
            transfer_order: TransferOrder {
                authinfo: auth_code.to_string(),
            },
        };
        self.request(Method::Post, "/domain_transfers", Some(&body))
            .await
    }

    /// Removes a domain from the account.
    #[tracing::instrument(skip(self))]
    pub async fn delete_domain(&self, name: &str) -> Result<()> {
        validate_domain_name(name)?;

        let response = self
            .send(Method::Delete, &format!("/domains/{}", name), None::<&()>)
            .await?;
        debug!("Deleted {} (HTTP {})", name, response.status);
        Ok(())
    }

    async fn default_registrant_id(&self) -> Result<u64> {
        debug!("No registrant given, using the first domain's registrant");

        let domains = self.list_domains().await?;
        let first = domains.first().ok_or_else(|| {
            Error::Precondition(
                "no registrant available to default to: the account has no domains".into(),
            )
        })?;

        first.domain.registrant_id.ok_or_else(|| {
            Error::Precondition(format!(
                "no registrant available to default to: {} has no registrant",
                first.domain.name
            ))
        })
    }

    /// Sends a request and decodes the JSON response body.
    async fn request<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.send(method, path, body).await?;

        serde_json::from_slice(&response.body).map_err(|e| Error::Protocol {
            message: format!("Failed to parse JSON response: {}", e),
            status: Some(response.status),
            body: String::from_utf8_lossy(&response.body).into_owned(),
        })
    }

    /// Sends a request and turns any non-2xx status into an error.
    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<HttpResponse>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.config.base_url(), path);
        let mut headers = self.config.default_headers();

        let body = match body {
            Some(body) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                let bytes = serde_json::to_vec(body).map_err(|e| Error::Protocol {
                    message: format!("Failed to encode request body: {}", e),
                    status: None,
                    body: String::new(),
                })?;
                Some(bytes)
            }
            None => None,
        };

        debug!("{} {}", method, url);

        let response = self
            .transport
            .send(HttpRequest {
                method,
                url,
                headers,
                auth: Some(self.credentials.clone()),
                body,
            })
            .await?;

        match classify_status(response.status, &response.body) {
            Some(err) => {
                debug!("{} {} failed: {}", method, path, err);
                Err(err)
            }
            None => Ok(response),
        }
    }
}
