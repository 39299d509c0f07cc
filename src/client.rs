use crate::query::SearchParams;
use anyhow::Context;
use async_trait::async_trait;
use derive_more::{Display, Error};
use mall_types::product::ProductsResponse;
use mall_types::recipient::{Contact, MallUser, ProspectsResponse, UsersResponse};
use mall_types::settings::{MallSettings, MallSettingsResponse, PageConfig, PageConfigResponse};
use reqwest::cookie::Jar;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

const PRODUCTS_PATH: &str = "/api/public/products";
const MALL_SETTINGS_PATH: &str = "/api/public/mall-settings";
const PAGE_CONFIG_PATH: &str = "/api/public/page-config";
const CRUISE_GUIDE_USERS_PATH: &str = "/api/admin/cruise-guide-users";
const TEST_USERS_PATH: &str = "/api/admin/test-users";
const MALL_USERS_PATH: &str = "/api/admin/mall-users";
const PROSPECTS_PATH: &str = "/api/admin/prospects";

const DIRECTORY_LIMIT: &str = "1000";
const NO_QUERY: &[(&str, &str)] = &[];

#[derive(Debug, Display, Error)]
pub enum ClientError {
    #[display("Network error: {_0}")]
    Network(reqwest::Error),
    #[display("Unexpected response status {_0}")]
    #[error(ignore)]
    Status(StatusCode),
    #[display("API error: {_0}")]
    #[error(ignore)]
    Api(String),
    Other(anyhow::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err)
    }
}

impl From<anyhow::Error> for ClientError {
    fn from(err: anyhow::Error) -> Self {
        ClientError::Other(err)
    }
}

#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn search_products(&self, params: &SearchParams) -> Result<ProductsResponse, ClientError>;
}

/// Admin user listings the messaging page picks recipients from.
#[async_trait]
pub trait RecipientSource: Send + Sync {
    async fn cruise_guide_users(&self) -> Result<Vec<Contact>, ClientError>;
    async fn test_users(&self) -> Result<Vec<Contact>, ClientError>;
    async fn mall_users(&self, email_only: bool) -> Result<Vec<MallUser>, ClientError>;
    async fn prospects(&self) -> Result<Vec<Contact>, ClientError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// REST client of the mall backend. All requests share one cookie jar so an
/// admin session cookie set once is sent everywhere.
#[derive(Clone)]
pub struct MallClient {
    client: reqwest::Client,
    cookies: Arc<Jar>,
    base: Url,
}

impl MallClient {
    pub fn new<S: AsRef<str>>(base: S) -> Result<Self, anyhow::Error> {
        let base = Url::parse(base.as_ref())
            .with_context(|| format!("Invalid mall API base {}", base.as_ref()))?;
        let cookies = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(cookies.clone())
            .gzip(true)
            .build()
            .context("Unable to build HTTP client")?;
        Ok(Self {
            client,
            cookies,
            base,
        })
    }

    /// Adds a `name=value` cookie for the API host.
    pub fn add_cookie(&self, cookie: &str) {
        self.cookies.add_cookie_str(cookie, &self.base);
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self
            .base
            .join(path)
            .with_context(|| format!("Unable to build URL for {path}"))?)
    }

    async fn get_json<T, Q>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        log::debug!("GET {url}");
        let res = self.client.get(url).query(query).send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorBody>(&text) {
                Ok(ErrorBody { error: Some(msg) }) => ClientError::Api(msg),
                _ => ClientError::Status(status),
            });
        }
        Ok(serde_json::from_str(&text)
            .with_context(|| format!("Unable to deserialize response of {path}"))?)
    }

    pub async fn mall_settings(&self) -> Result<MallSettings, ClientError> {
        let res: MallSettingsResponse = self.get_json(MALL_SETTINGS_PATH, NO_QUERY).await?;
        ensure_ok(res.ok, res.error)?;
        Ok(res.settings.unwrap_or_default())
    }

    pub async fn page_config(&self) -> Result<PageConfig, ClientError> {
        let res: PageConfigResponse = self.get_json(PAGE_CONFIG_PATH, NO_QUERY).await?;
        ensure_ok(res.ok, res.error)?;
        Ok(res.config.unwrap_or_default())
    }

    async fn users<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, ClientError> {
        let res: UsersResponse<T> = self.get_json(path, query).await?;
        ensure_ok(res.ok, res.error)?;
        Ok(res.users)
    }
}

fn ensure_ok(ok: bool, error: Option<String>) -> Result<(), ClientError> {
    if ok {
        Ok(())
    } else {
        Err(ClientError::Api(
            error.unwrap_or_else(|| "request was not accepted".to_string()),
        ))
    }
}

#[async_trait]
impl ProductSource for MallClient {
    async fn search_products(&self, params: &SearchParams) -> Result<ProductsResponse, ClientError> {
        let res: ProductsResponse = self.get_json(PRODUCTS_PATH, params).await?;
        ensure_ok(res.ok, res.error.clone())?;
        Ok(res)
    }
}

#[async_trait]
impl RecipientSource for MallClient {
    async fn cruise_guide_users(&self) -> Result<Vec<Contact>, ClientError> {
        self.users(CRUISE_GUIDE_USERS_PATH, &[("limit", DIRECTORY_LIMIT)])
            .await
    }

    async fn test_users(&self) -> Result<Vec<Contact>, ClientError> {
        self.users(TEST_USERS_PATH, &[("limit", DIRECTORY_LIMIT)]).await
    }

    async fn mall_users(&self, email_only: bool) -> Result<Vec<MallUser>, ClientError> {
        let query: &[(&str, &str)] = if email_only {
            &[("emailOnly", "true")]
        } else {
            NO_QUERY
        };
        self.users(MALL_USERS_PATH, query).await
    }

    async fn prospects(&self) -> Result<Vec<Contact>, ClientError> {
        let res: ProspectsResponse = self
            .get_json(PROSPECTS_PATH, &[("activeOnly", "true")])
            .await?;
        ensure_ok(res.ok, res.error)?;
        Ok(res.prospects)
    }
}
