//! Command implementations.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use gatehouse_core::router::ROOT_PATH;
use gatehouse_core::{ApiClient, ApiError, AuthStore, Config, Navigator, RouteTable};

/// Server endpoint exchanging credentials for a token
const LOGIN_ENDPOINT: &str = "/auth/login";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    username: Option<String>,
}

pub struct App {
    config: Config,
    auth: AuthStore,
    navigator: Arc<Navigator>,
}

impl App {
    pub fn new(mode: Option<&str>) -> Result<Self> {
        let mut config = Config::load()?;
        if let Some(mode) = mode {
            config.mode = mode.parse()?;
        }
        debug!(?config, "Configuration loaded");

        let auth = AuthStore::new(config.open_storage()?);
        let navigator = Arc::new(Navigator::new(RouteTable::default(), auth.clone()));

        Ok(Self {
            config,
            auth,
            navigator,
        })
    }

    /// Build the API client; production mode needs an origin, so this is
    /// only done by commands that talk to the server.
    fn api(&self) -> Result<ApiClient> {
        ApiClient::new(
            self.config.api_base_url()?,
            self.config.request_timeout(),
            self.auth.clone(),
            self.navigator.clone(),
        )
    }

    pub async fn login(&self, username: &str, token: Option<String>) -> Result<()> {
        let (token, username) = match token {
            Some(token) => (token, username.to_string()),
            None => {
                let password = rpassword::prompt_password("Password: ")?;
                let body = serde_json::json!({ "username": username, "password": password });
                let response: LoginResponse = self
                    .api()?
                    .post(LOGIN_ENDPOINT, &body)
                    .await
                    .context("Login failed")?;
                let username = response.username.unwrap_or_else(|| username.to_string());
                (response.token, username)
            }
        };

        self.auth.login(&token, &username);
        let route = self.navigator.push(ROOT_PATH)?;
        println!("Logged in as {} ({})", username, route.path);
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.auth.logout();
        let route = self.navigator.push(ROOT_PATH)?;
        println!("Logged out ({})", route.path);
        Ok(())
    }

    pub fn status(&self) {
        match self.auth.username() {
            Some(username) if self.auth.is_authenticated() => println!("Logged in as {}", username),
            _ => println!("Not logged in"),
        }
    }

    pub fn open(&self, path: &str) -> Result<()> {
        let route = self.navigator.push(path)?;
        if route.path != path {
            println!("{} -> {} ({})", path, route.path, route.name);
        } else {
            println!("{} ({})", route.path, route.name);
        }
        Ok(())
    }

    pub async fn get(&self, endpoint: &str) -> Result<()> {
        let result = self.api()?.get::<serde_json::Value>(endpoint).await;
        self.print_result(result)
    }

    pub async fn post(&self, endpoint: &str, body: &str) -> Result<()> {
        let body: serde_json::Value =
            serde_json::from_str(body).context("Request body is not valid JSON")?;
        let result = self.api()?.post::<serde_json::Value, _>(endpoint, &body).await;
        self.print_result(result)
    }

    fn print_result(&self, result: Result<serde_json::Value, ApiError>) -> Result<()> {
        match result {
            Ok(value) => {
                println!("{}", serde_json::to_string_pretty(&value)?);
                Ok(())
            }
            Err(ApiError::Unauthorized) => {
                if let Some(route) = self.navigator.current() {
                    eprintln!("Session ended, redirected to {}", route.path);
                }
                Err(ApiError::Unauthorized.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
