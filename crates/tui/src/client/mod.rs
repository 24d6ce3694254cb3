use api_types::expense::{Expense, ExpenseDeleted, ExpenseNew};
use reqwest::Url;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Client-side failure taxonomy.
///
/// `Validation` mirrors the server's 400 responses and is never retried
/// automatically; `Server` covers 5xx outcomes; `Transport` means the
/// request never got an answer at all.
#[derive(Debug)]
pub enum ClientError {
    Validation(String),
    Server(String),
    Transport(reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::Terminal(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    pub async fn expenses_list(&self) -> std::result::Result<Vec<Expense>, ClientError> {
        let endpoint = self.endpoint("api/expenses")?;

        let res = self
            .http
            .get(endpoint)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if res.status().is_success() {
            return res
                .json::<Vec<Expense>>()
                .await
                .map_err(ClientError::Transport);
        }
        Err(Self::error_for(res).await)
    }

    pub async fn expense_create(
        &self,
        payload: &ExpenseNew,
    ) -> std::result::Result<Expense, ClientError> {
        let endpoint = self.endpoint("api/expenses")?;

        let res = self
            .http
            .post(endpoint)
            .json(payload)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if res.status().is_success() {
            return res.json::<Expense>().await.map_err(ClientError::Transport);
        }
        Err(Self::error_for(res).await)
    }

    pub async fn expense_delete(
        &self,
        id: Uuid,
    ) -> std::result::Result<ExpenseDeleted, ClientError> {
        let endpoint = self.endpoint(&format!("api/expenses/{id}"))?;

        let res = self
            .http
            .delete(endpoint)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if res.status().is_success() {
            return res
                .json::<ExpenseDeleted>()
                .await
                .map_err(ClientError::Transport);
        }
        Err(Self::error_for(res).await)
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))
    }

    async fn error_for(res: reqwest::Response) -> ClientError {
        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());

        if status.is_client_error() {
            ClientError::Validation(body)
        } else {
            ClientError::Server(body)
        }
    }
}
