use form_answer::{AnswerApi, AnswerId, Form, FormId, PersistedAnswer, SubmitPayload};
use reqwest::{
    RequestBuilder,
    header::{ACCEPT, AUTHORIZATION, USER_AGENT},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::{ApiConfig, HttpApiError};

const ANSWERS: &str = "private/answers";
const CLIENT_NAME: &str = concat!("form-answer/", env!("CARGO_PKG_VERSION"));

/// [`AnswerApi`] over the REST answer service.
#[derive(Clone, Debug)]
pub struct HttpAnswerApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpAnswerApi {
    pub fn new(config: &ApiConfig) -> Result<Self, HttpApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn prepare(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header(USER_AGENT, CLIENT_NAME)
            .header(ACCEPT, "application/json");
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, HttpApiError> {
        let res = self.prepare(request).send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let body = reported_error(&body).unwrap_or(body);
            warn!(%status, "Answer service returned an error status");
            return Err(HttpApiError::Status { status, body });
        }
        parse_body(&body)
    }
}

/// The `error` field of a JSON body, when present and not null.
fn reported_error(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

/// Decode a 2xx body, treating an `error` field as a failure.
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, HttpApiError> {
    if let Some(message) = reported_error(body) {
        warn!(%message, "Answer service reported an error in a successful response");
        return Err(HttpApiError::Server(message));
    }
    Ok(serde_json::from_str(body)?)
}

impl AnswerApi for HttpAnswerApi {
    type Error = HttpApiError;

    #[instrument(level = "info", skip(self))]
    async fn fetch_form_to_answer(&self, form: FormId) -> Result<Form, Self::Error> {
        let url = self.endpoint(&format!("{ANSWERS}/formToAnswer/{form}"));
        let form: Form = self.execute(self.client.get(&url)).await?;
        info!(questions = form.questions.len(), "Fetched form");
        Ok(form)
    }

    #[instrument(level = "info", skip(self))]
    async fn fetch_answer(&self, answer: AnswerId) -> Result<PersistedAnswer, Self::Error> {
        let url = self.endpoint(&format!("{ANSWERS}/{answer}"));
        self.execute(self.client.get(&url)).await
    }

    #[instrument(level = "info", skip(self, payload), fields(bytes = payload.user_answers.len()))]
    async fn submit_answer(
        &self,
        answer: AnswerId,
        payload: &SubmitPayload,
    ) -> Result<PersistedAnswer, Self::Error> {
        let url = self.endpoint(&format!("{ANSWERS}/{answer}"));
        let stored: PersistedAnswer = self.execute(self.client.put(&url).json(payload)).await?;
        info!(answered = stored.user_has_answered, "Submitted answer");
        Ok(stored)
    }
}
