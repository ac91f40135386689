//! HTTP persistence backend for `form-answer`.
//!
//! [`HttpAnswerApi`] implements [`form_answer::AnswerApi`] against the REST
//! endpoints under `private/answers`, configured by an [`ApiConfig`] read from
//! TOML and the environment.
//!
//! ```rust,no_run
//! use form_answer::AnswerSession;
//! use form_answer_http::{ApiConfig, HttpAnswerApi};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ApiConfig::load("form-answer.toml")?;
//! let api = HttpAnswerApi::new(&config)?;
//! let session = AnswerSession::load(&api, 10.into(), 1000.into()).await?;
//! # let _ = session;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;

pub use client::HttpAnswerApi;
pub use config::{ApiConfig, DEFAULT_TIMEOUT_SECS, ENV_TIMEOUT, ENV_TOKEN, ENV_URL};
pub use error::HttpApiError;
