mod cli;
mod telemetry;

use anyhow::{Context, Result, bail};
use clap::Parser;
use form_answer::{
    AnswerApi, AnswerId, AnswerSession, EngineError, FormId, PersistedAnswer, SubmitState,
};
use form_answer_http::{ApiConfig, HttpAnswerApi};
use form_answer_ratatui::{AnswerEditor, AnswerTuiError, ComparisonScreen};
use tracing::{info, warn};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(&cli.log_file)?;

    if cli.demo {
        info!("Running against the sample forms");
        return run(&example_forms::demo_api(), cli.command).await;
    }

    let config = match &cli.config {
        Some(path) => ApiConfig::load(path)?,
        None => ApiConfig::from_env()?,
    };
    let api = HttpAnswerApi::new(&config)?;
    info!(base_url = %api.base_url(), "Using the answer service");
    run(&api, cli.command).await
}

async fn run<A: AnswerApi>(api: &A, command: Command) -> Result<()> {
    match command {
        Command::Answer { form, answer } => answer_form(api, form.into(), answer.into()).await,
        Command::View { answer } => {
            let record = fetch(api, answer.into()).await?;
            ComparisonScreen::new(vec![record]).showing(answer.into()).run()?;
            Ok(())
        }
        Command::Compare { answers } => {
            let mut records = Vec::with_capacity(answers.len());
            for id in answers {
                records.push(fetch(api, id.into()).await?);
            }
            let Some(first) = records.first().map(|record| record.id) else {
                bail!("nothing to compare");
            };
            ComparisonScreen::new(records).showing(first).run()?;
            Ok(())
        }
    }
}

async fn answer_form<A: AnswerApi>(api: &A, form: FormId, answer: AnswerId) -> Result<()> {
    let mut session = match AnswerSession::load(api, form, answer).await {
        Ok(session) => session,
        Err(EngineError::AlreadyAnswered(id)) => {
            info!(answer = %id, "Answer already submitted, opening it read-only");
            let record = fetch(api, id).await?;
            ComparisonScreen::new(vec![record]).showing(id).run()?;
            return Ok(());
        }
        Err(err) => return Err(err).context("loading the form"),
    };

    match AnswerEditor::new().run(&mut session, api).await {
        Ok(record) => {
            println!("Answer {} submitted for {}.", record.id, session.form().name);
            Ok(())
        }
        Err(AnswerTuiError::Cancelled) => {
            warn!(answer = %answer, "Editor closed without submitting");
            println!("Cancelled, nothing was submitted.");
            Ok(())
        }
        Err(AnswerTuiError::SubmitAbandoned(id)) => {
            warn!(answer = %id, "Editor closed during submission");
            match session.refresh(api).await {
                Ok(SubmitState::Submitted) => println!("Answer {id} was submitted."),
                Ok(_) => println!("Submission outcome unknown; answer {id} is not stored yet. Check it before answering again."),
                Err(err) => {
                    warn!(answer = %id, error = %err, "Could not check the abandoned submission");
                    println!("Submission outcome unknown; check answer {id} before answering again.");
                }
            }
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

async fn fetch<A: AnswerApi>(api: &A, id: AnswerId) -> Result<PersistedAnswer> {
    api.fetch_answer(id).await.map_err(|err| {
        let err: anyhow::Error = err.into();
        err.context(format!("fetching answer {id}"))
    })
}
