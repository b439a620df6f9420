//! Ask command handler.
//!
//! Answers a question from the handbook FAQ collection.

use super::{open_service, print_json};
use clap::Args;
use helpdesk_core::{config::AppConfig, AppResult};
use helpdesk_faq::{ask, AnswerComposer};
use helpdesk_llm::{create_client, Attribution};
use helpdesk_prompt::{load_prompt_or_default, DEFAULT_ANSWER_PROMPT_ID};

/// Title sent as `X-Title` unless the provider config sets one.
const DEFAULT_APP_TITLE: &str = "Student Handbook FAQ";

/// Message shown in place of an answer when the request fails.
const GENERIC_ERROR: &str =
    "Sorry, I encountered an error processing your question. Please try again.";

/// Ask a question about the student handbook
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Prompt definition to answer with (.helpdesk/prompts/<id>.yml)
    #[arg(long, default_value = DEFAULT_ANSWER_PROMPT_ID)]
    pub prompt: String,

    /// Maximum tokens in response
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        config.validate()?;

        // 1. Build the completion client; a missing key fails here, before any request
        let provider_config = config.get_provider_config(&config.provider);
        let attribution = Attribution {
            referer: provider_config.and_then(|pc| pc.referer.clone()),
            title: provider_config
                .and_then(|pc| pc.title.clone())
                .or_else(|| Some(DEFAULT_APP_TITLE.to_string())),
        };
        let api_key = config.resolve_api_key(&config.provider);
        let endpoint = config.resolve_endpoint(&config.provider);
        let client = create_client(
            &config.provider,
            endpoint.as_deref(),
            api_key.as_deref(),
            Some(attribution),
        )?;

        // 2. Load the answering prompt
        let prompt_def = load_prompt_or_default(&config.workspace, &self.prompt)?;
        tracing::debug!("Loaded prompt definition: {}", prompt_def.id);

        let mut composer = AnswerComposer::new(client, config.model.clone()).with_prompt(prompt_def);
        if let Some(ref institution) = config.institution {
            composer = composer.with_institution(institution.clone());
        }
        if let Some(max_tokens) = self.max_tokens {
            composer = composer.with_max_tokens(max_tokens);
        }

        // 3. Search, compose, log
        let service = open_service(config)?;
        let outcome = match ask(&service, &composer, &self.question).await {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("{}", GENERIC_ERROR);
                eprintln!("Your question: {}", self.question);
                return Err(e);
            }
        };

        if self.json {
            return print_json(&outcome);
        }

        println!("{}", outcome.answer);

        if !outcome.related_faqs.is_empty() {
            println!();
            println!("Related FAQs:");
            for faq in &outcome.related_faqs {
                println!("  - {} [{}]", faq.question, faq.id);
            }
        }

        if let Some(ref log_id) = outcome.log_id {
            println!();
            println!(
                "Was this helpful? helpdesk feedback {} --helpful | --unhelpful",
                log_id
            );
        }

        Ok(())
    }
}
