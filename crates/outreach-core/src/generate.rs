use std::collections::BTreeMap;

use crate::error::AppError;
use crate::models::{Contact, GeneratedEmail, ScrapeResult};
use crate::parser::parse_response;
use crate::prompt::{PromptContext, build_prompt};
use crate::rate_limit::RateLimiter;
use crate::traits::CompletionClient;

/// Sender details shared by every generated email.
#[derive(Debug, Clone, Default)]
pub struct SenderProfile {
    pub name: String,
    pub resume_text: String,
    pub links: BTreeMap<String, String>,
    /// Set when delivery attaches the CV to every email.
    pub cv_attached: bool,
}

/// Drafts one personalized email per contact: prompt → LLM → parse.
pub struct EmailGenerator<L: CompletionClient> {
    client: L,
    limiter: RateLimiter,
    sender: SenderProfile,
}

impl<L: CompletionClient> EmailGenerator<L> {
    pub fn new(client: L, limiter: RateLimiter, sender: SenderProfile) -> Self {
        Self {
            client,
            limiter,
            sender,
        }
    }

    /// Generates a draft for `contact`.
    ///
    /// A missing or failed scrape is not an error: the prompt then tells the
    /// model that no website content is available.
    pub async fn generate(
        &self,
        contact: &Contact,
        scrape: Option<&ScrapeResult>,
    ) -> Result<GeneratedEmail, AppError> {
        self.limiter.acquire().await;

        let company_markdown = scrape.map(ScrapeResult::markdown).unwrap_or_default();
        let prompt = build_prompt(
            contact,
            PromptContext {
                company_markdown,
                resume_text: &self.sender.resume_text,
                sender_name: &self.sender.name,
                links: &self.sender.links,
                cv_attached: self.sender.cv_attached,
            },
        );

        let completion = self.client.complete(&prompt).await?;
        let parsed = parse_response(&completion).inspect_err(|e| {
            tracing::debug!(contact = %contact.name, error = %e, raw = %completion, "Unparseable completion");
        })?;

        // parse_response guarantees both fields are non-empty.
        GeneratedEmail::draft(contact.clone(), parsed.subject, parsed.body)
            .ok_or_else(|| AppError::Generic("generated email has an empty subject or body".into()))
    }
}
