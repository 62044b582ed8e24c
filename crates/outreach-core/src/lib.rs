pub mod config;
pub mod contacts;
pub mod error;
pub mod generate;
pub mod models;
pub mod parser;
pub mod persist;
pub mod pipeline;
pub mod prompt;
pub mod rate_limit;
pub mod scrape;
pub mod traits;
pub mod util;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{AppError, ParseError};
pub use generate::{EmailGenerator, SenderProfile};
pub use models::{Contact, EmailStatus, GeneratedEmail, ScrapeResult};
pub use parser::{ParsedEmail, parse_response};
pub use pipeline::{SendSummary, draft_emails, scrape_contacts, send_emails};
pub use rate_limit::RateLimiter;
pub use scrape::{LocalScraper, ScrapePolicy};
pub use traits::{Cleaner, CompletionClient, Fetcher, Mailer, Scraper};
