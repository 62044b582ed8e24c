pub mod backend;
pub mod browser_fetcher;
pub mod cleaner;
pub mod fetcher;
pub mod llm;
pub mod mailer;
pub mod readability;
pub mod remote;

pub use backend::{DefaultLocalScraper, ScraperBackend, build_scraper};
pub use browser_fetcher::RenderedFetcher;
pub use cleaner::MarkdownExtractor;
pub use fetcher::ReqwestFetcher;
pub use llm::OpenAiClient;
pub use mailer::SmtpMailer;
pub use remote::RemoteApiScraper;
