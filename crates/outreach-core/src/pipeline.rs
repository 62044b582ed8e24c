//! Sequential scrape, draft and send passes over a contact list.
//!
//! Per-item failures never abort a pass: failed scrapes are kept as error
//! results, contacts whose generation fails are logged and skipped, and
//! undeliverable emails are marked failed.

use std::collections::HashMap;

use crate::generate::EmailGenerator;
use crate::models::{Contact, EmailStatus, GeneratedEmail, ScrapeResult};
use crate::rate_limit::RateLimiter;
use crate::traits::{CompletionClient, Mailer, Scraper};
use crate::util::{char_len, unique_urls};

/// Scrapes each distinct contact URL once, in first-seen order.
pub async fn scrape_contacts<S: Scraper>(scraper: &S, contacts: &[Contact]) -> Vec<ScrapeResult> {
    let urls = unique_urls(contacts.iter().map(|c| c.url.as_str()));
    let total = urls.len();

    let mut results = Vec::with_capacity(total);
    for (i, url) in urls.into_iter().enumerate() {
        tracing::info!(%url, progress = %format!("{}/{total}", i + 1), "Scraping");
        let result = scraper.scrape(url).await;
        match result.error() {
            Some(error) => tracing::warn!(%url, %error, "Scrape failed"),
            None => tracing::info!(%url, length = char_len(result.markdown()), "Scraped"),
        }
        results.push(result);
    }

    let succeeded = results.iter().filter(|r| r.is_success()).count();
    tracing::info!(succeeded, failed = total - succeeded, "Scraping finished");
    results
}

/// Drafts one email per contact, pairing each with its scrape by URL.
pub async fn draft_emails<L: CompletionClient>(
    generator: &EmailGenerator<L>,
    contacts: &[Contact],
    scrapes: &[ScrapeResult],
) -> Vec<GeneratedEmail> {
    let by_url: HashMap<&str, &ScrapeResult> = scrapes.iter().map(|r| (r.url(), r)).collect();

    let mut emails = Vec::with_capacity(contacts.len());
    for contact in contacts {
        let scrape = by_url.get(contact.url.trim()).copied();
        match generator.generate(contact, scrape).await {
            Ok(email) => {
                tracing::info!(contact = %contact.email, subject = %email.subject, "Draft ready");
                emails.push(email);
            }
            Err(e) => {
                tracing::warn!(contact = %contact.email, error = %e, "Skipping contact");
            }
        }
    }

    tracing::info!(
        drafted = emails.len(),
        skipped = contacts.len() - emails.len(),
        "Generation finished"
    );
    emails
}

/// Counts from one [`send_emails`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendSummary {
    pub sent: usize,
    pub failed: usize,
    /// Emails already marked sent by an earlier run.
    pub skipped: usize,
}

/// Sends every email not yet marked sent, spacing deliveries with `limiter`
/// and recording the outcome on each email.
pub async fn send_emails<M: Mailer>(
    mailer: &M,
    limiter: &RateLimiter,
    emails: &mut [GeneratedEmail],
) -> SendSummary {
    let total = emails.len();
    let mut summary = SendSummary::default();

    for (i, email) in emails.iter_mut().enumerate() {
        if email.status == EmailStatus::Sent {
            summary.skipped += 1;
            continue;
        }

        limiter.acquire().await;
        tracing::info!(to = %email.contact.email, progress = %format!("{}/{total}", i + 1), "Sending");
        match mailer.send(email).await {
            Ok(()) => {
                email.mark_sent();
                summary.sent += 1;
                tracing::info!(to = %email.contact.email, subject = %email.subject, "Email sent");
            }
            Err(e) => {
                email.mark_failed();
                summary.failed += 1;
                tracing::error!(to = %email.contact.email, error = %e, "Failed to send email");
            }
        }
    }

    tracing::info!(sent = summary.sent, failed = summary.failed, skipped = summary.skipped, "Sending finished");
    summary
}
