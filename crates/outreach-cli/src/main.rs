use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use outreach_client::{OpenAiClient, ScraperBackend, SmtpMailer, build_scraper};
use outreach_core::config::AppConfig;
use outreach_core::contacts::load_contacts;
use outreach_core::generate::{EmailGenerator, SenderProfile};
use outreach_core::models::{Contact, GeneratedEmail, ScrapeResult};
use outreach_core::persist::{read_json, read_resume_text, write_json};
use outreach_core::pipeline::{draft_emails, scrape_contacts, send_emails};

#[derive(Parser)]
#[command(name = "outreach", version, about = "Scrape company sites and draft personalized outreach emails")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, global = true, default_value = "config.yaml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every contact's company website to markdown
    Scrape {
        /// Where to write the scrape results
        #[arg(short, long, default_value = "output/scrape_results.json")]
        output: PathBuf,
    },

    /// Draft emails from contacts and (optionally) earlier scrape results
    Generate {
        /// Scrape results produced by the `scrape` command
        #[arg(long)]
        scrape_input: Option<PathBuf>,

        /// Where to write the drafts (defaults to output.path from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Send drafted emails and record each outcome in the same file
    Send {
        /// Drafts produced by `generate` or `pipeline` (defaults to output.path from the config)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Actually send; without it nothing leaves the machine
        #[arg(long, default_value_t = false)]
        confirm: bool,
    },

    /// Scrape, draft and (with --dry-run false) send, in one run
    Pipeline {
        /// Where to write the drafts (defaults to output.path from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop after writing drafts
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(format!("outreach={level}").parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Commands::Scrape { output } => {
            let contacts = read_contacts(&config)?;
            let results = scrape_all(&config, &contacts).await?;
            write_json(&output, &results)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Wrote {} scrape results to {}", results.len(), output.display());
        }
        Commands::Generate {
            scrape_input,
            output,
        } => {
            let contacts = read_contacts(&config)?;
            let scrapes: Vec<ScrapeResult> = match &scrape_input {
                Some(path) => read_json(path)
                    .with_context(|| format!("Failed to read scrape results from {}", path.display()))?,
                None => Vec::new(),
            };
            let output = output.unwrap_or_else(|| config.output.path.clone());
            let generator = build_generator(&config)?;
            let emails = draft_emails(&generator, &contacts, &scrapes).await;
            write_drafts(&output, &emails)?;
        }
        Commands::Send { input, confirm } => {
            let input = input.unwrap_or_else(|| config.output.path.clone());
            require_confirmation(confirm, &input)?;
            let mut emails: Vec<GeneratedEmail> = read_json(&input)
                .with_context(|| format!("Failed to read drafts from {}", input.display()))?;
            let mailer = build_mailer(&config)?;
            send_and_record(&config, &mailer, &input, &mut emails).await?;
        }
        Commands::Pipeline { output, dry_run } => {
            let contacts = read_contacts(&config)?;
            let output = output.unwrap_or_else(|| config.output.path.clone());
            let parts = PipelineParts::build(&config, dry_run)?;

            let scrapes = scrape_contacts(&parts.scraper, &contacts).await;
            let mut emails = draft_emails(&parts.generator, &contacts, &scrapes).await;
            write_drafts(&output, &emails)?;

            match &parts.mailer {
                Some(mailer) => send_and_record(&config, mailer, &output, &mut emails).await?,
                None => println!(
                    "Dry run: review {0}, then run `outreach send --input {0} --confirm`",
                    output.display()
                ),
            }
        }
    }

    Ok(())
}

fn read_contacts(config: &AppConfig) -> Result<Vec<Contact>> {
    let path = &config.contacts.path;
    let contacts = load_contacts(path)
        .with_context(|| format!("Failed to load contacts from {}", path.display()))?;
    if contacts.is_empty() {
        tracing::warn!(path = %path.display(), "No valid contacts found");
    }
    Ok(contacts)
}

async fn scrape_all(config: &AppConfig, contacts: &[Contact]) -> Result<Vec<ScrapeResult>> {
    if contacts.iter().all(|c| c.url.trim().is_empty()) {
        return Ok(Vec::new());
    }
    let scraper = build_scraper(&config.scraper).context("Failed to build scraper")?;
    Ok(scrape_contacts(&scraper, contacts).await)
}

fn sender_profile(config: &AppConfig) -> SenderProfile {
    let resume_text = match &config.resume.text_path {
        Some(path) => read_resume_text(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Resume not loaded, continuing without it");
            String::new()
        }),
        None => String::new(),
    };

    SenderProfile {
        name: config.sender.name.clone(),
        resume_text,
        links: config.sender.links.clone(),
        cv_attached: !config.resume.attachments.is_empty(),
    }
}

fn build_generator(config: &AppConfig) -> Result<EmailGenerator<OpenAiClient>> {
    let client = OpenAiClient::from_config(&config.llm).context("Failed to configure LLM client")?;
    tracing::info!(model = client.model(), "LLM client ready");
    Ok(EmailGenerator::new(client, config.llm.rate_limiter(), sender_profile(config)))
}

fn build_mailer(config: &AppConfig) -> Result<SmtpMailer> {
    SmtpMailer::from_config(&config.smtp, &config.sender, &config.resume.attachments)
        .context("Failed to configure SMTP mailer")
}

/// Everything a pipeline run needs, built before any page is scraped so a
/// configuration error costs no work.
struct PipelineParts {
    scraper: ScraperBackend,
    generator: EmailGenerator<OpenAiClient>,
    /// `None` on a dry run.
    mailer: Option<SmtpMailer>,
}

impl PipelineParts {
    fn build(config: &AppConfig, dry_run: bool) -> Result<Self> {
        let generator = build_generator(config)?;
        let scraper = build_scraper(&config.scraper).context("Failed to build scraper")?;
        let mailer = if dry_run { None } else { Some(build_mailer(config)?) };
        Ok(Self {
            scraper,
            generator,
            mailer,
        })
    }
}

fn require_confirmation(confirm: bool, input: &Path) -> Result<()> {
    anyhow::ensure!(
        confirm,
        "Refusing to send without --confirm. Review {} first",
        input.display()
    );
    Ok(())
}

fn write_drafts(output: &Path, emails: &[GeneratedEmail]) -> Result<()> {
    write_json(output, emails).with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {} draft emails to {}", emails.len(), output.display());
    Ok(())
}

/// Sends every unsent draft, then rewrites `path` with the updated statuses.
async fn send_and_record(
    config: &AppConfig,
    mailer: &SmtpMailer,
    path: &Path,
    emails: &mut [GeneratedEmail],
) -> Result<()> {
    let summary = send_emails(mailer, &config.smtp.rate_limiter(), emails).await;
    write_json(path, &*emails)
        .with_context(|| format!("Failed to record send statuses in {}", path.display()))?;
    println!(
        "Sent {}, failed {}, already sent {} (statuses saved to {})",
        summary.sent,
        summary.failed,
        summary.skipped,
        path.display()
    );
    Ok(())
}
