use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;
use crate::models::Contact;

/// Loads contacts from a `.json` array or a `.csv` file with a header row,
/// dropping records that fail [`validate_contact`].
pub fn load_contacts(path: &Path) -> Result<Vec<Contact>, AppError> {
    let raw = match extension(path).as_deref() {
        Some("csv") => read_csv(path)?,
        _ => {
            let data = std::fs::read_to_string(path)?;
            serde_json::from_str::<Vec<Contact>>(&data)?
        }
    };

    let total = raw.len();
    let valid: Vec<Contact> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, contact)| match validate_contact(&contact) {
            Ok(()) => Some(contact),
            Err(reason) => {
                tracing::warn!(index, email = %contact.email, %reason, "Skipping invalid contact");
                None
            }
        })
        .collect();

    tracing::info!(valid = valid.len(), skipped = total - valid.len(), "Contacts loaded");
    Ok(valid)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

fn read_csv(path: &Path) -> Result<Vec<Contact>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| AppError::Generic(format!("reading contacts CSV: {e}")))?;

    reader
        .deserialize()
        .collect::<Result<Vec<Contact>, _>>()
        .map_err(|e| AppError::Generic(format!("parsing contacts CSV: {e}")))
}

/// Checks the fields the pipeline depends on. Returns a human-readable reason
/// on failure.
pub fn validate_contact(contact: &Contact) -> Result<(), String> {
    if !is_valid_email(&contact.email) {
        return Err(format!("invalid email {:?}", contact.email));
    }
    if contact.name.trim().is_empty() {
        return Err("name is empty".into());
    }
    if contact.company.trim().is_empty() {
        return Err("company is empty".into());
    }
    if contact.url.trim().is_empty() {
        return Err("url is empty".into());
    }
    Ok(())
}

/// `local@domain.tld` with an RFC 5322 atext local part and dot-separated
/// LDH domain labels. Display names and angle brackets are rejected.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    )
    .expect("email regex is valid")
});

/// Syntactic address check. Surrounding whitespace is ignored.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}
