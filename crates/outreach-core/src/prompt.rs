use std::collections::BTreeMap;

use crate::models::Contact;

/// Everything the prompt needs besides the contact.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    /// Markdown scraped from the company website; empty when unavailable.
    pub company_markdown: &'a str,
    pub resume_text: &'a str,
    pub sender_name: &'a str,
    /// Label → URL, e.g. `github → https://github.com/ada`.
    pub links: &'a BTreeMap<String, String>,
    /// Whether sent emails carry the CV as an attachment.
    pub cv_attached: bool,
}

fn greeting(contact: &Contact) -> String {
    let is_team = contact.name.to_lowercase().contains("team");
    if contact.role.trim().is_empty() || is_team {
        return format!("Dear {} Hiring Team,", contact.company);
    }
    let first_name = contact.name.split_whitespace().next().unwrap_or(&contact.name);
    format!("Hi {first_name},")
}

fn company_context(contact: &Contact, markdown: &str) -> String {
    if markdown.trim().is_empty() {
        format!(
            "(No website content available. Use the company name '{}' and role '{}' as context.)",
            contact.company, contact.role
        )
    } else {
        markdown.to_string()
    }
}

/// Builds the outreach prompt. The reply format it requests is what
/// [`crate::parser::parse_response`] expects.
pub fn build_prompt(contact: &Contact, ctx: PromptContext<'_>) -> String {
    let links_section = if ctx.links.is_empty() {
        "(No links provided)".to_string()
    } else {
        ctx.links
            .iter()
            .map(|(label, url)| format!("- {label}: {url}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let link_mention = if ctx.links.is_empty() {
        "relevant".to_string()
    } else {
        ctx.links.keys().cloned().collect::<Vec<_>>().join("/")
    };

    let closing = if ctx.cv_attached {
        format!("mention the CV is attached, include the sender's {link_mention} links, and offer to discuss further")
    } else {
        format!("include the sender's {link_mention} links and offer to discuss further")
    };

    let sender = ctx.sender_name;

    format!(
        r#"Write a cold outreach email from {sender} to {name} ({role}) at {company}.

Company website content:
{company_context}

Sender's background:
{resume}

Sender's links:
{links_section}

Style rules (FOLLOW STRICTLY):
- Professional but warm, NOT overly casual
- Opening: "{greeting}" (already provided, use as-is)
- Body: 2-3 short paragraphs, max 5 sentences total
- First paragraph: state interest in contributing to the company and reference something SPECIFIC from their website
- Second paragraph: briefly connect the sender's relevant experience to what the company does
- Third paragraph (short): {closing}
- Sign off with exactly: "Regards,\n{sender}"
- Do NOT use "hey" or generic corporate openers
- Do NOT use markdown formatting like ** or ## in the email body

Subject line rules:
- Format: "<Role/Position> Application – {sender}"
- Infer an appropriate role from the company website content and the sender's background
- Always end with " – {sender}"

Output exactly:
SUBJECT: <subject line>
BODY:
<email body>"#,
        name = contact.name,
        role = contact.role,
        company = contact.company,
        company_context = company_context(contact, ctx.company_markdown),
        resume = ctx.resume_text,
        greeting = greeting(contact),
    )
}
