//! Link classification: ask the model which page links are educational.
//!
//! One request, strict JSON reply. Failures never propagate — a call or parse
//! failure degrades to "no supplementary pages", but the cause stays
//! distinguishable through [`Classification`].

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::LlmClient;

/// A link the model judged topically relevant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevantLink {
    /// Short description of what the link teaches (the model's label).
    #[serde(rename = "type")]
    pub label: String,
    /// Full URL of the linked page.
    pub url: String,
}

/// Outcome of one classification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The model returned at least one relevant link.
    Relevant(Vec<RelevantLink>),
    /// The model answered with an empty link list.
    Empty,
    /// The call failed or the reply was not the expected JSON shape.
    Malformed { reason: String },
}

impl Classification {
    /// The relevant links, empty for `Empty` and `Malformed`.
    pub fn links(&self) -> &[RelevantLink] {
        match self {
            Self::Relevant(links) => links,
            Self::Empty | Self::Malformed { .. } => &[],
        }
    }
}

/// Expected reply shape: `{"links": [{"type": ..., "url": ...}]}`.
#[derive(Debug, Deserialize)]
struct LinkReply {
    links: Vec<RelevantLink>,
}

/// System instruction for the classification request.
fn link_system_prompt(subject: &str) -> String {
    format!(
        "You are provided with a list of links found on a webpage. \
         You are able to decide which of the links contain {subject} learning material, \
         such as pages about core concepts, tutorials, or exercises.\n\
         You should respond in JSON as in this example:\n\
         {{\n\
             \"links\": [\n\
                 {{\"type\": \"learning variables\", \"url\": \"https://example.com/en/Variables\"}},\n\
                 {{\"type\": \"learning lists\", \"url\": \"https://example.com/en/Lists\"}}\n\
             ]\n\
         }}"
    )
}

/// User prompt listing the page URL and its raw links.
fn link_user_prompt(subject: &str, page_url: &str, links: &[String]) -> String {
    let links_list = links.join("\n");
    format!(
        "Here is a list of links on the website {page_url}:\n\
         {links_list}\n\
         Please identify which links are relevant for learning {subject}. \
         Respond in JSON format with full URLs. Do not include unrelated links such as \
         About, advertisements, discounts, terms of service, support, or privacy policies."
    )
}

/// Classify which of a page's links are relevant learning material.
///
/// Sends exactly one model request and never returns an error: failures
/// become [`Classification::Malformed`].
#[instrument(skip(client, links), fields(link_count = links.len()))]
pub async fn classify_links(
    client: &LlmClient,
    subject: &str,
    page_url: &str,
    links: &[String],
) -> Classification {
    let system = link_system_prompt(subject);
    let user = link_user_prompt(subject, page_url, links);

    let content = match client.chat(&system, &user).await {
        Ok(content) => content,
        Err(e) => {
            warn!(error = %e, "classification request failed");
            return Classification::Malformed {
                reason: e.to_string(),
            };
        }
    };

    let classification = parse_classification(&content);
    debug!(?classification, "links classified");
    classification
}

/// Parse a model reply into a [`Classification`].
///
/// Tolerates a model that wraps its JSON in a fenced code block or prefixes
/// it with a literal `json` marker.
pub fn parse_classification(content: &str) -> Classification {
    let cleaned = clean_reply(content);

    match serde_json::from_str::<LinkReply>(cleaned) {
        Ok(reply) if reply.links.is_empty() => Classification::Empty,
        Ok(reply) => Classification::Relevant(reply.links),
        Err(e) => {
            warn!(error = %e, reply = cleaned, "classification reply is not valid JSON");
            Classification::Malformed {
                reason: e.to_string(),
            }
        }
    }
}

/// Strip surrounding whitespace, code fences, and a leading `json` marker.
fn clean_reply(content: &str) -> &str {
    let s = content.trim();
    let s = s.strip_prefix("```").unwrap_or(s);
    let s = s.strip_prefix("json").unwrap_or(s);
    let s = s.strip_suffix("```").unwrap_or(s);
    s.trim()
}
