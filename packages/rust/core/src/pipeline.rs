//! End-to-end pipeline: URL → fetch → classify → aggregate → generate → export.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};
use url::Url;

use coursesmith_fetch::Fetcher;
use coursesmith_llm::classify::{self, Classification};
use coursesmith_llm::{LlmClient, generate};
use coursesmith_shared::Result;

use crate::export;

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Name of the course or website (used in the generation prompt).
    pub course_name: String,
    /// Subject matter the material teaches (used in both prompts).
    pub subject: String,
    /// Landing page URL whose content and links seed the pipeline.
    pub url: Url,
    /// Destination for the generated Markdown.
    pub output_path: PathBuf,
    /// Maximum characters of aggregated text handed to the generator.
    pub max_prompt_chars: usize,
}

/// Summary of a completed pipeline run.
#[derive(Debug)]
pub struct PipelineResult {
    /// Where the material was written.
    pub output_path: PathBuf,
    /// Pages fetched successfully (landing page + supplementary pages).
    pub pages_fetched: usize,
    /// Links the classifier judged relevant.
    pub relevant_links: usize,
    /// Relevant links skipped because they were unreachable or malformed.
    pub links_skipped: usize,
    /// Length of the generated material in characters.
    pub material_chars: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a page is fetched.
    fn page_fetched(&self, url: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &PipelineResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_fetched(&self, _url: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &PipelineResult) {}
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// The concatenated, labeled text of the landing page and its relevant links.
#[derive(Debug)]
pub struct AggregatedDocument {
    /// Full aggregated text, untruncated.
    pub text: String,
    /// Number of labeled blocks (landing page included).
    pub sections: usize,
    /// Relevant links that could not be fetched.
    pub links_skipped: usize,
}

/// Fetch the landing page, classify its links, and fetch each relevant page,
/// concatenating everything into one labeled document.
///
/// A failing landing-page fetch is fatal. An unreachable or malformed
/// supplementary link is skipped with a warning — classification output is
/// advisory, not load-bearing.
#[instrument(skip_all, fields(url = %url))]
pub async fn aggregate(
    fetcher: &Fetcher,
    client: &LlmClient,
    subject: &str,
    url: &Url,
    progress: &dyn ProgressReporter,
) -> Result<AggregatedDocument> {
    let landing = fetcher.fetch(url).await?;
    progress.page_fetched(url.as_str(), 1, 1);

    let classification =
        classify::classify_links(client, subject, url.as_str(), &landing.links).await;

    if let Classification::Malformed { reason } = &classification {
        warn!(reason, "classification failed, continuing with landing page only");
    }

    let relevant = classification.links();
    let total = relevant.len() + 1;

    let mut text = format!("Landing Page:\n{}", landing.contents());
    let mut sections = 1;
    let mut links_skipped = 0;

    for (i, link) in relevant.iter().enumerate() {
        let link_url = match Url::parse(&link.url) {
            Ok(u) => u,
            Err(e) => {
                warn!(url = %link.url, error = %e, "skipping malformed relevant link");
                links_skipped += 1;
                continue;
            }
        };

        match fetcher.fetch(&link_url).await {
            Ok(page) => {
                progress.page_fetched(link_url.as_str(), i + 2, total);
                text.push_str(&format!("\n\n{}:\n{}", link.label, page.contents()));
                sections += 1;
            }
            Err(e) => {
                warn!(url = %link.url, error = %e, "skipping unreachable relevant link");
                links_skipped += 1;
            }
        }
    }

    info!(sections, links_skipped, text_len = text.len(), "aggregation complete");

    Ok(AggregatedDocument {
        text,
        sections,
        links_skipped,
    })
}

/// Truncate to at most `max_chars` characters, on a character boundary.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full pipeline and write the generated material to disk.
///
/// The output file is only created after generation succeeds — a failed model
/// call leaves the filesystem untouched.
#[instrument(skip_all, fields(url = %config.url, course = %config.course_name))]
pub async fn run(
    config: &PipelineConfig,
    fetcher: &Fetcher,
    client: &LlmClient,
    progress: &dyn ProgressReporter,
) -> Result<PipelineResult> {
    let start = Instant::now();

    info!(
        subject = %config.subject,
        max_prompt_chars = config.max_prompt_chars,
        "starting pipeline"
    );

    progress.phase("Gathering pages");
    let doc = aggregate(fetcher, client, &config.subject, &config.url, progress).await?;

    progress.phase("Generating teaching material");
    let details = truncate_chars(&doc.text, config.max_prompt_chars);
    let material =
        generate::generate_material(client, &config.course_name, &config.subject, details).await?;

    progress.phase("Writing output");
    export::export_markdown(&material, &config.output_path)?;

    let result = PipelineResult {
        output_path: config.output_path.clone(),
        pages_fetched: doc.sections,
        relevant_links: doc.sections - 1 + doc.links_skipped,
        links_skipped: doc.links_skipped,
        material_chars: material.chars().count(),
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        pages_fetched = result.pages_fetched,
        links_skipped = result.links_skipped,
        material_chars = result.material_chars,
        elapsed_ms = result.elapsed.as_millis(),
        "pipeline complete"
    );

    Ok(result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
