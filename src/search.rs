use crate::error::{Error, Result};
use crate::llm::LlmClient;
use crate::prompt;
use std::io::{BufRead, Write};
use tracing::info;

const RULE_WIDTH: usize = 80;

/// What to look for and where. Both parts are non-empty and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    keywords: String,
    location: String,
}

impl SearchQuery {
    pub fn new(keywords: &str, location: &str) -> Option<Self> {
        let keywords = keywords.trim();
        let location = location.trim();
        if keywords.is_empty() || location.is_empty() {
            return None;
        }
        Some(Self {
            keywords: keywords.to_string(),
            location: location.to_string(),
        })
    }

    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

/// Ask for keywords and location, re-asking while either is blank.
pub fn prompt_query<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<SearchQuery> {
    writeln!(output, "\nEnter job search details:")?;
    let keywords = prompt::ask_non_empty(
        input,
        output,
        "Job keywords (e.g., 'software engineer', 'data analyst'): ",
        "Keywords",
    )?;
    let location = prompt::ask_non_empty(
        input,
        output,
        "Location (e.g., 'San Francisco', 'Remote', 'New York'): ",
        "Location",
    )?;
    SearchQuery::new(&keywords, &location)
        .ok_or_else(|| Error::input("keywords and location are required"))
}

pub fn build_prompt(query: &SearchQuery) -> String {
    format!(
        "Search for current job openings for '{keywords}' in or near '{location}'.

Please find recent job listings and provide:
1. Job title and company name
2. Location
3. Brief description or key requirements
4. Link to apply (if available)

Format the results in a clear, easy-to-read way. Focus on the most relevant and recent postings.",
        keywords = query.keywords(),
        location = query.location(),
    )
}

pub struct JobSearcher {
    llm: LlmClient,
}

impl JobSearcher {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    /// One request to the model; the reply comes back untouched.
    pub async fn search(&self, query: &SearchQuery) -> Result<String> {
        info!(keywords = %query.keywords(), location = %query.location(), "searching for jobs");
        self.llm.complete_with_web_search(&build_prompt(query)).await
    }
}

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Print the reply between two rules, or a hint when it came back empty.
pub fn render_results<W: Write>(output: &mut W, text: &str) -> std::io::Result<()> {
    if text.trim().is_empty() {
        return writeln!(output, "No results found. Try different keywords or location.");
    }
    writeln!(output, "{}", rule())?;
    writeln!(output, "{text}")?;
    writeln!(output, "{}", rule())
}
