//! What each CLI mode does, with terminal I/O passed in.

use crate::config::LlmSettings;
use crate::credentials::{ApiKey, CredentialStore};
use crate::error::{Error, Result};
use crate::llm::LlmClient;
use crate::prompt::{self, SecretReader};
use crate::search::{self, JobSearcher};
use std::io::{BufRead, Write};

/// The mode selected on the command line. Exactly one per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Search,
    SaveKey,
    ResetKey,
}

pub fn save_key<S, R, W>(
    store: &CredentialStore,
    secrets: &mut S,
    input: &mut R,
    output: &mut W,
) -> Result<()>
where
    S: SecretReader,
    R: BufRead,
    W: Write,
{
    writeln!(output, "Enter your Anthropic API key:")?;
    match ApiKey::new(secrets.read_secret(input, output, "API Key: ")?) {
        Some(key) => {
            store.save(&key)?;
            writeln!(output, "✓ API key saved successfully!")?;
        }
        None => writeln!(output, "No API key entered.")?,
    }
    Ok(())
}

pub fn reset_key<W: Write>(store: &CredentialStore, output: &mut W) -> Result<()> {
    if store.remove()? {
        writeln!(output, "✓ API key removed successfully!")?;
    } else {
        writeln!(output, "No API key found to remove.")?;
    }
    Ok(())
}

/// The saved key, or one entered now and saved for next time.
pub fn ensure_api_key<S, R, W>(
    store: &CredentialStore,
    secrets: &mut S,
    input: &mut R,
    output: &mut W,
) -> Result<ApiKey>
where
    S: SecretReader,
    R: BufRead,
    W: Write,
{
    if let Some(key) = store.load()? {
        return Ok(key);
    }

    writeln!(output, "\nNo API key found. Please enter your Anthropic API key.")?;
    writeln!(output, "(You can get one from https://console.anthropic.com/)")?;
    let key = ApiKey::new(secrets.read_secret(input, output, "API Key: ")?)
        .ok_or(Error::MissingApiKey)?;
    store.save(&key)?;
    writeln!(output, "✓ API key saved successfully!")?;
    Ok(key)
}

/// Interactive search loop: ask, search, print, offer another round.
pub async fn search_session<R, W, S>(
    store: &CredentialStore,
    settings: &LlmSettings,
    secrets: &mut S,
    input: &mut R,
    output: &mut W,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    S: SecretReader,
{
    let key = ensure_api_key(store, secrets, input, output)?;
    let searcher = JobSearcher::new(LlmClient::new(key, settings)?);

    writeln!(output, "\n{}", search::rule())?;
    writeln!(output, "{:^80}", "JOB SEARCH TOOL")?;
    writeln!(output, "{}", search::rule())?;

    loop {
        let query = search::prompt_query(input, output)?;
        writeln!(
            output,
            "\n🔍 Searching for '{}' jobs near {}...\n",
            query.keywords(),
            query.location()
        )?;
        output.flush()?;

        let text = searcher.search(&query).await?;
        search::render_results(output, &text)?;

        writeln!(output, "\n{}", search::rule())?;
        if !prompt::confirm(input, output, "\nSearch again? (y/n): ")? {
            break;
        }
    }

    writeln!(output, "\nThank you for using Job Search Tool!")?;
    Ok(())
}
