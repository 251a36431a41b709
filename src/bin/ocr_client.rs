//! Command-line client for the Text Extractor Pro server.
//!
//! Drives the library's upload session against a running server and browses
//! the read-only catalog endpoints.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use text_extractor::article::{self, Article, RawArticle, ITEMS_PER_PAGE};
use text_extractor::upload::state::preview_data_uri;
use text_extractor::upload::{
    present, FileMeta, HttpTransferClient, Phase, TransferClient, UploadSession,
};
use text_extractor::validate;

#[derive(Parser)]
#[command(
    name = "ocr-client",
    about = "Upload documents for text extraction and browse the article catalog"
)]
struct Cli {
    /// Base URL of the server.
    #[arg(long, global = true, default_value = "http://localhost:8000")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a file and print the extracted text.
    Extract {
        /// Path of the document to process.
        file: PathBuf,
        /// Also write the extracted text to this path.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the documents known to the catalog.
    Pdfs,
    /// Show the tabular rows stored for one document.
    Pdf { name: String },
    /// Browse all articles grouped by document, one page at a time.
    Articles {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Extract { ref file, ref output } => {
            extract(&cli.server, file, output.as_deref()).await
        }
        Command::Pdfs => pdfs(&cli.server).await,
        Command::Pdf { ref name } => pdf(&cli.server, name).await,
        Command::Articles { page } => articles(&cli.server, page).await,
    }
}

/// Run one full upload session: validate, stage, submit, present.
async fn extract(server: &str, path: &Path, output: Option<&Path>) -> Result<()> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("File path has no usable name component")?
        .to_string();
    let metadata =
        std::fs::metadata(path).with_context(|| format!("Cannot read {}", path.display()))?;
    let mime_type = validate::extension_of(&name)
        .as_deref()
        .and_then(validate::mime_for_extension)
        .unwrap_or("application/octet-stream");

    let mut session = UploadSession::new();
    let verdict = session.select(FileMeta {
        name: name.clone(),
        size_bytes: metadata.len(),
        mime_type: mime_type.to_string(),
    });
    if let Some(reason) = verdict.reason {
        bail!("{}", reason);
    }

    let bytes =
        std::fs::read(path).with_context(|| format!("Cannot read {}", path.display()))?;
    if let Some(candidate) = session.candidate() {
        let id = candidate.id;
        if let Some(uri) = preview_data_uri(mime_type, &bytes) {
            session.apply_preview(id, uri);
        }
    }

    let candidate_id = session
        .begin_submit()
        .context("Nothing staged for submission")?;
    let client = HttpTransferClient::new(server)?;
    let outcome = client.submit(&name, mime_type, bytes).await;
    session.complete_transfer(candidate_id, outcome);

    match session.phase() {
        Phase::Succeeded => {
            let result = session
                .result()
                .context("Session succeeded without a result")?;
            println!("{}", result.text);
            eprintln!(
                "\n{} characters extracted from {}",
                present::character_count(result),
                result.file_name
            );
            if let Some(out) = output {
                let download = present::plain_text_download(result);
                std::fs::write(out, &download.bytes)
                    .with_context(|| format!("Cannot write {}", out.display()))?;
                eprintln!("Saved to {}", out.display());
            }
            Ok(())
        }
        Phase::Failed => bail!("{}", session.error().unwrap_or("Failed to process file")),
        _ => bail!("Transfer did not complete"),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PdfNamesBody {
    pdf_names: Vec<String>,
}

async fn pdfs(server: &str) -> Result<()> {
    let url = join_url(server, "/api/pdf-names")?;
    let body: PdfNamesBody = reqwest::Client::new()
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    for name in &body.pdf_names {
        println!("{}", name);
    }
    eprintln!("{} documents", body.pdf_names.len());
    Ok(())
}

#[derive(Deserialize)]
struct PdfDataBody {
    table: String,
    articles: Vec<serde_json::Value>,
}

async fn pdf(server: &str, name: &str) -> Result<()> {
    let url = join_url(server, &format!("/api/pdf-data/{}", name))?;
    let resp = reqwest::Client::new().get(url).send().await?;
    if resp.status() == reqwest::StatusCode::NOT_FOUND {
        bail!("PDF data not found for '{}'", name);
    }
    let body: PdfDataBody = resp.error_for_status()?.json().await?;

    println!("table: {}", body.table);
    for row in &body.articles {
        println!("{}", serde_json::to_string_pretty(row)?);
    }
    Ok(())
}

#[derive(Deserialize)]
struct ArticlesBody {
    articles: Vec<RawArticle>,
}

async fn articles(server: &str, page: usize) -> Result<()> {
    let url = join_url(server, "/api/articles")?;
    let body: ArticlesBody = reqwest::Client::new()
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    // Normalize at the boundary, then group and flatten in display order.
    let normalized: Vec<Article> = body.articles.into_iter().map(RawArticle::normalize).collect();
    let groups = article::group_by_document(normalized);
    let flat: Vec<&Article> = groups
        .iter()
        .flat_map(|g| g.titles.iter().flat_map(|t| t.articles.iter()))
        .collect();

    let mut last_doc = "";
    let mut last_title = "";
    for a in article::paginate(&flat, page, ITEMS_PER_PAGE) {
        if a.pdf_name != last_doc {
            println!("\n# {}", a.pdf_name);
            last_doc = &a.pdf_name;
            last_title = "";
        }
        if a.pdf_title != last_title {
            println!("## {}", a.pdf_title);
            last_title = &a.pdf_title;
        }
        println!(
            "  Article {}: {}",
            a.article_number.as_deref().unwrap_or("-"),
            a.article_name.as_deref().unwrap_or("(untitled)")
        );
    }

    eprintln!(
        "\nPage {} of {} ({} articles)",
        page,
        article::total_pages(flat.len(), ITEMS_PER_PAGE),
        flat.len()
    );
    Ok(())
}

fn join_url(server: &str, path: &str) -> Result<reqwest::Url> {
    let base = reqwest::Url::parse(server).with_context(|| format!("Bad server URL: {}", server))?;
    Ok(base.join(path)?)
}
