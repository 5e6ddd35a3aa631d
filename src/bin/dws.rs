//! CLI binary for dws-addin.
//!
//! A thin shim over the library crate: maps flags to `ClientConfig`, picks a
//! document source for the input, runs one operation and prints the result.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dws_addin::{
    resolve_source, AppContext, ClientConfig, CredentialCheck, DwsError, ProcessingResult,
    SignatureOptions,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Check that the API key is accepted
  dws check

  # Convert a document to PDF and save the result
  dws convert report.docx --to pdf -o report.pdf

  # Sign on page 2 with a reason
  dws sign contract.docx --signer "Alice Doe" --page 2 --reason "Approved"

  # Free-form transform
  dws transform draft.docx --instructions "add a DRAFT watermark" -o draft-wm.docx

  # Convert a document served over HTTP, JSON result on stdout
  dws --json convert https://example.com/files/memo.docx --to html

ENVIRONMENT VARIABLES:
  NUTRIENT_DWS_API_KEY   Bearer token for the remote API
  DWS_BASE_URL           Override the API endpoint
  RUST_LOG               Override the log filter (e.g. dws_addin=debug)
"#;

/// Convert, sign and transform Word documents through a remote processing API.
#[derive(Parser, Debug)]
#[command(
    name = "dws",
    version,
    about = "Convert, sign and transform Word documents through a remote processing API",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// API key (bearer token).
    #[arg(long, env = "NUTRIENT_DWS_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// API base URL.
    #[arg(long, env = "DWS_BASE_URL", default_value = dws_addin::config::DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Request timeout for document operations, in seconds.
    #[arg(long, env = "DWS_TIMEOUT", default_value_t = 30, global = true)]
    timeout: u64,

    /// Timeout for the connectivity check, in seconds.
    #[arg(long, env = "DWS_PROBE_TIMEOUT", default_value_t = 5, global = true)]
    probe_timeout: u64,

    /// Do not probe the API before running a document operation.
    #[arg(long, global = true)]
    skip_check: bool,

    /// Print the result as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert the document to another format.
    Convert {
        #[command(flatten)]
        doc: DocArgs,
        /// Target format, e.g. pdf, html, png.
        #[arg(long = "to", default_value = "pdf")]
        format: String,
    },
    /// Digitally sign the document.
    Sign {
        #[command(flatten)]
        doc: DocArgs,
        /// Name of the signer.
        #[arg(long = "signer")]
        signer_name: String,
        #[arg(long)]
        reason: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Render a visible signature (true/false).
        #[arg(long)]
        visible: Option<bool>,
        /// Page for a visible signature (1-indexed).
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        x: Option<f64>,
        #[arg(long)]
        y: Option<f64>,
    },
    /// Apply free-form processing instructions.
    Transform {
        #[command(flatten)]
        doc: DocArgs,
        #[arg(long)]
        instructions: String,
    },
    /// Validate the API key against the health endpoint.
    Check,
    /// Print basic document information (no API call).
    Info {
        /// Local .docx path or HTTP/HTTPS URL.
        input: String,
    },
}

#[derive(Args, Debug)]
struct DocArgs {
    /// Local .docx path or HTTP/HTTPS URL.
    input: String,

    /// Save the returned document to this file.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", red("error:"), e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<bool> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || !cli.json {
        // the spinner and status line carry the feedback
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = ClientConfig::builder()
        .base_url(cli.base_url.clone())
        .request_timeout(Duration::from_secs(cli.timeout))
        .probe_timeout(Duration::from_secs(cli.probe_timeout))
        // clap already folded the env var into --api-key
        .credential_from_env(false)
        .build()
        .context("Invalid configuration")?;

    match &cli.command {
        Command::Check => {
            let ctx = context(config, "", cli.timeout)?;
            check(&cli, &ctx).await
        }
        Command::Info { input } => {
            let ctx = context(config, input, cli.timeout)?;
            info(&cli, &ctx, input).await
        }
        Command::Convert { doc, format } => {
            let ctx = context(config, &doc.input, cli.timeout)?;
            run_operation(&cli, &ctx, doc, Job::Convert(format)).await
        }
        Command::Sign {
            doc,
            signer_name,
            reason,
            location,
            visible,
            page,
            x,
            y,
        } => {
            let options = SignatureOptions {
                signer_name: signer_name.trim().to_string(),
                reason: reason.clone(),
                location: location.clone(),
                visible: *visible,
                page: *page,
                x: *x,
                y: *y,
            };
            let ctx = context(config, &doc.input, cli.timeout)?;
            run_operation(&cli, &ctx, doc, Job::Sign(options)).await
        }
        Command::Transform { doc, instructions } => {
            let ctx = context(config, &doc.input, cli.timeout)?;
            run_operation(&cli, &ctx, doc, Job::Transform(instructions.trim())).await
        }
    }
}

/// A document operation picked from the command line.
enum Job<'a> {
    Convert(&'a str),
    Sign(SignatureOptions),
    Transform(&'a str),
}

fn context(config: ClientConfig, input: &str, download_timeout: u64) -> Result<AppContext> {
    let source = resolve_source(input, download_timeout)
        .with_context(|| format!("Failed to open '{input}'"))?;
    AppContext::new(config, Arc::from(source)).context("Failed to initialise client")
}

async fn info(cli: &Cli, ctx: &AppContext, input: &str) -> Result<bool> {
    let info = ctx
        .processor()
        .document_info()
        .await
        .context("Failed to read document information")?;
    let Some(info) = info else {
        anyhow::bail!("No document found at '{}'", input);
    };
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Title:   {}", info.title);
        println!("Author:  {}", info.author);
        println!("Pages:   {}", info.page_count);
    }
    Ok(true)
}

/// Convert, sign or transform `doc`, report the result and save the body.
async fn run_operation(cli: &Cli, ctx: &AppContext, doc: &DocArgs, job: Job<'_>) -> Result<bool> {
    // ── Credential ───────────────────────────────────────────────────────
    if let Some(ref key) = cli.api_key {
        ctx.credentials().set(key.trim());
    }
    if !cli.skip_check {
        match ctx.ensure_ready().await {
            Ok(()) => {}
            Err(DwsError::MissingCredential) => {
                anyhow::bail!("Please provide an API key (--api-key or NUTRIENT_DWS_API_KEY)")
            }
            Err(e) => return Err(e.into()),
        }
    }

    // ── Run the operation ────────────────────────────────────────────────
    let processor = ctx.processor();
    let (label, result) = match job {
        Job::Convert(format) => {
            let bar = spinner(cli, &format!("Converting document to {}…", format.to_uppercase()));
            let r = processor.convert(format).await;
            bar.finish_and_clear();
            (format!("converted to {}", format.to_uppercase()), r)
        }
        Job::Sign(options) => {
            let bar = spinner(cli, "Signing document…");
            let r = processor.sign(&options).await;
            bar.finish_and_clear();
            ("signed".to_string(), r)
        }
        Job::Transform(instructions) => {
            let bar = spinner(cli, "Processing document…");
            let r = processor.transform(instructions).await;
            bar.finish_and_clear();
            ("processed".to_string(), r)
        }
    };

    report(cli, &label, &result)?;
    if result.is_success() {
        if let Some(ref path) = doc.output {
            save_output(path, &result).await?;
            if !cli.quiet && !cli.json {
                eprintln!("   saved to {}", bold(&path.display().to_string()));
            }
        }
    }
    Ok(result.is_success())
}

async fn check(cli: &Cli, ctx: &AppContext) -> Result<bool> {
    let key = cli.api_key.as_deref().unwrap_or_default();
    let bar = spinner(cli, "Validating API key…");
    let outcome = ctx.save_credential(key).await;
    bar.finish_and_clear();

    let (ok, message) = match outcome {
        CredentialCheck::Empty => (false, "Please enter a valid API key"),
        CredentialCheck::Valid => (true, "API key validated successfully"),
        CredentialCheck::Invalid => (false, "Invalid API key. Please check and try again."),
    };
    if cli.json {
        println!("{}", serde_json::json!({ "valid": ok, "message": message }));
    } else if !cli.quiet || !ok {
        let mark = if ok { green("✔") } else { red("✘") };
        eprintln!("{mark}  {message}");
    }
    Ok(ok)
}

fn report(cli: &Cli, label: &str, result: &ProcessingResult) -> Result<()> {
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(result).context("Failed to serialise result")?
        );
        return Ok(());
    }
    match result.error() {
        None => {
            if !cli.quiet {
                eprintln!("{}  Document {} successfully", green("✔"), label);
            }
            if let Some(url) = result.file_url() {
                println!("{url}");
            }
        }
        Some(error) => eprintln!("{}  {}", red("✘"), error),
    }
    Ok(())
}

async fn save_output(path: &Path, result: &ProcessingResult) -> Result<()> {
    let body = result.body().unwrap_or_default();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// A spinner on stderr; hidden in quiet / JSON mode.
fn spinner(cli: &Cli, message: &str) -> ProgressBar {
    if cli.quiet || cli.json {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
