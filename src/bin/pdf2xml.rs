//! CLI binary for edgequake-pdf2xml.
//!
//! A thin shim over the library's [`Session`]: the input path is staged the
//! way a drag-and-drop would stage it, converted, then printed, saved or
//! copied.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2xml::session::MSG_NOT_A_PDF;
use edgequake_pdf2xml::{
    inspect, CandidateFile, ConversionConfig, ConversionProgressCallback, LineEnding,
    Osc52Clipboard, PageSelection, ProgressCallback, Session, StatusKind,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
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
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a bar over the selected pages plus one log
/// line per page.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// The bar starts as a spinner; `on_conversion_start` sets its length.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Extracting");
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, item_count: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{item_count:>5} text items")),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, _total_pages: usize) {
        self.bar.finish_and_clear();
    }

    fn on_conversion_failed(&self, _error: &str) {
        self.bar.abandon();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Print XML to stdout
  pdf2xml document.pdf

  # Save next to a chosen directory as document.xml
  pdf2xml document.pdf -d out/

  # Save to an explicit file
  pdf2xml document.pdf -o text.xml

  # Pages 1-5, four-space indent, CRLF line endings
  pdf2xml --pages 1-5 --indent 4 --crlf paper.pdf

  # Copy to the clipboard through the terminal (OSC 52)
  pdf2xml --copy document.pdf

  # Inspect PDF metadata only
  pdf2xml --inspect-only document.pdf

OUTPUT SHAPE:
  <?xml version="1.0" encoding="UTF-8"?>
  <pdf>
    <metadata>
      <filename>document.pdf</filename>
      <pages>12</pages>
    </metadata>
    <page number="1">
      <textItem id="0" x="72" y="720">
        text of the run
      </textItem>
    </page>
  </pdf>

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH  Path to libpdfium (file or directory)
  RUST_LOG         Override log filter
"#;

/// Convert PDF files to positioned-text XML.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2xml",
    version,
    about = "Convert PDF files to positioned-text XML",
    long_about = "Extract the text runs of every PDF page with pdfium and write them as an \
indented XML document, one <textItem> per run with its x/y position.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path. Must have a .pdf extension.
    input: PathBuf,

    /// Write XML to this file instead of stdout.
    #[arg(short, long, env = "PDF2XML_OUTPUT", conflicts_with = "download_dir")]
    output: Option<PathBuf>,

    /// Save XML into this directory, named after the input (`x.pdf` → `x.xml`).
    #[arg(short, long, env = "PDF2XML_DOWNLOAD_DIR")]
    download_dir: Option<PathBuf>,

    /// Copy the XML to the clipboard via an OSC 52 terminal sequence.
    #[arg(long, env = "PDF2XML_COPY")]
    copy: bool,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2XML_PAGES", default_value = "all")]
    pages: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2XML_PASSWORD")]
    password: Option<String>,

    /// Spaces per nesting level (0–8).
    #[arg(long, env = "PDF2XML_INDENT", default_value_t = 2,
          value_parser = clap::value_parser!(u8).range(0..=8))]
    indent: u8,

    /// Use CRLF line endings.
    #[arg(long, env = "PDF2XML_CRLF")]
    crlf: bool,

    /// Fixed decimals for x/y coordinates (0–6). Default: shortest form.
    #[arg(long, env = "PDF2XML_PRECISION",
          value_parser = clap::value_parser!(u8).range(0..=6))]
    precision: Option<u8>,

    /// Output structured JSON (ConversionOutput) instead of XML.
    #[arg(long, env = "PDF2XML_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2XML_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2XML_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2XML_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the progress bar is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input, cli.password.as_deref())
            .await
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Build config and stage the input ─────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;
    let mut session = Session::new(config);

    let file = CandidateFile::from_path(&cli.input)
        .await
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    session.drop_file(file).context(MSG_NOT_A_PDF)?;

    // ── Run conversion ───────────────────────────────────────────────────
    session.convert().await.context("Conversion failed")?;
    let Some(output) = session.output() else {
        anyhow::bail!("Conversion produced no output");
    };
    let stats = output.stats.clone();

    if let Some(ref path) = cli.output {
        session
            .save_as(path)
            .await
            .context("Failed to save XML")?;
        report_saved(&cli, path, &stats);
    } else if let Some(ref dir) = cli.download_dir {
        if let Some(path) = session
            .download(dir)
            .await
            .context("Failed to save XML")?
        {
            report_saved(&cli, &path, &stats);
        }
    } else if cli.json {
        let json = serde_json::to_string_pretty(output).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.xml.as_bytes())
            .context("Failed to write to stdout")?;
        handle.write_all(b"\n").ok();
    }

    if cli.copy {
        let mut clipboard = Osc52Clipboard::stderr();
        session.copy_to(&mut clipboard);
        if let Some(status) = session.status() {
            if status.kind == StatusKind::Error {
                eprintln!("{} {}", red("✘"), status.message);
            } else if !cli.quiet {
                eprintln!("{} {}", green("✔"), status.message);
            }
        }
    }

    if !cli.quiet && cli.output.is_none() && cli.download_dir.is_none() {
        eprintln!(
            "{} {}/{} pages  {} text items  {}ms",
            green("✔"),
            stats.converted_pages,
            stats.total_pages,
            stats.text_items,
            stats.total_duration_ms,
        );
    }

    Ok(())
}

fn report_saved(cli: &Cli, path: &std::path::Path, stats: &edgequake_pdf2xml::ConversionStats) {
    if cli.quiet {
        return;
    }
    eprintln!(
        "{}  {}/{} pages  {} text items  {}ms  →  {}",
        green("✔"),
        stats.converted_pages,
        stats.total_pages,
        stats.text_items,
        stats.total_duration_ms,
        bold(&path.display().to_string()),
    );
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let pages = parse_pages(&cli.pages)?;

    let mut builder = ConversionConfig::builder()
        .pages(pages)
        .indent(cli.indent as usize)
        .line_ending(if cli.crlf {
            LineEnding::Crlf
        } else {
            LineEnding::Lf
        });

    if let Some(p) = cli.precision {
        builder = builder.coordinate_precision(p as usize);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(&p) = pages.iter().find(|&&p| p < 1) {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}
