//! pdfvault CLI - extract PDFs and store them as JSON or database records

use std::path::{Path, PathBuf};

use clap::{ArgGroup, Parser, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfvault::{
    BatchEvent, BatchProcessor, Config, DatabaseStore, DocumentSummary, JsonStore, StorageMode,
    StoredDocument,
};

#[derive(Parser)]
#[command(name = "pdfvault")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract PDF text and metadata into JSON files or a database", long_about = None)]
#[command(group(
    ArgGroup::new("action")
        .args(["list", "show", "search", "delete"])
        .multiple(false)
))]
struct Cli {
    /// Directory containing PDF files (defaults to PDF_INPUT_DIR)
    #[arg(long, value_name = "DIR", conflicts_with = "action")]
    input: Option<PathBuf>,

    /// Where to save extracted documents
    #[arg(long, value_enum, default_value = "json", conflicts_with = "action")]
    storage: StorageArg,

    /// List stored documents instead of processing
    #[arg(long, value_enum, value_name = "STORE")]
    list: Option<ListTarget>,

    /// Show a stored document with its pages
    #[arg(long, value_name = "ID")]
    show: Option<i32>,

    /// Find stored documents whose file name contains TEXT
    #[arg(long, value_name = "TEXT")]
    search: Option<String>,

    /// Delete a stored document and its pages
    #[arg(long, value_name = "ID")]
    delete: Option<i32>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum StorageArg {
    /// JSON files in JSON_OUTPUT_DIR
    Json,
    /// The configured database
    Database,
    /// JSON files and the database
    Both,
}

impl From<StorageArg> for StorageMode {
    fn from(arg: StorageArg) -> Self {
        match arg {
            StorageArg::Json => StorageMode::Json,
            StorageArg::Database => StorageMode::Database,
            StorageArg::Both => StorageMode::Both,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ListTarget {
    /// Saved JSON files
    Json,
    /// Database records
    Database,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result = match Config::from_env() {
        Ok(config) => run(cli, &config),
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: &Config) -> CliResult {
    if let Some(target) = cli.list {
        return match target {
            ListTarget::Json => cmd_list_json(config),
            ListTarget::Database => cmd_list_database(config),
        };
    }
    if let Some(id) = cli.show {
        return cmd_show(config, id);
    }
    if let Some(needle) = cli.search {
        return cmd_search(config, &needle);
    }
    if let Some(id) = cli.delete {
        return cmd_delete(config, id);
    }

    cmd_process(config, cli.input, cli.storage.into())
}

fn cmd_process(config: &Config, input: Option<PathBuf>, mode: StorageMode) -> CliResult {
    config.ensure_directories()?;

    let input_dir = input.unwrap_or_else(|| config.input_dir.clone());
    if !input_dir.is_dir() {
        return Err(pdfvault::Error::DirectoryNotFound(input_dir).into());
    }

    log::debug!(
        "Storage mode {}, JSON output {}",
        mode,
        config.json_output_dir.display()
    );
    let processor = BatchProcessor::new(mode, config)?;
    println!(
        "{} {} {} {}",
        "Processing".cyan().bold(),
        input_dir.display(),
        "→".dimmed(),
        processor.sink_names().join(" + ")
    );

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = processor.run_with(&input_dir, |event| match event {
        BatchEvent::Started { total } => pb.set_length(*total as u64),
        BatchEvent::FileStarted { index, path } => {
            pb.set_position(*index as u64);
            pb.set_message(file_name(path));
        }
        BatchEvent::Extracted { path, warnings, .. } => {
            for warning in warnings {
                pb.println(format!("{} {}: {}", "⚠".yellow(), file_name(path), warning));
            }
        }
        BatchEvent::Saved {
            path,
            sink,
            location,
        } => pb.println(format!(
            "{} {} {} {}: {}",
            "✓".green(),
            file_name(path),
            "→".dimmed(),
            sink,
            location
        )),
        BatchEvent::FileFailed { path, error } => {
            pb.println(format!("{} {}: {}", "✗".red(), file_name(path), error))
        }
        BatchEvent::Finished(_) => pb.finish_and_clear(),
    })?;

    if report.discovered == 0 {
        println!(
            "{} No PDF files found in {}",
            "⚠".yellow(),
            input_dir.display()
        );
        return Ok(());
    }

    let summary = format!("Processed {}/{} files", report.processed, report.discovered);
    if report.is_complete() {
        println!("\n{} {}", "✓".green(), summary.green().bold());
    } else {
        println!("\n{} {}", "⚠".yellow(), summary.yellow().bold());
    }

    Ok(())
}

fn cmd_list_json(config: &Config) -> CliResult {
    let store = JsonStore::new(&config.json_output_dir)?;
    let files = store.list()?;

    if files.is_empty() {
        println!(
            "{} No JSON files in {}",
            "⚠".yellow(),
            store.output_dir().display()
        );
        return Ok(());
    }

    println!("{}", "JSON files".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for path in &files {
        println!("  {}", file_name(path));
    }
    println!("\n{} file(s)", files.len());

    Ok(())
}

fn cmd_list_database(config: &Config) -> CliResult {
    let store = DatabaseStore::open(&config.database_url())?;
    let documents = store.list()?;

    if documents.is_empty() {
        println!("{} No documents in the database", "⚠".yellow());
        return Ok(());
    }

    println!("{}", "Stored documents".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for summary in &documents {
        print_summary(summary);
    }
    println!("\n{} document(s)", documents.len());

    Ok(())
}

fn cmd_show(config: &Config, id: i32) -> CliResult {
    let store = DatabaseStore::open(&config.database_url())?;
    let Some(stored) = store.get(id)? else {
        println!("{} Document {} not found", "✗".red(), id);
        return Ok(());
    };

    print_document(&stored);
    Ok(())
}

fn cmd_search(config: &Config, needle: &str) -> CliResult {
    let store = DatabaseStore::open(&config.database_url())?;
    let found = store.search(needle)?;

    if found.is_empty() {
        println!("{} No documents match '{}'", "⚠".yellow(), needle);
        return Ok(());
    }

    for stored in &found {
        let doc = &stored.document;
        println!(
            "{} {} {} ({} pages)",
            format!("[{}]", stored.id).dimmed(),
            doc.filename.bold(),
            doc.title.as_deref().unwrap_or("-"),
            doc.page_count
        );
    }
    println!("\n{} match(es)", found.len());

    Ok(())
}

fn cmd_delete(config: &Config, id: i32) -> CliResult {
    let store = DatabaseStore::open(&config.database_url())?;
    if store.delete(id)? {
        println!("{} Deleted document {}", "✓".green(), id);
    } else {
        println!("{} Document {} not found", "⚠".yellow(), id);
    }
    Ok(())
}

fn print_summary(summary: &DocumentSummary) {
    println!(
        "{} {} {} pages, {} {}",
        format!("[{}]", summary.id).dimmed(),
        summary.filename.bold(),
        summary.page_count,
        summary.author.as_deref().unwrap_or("unknown author"),
        summary.processed_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
    );
    if let Some(ref title) = summary.title {
        println!("    {}", title);
    }
}

fn print_document(stored: &StoredDocument) {
    let doc = &stored.document;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "ID".bold(), stored.id);
    println!("{}: {}", "File".bold(), doc.filename);
    println!("{}: {}", "Source".bold(), doc.source_path);
    println!("{}: {}", "Pages".bold(), doc.page_count);
    if let Some(ref title) = doc.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = doc.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(created) = doc.created_at {
        println!("{}: {}", "Created".bold(), created.to_rfc3339());
    }
    if let Some(processed) = doc.processed_at {
        println!("{}: {}", "Processed".bold(), processed.to_rfc3339());
    }

    for page in &doc.pages {
        println!();
        println!(
            "{}",
            format!("── Page {} ──", page.page_number).cyan().bold()
        );
        if page.is_empty() {
            println!("{}", "(no text)".dimmed());
        } else {
            println!("{}", page.content);
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
