//! ngdoc — extract @ngdoc documentation records as JSON.
//!
//! - **stdout mode**: `ngdoc src/` prints every record as one JSON array
//! - **file mode**: `ngdoc -o docs/api src/**/*.js` writes one file per source

use anyhow::{bail, Context, Result};
use clap::Parser;
use ngdoc::render;
use ngdoc::{DocIndexBuilder, DocRecord, SourceFile};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ngdoc",
    about = "Extract @ngdoc documentation records from annotated source files"
)]
struct Cli {
    /// Input files, directories or glob patterns
    #[arg(required = true)]
    files: Vec<String>,

    /// Output directory. If omitted, records are written to stdout.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: json (default), jsonl
    #[arg(short = 'f', long, default_value = "json")]
    format: String,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// File extensions picked up when scanning directories
    #[arg(
        short = 'e',
        long = "extension",
        value_delimiter = ',',
        default_value = "js,ngdoc"
    )]
    extensions: Vec<String>,

    /// Report records whose module could not be resolved
    #[arg(long)]
    unresolved: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("NGDOC_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let renderer = render::create_renderer(&cli.format, cli.pretty)?;

    let input_files = expand_globs(&cli.files, &cli.extensions)?;
    if input_files.is_empty() {
        bail!("no input files matched");
    }

    // Every file must be parsed before any module is resolved.
    let mut builder = DocIndexBuilder::new();
    for path in &input_files {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        builder.add_file(&SourceFile::new(path.to_string_lossy(), extension, content));
    }
    let mut index = builder.seal();
    index.backfill_all();

    if cli.unresolved {
        for doc in index.unresolved() {
            eprintln!(
                "unresolved module: {} ({})",
                doc.name.as_deref().unwrap_or("<unnamed>"),
                doc.file
            );
        }
    }

    match cli.output {
        Some(ref output_dir) => {
            fs::create_dir_all(output_dir).with_context(|| {
                format!("failed to create output directory: {}", output_dir.display())
            })?;
            for file in index.files() {
                // Skip files without documentation
                if file.docs.is_empty() {
                    continue;
                }
                let name = derive_output_name(&file.file_name);
                let out_path =
                    output_dir.join(format!("{}.{}", name, renderer.file_extension()));
                fs::write(&out_path, renderer.render(&file.docs)?)
                    .with_context(|| format!("failed to write {}", out_path.display()))?;
            }
        }
        None => {
            let all: Vec<DocRecord> = index.files().flat_map(|f| f.docs.iter().cloned()).collect();
            print!("{}", renderer.render(&all)?);
        }
    }

    Ok(())
}

/// Expand glob patterns into a list of real file paths.
/// Bare directories are scanned recursively for the given extensions.
fn expand_globs(patterns: &[String], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            for ext in extensions {
                let dir_pattern = format!("{}/**/*.{}", pattern.trim_end_matches('/'), ext);
                files.extend(glob_files(&dir_pattern)?);
            }
            continue;
        }
        let matches = glob_files(pattern)?;
        if matches.is_empty() {
            warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

fn glob_files(pattern: &str) -> Result<Vec<PathBuf>> {
    Ok(glob::glob(pattern)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect())
}

/// Derive the output file name (without extension) from a source path.
/// "src/ui/tabs.js" → "src.ui.tabs", "intro.ngdoc" → "intro"
fn derive_output_name(source: &str) -> String {
    let trimmed = source.trim_start_matches("./").trim_start_matches('/');
    let stem = match trimmed.rfind('.') {
        Some(dot) if !trimmed[dot..].contains(['/', '\\']) && dot > 0 => &trimmed[..dot],
        _ => trimmed,
    };
    stem.replace(['/', '\\'], ".")
}
