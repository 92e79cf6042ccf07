use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use search_core::{
    paginate, remove_duplicates_with, DocId, Document, DocumentStatus, ExecutionMode, RequestQueue,
    SearchConfig, SearchServer,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: DocId,
    text: String,
    #[serde(default)]
    status: DocumentStatus,
    #[serde(default)]
    ratings: Vec<i32>,
}

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Load documents into an in-memory TF-IDF index and query it", long_about = None)]
struct Cli {
    #[command(flatten)]
    index: IndexArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IndexArgs {
    /// Input path (JSON/JSONL file or directory)
    #[arg(long)]
    input: PathBuf,
    /// JSON file with engine settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Whitespace-separated stop words, replacing those from --config
    #[arg(long)]
    stop_words: Option<String>,
    /// Fan work out over the rayon thread pool
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the top documents for a query
    Search {
        query: String,
        /// Only return documents with this status
        #[arg(long, value_parser = parse_status, default_value = "ACTUAL")]
        status: DocumentStatus,
    },
    /// Print the query words found in one document
    Match {
        query: String,
        #[arg(long)]
        id: DocId,
    },
    /// Remove documents with identical word sets and print the removed ids
    Dedup,
    /// Run every line of a file as a query and report empty results
    Batch {
        /// File with one query per line
        queries: PathBuf,
        /// Documents per printed page
        #[arg(long, default_value_t = 2)]
        page_size: usize,
    },
}

#[derive(Serialize)]
struct MatchOutput<'a> {
    id: DocId,
    status: DocumentStatus,
    words: Vec<&'a str>,
}

fn parse_status(s: &str) -> Result<DocumentStatus, String> {
    serde_json::from_value(serde_json::Value::String(s.to_ascii_uppercase()))
        .map_err(|_| format!("unknown status {s:?}, expected ACTUAL, IRRELEVANT, BANNED or REMOVED"))
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let mode = if cli.index.parallel {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Sequential
    };
    let mut server = build_server(&cli.index)?;

    match cli.command {
        Commands::Search { query, status } => {
            let found = server.find_top_documents_with(mode, &query, status.filter())?;
            println!("{}", serde_json::to_string_pretty(&found)?);
        }
        Commands::Match { query, id } => {
            let (words, status) = server.match_document_with(mode, &query, id)?;
            let out = MatchOutput { id, status, words };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Dedup => {
            let removed = remove_duplicates_with(&mut server, mode)?;
            tracing::info!(removed = removed.len(), remaining = server.document_count(), "dedup complete");
            println!("{}", serde_json::to_string(&removed)?);
        }
        Commands::Batch { queries, page_size } => run_batch(&server, &queries, page_size)?,
    }
    Ok(())
}

fn load_config(args: &IndexArgs) -> Result<SearchConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let f = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
            serde_json::from_reader(BufReader::new(f))
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SearchConfig::default(),
    };
    if let Some(text) = &args.stop_words {
        config.stop_words = SearchConfig::with_stop_words(text).stop_words;
    }
    Ok(config)
}

fn build_server(args: &IndexArgs) -> Result<SearchServer> {
    let mut server = SearchServer::new(load_config(args)?)?;
    for file in input_files(&args.input) {
        for doc in read_docs(&file)? {
            server
                .add_document(doc.id, &doc.text, doc.status, &doc.ratings)
                .with_context(|| format!("indexing document {} from {}", doc.id, file.display()))?;
        }
    }
    tracing::info!(
        num_docs = server.document_count(),
        num_terms = server.term_count(),
        "ingested documents"
    );
    Ok(server)
}

fn input_files(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

fn read_docs(file: &Path) -> Result<Vec<InputDoc>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        let mut docs = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let doc = serde_json::from_str(&line)
                .with_context(|| format!("{}:{}", file.display(), n + 1))?;
            docs.push(doc);
        }
        return Ok(docs);
    }

    let json: serde_json::Value =
        serde_json::from_reader(reader).with_context(|| format!("parsing {}", file.display()))?;
    let docs = match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<InputDoc>, _>>()?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => Vec::new(),
    };
    Ok(docs)
}

fn run_batch(server: &SearchServer, queries: &Path, page_size: usize) -> Result<()> {
    let f = File::open(queries).with_context(|| format!("opening {}", queries.display()))?;
    let mut queue = RequestQueue::new(server);
    for line in BufReader::new(f).lines() {
        let query = line?;
        let found: Vec<Document> = queue.add_find_request(&query)?;
        println!("query {query:?}: {} hit(s)", found.len());
        for page in paginate(&found, page_size) {
            println!("{page}");
            println!("Page break");
        }
    }
    println!("empty results: {}", queue.no_result_requests());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_json_and_jsonl_inputs() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("a.jsonl"),
            "{\"id\": 0, \"text\": \"white cat\", \"ratings\": [8, -3]}\n\n{\"id\": 1, \"text\": \"fluffy cat\", \"status\": \"BANNED\"}\n",
        )
        .unwrap();
        fs::write(dir.path().join("b.json"), r#"[{"id": 2, "text": "groomed dog"}]"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let files = input_files(dir.path());
        assert_eq!(files.len(), 2);

        let args = IndexArgs {
            input: dir.path().to_path_buf(),
            config: None,
            stop_words: None,
            parallel: false,
        };
        let server = build_server(&args).unwrap();
        assert_eq!(server.iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        let banned = server
            .find_top_documents_by_status("cat", DocumentStatus::Banned)
            .unwrap();
        assert_eq!(banned.len(), 1);
        assert_eq!(banned[0].id, 1);
    }

    #[test]
    fn stop_words_flag_overrides_config_file() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config.json");
        fs::write(&config, r#"{"max_results": 1, "stop_words": ["cat"]}"#).unwrap();
        let mut args = IndexArgs {
            input: dir.path().join("missing.json"),
            config: Some(config),
            stop_words: None,
            parallel: false,
        };
        assert_eq!(load_config(&args).unwrap().stop_words, vec!["cat"]);
        args.stop_words = Some("dog bird".into());
        let cfg = load_config(&args).unwrap();
        assert_eq!(cfg.stop_words, vec!["dog", "bird"]);
        assert_eq!(cfg.max_results, 1);
    }

    #[test]
    fn status_names_are_case_insensitive() {
        assert_eq!(parse_status("banned").unwrap(), DocumentStatus::Banned);
        assert!(parse_status("deleted").is_err());
    }
}
