use anagram_search::{LetterPool, PhraseList, PrintSentences, SearchConfig, SentenceBuilder};
use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_PHRASE_LIST: &str = "phrases.txt";

/// Find anagrams of a word or phrase.
#[derive(Parser, Debug)]
#[command(name = "anagram_search")]
struct Args {
    /// Filter mode: read the phrase list from stdin
    #[arg(short = 'f', long)]
    filter: bool,

    /// Phrase list, one phrase per line ("-" reads stdin)
    #[arg(short = 'l', long, env = "ANAGRAM_PHRASE_LIST")]
    list: Option<PathBuf>,

    /// Number of worker threads
    #[arg(short = 't', long, env = "ANAGRAM_THREADS", default_value = "1")]
    threads: NonZeroUsize,

    /// Limit results to this many words or fewer (0 for no limit)
    #[arg(short = 'w', long, env = "ANAGRAM_MAX_WORDS", default_value_t = 0)]
    max_words: usize,

    /// Words whose letters are rearranged
    #[arg(required = true)]
    subject: Vec<String>,
}

impl Args {
    fn config(&self) -> SearchConfig {
        SearchConfig::default()
            .with_threads(self.threads)
            .with_word_limit(self.max_words)
    }

    /// The pool alphabet is lowercase only.
    fn subject(&self) -> String {
        self.subject.join(" ").to_lowercase()
    }

    /// Where phrases come from; `None` is stdin.
    fn list_path(&self) -> Option<PathBuf> {
        if self.filter {
            if let Some(path) = &self.list {
                warn!(path = %path.display(), "filter mode reads stdin, ignoring phrase list");
            }
            return None;
        }
        match &self.list {
            Some(path) if path.as_os_str() == "-" => None,
            Some(path) => Some(path.clone()),
            None => Some(PathBuf::from(DEFAULT_PHRASE_LIST)),
        }
    }
}

/// `RUST_LOG`-style directives, falling back to `warn` when there are none.
fn log_filter(directives: Option<String>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives.unwrap_or_default())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = args.config();
    let subject = args.subject();
    let pool = LetterPool::from_letters(&subject);

    let phrases = match args.list_path() {
        None => PhraseList::load(io::stdin().lock(), &pool)?,
        Some(path) => {
            let file =
                File::open(&path).with_context(|| format!("opening {}", path.display()))?;
            PhraseList::load(BufReader::new(file), &pool)?
        }
    };
    info!(subject = %subject, pool = %pool, phrases = phrases.len(), ?config, "starting search");

    let stats = SentenceBuilder::new(&phrases).run_with_config(&pool, &config, &PrintSentences)?;
    info!(sentences = stats.sentences, placements = stats.placements, "done");
    Ok(())
}
