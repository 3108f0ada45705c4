use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use spell_core::{
    consts::DEFAULT_TRAIN_RATIO,
    plan,
    wordlist::{normalize, positive_rate, read_words_file, split_words, write_words},
    BloomFilter, BuildConfig, Encoding,
};

#[derive(Parser)]
#[command(name = "spell", about = "Bloom-filter spell checker")]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Build a filter from a dictionary (one word per line) and save it
    Build {
        #[arg(long)]
        dict: PathBuf,
        #[arg(long, default_value = "compiled_bloom_filter.bf")]
        out: PathBuf,
        /// Target false positive rate
        #[arg(long)]
        fp: Option<f64>,
        /// Expected number of elements; only the first N dictionary words are added
        #[arg(long)]
        n: Option<u64>,
        /// JSON build settings; flags override it
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the bit-packed (version 2) container
        #[arg(long, default_value_t = false)]
        packed: bool,
        /// Insert words as they appear instead of lower-casing them
        #[arg(long, default_value_t = false)]
        keep_case: bool,
    },

    /// Check words against a saved filter
    Check {
        #[arg(long)]
        filter: PathBuf,
        /// File with one word per line
        #[arg(long)]
        words: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        keep_case: bool,
        words_inline: Vec<String>,
    },

    /// Report the share of words a saved filter accepts
    Accuracy {
        #[arg(long)]
        filter: PathBuf,
        #[arg(long)]
        words: PathBuf,
        #[arg(long, default_value_t = false)]
        keep_case: bool,
    },

    /// Shuffle a dictionary into training and testing lists
    Split {
        #[arg(long)]
        dict: PathBuf,
        #[arg(long, default_value = "training.txt")]
        train: PathBuf,
        #[arg(long, default_value = "testing.txt")]
        test: PathBuf,
        #[arg(long, default_value_t = DEFAULT_TRAIN_RATIO)]
        ratio: f64,
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print header and fill statistics of a saved filter
    Info {
        #[arg(long)]
        filter: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn prepare(words: Vec<String>, keep_case: bool) -> Vec<String> {
    if keep_case {
        words
    } else {
        words.iter().map(|w| normalize(w)).collect()
    }
}

fn load_filter(path: &Path) -> Result<BloomFilter> {
    BloomFilter::load(path).with_context(|| format!("loading filter {}", path.display()))
}

fn write_list(path: &Path, words: &[String]) -> Result<()> {
    let mut w = BufWriter::new(
        File::create(path).with_context(|| format!("creating {}", path.display()))?,
    );
    write_words(&mut w, words)?;
    w.flush()?;
    Ok(())
}

fn build(
    dict: &Path,
    out: &Path,
    fp: Option<f64>,
    n: Option<u64>,
    config: Option<&Path>,
    packed: bool,
    keep_case: bool,
) -> Result<()> {
    let mut cfg = match config {
        Some(p) => BuildConfig::load(p).with_context(|| format!("reading config {}", p.display()))?,
        None => BuildConfig::default(),
    };
    if let Some(fp) = fp {
        cfg.false_positive_rate = fp;
    }
    if n.is_some() {
        cfg.expected_elements = n;
    }
    if packed {
        cfg.encoding = Encoding::Packed;
    }
    if keep_case {
        cfg.lowercase = false;
    }
    cfg.validate()?;

    let words = read_words_file(dict).with_context(|| format!("reading dictionary {}", dict.display()))?;
    if words.is_empty() {
        bail!("dictionary {} has no words", dict.display());
    }
    let n = cfg.expected_elements.unwrap_or(words.len() as u64);
    tracing::debug!(read = words.len(), n, fp = cfg.false_positive_rate, "dictionary loaded");
    let sizing = plan(n, cfg.false_positive_rate)?;
    let mut bf = BloomFilter::from_plan(&sizing)?;

    println!("Size of bitset: {}", bf.m());
    println!("Number of hash functions: {}", bf.k());
    println!("Number of elements: {}", bf.n());

    let take = usize::try_from(n).unwrap_or(usize::MAX);
    for word in words.iter().take(take) {
        if cfg.lowercase {
            bf.add(normalize(word));
        } else {
            bf.add(word);
        }
    }

    bf.save_with(out, cfg.encoding)
        .with_context(|| format!("saving filter {}", out.display()))?;
    println!("Bloom filter saved to {}", out.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Cmd::Build { dict, out, fp, n, config, packed, keep_case } => {
            build(&dict, &out, fp, n, config.as_deref(), packed, keep_case)?;
        }
        Cmd::Check { filter, words, keep_case, words_inline } => {
            let bf = load_filter(&filter)?;
            let mut all = words_inline;
            if let Some(p) = words {
                all.extend(read_words_file(&p).with_context(|| format!("reading {}", p.display()))?);
            }
            if all.is_empty() {
                bail!("no words to check; pass them inline or with --words");
            }
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for word in &all {
                let probe = if keep_case { word.clone() } else { normalize(word) };
                if bf.check(&probe) {
                    writeln!(out, "Word '{word}' is possibly correctly spelt.")?;
                } else {
                    writeln!(out, "Word '{word}' is definitely not correctly spelt.")?;
                }
            }
        }
        Cmd::Accuracy { filter, words, keep_case } => {
            let bf = load_filter(&filter)?;
            let list = read_words_file(&words).with_context(|| format!("reading {}", words.display()))?;
            let list = prepare(list, keep_case);
            let rate = positive_rate(&bf, &list);
            println!("Accuracy: {:.2}%", rate * 100.0);
        }
        Cmd::Split { dict, train, test, ratio, seed } => {
            let words = read_words_file(&dict).with_context(|| format!("reading {}", dict.display()))?;
            let mut rng = match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_os_rng(),
            };
            let (training, testing) = split_words(words, ratio, &mut rng)?;
            write_list(&train, &training)?;
            write_list(&test, &testing)?;
            println!(
                "split: training={} ({}), testing={} ({})",
                training.len(),
                train.display(),
                testing.len(),
                test.display()
            );
        }
        Cmd::Info { filter } => {
            let hdr = spell_core::read_header(&filter)
                .with_context(|| format!("reading header {}", filter.display()))?;
            let bf = load_filter(&filter)?;
            println!("version : {}", hdr.encoding.version());
            println!("m       : {}", bf.m());
            println!("k       : {}", bf.k());
            println!("bits set: {} ({:.2}%)", bf.bits_set(), bf.fill_ratio() * 100.0);
            println!("est. fpp: {:.6}", bf.estimated_fpp());
        }
    }
    Ok(())
}
