// src/commands.rs

use anyhow::{
    Result,
    Context
};
use clap::{
    Parser,
    Subcommand,
    ValueEnum
};
use std::{
    fs,
    io::{
        self,
        BufWriter,
        Write
    },
    path::{
        Path,
        PathBuf
    }
};
use crate::{
    config::Config,
    copyright::{
        self,
        YearPolicy
    },
    docgen,
    model::HttpModel
};


#[derive(Parser, Debug)]
#[command(name = "docgen")]
#[command(about = "Draft Markdown docs for documented C++ declarations, and keep copyright headers current", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (default: ./docgen.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Warnings and errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract documented declarations and draft docs for each with the local model
    Generate {
        /// Source tree to walk (default: config `root`, i.e. ./Source)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Write Markdown here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Completions endpoint, overrides config
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Print extracted units as JSONL without calling the model
    Extract {
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Add or refresh copyright notices across the source tree
    Copyright {
        /// `commit`: date notices by each file's last commit
        #[arg(value_enum)]
        mode: Option<YearMode>,
        /// First publish year; notices never go below it
        #[arg(requires = "mode")]
        year: Option<i32>,
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum YearMode {
    Commit,
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Generate { root, out, endpoint } => {
            if let Some(endpoint) = endpoint {
                config.model.endpoint = endpoint;
            }
            let root = root.unwrap_or_else(|| config.root.clone());
            generate(&root, out.as_deref(), &config)?
        }
        Command::Extract { root } => {
            let root = root.unwrap_or_else(|| config.root.clone());
            extract(&root, &config)?
        }
        Command::Copyright { mode, year, root } => {
            let root = root.unwrap_or_else(|| config.root.clone());
            let policy = match mode {
                Some(YearMode::Commit) => {
                    log::info!("Fixing ©");
                    YearPolicy::commit(year)
                }
                None => YearPolicy::current(),
            };
            update_copyright(&root, policy, &config)?
        }
    }
    Ok(())
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // reqwest/hyper are chatty at debug
    if quiet_http_logs(cli.verbose, std::env::var_os("RUST_LOG").is_some()) {
        builder.filter_module("reqwest", log::LevelFilter::Warn);
        builder.filter_module("hyper_util", log::LevelFilter::Warn);
    }
    builder.target(env_logger::Target::Stderr).init();
}

/// HTTP client logs are capped at warn unless `-v` or `RUST_LOG` asks otherwise.
fn quiet_http_logs(verbose: bool, rust_log_set: bool) -> bool {
    !verbose && !rust_log_set
}

fn generate(root: &Path, out: Option<&Path>, config: &Config) -> Result<()> {
    let model = HttpModel::new(&config.model).context("building model client")?;
    log::info!("[docgen] model endpoint {}", model.endpoint());

    let mut sink: Box<dyn Write> = match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            let f = fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            Box::new(BufWriter::new(f))
        }
        None => Box::new(io::stdout().lock()),
    };

    let n = docgen::generate_tree(root, config, &model, sink.as_mut())?;
    sink.flush().context("flushing output")?;

    if let Some(path) = out {
        println!("Documented {} units into {}", n, path.display());
    }
    Ok(())
}

fn extract(root: &Path, config: &Config) -> Result<()> {
    let units = docgen::extract_units(root, config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for unit in &units {
        writeln!(out, "{}", serde_json::to_string(unit)?)?;
    }
    out.flush()?;
    log::info!("[extract] {} units under {}", units.len(), root.display());
    Ok(())
}

fn update_copyright(root: &Path, policy: YearPolicy, config: &Config) -> Result<()> {
    let summary = copyright::update_tree(root, &config.copyright, |path| policy.year_for(path))
        .with_context(|| format!("updating copyright under {}", root.display()))?;
    println!(
        "Copyright: {} updated, {} unchanged, {} generated skipped",
        summary.updated, summary.unchanged, summary.generated
    );
    Ok(())
}
