// VecDocs — main.rs
// Binary entry point: runs example programs and splices their output
// back into the source.
// Author: d65v <https://github.com/d65v>

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};

use vecdocs::runner::{clean_file, list_programs, Runner, RunnerConfig};

/// Keep the documented output of example programs current.
#[derive(Parser, Debug)]
#[command(name = "vecdocs", version, about)]
struct Cli {
    /// Log more (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a program and splice its output under each print call
    Run(RunArgs),

    /// Strip spliced output without running
    Clean {
        file: PathBuf,

        /// Rewrite the file instead of writing <stem>_copy.<ext>
        #[arg(short, long)]
        write: bool,
    },

    /// List example programs and their print calls
    List {
        #[arg(default_value = "example")]
        dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    file: PathBuf,

    /// Placeholder file, `KEY="VALUE"` per line
    #[arg(short, long, env = "VECDOCS_ENV_FILE", default_value = ".env")]
    env: PathBuf,

    /// Command to run instead of the language default ({file}, {stem}, {dir})
    #[arg(long, env = "VECDOCS_EXEC")]
    exec: Option<String>,

    /// Rewrite the file instead of writing <stem>_copy.<ext>
    #[arg(short, long)]
    write: bool,

    /// Keep the temporary program and echo raw output
    #[arg(short, long)]
    debug: bool,

    /// Truncate spliced JSON arrays to this many items
    #[arg(long, env = "VECDOCS_MAX_ITEMS")]
    max_items: Option<usize>,

    /// Lines containing this marker get their data paths rewritten
    #[arg(long, default_value = "DATA_FILE")]
    data_marker: String,

    /// Relative prefix removed from data paths while running
    #[arg(long, default_value = "../../")]
    data_prefix: String,
}

impl From<RunArgs> for RunnerConfig {
    fn from(args: RunArgs) -> Self {
        Self {
            env_file: Some(args.env),
            exec: args.exec,
            write: args.write,
            debug: args.debug,
            max_items: args.max_items,
            data_marker: args.data_marker,
            data_prefix: args.data_prefix,
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Load .env if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Run(args) => {
            let file = args.file.clone();
            let debug = args.debug;
            let runner = Runner::new(args.into())?;
            let report = runner
                .run(&file)
                .with_context(|| format!("running {}", file.display()))?;
            if debug {
                print!("{}", report.raw_output);
            }
            println!(
                "{}: {} outputs spliced into {}",
                file.display(),
                report.prints,
                report.output_path.display()
            );
        }
        Command::Clean { file, write } => {
            let out = clean_file(&file, write)
                .with_context(|| format!("cleaning {}", file.display()))?;
            println!("cleaned {} -> {}", file.display(), out.display());
        }
        Command::List { dir } => {
            let programs =
                list_programs(&dir).with_context(|| format!("listing {}", dir.display()))?;
            for (path, prints) in programs {
                println!("{:<48} {:>3} print calls", path.display(), prints);
            }
        }
    }

    Ok(())
}
