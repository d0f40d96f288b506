mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use nestor_lib::context::{AddOptions, Context as StoreContext};
use nestor_lib::inputs::RawInputs;
use nestor_lib::inputs::parse::parse_dep;
use nestor_lib::inspect::Freshness;
use nestor_lib::platform::link::LinkPolicy;
use nestor_lib::store::entry::TransferMode;

use cmd::{cmd_add, cmd_check, cmd_get, cmd_info, cmd_init, cmd_update};
use output::{OutputFormat, print_error};

/// nestor - content-addressed storage for build results
#[derive(Parser)]
#[command(name = "ne")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Run as if started in this directory
  #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
  directory: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

/// Flags shared by `add` and `update`.
#[derive(Args)]
struct StoreArgs {
  /// Input the result was built from; a path to an existing file or a literal value
  #[arg(short = 'd', long = "dep", value_name = "NAME:VALUE", required = true, value_parser = parse_dep)]
  deps: Vec<(String, String)>,

  /// Replace a file or directory standing where the link goes
  #[arg(short, long)]
  force: bool,

  /// Re-hash the inputs of an already stored entry and fail if they differ
  #[arg(long)]
  verify: bool,
}

impl StoreArgs {
  fn inputs(&self) -> RawInputs {
    self.deps.iter().cloned().collect()
  }

  fn options(&self, mode: TransferMode) -> AddOptions {
    AddOptions {
      mode,
      link_policy: if self.force {
        LinkPolicy::Replace
      } else {
        LinkPolicy::Refuse
      },
      verify: self.verify,
    }
  }
}

#[derive(Subcommand)]
enum Commands {
  /// Create a store in a directory
  Init {
    /// Directory to create `.ne/store` in
    #[arg(default_value = ".")]
    path: PathBuf,
  },

  /// Store a build result under the hash of its inputs
  Add {
    /// The build result to store
    result: PathBuf,

    /// Where to create the link (default: the result path itself)
    #[arg(short, long, value_name = "PATH")]
    link: Option<PathBuf>,

    /// Copy the result instead of moving it
    #[arg(long, requires = "link")]
    copy: bool,

    #[command(flatten)]
    store: StoreArgs,
  },

  /// Re-store a linked result with some inputs changed
  Update {
    /// Link to a stored result
    link: PathBuf,

    #[command(flatten)]
    store: StoreArgs,
  },

  /// Show the entry and recorded inputs behind a link
  Info {
    link: PathBuf,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },

  /// Check whether a link's recorded inputs still hash to its entry
  Check {
    link: PathBuf,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },

  /// Replace a link with a writable copy of its result
  Get { link: PathBuf },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match run(cli) {
    Ok(code) => code,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<ExitCode> {
  let cwd = std::env::current_dir().context("Failed to determine current directory")?;
  let start_dir = match cli.directory {
    Some(dir) => cwd.join(dir),
    None => cwd,
  };
  let ctx = StoreContext::from_env(start_dir);
  debug!(start_dir = %ctx.start_dir.display(), store_override = ?ctx.store_override, "resolved context");

  match cli.command {
    Commands::Init { path } => cmd_init(&ctx.resolve_path(&path))?,
    Commands::Add {
      result,
      link,
      copy,
      store,
    } => {
      let mode = if copy { TransferMode::Copy } else { TransferMode::Move };
      cmd_add(&ctx, &result, &store.inputs(), link.as_deref(), &store.options(mode))?
    }
    Commands::Update { link, store } => cmd_update(&ctx, &link, &store.inputs(), &store.options(TransferMode::Copy))?,
    Commands::Info { link, output } => cmd_info(&ctx, &link, output)?,
    Commands::Check { link, output } => {
      if cmd_check(&ctx, &link, output)? == Freshness::Stale {
        return Ok(ExitCode::from(1));
      }
    }
    Commands::Get { link } => cmd_get(&ctx, &link)?,
  }

  Ok(ExitCode::SUCCESS)
}
