use clap::{Parser, Subcommand};
use memeforge::generate::{self, MemeRequest};
use memeforge::ingest::{self, Ingestor, supported_extensions};
use memeforge::resources::Resources;
use memeforge::{config, output};
use rand::SeedableRng;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "memeforge")]
#[command(about = "Caption images with quotes")]
#[command(long_about = "\
Caption images with quotes

Resources are looked up under the project root, the nearest directory above
the working directory that contains .git (or the config's root_marker when
--config is given):

  <root>/
  ├── config/memeforge.json        # Optional; see 'memeforge gen-config'
  └── res/
      ├── fonts/                   # OpenSans-Regular.ttf (else a bitmap font)
      ├── images/                  # Random image pool
      ├── quotes/                  # *.csv *.docx *.txt *.pdf
      └── default/                 # default.jpg, default.txt fallbacks

Quote formats:
  CSV        header row with 'body' and 'author' columns
  DOCX/TXT   one quote per paragraph/line: <body> - <author>
  PDF        extracted text, one quote per line: <body> - <author>

Set RUST_LOG (e.g. RUST_LOG=memeforge=debug) to control log output.")]
#[command(version)]
struct Cli {
    /// Config file (default: <project root>/config/memeforge.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Caption an image; anything omitted is picked at random
    Generate {
        /// Image to caption (relative paths are under the project root)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Quote body (requires --author)
        #[arg(long)]
        body: Option<String>,
        /// Quote author (requires --body)
        #[arg(long)]
        author: Option<String>,
    },
    /// Print the quotes found in FILES (default: every file in the quotes directory).
    /// Named files are read as given; a missing one is reported, not replaced.
    Quotes {
        files: Vec<PathBuf>,
    },
    /// Serve the web form
    #[cfg(feature = "server")]
    Serve {
        #[arg(long, default_value = "127.0.0.1:5000")]
        addr: String,
    },
    /// Print a stock config with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("memeforge=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Generate { path, body, author } => {
            let resources = load_resources(cli.config.as_deref())?;
            let request = MemeRequest { path, body, author };
            let mut rng = rand::rngs::StdRng::from_entropy();
            match generate::generate_meme(&resources, &request, &mut rng) {
                Ok(meme) => output::print_meme_created(&meme),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
        Command::Quotes { files } => {
            let resources = load_resources(cli.config.as_deref())?;
            let ingestor = Ingestor::new(&resources);
            let files = if files.is_empty() {
                ingestor.quote_files()
            } else {
                files
            };
            tracing::debug!(
                "Ingesting {} files (supported: {})",
                files.len(),
                supported_extensions().join(", ")
            );
            let reports: Vec<output::FileReport> = ingest::parse_each(files);
            output::print_quotes_output(&reports);
        }
        #[cfg(feature = "server")]
        Command::Serve { addr } => {
            let resources = load_resources(cli.config.as_deref())?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(memeforge::web::serve(resources, &addr))?;
        }
        Command::GenConfig => {
            eprint!("{}", config::stock_config_notes());
            println!("{}", config::stock_config_json());
        }
    }

    Ok(())
}

/// Resolve the project root and config, then install the config process-wide.
fn load_resources(
    config_path: Option<&std::path::Path>,
) -> Result<Resources, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let (root, loaded) = match config_path {
        Some(path) => {
            if !path.is_file() {
                return Err(format!("config file {} not found", path.display()).into());
            }
            let loaded = config::load_config(path)?;
            let root = config::locate_project_root(&cwd, &loaded.root_marker).unwrap_or(cwd);
            (root, loaded)
        }
        None => config::discover(&cwd)?,
    };
    let installed = config::init(loaded);
    tracing::debug!("Project root: {}", root.display());
    Ok(Resources::new(root, installed.clone()))
}
