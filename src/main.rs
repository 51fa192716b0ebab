use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use walkdir::WalkDir;
use wl_config::category::FolderCategory;
use wl_config::storage::{LocalBucket, StorageService, UploadSource};
use wl_config::{config, generate, naming, output, session};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "wl-config")]
#[command(about = "White-label image configuration tool")]
#[command(long_about = "\
White-label image configuration tool

Uploads a white label's images into its storage namespace and compiles the
uploaded files, their links and the home grid buttons into the JSON
documents the client app reads.

Folders:

  app/<wl-name>/home/
  ├── banners_principais/topo/        → slides
  ├── banners_principais/horizontal/  → banners
  ├── mini_banners/                   → formattedBanners.smallImages
  ├── normal_banners/                 → formattedBanners.normalImages
  ├── extra_mini_buttons/             → miniExtraButtons
  ├── logo_images/                    → <wl-name>-logo.json
  └── email_template/                 → <wl-name>-template.json

Session file (input of 'check' and 'generate'):

  {
    \"wlName\": \"acme\",
    \"uploads\": { \"mini_banners\": [{ \"filename\": \"a.png\", \"url\": \"...\" }] },
    \"links\": { \"mini_banners\": { \"a.png\": { \"urlType\": \"external\", \"url\": \"...\" } } },
    \"gridButtons\": [{ \"name\": \"...\", \"image\": \"...\", \"urlType\": \"internal\",
                      \"url\": \"/streaming\", \"size\": 25 }]
  }

Run 'wl-config gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Output directory for generated JSON files
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check the storage connection and create a white label's folders
    Setup {
        /// White label name
        #[arg(long)]
        wl_name: String,
    },
    /// Upload images into one folder
    Upload {
        /// White label name
        #[arg(long)]
        wl_name: String,
        /// Folder key, e.g. mini_banners (see 'wl-config folders')
        #[arg(long)]
        folder: FolderCategory,
        /// Print the upload response as JSON
        #[arg(long)]
        json: bool,
        /// Image files, or directories to upload every file from
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List folder keys and where their images end up
    Folders,
    /// Validate a session file and summarize the assembled configuration
    Check {
        /// Session JSON file
        session: PathBuf,
    },
    /// Write the config, logo and template JSON files for a session
    Generate {
        /// Session JSON file
        session: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Setup { wl_name } => {
            let config = config::load_config(&cli.config_dir)?;
            let service = StorageService::new(LocalBucket::new(&config.storage.root), &config);
            service.check_connection()?;
            let response = service.setup_folders(&wl_name)?;
            output::print_setup_output(wl_name.trim(), &response);
        }
        Command::Upload {
            wl_name,
            folder,
            json,
            files,
        } => {
            let config = config::load_config(&cli.config_dir)?;
            init_thread_pool(&config.processing);
            let service = StorageService::new(LocalBucket::new(&config.storage.root), &config);
            let sources = collect_files(&files)?
                .iter()
                .map(|path| UploadSource::from_path(path))
                .collect::<Result<Vec<_>, _>>()?;
            let response = service.upload_images(&wl_name, folder, &sources)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                output::print_upload_output(folder, &response);
            }
        }
        Command::Folders => {
            output::print_folders();
        }
        Command::Check { session } => {
            let state = session::load_session(&session)?;
            let assembly = state.assemble();
            output::print_check_output(&state, &assembly);
            println!("==> Session is valid");
        }
        Command::Generate { session } => {
            let state = session::load_session(&session)?;
            let bundle = generate::generate(&state.assemble());
            let written = generate::write_bundle(&bundle, state.wl_name(), &cli.output)?;
            output::print_generate_output(&written);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so stdout stays clean for `--json` output.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "wl_config=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. User can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Expand the upload arguments: files are kept in argument order, directories
/// contribute their regular files sorted by name.
fn collect_files(args: &[PathBuf]) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut files = Vec::new();
    for arg in args {
        if arg.is_dir() {
            for entry in WalkDir::new(arg).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() && !is_hidden(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(arg.clone());
        }
    }
    Ok(files)
}

fn is_hidden(path: &Path) -> bool {
    naming::file_name(path).is_some_and(|name| name.starts_with('.'))
}
