use clap::{Parser, Subcommand};
use imagist::assets::{EmbeddedAssets, provider_for};
use imagist::config::{self, CONFIG_FILENAME};
use imagist::dispatch::{Imagist, ImagistError};
use imagist::job::VariantOutcome;
use imagist::{output, validate};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const UPLOAD_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Parser)]
#[command(name = "imagist")]
#[command(about = "Generate thumbnails, crops, backdrops and watermarks for uploaded images")]
#[command(long_about = "\
Generate thumbnails, crops, backdrops and watermarks for uploaded images

Each upload is validated (JPEG or PNG only), then processed in the background.
Every format in [dimensions] of the config writes one file next to the upload:

  uploads/
  ├── cat.jpg
  ├── cat.jpg:thumb     # 200x200, center crop
  └── cat.jpg:cover     # fitted on a backdrop, watermarked

Run 'imagist gen-config' to generate a documented imagist.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Log debug details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate variants for image files or directories of images
    Process {
        /// Reject uploads below the configured minimum size
        #[arg(long)]
        enforce_floor: bool,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Validate uploads without generating anything
    Check {
        /// Check against the configured minimum size
        #[arg(long)]
        enforce_floor: bool,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Print a stock imagist.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Process {
            enforce_floor,
            paths,
        } => {
            let config = config::load_config(&cli.config)?;
            init_thread_pool(&config.processing);

            let assets = provider_for(&config, EmbeddedAssets::new());
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                let (mut reports, mut written, mut failed) = (0, 0, 0);
                for report in rx {
                    output::print_report(&report);
                    reports += 1;
                    for variant in &report.variants {
                        match variant.outcome {
                            VariantOutcome::Written { .. } => written += 1,
                            VariantOutcome::Failed(_) => failed += 1,
                            VariantOutcome::Skipped => {}
                        }
                    }
                }
                (reports, written, failed)
            });

            let imagist = Imagist::new(&config, assets, Some(tx))?;
            let mut rejected = 0;
            for path in collect_uploads(&paths) {
                let buf = std::fs::read(&path)?;
                match imagist.add(&buf, &path, Some(config.dimensions.clone()), enforce_floor) {
                    Ok(()) => {}
                    Err(ImagistError::Validation(e)) => {
                        println!("{}", output::format_rejection(&path, &e));
                        rejected += 1;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            imagist.close();

            let (reports, written, failed) = printer
                .join()
                .map_err(|_| "report printer panicked")?;
            println!(
                "{}",
                output::format_summary(reports, written, failed, rejected)
            );
        }
        Command::Check {
            enforce_floor,
            paths,
        } => {
            let config = config::load_config(&cli.config)?;
            let mut rejected = 0;
            for path in collect_uploads(&paths) {
                let buf = std::fs::read(&path)?;
                match validate::validate(&buf, &config.dimensions, enforce_floor) {
                    Ok(image) => println!(
                        "{}\n    ok: {:?} {}x{}",
                        path.display(),
                        image.kind,
                        image.dimensions.width,
                        image.dimensions.height
                    ),
                    Err(e) => {
                        println!("{}", output::format_rejection(&path, &e));
                        rejected += 1;
                    }
                }
            }
            if rejected > 0 {
                return Err(format!("{rejected} upload(s) rejected").into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    // Only fails if a logger is already installed.
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .ok();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Files are taken as given; directories are walked for upload extensions.
/// Existing variants (`name.jpg:thumb`) have no matching extension and are
/// skipped.
fn collect_uploads(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut uploads = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|p| has_upload_extension(p))
                .collect();
            found.sort();
            uploads.extend(found);
        } else {
            uploads.push(path.clone());
        }
    }
    uploads
}

fn has_upload_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| UPLOAD_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}
