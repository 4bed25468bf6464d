//! PictureForge CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use picture_forge::{
    config::{Config, ConfigHandle},
    image_io, try_enhance_with, AnalysisResult, RecommendationEntry, RecommendationParser,
    SlideRestorer,
};
use std::path::{Path, PathBuf};

/// PictureForge: Apply enhancement recommendations to photos and restore scanned slides
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (default: picture_forge.toml in the working directory)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log debug details
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply enhancement recommendations to an image
    Enhance {
        /// Input image file (JPEG, PNG, TIFF, ...)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Analysis result JSON carrying recommended enhancements
        #[arg(short, long, value_name = "FILE")]
        analysis: Option<PathBuf>,

        /// Recommendation text, e.g. "BRIGHTNESS: increase by 25%" (repeatable)
        #[arg(short, long = "rec", value_name = "TEXT")]
        recs: Vec<String>,

        /// Output file (default: INPUT_enhanced.jpg)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// JPEG quality 1-100 (default: from config, 95)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: Option<u8>,

        /// Print the parsed pipeline without touching any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Restore a scanned slide with a named or detected profile
    Restore {
        /// Input image file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Slide profile name (see `profiles`)
        #[arg(short, long, value_name = "NAME", required_unless_present = "auto")]
        profile: Option<String>,

        /// Choose the profile from an analysis result
        #[arg(long, requires = "analysis", conflicts_with = "profile")]
        auto: bool,

        /// Analysis result JSON used by --auto
        #[arg(short, long, value_name = "FILE")]
        analysis: Option<PathBuf>,

        /// Output file (default: INPUT_restored_PROFILE.jpg)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Skip the Gaussian denoise step
        #[arg(long)]
        no_denoise: bool,

        /// Skip the median despeckle step
        #[arg(long)]
        no_despeckle: bool,
    },

    /// List the available slide profiles
    Profiles,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let handle = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Enhance {
            input,
            analysis,
            recs,
            output,
            quality,
            dry_run,
        } => run_enhance(&handle.config, input, analysis, recs, output, quality, dry_run),

        Command::Restore {
            input,
            profile,
            auto,
            analysis,
            output,
            no_denoise,
            no_despeckle,
        } => run_restore(
            &handle.config,
            input,
            profile,
            auto,
            analysis,
            output,
            no_denoise,
            no_despeckle,
        ),

        Command::Profiles => run_profiles(&handle.config),
    }
}

fn load_config(path: Option<&Path>) -> Result<ConfigHandle> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("Failed to read working directory")?;
            Config::discover(&cwd).context("Failed to load config")
        }
    }
}

fn load_analysis(path: &Path) -> Result<AnalysisResult> {
    AnalysisResult::load(path).with_context(|| format!("Failed to read analysis {}", path.display()))
}

fn run_enhance(
    config: &Config,
    input: PathBuf,
    analysis: Option<PathBuf>,
    recs: Vec<String>,
    output: Option<PathBuf>,
    quality: Option<u8>,
    dry_run: bool,
) -> Result<()> {
    let mut entries = match &analysis {
        Some(path) => load_analysis(path)?.recommendations().to_vec(),
        None => Vec::new(),
    };
    entries.extend(RecommendationEntry::from_texts(recs));
    if entries.is_empty() {
        anyhow::bail!("No recommendations given; use --rec or --analysis");
    }

    let parser = RecommendationParser::with_settings(config.parser_settings());

    if dry_run {
        let pipeline = parser.parse(&entries);
        println!("{}", pipeline);
        let enhancements = parser.parse_enhancements(&entries);
        println!(
            "{}",
            serde_json::to_string_pretty(&enhancements).context("Failed to serialize enhancements")?
        );
        return Ok(());
    }

    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    let output_path = match output {
        Some(out) => out,
        None => image_io::enhanced_output_path(&input).context("Failed to generate output path")?,
    };
    let quality = quality.unwrap_or_else(|| config.enhancement_quality());

    let written = try_enhance_with(&parser, &input, &entries, Some(&output_path), quality)
        .with_context(|| format!("Enhancing {} failed", input.display()))?;
    println!("{}", written.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_restore(
    config: &Config,
    input: PathBuf,
    profile: Option<String>,
    auto: bool,
    analysis: Option<PathBuf>,
    output: Option<PathBuf>,
    no_denoise: bool,
    no_despeckle: bool,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let registry = config.profile_registry().context("Invalid slide profiles in config")?;
    let mut options = config.restore_options();
    options.denoise &= !no_denoise;
    options.despeckle &= !no_despeckle;
    let restorer = SlideRestorer::with_options(&registry, options);

    let requested = match (auto, profile, analysis) {
        (true, _, Some(path)) => restorer.resolve_profile(&load_analysis(&path)?).profile_name,
        (false, Some(name), _) => name,
        _ => anyhow::bail!("Pass --profile NAME or --auto --analysis FILE"),
    };
    let (key, _) = registry.resolve(&requested)?;

    let output_path = match output {
        Some(out) => out,
        None => image_io::restored_output_path(&input, key)
            .context("Failed to generate output path")?,
    };

    let written = restorer
        .restore(&input, key, Some(&output_path))
        .with_context(|| format!("Restoring {} failed", input.display()))?;
    println!("{}", written.display());
    Ok(())
}

fn run_profiles(config: &Config) -> Result<()> {
    let registry = config.profile_registry().context("Invalid slide profiles in config")?;
    for (key, profile) in registry.iter() {
        println!("{:<16} {:<20} {}", key, profile.name, profile.description);
    }
    Ok(())
}
