//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use sashiko_core::{
    encode, Background, CodebookPolicy, Frame, Grain, PatternKind, Quality, RenderStyle,
    TextOrientation, ThreadColor,
};
use sashiko_engine::{CancelToken, PatternArtifact, PatternRequest, RenderPool, Settings, StitchEngine};
use sashiko_export::{PageSize, RasterFormat};

/// Config file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG: &str = "sashiko.toml";

/// Output format for the generation report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "sashiko")]
#[command(author, version, about = "Sashiko stitch patterns from text", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a pattern to raster and optional print document
    Generate(GenerateOptions),

    /// Print the bit string for a text
    Encode {
        text: String,

        /// Codebook (standard, latin or universal)
        #[arg(long)]
        codebook: Option<CodebookPolicy>,
    },

    /// Print a text preview of the stitch matrix
    Scheme {
        /// Text for the horizontal axis
        text_h: String,

        /// Text for the vertical axis (defaults to the horizontal text)
        text_v: Option<String>,

        /// Codebook (standard, latin or universal)
        #[arg(long)]
        codebook: Option<CodebookPolicy>,
    },
}

/// Options of the `generate` command
#[derive(Debug, Clone, Default, Args)]
pub struct GenerateOptions {
    /// Text for the horizontal axis
    pub text_h: String,

    /// Text for the vertical axis (defaults to the horizontal text)
    pub text_v: Option<String>,

    /// Preset to start from (poster or scheme)
    #[arg(short, long)]
    pub kind: Option<PatternKind>,

    /// Thread color name or #rrggbb
    #[arg(short, long)]
    pub thread: Option<ThreadColor>,

    /// Fabric name, texture:<key>, #rrggbb or plain
    #[arg(short, long)]
    pub background: Option<Background>,

    /// Quality tier (normal or high)
    #[arg(short, long)]
    pub quality: Option<Quality>,

    /// Frame (none, single or double)
    #[arg(long)]
    pub frame: Option<Frame>,

    /// Draw the text as stacked glyphs instead of stitches
    #[arg(long)]
    pub stacked: bool,

    /// Leave out the caption
    #[arg(long)]
    pub no_label: bool,

    /// Flat stitches without shadow and highlight
    #[arg(long)]
    pub no_relief: bool,

    /// Add fabric grain with this seed
    #[arg(long)]
    pub grain: Option<u64>,

    /// Codebook (standard, latin or universal)
    #[arg(long)]
    pub codebook: Option<CodebookPolicy>,

    /// Raster format (png or jpeg)
    #[arg(short, long)]
    pub format: Option<RasterFormat>,

    /// Also write a print document
    #[arg(short, long)]
    pub print: bool,

    /// Page size of the print document (a3 or a4)
    #[arg(long)]
    pub page: Option<PageSize>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format (text or json)
    #[arg(long, value_enum, default_value = "text")]
    pub report: ReportFormat,
}

impl GenerateOptions {
    /// Fold command-line overrides into loaded settings
    fn apply(&self, settings: &mut Settings) {
        if let Some(codebook) = self.codebook {
            settings.encoding.codebook = codebook;
        }
        if let Some(format) = self.format {
            settings.output.format = format;
        }
        if let Some(page) = self.page {
            settings.output.page = page;
        }
        if let Some(dir) = &self.output {
            settings.output.dir = dir.clone();
        }
        if self.print {
            settings.output.print_document = true;
        }
    }

    /// Resolve the final style from settings, preset and flags
    fn style(&self, settings: &Settings) -> RenderStyle {
        let mut style = match self.kind {
            Some(kind) => RenderStyle::for_kind(kind),
            None => settings.style.clone(),
        };
        if let Some(thread) = self.thread {
            style = style.with_thread(thread);
        }
        if let Some(background) = self.background {
            style = style.with_background(background);
        }
        if let Some(quality) = self.quality {
            style = style.with_quality(quality);
        }
        if let Some(frame) = self.frame {
            style = style.with_frame(frame);
        }
        if self.stacked {
            style = style.with_orientation(TextOrientation::Stacked);
        }
        if self.no_label {
            style = style.with_label(false);
        }
        if self.no_relief {
            style = style.with_relief(false);
        }
        if let Some(seed) = self.grain {
            style = style.with_grain(Some(Grain::new(seed)));
        }
        style
    }
}

/// Run the CLI with the process arguments
pub fn run_cli() -> Result<()> {
    run_cli_from(std::env::args_os())
}

/// Run the CLI with explicit arguments, writing results to stdout
pub fn run_cli_from<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    init_logging(cli.verbose);

    let mut settings = load_settings(cli.config.as_deref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Generate(options) => {
            generate_command(&options, &mut settings, &mut out)?;
        }
        Commands::Encode { text, codebook } => {
            let policy = codebook.unwrap_or(settings.encoding.codebook);
            encode_command(&text, policy, &mut out)?;
        }
        Commands::Scheme {
            text_h,
            text_v,
            codebook,
        } => {
            let policy = codebook.unwrap_or(settings.encoding.codebook);
            let text_v = text_v.as_deref().unwrap_or(&text_h);
            scheme_command(&text_h, text_v, policy, &mut out)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).is_file() => Settings::load(DEFAULT_CONFIG)
            .with_context(|| format!("Failed to load config: {}", DEFAULT_CONFIG)),
        None => Ok(Settings::default()),
    }
}

/// Execute the generate command
pub fn generate_command(
    options: &GenerateOptions,
    settings: &mut Settings,
    out: &mut dyn Write,
) -> Result<PatternArtifact> {
    options.apply(settings);
    let style = options.style(settings);
    let text_v = options.text_v.as_deref().unwrap_or(&options.text_h);
    let request = PatternRequest::new(options.text_h.as_str(), text_v, style)
        .with_print_document(settings.output.print_document);

    let dir = settings.output.dir.clone();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let engine = StitchEngine::from_settings(settings).context("Invalid configuration")?;
    let pool = RenderPool::from_settings(Arc::new(engine), settings);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("Failed to start runtime")?;
    let artifact = runtime
        .block_on(pool.generate_to_dir(request, dir, CancelToken::new()))
        .context("Generation failed")?;

    write_report(&artifact, options.report, out)?;
    Ok(artifact)
}

fn write_report(artifact: &PatternArtifact, format: ReportFormat, out: &mut dyn Write) -> Result<()> {
    match format {
        ReportFormat::Text => {
            writeln!(
                out,
                "Raster: {} ({}x{} px, {} dpi)",
                artifact.raster.path.display(),
                artifact.width,
                artifact.height,
                artifact.dpi
            )?;
            if let Some(pdf) = &artifact.print_document {
                writeln!(out, "Print document: {}", pdf.path.display())?;
            }
            if let Some((rows, cols)) = artifact.matrix {
                writeln!(out, "Matrix: {} x {}", rows, cols)?;
            }
            if let Some(label) = &artifact.label {
                writeln!(out, "Label: {}", label)?;
            }
        }
        ReportFormat::Json => {
            let report = serde_json::json!({
                "raster": {
                    "path": artifact.raster.path,
                    "mime_type": artifact.raster.mime_type,
                    "size": artifact.raster.size,
                },
                "print_document": artifact.print_document.as_ref().map(|pdf| serde_json::json!({
                    "path": pdf.path,
                    "mime_type": pdf.mime_type,
                    "size": pdf.size,
                })),
                "width": artifact.width,
                "height": artifact.height,
                "dpi": artifact.dpi,
                "matrix": artifact.matrix,
                "label": artifact.label,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
    }
    Ok(())
}

/// Execute the encode command
pub fn encode_command(text: &str, policy: CodebookPolicy, out: &mut dyn Write) -> Result<()> {
    let codebook = policy.codebook();
    let bits = encode(text, codebook);
    log::debug!(
        "{} bits from {} codebook ({} per character)",
        bits.len(),
        codebook.name(),
        codebook.width()
    );
    writeln!(out, "{}", bits)?;
    Ok(())
}

/// Execute the scheme command
pub fn scheme_command(
    text_h: &str,
    text_v: &str,
    policy: CodebookPolicy,
    out: &mut dyn Write,
) -> Result<()> {
    let engine = StitchEngine::new().with_codebook(policy);
    let matrix = engine
        .build_matrix(text_h, text_v)
        .context("Failed to build stitch matrix")?;
    write!(out, "{}", matrix.to_ascii())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use sashiko_core::Thread;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_flags() {
        let cli = Cli::parse_from([
            "sashiko",
            "generate",
            "love",
            "kyiv",
            "--thread",
            "gold",
            "--background",
            "texture:linen",
            "--quality",
            "high",
            "--frame",
            "double",
            "--grain",
            "7",
            "--print",
        ]);
        let Commands::Generate(options) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(options.text_v.as_deref(), Some("kyiv"));
        assert!(options.print);

        let style = options.style(&Settings::default());
        assert_eq!(style.thread_color, ThreadColor::Named(Thread::Gold));
        assert_eq!(style.quality, Quality::High);
        assert_eq!(style.frame, Frame::Double);
        assert_eq!(style.grain.map(|g| g.seed), Some(7));
    }

    #[test]
    fn test_kind_overrides_configured_style() {
        let options = GenerateOptions {
            text_h: "A".into(),
            kind: Some(PatternKind::Scheme),
            ..Default::default()
        };
        let settings = Settings::from_toml_str("[style]\nthread_color = \"gold\"\n").unwrap();
        assert_eq!(options.style(&settings), RenderStyle::scheme());
    }

    #[test]
    fn test_encode_command() {
        let mut out = Vec::new();
        encode_command("A", CodebookPolicy::Latin, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "00001\n");
    }
}
