use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use viewfinder::{
    DisplayLayout, FilterChain, FilterPipeline, SamplerMode, SurfaceSize, create_engine,
};

#[derive(Parser, Debug)]
#[command(name = "viewfinder", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite an image through a region's filter chain and write a PNG.
    Composite(CompositeArgs),
    /// Parse and validate a display layout file.
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
struct CompositeArgs {
    /// Input image (any format the `image` crate decodes).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Display layout JSON.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Region name within the layout. Requires --layout.
    #[arg(long, requires = "layout")]
    region: Option<String>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Target width. Defaults to the input width.
    #[arg(long)]
    width: Option<u32>,

    /// Target height. Defaults to the input height.
    #[arg(long)]
    height: Option<u32>,

    /// Resampling policy.
    #[arg(long, value_enum, default_value_t = SamplerChoice::Linear)]
    sampler: SamplerChoice,

    /// Engine to use.
    #[arg(long, value_enum, default_value_t = EngineChoice::Cpu)]
    engine: EngineChoice,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Display layout JSON.
    #[arg(long)]
    layout: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SamplerChoice {
    Linear,
    Nearest,
}

impl From<SamplerChoice> for SamplerMode {
    fn from(choice: SamplerChoice) -> Self {
        match choice {
            SamplerChoice::Linear => SamplerMode::Linear,
            SamplerChoice::Nearest => SamplerMode::Nearest,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EngineChoice {
    Cpu,
}

fn main() -> anyhow::Result<()> {
    initialise_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Composite(args) => cmd_composite(args),
        Command::Validate(args) => cmd_validate(args),
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn read_layout_json(path: &Path) -> anyhow::Result<DisplayLayout> {
    let s = fs::read_to_string(path).with_context(|| format!("open layout '{}'", path.display()))?;
    let layout = DisplayLayout::from_json(&s)
        .with_context(|| format!("layout '{}'", path.display()))?;
    Ok(layout)
}

fn cmd_composite(args: CompositeArgs) -> anyhow::Result<()> {
    let bytes = fs::read(&args.in_path)
        .with_context(|| format!("open image '{}'", args.in_path.display()))?;
    let input = viewfinder::decode_frame(&bytes)?;

    let chain = match (&args.layout, &args.region) {
        (Some(layout_path), Some(region)) => {
            let layout = read_layout_json(layout_path)?;
            layout.chain_for(region)?
        }
        (Some(layout_path), None) => {
            anyhow::bail!(
                "--layout '{}' given without --region; name the region to composite",
                layout_path.display()
            );
        }
        _ => FilterChain::default(),
    };

    let target = SurfaceSize::new(
        args.width.unwrap_or(input.width),
        args.height.unwrap_or(input.height),
    )?;

    let engine = match args.engine {
        EngineChoice::Cpu => create_engine(viewfinder::EngineKind::Cpu)?,
    };

    let mut pipeline = FilterPipeline::new(target, engine);
    pipeline.set_sampler(args.sampler.into());
    pipeline.set_chain(chain);
    pipeline.set_input(std::sync::Arc::new(input));

    let frame = pipeline
        .composited()?
        .context("no composited output despite an input image")?;

    if let Some(parent) = args.out.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let layout = read_layout_json(&args.layout)?;
    eprintln!(
        "{}: ok ({} region(s))",
        args.layout.display(),
        layout.regions.len()
    );
    Ok(())
}
