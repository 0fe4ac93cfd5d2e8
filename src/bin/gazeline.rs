use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use gazeline::RenderBackend as _;

#[derive(Parser, Debug)]
#[command(name = "gazeline", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a session frame as a PNG.
    Frame(FrameArgs),
    /// Print session statistics as JSON.
    Stats(StatsArgs),
    /// Parse and validate a session document.
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input session document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Playback time in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// TTF/OTF font for code text and labels; geometry-only without it.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Draw the attention heatmap layer.
    #[arg(long, default_value_t = false)]
    heatmap: bool,

    /// Hide the gaze-path layer.
    #[arg(long, default_value_t = false)]
    no_path: bool,

    /// Hide the fixation-marker layer.
    #[arg(long, default_value_t = false)]
    no_markers: bool,
}

#[derive(Parser, Debug)]
struct StatsArgs {
    /// Input session document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input session document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Stats(args) => cmd_stats(args),
        Command::Validate(args) => cmd_validate(args),
    }
}

fn load_document(path: &Path) -> anyhow::Result<gazeline::LoadedSession> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read session document '{}'", path.display()))?;
    Ok(gazeline::parse_session_document(&json)?)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let loaded = load_document(&args.in_path)?;

    let state = gazeline::PlaybackState {
        current: gazeline::TimeMs(args.time),
        playing: false,
        speed: 1.0,
        toggles: gazeline::LayerToggles {
            fixations: !args.no_markers,
            gaze_path: !args.no_path,
            heatmap: args.heatmap,
        },
    };
    let plan = gazeline::compile_frame(&loaded.session, &loaded.source, &loaded.tokens, &state);

    let mut backend = match &args.font {
        Some(font_path) => {
            let bytes = std::fs::read(font_path)
                .with_context(|| format!("read font '{}'", font_path.display()))?;
            gazeline::CpuRenderer::with_label_font(bytes)?
        }
        None => gazeline::CpuRenderer::new(),
    };
    let frame = backend.render_plan(&plan)?;

    // PNG stores straight alpha.
    let mut data = frame.data;
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut data);
    }

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> anyhow::Result<()> {
    let loaded = load_document(&args.in_path)?;
    let stats = gazeline::SessionStats::of(&loaded.session);
    let dwell = gazeline::token_dwell(&loaded.session);

    let report = serde_json::json!({
        "file": loaded.source.path,
        "stats": stats,
        "token_dwell": dwell,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let loaded = load_document(&args.in_path)?;
    eprintln!(
        "ok: {} fixations, {} tokens, {}x{} surface, {} total",
        loaded.session.records().len(),
        loaded.tokens.len(),
        loaded.session.canvas().width,
        loaded.session.canvas().height,
        loaded.session.total_duration(),
    );
    Ok(())
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}
