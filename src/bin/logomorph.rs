use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use logomorph::{
    AnimatedLogo, Driver, FfmpegSink, FfmpegSinkOpts, LogoConfig, LogoEvent, ManualClock,
    PngSequenceSink, RenderSession, ShapeKind, StarAssets, StarHrefs, SystemClock, TimeMs,
};

#[derive(Parser, Debug)]
#[command(name = "logomorph", version, about = "Render and drive the animated logo")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Config JSON (timing, size, fps, background).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// White star image (PNG/JPEG/SVG). Built-in star when omitted.
    #[arg(long, global = true, requires = "black_star")]
    white_star: Option<PathBuf>,

    /// Black star image (PNG/JPEG/SVG). Built-in star when omitted.
    #[arg(long, global = true, requires = "white_star")]
    black_star: Option<PathBuf>,

    /// More logging on stderr (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a time range to an MP4 (requires `ffmpeg` on PATH) or a PNG directory.
    Render(RenderArgs),
    /// Print the full-frame SVG document at a point in time.
    Svg(SvgArgs),
    /// Print the stylesheet used to embed the logo in a page.
    Css,
    /// Drive the component on a virtual clock and print every state change.
    Trace(TraceArgs),
    /// Drive the component in real time and print every state change.
    Play(TraceArgs),
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Milliseconds since mount.
    #[arg(long, default_value_t = 0)]
    at_ms: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Output `.mp4` file, or a directory for a PNG sequence.
    #[arg(long)]
    out: PathBuf,

    /// Milliseconds since mount of the first frame.
    #[arg(long, default_value_t = 0)]
    start_ms: u64,

    /// Length of the range. One full cycle when omitted.
    #[arg(long)]
    duration_ms: Option<u64>,

    /// Fail if the output already exists instead of replacing it.
    #[arg(long)]
    no_overwrite: bool,
}

#[derive(Args, Debug)]
struct SvgArgs {
    /// Milliseconds since mount.
    #[arg(long, default_value_t = 0)]
    at_ms: u64,

    /// Write to a file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TraceArgs {
    /// Stop after this many milliseconds. One full cycle when omitted.
    #[arg(long)]
    until_ms: Option<u64>,

    /// Print events as JSON lines.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.common.verbose);

    let config = load_config(cli.common.config.as_deref())?;
    match cli.cmd {
        Command::Frame(args) => cmd_frame(&cli.common, config, args),
        Command::Render(args) => cmd_render(&cli.common, config, args),
        Command::Svg(args) => cmd_svg(&cli.common, config, args),
        Command::Css => cmd_css(config),
        Command::Trace(args) => cmd_trace(config, args, ManualClock::default()),
        Command::Play(args) => cmd_trace(config, args, SystemClock::new()),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<LogoConfig> {
    match path {
        Some(p) => LogoConfig::from_json_file(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(LogoConfig::default()),
    }
}

fn load_stars(common: &CommonArgs) -> anyhow::Result<StarAssets> {
    match (&common.white_star, &common.black_star) {
        (Some(white), Some(black)) => {
            StarAssets::from_files(white, black).context("load star images")
        }
        _ => StarAssets::builtin().context("build built-in star images"),
    }
}

fn session(common: &CommonArgs, config: LogoConfig) -> anyhow::Result<RenderSession> {
    let stars = load_stars(common)?;
    RenderSession::new(config, stars).context("create render session")
}

fn cmd_frame(common: &CommonArgs, config: LogoConfig, args: FrameArgs) -> anyhow::Result<()> {
    let sess = session(common, config)?;
    let frame = sess.render_at(TimeMs(args.at_ms))?;
    frame
        .save_png(&args.out)
        .with_context(|| format!("write frame at {}ms", args.at_ms))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(common: &CommonArgs, config: LogoConfig, args: RenderArgs) -> anyhow::Result<()> {
    let duration_ms = args
        .duration_ms
        .unwrap_or_else(|| config.timing.cycle_ms());
    let background = config.background;
    let sess = session(common, config)?;
    let start = TimeMs(args.start_ms);

    let is_mp4 = args
        .out
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mp4"));
    let stats = if is_mp4 {
        let mut opts = FfmpegSinkOpts::new(args.out.clone());
        opts.overwrite = !args.no_overwrite;
        if let Some(bg) = background {
            opts = opts.with_background(bg);
        }
        let mut sink = FfmpegSink::new(opts);
        sess.render_range(start, duration_ms, &mut sink)?
    } else {
        let mut sink = PngSequenceSink::new(args.out.clone()).with_overwrite(!args.no_overwrite);
        sess.render_range(start, duration_ms, &mut sink)?
    };

    eprintln!(
        "wrote {} ({} frames)",
        args.out.display(),
        stats.frames_total
    );
    Ok(())
}

fn cmd_svg(common: &CommonArgs, config: LogoConfig, args: SvgArgs) -> anyhow::Result<()> {
    let sess = session(common, config)?;
    let hrefs = match (&common.white_star, &common.black_star) {
        (Some(white), Some(black)) => StarHrefs {
            white: white.display().to_string(),
            black: black.display().to_string(),
        },
        _ => StarHrefs::default(),
    };
    let svg = sess.svg_at(TimeMs(args.at_ms), &hrefs);
    match args.out {
        Some(out) => {
            std::fs::write(&out, svg).with_context(|| format!("write svg '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{svg}"),
    }
    Ok(())
}

fn cmd_css(config: LogoConfig) -> anyhow::Result<()> {
    config.validate()?;
    let styles = logomorph::StyleSheet::standard()?;
    print!("{}", styles.to_css(config.timing.morph_ms));
    Ok(())
}

fn cmd_trace<C: logomorph::Clock>(
    config: LogoConfig,
    args: TraceArgs,
    clock: C,
) -> anyhow::Result<()> {
    let until = TimeMs(args.until_ms.unwrap_or_else(|| config.timing.cycle_ms()));
    let mut logo = AnimatedLogo::new(config.timing)?;
    let mut driver = Driver::new(clock);
    let origin = driver.clock().now();
    logo.mount(origin)?;
    print_event(
        &LogoEvent::Step {
            at: origin,
            step: logo.step(),
            state: logo.state(),
        },
        args.json,
    )?;

    let stop_at = origin.saturating_add(until.0);
    let stats = driver.run(&mut logo, stop_at, |event| {
        print_event(event, args.json).map_err(logomorph::LogoError::from)
    })?;
    logo.unmount();
    eprintln!(
        "{} steps, {} cursor ticks, {} cycles",
        stats.steps,
        stats.cursor_ticks,
        logo.cycles_completed()
    );
    Ok(())
}

fn print_event(event: &LogoEvent, json: bool) -> anyhow::Result<()> {
    if json {
        let line = match event {
            LogoEvent::Step { at, step, state } => serde_json::json!({
                "at_ms": at.0,
                "step": format!("{step:?}"),
                "state": state,
            }),
            LogoEvent::Cursor { at, cursor } => serde_json::json!({
                "at_ms": at.0,
                "cursor": cursor,
                "shape": ShapeKind::at(*cursor).name(),
            }),
        };
        println!("{}", serde_json::to_string(&line)?);
        return Ok(());
    }
    match event {
        LogoEvent::Step { at, step, state } => println!(
            "{:>8}ms step {step:?}: cursor={} phase={:?} star={:?}",
            at.0, state.cursor, state.phase, state.star
        ),
        LogoEvent::Cursor { at, cursor } => println!(
            "{:>8}ms cursor -> {cursor} ({})",
            at.0,
            ShapeKind::at(*cursor).name()
        ),
    }
    Ok(())
}
