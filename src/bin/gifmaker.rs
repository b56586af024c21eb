use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{EnvFilter, filter::Directive, fmt};

#[derive(Parser, Debug)]
#[command(name = "gifmaker", version, about = "Glue a directory tree of frames into a GIF")]
struct Cli {
    /// Increase log verbosity (repeatable).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect frames and write the animation.
    Make(MakeArgs),
    /// Print the frames that would be encoded, in order.
    List(ListArgs),
}

#[derive(Parser, Debug)]
struct MakeArgs {
    /// JSON job file; flags given here override its values.
    #[arg(long, value_name = "FILE")]
    job: Option<PathBuf>,

    /// Folders where frames are located, in output order.
    #[arg(long = "folder", value_name = "DIR", num_args = 1..)]
    folders: Vec<PathBuf>,

    /// Delay between frames, in seconds.
    #[arg(long, value_name = "SECS")]
    delay: Option<f64>,

    /// Output name; `.gif` is appended unless present.
    #[arg(long = "save-to", visible_alias = "save_to", value_name = "NAME")]
    save_to: Option<PathBuf>,

    /// Frame file extension (repeatable). Defaults to `tif`.
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,

    /// Keep the partial output if encoding fails.
    #[arg(long)]
    keep_partial: bool,

    /// Play the animation this many times instead of looping forever.
    #[arg(long, value_name = "N")]
    loops: Option<u16>,
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Folders where frames are located, in output order.
    #[arg(long = "folder", value_name = "DIR", num_args = 1.., required = true)]
    folders: Vec<PathBuf>,

    /// Frame file extension (repeatable). Defaults to `tif`.
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,
}

fn init_tracing(verbosity: u8) -> anyhow::Result<()> {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let directive = format!("gifmaker={level}")
        .parse::<Directive>()
        .context("build log filter directive")?;
    let filter = EnvFilter::from_default_env().add_directive(directive);
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    match cli.cmd {
        Command::Make(args) => cmd_make(args),
        Command::List(args) => cmd_list(args),
    }
}

fn build_job(args: MakeArgs) -> anyhow::Result<gifmaker::GifJob> {
    let mut job = match &args.job {
        Some(path) => gifmaker::GifJob::from_path(path)?,
        None => {
            let delay = args
                .delay
                .context("--delay is required when no --job file is given")?;
            let save_to = args
                .save_to
                .clone()
                .context("--save-to is required when no --job file is given")?;
            gifmaker::GifJob::new(Vec::new(), delay, save_to)
        }
    };

    if !args.folders.is_empty() {
        job.roots = args.folders;
    }
    if let Some(delay) = args.delay {
        job.delay_secs = delay;
    }
    if let Some(save_to) = args.save_to {
        job.save_to = save_to;
    }
    if !args.extensions.is_empty() {
        job.extensions = args.extensions;
    }
    if args.no_overwrite {
        job.overwrite = false;
    }
    if args.keep_partial {
        job.keep_partial = true;
    }
    if args.loops.is_some() {
        job.loops = args.loops;
    }
    Ok(job)
}

fn cmd_make(args: MakeArgs) -> anyhow::Result<()> {
    let job = build_job(args)?;
    job.validate().context("validate job")?;

    let report = job
        .run()
        .with_context(|| format!("make '{}'", job.out_path().display()))?;

    eprintln!(
        "wrote {} ({} frames)",
        report.out_path.display(),
        report.stats.frames_written
    );
    Ok(())
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let opts = if args.extensions.is_empty() {
        gifmaker::CollectOpts::default()
    } else {
        gifmaker::CollectOpts::with_extensions(&args.extensions)
    };
    let frames = gifmaker::collect_frames(&args.folders, &opts).context("collect frames")?;
    for f in &frames {
        println!("{}", f.display());
    }
    eprintln!("{} frames", frames.len());
    Ok(())
}
