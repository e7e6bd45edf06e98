use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use crossfade::config::{resolve_procs, resolve_threads};
use crossfade::{
    PngSink, RunConfig, RunReport, WorkerCommand, WorkerRank, load_pair, run_distributed,
    run_sequential, run_threaded, run_worker,
};

#[derive(Parser, Debug)]
#[command(name = "crossfade", version)]
struct Cli {
    /// Log every written frame.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate all frames on one thread.
    Sequential(SequentialArgs),
    /// Generate frames on a fixed pool of threads.
    Threads(ThreadsArgs),
    /// Generate frames in separate worker processes.
    Distributed(DistributedArgs),
    /// Run one worker of a distributed run (spawned by `distributed`).
    #[command(hide = true)]
    Worker(WorkerArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// First image, shown at the start of the fade.
    color: PathBuf,

    /// Second image, shown at the end of the fade. Must match the first image's size.
    bw: PathBuf,

    /// Number of frames; unset or non-positive means 96.
    #[arg(allow_negative_numbers = true)]
    frames: Option<i64>,

    /// Directory for the generated PNG frames.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

impl InputArgs {
    fn to_config(&self) -> anyhow::Result<RunConfig> {
        Ok(RunConfig::new(
            &self.color,
            &self.bw,
            self.frames,
            &self.out_dir,
        )?)
    }
}

#[derive(Parser, Debug)]
struct SequentialArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Print the run report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct ThreadsArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Worker threads (default: $CROSSFADE_THREADS, else rayon's default).
    #[arg(long)]
    threads: Option<usize>,

    /// Print the run report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct DistributedArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Worker processes (default: $CROSSFADE_PROCS, else available parallelism).
    #[arg(long)]
    procs: Option<usize>,

    /// Print the run report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct WorkerArgs {
    #[command(flatten)]
    input: InputArgs,

    #[arg(long)]
    rank: u32,

    #[arg(long)]
    size: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Sequential(args) => cmd_sequential(args),
        Command::Threads(args) => cmd_threads(args),
        Command::Distributed(args) => cmd_distributed(args, cli.verbose),
        Command::Worker(args) => cmd_worker(args),
    }
}

// stdout carries the report (and the worker protocol), so logs go to stderr.
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_sequential(args: SequentialArgs) -> anyhow::Result<()> {
    let cfg = args.input.to_config()?;
    let sources = load_pair(&cfg.color_path, &cfg.bw_path)?;
    let sink = PngSink::new(&cfg.out_dir)?;

    tracing::info!(
        frames = cfg.frames,
        width = sources.canvas().width,
        height = sources.canvas().height,
        "generating frames sequentially"
    );
    let report = run_sequential(&sources, cfg.frames, &sink)?;
    print_report(&report, args.json)
}

fn cmd_threads(args: ThreadsArgs) -> anyhow::Result<()> {
    let cfg = args.input.to_config()?;
    let threads = resolve_threads(args.threads)?;
    let sources = load_pair(&cfg.color_path, &cfg.bw_path)?;
    let sink = PngSink::new(&cfg.out_dir)?;

    let report = run_threaded(&sources, cfg.frames, &sink, threads)?;
    print_report(&report, args.json)
}

fn cmd_distributed(args: DistributedArgs, verbose: bool) -> anyhow::Result<()> {
    let cfg = args.input.to_config()?;
    let procs = resolve_procs(args.procs)?;
    let exe = std::env::current_exe().context("locate the crossfade executable")?;

    let mut launch = WorkerCommand::new(exe)
        .arg("worker")
        .arg(&cfg.color_path)
        .arg(&cfg.bw_path)
        .arg(cfg.frames.to_string())
        .arg("--out-dir")
        .arg(&cfg.out_dir);
    if verbose {
        launch = launch.arg("--verbose");
    }

    let report = run_distributed(&launch, procs, cfg.frames)?;
    print_report(&report, args.json)
}

fn cmd_worker(args: WorkerArgs) -> anyhow::Result<()> {
    let cfg = args.input.to_config()?;
    let rank = WorkerRank {
        rank: args.rank,
        size: args.size,
    };
    let mut control = std::io::stdin().lock();
    let mut report = std::io::stdout().lock();

    let out_dir = cfg.out_dir.clone();
    run_worker(
        &cfg,
        rank,
        || PngSink::new(out_dir),
        &mut control,
        &mut report,
    )
    .with_context(|| format!("worker {} of {}", rank.rank, rank.size))?;
    Ok(())
}

fn print_report(report: &RunReport, json: bool) -> anyhow::Result<()> {
    tracing::info!(
        units = report.units.len(),
        written = report.frames_written,
        failed = report.frames_failed,
        "run complete"
    );
    if json {
        let text = serde_json::to_string_pretty(report).context("serialize run report")?;
        println!("{text}");
    } else {
        println!("{}", report.summary());
    }
    Ok(())
}
