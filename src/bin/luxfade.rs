use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use chrono::Utc;

#[derive(Parser, Debug)]
#[command(name = "luxfade", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate an input record and print the resolved anchors.
    Validate(ValidateArgs),
    /// Run a single evaluation and print the augmented record.
    Eval(EvalArgs),
    /// Run the engine, printing one JSON line per emitted output.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input record JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct EvalArgs {
    /// Input record JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input record JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Tick period in milliseconds.
    #[arg(long, default_value_t = luxfade::DEFAULT_STEP_MS)]
    period_ms: u64,

    /// How long to keep the engine running, in seconds.
    #[arg(long, default_value_t = 60)]
    duration_secs: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Eval(args) => cmd_eval(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn read_record(path: &Path) -> anyhow::Result<serde_json::Value> {
    let f = File::open(path).with_context(|| format!("open record '{}'", path.display()))?;
    let r = BufReader::new(f);
    let record = serde_json::from_reader(r).with_context(|| "parse record JSON")?;
    Ok(record)
}

fn report(diag: &luxfade::Diagnostics) {
    for warning in diag.warnings() {
        eprintln!("warning: {warning}");
    }
    if let Some(status) = diag.status() {
        eprintln!("status [{:?}]: {status}", diag.severity());
    }
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let record = read_record(&args.in_path)?;
    let topic = luxfade::parse_activation(&record).topic;

    let mut diag = luxfade::Diagnostics::new();
    let result = luxfade::setup(&record, &topic, &luxfade::SolarInstants, Utc::now(), &mut diag);
    report(&diag);
    let ctx = result?;

    println!("{}", serde_json::to_string_pretty(&ctx.anchors)?);
    Ok(())
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let record = read_record(&args.in_path)?;
    let topic = luxfade::parse_activation(&record).topic;

    let mut diag = luxfade::Diagnostics::new();
    let result = luxfade::setup(&record, &topic, &luxfade::SolarInstants, Utc::now(), &mut diag);
    report(&diag);
    let ctx = result?;

    let now = Utc::now() + ctx.now_offset;
    let data = luxfade::interpolate(
        &ctx.anchors[ctx.closest_before],
        &ctx.anchors[ctx.closest_after],
        now,
    )?;
    let output = luxfade::EvalOutput { data, transition_secs: None };
    println!("{}", serde_json::to_string_pretty(&output.augment(&record))?);
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let record = read_record(&args.in_path)?;

    let sink: Arc<dyn luxfade::OutputSink> = Arc::new(|topic: &str, message: serde_json::Value| {
        println!("{topic}\t{message}");
    });
    let mut engine = luxfade::Engine::with_period(
        Arc::new(luxfade::SolarInstants),
        sink,
        Duration::from_millis(args.period_ms),
    );

    let mut diag = luxfade::Diagnostics::new();
    let disposition = engine.handle(&record, &mut diag)?;
    report(&diag);
    eprintln!("disposition: {disposition:?}");

    if disposition == luxfade::Disposition::Activated {
        std::thread::sleep(Duration::from_secs(args.duration_secs));
    }
    engine.shutdown();
    Ok(())
}
