//! Tank crew console
//!
//! Feeds recognizer transcripts (from arguments or stdin) through the crew
//! parser and runs the dispatcher against a simulated turret at a fixed
//! tick rate.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crew_control::{
    create_simulated_dispatcher, load_crew_config, CommandIntake, CrewConfig, Dispatcher,
    GunnerPhase, LoaderPhase, SimHandles,
};
use crew_parser::Lexicon;
use glam::Vec3;
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{info, warn};

#[derive(Clone, Copy, ValueEnum)]
enum Language {
    English,
    Korean,
}

#[derive(Parser)]
#[command(name = "crew-cli")]
#[command(about = "Drive a simulated tank crew with spoken-style orders")]
struct Args {
    /// Crew config (YAML or JSON); overrides --language
    #[arg(long)]
    config: Option<PathBuf>,

    /// Built-in keyword set when no config is given
    #[arg(long, value_enum, default_value = "english")]
    language: Language,

    /// Transcript to process; repeat for several. Reads stdin when absent.
    #[arg(long = "transcript", short = 't')]
    transcripts: Vec<String>,

    /// Initial designation point as x,y,z
    #[arg(long)]
    target: Option<String>,

    /// Simulation rate
    #[arg(long, default_value = "60")]
    tick_hz: u32,

    /// Seconds to keep simulating after input ends
    #[arg(long, default_value = "12")]
    seconds: f32,

    /// Print Prometheus metrics on exit
    #[arg(long)]
    metrics: bool,

    /// Print the final crew state as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let args = Args::parse();

    crew_control::init().map_err(|e| anyhow::anyhow!("Failed to init crew control: {}", e))?;

    let config = match &args.config {
        Some(path) => load_crew_config(path)?,
        None => CrewConfig {
            lexicon: match args.language {
                Language::English => Lexicon::english(),
                Language::Korean => Lexicon::korean(),
            },
            ..CrewConfig::default()
        },
    };

    let (mut dispatcher, handles) = create_simulated_dispatcher(config)
        .map_err(|e| anyhow::anyhow!("Failed to create dispatcher: {}", e))?;

    if let Some(raw) = &args.target {
        let point = parse_point(raw).with_context(|| format!("parsing --target {raw:?}"))?;
        handles.designation.designate(point);
    }

    info!("Crew ready at {} Hz", args.tick_hz.max(1));

    let (done_tx, done_rx) = oneshot::channel();
    let intake = dispatcher.intake();
    let feeder_handles = handles.clone();
    let transcripts = args.transcripts.clone();
    // plain thread: a blocked stdin read must not hold up runtime shutdown
    std::thread::spawn(move || {
        if transcripts.is_empty() {
            read_stdin(&intake, &feeder_handles);
        } else {
            for line in &transcripts {
                handle_line(line, &intake, &feeder_handles);
            }
        }
        let _ = done_tx.send(());
    });

    run(&mut dispatcher, &args, done_rx).await;

    report(&dispatcher, &handles, &args)?;
    Ok(())
}

async fn run(dispatcher: &mut Dispatcher, args: &Args, mut done_rx: oneshot::Receiver<()>) {
    let frame = Duration::from_secs_f64(1.0 / f64::from(args.tick_hz.max(1)));
    let linger = Duration::try_from_secs_f32(args.seconds.max(0.0)).unwrap_or(Duration::MAX);
    let mut ticker = tokio::time::interval(frame);
    let mut input_open = true;
    let mut since_input = Duration::ZERO;
    let mut last = (dispatcher.gunner_state().phase, dispatcher.loader_state().phase);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                return;
            }
            _ = &mut done_rx, if input_open => {
                input_open = false;
                info!("Input finished, simulating {:.1}s more", linger.as_secs_f32());
                continue;
            }
        }

        let tick = dispatcher.tick(frame);
        for outcome in &tick.outcomes {
            if outcome.result.is_ok() {
                println!("[{}] {}", outcome.role, outcome.command);
            }
        }
        if let Some(ammo) = tick.reload_completed {
            println!("[loader] {} ready", ammo);
        }

        let now = (dispatcher.gunner_state().phase, dispatcher.loader_state().phase);
        if now != last {
            print_phases(now.0, now.1);
            last = now;
        }

        if !input_open {
            since_input += frame;
            if since_input >= linger && dispatcher.queues().is_empty() {
                return;
            }
        }
    }
}

fn read_stdin(intake: &CommandIntake, handles: &SimHandles) {
    println!("Crew console. Orders like 'gunner aim, loader ap, driver forward'.");
    println!("  /designate x y z   mark a target point");
    println!("  /clear             drop the target point");
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) => handle_line(&line, intake, handles),
            Err(e) => {
                warn!("stdin read error: {}", e);
                break;
            }
        }
    }
}

fn handle_line(line: &str, intake: &CommandIntake, handles: &SimHandles) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    if let Some(rest) = line.strip_prefix("/designate") {
        match parse_point(rest) {
            Ok(point) => handles.designation.designate(point),
            Err(e) => warn!("bad designation {:?}: {}", rest.trim(), e),
        }
        return;
    }
    if line == "/clear" {
        handles.designation.clear();
        return;
    }
    if intake.enqueue_from_stt(line) == 0 {
        println!("(no orders recognized in {:?})", line);
    }
}

/// Accepts `x,y,z` or `x y z`.
fn parse_point(raw: &str) -> Result<Vec3> {
    let parts: Vec<f32> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f32>().with_context(|| format!("not a number: {s:?}")))
        .collect::<Result<_>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => anyhow::bail!("expected three coordinates, got {}", parts.len()),
    }
}

fn print_phases(gunner: GunnerPhase, loader: LoaderPhase) {
    println!("  gunner: {:<8} loader: {}", gunner, loader);
}

fn report(dispatcher: &Dispatcher, handles: &SimHandles, args: &Args) -> Result<()> {
    let gunner = dispatcher.gunner_state();
    let loader = dispatcher.loader_state();

    if args.json {
        let state = serde_json::json!({
            "gunner": gunner,
            "loader": loader,
            "rounds_fired": handles.shots.count(),
        });
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!(
            "Gunner {} | range {:.0}m | yaw {:.1} pitch {:.1}",
            gunner.phase, gunner.range_m, gunner.turret_yaw_deg, gunner.gun_pitch_deg
        );
        println!(
            "Loader {} | breech {} | selected {} | {:.0}%",
            loader.phase,
            loader.loaded_ammo,
            loader.last_selected,
            loader.progress * 100.0
        );
        println!("Rounds fired: {}", handles.shots.count());
    }

    if args.metrics {
        print!("{}", dispatcher.metrics().encode_text());
    }
    Ok(())
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
