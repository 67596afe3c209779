use clap::Parser;
use std::time::Duration;
use traffic_sim::core::animation::{render_frame, AnimationDriver};
use traffic_sim::core::stepper::{MotionStepper, StepperConfig};
use traffic_sim::domain::model::BoundingRegion;
use traffic_sim::utils::{logger, validation::Validate};
use traffic_sim::ScenarioConfig;

#[derive(Parser)]
#[command(name = "animate")]
#[command(about = "Animate vehicles crossing an intersection in the terminal")]
struct Args {
    /// Take geometry, speed and tick count from a scenario file's [animation]
    /// section instead of the flags below
    #[arg(short, long)]
    config: Option<String>,

    #[arg(long, default_value = "600")]
    width: f64,

    #[arg(long, default_value = "300")]
    height: f64,

    /// Number of ticks to run before stopping
    #[arg(long, default_value = "200")]
    ticks: u64,

    /// Speed multiplier; 2.0 halves the delay between ticks
    #[arg(long, default_value = "1.0")]
    speed: f64,

    #[arg(long, default_value = "50")]
    base_delay_ms: u64,

    #[arg(long)]
    seed: Option<u64>,

    /// Terminal columns used for each frame
    #[arg(long, default_value = "60")]
    cols: usize,

    /// Terminal rows used for each frame
    #[arg(long, default_value = "20")]
    rows: usize,

    /// Log a line per tick instead of drawing frames
    #[arg(long)]
    quiet: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let (region, config, speed, ticks, seed) = match &args.config {
        Some(path) => {
            let scenario = ScenarioConfig::from_file(path)?;
            scenario.validate()?;
            (
                scenario.region(),
                scenario.stepper_config(),
                scenario.animation_speed(),
                scenario.animation_ticks(),
                args.seed.or(scenario.scenario.seed),
            )
        }
        None => (
            BoundingRegion::new(args.width, args.height),
            StepperConfig {
                base_delay: Duration::from_millis(args.base_delay_ms),
                ..StepperConfig::default()
            },
            args.speed,
            args.ticks,
            args.seed,
        ),
    };

    let mut stepper = MotionStepper::seeded(region, config, seed)?;
    stepper.set_speed(speed)?;
    tracing::info!(
        "🚗 Animating {}x{} intersection for {} ticks ({:?} per tick)",
        region.width,
        region.height,
        ticks,
        stepper.tick_delay()
    );

    let (driver, handle) = AnimationDriver::new(stepper);
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.stop();
        }
    });

    let (cols, rows, quiet) = (args.cols, args.rows, args.quiet);
    let mut spawned = 0usize;
    let mut despawned = 0usize;
    let stepper = driver
        .with_tick_limit(ticks)
        .run(|stepper, report| {
            spawned += usize::from(report.spawned.is_some());
            despawned += report.despawned;
            if quiet {
                tracing::info!(
                    tick = stepper.ticks(),
                    active = stepper.vehicles().len(),
                    "tick"
                );
            } else {
                // clear screen, cursor home
                print!("\x1b[2J\x1b[H");
                println!("{}", render_frame(stepper, cols, rows));
                println!(
                    "Tick: {}  Active vehicles: {}",
                    stepper.ticks(),
                    stepper.vehicles().len()
                );
            }
        })
        .await;
    ctrl_c.abort();

    tracing::info!(
        "🏁 Finished after {} ticks: {} spawned, {} left the intersection, {} still on the road",
        stepper.ticks(),
        spawned,
        despawned,
        stepper.vehicles().len()
    );
    Ok(())
}
