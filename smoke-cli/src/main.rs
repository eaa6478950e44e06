use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use smoke_sim_core::{
    health, horizontal_distance, optimal_pitch, GameUnits, MapPoints, PhysicsConfig, Scene, SearchConfig, SearchStrategy,
    SimulationContext, ThrowType, TrajectoryMetrics, Vec3,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Find smoke grenade lineups by simulating throws
#[derive(Parser, Debug)]
#[command(name = "smoke-cli")]
#[command(about = "CS2 smoke lineup finder", long_about = None)]
struct Cli {
    #[command(flatten)]
    scene: SceneArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Directory holding map geometry (<map>.json, <map>_collision.obj, <map>.obj)
    #[arg(long, global = true)]
    maps_dir: Option<PathBuf>,

    /// Map name to load from --maps-dir
    #[arg(long, global = true, default_value = "de_test")]
    map: String,

    /// Physics configuration JSON (missing fields use defaults)
    #[arg(long, global = true)]
    physics_config: Option<PathBuf>,

    /// Search configuration JSON (missing fields use defaults)
    #[arg(long, global = true)]
    search_config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for throws that land on a target
    Find {
        /// Target x y z in game units
        #[arg(num_args = 3, allow_negative_numbers = true, value_names = ["X", "Y", "Z"])]
        target: Vec<f32>,

        /// Use a bombsite from the test map instead of coordinates (A or B)
        #[arg(long, conflicts_with = "target")]
        site: Option<String>,

        /// STRONG, MEDIUM, WEAK (or LEFT_CLICK, BOTH_CLICKS, RIGHT_CLICK)
        #[arg(short, long, default_value = "STRONG")]
        throw_type: String,

        /// GRID, GENETIC or HYBRID
        #[arg(short, long, default_value = "GRID")]
        strategy: String,

        /// Maximum number of solutions
        #[arg(short = 'n', long)]
        max_results: Option<usize>,

        /// Grid half width in game units
        #[arg(long)]
        radius: Option<f32>,

        /// Grid spacing in game units
        #[arg(long)]
        step: Option<f32>,

        /// Print the full JSON response
        #[arg(long)]
        json: bool,
    },

    /// Simulate a single throw and print a summary
    Simulate {
        /// Start x y z in game units
        #[arg(required = true, num_args = 3, allow_negative_numbers = true, value_names = ["X", "Y", "Z"])]
        start: Vec<f32>,

        /// Pitch in degrees (up is positive)
        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        pitch: f32,

        /// Yaw in degrees (counter-clockwise from east)
        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        yaw: f32,

        /// Throw type name
        #[arg(short, long, default_value = "STRONG")]
        throw_type: String,

        /// Simulated seconds
        #[arg(short, long, default_value_t = 5.0)]
        duration: f32,
    },

    /// Check line of sight between two points
    Los {
        /// From x y z
        #[arg(long, required = true, num_args = 3, allow_negative_numbers = true)]
        from: Vec<f32>,

        /// To x y z
        #[arg(long, required = true, num_args = 3, allow_negative_numbers = true)]
        to: Vec<f32>,
    },

    /// Print the default configuration as JSON
    Config,

    /// Report whether the physics backend is usable
    Health,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn build_context(args: &SceneArgs) -> Result<SimulationContext> {
    let physics = match &args.physics_config {
        Some(path) => PhysicsConfig::from_json_file(path)?,
        None => PhysicsConfig::default(),
    };
    let search = match &args.search_config {
        Some(path) => SearchConfig::from_json_file(path)?,
        None => SearchConfig::default(),
    };
    let scene = match &args.maps_dir {
        Some(dir) => Scene::load_map(dir, &args.map),
        None => Scene::test_scene(),
    };
    Ok(SimulationContext::new(physics, search, scene)?)
}

fn vec3(values: &[f32]) -> Result<Vec3> {
    Ok(smoke_sim_core::vec3_from_slice(values)?)
}

#[allow(clippy::too_many_arguments)]
fn run_find(
    args: &SceneArgs,
    target: &[f32],
    site: Option<&str>,
    throw_type: &str,
    strategy: &str,
    max_results: Option<usize>,
    radius: Option<f32>,
    step: Option<f32>,
    json: bool,
) -> Result<()> {
    let mut ctx = build_context(args)?;
    if radius.is_some() || step.is_some() {
        let mut search = ctx.search_config().clone();
        search.search_radius = radius.map_or(search.search_radius, GameUnits::new);
        search.grid_step = step.map_or(search.grid_step, GameUnits::new);
        ctx = SimulationContext::new(ctx.config().clone(), search, ctx.scene().clone())?;
    }

    let target = match site {
        Some(site) => MapPoints::test_map()
            .bombsite(site)
            .with_context(|| format!("unknown bombsite '{site}'"))?,
        None => vec3(target)?,
    };
    let throw_type: ThrowType = throw_type.parse()?;
    let strategy: SearchStrategy = strategy.parse()?;
    let max_results = max_results.unwrap_or(ctx.search_config().default_max_results);

    let solutions = ctx.find_solutions(&target, throw_type, strategy, max_results)?;

    if json {
        let response = smoke_sim_core::SmokeResponse::ok(solutions);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!(
        "=== {} solutions for [{:.1}, {:.1}, {:.1}] ({}) ===\n",
        solutions.len(),
        target.x,
        target.y,
        target.z,
        throw_type
    );
    for (i, s) in solutions.iter().enumerate() {
        println!(
            "#{:<2} accuracy {:>6.1}  bounces {}  {}",
            i + 1,
            s.accuracy,
            s.bounces,
            s.cs2_commands.combined
        );
    }
    Ok(())
}

fn run_simulate(
    args: &SceneArgs,
    start: &[f32],
    pitch: f32,
    yaw: f32,
    throw_type: &str,
    duration: f32,
) -> Result<()> {
    let ctx = build_context(args)?;
    let start = vec3(start)?;
    let throw_type: ThrowType = throw_type.parse()?;

    let (trajectory, result) = ctx.simulate_throw(&start, pitch, yaw, throw_type, duration)?;

    println!("=== {} throw, pitch {:.1}, yaw {:.1} ===", throw_type, pitch, yaw);
    println!(
        "Landed at [{:.1}, {:.1}, {:.1}], {:.1} units from start (horizontal)",
        result.final_position.x,
        result.final_position.y,
        result.final_position.z,
        horizontal_distance(&start, &result.final_position)
    );
    println!(
        "Final speed {:.1} u/s, {} bounces, {:.2}s simulated",
        result.final_speed, result.bounces, result.time_elapsed
    );
    let range = horizontal_distance(&start, &result.final_position);
    println!(
        "Drag-free pitch for that range: {:.1}",
        optimal_pitch(range, ctx.config().throw_speed(throw_type), ctx.config().gravity)
    );
    if let Some(metrics) = TrajectoryMetrics::from_trajectory(&trajectory, ctx.config().time_step)
    {
        println!(
            "Path {:.1} units, height {:.1}..{:.1}, {} points",
            metrics.total_distance, metrics.min_height, metrics.max_height, metrics.num_points
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Command::Find {
            target,
            site,
            throw_type,
            strategy,
            max_results,
            radius,
            step,
            json,
        } => {
            if target.is_empty() && site.is_none() {
                bail!("give a target as X Y Z or --site");
            }
            run_find(
                &cli.scene,
                target,
                site.as_deref(),
                throw_type,
                strategy,
                *max_results,
                *radius,
                *step,
                *json,
            )
        }
        Command::Simulate {
            start,
            pitch,
            yaw,
            throw_type,
            duration,
        } => run_simulate(&cli.scene, start, *pitch, *yaw, throw_type, *duration),
        Command::Los { from, to } => {
            let ctx = build_context(&cli.scene)?;
            let clear = ctx.line_of_sight(&vec3(from)?, &vec3(to)?)?;
            println!("{}", if clear { "clear" } else { "blocked" });
            Ok(())
        }
        Command::Config => {
            let config = serde_json::json!({
                "physics": PhysicsConfig::default(),
                "search": SearchConfig::default(),
            });
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Health => {
            let ctx = build_context(&cli.scene)?;
            let status = health(&ctx);
            info!("Backend initialized: {}", status.initialized);
            println!("{}", serde_json::to_string(&status)?);
            Ok(())
        }
    }
}
