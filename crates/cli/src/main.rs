#![deny(unsafe_code)]
//! CLI binary for the gen-art generative art system.
//!
//! Subcommands:
//! - `render <engine>`: run an engine N ticks, export the frame as SVG
//! - `replay <seed.json>`: re-render an artwork from a saved seed
//! - `schema <engine>`: print an engine's parameter schema
//! - `list`: print available engines

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use gen_art_core::{Engine, Seed};
use gen_art_engines::EngineKind;
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "gen-art", about = "Generative art: fabric, flow and voronoi")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Where and how to write a finished frame.
#[derive(clap::Args)]
struct OutputArgs {
    /// SVG output path. Defaults to `<engine>.svg`, or the engine's fixed path.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a PNG preview of the on-screen view.
    #[arg(long)]
    preview: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run an engine for N ticks and export the last frame as SVG.
    Render {
        /// Engine name (e.g. "fabric").
        engine: String,

        /// Canvas width in pixels.
        #[arg(short = 'W', long, default_value_t = 900)]
        width: usize,

        /// Canvas height in pixels.
        #[arg(short = 'H', long, default_value_t = 800)]
        height: usize,

        /// Number of ticks.
        #[arg(short, long, default_value_t = 100)]
        steps: usize,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Engine parameters as a JSON string.
        #[arg(long, default_value = "{}")]
        params: String,

        #[command(flatten)]
        out: OutputArgs,

        /// Write the seed recipe next to the SVG.
        #[arg(long)]
        save_seed: bool,

        /// Pace ticks at the engine's own timer interval.
        #[arg(long)]
        realtime: bool,
    },
    /// Re-render an artwork from a seed file written by `render --save-seed`.
    Replay {
        /// Path to the seed JSON.
        seed_file: PathBuf,

        #[command(flatten)]
        out: OutputArgs,
    },
    /// Print the parameter schema of an engine.
    Schema {
        /// Engine name.
        engine: String,
    },
    /// List available engines.
    List,
}

fn default_output(engine: &EngineKind) -> PathBuf {
    engine
        .default_output()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("{}.svg", engine.name())))
}

fn seed_path(output: &Path) -> PathBuf {
    output.with_extension("seed.json")
}

fn run_ticks(engine: &mut EngineKind, steps: usize, realtime: bool) -> Result<(), CliError> {
    let interval = engine.tick_interval();
    for _ in 0..steps {
        let started = Instant::now();
        engine.step()?;
        if realtime {
            // An overrunning tick just delays the next one.
            if let Some(rest) = interval.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
    }
    Ok(())
}

/// Builds the engine described by `seed`, runs it and writes its outputs.
fn render(
    seed: &Seed,
    out: OutputArgs,
    save_seed: bool,
    realtime: bool,
    json: bool,
) -> Result<(), CliError> {
    seed.validate()?;
    let mut engine =
        EngineKind::from_name(&seed.engine, seed.width, seed.height, seed.seed, &seed.params)?;
    info!(
        "rendering {} ({}x{}, {} ticks, seed {})",
        seed.engine, seed.width, seed.height, seed.steps, seed.seed
    );
    debug!("effective params: {}", engine.params());

    run_ticks(&mut engine, seed.steps, realtime)?;

    let output = out.output.unwrap_or_else(|| default_output(&engine));
    let placement = engine.export_svg(&output)?;
    debug!("placement scale {:.4}", placement.scale);

    if let Some(preview) = &out.preview {
        engine.write_preview(seed.width, seed.height, preview)?;
        info!("preview written to {}", preview.display());
    }

    let saved_seed = if save_seed {
        let path = seed_path(&output);
        fs::write(&path, serde_json::to_string_pretty(seed)?)?;
        info!("seed written to {}", path.display());
        Some(path)
    } else {
        None
    };

    if json {
        let report = serde_json::json!({
            "engine": seed.engine,
            "width": seed.width,
            "height": seed.height,
            "steps": seed.steps,
            "seed": seed.seed,
            "params": engine.params(),
            "output": output.display().to_string(),
            "preview": out.preview.as_ref().map(|p| p.display().to_string()),
            "seed_file": saved_seed.as_ref().map(|p| p.display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        eprintln!("SVG exported as '{}'", output.display());
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let engines = EngineKind::list_engines();
            if cli.json {
                let info = serde_json::json!({ "engines": engines });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Engines:");
                for name in engines {
                    println!("  {name}");
                }
            }
        }
        Command::Schema { engine } => {
            let eng = EngineKind::from_name(&engine, 1, 1, 0, &Value::Null)?;
            let schema = eng.param_schema();
            if cli.json {
                println!("{}", serde_json::to_string(&schema)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
        }
        Command::Render {
            engine,
            width,
            height,
            steps,
            seed,
            params,
            out,
            save_seed,
            realtime,
        } => {
            let params: Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            if !params.is_object() {
                return Err(CliError::Input("--params must be a JSON object".into()));
            }
            let recipe = Seed::new(&engine, width, height, seed)
                .with_params(params)
                .with_steps(steps);
            render(&recipe, out, save_seed, realtime, cli.json)?;
        }
        Command::Replay { seed_file, out } => {
            let text = fs::read_to_string(&seed_file)?;
            let recipe: Seed = serde_json::from_str(&text).map_err(|e| {
                CliError::Input(format!("invalid seed file {}: {e}", seed_file.display()))
            })?;
            render(&recipe, out, false, false, cli.json)?;
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_defaults() {
        let cli = Cli::try_parse_from(["gen-art", "render", "fabric"]).unwrap();
        let Command::Render {
            engine,
            width,
            height,
            steps,
            seed,
            params,
            out,
            save_seed,
            realtime,
        } = cli.command
        else {
            panic!("expected render");
        };
        assert_eq!(engine, "fabric");
        assert_eq!((width, height, steps, seed), (900, 800, 100, 42));
        assert_eq!(params, "{}");
        assert!(out.output.is_none() && out.preview.is_none());
        assert!(!save_seed && !realtime);
    }

    #[test]
    fn seed_file_sits_next_to_the_svg() {
        assert_eq!(
            seed_path(Path::new("out/fabric.svg")),
            PathBuf::from("out/fabric.seed.json")
        );
    }

    #[test]
    fn default_output_uses_fixed_path_when_engine_has_one() {
        let classic = EngineKind::from_name("fabric-classic", 1, 1, 0, &Value::Null).unwrap();
        let flow = EngineKind::from_name("flow", 10, 10, 0, &Value::Null).unwrap();
        assert_eq!(default_output(&classic), PathBuf::from("output/organic_fabric.svg"));
        assert_eq!(default_output(&flow), PathBuf::from("flow.svg"));
    }

    #[test]
    fn render_then_replay_gives_identical_svg() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("voronoi.svg");
        let recipe = Seed::new("voronoi", 200, 150, 9)
            .with_params(serde_json::json!({"num_points": 30}))
            .with_steps(5);
        let out = OutputArgs {
            output: Some(first.clone()),
            preview: None,
        };
        render(&recipe, out, true, false, false).unwrap();

        let saved = fs::read_to_string(seed_path(&first)).unwrap();
        let replayed: Seed = serde_json::from_str(&saved).unwrap();
        assert_eq!(replayed, recipe);

        let second = dir.path().join("again.svg");
        let out = OutputArgs {
            output: Some(second.clone()),
            preview: None,
        };
        render(&replayed, out, false, false, false).unwrap();
        assert_eq!(
            fs::read_to_string(&first).unwrap(),
            fs::read_to_string(&second).unwrap()
        );
    }

    #[test]
    fn render_with_zero_particles_is_nothing_to_export() {
        let dir = tempfile::tempdir().unwrap();
        let recipe = Seed::new("flow", 50, 50, 1)
            .with_params(serde_json::json!({"num_particles": 0}))
            .with_steps(3);
        let out = OutputArgs {
            output: Some(dir.path().join("flow.svg")),
            preview: None,
        };
        let err = render(&recipe, out, false, false, false).unwrap_err();
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn unknown_engine_exit_code() {
        let recipe = Seed::new("nope", 10, 10, 1);
        let out = OutputArgs {
            output: None,
            preview: None,
        };
        let err = render(&recipe, out, false, false, false).unwrap_err();
        assert!(matches!(err, CliError::Engine(_)));
    }
}
