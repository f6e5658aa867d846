use std::io::Read;
use std::path::PathBuf;

use fibercad_editor_lib::command::execute_json_batch;
use fibercad_editor_lib::harness::TestHarness;
use fibercad_editor_lib::state::{EditorSettings, SceneState};

/// Command-line options
#[derive(Debug, Default)]
struct Args {
    project: Option<PathBuf>,
    commands: Option<PathBuf>,
    out: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fibercad=info,fibercad_editor_lib=info".into()),
        )
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("usage: fibercad [--project <path>] [--commands <path>] [--out <path>]");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&args) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), String> {
    let mut harness = TestHarness {
        scene: SceneState::new(EditorSettings::load()),
    };

    if let Some(path) = &args.project {
        harness
            .scene
            .load_project_file(path)
            .map_err(|e| format!("Failed to load project {}: {e}", path.display()))?;
    }

    let batch = match &args.commands {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read commands {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read commands from stdin: {e}"))?;
            buf
        }
    };

    let responses = if batch.trim().is_empty() {
        Vec::new()
    } else {
        execute_json_batch(&mut harness, &batch)?
    };
    let failed = responses.iter().filter(|r| !r.success).count();
    tracing::info!("Executed {} commands ({failed} failed)", responses.len());

    let output = serde_json::to_string_pretty(&responses).map_err(|e| e.to_string())?;
    println!("{output}");

    if let Some(path) = &args.out {
        let json = harness.scene.export_project().map_err(|e| e.to_string())?;
        std::fs::write(path, json)
            .map_err(|e| format!("Failed to write project {}: {e}", path.display()))?;
        tracing::info!("Wrote project to {}", path.display());
    }
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    while let Some(flag) = args.next() {
        let slot = match flag.as_str() {
            "--project" => &mut parsed.project,
            "--commands" => &mut parsed.commands,
            "--out" => &mut parsed.out,
            other => return Err(format!("Unknown argument {other}")),
        };
        let value = args
            .next()
            .ok_or_else(|| format!("Missing value for {flag}"))?;
        *slot = Some(PathBuf::from(value));
    }
    Ok(parsed)
}
