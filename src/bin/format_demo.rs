//! Headless formatting demo
//!
//! Runs a candidate batch through the pipeline and prints the formatted
//! commands. Reads a JSON batch from a file, or falls back to a built-in
//! sample exercising all three strategies plus a failure path.

use std::path::PathBuf;

use clap::Parser;

use command_forge::batch::context::NullDisplayNames;
use command_forge::core::types::TargetRoleRegistry;
use command_forge::pipeline::{format_action_batch, RecordingTraceSink, TraceSink};
use command_forge::{ActionBatch, BatchContext, FormatterOptions};

#[derive(Parser, Debug)]
#[command(name = "format_demo")]
#[command(about = "Run a candidate batch through the action formatting pipeline")]
struct Args {
    /// Path to a JSON array of candidate actions (defaults to a built-in sample)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Capture and print trace events alongside the results
    #[arg(long, short = 't')]
    trace: bool,

    /// Append raw entity ids after display names
    #[arg(long)]
    debug_names: bool,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

fn sample_batch() -> serde_json::Value {
    serde_json::json!([
        {
            "action_id": "a1",
            "actor_id": "hero",
            "action": { "id": "give", "name": "Give", "template": "give {primary} to {secondary}" },
            "resolved_targets": {
                "primary": { "id": "sword1", "display_name": "Iron Sword" },
                "secondary": { "id": "npc1", "display_name": "Quartermaster" }
            }
        },
        {
            "action_id": "a2",
            "actor_id": "hero",
            "action": { "id": "taunt", "name": "Taunt", "template": "taunt {target}" },
            "legacy_targets": { "target": "npc2" },
            "per_action_metadata": { "command": "taunt the goblin loudly" }
        },
        {
            "action_id": "a3",
            "actor_id": "hero",
            "action": { "id": "wave", "name": "Wave", "template": "wave at {target}" },
            "legacy_targets": { "target": "npc3" }
        },
        {
            "action_id": "a4",
            "actor_id": "hero",
            "action": { "id": "vanish", "name": "Vanish", "template": "vanish {target}" },
            "resolved_targets": {}
        }
    ])
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let payload = match &args.input {
        Some(path) => {
            let text = std::fs::read_to_string(path).unwrap_or_else(|err| {
                eprintln!("failed to read {}: {err}", path.display());
                std::process::exit(1);
            });
            serde_json::from_str(&text).unwrap_or_else(|err| {
                eprintln!("failed to parse {}: {err}", path.display());
                std::process::exit(1);
            })
        }
        None => sample_batch(),
    };

    let batch = match ActionBatch::from_value(payload) {
        Ok(batch) => batch,
        Err(err) => {
            eprintln!("fatal: {err}");
            std::process::exit(1);
        }
    };

    let options = FormatterOptions {
        debug_names: args.debug_names,
        visual_validator: None,
    };
    let roles = TargetRoleRegistry::default();
    let names = NullDisplayNames;
    let context = BatchContext::new(&names, &options, &roles);

    let mut sink = RecordingTraceSink::new();
    let trace: Option<&mut dyn TraceSink> = if args.trace { Some(&mut sink) } else { None };

    let result = match format_action_batch(batch.candidates(), context, trace) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("fatal: {err}");
            std::process::exit(1);
        }
    };

    match args.format.as_str() {
        "json" => {
            println!(
                "{}",
                serde_json::to_string_pretty(&result).expect("pipeline result serializes")
            );
        }
        _ => {
            for action in &result.actions {
                if action.success {
                    println!(
                        "[{}] {} ({})",
                        action.action_id,
                        action.command,
                        action.metadata_source.as_str()
                    );
                } else {
                    println!("[{}] FAILED: {:?}", action.action_id, action.error);
                }
            }
            let stats = &result.statistics;
            println!(
                "-- {} actions, {} failed (per-action {}, multi-target {}, legacy {})",
                stats.total, stats.failure_count, stats.per_action, stats.global_multi_target,
                stats.legacy
            );
        }
    }

    if args.trace {
        println!("-- {} trace events", sink.events.len());
        for event in &sink.events {
            println!(
                "   {}",
                serde_json::to_string(event).expect("trace event serializes")
            );
        }
    }
}
