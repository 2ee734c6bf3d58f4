//! pmatch CLI — driving adapter for the pmatch engine.
//!
//! Subcommands:
//! - `eval <config> <subject-json> [--trace]` — evaluate config against a subject;
//!   a subject no arm matches is an error
//! - `check <config> [--shape <subject-json>]` — validate config loads (and fits a subject shape)
//! - `info` — print registered predicate and projection names
//!
//! Set `RUST_LOG=pmatch=trace` to see arm attempts and segment decisions.

use std::process;
use std::sync::Once;

use pmatch::{MatchConfig, MatchError, Registry, RegistryBuilder, Shape, Value, ValueConfig};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "eval" => cmd_eval(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "info" => cmd_info(),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("error: unknown command \"{other}\"");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber, only when `RUST_LOG` is set.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_eval(args: &[String]) -> Result<(), String> {
    let (positional, trace) = split_flag(args, "--trace");
    let [config_path, subject] = positional.as_slice() else {
        return Err("eval requires a config file path and a subject".into());
    };

    let config = load_config(config_path)?;
    let subject = parse_subject(subject)?;
    let m = build_registry()
        .load_match(config)
        .map_err(|e| format!("config load failed: {e}"))?;
    tracing::debug!(config = %config_path, arms = m.len(), "config loaded");

    if trace {
        let trace = m.evaluate_with_trace(&subject);
        for step in &trace.steps {
            let bound: Vec<String> = step
                .bindings
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            println!(
                "arm {} {}: {} {}",
                step.index,
                if step.matched { "matched" } else { "failed" },
                step.pattern,
                bound.join(" ")
            );
        }
        let Some(action) = trace.result else {
            return Err(MatchError::NonExhaustive {
                arms: m.len(),
                subject: format!("{subject:?}"),
            }
            .to_string());
        };
        println!("{action}");
        return Ok(());
    }

    let action = m.evaluate(&subject).map_err(|e| e.to_string())?;
    println!("{action}");
    Ok(())
}

fn cmd_check(args: &[String]) -> Result<(), String> {
    let (config_path, shape) = match args {
        [path] => (path, None),
        [path, flag, subject] if flag == "--shape" => (path, Some(subject)),
        _ => return Err("check requires a config file path, optionally --shape <subject>".into()),
    };

    let config = load_config(config_path)?;
    let m = build_registry()
        .load_match(config)
        .map_err(|e| format!("config invalid: {e}"))?;

    if let Some(subject) = shape {
        let shape = Shape::of(&parse_subject(subject)?);
        m.validate(&shape)
            .map_err(|e| format!("config invalid: {e}"))?;
        println!("Config valid for subjects of shape {shape}");
    } else {
        println!("Config valid ({} arms, depth {})", m.len(), m.depth());
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Uniform return type for all commands
fn cmd_info() -> Result<(), String> {
    let registry = build_registry();

    println!("Registered predicates:");
    for name in registry.predicate_names() {
        println!("  {name}");
    }

    println!("\nRegistered projections:");
    for name in registry.projection_names() {
        println!("  {name}");
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Registry assembly (composition root)
// ═══════════════════════════════════════════════════════════════════════════════

fn build_registry() -> Registry {
    pmatch_test::register(RegistryBuilder::new()).build()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Config loading
// ═══════════════════════════════════════════════════════════════════════════════

fn load_config(path: &str) -> Result<MatchConfig<String>, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read \"{path}\": {e}"))?;

    let is_json = std::path::Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    parse_config(&content, is_json)
}

fn parse_config(content: &str, is_json: bool) -> Result<MatchConfig<String>, String> {
    if is_json {
        serde_json::from_str(content).map_err(|e| format!("JSON parse error: {e}"))
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(content).map_err(|e| format!("YAML parse error: {e}"))
    }
}

fn parse_subject(json: &str) -> Result<Value, String> {
    let json: serde_json::Value =
        serde_json::from_str(json).map_err(|e| format!("subject is not valid JSON: {e}"))?;
    ValueConfig::from(json)
        .to_value()
        .map_err(|e| format!("subject: {e}"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

/// Remove every occurrence of `flag`, reporting whether it was present.
fn split_flag<'a>(args: &'a [String], flag: &str) -> (Vec<&'a String>, bool) {
    let present = args.iter().any(|a| a == flag);
    (args.iter().filter(|a| *a != flag).collect(), present)
}

fn print_usage() {
    eprintln!(
        "Usage: pmatch <command> [options]

Commands:
  eval <config> <subject-json> [--trace]   Evaluate config against a subject
  check <config> [--shape <subject-json>]  Validate config (and subject shape)
  info                                     Print registered names
  help                                     Show this help"
    );
}
