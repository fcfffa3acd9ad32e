use crate::infra::audit::{AuditEventType, AuditLogger};
use crate::runtime::config::RuntimeConfig;
use crate::runtime::logging::init_tracing;
use crate::runtime::session::Session;
use crate::runtime::telemetry;
use fmm_recipe::{MatchPolicy, RecipeRunner, RunnerConfig};
use fmm_spine::{Controller, SimulatedStation, StationConfig, TimeBase, VirtualClock};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

/// Values and duration used by `--demo`.
const DEMO_PRESSURE: i64 = 100;
const DEMO_CURRENT: i64 = 100;
const DEMO_MANUAL_SECONDS: u32 = 10;
const DEMO_RECIPES: [&str; 3] = [
    "data/recipes/recipe1.txt",
    "data/recipes/recipe2.txt",
    "data/recipes/recipe3.txt",
];

pub fn run_from_args() -> ExitCode {
    let config = RuntimeConfig::from_env();
    if config.show_help {
        RuntimeConfig::print_help();
        return ExitCode::SUCCESS;
    }
    if !config.invalid.is_empty() {
        for problem in &config.invalid {
            eprintln!("error: {problem}");
        }
        eprintln!("Run with --help for usage.");
        return ExitCode::FAILURE;
    }
    if !config.has_work() {
        RuntimeConfig::print_help();
        return ExitCode::FAILURE;
    }
    run(config)
}

pub fn run(config: RuntimeConfig) -> ExitCode {
    init_tracing(config.json_logs);
    telemetry::init();

    let timebase = TimeBase::new();
    let audit = match init_audit_logger(config.audit_path.as_deref()) {
        Ok(audit) => audit,
        Err(code) => return code,
    };

    let station_config = StationConfig {
        log_dir: config.log_dir.clone(),
        second: Duration::from_millis(config.second_ms),
    };
    let station = if config.second_ms == 0 {
        SimulatedStation::new(station_config).with_clock(VirtualClock::new())
    } else {
        SimulatedStation::new(station_config)
    };

    let runner = RecipeRunner::new(build_runner_config(&config));
    info!(
        log_dir = %config.log_dir.display(),
        reference_dir = %config.reference_dir.display(),
        second_ms = config.second_ms,
        policy = ?runner.config().policy,
        "Station ready"
    );

    let mut session = Session::new(Controller::new(station), runner, audit, timebase);
    session.audit(
        AuditEventType::SystemStart,
        serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "demo": config.demo,
            "strict_validation": config.strict_validation,
        }),
    );

    if config.demo {
        run_demo(&mut session);
    } else {
        run_requested(&mut session, &config);
    }

    let stats = session.controller().stats().clone();
    info!(
        runs_started = stats.runs_started,
        runs_completed = stats.runs_completed,
        runs_aborted = stats.runs_aborted,
        seconds_executed = stats.seconds_executed,
        failures = session.failures(),
        "Session complete"
    );
    session.audit(
        AuditEventType::SystemShutdown,
        serde_json::json!({ "stats": stats, "failures": session.failures() }),
    );

    if config.print_metrics {
        print!("{}", telemetry::render());
    }

    if session.failures() == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_demo(session: &mut Session<SimulatedStation>) {
    println!("{}", session.set_control_values(DEMO_PRESSURE, DEMO_CURRENT));
    println!("{}", session.manual_run(DEMO_MANUAL_SECONDS));
    for recipe in DEMO_RECIPES {
        println!("{}", session.execute_recipe(Path::new(recipe)));
    }
}

fn run_requested(session: &mut Session<SimulatedStation>, config: &RuntimeConfig) {
    if config.pressure.is_some() || config.current.is_some() {
        let current = session.controller().control_values();
        let pressure = config.pressure.unwrap_or(current.pressure.into());
        let current = config.current.unwrap_or(current.current.into());
        println!("{}", session.set_control_values(pressure, current));
    }

    if let Some(seconds) = config.manual_seconds {
        println!("{}", session.manual_run(seconds));
    }

    for recipe in &config.recipes {
        println!("{}", session.execute_recipe(recipe));
    }

    println!("{}", session.control_values());
}

fn build_runner_config(config: &RuntimeConfig) -> RunnerConfig {
    RunnerConfig {
        reference_dir: config.reference_dir.clone(),
        policy: if config.strict_validation {
            MatchPolicy::AnyFieldDiffers
        } else {
            MatchPolicy::AllFieldsDiffer
        },
    }
}

fn init_audit_logger(audit_path: Option<&Path>) -> Result<Option<AuditLogger>, ExitCode> {
    let Some(path) = audit_path else {
        return Ok(None);
    };
    match AuditLogger::new(path) {
        Ok(logger) => {
            info!(path = %path.display(), "Audit logging enabled");
            Ok(Some(logger))
        }
        Err(e) => {
            error!(error = %e, path = %path.display(), "Failed to initialize audit logger");
            eprintln!("Audit logging requested but failed to initialize: {e}");
            Err(ExitCode::FAILURE)
        }
    }
}
