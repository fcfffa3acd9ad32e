use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub show_help: bool,
    pub demo: bool,
    pub pressure: Option<i64>,
    pub current: Option<i64>,
    pub manual_seconds: Option<u32>,
    pub recipes: Vec<PathBuf>,
    pub reference_dir: PathBuf,
    pub log_dir: PathBuf,
    pub second_ms: u64,
    pub strict_validation: bool,
    pub json_logs: bool,
    pub audit_path: Option<PathBuf>,
    pub print_metrics: bool,
    /// Flags whose value was missing or unparsable.
    pub invalid: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            show_help: false,
            demo: false,
            pressure: None,
            current: None,
            manual_seconds: None,
            recipes: Vec::new(),
            reference_dir: PathBuf::from("data/reference"),
            log_dir: PathBuf::from("logs"),
            second_ms: 1000,
            strict_validation: false,
            json_logs: false,
            audit_path: None,
            print_metrics: false,
            invalid: Vec::new(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::from_args(&args)
    }

    pub fn from_args(args: &[String]) -> Self {
        let mut cfg = RuntimeConfig::default();
        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = args.get(i + 1).map(String::as_str);
            let mut takes_value = true;
            match flag {
                "--pressure" => cfg.pressure = cfg.parse_value(flag, value),
                "--current" => cfg.current = cfg.parse_value(flag, value),
                "--manual-seconds" => cfg.manual_seconds = cfg.parse_value(flag, value),
                "--second-ms" => {
                    if let Some(ms) = cfg.parse_value(flag, value) {
                        cfg.second_ms = ms;
                    }
                }
                "--recipe" => {
                    if let Some(path) = cfg.path_value(flag, value) {
                        cfg.recipes.push(path);
                    }
                }
                "--reference-dir" => {
                    if let Some(path) = cfg.path_value(flag, value) {
                        cfg.reference_dir = path;
                    }
                }
                "--log-dir" => {
                    if let Some(path) = cfg.path_value(flag, value) {
                        cfg.log_dir = path;
                    }
                }
                "--audit-log" => cfg.audit_path = cfg.path_value(flag, value),
                _ => {
                    takes_value = false;
                    match flag {
                        "--demo" => cfg.demo = true,
                        "--strict-validation" => cfg.strict_validation = true,
                        "--json-logs" => cfg.json_logs = true,
                        "--print-metrics" => cfg.print_metrics = true,
                        "--help" | "-h" => {
                            cfg.show_help = true;
                            break;
                        }
                        other => cfg.invalid.push(format!("unknown flag `{other}`")),
                    }
                }
            }
            i += if takes_value { 2 } else { 1 };
        }
        cfg
    }

    /// Whether the configuration asks for any station activity.
    pub fn has_work(&self) -> bool {
        self.demo
            || self.pressure.is_some()
            || self.current.is_some()
            || self.manual_seconds.is_some()
            || !self.recipes.is_empty()
    }

    fn parse_value<T: std::str::FromStr>(&mut self, flag: &str, value: Option<&str>) -> Option<T> {
        match value.map(str::parse::<T>) {
            Some(Ok(parsed)) => Some(parsed),
            Some(Err(_)) => {
                self.invalid
                    .push(format!("invalid value `{}` for {flag}", value.unwrap_or_default()));
                None
            }
            None => {
                self.invalid.push(format!("missing value for {flag}"));
                None
            }
        }
    }

    fn path_value(&mut self, flag: &str, value: Option<&str>) -> Option<PathBuf> {
        match value {
            Some(v) => Some(PathBuf::from(v)),
            None => {
                self.invalid.push(format!("missing value for {flag}"));
                None
            }
        }
    }

    pub fn print_help() {
        println!(
            r#"fmm-station - Phoenix Fictitious Manufacturing Machine

USAGE:
    fmm-station [OPTIONS]

OPTIONS:
    --pressure <N>          Set the pressure control value (clamped to 0..=200)
    --current <N>           Set the current control value (clamped to 0..=200)
    --manual-seconds <N>    Run with the current control values for N seconds
    --recipe <PATH>         Execute a recipe file (repeatable, run in order)
    --reference-dir <PATH>  Directory of reference datasets [default: data/reference]
    --log-dir <PATH>        Directory for run logs [default: logs]
    --second-ms <MS>        Real milliseconds per simulated second [default: 1000]
                            (0 runs on a virtual clock without waiting)
    --strict-validation     Reject a part when any record field differs
    --demo                  Set 100/100, run 10 s manually, then run data/recipes/recipe{{1,2,3}}.txt
    --json-logs             Output logs in JSON format (for log aggregation)
    --audit-log <PATH>      Enable audit logging to specified JSONL file
    --print-metrics         Print Prometheus metrics on exit
    -h, --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log filter (e.g., RUST_LOG=debug,fmm_spine=trace)

EXAMPLES:
    # Manual run
    fmm-station --pressure 100 --current 100 --manual-seconds 10

    # Recipe with audit trail
    fmm-station --recipe data/recipes/recipe3.txt --audit-log logs/audit.jsonl

    # Fast demo
    fmm-station --demo --second-ms 0
"#
        );
    }
}
