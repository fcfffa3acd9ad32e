//! Operator session: the four things a user can do with the station, each
//! answered with a result line.

use crate::infra::audit::{AuditEventType, AuditLogger};
use crate::report;
use crate::runtime::telemetry;
use fmm_recipe::RecipeRunner;
use fmm_spine::{ControlError, ControlValues, Controller, StationIO, TimeBase};
use std::path::Path;
use tracing::warn;

pub struct Session<IO: StationIO> {
    controller: Controller<IO>,
    runner: RecipeRunner,
    audit: Option<AuditLogger>,
    timebase: TimeBase,
    failures: u32,
}

impl<IO: StationIO> Session<IO> {
    pub fn new(
        controller: Controller<IO>,
        runner: RecipeRunner,
        audit: Option<AuditLogger>,
        timebase: TimeBase,
    ) -> Self {
        Self {
            controller,
            runner,
            audit,
            timebase,
            failures: 0,
        }
    }

    pub fn control_values(&self) -> String {
        report::control_values(&self.controller.control_values())
    }

    pub fn set_control_values(&mut self, pressure: i64, current: i64) -> String {
        self.controller.set_control_values(pressure, current);
        let snapshot = self.controller.control_values();
        self.audit(
            AuditEventType::ControlValuesSet,
            serde_json::json!({
                "requested": { "pressure": pressure, "current": current },
                "applied": snapshot,
            }),
        );
        report::control_values_set(&snapshot)
    }

    pub fn manual_run(&mut self, seconds: u32) -> String {
        let snapshot = self.controller.control_values();
        let executed_before = self.controller.stats().seconds_executed;
        let result = ControlValues::new(snapshot.pressure.into(), snapshot.current.into(), seconds)
            .map_err(ControlError::from)
            .and_then(|values| self.controller.run_manual(&values));
        self.record_seconds(executed_before);
        telemetry::record_run("manual", &result);

        match result {
            Ok(outcome) => {
                self.audit(
                    AuditEventType::ManualRun,
                    serde_json::json!({
                        "seconds": seconds,
                        "values": snapshot,
                        "result": outcome,
                    }),
                );
                report::part(&outcome)
            }
            Err(e) => {
                self.failures += 1;
                self.audit(
                    AuditEventType::RunFailed,
                    serde_json::json!({
                        "mode": "manual",
                        "seconds": seconds,
                        "error": e.to_string(),
                    }),
                );
                report::control_failure(&e)
            }
        }
    }

    pub fn execute_recipe(&mut self, path: &Path) -> String {
        let executed_before = self.controller.stats().seconds_executed;
        let result = self
            .runner
            .run_from_recipe_file(&mut self.controller, path);
        self.record_seconds(executed_before);
        telemetry::record_run("recipe", &result);

        match result {
            Ok(outcome) => {
                self.audit(
                    AuditEventType::RecipeRun,
                    serde_json::json!({
                        "recipe_file": path.display().to_string(),
                        "policy": self.runner.config().policy,
                        "result": outcome,
                    }),
                );
                report::part(&outcome)
            }
            Err(e) => {
                self.failures += 1;
                self.audit(
                    AuditEventType::RunFailed,
                    serde_json::json!({
                        "recipe_file": path.display().to_string(),
                        "error": e.to_string(),
                    }),
                );
                report::recipe_failure(&e)
            }
        }
    }

    /// Runs that ended in an error rather than a part.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn controller(&self) -> &Controller<IO> {
        &self.controller
    }

    pub fn audit(&mut self, event: AuditEventType, details: serde_json::Value) {
        let Some(logger) = self.audit.as_mut() else {
            return;
        };
        if let Err(e) = logger.log_event(
            self.timebase.now_us(),
            self.timebase.unix_us(),
            event,
            details,
        ) {
            warn!(error = %e, ?event, "Failed to write audit entry");
        }
    }

    fn record_seconds(&self, executed_before: u64) {
        let executed = self.controller.stats().seconds_executed;
        telemetry::record_seconds(executed.saturating_sub(executed_before));
    }
}
