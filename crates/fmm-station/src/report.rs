//! Human-readable result lines for the operator.

use fmm_recipe::RecipeError;
use fmm_spine::{ControlError, ControlSnapshot, PartOutcome};

pub fn control_values(snapshot: &ControlSnapshot) -> String {
    format!("Control values: {snapshot}")
}

pub fn control_values_set(snapshot: &ControlSnapshot) -> String {
    format!("Control values set: {snapshot}")
}

pub fn part(outcome: &PartOutcome) -> String {
    match outcome {
        PartOutcome::Good { log } => format!("GOOD PART - log: {}", log.display()),
        PartOutcome::Bad { log, reason } => {
            format!("BAD PART - log: {} ({reason})", log.display())
        }
    }
}

pub fn control_failure(err: &ControlError) -> String {
    match err {
        ControlError::StartFailed(cause) => format!("Hardware failed to start: {cause}"),
        other => format!("Run failed: {other}"),
    }
}

pub fn recipe_failure(err: &RecipeError) -> String {
    match err {
        RecipeError::Control(ControlError::StartFailed(cause)) => {
            format!("Hardware failed to start: {cause}")
        }
        other => format!("Recipe failed: {other}"),
    }
}
