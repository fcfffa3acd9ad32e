//! Recipe-file execution: parse a descriptor, run its recipe on the station
//! and judge the produced log against the named reference dataset.

use crate::descriptor::{DescriptorError, RecipeDescriptor};
use crate::reference::ReferenceDataset;
use crate::validation::{validate, MatchPolicy};
use fmm_spine::{
    read_records, BadPartReason, ControlError, Controller, PartOutcome, RecordError, StationIO,
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Records(#[from] RecordError),
}

#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Directory holding reference datasets, addressed by reference name.
    pub reference_dir: PathBuf,
    pub policy: MatchPolicy,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            reference_dir: PathBuf::from("data/reference"),
            policy: MatchPolicy::default(),
        }
    }
}

pub struct RecipeRunner {
    config: RunnerConfig,
}

impl RecipeRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run the recipe described in `path` and validate its output.
    ///
    /// A run that aborts part way is a bad part. Configuration problems,
    /// start failures and unreadable files are errors.
    pub fn run_from_recipe_file<IO: StationIO>(
        &self,
        controller: &mut Controller<IO>,
        path: &Path,
    ) -> Result<PartOutcome, RecipeError> {
        let descriptor = RecipeDescriptor::from_file(path)?;
        info!(
            recipe_file = %path.display(),
            reference = %descriptor.reference_name,
            recipe = %descriptor.kind,
            part_size = descriptor.part_size,
            "Executing recipe file"
        );
        self.execute(controller, &descriptor)
    }

    pub fn execute<IO: StationIO>(
        &self,
        controller: &mut Controller<IO>,
        descriptor: &RecipeDescriptor,
    ) -> Result<PartOutcome, RecipeError> {
        let kind = descriptor.kind;
        let log = match controller.run_recipe(kind, kind.duration_s(), descriptor.part_size) {
            Ok(log) => log,
            Err(ControlError::RunAborted {
                second,
                log,
                source,
            }) => {
                return Ok(PartOutcome::Bad {
                    log,
                    reason: BadPartReason::RunAborted {
                        second,
                        cause: source.to_string(),
                    },
                })
            }
            Err(e) => return Err(e.into()),
        };

        let reference =
            ReferenceDataset::load(&self.config.reference_dir, &descriptor.reference_name)?;
        let produced = read_records(&log)?;

        match validate(reference.records(), &produced, self.config.policy) {
            Ok(()) => {
                info!(log = %log.display(), reference = reference.name(), "Good part");
                Ok(PartOutcome::Good { log })
            }
            Err(reason) => {
                warn!(log = %log.display(), reference = reference.name(), %reason, "Bad part");
                Ok(PartOutcome::Bad { log, reason })
            }
        }
    }
}
