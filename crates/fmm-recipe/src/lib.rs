pub mod descriptor;
pub mod reference;
pub mod runner;
pub mod validation;

pub use descriptor::{DescriptorError, RecipeDescriptor};
pub use reference::ReferenceDataset;
pub use runner::{RecipeError, RecipeRunner, RunnerConfig};
pub use validation::{validate, MatchPolicy};
