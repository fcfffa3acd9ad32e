use fmm_spine::RecipeKind;
use serde::Serialize;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("cannot read recipe file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("recipe file {0} is empty")]
    Empty(PathBuf),

    #[error("expected `reference,recipe,part size`, found {found} field(s)")]
    FieldCount { found: usize },

    #[error("invalid recipe `{0}`")]
    InvalidRecipe(String),

    #[error("invalid part size `{0}`")]
    InvalidPartSize(String),
}

/// One recipe file line: `referenceName,recipeKind,partSize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeDescriptor {
    pub reference_name: String,
    pub kind: RecipeKind,
    pub part_size: i32,
}

impl RecipeDescriptor {
    pub fn parse(line: &str) -> Result<Self, DescriptorError> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();
        let [reference, kind, part_size] = fields[..] else {
            return Err(DescriptorError::FieldCount {
                found: fields.len(),
            });
        };

        let kind = kind.trim();
        let kind = RecipeKind::from_name(kind)
            .ok_or_else(|| DescriptorError::InvalidRecipe(kind.to_string()))?;

        let part_size = part_size.trim();
        let part_size = part_size
            .parse::<i32>()
            .map_err(|_| DescriptorError::InvalidPartSize(part_size.to_string()))?;

        Ok(Self {
            reference_name: reference.trim().to_string(),
            kind,
            part_size,
        })
    }

    /// Parse the first line of a recipe file. Further lines are ignored.
    pub fn from_file(path: &Path) -> Result<Self, DescriptorError> {
        let io_err = |source| DescriptorError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = std::fs::File::open(path).map_err(io_err)?;
        let mut line = String::new();
        let read = BufReader::new(file).read_line(&mut line).map_err(io_err)?;
        if read == 0 || line.trim().is_empty() {
            return Err(DescriptorError::Empty(path.to_path_buf()));
        }
        Self::parse(&line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_descriptor_line() {
        let desc = RecipeDescriptor::parse("cp_20.csv,ConstantPressure,20").unwrap();
        assert_eq!(desc.reference_name, "cp_20.csv");
        assert_eq!(desc.kind, RecipeKind::ConstantPressure);
        assert_eq!(desc.part_size, 20);
    }

    #[test]
    fn accepts_negative_part_size_and_padding() {
        let desc = RecipeDescriptor::parse(" ref.csv , ConstantCurrent , -5\r\n").unwrap();
        assert_eq!(desc.reference_name, "ref.csv");
        assert_eq!(desc.kind, RecipeKind::ConstantCurrent);
        assert_eq!(desc.part_size, -5);
    }

    #[test]
    fn rejects_unknown_recipe() {
        let err = RecipeDescriptor::parse("ref.csv,Spiral,20").unwrap_err();
        assert!(matches!(err, DescriptorError::InvalidRecipe(name) if name == "Spiral"));
    }

    #[test]
    fn recipe_names_are_case_sensitive() {
        assert!(matches!(
            RecipeDescriptor::parse("ref.csv,constantpressure,20"),
            Err(DescriptorError::InvalidRecipe(_))
        ));
    }

    #[test]
    fn rejects_bad_part_size() {
        assert!(matches!(
            RecipeDescriptor::parse("ref.csv,Ramp,6O"),
            Err(DescriptorError::InvalidPartSize(_))
        ));
        assert!(matches!(
            RecipeDescriptor::parse("ref.csv,Ramp,0x3c"),
            Err(DescriptorError::InvalidPartSize(_))
        ));
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(matches!(
            RecipeDescriptor::parse("ref.csv,Ramp"),
            Err(DescriptorError::FieldCount { found: 2 })
        ));
        assert!(matches!(
            RecipeDescriptor::parse("ref.csv,Ramp,60,extra"),
            Err(DescriptorError::FieldCount { found: 4 })
        ));
    }

    #[test]
    fn reads_only_first_line_of_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recipe.txt");
        std::fs::write(&path, "ramp.csv,Ramp,60\nignored,line,here").unwrap();

        let desc = RecipeDescriptor::from_file(&path).unwrap();
        assert_eq!(desc.kind, RecipeKind::Ramp);
        assert_eq!(desc.part_size, 60);
    }

    #[test]
    fn empty_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recipe.txt");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            RecipeDescriptor::from_file(&path),
            Err(DescriptorError::Empty(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            RecipeDescriptor::from_file(&dir.path().join("absent.txt")),
            Err(DescriptorError::Io { .. })
        ));
    }
}
