pub mod builder;
pub mod document;
pub mod file_store;
pub mod local_store;
pub mod locator;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// A star schema: one facts table joined to its dimension tables.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Cube {
    pub name: String,
    /// Kind of data source as written in the document, see [`Cube::source_kind`]
    pub source: String,
    /// Always holds a single entry for now
    pub facts: Vec<Facts>,
    pub dimensions: Vec<Dimension>,
}

impl Cube {
    pub fn source_kind(&self) -> Result<CubeSource, CubeConfigError> {
        self.source.parse()
    }

    pub fn get_dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Checks that every facts key points at a dimension declared in this cube.
    ///
    /// Construction does not call this, consumers decide when a dangling
    /// reference matters.
    pub fn validate_references(&self) -> Result<(), CubeConfigError> {
        for facts in &self.facts {
            for (column, dimension_ref) in facts.key_refs()? {
                if self.get_dimension(&dimension_ref.table).is_none() {
                    return Err(CubeConfigError::UnresolvedReference {
                        column: column.to_string(),
                        reference: dimension_ref.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Facts {
    pub table_name: String,
    /// Facts column name -> `dimension_table.dimension_column`
    pub keys: IndexMap<String, String>,
    /// Explicit measure columns, overriding numeric column detection downstream
    pub measures: Vec<String>,
}

impl Facts {
    pub fn key_refs(&self) -> Result<Vec<(&str, DimensionRef)>, CubeConfigError> {
        self.keys
            .iter()
            .map(|(column, reference)| Ok((column.as_str(), reference.parse()?)))
            .collect()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Dimension {
    /// Source table name
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    /// Original column name -> displayed name, in display order.
    /// Empty means every column of the table is shown.
    pub columns: IndexMap<String, String>,
}

/// Parsed `table.column` reference from the facts keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionRef {
    pub table: String,
    pub column: String,
}

impl FromStr for DimensionRef {
    type Err = CubeConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((table, column))
                if !table.is_empty() && !column.is_empty() && !column.contains('.') =>
            {
                Ok(DimensionRef {
                    table: table.to_string(),
                    column: column.to_string(),
                })
            }
            _ => Err(CubeConfigError::InvalidReference(s.to_string())),
        }
    }
}

impl fmt::Display for DimensionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeSource {
    Csv,
    Postgres,
    Mysql,
    Oracle,
    Mssql,
}

impl FromStr for CubeSource {
    type Err = CubeConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(CubeSource::Csv),
            "postgres" => Ok(CubeSource::Postgres),
            "mysql" => Ok(CubeSource::Mysql),
            "oracle" => Ok(CubeSource::Oracle),
            "mssql" => Ok(CubeSource::Mssql),
            _ => Err(CubeConfigError::UnknownSource(s.to_string())),
        }
    }
}

/// [`Cube`] store
///
/// Implemented on top of the configuration file and by an in-memory
/// store for callers that want to keep constructed cubes around.
pub trait CubeStore {
    fn get_cube(&self, name: &str) -> Result<Cube, CubeConfigError>;
    fn get_all_cubes(&self) -> Result<BTreeMap<String, Cube>, CubeConfigError>;
}

#[derive(Error, Debug)]
pub enum CubeConfigError {
    #[error("config file doesn't exist: {}", .0.display())]
    ConfigFileNotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML document: {0}")]
    Decode(#[from] serde_yaml::Error),

    #[error("missing name or source")]
    MissingIdentity,

    /// The reason is kept for logging, users get the generic message
    #[error("bad configuration in the configuration file")]
    BadConfiguration(String),

    #[error("unknown cube source: {0}")]
    UnknownSource(String),

    #[error("invalid dimension reference: {0}")]
    InvalidReference(String),

    #[error("facts column {column} references unknown dimension: {reference}")]
    UnresolvedReference { column: String, reference: String },

    #[error("Cube not found: {0}")]
    CubeNotFound(String),

    #[error("Environment config error: {0}")]
    Env(#[from] envconfig::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[fixture]
    fn labster() -> Cube {
        Cube {
            name: "labster".to_string(),
            source: "csv".to_string(),
            facts: vec![Facts {
                table_name: "stats_line".to_string(),
                keys: IndexMap::from([("departement_id".to_string(), "orgunit.id".to_string())]),
                measures: vec!["montant".to_string()],
            }],
            dimensions: vec![Dimension {
                name: "orgunit".to_string(),
                display_name: "Organisation".to_string(),
                columns: IndexMap::new(),
            }],
        }
    }

    #[rstest]
    #[case::csv("csv", CubeSource::Csv)]
    #[case::postgres("postgres", CubeSource::Postgres)]
    #[case::mysql("mysql", CubeSource::Mysql)]
    #[case::oracle("oracle", CubeSource::Oracle)]
    #[case::mssql_upper("MSSQL", CubeSource::Mssql)]
    fn test_source_kind(#[case] source: &str, #[case] expected: CubeSource) {
        assert_eq!(source.parse::<CubeSource>().unwrap(), expected);
    }

    #[rstest]
    fn test_unknown_source_kind(mut labster: Cube) {
        labster.source = "excel".to_string();
        assert!(matches!(
            labster.source_kind(),
            Err(CubeConfigError::UnknownSource(s)) if s == "excel"
        ));
    }

    #[rstest]
    #[case::no_dot("orgunit")]
    #[case::empty_table(".id")]
    #[case::empty_column("orgunit.")]
    #[case::too_many_parts("schema.orgunit.id")]
    fn test_invalid_reference(#[case] reference: &str) {
        assert!(reference.parse::<DimensionRef>().is_err());
    }

    #[test]
    fn test_reference_display() {
        let dimension_ref: DimensionRef = "orgunit.id".parse().unwrap();
        assert_eq!(dimension_ref.table, "orgunit");
        assert_eq!(dimension_ref.column, "id");
        assert_eq!(dimension_ref.to_string(), "orgunit.id");
    }

    #[rstest]
    fn test_references_resolve(labster: Cube) {
        assert!(labster.validate_references().is_ok());
    }

    #[rstest]
    fn test_unresolved_reference(mut labster: Cube) {
        labster.dimensions.clear();
        match labster.validate_references() {
            Err(CubeConfigError::UnresolvedReference { column, reference }) => {
                assert_eq!(column, "departement_id");
                assert_eq!(reference, "orgunit.id");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[rstest]
    fn test_bad_configuration_message_is_generic() {
        let err = CubeConfigError::BadConfiguration("facts.table_name missing".to_string());
        assert_eq!(err.to_string(), "bad configuration in the configuration file");
    }

    #[rstest]
    fn test_dimension_serializes_display_name(labster: Cube) {
        let json = serde_json::to_value(&labster.dimensions[0]).unwrap();
        assert_eq!(json["displayName"], "Organisation");
    }
}
