use super::document::identity;
use super::{Cube, CubeConfigError, Dimension, Facts};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use serde_yaml::Value;

#[derive(Deserialize)]
struct CubeDocument {
    facts: FactsDocument,
    dimensions: Vec<DimensionEntry>,
}

#[derive(Deserialize)]
struct FactsDocument {
    table_name: String,
    keys: KeysDocument,
    measures: Vec<String>,
}

/// Facts columns and their references are declared as two parallel lists
#[derive(Deserialize)]
struct KeysDocument {
    columns_names: Vec<String>,
    refs: Vec<String>,
}

#[derive(Deserialize)]
struct DimensionEntry {
    dimension: DimensionDocument,
}

#[derive(Deserialize)]
struct DimensionDocument {
    name: String,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
    columns: Option<Vec<ColumnDocument>>,
}

#[derive(Deserialize)]
struct ColumnDocument {
    name: String,
    column_new_name: Option<String>,
}

/// Builds the cubes described by a decoded configuration document.
///
/// A document describes exactly one cube, so the result always has a
/// single element.
pub fn build(document: &Value) -> Result<Vec<Cube>, CubeConfigError> {
    let (name, source) = identity(document)?;

    let cube_document: CubeDocument =
        serde_yaml::from_value(document.clone()).map_err(|e| bad_configuration(e.to_string()))?;

    let facts = build_facts(cube_document.facts)?;
    let dimensions = cube_document
        .dimensions
        .into_iter()
        .map(|entry| build_dimension(entry.dimension))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Built cube {} ({}) with {} dimension(s)",
        name,
        source,
        dimensions.len()
    );

    Ok(vec![Cube {
        name,
        source,
        facts: vec![facts],
        dimensions,
    }])
}

fn build_facts(facts: FactsDocument) -> Result<Facts, CubeConfigError> {
    let KeysDocument {
        columns_names,
        refs,
    } = facts.keys;

    if columns_names.len() != refs.len() {
        return Err(bad_configuration(format!(
            "facts.keys has {} columns_names but {} refs",
            columns_names.len(),
            refs.len()
        )));
    }

    let mut keys = IndexMap::with_capacity(columns_names.len());
    for (column, reference) in columns_names.into_iter().zip(refs) {
        if keys.contains_key(&column) {
            return Err(bad_configuration(format!(
                "facts.keys declares {} more than once",
                column
            )));
        }
        keys.insert(column, reference);
    }

    Ok(Facts {
        table_name: facts.table_name,
        keys,
        measures: facts.measures,
    })
}

fn build_dimension(dimension: DimensionDocument) -> Result<Dimension, CubeConfigError> {
    let mut columns = IndexMap::new();
    for column in dimension.columns.unwrap_or_default() {
        if columns.contains_key(&column.name) {
            return Err(bad_configuration(format!(
                "dimension {} declares column {} more than once",
                dimension.name, column.name
            )));
        }
        let display = column.column_new_name.unwrap_or_else(|| column.name.clone());
        columns.insert(column.name, display);
    }

    let display_name = dimension
        .display_name
        .unwrap_or_else(|| dimension.name.clone());

    Ok(Dimension {
        name: dimension.name,
        display_name,
        columns,
    })
}

fn bad_configuration(reason: String) -> CubeConfigError {
    debug!("Bad cubes configuration: {}", reason);
    CubeConfigError::BadConfiguration(reason)
}
