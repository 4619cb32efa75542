use super::CubeConfigError;
use log::debug;
use serde_yaml::Value;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// Decodes the configuration file into a YAML tree.
///
/// The file is closed before returning, whatever the outcome.
pub fn load(path: &Path) -> Result<Value, CubeConfigError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => CubeConfigError::ConfigFileNotFound(path.to_path_buf()),
        _ => CubeConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    debug!("Loading cubes config from {}", path.display());
    let document = serde_yaml::from_reader(BufReader::new(file))?;
    Ok(document)
}

pub fn parse(content: &str) -> Result<Value, CubeConfigError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Whether clients must authenticate against the XMLA endpoint.
///
/// Anything other than a boolean under `xmla_authentication` reads as `false`.
pub fn xmla_authentication(document: &Value) -> bool {
    match document.get("xmla_authentication") {
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            debug!("Ignoring non boolean xmla_authentication: {:?}", other);
            false
        }
        None => false,
    }
}

/// Returns the cube `(name, source)` pair.
pub fn identity(document: &Value) -> Result<(String, String), CubeConfigError> {
    let name = required_scalar(document, "name")?;
    let source = required_scalar(document, "source")?;
    Ok((name, source))
}

/// Numbers and booleans are accepted, `name: 2019` is a valid cube name
fn required_scalar(document: &Value, key: &str) -> Result<String, CubeConfigError> {
    let value = match document.get(key) {
        Some(Value::String(value)) => value.clone(),
        Some(Value::Number(value)) => value.to_string(),
        Some(Value::Bool(value)) => value.to_string(),
        _ => return Err(CubeConfigError::MissingIdentity),
    };

    if value.is_empty() {
        return Err(CubeConfigError::MissingIdentity);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::fs;

    #[rstest]
    #[case::enabled("xmla_authentication: true\nname: sales\n", true)]
    #[case::disabled("xmla_authentication: false\n", false)]
    #[case::absent("name: sales\nsource: csv\n", false)]
    #[case::string_value("xmla_authentication: \"true\"\n", false)]
    #[case::number_value("xmla_authentication: 1\n", false)]
    #[case::not_a_mapping("- xmla_authentication\n", false)]
    fn test_xmla_authentication(#[case] content: &str, #[case] expected: bool) {
        let document = parse(content).unwrap();
        assert_eq!(xmla_authentication(&document), expected);
    }

    #[rstest]
    #[case::string_name("name: labster\nsource: csv\n", "labster")]
    #[case::numeric_name("name: 2019\nsource: csv\n", "2019")]
    #[case::boolean_name("name: true\nsource: csv\n", "true")]
    fn test_identity(#[case] content: &str, #[case] expected_name: &str) {
        let document = parse(content).unwrap();
        let (name, source) = identity(&document).unwrap();
        assert_eq!(name, expected_name);
        assert_eq!(source, "csv");
    }

    #[rstest]
    #[case::missing_name("source: csv\n")]
    #[case::missing_source("name: labster\n")]
    #[case::empty_name("name: ''\nsource: csv\n")]
    #[case::null_name("name: ~\nsource: csv\n")]
    #[case::non_string_source("name: labster\nsource: [csv]\n")]
    fn test_missing_identity(#[case] content: &str) {
        let document = parse(content).unwrap();
        assert!(matches!(
            identity(&document),
            Err(CubeConfigError::MissingIdentity)
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cubes-config.yml");
        assert!(matches!(
            load(&path),
            Err(CubeConfigError::ConfigFileNotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_load_malformed_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cubes-config.yml");
        fs::write(&path, "name: [labster\nsource: csv\n").unwrap();
        assert!(matches!(load(&path), Err(CubeConfigError::Decode(_))));
    }

    #[test]
    fn test_load_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cubes-config.yml");
        fs::write(&path, "name: labster\nsource: csv\n").unwrap();

        let document = load(&path).unwrap();
        assert_eq!(document.get("name").and_then(Value::as_str), Some("labster"));
    }
}
