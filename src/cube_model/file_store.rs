use crate::config::{resolve_base_path, CubesConfig, DEFAULT_CONFIG_FILE_NAME};
use crate::cube_model::{builder, document, locator};
use crate::cube_model::{Cube, CubeConfigError, CubeStore};
use log::{debug, error, info};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Reads cube definitions from the YAML configuration file.
///
/// Every call goes back to the file, nothing is cached. Wrap the result of
/// [`CubeConfigParser::construct_cubes`] in a
/// [`LocalCubeStore`](crate::cube_model::local_store::LocalCubeStore) for
/// repeated lookups.
#[derive(Clone, Debug)]
pub struct CubeConfigParser {
    cube_path: PathBuf,
    file_name: String,
}

impl CubeConfigParser {
    /// `cube_path` defaults to [`resolve_base_path`] when not given.
    pub fn new(cube_path: Option<PathBuf>, file_name: impl Into<String>) -> Self {
        let cube_path = cube_path.unwrap_or_else(resolve_base_path);
        Self {
            cube_path,
            file_name: file_name.into(),
        }
    }

    pub fn from_config(config: &CubesConfig) -> Self {
        Self {
            cube_path: config.base_path(),
            file_name: config.file_name().to_string(),
        }
    }

    pub fn from_env() -> Result<Self, CubeConfigError> {
        let config = CubesConfig::new()?;
        Ok(Self::from_config(&config))
    }

    pub fn config_file_path(&self) -> PathBuf {
        locator::config_file_path(&self.cube_path, &self.file_name)
    }

    pub fn config_file_exists(&self) -> bool {
        locator::exists(&self.config_file_path())
    }

    /// Never fails: a missing file, a malformed document or a non boolean
    /// value all mean no authentication.
    pub fn xmla_authentication(&self) -> bool {
        if !self.config_file_exists() {
            return false;
        }

        match document::load(&self.config_file_path()) {
            Ok(document) => document::xmla_authentication(&document),
            Err(CubeConfigError::ConfigFileNotFound(_)) | Err(CubeConfigError::Decode(_)) => false,
            Err(e) => {
                error!("Failed to read xmla_authentication: {}", e);
                false
            }
        }
    }

    /// Cube name -> source kind
    pub fn get_cubes_names(&self) -> Result<BTreeMap<String, String>, CubeConfigError> {
        let document = document::load(&self.config_file_path())?;
        let (name, source) = document::identity(&document)?;
        Ok(BTreeMap::from([(name, source)]))
    }

    pub fn construct_cubes(&self) -> Result<Vec<Cube>, CubeConfigError> {
        let path = self.config_file_path();
        if !locator::exists(&path) {
            return Err(CubeConfigError::ConfigFileNotFound(path));
        }

        let document = document::load(&path)?;
        let cubes = builder::build(&document)?;
        info!("Constructed {} cube(s) from {}", cubes.len(), path.display());
        Ok(cubes)
    }
}

impl Default for CubeConfigParser {
    fn default() -> Self {
        Self::new(None, DEFAULT_CONFIG_FILE_NAME)
    }
}

impl CubeStore for CubeConfigParser {
    fn get_cube(&self, name: &str) -> Result<Cube, CubeConfigError> {
        self.construct_cubes()?
            .into_iter()
            .find(|cube| cube.name == name)
            .ok_or_else(|| CubeConfigError::CubeNotFound(name.to_string()))
    }

    fn get_all_cubes(&self) -> Result<BTreeMap<String, Cube>, CubeConfigError> {
        let cubes: BTreeMap<String, Cube> = self
            .construct_cubes()?
            .into_iter()
            .map(|cube| (cube.name.clone(), cube))
            .collect();
        debug!("Loaded cubes: {:?}", cubes.keys().collect::<Vec<_>>());
        Ok(cubes)
    }
}
