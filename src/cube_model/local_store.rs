use crate::cube_model::{Cube, CubeConfigError, CubeStore};
use std::collections::BTreeMap;

/// In-memory [`CubeStore`] holding already constructed cubes.
#[derive(Clone, Debug, Default)]
pub struct LocalCubeStore {
    cubes: BTreeMap<String, Cube>,
}

impl LocalCubeStore {
    pub fn from_cubes(cubes: impl IntoIterator<Item = Cube>) -> Self {
        let cubes = cubes
            .into_iter()
            .map(|cube| (cube.name.clone(), cube))
            .collect();
        LocalCubeStore { cubes }
    }
}

impl CubeStore for LocalCubeStore {
    fn get_cube(&self, name: &str) -> Result<Cube, CubeConfigError> {
        match self.cubes.get(name) {
            Some(cube) => Ok(cube.clone()),
            None => Err(CubeConfigError::CubeNotFound(name.to_string())),
        }
    }

    fn get_all_cubes(&self) -> Result<BTreeMap<String, Cube>, CubeConfigError> {
        Ok(self.cubes.clone())
    }
}
