use log::{error, info, warn};

use cube_config::{
    config::CubesConfig, cube_model::local_store::LocalCubeStore, CubeConfigParser, CubeStore,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = CubesConfig::new().map_err(|e| {
        error!("Failed to initialize config: {}", e);
        e
    })?;

    let parser = CubeConfigParser::from_config(&config);
    info!("Reading cubes from {}", parser.config_file_path().display());

    let cubes = parser.construct_cubes().map_err(|e| {
        error!("Failed to construct cubes: {}", e);
        e
    })?;
    info!("XMLA authentication: {}", parser.xmla_authentication());

    let store = LocalCubeStore::from_cubes(cubes);
    let cubes = store.get_all_cubes()?;

    for (name, cube) in &cubes {
        if let Err(e) = cube.source_kind() {
            warn!("Cube {}: {}", name, e);
        }
        if let Err(e) = cube.validate_references() {
            warn!("Cube {}: {}", name, e);
        }
        info!(
            "Cube {} ({}): {} dimension(s)",
            name,
            cube.source,
            cube.dimensions.len()
        );
    }

    let cubes: Vec<_> = cubes.into_values().collect();
    println!("{}", serde_json::to_string_pretty(&cubes)?);

    Ok(())
}
