use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser;
use kiss3d::window::Window;
use tracing::{error, info};

use solar_orrery::config::{CliArgs, Config};
use solar_orrery::error::StartupError;
use solar_orrery::gui::Simulation;
use solar_orrery::logging;
use solar_orrery::model::{Driver, SimulationState, SolarSystem};

fn main() {
    let args = CliArgs::parse();

    let config = Config::from_args(&args);
    let level = match (&args.log_level, &config) {
        (Some(level), _) => level.clone(),
        (None, Ok(config)) => config.debug.log_level.clone(),
        (None, Err(_)) => logging::DEFAULT_FILTER.to_owned(),
    };
    logging::init_logging(&level);

    let config = match config.map_err(StartupError::from).and_then(check_textures) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    info!(?config, "Starting up");

    let mut window = Window::new_with_size(
        &config.window.title,
        config.window.width,
        config.window.height,
    );
    window.set_framerate_limit(Some(60));

    // The simulation clock reads zero here, before the bodies are built
    let start = Instant::now();
    let state = SimulationState::with_settings(
        0.0,
        config.animation.initial_speed,
        config.animation.speed_step,
        config.animation.start_playing,
    );
    let system = SolarSystem::sun_earth_moon(&config.textures, config.mesh.angular_step);

    let simulation = Simulation::new(Driver::new(system, state), start);
    window.render_loop(simulation);
}

// The texture loader panics on a missing file, so check up front.
fn check_textures(config: Config) -> Result<Config, StartupError> {
    for path in config.textures.paths() {
        if !Path::new(path).is_file() {
            return Err(StartupError::MissingTexture(path.into()));
        }
    }
    Ok(config)
}
