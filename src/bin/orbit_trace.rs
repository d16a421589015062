use clap::Parser;
use plotters::prelude::*;
use tracing::info;

use solar_orrery::config::Config;
use solar_orrery::logging;
use solar_orrery::model::SolarSystem;

/// Steps the sun-earth-moon system without a window and plots where the
/// bodies went, seen from above (x-z plane).
#[derive(Debug, Parser)]
struct Args {
    /// Output image
    #[arg(long, default_value = "plots/orbit-trace.png")]
    output: String,
    /// Number of steps to take
    #[arg(long, default_value_t = 2000)]
    steps: usize,
    /// Simulated seconds per step
    #[arg(long, default_value_t = 0.005)]
    dt: f32,
    /// Speed multiplier
    #[arg(long, default_value_t = 1.0)]
    speed: f32,
    /// Sphere sampling step; coarse is fine, we never look at the meshes
    #[arg(long, default_value_t = 0.5)]
    mesh_step: f32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init_logging(logging::DEFAULT_FILTER);

    let mut config = Config::default();
    config.mesh.angular_step = args.mesh_step;
    config.animation.initial_speed = args.speed;
    config.validate()?;

    let mut system = SolarSystem::sun_earth_moon(&config.textures, config.mesh.angular_step);
    let mut tracks: Vec<Vec<(f32, f32)>> = vec![vec![]; system.len()];

    for _ in 0..args.steps {
        for (track, body) in tracks.iter_mut().zip(system.bodies()) {
            let p = body.position();
            track.push((p.x, p.z));
        }
        system.advance_all(args.dt, args.speed);
    }

    // Square window big enough for every animated body
    let extent = system
        .bodies()
        .filter(|b| b.kind.is_animated())
        .map(|b| b.distance_from_parent() + b.radius())
        .sum::<f32>()
        * 1.1;

    draw_plot(&args.output, &system, &tracks, extent)?;
    info!(output = %args.output, steps = args.steps, "Wrote orbit trace");
    Ok(())
}

fn draw_plot(
    name: &str,
    system: &SolarSystem,
    tracks: &[Vec<(f32, f32)>],
    extent: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = std::path::Path::new(name).parent() {
        std::fs::create_dir_all(dir)?;
    }

    let root = BitMapBackend::new(name, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Orbit trace (x-z)", ("sans-serif", 24))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(-extent..extent, -extent..extent)?;

    chart.configure_mesh().draw()?;

    let colors = [RED, BLUE, BLACK, GREEN, MAGENTA];
    for ((body, track), color) in system.bodies().zip(tracks).zip(colors.iter().cycle()) {
        if !body.kind.is_animated() {
            continue;
        }
        let color = *color;
        chart
            .draw_series(LineSeries::new(track.iter().copied(), color))?
            .label(body.info.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
