// Scene constants. Lengths are in km and get multiplied by the display scale
// when a body is built; several values are exaggerated by hand so that the
// whole scene fits on screen.

// radius: km
pub const SUN_RADIUS: f32 = 696_340.0;
pub const EARTH_RADIUS: f32 = 6_371.0 * 30.0;
pub const MOON_RADIUS: f32 = 1_737.4 * 60.0;
pub const BACKDROP_RADIUS: f32 = SUN_RADIUS * 100.0;

// distance from parent: km
pub const EARTH_TO_SUN: f32 = 147.72e6 * 0.01;
pub const MOON_TO_EARTH: f32 = 384_400.0 * 1.10;

// orbital inclination wrt parent: degrees
pub const EARTH_ORBITAL_INCLINATION: f32 = 23.4;
pub const MOON_ORBITAL_INCLINATION: f32 = 5.15;

// axial tilt wrt parent: degrees
pub const EARTH_AXIAL_TILT: f32 = 23.4;
pub const MOON_AXIAL_TILT: f32 = 1.5;

// axial rotation rates: rad/s of simulation time
pub const SUN_ROTATION_RATE: f32 = 1.997;
pub const EARTH_ROTATION_RATE: f32 = 0.47 * 60.0;
pub const MOON_ROTATION_RATE: f32 = 0.004639 * 600.0;

// orbital revolution rates: rad/s of simulation time
pub const EARTH_ORBIT_RATE: f32 = 30.0 / 10.0;
pub const MOON_ORBIT_RATE: f32 = 1.022 * 10.0;

/// Multiplier from km to scene units. The sun ends up with unit diameter.
pub const DISPLAY_SCALE: f32 = 0.5 / SUN_RADIUS;
