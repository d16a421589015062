pub mod geometry;
pub mod sphere;
