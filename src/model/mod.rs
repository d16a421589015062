pub mod body;
pub mod clock;
pub mod driver;
pub mod system;

pub use body::{Body, BodyID, BodyInfo, BodyKind, Kinematics};
pub use clock::SimulationState;
pub use driver::{DrawCall, Driver, FrameReport, RenderBackend};
pub use system::SolarSystem;
