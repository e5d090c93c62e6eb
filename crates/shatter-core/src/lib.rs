pub mod backdrop;
pub mod clock;
pub mod constants;
pub mod easing;
pub mod emitter;
pub mod fragment;
pub mod integrator;
pub mod intensity;
pub mod params;
pub mod population;
pub mod postfx;
pub mod rig;
pub mod simulation;
pub mod viewport;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub use backdrop::*;
pub use clock::*;
pub use constants::*;
pub use easing::*;
pub use emitter::*;
pub use fragment::*;
pub use integrator::*;
pub use intensity::*;
pub use params::*;
pub use population::*;
pub use postfx::*;
pub use rig::*;
pub use simulation::*;
pub use viewport::*;
