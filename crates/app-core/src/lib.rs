pub mod config;
pub mod constants;
pub mod easing;
pub mod mode;
pub mod morph;
pub mod pose;
pub mod star;
pub mod state;
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use config::*;
pub use constants::*;
pub use easing::*;
pub use mode::*;
pub use morph::*;
pub use pose::*;
pub use star::*;
pub use state::*;
