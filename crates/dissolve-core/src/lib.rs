pub mod audio;
pub mod color;
pub mod constants;
pub mod controls;
pub mod effects;
pub mod error;
pub mod fractal;
pub mod frame;
pub mod hand;
pub mod phase;
pub mod scene;
pub mod shader;
pub mod trails;

pub use audio::*;
pub use color::*;
pub use constants::*;
pub use controls::*;
pub use effects::*;
pub use error::*;
pub use fractal::*;
pub use frame::*;
pub use hand::*;
pub use phase::*;
pub use scene::*;
pub use shader::*;
pub use trails::*;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static MELT_WGSL: &str = include_str!("../shaders/melt.wgsl");
