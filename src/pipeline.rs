pub mod passes;
pub mod renderer;
pub mod shaders;
pub mod vertex;
