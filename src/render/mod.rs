/// Frame buffers.
pub mod backend;
/// SVG markup for the shape layer and whole frames.
pub mod markup;
/// CPU rasterization of evaluated scenes.
pub mod raster;
