pub mod constants;
pub mod raster_image;
pub mod region;
pub mod settings;
