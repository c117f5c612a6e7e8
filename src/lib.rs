pub mod builder;
pub mod data_loader;
pub mod exif;
pub mod extract;
pub mod fpv;
pub mod io;
pub mod sampling;
pub mod segment;
pub mod telemetry;
pub mod types;
