mod camera_directory;

pub use camera_directory::*;
