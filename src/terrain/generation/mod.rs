pub mod noise_field;
pub mod curve;
pub mod falloff;
pub mod height;
pub mod color;

pub use noise_field::{NoiseField, generate_noise_map};
pub use curve::{CurveKey, HeightCurve};
pub use falloff::{generate_falloff_map, evaluate_falloff};
pub use height::{HeightField, HeightMap, generate_height_map};
pub use color::{ColorMap, get_color, grayscale_from_height_map, color_map_from_height_map, falloff_color_map};
