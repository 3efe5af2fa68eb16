mod levels;

pub use levels::{LodInfo, select_lod_index, max_view_distance, skip_increment, validate_levels};
