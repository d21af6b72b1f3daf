// 地形网格生成模块

pub mod color_map;
pub mod error;
pub mod height_field;
pub mod mesh;
pub mod noise;
pub mod params;
pub mod watcher;

pub use color_map::*;
pub use error::*;
pub use height_field::*;
pub use mesh::*;
pub use self::noise::*;
pub use params::*;
pub use watcher::*;
