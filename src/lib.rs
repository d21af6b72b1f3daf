#![warn(clippy::all, rust_2018_idioms)]

pub mod terrain;

pub use terrain::{ChangeWatcher, GenerationParameters, MeshBuilder, MeshData};
