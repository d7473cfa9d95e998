pub mod audit;
pub mod mesh;
pub mod primitives;
