//! Application layer

pub mod geometry_store;

pub use geometry_store::GeometryStore;
