//! Orthogonal path search between tiles

pub mod segment;
pub mod validator;

pub use segment::{OrthoPath, Segment};
pub use validator::{ConnectivityConfig, ConnectivityValidator, PathThickness};
