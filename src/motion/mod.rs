pub mod features;
pub mod gravity;
pub mod types;

pub use features::{FeatureConfig, FeatureExtractor};
pub use gravity::GravityFilter;
pub use types::{FeatureVector, RotationRate, Sample, Vector3};
