pub mod failure_classifier;
pub mod nokhwa_platform;
pub mod nokhwa_stream;
