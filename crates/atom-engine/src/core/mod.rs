pub mod body;
pub mod rng;
pub mod scene;
pub mod simulator;
