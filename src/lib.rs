pub mod config;
pub mod mapgen;
pub mod noise;
pub mod world;
