//! Generation stages of the planet pipeline, in execution order: tectonic
//! plates, elevation, erosion, climate, rivers, terrain classification.

pub mod climate;
pub mod elevation;
pub mod erosion;
pub mod plates;
pub mod rivers;
pub mod terrain;
