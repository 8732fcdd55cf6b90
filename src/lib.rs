//! Clay Colony - worker ants harvesting clay packs for the castle

pub mod behavior;
pub mod core;
pub mod entity;
pub mod simulation;
pub mod spatial;
