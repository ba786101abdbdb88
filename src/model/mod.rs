//! User-facing study model: areas, links, clusters, constraints, settings.
//!
//! Entities (`Area`, `Link`, `ThermalCluster`, ...) hold a handle to the
//! backend service that persists them, so mutating methods write through
//! immediately. Plain property structs carry the data itself and serialize
//! to the AntaresWeb JSON shape.

pub mod area;
pub mod binding_constraint;
pub mod commons;
pub mod hydro;
pub mod link;
pub mod matrix;
pub mod renewable;
pub mod scenario_builder;
pub mod settings;
pub mod simulation;
pub mod st_storage;
pub mod thermal;
pub mod xpansion;
