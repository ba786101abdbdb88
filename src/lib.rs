//! Client library for Antares studies: describe a study's topology and
//! settings, then persist it to a local study directory or to an AntaresWeb
//! server. No solver lives here; simulations run as an external executable
//! or a remote launcher job.

pub mod config;
pub mod model;
pub mod service;
pub mod study;
pub mod utils;

pub use config::{ApiConf, LocalConfiguration};
pub use model::commons::{StudyVersion, STUDY_VERSION_8_8, STUDY_VERSION_9_2};
pub use study::{
    create_study_api, create_study_local, create_variant_api, read_study_api, read_study_local,
    Study,
};
pub use utils::error::{Result, StudyError};
