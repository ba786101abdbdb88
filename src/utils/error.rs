use thiserror::Error;

/// One variant per operation boundary, each carrying the identity of the
/// entity being acted upon plus the underlying cause.
#[derive(Error, Debug)]
pub enum StudyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Api(String),

    #[error("Action can't be completed, you need to provide an api_token")]
    MissingToken,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Matrix file error: {0}")]
    MatrixFile(#[from] csv::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid study version '{0}'")]
    InvalidVersion(String),

    #[error("Invalid filtering value(s) {invalid:?}, allowed values are: {valid:?}")]
    FilteringValue { invalid: Vec<String>, valid: Vec<String> },

    #[error("Field {field} is not available for study version {version}")]
    FieldNotAvailableForVersion { field: String, version: String },

    #[error("Could not create the study {name}: {cause}")]
    StudyCreation { name: String, cause: String },

    #[error("Could not read the study {id}: {cause}")]
    StudyRead { id: String, cause: String },

    #[error("Could not delete the study {id}: {cause}")]
    StudyDeletion { id: String, cause: String },

    #[error("Could not create a variant of the study {id}: {cause}")]
    StudyVariantCreation { id: String, cause: String },

    #[error("Could not create the area {name}: {cause}")]
    AreaCreation { name: String, cause: String },

    #[error("Could not update properties for area {area_id}: {cause}")]
    AreaPropertiesUpdate { area_id: String, cause: String },

    #[error("Could not update ui for area {area_id}: {cause}")]
    AreaUiUpdate { area_id: String, cause: String },

    #[error("Could not delete the area {area_id}: {cause}")]
    AreaDeletion { area_id: String, cause: String },

    #[error("Could not retrieve the areas from the study: {cause}")]
    AreasRetrieval { cause: String },

    #[error("Could not create the link {area_from} / {area_to}: {cause}")]
    LinkCreation {
        area_from: String,
        area_to: String,
        cause: String,
    },

    #[error("Could not update properties for link {link_id}: {cause}")]
    LinkPropertiesUpdate { link_id: String, cause: String },

    #[error("Could not update ui for link {link_id}: {cause}")]
    LinkUiUpdate { link_id: String, cause: String },

    #[error("Could not delete the link {link_id}: {cause}")]
    LinkDeletion { link_id: String, cause: String },

    #[error("Could not retrieve links from the study: {cause}")]
    LinksRetrieval { cause: String },

    #[error("Could not create the thermal cluster {name} inside area {area_id}: {cause}")]
    ThermalCreation {
        name: String,
        area_id: String,
        cause: String,
    },

    #[error("Could not update properties for thermal cluster {name} inside area {area_id}: {cause}")]
    ThermalPropertiesUpdate {
        name: String,
        area_id: String,
        cause: String,
    },

    #[error("Could not delete the following thermal clusters: {names:?} inside area {area_id}: {cause}")]
    ThermalDeletion {
        area_id: String,
        names: Vec<String>,
        cause: String,
    },

    #[error("Could not create the renewable cluster {name} inside area {area_id}: {cause}")]
    RenewableCreation {
        name: String,
        area_id: String,
        cause: String,
    },

    #[error("Could not update properties for renewable cluster {name} inside area {area_id}: {cause}")]
    RenewablePropertiesUpdate {
        name: String,
        area_id: String,
        cause: String,
    },

    #[error("Could not delete the following renewable clusters: {names:?} inside area {area_id}: {cause}")]
    RenewableDeletion {
        area_id: String,
        names: Vec<String>,
        cause: String,
    },

    #[error("Could not create the short term storage {name} inside area {area_id}: {cause}")]
    STStorageCreation {
        name: String,
        area_id: String,
        cause: String,
    },

    #[error("Could not update properties for short term storage {name} inside area {area_id}: {cause}")]
    STStoragePropertiesUpdate {
        name: String,
        area_id: String,
        cause: String,
    },

    #[error("Could not delete the following short term storages: {names:?} inside area {area_id}: {cause}")]
    STStorageDeletion {
        area_id: String,
        names: Vec<String>,
        cause: String,
    },

    #[error("Could not download {matrix} matrix for storage {name} inside area {area_id}: {cause}")]
    STStorageMatrixDownload {
        area_id: String,
        name: String,
        matrix: String,
        cause: String,
    },

    #[error("Could not upload {matrix} matrix for storage {name} inside area {area_id}: {cause}")]
    STStorageMatrixUpload {
        area_id: String,
        name: String,
        matrix: String,
        cause: String,
    },

    #[error("Could not update hydro properties for area {area_id}: {cause}")]
    HydroPropertiesUpdate { area_id: String, cause: String },

    #[error("Could not read hydro properties for area {area_id}: {cause}")]
    HydroPropertiesRead { area_id: String, cause: String },

    #[error("Could not update the inflow structure for area {area_id}: {cause}")]
    HydroInflowStructureUpdate { area_id: String, cause: String },

    #[error("Could not create the binding constraint {name}: {cause}")]
    BindingConstraintCreation { name: String, cause: String },

    #[error("Could not update properties for binding constraint {name}: {cause}")]
    ConstraintPropertiesUpdate { name: String, cause: String },

    #[error("Could not delete the binding constraint {name}: {cause}")]
    BindingConstraintDeletion { name: String, cause: String },

    #[error("Could not retrieve the binding constraints from the study: {cause}")]
    ConstraintsRetrieval { cause: String },

    #[error("Could not add the following constraint terms: {term_ids:?} inside constraint {name}: {cause}")]
    ConstraintTermAddition {
        name: String,
        term_ids: Vec<String>,
        cause: String,
    },

    #[error("Could not delete the term {term_id} of the binding constraint {constraint_id}: {cause}")]
    ConstraintTermDeletion {
        constraint_id: String,
        term_id: String,
        cause: String,
    },

    #[error("Could not update matrix {matrix} for binding constraint {name}: {cause}")]
    ConstraintMatrixUpdate {
        name: String,
        matrix: String,
        cause: String,
    },

    #[error("Could not download matrix {matrix} for binding constraint {name}: {cause}")]
    ConstraintMatrixDownload {
        name: String,
        matrix: String,
        cause: String,
    },

    #[error("Could not upload the matrix {path}: {cause}")]
    MatrixUpload { path: String, cause: String },

    #[error("Could not download the matrix {path}: {cause}")]
    MatrixDownload { path: String, cause: String },

    #[error("Could not read settings for the study: {cause}")]
    StudySettingsRead { cause: String },

    #[error("Could not update settings for the study: {cause}")]
    StudySettingsUpdate { cause: String },

    #[error("Could not read the scenario builder: {cause}")]
    ScenarioBuilderRead { cause: String },

    #[error("Could not edit the scenario builder: {cause}")]
    ScenarioBuilderEdition { cause: String },

    #[error("The scenario type {0} is not supported")]
    UnsupportedScenarioType(String),

    #[error("The candidate {0} is not well formatted. It should either contain max-investment or (max-units and unit-size)")]
    BadCandidateFormat(String),

    #[error("Could not create the xpansion configuration: {cause}")]
    XpansionConfigurationCreation { cause: String },

    #[error("Could not read the xpansion configuration: {cause}")]
    XpansionConfigurationRead { cause: String },

    #[error("Could not delete the xpansion configuration: {cause}")]
    XpansionConfigurationDeletion { cause: String },

    #[error("Could not create the xpansion candidate {name}: {cause}")]
    XpansionCandidateCreation { name: String, cause: String },

    #[error("Could not edit the xpansion candidate {name}: {cause}")]
    XpansionCandidateEdition { name: String, cause: String },

    #[error("Could not delete the xpansion candidates {names:?}: {cause}")]
    XpansionCandidateDeletion { names: Vec<String>, cause: String },

    #[error("Could not edit the xpansion constraint {name}: {cause}")]
    XpansionConstraintEdition { name: String, cause: String },

    #[error("Could not edit the xpansion settings: {cause}")]
    XpansionSettingsEdition { cause: String },

    #[error("Could not run the simulation for study {name}: {cause}")]
    SimulationRunning { name: String, cause: String },

    #[error("Job {job_id} failed: {cause}")]
    SimulationFailed { job_id: String, cause: String },

    #[error("The requested job {job_id} didn't complete in time ({timeout}s)")]
    SimulationTimeOut { job_id: String, timeout: u64 },

    #[error("Task {task_id} failed")]
    TaskFailed { task_id: String },

    #[error("The requested task {task_id} didn't complete in time ({timeout}s)")]
    TaskTimeOut { task_id: String, timeout: u64 },

    #[error("Invalid ini content in {path}: {cause}")]
    IniFormat { path: String, cause: String },
}

pub type Result<T> = std::result::Result<T, StudyError>;
