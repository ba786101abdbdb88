//! Builds a small local study end-to-end: two areas, a thermal cluster, a
//! link, a binding constraint and a tweaked playlist.

use anyhow::Context;
use clap::Parser;

use antares_study::model::binding_constraint::{ConstraintTerm, ConstraintTermData};
use antares_study::model::matrix::Matrix;
use antares_study::model::settings::{GeneralParametersUpdate, StudySettingsUpdate};
use antares_study::model::thermal::ThermalClusterPropertiesUpdate;
use antares_study::utils::logger;
use antares_study::{create_study_local, LocalConfiguration, STUDY_VERSION_8_8};

#[derive(Parser)]
#[command(name = "demo-study")]
#[command(about = "Create a demo Antares study in a local directory")]
struct Args {
    /// Directory the study folder is created in
    #[arg(short, long, default_value = ".")]
    path: String,

    /// Name of the study folder
    #[arg(short, long, default_value = "demo-study")]
    name: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_logger(args.verbose);

    let config = LocalConfiguration::new(&args.path, &args.name);
    let mut study = create_study_local(&args.name, STUDY_VERSION_8_8, &config)
        .await
        .context("creating the study directory")?;

    study.create_area("FR", None, None).await?;
    study.create_area("BE", None, None).await?;

    let fr = study
        .get_area_mut("fr")
        .context("area fr should exist after creation")?;
    fr.create_thermal_cluster("Gas", None).await?;
    fr.set_load(&Matrix::filled(1000.0, 8760, 1)).await?;
    fr.get_thermal_mut("gas")
        .context("cluster gas should exist after creation")?
        .update_properties(ThermalClusterPropertiesUpdate {
            nominal_capacity: Some(900.0),
            ..Default::default()
        })
        .await?;

    study.create_link("FR", "BE", None, None).await?;

    let term = ConstraintTerm::new(ConstraintTermData::link("be", "fr"), Some(1.0), None);
    study
        .create_binding_constraint("max exchange", None, vec![term])
        .await?;

    study
        .update_settings(StudySettingsUpdate {
            general_parameters: Some(GeneralParametersUpdate {
                nb_years: Some(5),
                ..Default::default()
            }),
            ..Default::default()
        })
        .await?;

    println!(
        "study `{}` written to {}",
        study.name(),
        config.study_path().display()
    );
    Ok(())
}
