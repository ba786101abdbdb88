use anyhow::Result;
use tempfile::TempDir;

use antares_study::model::binding_constraint::{ConstraintTerm, ConstraintTermData};
use antares_study::model::link::LinkPropertiesUpdate;
use antares_study::model::matrix::Matrix;
use antares_study::model::scenario_builder::ScenarioBuilder;
use antares_study::model::settings::{GeneralParametersUpdate, StudySettingsUpdate};
use antares_study::model::st_storage::STStorageProperties;
use antares_study::model::thermal::ThermalClusterPropertiesUpdate;
use antares_study::{create_study_local, read_study_local, LocalConfiguration, STUDY_VERSION_8_8};

#[tokio::test]
async fn create_then_read_full_topology() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = LocalConfiguration::new(temp_dir.path(), "roundtrip");

    let mut study = create_study_local("roundtrip", STUDY_VERSION_8_8, &config).await?;
    study.create_area("FR", None, None).await?;
    study.create_area("BE", None, None).await?;

    let fr = study.get_area_mut("fr").expect("area fr was created");
    fr.create_thermal_cluster("Gas", None).await?;
    fr.get_thermal_mut("gas")
        .expect("cluster gas was created")
        .update_properties(ThermalClusterPropertiesUpdate {
            nominal_capacity: Some(830.0),
            unit_count: Some(2),
            ..Default::default()
        })
        .await?;
    fr.create_renewable_cluster("Wind Onshore", None).await?;
    fr.create_st_storage("Battery", None).await?;

    study.create_link("FR", "BE", None, None).await?;
    let term = ConstraintTerm::new(ConstraintTermData::link("be", "fr"), Some(2.0), None);
    study
        .create_binding_constraint("max exchange", None, vec![term])
        .await?;

    let read = read_study_local(&config).await?;
    assert_eq!(read.name(), "roundtrip");
    assert_eq!(read.version(), STUDY_VERSION_8_8);
    assert_eq!(read.areas().len(), 2);

    let fr = read.get_area("fr").expect("area fr was persisted");
    let gas = fr.get_thermal("gas").expect("cluster gas was persisted");
    assert_eq!(gas.properties().nominal_capacity, 830.0);
    assert_eq!(gas.properties().unit_count, 2);
    assert_eq!(fr.renewables().len(), 1);
    assert_eq!(fr.st_storages().len(), 1);

    assert!(read.links().contains_key("be / fr"));
    let constraint = read
        .binding_constraints()
        .get("max exchange")
        .expect("constraint was persisted");
    assert_eq!(constraint.terms().len(), 1);
    assert_eq!(constraint.terms()["be%fr"].weight, Some(2.0));
    Ok(())
}

#[tokio::test]
async fn matrices_survive_write_and_read() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = LocalConfiguration::new(temp_dir.path(), "matrices");

    let mut study = create_study_local("matrices", STUDY_VERSION_8_8, &config).await?;
    study.create_area("FR", None, None).await?;

    let series = Matrix::from(vec![vec![1.0, 2.0], vec![3.0, 4.5]]);
    let fr = study.get_area_mut("fr").expect("area fr was created");
    fr.set_load(&series).await?;
    assert_eq!(fr.get_load_matrix().await?, series);

    // A series never written reads back empty.
    assert!(fr.get_wind_matrix().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn link_update_persists_properties() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = LocalConfiguration::new(temp_dir.path(), "links");

    let mut study = create_study_local("links", STUDY_VERSION_8_8, &config).await?;
    study.create_area("FR", None, None).await?;
    study.create_area("BE", None, None).await?;
    study.create_link("FR", "BE", None, None).await?;

    study
        .get_link_mut("be / fr")
        .expect("link was created")
        .update_properties(LinkPropertiesUpdate {
            hurdles_cost: Some(true),
            ..Default::default()
        })
        .await?;

    let read = read_study_local(&config).await?;
    assert!(read.links()["be / fr"].properties().hurdles_cost);
    Ok(())
}

#[tokio::test]
async fn settings_update_merges_into_generaldata() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = LocalConfiguration::new(temp_dir.path(), "settings");

    let mut study = create_study_local("settings", STUDY_VERSION_8_8, &config).await?;
    study
        .update_settings(StudySettingsUpdate {
            general_parameters: Some(GeneralParametersUpdate {
                nb_years: Some(12),
                horizon: Some("2035".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        })
        .await?;

    let read = read_study_local(&config).await?;
    assert_eq!(read.settings().general_parameters.nb_years, 12);
    assert_eq!(read.settings().general_parameters.horizon, "2035");
    Ok(())
}

#[tokio::test]
async fn scenario_builder_roundtrips_through_the_dat_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = LocalConfiguration::new(temp_dir.path(), "scenarios");

    let mut study = create_study_local("scenarios", STUDY_VERSION_8_8, &config).await?;
    study
        .update_settings(StudySettingsUpdate {
            general_parameters: Some(GeneralParametersUpdate {
                nb_years: Some(2),
                ..Default::default()
            }),
            ..Default::default()
        })
        .await?;
    study.create_area("FR", None, None).await?;

    let mut builder = ScenarioBuilder::new(2);
    builder.load_mut("fr").set_year(0, Some(3));
    study.set_scenario_builder(&builder).await?;

    let read = study.get_scenario_builder().await?;
    assert_eq!(read.load["fr"].get_year(0), Some(3));
    assert_eq!(read.load["fr"].get_year(1), None);
    Ok(())
}

#[tokio::test]
async fn create_link_rejects_invalid_ends() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = LocalConfiguration::new(temp_dir.path(), "links");

    let mut study = create_study_local("links", STUDY_VERSION_8_8, &config).await?;
    study.create_area("FR", None, None).await?;

    let err = study.create_link("FR", "FR", None, None).await.unwrap_err();
    assert!(err.to_string().contains("same area"), "{err}");

    let err = study.create_link("FR", "DE", None, None).await.unwrap_err();
    assert!(err.to_string().contains("de does not exist"), "{err}");

    study.create_area("BE", None, None).await?;
    study.create_link("FR", "BE", None, None).await?;
    let err = study.create_link("BE", "FR", None, None).await.unwrap_err();
    assert!(err.to_string().contains("already exists"), "{err}");

    assert_eq!(study.links().len(), 1);
    Ok(())
}

#[tokio::test]
async fn st_storage_9_2_fields_are_rejected_on_an_8_8_study() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = LocalConfiguration::new(temp_dir.path(), "storages");

    let mut study = create_study_local("storages", STUDY_VERSION_8_8, &config).await?;
    study.create_area("FR", None, None).await?;
    let fr = study.get_area_mut("fr").expect("area fr was created");

    let properties = STStorageProperties {
        efficiency_withdrawal: Some(0.9),
        ..Default::default()
    };
    let err = fr.create_st_storage("Battery", Some(properties)).await.unwrap_err();
    assert!(err.to_string().contains("9.2"), "{err}");
    assert!(fr.st_storages().is_empty());
    Ok(())
}
