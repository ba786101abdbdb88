use anyhow::Result;
use httpmock::prelude::*;

use antares_study::model::matrix::Matrix;
use antares_study::model::simulation::{Job, JobStatus};
use antares_study::service::api::create_api_services;
use antares_study::service::AreaMatrixName;
use antares_study::ApiConf;

#[tokio::test]
async fn create_area_hits_the_area_endpoints() -> Result<()> {
    let server = MockServer::start();
    let conf = ApiConf::local(server.base_url());
    let services = create_api_services(&conf, "s1")?;

    let creation = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/studies/s1/areas")
            .json_body(serde_json::json!({"name": "FR", "type": "AREA"}));
        then.status(200).json_body(serde_json::json!({"id": "fr"}));
    });
    let properties_form = server.mock(|when, then| {
        when.method(PUT).path("/api/v1/studies/s1/areas/fr/properties/form");
        then.status(200).json_body(serde_json::json!({}));
    });
    let ui_read = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/studies/s1/areas")
            .query_param("type", "AREA")
            .query_param("ui", "true");
        then.status(200).json_body(serde_json::json!({
            "fr": {"ui": {"x": 12, "y": 34, "color_r": 230, "color_g": 108, "color_b": 44}}
        }));
    });

    let (_, ui) = services.area.create_area("FR", None, None).await?;
    assert_eq!(ui.x, 12);
    assert_eq!(ui.y, 34);
    creation.assert();
    properties_form.assert();
    ui_read.assert();
    Ok(())
}

#[tokio::test]
async fn bearer_token_is_sent_on_every_request() -> Result<()> {
    let server = MockServer::start();
    let conf = ApiConf::new(server.base_url(), "token123");
    let services = create_api_services(&conf, "s1")?;

    let links = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/studies/s1/links")
            .header("authorization", "Bearer token123");
        then.status(200).json_body(serde_json::json!([]));
    });

    assert!(services.link.read_links().await?.is_empty());
    links.assert();
    Ok(())
}

#[tokio::test]
async fn api_errors_carry_the_body_description() -> Result<()> {
    let server = MockServer::start();
    let conf = ApiConf::local(server.base_url());
    let services = create_api_services(&conf, "s1")?;

    server.mock(|when, then| {
        when.method(DELETE).path("/api/v1/studies/s1/areas/fr");
        then.status(404)
            .json_body(serde_json::json!({"description": "Area 'fr' not found"}));
    });

    let err = services.area.delete_area("fr").await.unwrap_err();
    assert!(err.to_string().contains("Area 'fr' not found"), "{err}");
    Ok(())
}

#[tokio::test]
async fn matrices_travel_through_the_raw_endpoint() -> Result<()> {
    let server = MockServer::start();
    let conf = ApiConf::local(server.base_url());
    let services = create_api_services(&conf, "s1")?;

    let download = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/studies/s1/raw")
            .query_param("path", "input/load/series/load_fr");
        then.status(200).json_body(serde_json::json!({
            "data": [[1.0, 2.0], [3.0, 4.0]],
            "index": [0, 1],
            "columns": [0, 1]
        }));
    });
    let upload = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/studies/s1/raw")
            .query_param("path", "input/load/series/load_fr")
            .json_body(serde_json::json!([[1.0, 2.0], [3.0, 4.0]]));
        then.status(200);
    });

    let series = Matrix::from(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    let read = services.area.get_area_matrix("fr", AreaMatrixName::Load).await?;
    assert_eq!(read, series);
    services
        .area
        .set_area_matrix("fr", AreaMatrixName::Load, &series)
        .await?;
    download.assert();
    upload.assert();
    Ok(())
}

#[tokio::test]
async fn completed_jobs_return_without_waiting() -> Result<()> {
    let server = MockServer::start();
    let conf = ApiConf::local(server.base_url());
    let services = create_api_services(&conf, "s1")?;

    server.mock(|when, then| {
        when.method(GET).path("/api/v1/launcher/jobs/j1");
        then.status(200).json_body(serde_json::json!({
            "status": "success",
            "output_id": "20260829-1430eco"
        }));
    });

    let job = Job {
        job_id: "j1".to_string(),
        status: JobStatus::Pending,
        output_id: None,
        parameters: Default::default(),
    };
    let done = services.run.wait_job_completion(&job, 10).await?;
    assert_eq!(done.status, JobStatus::Success);
    assert_eq!(done.output_id.as_deref(), Some("20260829-1430eco"));
    Ok(())
}

#[tokio::test]
async fn failed_jobs_become_a_typed_error() -> Result<()> {
    let server = MockServer::start();
    let conf = ApiConf::local(server.base_url());
    let services = create_api_services(&conf, "s1")?;

    server.mock(|when, then| {
        when.method(GET).path("/api/v1/launcher/jobs/j2");
        then.status(200).json_body(serde_json::json!({"status": "failed"}));
    });

    let job = Job {
        job_id: "j2".to_string(),
        status: JobStatus::Running,
        output_id: None,
        parameters: Default::default(),
    };
    let err = services.run.wait_job_completion(&job, 10).await.unwrap_err();
    assert!(err.to_string().contains("j2"), "{err}");
    Ok(())
}

#[tokio::test]
async fn pending_jobs_time_out_with_a_typed_error() -> Result<()> {
    let server = MockServer::start();
    let conf = ApiConf::local(server.base_url());
    let services = create_api_services(&conf, "s1")?;

    server.mock(|when, then| {
        when.method(GET).path("/api/v1/launcher/jobs/j3");
        then.status(200).json_body(serde_json::json!({"status": "pending"}));
    });

    let job = Job {
        job_id: "j3".to_string(),
        status: JobStatus::Pending,
        output_id: None,
        parameters: Default::default(),
    };
    let err = services.run.wait_job_completion(&job, 0).await.unwrap_err();
    assert!(err.to_string().contains("didn't complete in time"), "{err}");
    Ok(())
}
