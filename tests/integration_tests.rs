use addr_verify::config::TomlConfig;
use addr_verify::{AddressPipeline, AddressResult, BatchEngine, LocalStorage, VerifyError};
use httpmock::prelude::*;
use tempfile::TempDir;

const NORMALIZED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<AddressValidateResponse><Address ID="0"><Address1></Address1><Address2>123 MAIN ST</Address2><City>SPRINGFIELD</City><State>IL</State><Zip5>62704</Zip5><Zip4>3511</Zip4><DeliveryPoint>23</DeliveryPoint><CarrierRoute>C001</CarrierRoute></Address></AddressValidateResponse>"#;

fn write_config(temp_dir: &TempDir, base_url: &str, concurrency: usize, extra: &str) -> TomlConfig {
    let root = temp_dir.path().to_str().unwrap().replace('\\', "/");
    let content = format!(
        r#"
[service]
base_url = "{base_url}"
user_id = "213TEST"

[dispatch]
concurrency_limit = {concurrency}
report_interval = 2
pacing_delay_ms = 1

[input]
path = "{root}/addresses.csv"

[output]
directory = "{root}/out"
file = "results.csv"
{extra}
"#
    );
    let path = temp_dir.path().join("addr-verify.toml");
    std::fs::write(&path, content).unwrap();
    TomlConfig::from_file(&path).unwrap()
}

fn read_rows(temp_dir: &TempDir) -> Vec<String> {
    let output = std::fs::read_to_string(temp_dir.path().join("out/results.csv")).unwrap();
    output.lines().map(str::to_string).collect()
}

#[tokio::test]
async fn test_round_trip_springfield() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("addresses.csv"),
        "123 Main St,,Springfield,IL,62704,\n",
    )?;

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/ShippingAPI.dll")
            .query_param("API", "Verify")
            .query_param_exists("XML");
        then.status(200)
            .header("Content-Type", "text/xml")
            .body(NORMALIZED);
    });

    let config = write_config(
        &temp_dir,
        &server.url("/ShippingAPI.dll?API=Verify&XML="),
        100,
        "",
    );
    let pipeline = AddressPipeline::new(LocalStorage::new(""), config)?;

    let output_path = BatchEngine::new(pipeline).run().await?;

    api_mock.assert();
    assert!(output_path.ends_with("out/results.csv"));
    assert_eq!(read_rows(&temp_dir), vec![",123 MAIN ST,SPRINGFIELD,IL,62704,3511"]);

    let parsed = addr_verify::service::wire::parse_response(NORMALIZED)?.unwrap();
    assert_eq!(
        parsed,
        AddressResult {
            address1: String::new(),
            address2: "123 MAIN ST".to_string(),
            city: "SPRINGFIELD".to_string(),
            state: "IL".to_string(),
            zip5: "62704".to_string(),
            zip4: "3511".to_string(),
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_five_addresses_two_slots() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let rows: String = (1..=5)
        .map(|i| format!(",{} Main St,Springfield,IL,62704,\n", i))
        .collect();
    std::fs::write(temp_dir.path().join("addresses.csv"), rows)?;

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/ShippingAPI.dll");
        then.status(200)
            .delay(std::time::Duration::from_millis(20))
            .body(NORMALIZED);
    });

    let config = write_config(
        &temp_dir,
        &server.url("/ShippingAPI.dll?API=Verify&XML="),
        2,
        "summary = true",
    );
    let pipeline = AddressPipeline::new(LocalStorage::new(""), config)?;
    BatchEngine::new(pipeline).run().await?;

    api_mock.assert_hits(5);
    assert_eq!(read_rows(&temp_dir).len(), 5);

    let summary: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(
        temp_dir.path().join("out/summary.json"),
    )?)?;
    assert_eq!(summary["submitted"], 5);
    assert_eq!(summary["written"], 5);
    Ok(())
}

#[tokio::test]
async fn test_identical_runs_give_same_rows() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let rows: String = (1..=12)
        .map(|i| format!(",{} Oak Ave,Peoria,IL,61602,\n", i))
        .collect();
    std::fs::write(temp_dir.path().join("addresses.csv"), rows)?;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ShippingAPI.dll");
        then.status(200).body(NORMALIZED);
    });
    let base_url = server.url("/ShippingAPI.dll?API=Verify&XML=");

    let mut runs = Vec::new();
    for _ in 0..2 {
        let config = write_config(&temp_dir, &base_url, 4, "");
        let pipeline = AddressPipeline::new(LocalStorage::new(""), config)?;
        BatchEngine::new(pipeline).run().await?;
        let mut rows = read_rows(&temp_dir);
        rows.sort();
        runs.push(rows);
    }

    assert_eq!(runs[0].len(), 12);
    assert_eq!(runs[0], runs[1]);
    Ok(())
}

#[tokio::test]
async fn test_failed_requests_leave_empty_output() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("addresses.csv"),
        ",1 Main St,Springfield,IL,62704,\n,2 Main St,Springfield,IL,62704,\n",
    )?;

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/ShippingAPI.dll");
        then.status(500);
    });

    let config = write_config(
        &temp_dir,
        &server.url("/ShippingAPI.dll?API=Verify&XML="),
        4,
        "discards = true",
    );
    let pipeline = AddressPipeline::new(LocalStorage::new(""), config)?;

    let result = BatchEngine::new(pipeline).run().await;

    assert!(result.is_ok());
    api_mock.assert_hits(2);
    assert!(read_rows(&temp_dir).is_empty());
    let discards = std::fs::read_to_string(temp_dir.path().join("out/discarded.csv"))?;
    assert_eq!(discards.lines().count(), 3);
    Ok(())
}

#[tokio::test]
async fn test_service_error_body_is_dropped() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("addresses.csv"),
        ",1 Main St,Springfield,IL,62704,\n",
    )?;

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ShippingAPI.dll");
        then.status(200).body(
            "<AddressValidateResponse><Address ID=\"0\"><Error><Number>-2147219401</Number><Description>Address Not Found.</Description></Error></Address></AddressValidateResponse>",
        );
    });

    let config = write_config(
        &temp_dir,
        &server.url("/ShippingAPI.dll?API=Verify&XML="),
        4,
        "",
    );
    let pipeline = AddressPipeline::new(LocalStorage::new(""), config)?;
    BatchEngine::new(pipeline).run().await?;

    assert!(read_rows(&temp_dir).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_empty_input_writes_empty_output() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("addresses.csv"), "")?;

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/ShippingAPI.dll");
        then.status(200).body(NORMALIZED);
    });

    let config = write_config(
        &temp_dir,
        &server.url("/ShippingAPI.dll?API=Verify&XML="),
        4,
        "",
    );
    let pipeline = AddressPipeline::new(LocalStorage::new(""), config)?;
    BatchEngine::new(pipeline).run().await?;

    api_mock.assert_hits(0);
    assert!(read_rows(&temp_dir).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_input_fails_the_batch() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(&temp_dir, "http://127.0.0.1:1/verify?XML=", 4, "");
    let pipeline = AddressPipeline::new(LocalStorage::new(""), config).unwrap();

    let result = BatchEngine::new(pipeline).run().await;

    assert!(matches!(result, Err(VerifyError::IoError(_))));
}
