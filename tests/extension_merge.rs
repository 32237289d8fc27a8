//! Destinations layered through `mta-ext.mtaext`.

mod common;

use common::prelude::*;
use mta_config::descriptor::DestinationConfig;
use mta_config::merge::extension::ExtensionDocument;
use mta_config::{Error, ExtensionOutcome, HeaderConfig, Logger, ResourceRole};

fn extension(fixture: &TestFixture) -> ExtensionDocument {
    serde_yaml::from_str(&fixture.read("mta-ext.mtaext")).unwrap()
}

#[test]
fn test_first_destination_creates_extension_and_resource() {
    let fixture = TestFixture::new().with_mta(descriptors::SERVER_ONLY);
    let mut mta = fixture.engine();

    let outcome = mta
        .add_mta_extension_config(
            "northwind",
            "https://services.odata.org",
            &HeaderConfig::new("apikey", "s3cr3t"),
        )
        .unwrap();
    assert_eq!(outcome, ExtensionOutcome::Created);
    assert!(mta.save().unwrap());

    let ext = extension(&fixture);
    assert_eq!(ext.id, "bookshop-ext");
    assert_eq!(ext.extends, "bookshop");
    assert_eq!(ext.resources[0].name, "bookshop-destination-service");

    let destinations = ext.resources[0].parameters.config.destinations();
    assert_eq!(destinations.len(), 2);
    assert_eq!(destinations[0].name, "ui5");
    assert_eq!(destinations[1].name, "northwind");
    assert_eq!(
        destinations[1].url.as_deref(),
        Some("https://services.odata.org")
    );
    assert_eq!(
        destinations[1].extra.get("URL.headers.apikey"),
        Some(&serde_yaml::Value::String("s3cr3t".to_string()))
    );

    // the base descriptor only gained the destination resource
    let reloaded = fixture.engine();
    let resource = reloaded
        .model()
        .resource(ResourceRole::Destination)
        .unwrap();
    let config: DestinationConfig = resource.config().unwrap();
    assert!(!config.destinations().iter().any(|d| d.name == "northwind"));
}

#[test]
fn test_second_destination_is_appended() {
    let fixture = TestFixture::new().with_mta(descriptors::SERVER_ONLY);
    let mut mta = fixture.engine();
    let header = HeaderConfig::new("apikey", "one");
    mta.add_mta_extension_config("first", "https://first.example.com", &header)
        .unwrap();
    mta.save().unwrap();

    let mut mta = fixture.engine();
    let outcome = mta
        .add_mta_extension_config("second", "https://second.example.com", &header)
        .unwrap();
    assert_eq!(outcome, ExtensionOutcome::Appended);
    assert!(!mta.is_dirty());

    let names: Vec<_> = extension(&fixture).resources[0]
        .parameters
        .config
        .destinations()
        .iter()
        .map(|d| d.name.clone())
        .collect();
    assert_eq!(names, vec!["ui5", "first", "second"]);

    let outcome = mta
        .add_mta_extension_config("second", "https://second.example.com", &header)
        .unwrap();
    assert_eq!(outcome, ExtensionOutcome::AlreadyPresent);
}

#[test]
fn test_invalid_url_is_rejected_before_any_write() {
    let fixture = TestFixture::new().with_mta(descriptors::SERVER_ONLY);
    let mut mta = fixture.engine();

    let result =
        mta.add_mta_extension_config("bad", "not a url", &HeaderConfig::new("apikey", "x"));
    assert!(matches!(result, Err(Error::UrlParse(_))));
    assert!(!mta.is_dirty());
    assert!(!fixture.ext_path().exists());
}

#[test]
fn test_missing_resource_is_reported_through_log() {
    let fixture = TestFixture::new()
        .with_mta(descriptors::SERVER_ONLY)
        .with_file(
            "mta-ext.mtaext",
            "_schema-version: '3.1'\nID: bookshop-ext\nextends: bookshop\nresources:\n- name: someone-else\n",
        );
    testing_logger::setup();
    let mut mta = fixture.engine_with_logger(Logger::global());

    let outcome = mta
        .add_mta_extension_config(
            "northwind",
            "https://services.odata.org",
            &HeaderConfig::new("apikey", "x"),
        )
        .unwrap();
    assert_eq!(outcome, ExtensionOutcome::ResourceMissing);

    testing_logger::validate(|captured| {
        assert!(captured.iter().any(|log| {
            log.level == log::Level::Error
                && log.body.contains("bookshop-destination-service")
        }));
    });
    assert!(!fixture.read("mta-ext.mtaext").contains("northwind"));
}

#[test]
fn test_added_destination_resource_waits_for_save() {
    let fixture = TestFixture::new().with_mta(descriptors::SERVER_ONLY);
    let mut mta = fixture.engine();

    mta.add_mta_extension_config(
        "northwind",
        "https://services.odata.org",
        &HeaderConfig::new("apikey", "x"),
    )
    .unwrap();

    assert!(fixture.ext_path().exists());
    assert!(mta.is_dirty());
    assert!(!fixture
        .read("mta.yaml")
        .contains("bookshop-destination-service"));

    assert!(mta.save().unwrap());
    assert!(fixture
        .read("mta.yaml")
        .contains("bookshop-destination-service"));
}
