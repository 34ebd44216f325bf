use std::fs;

use ijdoc::{Format, IntellijModule, IntellijWorkspace};

#[test]
fn test_module_fixture_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/module.iml");
    let content = fs::read_to_string(path)?;

    let module = IntellijModule::parse_file(path)?;
    assert_eq!(module.to_xml_string(Format::Pretty), content.trim_end());

    let folders = module.source_folders();
    assert_eq!(folders.len(), 2);
    assert_eq!(folders[0].url(), Some("file://$MODULE_DIR$/sources"));
    assert!(!folders[0].is_test_source());
    assert!(folders[1].is_test_source());

    let libraries = module.module_libraries();
    assert_eq!(libraries.len(), 1);
    assert_eq!(
        libraries[0].classes_urls(),
        vec!["jar://$MODULE_DIR$/lib/collections.jar!/"]
    );
    assert_eq!(
        libraries[0].sources_urls(),
        vec!["jar://$MODULE_DIR$/lib/collections-sources.jar!/"]
    );

    Ok(())
}

#[test]
fn test_workspace_fixture_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/workspace.xml");
    let content = fs::read_to_string(path)?;

    let workspace = IntellijWorkspace::parse_file(path)?;
    assert_eq!(workspace.to_xml_string(Format::Pretty), content.trim_end());

    let configs = workspace.run_configurations();
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].name(), Some("Run App"));
    assert_eq!(configs[0].config_type(), Some("Application"));
    assert_eq!(configs[0].main_class_full_name(), Some("com.example.App"));
    assert_eq!(configs[0].program_parameters(), Some("--verbose"));
    assert_eq!(configs[0].vm_parameters(), Some("-Xmx256m"));
    assert_eq!(configs[0].module_name(), Some("app"));

    Ok(())
}

#[test]
fn test_parse_file_missing_file_is_an_io_error() {
    let err = IntellijModule::parse_file("/nonexistent/module.iml").unwrap_err();
    assert!(matches!(err.kind(), ijdoc::ErrorKind::Io { .. }));
}
