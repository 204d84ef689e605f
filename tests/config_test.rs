//! Tests for layered settings

use std::fs;

use rstest::rstest;
use tempfile::TempDir;

use blocktree::config::{Settings, TreeStyle};

#[rstest]
#[case("[print]\nstyle = \"unicode\"\n", TreeStyle::Unicode, true, true)]
#[case("[print]\nshow_ids = false\n", TreeStyle::Plain, false, true)]
#[case("[output]\npretty = false\n", TreeStyle::Plain, true, false)]
fn given_config_file_when_loading_then_fields_applied(
    #[case] content: &str,
    #[case] style: TreeStyle,
    #[case] show_ids: bool,
    #[case] pretty: bool,
) {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("blocktree.toml");
    fs::write(&path, content).unwrap();

    // Act
    let settings = Settings::load_from(None, Some(&path)).unwrap();

    // Assert
    assert_eq!(settings.print.style, style);
    assert_eq!(settings.print.show_ids, show_ids);
    assert_eq!(settings.output.pretty, pretty);
}

#[test]
fn given_effective_settings_when_rendered_as_toml_then_loadable_again() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("blocktree.toml");
    let mut settings = Settings::default();
    settings.print.style = TreeStyle::Unicode;
    settings.output.pretty = false;

    fs::write(&path, settings.to_toml().unwrap()).unwrap();
    let loaded = Settings::load_from(None, Some(&path)).unwrap();

    assert_eq!(loaded, settings);
}
