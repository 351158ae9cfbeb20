use rolo_kernel::config::{ConfigError, load_config};
use rolo_kernel::domain::config::{ApiConfig, StoreKind};
use std::io::Write;

#[test]
fn loads_toml_sections_over_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        file,
        r#"
[server]
port = 9000

[app]
debug = true

[directory]
page_size = 5
store = "memory"
"#
    )?;

    let cfg: ApiConfig = load_config(Some(file.path()))?;
    assert_eq!(cfg.server.port, 9000);
    assert!(cfg.app.debug);
    assert_eq!(cfg.directory.page_size, 5);
    assert_eq!(cfg.directory.store, StoreKind::Memory);
    assert_eq!(cfg.database.url, "mem://");
    Ok(())
}

#[test]
fn missing_file_is_an_error() {
    let res: Result<ApiConfig, ConfigError> = load_config(Some("/definitely/not/here.toml"));
    assert!(matches!(res, Err(ConfigError::Config { .. })));
}
