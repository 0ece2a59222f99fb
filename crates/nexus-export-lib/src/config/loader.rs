use super::Config;
use crate::error::NexusExportError;
use config::Config as ConfigBuilder;

pub fn load_config(config_path: &str) -> Result<Config, NexusExportError> {
    let config_builder = ConfigBuilder::builder()
        .add_source(config::File::with_name(config_path))
        .build()?;

    config_builder.try_deserialize().map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::FailurePolicy;
    use std::path::PathBuf;

    #[test]
    fn test_load_yaml_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nexus-export.yaml");
        std::fs::write(
            &path,
            "username: deploy\noutput_dir: ./mirror\nverify: false\non_asset_error: skip\n",
        )
        .unwrap();

        let config = load_config(path.to_str().unwrap()).unwrap();
        assert_eq!(config.username.as_deref(), Some("deploy"));
        assert_eq!(config.output_dir, Some(PathBuf::from("./mirror")));
        assert_eq!(config.verify, Some(false));
        assert_eq!(config.mirror, None);
        assert_eq!(config.on_asset_error, Some(FailurePolicy::Skip));
    }

    #[test]
    fn test_load_toml_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nexus-export.toml");
        std::fs::write(&path, "mirror = true\ninsecure = true\n").unwrap();

        let config = load_config(path.to_str().unwrap()).unwrap();
        assert_eq!(config.mirror, Some(true));
        assert_eq!(config.insecure, Some(true));
        assert_eq!(config.on_asset_error, None);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nexus-export.yaml");
        std::fs::write(&path, "password: hunter2\n").unwrap();

        assert!(matches!(
            load_config(path.to_str().unwrap()),
            Err(NexusExportError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("absent.yaml");
        assert!(load_config(path.to_str().unwrap()).is_err());
    }
}
