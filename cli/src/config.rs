use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::anyhow;
use gqlpen_client::ClientConfig;
use gqlpen_core::Keymap;

use crate::args::LogLevel;

/// Contents of `gqlpen.toml`. A missing file means every default.
#[derive(Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Directory holding the saved playground state, the platform data directory by default
    pub storage_dir: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub client: ClientConfig,
    pub keybindings: Keymap,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(error) => return Err(anyhow!("could not read {}: {error}", path.display())),
        };

        toml::from_str(&contents).map_err(|error| anyhow!("could not parse {}:\n{error}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gqlpen_core::KeyPress;

    use super::*;

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::load(&dir.path().join("gqlpen.toml")).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gqlpen.toml");
        fs::write(
            &path,
            indoc::indoc! {r#"
                storage_dir = "/var/lib/gqlpen"
                log_level = "debug"

                [client]
                timeout = "10s"

                [keybindings]
                toggle_sidebar = "ctrl+shift+b"
            "#},
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.storage_dir.as_deref(), Some(Path::new("/var/lib/gqlpen")));
        assert_eq!(config.log_level, Some(LogLevel::Debug));
        assert_eq!(config.client.timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.keybindings.toggle_sidebar, KeyPress::new("b").ctrl().shift());
        assert_eq!(config.keybindings.save, Keymap::default().save);
    }

    #[test]
    fn unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gqlpen.toml");
        fs::write(&path, "endpoint = \"http://localhost:4000\"").unwrap();

        let error = Config::load(&path).unwrap_err().to_string();

        assert!(error.contains("unknown field `endpoint`"), "{error}");
    }
}
