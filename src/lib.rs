//! # amenity-finder
//!
//! A command-line client for discovering OpenStreetMap amenities near a
//! coordinate, sorted nearest-first.
//!
//! The application is driven entirely by URL-style paths: `/search` and
//! `/results/:lat/:lon/:radius` are bookmarkable, shareable, and fully
//! reconstruct the session state. Navigating a path updates the active
//! screen and the search parameters; entering the parameterized results
//! path queries the Overpass API, annotates each returned node with its
//! geodesic distance from the center, and renders them in ascending order.
//!
//! ## Features
//!
//! - Path-driven navigation with redirect handling for bare screen paths
//! - Overpass API queries for any `amenity` tag value
//! - Ellipsoidal geodesic distances (WGS84)
//! - Optional device positioning from config or environment
//! - YAML configuration with an `init` subcommand

// Export modules for integration testing
pub mod config;
pub mod controller;
pub mod geo;
pub mod location;
pub mod overpass;
pub mod pipeline;
pub mod render;
pub mod routes;

#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use std::error::Error;
    use std::fs;
    use tempfile::TempDir;

    use crate::config::Config;
    use crate::location::POSITION_ENV_VAR;

    fn cargo_bin() -> Command {
        Command::cargo_bin("amenity-finder").expect("Failed to find amenity-finder binary")
    }

    /// Writes a config whose API endpoint refuses connections, so any
    /// accidental fetch fails fast instead of reaching the network.
    fn write_offline_config(dir: &TempDir) -> std::path::PathBuf {
        let config_path = dir.path().join("amenity-finder.yaml");
        let config = Config {
            api_url: "http://127.0.0.1:9/api/interpreter".to_string(),
            ..Config::default()
        };
        config
            .save_to_file(&config_path)
            .expect("Failed to write test config");
        config_path
    }

    #[test]
    fn test_config_generation() -> Result<(), Box<dyn Error>> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("amenity-finder.yaml");

        // Create a config file with init command
        let mut cmd = cargo_bin();
        cmd.arg("init")
            .current_dir(temp_dir.path())
            .assert()
            .success();

        // Check if config file exists
        assert!(config_path.exists(), "Config file should be created");

        // Read the config file content
        let content = fs::read_to_string(&config_path)?;
        assert!(content.contains("api_url"), "Config should contain api_url");
        assert!(content.contains("amenity"), "Config should contain amenity");
        assert!(
            content.contains("default_radius"),
            "Config should contain default_radius"
        );

        Ok(())
    }

    #[test]
    fn test_init_command_with_force() -> Result<(), Box<dyn Error>> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("amenity-finder.yaml");

        // Create initial config
        let initial_content = "api_url: http://example.com";
        fs::write(&config_path, initial_content)?;

        // Run init command without force (should not overwrite)
        let mut cmd = cargo_bin();
        let output = cmd
            .arg("init")
            .current_dir(temp_dir.path())
            .assert()
            .success();

        let stdout = String::from_utf8(output.get_output().stdout.clone())?;
        assert!(
            stdout.contains("Config file already exists"),
            "Should detect existing config"
        );

        let content = fs::read_to_string(&config_path)?;
        assert_eq!(
            content, initial_content,
            "Content should not be changed without --force"
        );

        // Run init command with force (should overwrite)
        let mut cmd = cargo_bin();
        cmd.arg("init")
            .arg("--force")
            .current_dir(temp_dir.path())
            .assert()
            .success();

        let new_content = fs::read_to_string(&config_path)?;
        assert_ne!(
            new_content, initial_content,
            "Content should be changed with --force"
        );
        assert!(
            new_content.contains("default_radius"),
            "New config should contain default_radius"
        );

        Ok(())
    }

    #[test]
    fn test_missing_config_error() -> Result<(), Box<dyn Error>> {
        let temp_dir = TempDir::new()?;
        let nonexistent_path = temp_dir.path().join("does_not_exist.yaml");

        let mut cmd = cargo_bin();
        cmd.arg("open")
            .arg("/")
            .arg("--config")
            .arg(&nonexistent_path)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Config file not found"));

        Ok(())
    }

    #[test]
    fn test_open_home() -> Result<(), Box<dyn Error>> {
        let temp_dir = TempDir::new()?;
        let config_path = write_offline_config(&temp_dir);

        let mut cmd = cargo_bin();
        cmd.arg("open")
            .arg("/")
            .arg("--config")
            .arg(&config_path)
            .assert()
            .success()
            .stdout(predicate::str::contains("Home"));

        Ok(())
    }

    #[test]
    fn test_open_deep_link_prefills_search() -> Result<(), Box<dyn Error>> {
        let temp_dir = TempDir::new()?;
        let config_path = write_offline_config(&temp_dir);

        let mut cmd = cargo_bin();
        cmd.arg("open")
            .arg("/search/47.39/8.51/500")
            .arg("--config")
            .arg(&config_path)
            .assert()
            .success()
            .stdout(predicate::str::contains("Search"))
            .stdout(predicate::str::contains("47.39"))
            .stdout(predicate::str::contains("500 m"));

        Ok(())
    }

    #[test]
    fn test_open_malformed_deep_link_is_silent() -> Result<(), Box<dyn Error>> {
        let temp_dir = TempDir::new()?;
        let config_path = write_offline_config(&temp_dir);

        // Missing radius: no screen settles, nothing renders
        let mut cmd = cargo_bin();
        cmd.arg("open")
            .arg("/search/47.3/8.5/")
            .arg("--config")
            .arg(&config_path)
            .assert()
            .success()
            .stdout(predicate::str::contains("47.3").not());

        Ok(())
    }

    #[test]
    fn test_bare_search_redirects_to_last_parameters() -> Result<(), Box<dyn Error>> {
        let temp_dir = TempDir::new()?;
        let config_path = write_offline_config(&temp_dir);

        // Deep link first, then home, then bare /search: the last stored
        // parameters come back
        let mut cmd = cargo_bin();
        let output = cmd
            .arg("open")
            .arg("/search/47.39/8.51/500")
            .arg("/")
            .arg("/search")
            .arg("--config")
            .arg(&config_path)
            .assert()
            .success()
            .stdout(predicate::str::contains("Home"));

        let stdout = String::from_utf8(output.get_output().stdout.clone())?;
        assert_eq!(
            stdout.matches("47.39").count(),
            2,
            "Parameters should render on the deep link and again after the redirect"
        );

        Ok(())
    }

    #[test]
    fn test_search_command_with_unreachable_api() -> Result<(), Box<dyn Error>> {
        let temp_dir = TempDir::new()?;
        let config_path = write_offline_config(&temp_dir);

        // The query fails (connection refused) but is absorbed; the
        // results screen still renders, empty.
        let mut cmd = cargo_bin();
        cmd.arg("search")
            .arg("--lat")
            .arg("47.3902")
            .arg("--lon")
            .arg("8.5158")
            .arg("--radius")
            .arg("1000")
            .arg("--config")
            .arg(&config_path)
            .assert()
            .success()
            .stdout(predicate::str::contains("Results"))
            .stdout(predicate::str::contains("0 amenities"));

        Ok(())
    }

    #[test]
    fn test_locate_without_position() -> Result<(), Box<dyn Error>> {
        let temp_dir = TempDir::new()?;
        let config_path = write_offline_config(&temp_dir);

        let mut cmd = cargo_bin();
        cmd.arg("locate")
            .arg("--config")
            .arg(&config_path)
            .env_remove(POSITION_ENV_VAR)
            .assert()
            .success()
            .stdout(predicate::str::contains("not available"));

        Ok(())
    }

    #[test]
    fn test_locate_with_position() -> Result<(), Box<dyn Error>> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("amenity-finder.yaml");
        let config = Config {
            api_url: "http://127.0.0.1:9/api/interpreter".to_string(),
            device_position: Some([47.3902, 8.5158]),
            ..Config::default()
        };
        config.save_to_file(&config_path)?;

        let mut cmd = cargo_bin();
        cmd.arg("locate")
            .arg("--config")
            .arg(&config_path)
            .env_remove(POSITION_ENV_VAR)
            .assert()
            .success()
            .stdout(predicate::str::contains("47.3902"))
            .stdout(predicate::str::contains("/search/47.3902/8.5158/1000"));

        Ok(())
    }
}
