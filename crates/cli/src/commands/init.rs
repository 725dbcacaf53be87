//! `promptpack init`: Write a default config file.

use std::path::Path;

use promptpack_config::PackConfig;

pub fn run(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = PackConfig::config_dir();
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {}", config_dir.display());
    }
    write_default(&config_dir.join("config.toml"), force)
}

fn write_default(config_path: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if config_path.exists() && !force {
        println!("Config already exists at: {}", config_path.display());
        println!("Edit it manually or re-run with --force.");
        return Ok(());
    }

    std::fs::write(config_path, PackConfig::default_toml())?;
    println!("Wrote config.toml to: {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_loadable_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        write_default(&path, false).unwrap();
        let loaded = PackConfig::load_from(&path).unwrap();
        assert_eq!(loaded, PackConfig::default());
    }

    #[test]
    fn keeps_existing_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "summary_length = 300\n").unwrap();

        write_default(&path, false).unwrap();
        assert_eq!(PackConfig::load_from(&path).unwrap().summary_length, 300);

        write_default(&path, true).unwrap();
        assert_eq!(PackConfig::load_from(&path).unwrap().summary_length, 500);
    }
}
