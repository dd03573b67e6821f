//! `chatrelay init` — Write a starter configuration file.

use std::path::Path;

use chatrelay_config::AppConfig;

pub async fn run(
    config_path: Option<&Path>,
    print: bool,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let contents = AppConfig::default_toml();

    if print {
        println!("{contents}");
        return Ok(());
    }

    let path = super::config_path(config_path);
    write_config(&path, &contents, force)?;
    println!("✅ Wrote {}", path.display());
    println!("   Edit [models.*] to point at your IRC server, then run `chatrelay check`.");

    Ok(())
}

fn write_config(path: &Path, contents: &str, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )
        .into());
    }

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}
