use anyhow::Result;

use crate::config::Config;

/// Print the configured survey folders and whether they currently resolve.
pub fn list_folders(config: &Config) -> Result<()> {
    println!("{:<48} STATUS", "FOLDER");
    for folder in &config.survey.folders {
        let status = if folder.is_dir() { "OK" } else { "MISSING" };
        println!("{:<48} {}", folder.display(), status);
    }
    Ok(())
}
