use anyhow::{Context, Result};
use std::path::Path;
use wavefront::ReaderOptions;

use crate::utils;

/// Name of the folder scoped options file
const FOLDER_META: &str = "obj";

fn parse(path: &Path) -> Result<ReaderOptions> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read options: {}", path.display()))?;
    let options = toml::from_str(&data)
        .with_context(|| format!("Invalid options: {}", path.display()))?;
    Ok(options)
}

/// Reader options from a file called `<name>.toml` next to the model, alternatively from
/// a folder scoped file named `obj.toml`, or else the defaults
pub(crate) fn load(path: &Path) -> Result<ReaderOptions> {
    let dir = path
        .parent()
        .with_context(|| format!("Path terminates in root or prefix: {}", path.display()))?;

    let candidates = [
        utils::combine_path(dir, utils::file_name(path)?, "toml"),
        utils::combine_path(dir, FOLDER_META, "toml"),
    ];
    for candidate in &candidates {
        if candidate.is_file() {
            log::debug!("Using options from `{}`", candidate.display());
            return parse(candidate);
        }
    }

    Ok(ReaderOptions::default())
}
