use crate::error::Result;
use crate::map::MapDocument;

use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub fn area_summary(area_m2: f64) -> String {
    format!("Total area of the circles (accounting for overlap): {:.2} km²",
            area_m2/1e6)
}

// The map for radius r is stored next to the requested file as
// "<stem> with <r> meter radius.html".
pub fn output_path(requested: &Path, radius: u32) -> PathBuf {
    let stem = requested.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "map".to_string());
    let name = format!("{} with {} meter radius.html", stem, radius);

    match requested.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

pub fn write_map(doc: &MapDocument, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let html = doc.to_html()?;
    fs::write(path, html)?;

    info!("Stored map to {}", path.display());
    Ok(())
}

pub fn open_in_browser(path: &Path) {
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    if let Err(e) = webbrowser::open(&target.to_string_lossy()) {
        warn!("Unable to open {} in a browser: {}", target.display(), e);
    }
}
