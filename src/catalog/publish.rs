//! Reading and writing the published channel catalog

use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::errors::AppResult;
use crate::models::Channel;

/// Serialize channels as a JSON array indented with four spaces
pub fn render_catalog(channels: &[Channel]) -> AppResult<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    channels.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Write the catalog to `path`, creating missing parent directories
pub async fn write_catalog(path: &Path, channels: &[Channel]) -> AppResult<()> {
    let rendered = render_catalog(channels)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, rendered).await?;
    Ok(())
}

pub async fn read_catalog(path: &Path) -> AppResult<Vec<Channel>> {
    let contents = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&contents)?)
}
