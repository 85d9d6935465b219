use crate::common::*;

/// Loads a newline separated list of image paths.
pub async fn load_listing_file(path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read listing file '{}'", path.display()))?;
    let paths: Vec<PathBuf> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect();
    ensure!(
        !paths.is_empty(),
        "no image paths found in '{}'",
        path.display()
    );
    Ok(paths)
}
