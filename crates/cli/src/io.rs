//! Writing resolved fonts to disk.

use std::{
    fs::{create_dir_all, write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use ift_client_core::{FontDescriptor, FontInstaller};
use log::info;

/// Installs fonts by writing `<family>.otf` into a directory.
#[derive(Debug, Clone)]
pub struct DirectoryInstaller {
    dir: PathBuf,
    installed: Vec<PathBuf>,
}

impl DirectoryInstaller {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), installed: Vec::new() }
    }

    /// Paths written so far, in installation order.
    pub fn installed(&self) -> &[PathBuf] {
        &self.installed
    }

    pub fn font_path(&self, family: &str) -> PathBuf {
        let file_name: String = family
            .chars()
            .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | ' ') { c } else { '_' })
            .collect();
        self.dir.join(format!("{file_name}.otf"))
    }
}

impl FontInstaller for DirectoryInstaller {
    fn install(&mut self, family: &str, binary: &[u8], descriptor: &FontDescriptor) -> Result<()> {
        create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;
        let path = self.font_path(family);
        write(&path, binary).with_context(|| format!("Failed to write font: {}", path.display()))?;
        info!(
            "Installed '{family}' ({} bytes, weight {}, stretch {}) at {}",
            binary.len(),
            descriptor.weight.as_deref().unwrap_or("auto"),
            descriptor.stretch.as_deref().unwrap_or("auto"),
            path.display()
        );
        self.installed.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_font_path_sanitizes_family() {
        let installer = DirectoryInstaller::new("out");
        assert_eq!(installer.font_path("Roboto IFT Font"), Path::new("out/Roboto IFT Font.otf"));
        assert_eq!(installer.font_path("../evil"), Path::new("out/___evil.otf"));
    }

    #[test]
    fn test_install_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut installer = DirectoryInstaller::new(dir.path().join("fonts"));
        installer.install("Test", b"font", &FontDescriptor::new().weight("400")).unwrap();

        assert_eq!(installer.installed().len(), 1);
        assert_eq!(std::fs::read(&installer.installed()[0]).unwrap(), b"font");
    }
}
