//! Tile source reading pre-rendered tiles from a local directory tree.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use super::types::{TileError, TileSource};

/// Reads tiles laid out as `<root>/<z>/<x>/<y>.<extension>`.
///
/// This is the layout produced by most tile seeders and by `wget`-style
/// mirrors of XYZ servers.
#[derive(Debug, Clone)]
pub struct DiskTileSource {
    root: PathBuf,
    extension: String,
    name: String,
}

impl DiskTileSource {
    /// Creates a source reading `.png` tiles under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "png".to_string(),
            name: "Disk".to_string(),
        }
    }

    /// Sets the tile file extension (without the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Sets the name reported in logs.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding a tile.
    pub fn tile_path(&self, x: i32, y: i32, z: u8) -> PathBuf {
        self.root
            .join(z.to_string())
            .join(x.to_string())
            .join(format!("{}.{}", y, self.extension))
    }
}

impl TileSource for DiskTileSource {
    fn get_tile(&self, x: i32, y: i32, z: u8) -> Result<RgbaImage, TileError> {
        if x < 0 || y < 0 {
            return Err(TileError::OutOfRange { x, y, z });
        }
        let path = self.tile_path(x, y, z);
        let bytes = std::fs::read(&path)
            .map_err(|e| TileError::Io(format!("{}: {}", path.display(), e)))?;
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
