//! Export of a material set as four PNG files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GenerateError;
use crate::maps::{MapKind, MaterialMapSet};
use crate::png::{write_map_to_vec_with_hash, PngConfig};

/// Default file name prefix.
pub const DEFAULT_PREFIX: &str = "Stone";

/// `{prefix}_{timestamp}_{Label}.png`, e.g. `Stone_1700000000_Albedo.png`.
pub fn map_file_name(prefix: &str, timestamp: u64, kind: MapKind) -> String {
    format!("{}_{}_{}.png", prefix, timestamp, kind.file_label())
}

/// One written file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedMap {
    pub kind: MapKind,
    pub path: PathBuf,
    /// BLAKE3 hash of the PNG bytes.
    pub hash: String,
    pub size_bytes: u64,
}

/// Files written by [`save_material_set`], in [`MapKind::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportManifest {
    pub files: Vec<ExportedMap>,
}

impl ExportManifest {
    pub fn get(&self, kind: MapKind) -> Option<&ExportedMap> {
        self.files.iter().find(|f| f.kind == kind)
    }
}

/// Encode every map and write it into `dir`, creating the directory if needed.
///
/// All four maps are encoded before any file is written, so an encoding
/// failure leaves the directory untouched.
pub fn save_material_set(
    set: &MaterialMapSet,
    dir: &Path,
    prefix: &str,
    timestamp: u64,
    config: &PngConfig,
) -> Result<ExportManifest, GenerateError> {
    let mut encoded = Vec::with_capacity(MapKind::ALL.len());
    for kind in MapKind::ALL {
        let (bytes, hash) = write_map_to_vec_with_hash(set.map(kind), config)?;
        encoded.push((kind, bytes, hash));
    }

    fs::create_dir_all(dir)?;

    let mut manifest = ExportManifest::default();
    for (kind, bytes, hash) in encoded {
        let path = dir.join(map_file_name(prefix, timestamp, kind));
        fs::write(&path, &bytes)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote map");
        manifest.files.push(ExportedMap {
            kind,
            path,
            hash,
            size_bytes: bytes.len() as u64,
        });
    }
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(
            map_file_name("Stone", 1700000000, MapKind::Albedo),
            "Stone_1700000000_Albedo.png"
        );
        assert_eq!(
            map_file_name("Granite", 7, MapKind::Roughness),
            "Granite_7_Roughness.png"
        );
    }
}
