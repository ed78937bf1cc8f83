/// Asset loading.
///
/// Loading reports an explicit outcome: a decoded [`Model`] or an
/// [`AssetError`] naming what failed. Nothing is retried.
use nalgebra::{Point3, Vector3};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::AssetConfig;
use crate::geometry::Mesh;
use crate::model::{Bone, Model, ModelPart, Skeleton};
use crate::stl::{self, StlError};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: StlError,
    },
    #[error("{0} contains no triangles")]
    Empty(String),
}

/// Produces the scene model for a static asset path.
pub trait AssetProvider {
    fn load(&self, path: &str) -> Result<Model, AssetError>;
}

/// Reads STL files from a fixed base directory.
#[derive(Debug, Clone)]
pub struct FileAssetProvider {
    base_dir: PathBuf,
}

impl FileAssetProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl AssetProvider for FileAssetProvider {
    fn load(&self, path: &str) -> Result<Model, AssetError> {
        let full = self.resolve(path);
        let bytes = std::fs::read(&full).map_err(|source| AssetError::Io {
            path: full.clone(),
            source,
        })?;
        let name = full
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model");
        decode_model(name, &bytes)
    }
}

/// Always yields the procedural bunny.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinAssetProvider;

impl AssetProvider for BuiltinAssetProvider {
    fn load(&self, _path: &str) -> Result<Model, AssetError> {
        Ok(builtin_bunny())
    }
}

/// Decode an in-memory STL into a single-part model without bones.
pub fn decode_model(name: &str, bytes: &[u8]) -> Result<Model, AssetError> {
    let mesh = stl::parse_stl(bytes).map_err(|source| AssetError::Decode {
        name: name.to_string(),
        source,
    })?;
    if mesh.is_empty() {
        return Err(AssetError::Empty(name.to_string()));
    }
    Ok(Model::new(name, vec![ModelPart::new(mesh, None)], Skeleton::default()))
}

/// A low-poly bunny built from ellipsoids, facing +X. Ears and tail hang off
/// their own bones so secondary motion has something to move.
pub fn builtin_bunny() -> Model {
    const SEGMENTS: usize = 16;
    const RINGS: usize = 10;

    let skeleton = Skeleton::new(vec![
        Bone::new("root", Point3::origin(), None),
        Bone::new("ear.L", Point3::new(0.4, 1.2, -0.12), Some(0)),
        Bone::new("ear.R", Point3::new(0.4, 1.2, 0.12), Some(0)),
        Bone::new("tail", Point3::new(-0.55, 0.5, 0.0), Some(0)),
    ]);

    let blob = |center: [f32; 3], radii: [f32; 3], segments: usize, rings: usize| {
        Mesh::ellipsoid(Point3::from(center), Vector3::from(radii), segments, rings)
    };

    let mut torso = blob([0.0, 0.4, 0.0], [0.55, 0.45, 0.45], SEGMENTS, RINGS);
    torso.merge(blob([0.45, 0.95, 0.0], [0.32, 0.3, 0.3], SEGMENTS, RINGS));

    let parts = vec![
        ModelPart::new(torso, None),
        ModelPart::new(blob([0.4, 1.45, -0.12], [0.07, 0.28, 0.05], 8, 6), Some(1)),
        ModelPart::new(blob([0.4, 1.45, 0.12], [0.07, 0.28, 0.05], 8, 6), Some(2)),
        ModelPart::new(blob([-0.58, 0.5, 0.0], [0.12, 0.12, 0.12], 8, 6), Some(3)),
    ];

    Model::new("bunny", parts, skeleton)
}

/// Static asset locations joined onto the configured base directory.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetManifest {
    pub model: String,
    pub baked_texture: String,
    pub background: String,
}

impl AssetManifest {
    pub fn from_config(config: &AssetConfig) -> Self {
        let join = |relative: &str| {
            let base = config.base_dir.trim_end_matches('/');
            if base.is_empty() {
                relative.to_string()
            } else {
                format!("{base}/{relative}")
            }
        };
        Self {
            model: join(&config.model),
            baked_texture: join(&config.baked_texture),
            background: join(&config.background),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_bunny_has_rig() {
        let bunny = builtin_bunny();
        assert_eq!(bunny.skeleton.len(), 4);
        assert_eq!(bunny.parts.len(), 4);
        assert!(bunny.triangle_count() > 100);
        for part in &bunny.parts {
            if let Some(bone) = part.bone {
                assert!(bone < bunny.skeleton.len());
            }
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_model("junk", b"not an stl").unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }

    #[test]
    fn test_decode_rejects_empty_mesh() {
        let mut data = vec![0u8; 84];
        data[80..84].copy_from_slice(&0u32.to_le_bytes());
        let err = decode_model("empty", &data).unwrap_err();
        assert!(matches!(err, AssetError::Empty(_)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let provider = FileAssetProvider::new("/nonexistent/bunview");
        let err = provider.load("models/bunny.stl").unwrap_err();
        match err {
            AssetError::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/bunview/models/bunny.stl"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_manifest_joins_base_dir() {
        let manifest = AssetManifest::from_config(&AssetConfig::default());
        assert_eq!(manifest.model, "static/models/bunny.stl");
        assert_eq!(manifest.background, "static/textures/eveningSkyTexture02.png");
    }
}
