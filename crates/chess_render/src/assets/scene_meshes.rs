//! Mesh handles for everything the scene draws
//!
//! Models are loaded once at start-up and uploaded to the backend. A missing
//! or malformed file is not fatal: the procedural cube stands in for it and a
//! warning is logged.

use crate::assets::obj_loader::ObjLoader;
use crate::board::Piece;
use crate::core::config::AssetConfig;
use crate::render::api::{BackendResult, MeshHandle, RenderBackend};
use crate::render::primitives::Mesh;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Board model path relative to the asset root
pub const BOARD_MODEL: &str = "objects/stone_board/model.obj";

/// Marker cube model path relative to the asset root
pub const CUBE_MODEL: &str = "objects/cube.obj";

/// Piece model path relative to the asset root
pub fn piece_model(piece: Piece) -> PathBuf {
    Path::new("objects/stone_chess").join(piece.id()).join("modelf.obj")
}

/// Uploaded meshes for the board, the marker cube and the twelve pieces
#[derive(Debug, Clone)]
pub struct SceneMeshes {
    /// Board mesh
    pub board: MeshHandle,
    /// Marker cube mesh
    pub cube: MeshHandle,
    pieces: HashMap<Piece, MeshHandle>,
}

impl SceneMeshes {
    /// Mesh for a piece
    pub fn piece(&self, piece: Piece) -> Option<MeshHandle> {
        self.pieces.get(&piece).copied()
    }

    /// Number of piece meshes
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// Upload one procedural cube and use it for every model
    pub fn procedural(backend: &mut dyn RenderBackend) -> BackendResult<Self> {
        let cube = backend.upload_mesh(&Mesh::cube())?;
        Ok(Self {
            board: cube,
            cube,
            pieces: Piece::all().map(|piece| (piece, cube)).collect(),
        })
    }
}

/// Load and upload every scene model under `assets.root`
pub fn load_scene_meshes(
    backend: &mut dyn RenderBackend,
    assets: &AssetConfig,
) -> BackendResult<SceneMeshes> {
    let root = Path::new(&assets.root);
    let mut fallback = None;

    let mut load = |backend: &mut dyn RenderBackend, relative: &Path| -> BackendResult<MeshHandle> {
        let path = root.join(relative);
        match ObjLoader::load_obj(&path) {
            Ok(mesh) => backend.upload_mesh(&mesh),
            Err(e) => {
                log::warn!("Using fallback cube for {}: {}", path.display(), e);
                match fallback {
                    Some(handle) => Ok(handle),
                    None => {
                        let handle = backend.upload_mesh(&Mesh::cube())?;
                        fallback = Some(handle);
                        Ok(handle)
                    }
                }
            }
        }
    };

    let board = load(backend, Path::new(BOARD_MODEL))?;
    let cube = load(backend, Path::new(CUBE_MODEL))?;
    let mut pieces = HashMap::with_capacity(12);
    for piece in Piece::all() {
        pieces.insert(piece, load(backend, &piece_model(piece))?);
    }

    log::info!("Loaded scene meshes from {}", root.display());
    Ok(SceneMeshes { board, cube, pieces })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::RecordingBackend;

    #[test]
    fn missing_assets_share_one_fallback_cube() {
        let mut backend = RecordingBackend::new();
        let assets = AssetConfig { root: "no/such/asset/root".to_string() };
        let meshes = load_scene_meshes(&mut backend, &assets).unwrap();

        assert_eq!(backend.mesh_count(), 1);
        assert_eq!(meshes.piece_count(), 12);
        assert_eq!(meshes.board, meshes.cube);
    }

    #[test]
    fn piece_paths_use_identifiers() {
        let piece: Piece = "knight_black".parse().unwrap();
        assert_eq!(
            piece_model(piece),
            PathBuf::from("objects/stone_chess/knight_black/modelf.obj")
        );
    }

    #[test]
    fn procedural_meshes_cover_every_piece() {
        let mut backend = RecordingBackend::new();
        let meshes = SceneMeshes::procedural(&mut backend).unwrap();
        assert!(Piece::all().all(|p| meshes.piece(p).is_some()));
    }
}
