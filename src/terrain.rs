//! Terrain definitions: sets of patches tessellated into one shared [`Mesh`].
//!
//! A terrain is either the built-in maze floor ([`TerrainConfig::default`]) or loaded from a
//! TOML file:
//!
//! ```toml
//! [options]
//! depth = 2
//! smooth = false
//!
//! [[patch]]
//! name = "hill"
//! points = [
//!     [[0.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 1.0], [2.0, 0.0, 0.0, 1.0], [3.0, 0.0, 0.0, 1.0]],
//!     [[0.0, 0.0, 1.0, 1.0], [1.0, 2.0, 1.0, 1.0], [2.0, 2.0, 1.0, 1.0], [3.0, 0.0, 1.0, 1.0]],
//!     [[0.0, 0.0, 2.0, 1.0], [1.0, 2.0, 2.0, 1.0], [2.0, 2.0, 2.0, 1.0], [3.0, 0.0, 2.0, 1.0]],
//!     [[0.0, 0.0, 3.0, 1.0], [1.0, 0.0, 3.0, 1.0], [2.0, 0.0, 3.0, 1.0], [3.0, 0.0, 3.0, 1.0]],
//! ]
//! ```
//!
//! `texture` may be given per patch as a 2 × 2 grid of `[u, v]` pairs and defaults to the
//! unit square.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{Patch, ShapeError, TexturePatch};
use crate::mesh::{Mesh, MeshRange};
use crate::subdivide::SubdivisionOptions;

/// Errors raised while loading or tessellating a terrain.
#[derive(Debug, Error)]
pub enum TerrainError {
    /// The terrain file couldn't be read
    #[error("failed to read terrain file {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The terrain file isn't valid TOML or doesn't match the expected layout
    #[error("invalid terrain file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A patch's control points or texture coordinates have the wrong shape
    #[error("patch {patch}: {source}")]
    Shape {
        /// Index of the patch
        patch: usize,
        /// Which dimension is off
        #[source]
        source: ShapeError,
    },

    /// A control point contains a NaN or infinite coordinate
    #[error("patch {patch}: point ({row}, {column}) is not finite")]
    NonFinite {
        /// Index of the patch
        patch: usize,
        /// Row of the point
        row: usize,
        /// Column of the point
        column: usize,
    },

    /// A texture coordinate contains a NaN or infinite component
    #[error("patch {patch}: texture coordinate ({row}, {column}) is not finite")]
    NonFiniteTexture {
        /// Index of the patch
        patch: usize,
        /// Row of the coordinate
        row: usize,
        /// Column of the coordinate
        column: usize,
    },

    /// The terrain doesn't contain a single patch
    #[error("terrain has no patches")]
    Empty,
}

/// Patches and the options they are all subdivided with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Subdivision applied to every patch
    #[serde(default)]
    pub options: SubdivisionOptions,

    /// The terrain's patches in output order
    #[serde(rename = "patch")]
    pub patches: Vec<PatchConfig>,
}

/// Raw, not yet validated patch as found in a terrain file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchConfig {
    /// Optional label, used for logging and exported group names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// 4 × 4 homogeneous control points `[x, y, z, w]`, indexed `[row][column]`
    pub points: Vec<Vec<[f64; 4]>>,

    /// 2 × 2 texture coordinates `[u, v]` of the patch's corners
    #[serde(default = "unit_texture")]
    pub texture: Vec<Vec<[f64; 2]>>,
}

/// Triangles of a whole terrain and the slice each patch occupies.
#[derive(Clone, Debug, PartialEq)]
pub struct Terrain {
    /// Shared vertex buffers of all patches
    pub mesh: Mesh<f64>,

    /// One range per patch, in the configuration's order
    pub ranges: Vec<MeshRange>,
}

fn unit_texture() -> Vec<Vec<[f64; 2]>> {
    vec![vec![[0.0, 0.0], [0.0, 1.0]], vec![[1.0, 0.0], [1.0, 1.0]]]
}

/// Control points of the four floor tiles of the maze.
///
/// Rows run along `z`, columns along `x` and `y` is the height.
const MAZE_FLOOR: [[[[f64; 4]; 4]; 4]; 4] = [
    [
        [[0.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 1.0], [2.0, 1.0, 0.0, 1.0], [3.0, 1.0, 0.0, 1.0]],
        [[0.0, 0.0, 1.0, 1.0], [1.0, 0.0, 1.0, 1.0], [2.0, 1.0, 1.0, 1.0], [3.0, 1.0, 1.0, 1.0]],
        [[0.0, -0.5, 2.0, 1.0], [1.0, -1.0, 2.0, 1.0], [2.0, 0.0, 2.0, 1.0], [3.0, 0.0, 2.0, 1.0]],
        [[0.0, -1.0, 3.0, 1.0], [1.0, -1.0, 3.0, 1.0], [2.0, 0.0, 3.0, 1.0], [3.0, 0.0, 3.0, 1.0]],
    ],
    [
        [[0.0, -1.0, 0.0, 1.0], [1.0, -1.0, 0.0, 1.0], [2.0, 0.0, 0.0, 1.0], [3.0, 0.0, 0.0, 1.0]],
        [[0.0, -1.5, 1.0, 1.0], [1.0, -1.0, 1.0, 1.0], [2.0, 0.0, 1.0, 1.0], [3.0, 0.0, 1.0, 1.0]],
        [[0.0, 0.0, 2.0, 1.0], [1.0, 0.0, 2.0, 1.0], [2.0, 1.0, 2.0, 1.0], [3.0, 1.0, 2.0, 1.0]],
        [[0.0, 0.0, 3.0, 1.0], [1.0, 0.0, 3.0, 1.0], [2.0, 1.0, 3.0, 1.0], [3.0, 1.0, 3.0, 1.0]],
    ],
    [
        [[0.0, 1.0, 0.0, 1.0], [1.0, 1.0, 0.0, 1.0], [2.0, 0.0, 0.0, 1.0], [3.0, 0.0, 0.0, 1.0]],
        [[0.0, 1.0, 1.0, 1.0], [1.0, 1.0, 1.0, 1.0], [2.0, 0.0, 1.0, 1.0], [3.0, 0.0, 1.0, 1.0]],
        [[0.0, 0.0, 2.0, 1.0], [1.0, 0.0, 2.0, 1.0], [2.0, 0.0, 2.0, 1.0], [3.0, -0.5, 2.0, 1.0]],
        [[0.0, 0.0, 3.0, 1.0], [1.0, 0.0, 3.0, 1.0], [2.0, -1.0, 3.0, 1.0], [3.0, -1.0, 3.0, 1.0]],
    ],
    [
        [[0.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 1.0], [2.0, -1.0, 0.0, 1.0], [3.0, -1.0, 0.0, 1.0]],
        [[0.0, 0.0, 1.0, 1.0], [1.0, 0.0, 1.0, 1.0], [2.0, -2.0, 1.0, 1.0], [3.0, -1.5, 1.0, 1.0]],
        [[0.0, 1.0, 2.0, 1.0], [1.0, 1.0, 2.0, 1.0], [2.0, 0.0, 2.0, 1.0], [3.0, 0.0, 2.0, 1.0]],
        [[0.0, 1.0, 3.0, 1.0], [1.0, 1.0, 3.0, 1.0], [2.0, 0.0, 3.0, 1.0], [3.0, 0.0, 3.0, 1.0]],
    ],
];

impl Default for TerrainConfig {
    /// The maze floor: four tiles, subdivided three times with smooth normals.
    fn default() -> Self {
        let patches = MAZE_FLOOR
            .iter()
            .enumerate()
            .map(|(i, tile)| PatchConfig {
                name: Some(format!("floor{}", i + 1)),
                points: tile.iter().map(|row| row.to_vec()).collect(),
                texture: unit_texture(),
            })
            .collect();
        TerrainConfig {
            options: SubdivisionOptions::default(),
            patches,
        }
    }
}

/// Position of the first point with a NaN or infinite component.
fn first_non_finite<const D: usize>(rows: &[Vec<[f64; D]>]) -> Option<(usize, usize)> {
    rows.iter().enumerate().find_map(|(row, points)| {
        points
            .iter()
            .position(|point| point.iter().any(|x| !x.is_finite()))
            .map(|column| (row, column))
    })
}

impl PatchConfig {
    /// Validates the raw grids and converts them into a patch and its texture patch.
    ///
    /// `index` is only used to label errors.
    pub fn build(&self, index: usize) -> Result<(Patch<f64>, TexturePatch<f64>), TerrainError> {
        if let Some((row, column)) = first_non_finite(&self.points) {
            return Err(TerrainError::NonFinite {
                patch: index,
                row,
                column,
            });
        }
        if let Some((row, column)) = first_non_finite(&self.texture) {
            return Err(TerrainError::NonFiniteTexture {
                patch: index,
                row,
                column,
            });
        }

        let shape = |source| TerrainError::Shape {
            patch: index,
            source,
        };
        let patch = Patch::from_rows(&self.points).map_err(shape)?;
        let texture = TexturePatch::from_rows(&self.texture).map_err(shape)?;
        Ok((patch, texture))
    }

    /// Label used in logs and exports.
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("patch{}", index + 1),
        }
    }
}

impl TerrainConfig {
    /// Parses and validates a terrain from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, TerrainError> {
        let config: TerrainConfig = toml::from_str(source)?;
        config.build_patches()?;
        Ok(config)
    }

    /// Reads, parses and validates a terrain file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TerrainError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| TerrainError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded terrain file {}", path.display());
        Self::from_toml_str(&source)
    }

    /// Validates every patch.
    pub fn build_patches(&self) -> Result<Vec<(Patch<f64>, TexturePatch<f64>)>, TerrainError> {
        if self.patches.is_empty() {
            return Err(TerrainError::Empty);
        }
        self.patches
            .iter()
            .enumerate()
            .map(|(i, patch)| patch.build(i))
            .collect()
    }

    /// Subdivides every patch into one shared mesh.
    pub fn tessellate(&self) -> Result<Terrain, TerrainError> {
        let patches = self.build_patches()?;

        let mut mesh = Mesh::new();
        let mut ranges = Vec::with_capacity(patches.len());
        for (i, (patch, texture)) in patches.iter().enumerate() {
            let (range, report) = mesh.subdivide_into(patch, texture, self.options);
            if report.degenerate_normals > 0 {
                warn!(
                    "{} has {} corners without a normal",
                    self.patches[i].label(i),
                    report.degenerate_normals
                );
            }
            ranges.push(range);
        }

        debug!(
            "tessellated {} patches into {} triangles",
            ranges.len(),
            mesh.triangle_count()
        );
        Ok(Terrain { mesh, ranges })
    }
}
