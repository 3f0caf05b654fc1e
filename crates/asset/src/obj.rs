//! OBJ scene loader: groups become meshes, `mtllib` files become materials.
//!
//! Faces are fan-triangulated and every triangle stores three full vertex
//! copies, so meshes can be uploaded as-is and drawn without an index buffer.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::error::{AssetError, AssetResult};
use crate::material::Material;
use crate::mesh::{Mesh, Vertex};
use crate::mtl::parse_mtl;
use crate::text::{directive_arg, for_each_line, read_floats};

/// Owns the meshes and materials of one loaded OBJ file.
#[derive(Clone, Debug, Default)]
pub struct ObjLoader {
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    loaded: bool,
}

impl ObjLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader and immediately load `path`. On failure the error is
    /// logged and the loader stays unloaded.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let mut loader = Self::new();
        if let Err(e) = loader.load_file(path) {
            log::error!("{e}");
        }
        loader
    }

    /// Load an OBJ file, replacing any previously loaded scene.
    ///
    /// Only the OBJ file itself is fatal: a missing material library is
    /// logged and loading carries on with the default material.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> AssetResult<()> {
        self.unload();

        let path = path.as_ref();
        let file = File::open(path).map_err(|source| AssetError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        self.load_reader(BufReader::new(file), base_dir)?;
        log::info!(
            "Loaded OBJ {}: {} meshes, {} materials",
            path.display(),
            self.meshes.len(),
            self.materials.len()
        );
        Ok(())
    }

    /// Load OBJ text from any reader. `mtllib` names are resolved against
    /// `base_dir`.
    pub fn load_reader<R: BufRead>(&mut self, reader: R, base_dir: &Path) -> AssetResult<()> {
        self.unload();
        self.materials.push(Material::fallback());
        self.meshes.push(Mesh::default());

        let mut state = ParseState::default();
        let parsed = for_each_line(reader, |line| self.parse_line(line, base_dir, &mut state));
        if let Err(e) = parsed {
            self.unload();
            return Err(e);
        }

        self.meshes.retain(|mesh| !mesh.is_empty());
        self.loaded = true;
        Ok(())
    }

    /// Convenience helper to parse an OBJ string literal.
    pub fn load_str(&mut self, contents: &str) -> AssetResult<()> {
        self.load_reader(io::Cursor::new(contents), Path::new("."))
    }

    /// Append the materials of an MTL file to this scene.
    pub fn load_mtl_file(&mut self, path: impl AsRef<Path>) -> AssetResult<()> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| AssetError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let added = parse_mtl(BufReader::new(file), &mut self.materials)?;
        log::debug!("Loaded {} materials from {}", added, path.display());
        Ok(())
    }

    /// Drop every mesh and material and mark the loader unloaded.
    pub fn unload(&mut self) {
        self.meshes.clear();
        self.materials.clear();
        self.loaded = false;
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[inline]
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    #[inline]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Material referenced by `mesh`, if the index is valid.
    pub fn material_of(&self, mesh: &Mesh) -> Option<&Material> {
        self.materials.get(mesh.material_id)
    }

    /// Index of the first material called `name`, or 0 (the default
    /// material) when there is none.
    pub fn find_material(&self, name: &str) -> usize {
        self.materials
            .iter()
            .position(|mat| mat.name == name)
            .unwrap_or(0)
    }

    /// Index of the mesh called `name`, creating an empty one if needed.
    /// With duplicate names the last match wins.
    pub fn get_mesh(&mut self, name: &str) -> usize {
        match self.meshes.iter().rposition(|mesh| mesh.name == name) {
            Some(id) => id,
            None => {
                self.meshes.push(Mesh::new(name));
                self.meshes.len() - 1
            }
        }
    }

    fn parse_line(&mut self, line: &str, base_dir: &Path, state: &mut ParseState) {
        let line = line.trim_start();
        let bytes = line.as_bytes();
        match (bytes.first(), bytes.get(1)) {
            (None, _) | (Some(b'#'), _) => {}
            (Some(b'v'), Some(b' ')) => {
                let mut p = [0.0; 3];
                read_floats(line[2..].split_whitespace(), &mut p);
                state.positions.push(p);
            }
            (Some(b'v'), Some(b'n')) => {
                let mut n = [0.0; 3];
                read_floats(tail(line, 3).split_whitespace(), &mut n);
                state.normals.push(n);
            }
            (Some(b'v'), Some(b't')) => {
                let mut uv = [0.0; 2];
                read_floats(tail(line, 3).split_whitespace(), &mut uv);
                state.uvs.push(uv);
            }
            (Some(b'u'), _) => {
                state.material = self.find_material(directive_arg(line));
                self.meshes[state.mesh].material_id = state.material;
            }
            (Some(b'g'), _) => {
                state.mesh = self.get_mesh(directive_arg(line));
                self.meshes[state.mesh].material_id = state.material;
            }
            (Some(b'f'), _) => {
                let corners: Vec<Vertex> = tail(line, 2)
                    .split_whitespace()
                    .map(|token| state.vertex(FaceIndex::parse(token)))
                    .collect();
                if corners.len() < 3 {
                    log::debug!("Skipping face with {} vertices: '{}'", corners.len(), line);
                    return;
                }
                let vertices = &mut self.meshes[state.mesh].vertices;
                vertices.extend_from_slice(&corners[..3]);
                // Fan: every extra corner closes a triangle with the first one.
                for i in 3..corners.len() {
                    vertices.extend_from_slice(&[corners[0], corners[i - 1], corners[i]]);
                }
            }
            (Some(b'm'), _) => {
                let file_name = directive_arg(line);
                if file_name.is_empty() {
                    log::warn!("mtllib without a file name ignored");
                    return;
                }
                if let Err(e) = self.load_mtl_file(base_dir.join(file_name)) {
                    log::warn!("Material library skipped: {e}");
                }
            }
            _ => {}
        }
    }
}

/// Everything a scan keeps between lines: attribute lists plus the current
/// mesh and material.
#[derive(Default)]
struct ParseState {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    mesh: usize,
    material: usize,
}

impl ParseState {
    fn vertex(&self, index: FaceIndex) -> Vertex {
        Vertex::new(
            resolve(&self.positions, index.position, "position"),
            resolve(&self.normals, index.normal, "normal"),
            resolve(&self.uvs, index.uv, "uv"),
        )
    }
}

/// Raw indices of one face corner. 0 means the component was not given.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct FaceIndex {
    position: i64,
    uv: i64,
    normal: i64,
}

impl FaceIndex {
    /// Parse `v`, `v/vt`, `v/vt/vn` or `v//vn`. Empty or unparsable
    /// components become 0.
    fn parse(token: &str) -> Self {
        let mut fields = token.split('/').map(|field| field.parse::<i64>().unwrap_or(0));
        Self {
            position: fields.next().unwrap_or(0),
            uv: fields.next().unwrap_or(0),
            normal: fields.next().unwrap_or(0),
        }
    }
}

/// Map a 1-based (or negative, end-relative) OBJ index into `list`.
/// Unset and out-of-range indices yield a zeroed attribute.
fn resolve<const N: usize>(list: &[[f32; N]], index: i64, what: &str) -> [f32; N] {
    let slot = match index {
        0 => return [0.0; N],
        i if i > 0 => usize::try_from(i - 1).ok(),
        i => usize::try_from(list.len() as i64 + i).ok(),
    };
    match slot.and_then(|i| list.get(i)) {
        Some(value) => *value,
        None => {
            log::debug!("{} index {} out of range (len={})", what, index, list.len());
            [0.0; N]
        }
    }
}

/// `line[start..]`, or "" when the line is shorter.
fn tail(line: &str, start: usize) -> &str {
    line.get(start..).unwrap_or_default()
}
