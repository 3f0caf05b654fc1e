//! Asset loading/parsers (meshes, materials, textures).
//! OBJ scenes are flattened into non-indexed triangle lists, one per group,
//! with MTL materials referenced by index.

pub mod error;
pub mod material;
pub mod mesh;
pub mod mtl;
pub mod obj;
pub mod texture;

mod text;

pub use error::{AssetError, AssetResult};
pub use material::Material;
pub use mesh::{Mesh, Vertex};
pub use obj::ObjLoader;
