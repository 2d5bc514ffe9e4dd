//! Reader for Wavefront `.obj` geometry.
//!
//! [`ObjReader`] consumes a line based text source and builds a [`ModelRoot`]: groups
//! containing objects containing polygonal [`Face`]s. Faces reference their vertex
//! attributes by index only, the attributes themselves live in the reader's
//! [`VertexTables`].
//!
//! ```
//! use wavefront::{FaceContext, ObjReader};
//!
//! let mut reader = ObjReader::new();
//! let model = reader
//!     .parse_str("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n")
//!     .unwrap();
//!
//! let face = model.all_faces().next().unwrap();
//! assert_eq!(face.triangles().unwrap().count(), 2);
//! ```

pub mod attributes;
pub mod error;
pub mod face;
pub mod model;
pub mod reader;

pub use attributes::{
    FullVertex, Normal, ParameterCoords, Position, TextureCoords, VertexIndices,
};
pub use error::{ObjError, ObjParseError, ParseErrorKind};
pub use face::{Face, FaceError, Triangle, Triangles, NO_SMOOTHING_GROUP};
pub use model::{FaceContext, ModelGroup, ModelObject, ModelRoot, DEFAULT_NAME};
pub use reader::{IndexConvention, ObjReader, ReaderOptions, VertexDictionary, VertexTables};
