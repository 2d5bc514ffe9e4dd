/// A geometric vertex (`v x y z [w]`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// defaults to `1.0` when omitted
    pub w: f64,
}

impl Position {
    pub const DEFAULT: Position = Position::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A vertex normal (`vn x y z`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Normal {
    pub const DEFAULT: Normal = Normal::new(1.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Default for Normal {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Texture coordinates (`vt u v [w]`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureCoords {
    pub u: f64,
    pub v: f64,
    /// defaults to `0.0` when omitted
    pub w: f64,
}

impl TextureCoords {
    pub const DEFAULT: TextureCoords = TextureCoords::new(0.0, 0.0, 0.0);

    pub const fn new(u: f64, v: f64, w: f64) -> Self {
        Self { u, v, w }
    }
}

impl Default for TextureCoords {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parameter space coordinates (`vp u [v [w]]`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterCoords {
    pub u: f64,
    pub v: f64,
    pub w: f64,
}

impl ParameterCoords {
    pub const DEFAULT: ParameterCoords = ParameterCoords::new(0.0, 0.0, 0.0);

    pub const fn new(u: f64, v: f64, w: f64) -> Self {
        Self { u, v, w }
    }
}

impl Default for ParameterCoords {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// All attributes of a single face corner, resolved from the vertex tables.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FullVertex {
    pub position: Position,
    pub texture_coords: TextureCoords,
    pub normal: Normal,
    pub parameter_coords: ParameterCoords,
}

/// Indices of one face corner into the vertex tables.
///
/// All indices are absolute and 1-based. A texture coords or normal index of `0`
/// means the face does not reference that attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VertexIndices {
    pub position_index: usize,
    pub texture_coords_index: usize,
    pub normal_index: usize,
}

impl VertexIndices {
    pub const fn new(position_index: usize, texture_coords_index: usize, normal_index: usize) -> Self {
        Self {
            position_index,
            texture_coords_index,
            normal_index,
        }
    }

    pub fn texture_coords(&self) -> Option<usize> {
        (self.texture_coords_index != 0).then(|| self.texture_coords_index)
    }

    pub fn normal(&self) -> Option<usize> {
        (self.normal_index != 0).then(|| self.normal_index)
    }
}
