use std::fmt;

use wavefront::{Face, FaceContext, ModelRoot, VertexTables};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ObjectSummary {
    pub(crate) name: String,
    pub(crate) material: Option<String>,
    pub(crate) faces: usize,
    pub(crate) triangles: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GroupSummary {
    pub(crate) name: String,
    pub(crate) objects: Vec<ObjectSummary>,
}

/// Structure of a parsed model
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Summary {
    pub(crate) positions: usize,
    pub(crate) normals: usize,
    pub(crate) texture_coords: usize,
    pub(crate) parameter_coords: usize,
    pub(crate) groups: Vec<GroupSummary>,
    /// include triangle counts when printing
    pub(crate) triangles: bool,
}

fn triangle_count<'a>(faces: impl Iterator<Item = &'a Face>) -> usize {
    faces.map(Face::triangle_count).sum()
}

impl Summary {
    pub(crate) fn new(model: &ModelRoot, tables: &VertexTables, triangles: bool) -> Self {
        let groups = model
            .iter()
            .map(|group| GroupSummary {
                name: group.name.clone(),
                objects: group
                    .iter()
                    .map(|object| ObjectSummary {
                        name: object.name.clone(),
                        material: object.material.clone(),
                        faces: object.faces.len(),
                        triangles: triangle_count(object.all_faces()),
                    })
                    .collect(),
            })
            .collect();

        Self {
            positions: tables.positions.len(),
            normals: tables.normals.len(),
            texture_coords: tables.texture_coords.len(),
            parameter_coords: tables.parameter_coords.len(),
            groups,
            triangles,
        }
    }

    fn objects(&self) -> impl Iterator<Item = &ObjectSummary> {
        self.groups.iter().flat_map(|g| g.objects.iter())
    }

    pub(crate) fn face_count(&self) -> usize {
        self.objects().map(|o| o.faces).sum()
    }

    pub(crate) fn triangle_count(&self) -> usize {
        self.objects().map(|o| o.triangles).sum()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "vertices: {} positions, {} normals, {} texture coords, {} parameter coords",
            self.positions, self.normals, self.texture_coords, self.parameter_coords
        )?;
        write!(
            f,
            "{} groups, {} objects, {} faces",
            self.groups.len(),
            self.objects().count(),
            self.face_count()
        )?;
        if self.triangles {
            write!(f, ", {} triangles", self.triangle_count())?;
        }
        writeln!(f)?;

        for group in &self.groups {
            writeln!(f, "  g {}", group.name)?;
            for object in &group.objects {
                write!(f, "    o {}: {} faces", object.name, object.faces)?;
                if self.triangles {
                    write!(f, " ({} triangles)", object.triangles)?;
                }
                if let Some(material) = &object.material {
                    write!(f, ", material `{}`", material)?;
                }
                writeln!(f)?;
            }
        }

        Ok(())
    }
}
