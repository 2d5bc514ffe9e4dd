use std::slice;

use crate::face::Face;

/// Name of groups and objects which are created implicitly or declared without a name
pub const DEFAULT_NAME: &str = "default";

/// A level of the model tree which accepts faces.
pub trait FaceContext {
    /// Adds the face to the current child, creating a default child if there is none
    fn add_face(&mut self, face: Face);

    /// All faces below this level, depth first in insertion order
    fn all_faces(&self) -> Box<dyn Iterator<Item = &Face> + '_>;
}

fn name_or_default(name: &str) -> String {
    if name.trim().is_empty() {
        DEFAULT_NAME.to_owned()
    } else {
        name.to_owned()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelRoot {
    pub groups: Vec<ModelGroup>,
    current_group: Option<usize>,
}

impl ModelRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new group and makes it the current one. Blank names become `"default"`.
    pub fn start_group(&mut self, name: &str) -> &mut ModelGroup {
        self.groups.push(ModelGroup::new(name));
        let idx = self.groups.len() - 1;
        self.current_group = Some(idx);
        &mut self.groups[idx]
    }

    /// Returns the current group, starting a default group if there is none
    pub fn assure_group(&mut self) -> &mut ModelGroup {
        match self.current_group.filter(|&idx| idx < self.groups.len()) {
            Some(idx) => &mut self.groups[idx],
            None => self.start_group(DEFAULT_NAME),
        }
    }

    pub fn current_group(&self) -> Option<&ModelGroup> {
        self.current_group.and_then(|idx| self.groups.get(idx))
    }

    pub fn iter(&self) -> slice::Iter<'_, ModelGroup> {
        self.groups.iter()
    }

    pub fn face_count(&self) -> usize {
        self.groups.iter().map(ModelGroup::face_count).sum()
    }
}

impl FaceContext for ModelRoot {
    fn add_face(&mut self, face: Face) {
        self.assure_group().add_face(face);
    }

    fn all_faces(&self) -> Box<dyn Iterator<Item = &Face> + '_> {
        Box::new(self.groups.iter().flat_map(|g| g.all_faces()))
    }
}

impl<'a> IntoIterator for &'a ModelRoot {
    type Item = &'a ModelGroup;
    type IntoIter = slice::Iter<'a, ModelGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelGroup {
    pub name: String,
    pub material: Option<String>,
    pub objects: Vec<ModelObject>,
    current_object: Option<usize>,
}

impl ModelGroup {
    pub fn new(name: &str) -> Self {
        Self {
            name: name_or_default(name),
            material: None,
            objects: Vec::new(),
            current_object: None,
        }
    }

    /// Appends a new object and makes it the current one. Blank names become `"default"`.
    pub fn start_object(&mut self, name: &str) -> &mut ModelObject {
        self.objects.push(ModelObject::new(name));
        let idx = self.objects.len() - 1;
        self.current_object = Some(idx);
        &mut self.objects[idx]
    }

    /// Returns the current object, starting a default object if there is none
    pub fn assure_object(&mut self) -> &mut ModelObject {
        match self.current_object.filter(|&idx| idx < self.objects.len()) {
            Some(idx) => &mut self.objects[idx],
            None => self.start_object(DEFAULT_NAME),
        }
    }

    pub fn current_object(&self) -> Option<&ModelObject> {
        self.current_object.and_then(|idx| self.objects.get(idx))
    }

    pub fn iter(&self) -> slice::Iter<'_, ModelObject> {
        self.objects.iter()
    }

    pub fn face_count(&self) -> usize {
        self.objects.iter().map(|o| o.faces.len()).sum()
    }
}

impl Default for ModelGroup {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}

impl FaceContext for ModelGroup {
    fn add_face(&mut self, face: Face) {
        self.assure_object().add_face(face);
    }

    fn all_faces(&self) -> Box<dyn Iterator<Item = &Face> + '_> {
        Box::new(self.objects.iter().flat_map(|o| o.all_faces()))
    }
}

impl<'a> IntoIterator for &'a ModelGroup {
    type Item = &'a ModelObject;
    type IntoIter = slice::Iter<'a, ModelObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelObject {
    pub name: String,
    pub material: Option<String>,
    pub faces: Vec<Face>,
}

impl ModelObject {
    pub fn new(name: &str) -> Self {
        Self {
            name: name_or_default(name),
            material: None,
            faces: Vec::new(),
        }
    }

    /// Faces bucketed by smoothing group, buckets ordered by first appearance
    pub fn grouped_faces(&self) -> Vec<(i32, Vec<&Face>)> {
        let mut buckets: Vec<(i32, Vec<&Face>)> = Vec::new();
        for face in &self.faces {
            match buckets
                .iter_mut()
                .find(|(group, _)| *group == face.smoothing_group)
            {
                Some((_, faces)) => faces.push(face),
                None => buckets.push((face.smoothing_group, vec![face])),
            }
        }
        buckets
    }
}

impl Default for ModelObject {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}

impl FaceContext for ModelObject {
    fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    fn all_faces(&self) -> Box<dyn Iterator<Item = &Face> + '_> {
        Box::new(self.faces.iter())
    }
}
