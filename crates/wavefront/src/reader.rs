use std::io::BufRead;

use log::{debug, info, trace};
use serde::Deserialize;

use crate::{
    attributes::*,
    error::{self, ObjError, ObjParseError, ParseErrorKind},
    face::{Face, NO_SMOOTHING_GROUP},
    model::{FaceContext, ModelRoot},
};

/// How face indices `<= 0` are resolved against the vertex tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexConvention {
    /// `count - raw`, so `0` resolves to the last element and `-1` to one past it.
    /// Compatible with models produced for earlier versions of this reader.
    Legacy,
    /// `count + raw + 1`, so `-1` resolves to the last element; `0` is rejected
    Standard,
}

impl Default for IndexConvention {
    fn default() -> Self {
        IndexConvention::Legacy
    }
}

impl IndexConvention {
    /// Resolves a raw face index into an absolute, 1-based index into a table with
    /// `count` elements. Positive indices are taken as they are.
    pub fn resolve(self, raw: i32, count: usize) -> Option<usize> {
        if raw > 0 {
            return Some(raw as usize);
        }

        let back = raw.unsigned_abs() as usize;
        match self {
            IndexConvention::Legacy => Some(count + back),
            IndexConvention::Standard if raw < 0 && back <= count => Some(count + 1 - back),
            IndexConvention::Standard => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    pub index_convention: IndexConvention,
    /// Reject faces where only some vertices reference texture coordinates or normals,
    /// instead of dropping the attribute for the whole face
    pub strict_attributes: bool,
}

/// Random access to vertex attributes by 1-based index.
pub trait VertexDictionary {
    fn position(&self, index: usize) -> Option<Position>;
    fn normal(&self, index: usize) -> Option<Normal>;
    fn texture_coords(&self, index: usize) -> Option<TextureCoords>;
    fn parameter_coords(&self, index: usize) -> Option<ParameterCoords>;

    /// Resolves all attributes of a face corner. Unreferenced attributes (index `0`)
    /// are filled with their defaults; any other unresolvable index yields `None`.
    fn full_vertex(&self, indices: &VertexIndices) -> Option<FullVertex> {
        let texture_coords = match indices.texture_coords() {
            Some(idx) => self.texture_coords(idx)?,
            None => TextureCoords::DEFAULT,
        };
        let normal = match indices.normal() {
            Some(idx) => self.normal(idx)?,
            None => Normal::DEFAULT,
        };

        Some(FullVertex {
            position: self.position(indices.position_index)?,
            texture_coords,
            normal,
            parameter_coords: ParameterCoords::DEFAULT,
        })
    }
}

/// The vertex attributes declared by an OBJ source, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexTables {
    pub positions: Vec<Position>,
    pub normals: Vec<Normal>,
    pub texture_coords: Vec<TextureCoords>,
    pub parameter_coords: Vec<ParameterCoords>,
}

fn lookup<T: Copy>(table: &[T], index: usize) -> Option<T> {
    index.checked_sub(1).and_then(|idx| table.get(idx)).copied()
}

impl VertexDictionary for VertexTables {
    fn position(&self, index: usize) -> Option<Position> {
        lookup(&self.positions, index)
    }

    fn normal(&self, index: usize) -> Option<Normal> {
        lookup(&self.normals, index)
    }

    fn texture_coords(&self, index: usize) -> Option<TextureCoords> {
        lookup(&self.texture_coords, index)
    }

    fn parameter_coords(&self, index: usize) -> Option<ParameterCoords> {
        lookup(&self.parameter_coords, index)
    }
}

/// Reads Wavefront OBJ sources (<https://en.wikipedia.org/wiki/Wavefront_.obj_file>) into
/// a [`ModelRoot`].
///
/// Only geometry statements (`v`, `vn`, `vt`, `vp`, `f`), grouping (`o`, `g`, `s`) and
/// `usemtl` are interpreted, every other statement is ignored. The vertex tables of the
/// last successful parse stay available through [`ObjReader::vertex_tables`].
#[derive(Debug, Default)]
pub struct ObjReader {
    options: ReaderOptions,
    tables: VertexTables,
}

impl ObjReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ReaderOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    pub fn vertex_tables(&self) -> &VertexTables {
        &self.tables
    }

    /// Parses the source line by line. Fails on the first invalid line; in that case the
    /// reader keeps the vertex tables of its previous parse.
    pub fn parse<R: BufRead>(&mut self, source: R) -> error::Result<ModelRoot> {
        let mut session = ParseSession::new(self.options);

        for (idx, line) in source.lines().enumerate() {
            let line_number = idx + 1;
            let line = line.map_err(|source| ObjError::Io {
                line_number,
                source,
            })?;

            trace!("Parsing: {:?}", line);
            session
                .process_line(&line)
                .map_err(|kind| ObjParseError {
                    line_number,
                    line,
                    kind,
                })?;
        }

        let ParseSession { tables, root, .. } = session;
        info!(
            "Parsed {} positions, {} normals, {} texture coords, {} parameter coords and {} faces",
            tables.positions.len(),
            tables.normals.len(),
            tables.texture_coords.len(),
            tables.parameter_coords.len(),
            root.face_count()
        );

        self.tables = tables;
        Ok(root)
    }

    pub fn parse_str(&mut self, source: &str) -> error::Result<ModelRoot> {
        self.parse(source.as_bytes())
    }
}

impl VertexDictionary for ObjReader {
    fn position(&self, index: usize) -> Option<Position> {
        self.tables.position(index)
    }

    fn normal(&self, index: usize) -> Option<Normal> {
        self.tables.normal(index)
    }

    fn texture_coords(&self, index: usize) -> Option<TextureCoords> {
        self.tables.texture_coords(index)
    }

    fn parameter_coords(&self, index: usize) -> Option<ParameterCoords> {
        self.tables.parameter_coords(index)
    }
}

/// State of a single [`ObjReader::parse`] call
struct ParseSession {
    options: ReaderOptions,
    tables: VertexTables,
    root: ModelRoot,
    smoothing_group: i32,
}

impl ParseSession {
    fn new(options: ReaderOptions) -> Self {
        Self {
            options,
            tables: VertexTables::default(),
            root: ModelRoot::new(),
            smoothing_group: NO_SMOOTHING_GROUP,
        }
    }

    fn process_line(&mut self, line: &str) -> Result<(), ParseErrorKind> {
        if line.trim().is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let line = line.trim();
        let (command, args) = match line.split_once(' ') {
            Some((command, args)) => (command, args.trim_start()),
            None => (line, ""),
        };
        // comment at the end of the line
        let args = match args.find('#') {
            Some(pos) => &args[..pos],
            None => args,
        }
        .trim_end();

        self.process_statement(command, args)
    }

    fn process_statement(&mut self, command: &str, args: &str) -> Result<(), ParseErrorKind> {
        match command {
            "v" => {
                let args = arguments("v", args, 3)?;
                self.tables.positions.push(Position::new(
                    parse_float(args[0])?,
                    parse_float(args[1])?,
                    parse_float(args[2])?,
                    optional_float(&args, 3, 1.0)?,
                ));
            }
            "vn" => {
                let args = arguments("vn", args, 3)?;
                self.tables.normals.push(Normal::new(
                    parse_float(args[0])?,
                    parse_float(args[1])?,
                    parse_float(args[2])?,
                ));
            }
            "vt" => {
                let args = arguments("vt", args, 2)?;
                self.tables.texture_coords.push(TextureCoords::new(
                    parse_float(args[0])?,
                    parse_float(args[1])?,
                    optional_float(&args, 2, 0.0)?,
                ));
            }
            "vp" => {
                let args = arguments("vp", args, 1)?;
                self.tables.parameter_coords.push(ParameterCoords::new(
                    parse_float(args[0])?,
                    optional_float(&args, 1, 0.0)?,
                    optional_float(&args, 2, 0.0)?,
                ));
            }
            "s" => {
                self.smoothing_group = if args == "off" {
                    NO_SMOOTHING_GROUP
                } else {
                    parse_int(args)?
                };
            }
            "f" => self.process_face(args)?,
            "o" => {
                self.root.assure_group().start_object(args);
                self.smoothing_group = NO_SMOOTHING_GROUP;
            }
            "g" => {
                self.root.start_group(args);
                self.smoothing_group = NO_SMOOTHING_GROUP;
            }
            "usemtl" => {
                if args.is_empty() {
                    return Err(ParseErrorKind::MissingMaterialName);
                }
                self.root.assure_group().assure_object().material = Some(args.to_owned());
            }
            "mtllib" | "l" | "p" | "cstype" | "deg" | "bmat" | "step" | "curv" | "curv2"
            | "surf" | "parm" | "trim" | "hole" | "scrv" | "sp" | "end" | "con" | "mg"
            | "lod" | "usemap" | "maplib" | "shadow_obj" | "trace_obj" | "ctech" | "stech"
            | "bevel" | "c_interp" | "d_interp" => {
                debug!("`{}` statements are not supported. Ignoring.", command)
            }
            // comment with leading whitespace
            "#" => {}
            _ => debug!("Found unknown statement `{}`. Ignoring.", command),
        }

        Ok(())
    }

    // f v1[/vt1[/vn1]] v2[/vt2[/vn2]] v3[/vt3[/vn3]] ...
    fn process_face(&mut self, args: &str) -> Result<(), ParseErrorKind> {
        let corners = arguments("f", args, 3)?;
        let convention = self.options.index_convention;

        let mut has_texture_coords = true;
        let mut has_normals = true;
        let mut texture_coords_seen = 0;
        let mut normals_seen = 0;
        let mut indices = Vec::with_capacity(corners.len());

        for corner in &corners {
            let parts: Vec<&str> = corner.split('/').collect();
            if parts.is_empty() || parts.len() > 3 {
                return Err(ParseErrorKind::VertexIndexCount(parts.len()));
            }

            let texture_coords = parts.get(1).filter(|part| !part.trim().is_empty());
            let normal = parts.get(2).filter(|part| !part.trim().is_empty());
            texture_coords_seen += texture_coords.is_some() as usize;
            normals_seen += normal.is_some() as usize;

            // the first corner without an attribute drops it for the rest of the face
            has_texture_coords &= texture_coords.is_some();
            has_normals &= normal.is_some();

            let position_index = resolve(convention, parts[0], self.tables.positions.len())?;
            let texture_coords_index = match texture_coords {
                Some(part) if has_texture_coords => {
                    resolve(convention, part, self.tables.texture_coords.len())?
                }
                _ => 0,
            };
            let normal_index = match normal {
                Some(part) if has_normals => resolve(convention, part, self.tables.normals.len())?,
                _ => 0,
            };

            indices.push(VertexIndices::new(
                position_index,
                texture_coords_index,
                normal_index,
            ));
        }

        if self.options.strict_attributes {
            if texture_coords_seen != 0 && texture_coords_seen != corners.len() {
                return Err(ParseErrorKind::MixedAttributes("texture coordinates"));
            }
            if normals_seen != 0 && normals_seen != corners.len() {
                return Err(ParseErrorKind::MixedAttributes("normals"));
            }
        }

        self.root.add_face(Face {
            smoothing_group: self.smoothing_group,
            has_normals,
            has_texture_coords,
            indices,
        });

        Ok(())
    }
}

// splits arguments seperated by single spaces
fn arguments<'a>(
    statement: &'static str,
    args: &'a str,
    expected: usize,
) -> Result<Vec<&'a str>, ParseErrorKind> {
    let args: Vec<&str> = if args.is_empty() {
        Vec::new()
    } else {
        args.split(' ').collect()
    };

    if args.len() < expected {
        return Err(ParseErrorKind::ArgumentCount {
            statement,
            expected,
            found: args.len(),
        });
    }

    Ok(args)
}

fn parse_float(value: &str) -> Result<f64, ParseErrorKind> {
    let number: f64 = value.trim().parse().map_err(ParseErrorKind::ParseFloat)?;
    if !number.is_finite() {
        return Err(ParseErrorKind::FloatOutOfRange(value.to_owned()));
    }
    Ok(number)
}

fn optional_float(args: &[&str], idx: usize, default: f64) -> Result<f64, ParseErrorKind> {
    args.get(idx).map_or(Ok(default), |value| parse_float(value))
}

fn parse_int(value: &str) -> Result<i32, ParseErrorKind> {
    value.trim().parse().map_err(ParseErrorKind::ParseInt)
}

fn resolve(
    convention: IndexConvention,
    value: &str,
    count: usize,
) -> Result<usize, ParseErrorKind> {
    let raw = parse_int(value)?;
    convention
        .resolve(raw, count)
        .ok_or(ParseErrorKind::IndexOutOfRange { index: raw, count })
}

#[cfg(test)]
mod test {
    use super::*;

    fn session() -> ParseSession {
        ParseSession::new(ReaderOptions::default())
    }

    fn faces(session: &ParseSession) -> Vec<&Face> {
        session.root.all_faces().collect()
    }

    #[test]
    fn test_process_statement() -> Result<(), ParseErrorKind> {
        let mut session = session();

        session.process_statement("o", "foo bar")?;
        session.process_statement("v", "1 2 3")?;
        session.process_statement("v", "4 5 6 0.5")?;
        session.process_statement("v", "7 8 9")?;
        session.process_statement("f", "1 2 3")?;
        session.process_statement("g", "new group")?;

        assert_eq!(
            session.tables.positions,
            vec![
                Position::new(1.0, 2.0, 3.0, 1.0),
                Position::new(4.0, 5.0, 6.0, 0.5),
                Position::new(7.0, 8.0, 9.0, 1.0),
            ]
        );
        assert_eq!(session.root.groups.len(), 2);
        assert_eq!(session.root.groups[0].name, "default");
        assert_eq!(session.root.groups[0].objects[0].name, "foo bar");
        assert_eq!(session.root.groups[0].objects[0].faces.len(), 1);
        assert_eq!(session.root.current_group().unwrap().name, "new group");

        Ok(())
    }

    #[test]
    fn test_process_line_comments() -> Result<(), ParseErrorKind> {
        let mut session = session();

        session.process_line("")?;
        session.process_line("   \t")?;
        session.process_line("# v 1 2 3")?;
        session.process_line("  # indented comment")?;
        assert_eq!(session.tables, VertexTables::default());
        assert_eq!(session.root, ModelRoot::new());

        session.process_line("  vt 0.5 0.25 # trailing comment")?;
        assert_eq!(
            session.tables.texture_coords,
            vec![TextureCoords::new(0.5, 0.25, 0.0)]
        );

        Ok(())
    }

    #[test]
    fn test_parameter_coords() -> Result<(), ParseErrorKind> {
        let mut session = session();

        session.process_statement("vp", "0.1")?;
        session.process_statement("vp", "0.1 0.2 0.3")?;

        assert_eq!(
            session.tables.parameter_coords,
            vec![
                ParameterCoords::new(0.1, 0.0, 0.0),
                ParameterCoords::new(0.1, 0.2, 0.3)
            ]
        );
        assert!(session.tables.normals.is_empty());
        Ok(())
    }

    #[test]
    fn test_unknown_statements_are_ignored() -> Result<(), ParseErrorKind> {
        let mut session = session();

        session.process_line("mtllib scene.mtl")?;
        session.process_line("l 1 2")?;
        session.process_line("frobnicate 1 2 3")?;

        assert_eq!(session.tables, VertexTables::default());
        assert_eq!(session.root, ModelRoot::new());
        Ok(())
    }

    #[test]
    fn test_argument_count() {
        let mut session = session();

        assert!(matches!(
            session.process_statement("v", "1 2"),
            Err(ParseErrorKind::ArgumentCount {
                statement: "v",
                expected: 3,
                found: 2
            })
        ));
        assert!(matches!(
            session.process_statement("vn", "1 2"),
            Err(ParseErrorKind::ArgumentCount {
                statement: "vn",
                expected: 3,
                found: 2
            })
        ));
        assert!(matches!(
            session.process_statement("vt", "1"),
            Err(ParseErrorKind::ArgumentCount { found: 1, .. })
        ));
        assert!(matches!(
            session.process_statement("vp", ""),
            Err(ParseErrorKind::ArgumentCount { found: 0, .. })
        ));
        assert!(matches!(
            session.process_statement("f", "1 2"),
            Err(ParseErrorKind::ArgumentCount {
                statement: "f",
                found: 2,
                ..
            })
        ));
        assert!(matches!(
            session.process_statement("f", "1 2 3/1/1/1"),
            Err(ParseErrorKind::VertexIndexCount(4))
        ));
        assert!(matches!(
            session.process_statement("usemtl", ""),
            Err(ParseErrorKind::MissingMaterialName)
        ));
    }

    #[test]
    fn test_malformed_numbers() {
        let mut session = session();

        assert!(matches!(
            session.process_statement("v", "1 two 3"),
            Err(ParseErrorKind::ParseFloat(_))
        ));
        assert!(matches!(
            session.process_statement("v", "1 1e400 3"),
            Err(ParseErrorKind::FloatOutOfRange(_))
        ));
        assert!(matches!(
            session.process_statement("s", "smooth"),
            Err(ParseErrorKind::ParseInt(_))
        ));
        assert!(matches!(
            session.process_statement("f", "1 2 99999999999"),
            Err(ParseErrorKind::ParseInt(_))
        ));
        assert!(session.tables.positions.is_empty());
        assert_eq!(session.root.face_count(), 0);
    }

    #[test]
    fn test_face_attribute_presence() -> Result<(), ParseErrorKind> {
        let mut session = session();

        session.process_statement("f", "1/1/1 2/2/2 3/3/3")?;
        session.process_statement("f", "1//1 2//2 3//3")?;
        session.process_statement("f", "1/1/1 2/2 3/3/3")?;
        session.process_statement("f", "1/1 2 3/3")?;

        let faces = faces(&session);
        assert!(faces[0].has_texture_coords && faces[0].has_normals);
        assert!(!faces[1].has_texture_coords && faces[1].has_normals);
        assert_eq!(faces[1].indices[2], VertexIndices::new(3, 0, 3));

        assert!(faces[2].has_texture_coords && !faces[2].has_normals);
        assert_eq!(
            faces[2].indices,
            vec![
                VertexIndices::new(1, 1, 1),
                VertexIndices::new(2, 2, 0),
                VertexIndices::new(3, 3, 0),
            ]
        );

        // corners after the first one without texture coordinates drop them
        assert!(!faces[3].has_texture_coords);
        assert_eq!(
            faces[3].indices,
            vec![
                VertexIndices::new(1, 1, 0),
                VertexIndices::new(2, 0, 0),
                VertexIndices::new(3, 0, 0),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_strict_attributes() {
        let mut session = ParseSession::new(ReaderOptions {
            strict_attributes: true,
            ..ReaderOptions::default()
        });

        assert!(session.process_statement("f", "1/1 2/2 3/3").is_ok());
        assert!(matches!(
            session.process_statement("f", "1/1 2 3/3"),
            Err(ParseErrorKind::MixedAttributes("texture coordinates"))
        ));
        assert!(matches!(
            session.process_statement("f", "1//1 2//2 3"),
            Err(ParseErrorKind::MixedAttributes("normals"))
        ));
        assert_eq!(session.root.face_count(), 1);
    }

    #[test]
    fn test_smoothing_groups() -> Result<(), ParseErrorKind> {
        let mut session = session();

        session.process_statement("f", "1 2 3")?;
        session.process_statement("s", "3")?;
        session.process_statement("f", "1 2 3")?;
        session.process_statement("s", "off")?;
        session.process_statement("f", "1 2 3")?;
        session.process_statement("s", "4")?;
        session.process_statement("o", "")?;
        session.process_statement("f", "1 2 3")?;
        session.process_statement("s", "5")?;
        session.process_statement("g", "")?;
        session.process_statement("f", "1 2 3")?;

        let groups: Vec<i32> = faces(&session).iter().map(|f| f.smoothing_group).collect();
        assert_eq!(groups, vec![-1, 3, -1, -1, -1]);
        Ok(())
    }

    #[test]
    fn test_resolve_legacy() {
        let legacy = IndexConvention::Legacy;
        assert_eq!(legacy.resolve(2, 5), Some(2));
        assert_eq!(legacy.resolve(7, 5), Some(7));
        assert_eq!(legacy.resolve(0, 5), Some(5));
        assert_eq!(legacy.resolve(-1, 5), Some(6));
        assert_eq!(legacy.resolve(-3, 0), Some(3));
    }

    #[test]
    fn test_resolve_standard() {
        let standard = IndexConvention::Standard;
        assert_eq!(standard.resolve(2, 5), Some(2));
        assert_eq!(standard.resolve(-1, 5), Some(5));
        assert_eq!(standard.resolve(-5, 5), Some(1));
        assert_eq!(standard.resolve(-6, 5), None);
        assert_eq!(standard.resolve(0, 5), None);
    }

    #[test]
    fn test_relative_indices() -> Result<(), ParseErrorKind> {
        let mut session = session();
        for _ in 0..4 {
            session.process_statement("v", "0 0 0")?;
        }
        session.process_statement("f", "-1 0 1")?;

        assert_eq!(
            faces(&session)[0]
                .indices
                .iter()
                .map(|vi| vi.position_index)
                .collect::<Vec<_>>(),
            vec![5, 4, 1]
        );
        Ok(())
    }

    #[test]
    fn test_vertex_dictionary() {
        let tables = VertexTables {
            positions: vec![Position::new(1.0, 2.0, 3.0, 1.0)],
            normals: vec![Normal::new(0.0, 1.0, 0.0)],
            texture_coords: vec![TextureCoords::new(0.5, 0.5, 0.0)],
            parameter_coords: Vec::new(),
        };

        assert_eq!(tables.position(0), None);
        assert_eq!(tables.position(1), Some(Position::new(1.0, 2.0, 3.0, 1.0)));
        assert_eq!(tables.normal(2), None);
        assert_eq!(tables.parameter_coords(1), None);

        assert_eq!(
            tables.full_vertex(&VertexIndices::new(1, 0, 1)),
            Some(FullVertex {
                position: Position::new(1.0, 2.0, 3.0, 1.0),
                normal: Normal::new(0.0, 1.0, 0.0),
                ..FullVertex::default()
            })
        );
        assert_eq!(tables.full_vertex(&VertexIndices::new(1, 2, 0)), None);
        assert_eq!(tables.full_vertex(&VertexIndices::new(2, 0, 0)), None);
    }

    #[test]
    fn test_options_from_toml() -> Result<(), toml::de::Error> {
        let options: ReaderOptions = toml::from_str("index_convention = \"standard\"")?;
        assert_eq!(
            options,
            ReaderOptions {
                index_convention: IndexConvention::Standard,
                strict_attributes: false,
            }
        );
        assert_eq!(toml::from_str::<ReaderOptions>("")?, ReaderOptions::default());
        Ok(())
    }
}
