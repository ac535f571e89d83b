//! Binary STL (stereolithography) format support.
//!
//! # Layout
//!
//! ```text
//! UINT8[80]    – Header (ignored)
//! UINT32       – Number of facets
//! foreach facet
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (ignored)
//! end
//! ```
//!
//! All numbers are little-endian. The reader is strict: the file length must
//! be exactly what the facet count declares, so truncated records and
//! trailing bytes are both rejected instead of being silently dropped.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::error::{FormatError, MeshError, Result};
use crate::mesh::{Facet, Mesh, MAX_FACETS};

/// Size of the free-form header in bytes.
pub const HEADER_SIZE: usize = 80;

/// Size of the header plus the facet count.
pub const PREAMBLE_SIZE: usize = HEADER_SIZE + 4;

/// Size of one facet record (normal + 3 vertices + attribute count).
pub const FACET_SIZE: usize = 50;

/// Load a mesh from a binary STL file.
///
/// # Errors
///
/// - [`MeshError::FileNotFound`] if the file cannot be opened or read
/// - [`MeshError::MalformedMesh`] if the byte layout is invalid
///
/// # Example
///
/// ```no_run
/// use shademesh::io::stl;
///
/// let mesh = stl::load("sphere.stl").unwrap();
/// println!("{} facets", mesh.num_facets());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| MeshError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let mesh = decode(&bytes).map_err(|source| MeshError::MalformedMesh {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!(
        "loaded {} facets ({} bytes) from {}",
        mesh.num_facets(),
        bytes.len(),
        path.display()
    );
    Ok(mesh)
}

/// Decode binary STL from an in-memory buffer.
pub fn decode(bytes: &[u8]) -> std::result::Result<Mesh, FormatError> {
    if bytes.len() < PREAMBLE_SIZE {
        return Err(FormatError::HeaderTruncated {
            expected: PREAMBLE_SIZE,
            actual: bytes.len(),
        });
    }

    let declared = u32::from_le_bytes([
        bytes[HEADER_SIZE],
        bytes[HEADER_SIZE + 1],
        bytes[HEADER_SIZE + 2],
        bytes[HEADER_SIZE + 3],
    ]);

    if declared as usize > MAX_FACETS {
        return Err(FormatError::TooManyFacets {
            declared,
            max: MAX_FACETS,
        });
    }

    // the declared size can exceed usize on 32-bit targets
    let expected = PREAMBLE_SIZE as u64 + u64::from(declared) * FACET_SIZE as u64;
    let actual = bytes.len() as u64;
    if expected != actual {
        return Err(FormatError::LengthMismatch {
            declared,
            expected,
            actual,
        });
    }

    let facets = bytes[PREAMBLE_SIZE..]
        .chunks_exact(FACET_SIZE)
        .map(read_facet)
        .collect();

    Ok(Mesh::from_facets(facets))
}

/// Decode one 50-byte facet record.
fn read_facet(record: &[u8]) -> Facet {
    let normal = read_vec3(&record[0..12]);
    let v1 = read_vec3(&record[12..24]);
    let v2 = read_vec3(&record[24..36]);
    let v3 = read_vec3(&record[36..48]);
    Facet::new(normal, [v1.into(), v2.into(), v3.into()])
}

/// Read three little-endian f32s from 12 bytes.
fn read_vec3(buf: &[u8]) -> Vector3<f32> {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Vector3::new(x, y, z)
}

/// Save a mesh to a binary STL file.
///
/// Each facet's stored normal is written verbatim.
///
/// # Example
///
/// ```no_run
/// use shademesh::io::stl;
/// use shademesh::mesh::Mesh;
///
/// let mesh = Mesh::new();
/// stl::save(&mesh, "output.stl").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    write(mesh, &mut writer).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    writer.flush()?;

    Ok(())
}

/// Write a mesh as binary STL to any writer.
pub fn write<W: Write>(mesh: &Mesh, writer: &mut W) -> std::io::Result<()> {
    let triangles: Vec<stl_io::Triangle> = mesh.facets().iter().map(to_stl_triangle).collect();
    stl_io::write_stl(writer, triangles.iter())
}

/// Encode a mesh to an in-memory binary STL buffer.
pub fn encode(mesh: &Mesh) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(PREAMBLE_SIZE + mesh.num_facets() * FACET_SIZE);
    write(mesh, &mut bytes).expect("writing to a Vec cannot fail");
    bytes
}

fn to_stl_triangle(facet: &Facet) -> stl_io::Triangle {
    let n = facet.normal;
    let vertex = |p: &Point3<f32>| stl_io::Vertex::new([p.x, p.y, p.z]);
    stl_io::Triangle {
        normal: stl_io::Normal::new([n.x, n.y, n.z]),
        vertices: [
            vertex(&facet.vertices[0]),
            vertex(&facet.vertices[1]),
            vertex(&facet.vertices[2]),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn two_facets() -> Mesh {
        Mesh::from_facets(vec![
            Facet::new(
                Vector3::new(0.0, 0.0, 1.0),
                [
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(1.0, 0.0, 0.0),
                    Point3::new(0.0, 1.0, 0.0),
                ],
            ),
            Facet::new(
                Vector3::new(0.0, -1.0, 0.0),
                [
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(0.0, 0.0, 1.0),
                    Point3::new(1.5, 0.0, -0.25),
                ],
            ),
        ])
    }

    fn write_temp(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_encode_layout() {
        let bytes = encode(&two_facets());
        assert_eq!(bytes.len(), PREAMBLE_SIZE + 2 * FACET_SIZE);
        assert_eq!(&bytes[HEADER_SIZE..PREAMBLE_SIZE], &2u32.to_le_bytes());
        // second facet normal y component
        let off = PREAMBLE_SIZE + FACET_SIZE + 4;
        assert_eq!(&bytes[off..off + 4], &(-1.0f32).to_le_bytes());
    }

    #[test]
    fn test_save_then_load_preserves_facets() {
        let mesh = two_facets();
        let file = NamedTempFile::new().unwrap();
        save(&mesh, file.path()).unwrap();

        let loaded = load(file.path()).unwrap();
        assert_eq!(loaded, mesh);
    }

    #[test]
    fn test_header_starting_with_solid_is_still_binary() {
        let mut bytes = encode(&two_facets());
        bytes[..5].copy_from_slice(b"solid");
        let mesh = decode(&bytes).unwrap();
        assert_eq!(mesh.num_facets(), 2);
    }

    #[test]
    fn test_attribute_bytes_ignored() {
        let mut bytes = encode(&two_facets());
        let attr = PREAMBLE_SIZE + FACET_SIZE - 2;
        bytes[attr..attr + 2].copy_from_slice(&0xBEEFu16.to_le_bytes());
        assert_eq!(decode(&bytes).unwrap(), two_facets());
    }

    #[test]
    fn test_empty_mesh_is_valid() {
        let bytes = encode(&Mesh::new());
        assert_eq!(bytes.len(), PREAMBLE_SIZE);
        assert!(decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.stl");
        match load(&path) {
            Err(MeshError::FileNotFound { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_record_is_malformed() {
        let bytes = encode(&two_facets());
        let file = write_temp(&bytes[..bytes.len() - 7]);

        match load(file.path()) {
            Err(MeshError::MalformedMesh { source, .. }) => assert_eq!(
                source,
                FormatError::LengthMismatch {
                    declared: 2,
                    expected: 184,
                    actual: 177,
                }
            ),
            other => panic!("expected MalformedMesh, got {:?}", other),
        }
    }

    #[test]
    fn test_count_exceeds_records() {
        let mut bytes = encode(&two_facets());
        bytes[HEADER_SIZE..PREAMBLE_SIZE].copy_from_slice(&3u32.to_le_bytes());
        assert!(matches!(
            decode(&bytes),
            Err(FormatError::LengthMismatch { declared: 3, .. })
        ));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = encode(&two_facets());
        bytes.extend_from_slice(&[0u8; 10]);
        assert!(matches!(
            decode(&bytes),
            Err(FormatError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_short_header() {
        assert_eq!(
            decode(&[0u8; 40]),
            Err(FormatError::HeaderTruncated {
                expected: 84,
                actual: 40,
            })
        );
    }

    #[test]
    fn test_huge_declared_count() {
        let mut bytes = vec![0u8; PREAMBLE_SIZE];
        bytes[HEADER_SIZE..PREAMBLE_SIZE].copy_from_slice(&1_000_000u32.to_le_bytes());
        assert!(matches!(
            decode(&bytes),
            Err(FormatError::LengthMismatch {
                declared: 1_000_000,
                ..
            })
        ));
    }

    #[test]
    fn test_count_beyond_corner_index_range() {
        // the corners of this many facets cannot all be addressed by a u32 index
        let declared = (MAX_FACETS + 1) as u32;
        let mut bytes = vec![0u8; PREAMBLE_SIZE];
        bytes[HEADER_SIZE..PREAMBLE_SIZE].copy_from_slice(&declared.to_le_bytes());
        assert_eq!(
            decode(&bytes),
            Err(FormatError::TooManyFacets {
                declared,
                max: MAX_FACETS,
            })
        );

        let mut bytes = vec![0u8; PREAMBLE_SIZE];
        bytes[HEADER_SIZE..PREAMBLE_SIZE].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            decode(&bytes),
            Err(FormatError::TooManyFacets { declared: u32::MAX, .. })
        ));
    }
}
