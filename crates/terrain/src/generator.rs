use glam::Vec3;
use terrastream_render::{RenderMesh, closed_prism, cuboid, octahedron};

use crate::heightfield::{HeightField, ObjectKind};

/// Height difference above which a cell becomes a vertical wall.
pub const WALL_THRESHOLD: i32 = 4;

/// Distance between a cell's highest corner and the center of its decoration.
pub const DECORATION_LIFT: f32 = 0.2;

/// Geometry style chosen for a terrain cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Box from the ground to the highest corner.
    Wall,
    /// Prism from a flat base to the four corner heights.
    Slope,
}

/// One cell of a height field with its four effective corner heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainCell {
    pub x: usize,
    pub z: usize,
    /// Corner heights in the order `(x,z) (x+1,z) (x+1,z+1) (x,z+1)`.
    pub corners: [i32; 4],
    pub object: ObjectKind,
}

impl TerrainCell {
    pub fn max_height(&self) -> i32 {
        self.corners.iter().copied().max().unwrap_or(0)
    }

    pub fn min_height(&self) -> i32 {
        self.corners.iter().copied().min().unwrap_or(0)
    }

    pub fn height_diff(&self) -> i32 {
        self.max_height() - self.min_height()
    }

    /// A cell with every corner at ground level produces no geometry.
    pub fn is_empty(&self) -> bool {
        self.max_height() <= 0
    }

    pub fn classify(&self, wall_threshold: i32) -> CellKind {
        if self.height_diff() > wall_threshold {
            CellKind::Wall
        } else {
            CellKind::Slope
        }
    }
}

/// Counts produced alongside generated geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub walls: usize,
    pub slopes: usize,
    pub decorations: usize,
    /// Cells with every corner at ground level.
    pub skipped: usize,
}

impl GenerationReport {
    pub fn mesh_count(&self) -> usize {
        self.walls + self.slopes + self.decorations
    }
}

/// Turns a height field into wall, slope and decoration meshes.
///
/// Generation is deterministic: the same field always yields the same meshes
/// in the same order (row by row along Z, then X within a row).
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    pub wall_threshold: i32,
}

impl Default for TerrainGenerator {
    fn default() -> Self {
        Self {
            wall_threshold: WALL_THRESHOLD,
        }
    }
}

impl TerrainGenerator {
    pub fn new(wall_threshold: i32) -> Self {
        Self { wall_threshold }
    }

    /// Every cell of the field, row-major.
    pub fn cells<'a>(&self, field: &'a HeightField) -> impl Iterator<Item = TerrainCell> + 'a {
        let size = field.size();
        (0..size).flat_map(move |z| {
            (0..size).map(move |x| TerrainCell {
                x,
                z,
                corners: field.cell_corners(x, z),
                object: field.object(x, z),
            })
        })
    }

    pub fn generate(&self, field: &HeightField) -> Vec<RenderMesh> {
        self.generate_with_report(field).0
    }

    pub fn generate_with_report(&self, field: &HeightField) -> (Vec<RenderMesh>, GenerationReport) {
        let _span = tracing::info_span!("terrain_generate", size = field.size()).entered();
        let mut meshes = Vec::new();
        let mut report = GenerationReport::default();

        for cell in self.cells(field) {
            if cell.is_empty() {
                report.skipped += 1;
                continue;
            }

            match cell.classify(self.wall_threshold) {
                CellKind::Wall => {
                    meshes.push(wall_mesh(&cell));
                    report.walls += 1;
                }
                CellKind::Slope => {
                    meshes.push(slope_mesh(&cell));
                    report.slopes += 1;
                }
            }

            if let Some(decoration) = decoration_mesh(&cell) {
                meshes.push(decoration);
                report.decorations += 1;
            }
        }

        tracing::debug!(
            walls = report.walls,
            slopes = report.slopes,
            decorations = report.decorations,
            skipped = report.skipped,
            "terrain generated"
        );
        (meshes, report)
    }
}

fn wall_mesh(cell: &TerrainCell) -> RenderMesh {
    let height = cell.max_height() as f32;
    cuboid(format!("wall_{}_{}", cell.x, cell.z), Vec3::new(1.0, height, 1.0)).with_position(
        Vec3::new(cell.x as f32 + 0.5, height * 0.5, cell.z as f32 + 0.5),
    )
}

fn slope_mesh(cell: &TerrainCell) -> RenderMesh {
    let (x, z) = (cell.x as f32, cell.z as f32);
    closed_prism(
        format!("slope_{}_{}", cell.x, cell.z),
        (x, z),
        (x + 1.0, z + 1.0),
        0.0,
        cell.corners.map(|h| h as f32),
    )
}

fn decoration_mesh(cell: &TerrainCell) -> Option<RenderMesh> {
    let name = |kind: &str| format!("{kind}_{}_{}", cell.x, cell.z);
    let mesh = match cell.object {
        ObjectKind::None => return None,
        ObjectKind::Crystal => octahedron(name("crystal"), 0.25, 0.35),
        ObjectKind::Switch => cuboid(name("switch"), Vec3::new(0.6, 0.05, 0.6)),
        ObjectKind::Lift => cuboid(name("lift"), Vec3::new(0.8, 0.2, 0.8)),
    };
    let center = Vec3::new(
        cell.x as f32 + 0.5,
        cell.max_height() as f32 + DECORATION_LIFT,
        cell.z as f32 + 0.5,
    );
    Some(mesh.with_position(center))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_cell(corners: [i32; 4]) -> HeightField {
        let mut f = HeightField::new(1);
        f.set_base(0, 0, corners[0]);
        f.set_base(1, 0, corners[1]);
        f.set_base(1, 1, corners[2]);
        f.set_base(0, 1, corners[3]);
        f
    }

    #[test]
    fn flat_field_yields_slopes() {
        let field = HeightField::flat(8, 1);
        let (meshes, report) = TerrainGenerator::default().generate_with_report(&field);

        assert_eq!(report.slopes, 64);
        assert_eq!(report.walls, 0);
        assert_eq!(meshes.len(), 64);
        for mesh in &meshes {
            assert_eq!(mesh.vertex_count(), 8);
            assert_eq!(mesh.triangle_count(), 12);
            for top in &mesh.positions[4..] {
                assert_eq!(top.y, 1.0);
            }
        }
    }

    #[test]
    fn steep_cell_is_a_wall() {
        let field = single_cell([0, 0, 0, 5]);
        let (meshes, report) = TerrainGenerator::default().generate_with_report(&field);

        assert_eq!(report.walls, 1);
        assert_eq!(report.slopes, 0);
        let b = meshes[0].world_aabb().unwrap();
        assert_eq!(b.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 5.0, 1.0));
    }

    #[test]
    fn threshold_is_exclusive() {
        let field = single_cell([0, 0, 0, 4]);
        let report = TerrainGenerator::default().generate_with_report(&field).1;
        assert_eq!(report.slopes, 1);
        assert_eq!(report.walls, 0);
    }

    #[test]
    fn ground_level_cells_are_skipped() {
        let mut field = HeightField::new(2);
        field.set_base(2, 2, 1);
        field.set_object(0, 0, ObjectKind::Crystal);
        let (meshes, report) = TerrainGenerator::default().generate_with_report(&field);

        assert_eq!(report.skipped, 3);
        assert_eq!(report.slopes, 1);
        assert_eq!(report.decorations, 0);
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].name, "slope_1_1");
    }

    #[test]
    fn slope_vertices_follow_corners() {
        let field = single_cell([1, 2, 3, 2]);
        let meshes = TerrainGenerator::default().generate(&field);
        let p = &meshes[0].positions;
        assert_eq!(p[0], Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(p[2], Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(p[4], Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(p[5], Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(p[6], Vec3::new(1.0, 3.0, 1.0));
        assert_eq!(p[7], Vec3::new(0.0, 2.0, 1.0));
    }

    #[test]
    fn decorations_sit_above_max_height() {
        let mut field = HeightField::flat(3, 2);
        field.set_offset(1, 1, 1);
        field.set_object(0, 0, ObjectKind::Crystal);
        field.set_object(1, 0, ObjectKind::Switch);
        field.set_object(2, 2, ObjectKind::Lift);
        let (meshes, report) = TerrainGenerator::default().generate_with_report(&field);

        assert_eq!(report.decorations, 3);
        assert_eq!(report.mesh_count(), meshes.len());

        let crystal = meshes.iter().find(|m| m.name == "crystal_0_0").unwrap();
        assert_eq!(crystal.transform.position, Vec3::new(0.5, 3.2, 0.5));
        let lift = meshes.iter().find(|m| m.name == "lift_2_2").unwrap();
        assert_eq!(lift.transform.position, Vec3::new(2.5, 2.2, 2.5));
    }

    #[test]
    fn generation_is_deterministic() {
        let mut field = HeightField::flat(6, 1);
        field.set_base(3, 3, 9);
        field.set_object(4, 4, ObjectKind::Crystal);
        let generator = TerrainGenerator::default();
        assert_eq!(generator.generate(&field), generator.generate(&field));
    }
}
