/// Decoration placed on a terrain cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObjectKind {
    #[default]
    None,
    Crystal,
    Switch,
    Lift,
}

impl ObjectKind {
    /// Decode a level-grid character. Space and `.` are empty cells;
    /// unknown characters yield `None` so the caller can report them.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(Self::Crystal),
            'S' => Some(Self::Switch),
            'L' => Some(Self::Lift),
            ' ' | '.' => Some(Self::None),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Self::None => '.',
            Self::Crystal => 'C',
            Self::Switch => 'S',
            Self::Lift => 'L',
        }
    }

    pub fn is_some(self) -> bool {
        self != Self::None
    }
}

/// Grid of integer corner heights plus per-cell texture and object tags.
///
/// Largest supported number of cells per side.
pub const MAX_LEVEL_SIZE: usize = 1024;

/// Corners are indexed `(x, y)` with `0 <= x, y <= size`; cells are indexed
/// `(x, y)` with `0 <= x, y < size`. The `y` index runs along world Z.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightField {
    size: usize,
    base: Vec<i32>,
    offset: Vec<i32>,
    side_texture: Vec<i32>,
    top_texture: Vec<i32>,
    objects: Vec<ObjectKind>,
}

impl HeightField {
    /// All-zero field with `size × size` cells, `size` clamped to
    /// [`MAX_LEVEL_SIZE`].
    pub fn new(size: usize) -> Self {
        let size = clamp_size(size);
        let corners = (size + 1) * (size + 1);
        let cells = size * size;
        Self {
            size,
            base: vec![0; corners],
            offset: vec![0; corners],
            side_texture: vec![0; cells],
            top_texture: vec![0; cells],
            objects: vec![ObjectKind::None; cells],
        }
    }

    /// Field whose every corner has base height `height` and zero offset.
    pub fn flat(size: usize, height: i32) -> Self {
        let mut field = Self::new(size);
        field.base.fill(height.max(0));
        field
    }

    /// Number of cells along each side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of corners along each side (`size + 1`).
    pub fn corners_per_side(&self) -> usize {
        self.size + 1
    }

    fn corner_index(&self, x: usize, y: usize) -> Option<usize> {
        let n = self.corners_per_side();
        (x < n && y < n).then(|| y * n + x)
    }

    fn cell_index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.size && y < self.size).then(|| y * self.size + x)
    }

    pub fn base(&self, x: usize, y: usize) -> Option<i32> {
        self.corner_index(x, y).map(|i| self.base[i])
    }

    pub fn offset(&self, x: usize, y: usize) -> Option<i32> {
        self.corner_index(x, y).map(|i| self.offset[i])
    }

    /// `base + offset` at a corner; `None` outside the grid.
    pub fn effective_height(&self, x: usize, y: usize) -> Option<i32> {
        self.corner_index(x, y)
            .map(|i| self.base[i].saturating_add(self.offset[i]))
    }

    /// Set a corner's base height. Returns false outside the grid.
    pub fn set_base(&mut self, x: usize, y: usize, value: i32) -> bool {
        let Some(i) = self.corner_index(x, y) else {
            return false;
        };
        self.base[i] = value;
        self.clamp_corner(i, x, y);
        true
    }

    /// Set a corner's offset. Returns false outside the grid.
    pub fn set_offset(&mut self, x: usize, y: usize, value: i32) -> bool {
        let Some(i) = self.corner_index(x, y) else {
            return false;
        };
        self.offset[i] = value;
        self.clamp_corner(i, x, y);
        true
    }

    /// Raise (or lower) a corner's offset by `delta` and return the new
    /// effective height. Lowering stops at ground level.
    pub fn adjust_offset(&mut self, x: usize, y: usize, delta: i32) -> Option<i32> {
        let i = self.corner_index(x, y)?;
        self.offset[i] = self.offset[i].saturating_add(delta);
        if self.base[i].saturating_add(self.offset[i]) < 0 {
            self.offset[i] = self.base[i].saturating_neg();
        }
        Some(self.base[i].saturating_add(self.offset[i]))
    }

    /// Keep `base + offset >= 0` by pulling the offset up.
    fn clamp_corner(&mut self, i: usize, x: usize, y: usize) {
        let effective = self.base[i].saturating_add(self.offset[i]);
        if effective < 0 {
            tracing::warn!(
                x,
                y,
                base = self.base[i],
                offset = self.offset[i],
                "negative effective height clamped to 0"
            );
            self.offset[i] = self.base[i].saturating_neg();
        }
    }

    /// Effective heights of a cell's corners in the order
    /// `(x, y) (x+1, y) (x+1, y+1) (x, y+1)`.
    ///
    /// Corners outside the grid read as 0 and are logged.
    pub fn cell_corners(&self, x: usize, y: usize) -> [i32; 4] {
        [(x, y), (x + 1, y), (x + 1, y + 1), (x, y + 1)].map(|(cx, cy)| {
            self.effective_height(cx, cy).unwrap_or_else(|| {
                tracing::warn!(x = cx, y = cy, "corner outside height field, using 0");
                0
            })
        })
    }

    pub fn side_texture(&self, x: usize, y: usize) -> Option<i32> {
        self.cell_index(x, y).map(|i| self.side_texture[i])
    }

    pub fn top_texture(&self, x: usize, y: usize) -> Option<i32> {
        self.cell_index(x, y).map(|i| self.top_texture[i])
    }

    pub fn set_textures(&mut self, x: usize, y: usize, side: i32, top: i32) -> bool {
        let Some(i) = self.cell_index(x, y) else {
            return false;
        };
        self.side_texture[i] = side;
        self.top_texture[i] = top;
        true
    }

    pub fn object(&self, x: usize, y: usize) -> ObjectKind {
        self.cell_index(x, y)
            .map(|i| self.objects[i])
            .unwrap_or_default()
    }

    pub fn set_object(&mut self, x: usize, y: usize, object: ObjectKind) -> bool {
        let Some(i) = self.cell_index(x, y) else {
            return false;
        };
        self.objects[i] = object;
        true
    }

    /// Row-major corner base heights.
    pub fn base_grid(&self) -> &[i32] {
        &self.base
    }

    /// Row-major corner offsets.
    pub fn offset_grid(&self) -> &[i32] {
        &self.offset
    }

    pub fn side_texture_grid(&self) -> &[i32] {
        &self.side_texture
    }

    pub fn top_texture_grid(&self) -> &[i32] {
        &self.top_texture
    }

    pub fn object_grid(&self) -> &[ObjectKind] {
        &self.objects
    }

    /// Assemble a field from row-major grids. Grids of the wrong length are
    /// truncated or zero-padded; negative effective heights are clamped.
    pub(crate) fn from_grids(
        size: usize,
        base: Vec<i32>,
        offset: Vec<i32>,
        side_texture: Vec<i32>,
        top_texture: Vec<i32>,
        objects: Vec<ObjectKind>,
    ) -> Self {
        let size = clamp_size(size);
        let corners = (size + 1) * (size + 1);
        let cells = size * size;
        let fit = |mut v: Vec<i32>, len: usize| {
            v.resize(len, 0);
            v
        };
        let mut objects = objects;
        objects.resize(cells, ObjectKind::None);

        let mut field = Self {
            size,
            base: fit(base, corners),
            offset: fit(offset, corners),
            side_texture: fit(side_texture, cells),
            top_texture: fit(top_texture, cells),
            objects,
        };
        let n = field.corners_per_side();
        for i in 0..corners {
            field.clamp_corner(i, i % n, i / n);
        }
        field
    }
}

fn clamp_size(size: usize) -> usize {
    if size > MAX_LEVEL_SIZE {
        tracing::warn!(size, max = MAX_LEVEL_SIZE, "height field size clamped");
    }
    size.min(MAX_LEVEL_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn huge_size_is_clamped() {
        let f = HeightField::new(usize::MAX);
        assert_eq!(f.size(), MAX_LEVEL_SIZE);
        assert_eq!(f.corners_per_side(), MAX_LEVEL_SIZE + 1);
    }

    #[test]
    fn new_field_dimensions() {
        let f = HeightField::new(8);
        assert_eq!(f.size(), 8);
        assert_eq!(f.corners_per_side(), 9);
        assert_eq!(f.base_grid().len(), 81);
        assert_eq!(f.object_grid().len(), 64);
        assert_eq!(f.effective_height(8, 8), Some(0));
        assert_eq!(f.effective_height(9, 0), None);
    }

    #[test]
    fn effective_height_is_base_plus_offset() {
        let mut f = HeightField::flat(2, 3);
        assert!(f.set_offset(1, 1, 2));
        assert_eq!(f.effective_height(1, 1), Some(5));
        assert_eq!(f.base(1, 1), Some(3));
        assert_eq!(f.offset(1, 1), Some(2));
    }

    #[test]
    fn negative_offset_is_clamped_at_ground() {
        let mut f = HeightField::flat(2, 3);
        f.set_offset(0, 0, -10);
        assert_eq!(f.effective_height(0, 0), Some(0));
        assert_eq!(f.offset(0, 0), Some(-3));
    }

    #[test]
    fn adjust_offset_raises_and_lowers() {
        let mut f = HeightField::flat(1, 1);
        assert_eq!(f.adjust_offset(1, 0, 2), Some(3));
        assert_eq!(f.adjust_offset(1, 0, -5), Some(0));
        assert_eq!(f.adjust_offset(5, 5, 1), None);
    }

    #[test]
    fn cell_corners_order() {
        let mut f = HeightField::new(1);
        f.set_base(0, 0, 1);
        f.set_base(1, 0, 2);
        f.set_base(1, 1, 3);
        f.set_base(0, 1, 4);
        assert_eq!(f.cell_corners(0, 0), [1, 2, 3, 4]);
    }

    #[test]
    fn cell_corners_outside_grid_read_zero() {
        let f = HeightField::flat(2, 1);
        assert_eq!(f.cell_corners(2, 2), [1, 0, 0, 0]);
    }

    #[test]
    fn objects_and_textures() {
        let mut f = HeightField::new(2);
        assert!(f.set_object(1, 0, ObjectKind::Lift));
        assert!(f.set_textures(1, 0, 3, 4));
        assert_eq!(f.object(1, 0), ObjectKind::Lift);
        assert_eq!(f.object(7, 7), ObjectKind::None);
        assert_eq!(f.side_texture(1, 0), Some(3));
        assert_eq!(f.top_texture(1, 0), Some(4));
        assert!(!f.set_object(2, 0, ObjectKind::Crystal));
    }

    #[test]
    fn object_chars() {
        assert_eq!(ObjectKind::from_char('C'), Some(ObjectKind::Crystal));
        assert_eq!(ObjectKind::from_char(' '), Some(ObjectKind::None));
        assert_eq!(ObjectKind::from_char('x'), None);
        for kind in [ObjectKind::Crystal, ObjectKind::Switch, ObjectKind::Lift, ObjectKind::None] {
            assert_eq!(ObjectKind::from_char(kind.to_char()), Some(kind));
        }
    }

    #[test]
    fn from_grids_pads_short_input() {
        let f = HeightField::from_grids(1, vec![1, 2], vec![], vec![], vec![], vec![]);
        assert_eq!(f.base_grid(), &[1, 2, 0, 0]);
        assert_eq!(f.offset_grid(), &[0, 0, 0, 0]);
        assert_eq!(f.object_grid(), &[ObjectKind::None]);
    }
}
