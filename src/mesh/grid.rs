//! Uniform structured grid of rectangular cells.
//!
//! Cells are numbered row by row from the bottom left. Faces are numbered
//! with all horizontal faces first (`(ny + 1) × nx`, row by row, normal
//! along `y`), then all vertical faces (`ny × (nx + 1)`, normal along `x`).
//! A grid with `ny == 1` doubles as a 1-D line mesh.

use bitflags::bitflags;

use crate::mesh::{FaceCells, Mesh, Vec2};

bitflags! {
    /// Selects boundary faces by the side of the domain they lie on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Sides: u8 {
        const LEFT   = 0b0001;
        const RIGHT  = 0b0010;
        const BOTTOM = 0b0100;
        const TOP    = 0b1000;
    }
}

#[derive(Debug, Clone)]
pub struct Grid2D {
    dx: f64,
    dy: f64,
    nx: usize,
    ny: usize,
    interior: Vec<usize>,
    exterior: Vec<usize>,
}

impl Grid2D {
    /// # Panics
    /// Panics on an empty grid or non-positive spacing.
    pub fn new(dx: f64, dy: f64, nx: usize, ny: usize) -> Self {
        assert!(nx > 0 && ny > 0, "grid must have at least one cell");
        assert!(dx > 0.0 && dy > 0.0, "grid spacing must be positive");
        let mut grid = Self { dx, dy, nx, ny, interior: Vec::new(), exterior: Vec::new() };
        // exterior order: bottom, top, left, right
        let mut exterior = grid.faces(Sides::BOTTOM);
        exterior.extend(grid.faces(Sides::TOP));
        exterior.extend(grid.faces(Sides::LEFT));
        exterior.extend(grid.faces(Sides::RIGHT));
        let mut is_exterior = vec![false; grid.num_faces()];
        for &f in &exterior {
            is_exterior[f] = true;
        }
        grid.interior = (0..grid.num_faces()).filter(|&f| !is_exterior[f]).collect();
        grid.exterior = exterior;
        grid
    }

    /// `nx` cells of width `dx` along `x`, one cell of unit height.
    pub fn line(dx: f64, nx: usize) -> Self {
        Self::new(dx, 1.0, nx, 1)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Physical extent `(nx·dx, ny·dy)`.
    pub fn physical_shape(&self) -> (f64, f64) {
        (self.nx as f64 * self.dx, self.ny as f64 * self.dy)
    }

    /// Boundary faces on the selected sides, in side order bottom, top,
    /// left, right.
    pub fn faces(&self, sides: Sides) -> Vec<usize> {
        let (nx, ny) = (self.nx, self.ny);
        let mut out = Vec::new();
        if sides.contains(Sides::BOTTOM) {
            out.extend(0..nx);
        }
        if sides.contains(Sides::TOP) {
            out.extend(ny * nx..(ny + 1) * nx);
        }
        if sides.contains(Sides::LEFT) {
            out.extend((0..ny).map(|j| self.vertical_face(0, j)));
        }
        if sides.contains(Sides::RIGHT) {
            out.extend((0..ny).map(|j| self.vertical_face(nx, j)));
        }
        out
    }

    fn horizontal_faces(&self) -> usize {
        (self.ny + 1) * self.nx
    }

    fn vertical_face(&self, i: usize, j: usize) -> usize {
        self.horizontal_faces() + j * (self.nx + 1) + i
    }

    fn cell(&self, i: usize, j: usize) -> usize {
        j * self.nx + i
    }

    /// `(i, j, horizontal)` position of a face.
    fn face_position(&self, face: usize) -> (usize, usize, bool) {
        let h = self.horizontal_faces();
        if face < h {
            (face % self.nx, face / self.nx, true)
        } else {
            let v = face - h;
            (v % (self.nx + 1), v / (self.nx + 1), false)
        }
    }
}

impl Mesh for Grid2D {
    fn num_cells(&self) -> usize {
        self.nx * self.ny
    }

    fn num_faces(&self) -> usize {
        self.horizontal_faces() + self.ny * (self.nx + 1)
    }

    fn interior_faces(&self) -> &[usize] {
        &self.interior
    }

    fn exterior_faces(&self) -> &[usize] {
        &self.exterior
    }

    fn face_cells(&self, face: usize) -> FaceCells {
        let (i, j, horizontal) = self.face_position(face);
        if horizontal {
            match j {
                0 => FaceCells { first: self.cell(i, 0), second: None },
                j if j == self.ny => FaceCells { first: self.cell(i, j - 1), second: None },
                j => FaceCells { first: self.cell(i, j - 1), second: Some(self.cell(i, j)) },
            }
        } else {
            match i {
                0 => FaceCells { first: self.cell(0, j), second: None },
                i if i == self.nx => FaceCells { first: self.cell(i - 1, j), second: None },
                i => FaceCells { first: self.cell(i - 1, j), second: Some(self.cell(i, j)) },
            }
        }
    }

    fn face_area(&self, face: usize) -> f64 {
        if self.face_position(face).2 { self.dx } else { self.dy }
    }

    fn face_normal(&self, face: usize) -> Vec2 {
        let (i, j, horizontal) = self.face_position(face);
        match (horizontal, i, j) {
            (true, _, 0) => [0.0, -1.0],
            (true, _, _) => [0.0, 1.0],
            (false, 0, _) => [-1.0, 0.0],
            (false, _, _) => [1.0, 0.0],
        }
    }

    fn cell_distance(&self, face: usize) -> f64 {
        let spacing = if self.face_position(face).2 { self.dy } else { self.dx };
        if self.is_exterior(face) { spacing / 2.0 } else { spacing }
    }

    fn face_to_cell_distance_ratio(&self, face: usize) -> f64 {
        if self.is_exterior(face) { 1.0 } else { 0.5 }
    }

    fn cell_volume(&self, _cell: usize) -> f64 {
        self.dx * self.dy
    }

    fn cell_center(&self, cell: usize) -> Vec2 {
        let (i, j) = (cell % self.nx, cell / self.nx);
        [(i as f64 + 0.5) * self.dx, (j as f64 + 0.5) * self.dy]
    }

    fn face_center(&self, face: usize) -> Vec2 {
        let (i, j, horizontal) = self.face_position(face);
        if horizontal {
            [(i as f64 + 0.5) * self.dx, j as f64 * self.dy]
        } else {
            [i as f64 * self.dx, (j as f64 + 0.5) * self.dy]
        }
    }
}
