use crate::grid::{Grid, Status};

/* Working copy used inside a single tick. Every person carries an explicit
"touched" flag next to its status: spreading only flips the flag, and the
status itself is rewritten once in `finalize`. The outer ring is fixed to the
last immune day so nothing can leak past the edges of the domain. */

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Cell {
    pub status: Status,
    pub touched: bool,
}

impl Cell {
    const BOUNDARY: Cell = Cell {
        status: Status::LAST_IMMUNE_DAY,
        touched: false,
    };
}

#[derive(Clone, Debug)]
pub struct PaddedGrid {
    /// Side length of the wrapped grid, without the boundary ring.
    inner_size: usize,
    cells: Vec<Cell>,
}

impl PaddedGrid {
    /// Copy `grid` into the interior of an (N+2)x(N+2) grid whose border is
    /// all immune.
    pub fn extend(grid: &Grid) -> PaddedGrid {
        let n = grid.size();
        let side = n + 2;
        let mut cells = vec![Cell::BOUNDARY; side * side];
        for (x, row) in grid.rows().enumerate() {
            for (y, &status) in row.iter().enumerate() {
                cells[(x + 1) * side + y + 1] = Cell {
                    status,
                    touched: false,
                };
            }
        }
        PaddedGrid {
            inner_size: n,
            cells,
        }
    }

    pub fn side(&self) -> usize {
        self.inner_size + 2
    }

    const fn xy_2_idx(&self, xy: (usize, usize)) -> usize {
        xy.0 * (self.inner_size + 2) + xy.1
    }

    pub fn cell(&self, xy: (usize, usize)) -> Cell {
        assert!(
            xy.0 < self.side() && xy.1 < self.side(),
            "coordinate {:?} outside padded {}x{} grid",
            xy,
            self.side(),
            self.side()
        );
        self.cells[self.xy_2_idx(xy)]
    }

    #[cfg(test)]
    fn is_border(&self, xy: (usize, usize)) -> bool {
        xy.0 == 0 || xy.1 == 0 || xy.0 == self.side() - 1 || xy.1 == self.side() - 1
    }

    /// Padded coordinates of every infectious person, in row-major order.
    pub fn infectious_coordinates(&self) -> Vec<(usize, usize)> {
        let n = self.inner_size;
        let mut found = vec![];
        for x in 1..=n {
            for y in 1..=n {
                if self.cells[self.xy_2_idx((x, y))].status.is_infectious() {
                    found.push((x, y));
                }
            }
        }
        found
    }

    /// Mark the susceptible Von Neumann neighbours of the person at `xy` as
    /// newly infected. Does nothing unless that person is infectious.
    /// Marking an already touched neighbour again leaves it touched.
    pub fn spread(&mut self, xy: (usize, usize)) {
        // the boundary ring is immune, so this also returns early there
        if !self.cell(xy).status.is_infectious() {
            return;
        }
        let (x, y) = xy;
        for neighbor in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
            let idx = self.xy_2_idx(neighbor);
            if self.cells[idx].status.is_susceptible() {
                self.cells[idx].touched = true;
            }
        }
    }

    /// Age every interior person by one day and turn touched people into
    /// day-1 infectious. Clears all touched flags.
    pub fn finalize(&mut self) {
        let n = self.inner_size;
        for x in 1..=n {
            for y in 1..=n {
                let idx = self.xy_2_idx((x, y));
                let cell = &mut self.cells[idx];
                cell.status = if cell.touched {
                    Status::FIRST_INFECTIOUS_DAY
                } else {
                    cell.status.advanced()
                };
                cell.touched = false;
            }
        }
    }

    /// Drop the boundary ring.
    pub fn strip(&self) -> Grid {
        let n = self.inner_size;
        let mut cells = Vec::with_capacity(n * n);
        for x in 1..=n {
            for y in 1..=n {
                cells.push(self.cells[self.xy_2_idx((x, y))].status);
            }
        }
        Grid::from_cells(n, cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: Vec<Vec<u8>>) -> Grid {
        Grid::from_rows(rows).unwrap()
    }

    #[test]
    fn border_is_immune_and_interior_is_copied() {
        let g = grid(vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 0]]);
        let p = PaddedGrid::extend(&g);
        assert_eq!(p.side(), 5);
        for x in 0..5 {
            for y in 0..5 {
                let c = p.cell((x, y));
                assert!(!c.touched);
                if p.is_border((x, y)) {
                    assert_eq!(c.status, Status::LAST_IMMUNE_DAY);
                } else {
                    assert_eq!(c.status, g.get((x - 1, y - 1)));
                }
            }
        }
        assert_eq!(p.strip(), g);
    }

    #[test]
    fn spread_touches_only_orthogonal_susceptibles() {
        let g = grid(vec![vec![0, 0, 0], vec![0, 1, 4], vec![0, 0, 0]]);
        let mut p = PaddedGrid::extend(&g);
        p.spread((2, 2));
        assert!(p.cell((1, 2)).touched);
        assert!(p.cell((3, 2)).touched);
        assert!(p.cell((2, 1)).touched);
        // immune neighbour is left alone
        assert!(!p.cell((2, 3)).touched);
        for diag in [(1, 1), (1, 3), (3, 1), (3, 3)] {
            assert!(!p.cell(diag).touched);
        }
        assert!(!p.cell((2, 2)).touched);
    }

    #[test]
    fn spread_from_non_infectious_is_noop() {
        let g = grid(vec![vec![0, 0, 0], vec![0, 3, 0], vec![0, 0, 0]]);
        let mut p = PaddedGrid::extend(&g);
        p.spread((2, 2));
        assert!(p.infectious_coordinates().is_empty());
        for x in 1..=3 {
            for y in 1..=3 {
                assert!(!p.cell((x, y)).touched);
            }
        }
    }

    #[test]
    fn marking_twice_collapses() {
        let g = grid(vec![vec![1, 0, 2], vec![0, 0, 0], vec![0, 0, 0]]);
        let mut p = PaddedGrid::extend(&g);
        assert_eq!(p.infectious_coordinates(), vec![(1, 1), (1, 3)]);
        for xy in p.infectious_coordinates() {
            p.spread(xy);
        }
        assert_eq!(
            p.cell((1, 2)),
            Cell {
                status: Status::SUSCEPTIBLE,
                touched: true
            }
        );
        p.finalize();
        assert_eq!(p.strip().get((0, 1)), Status::FIRST_INFECTIOUS_DAY);
    }

    #[test]
    fn edge_person_cannot_infect_boundary() {
        let g = grid(vec![vec![1]]);
        let mut p = PaddedGrid::extend(&g);
        p.spread((1, 1));
        for x in 0..3 {
            for y in 0..3 {
                assert!(!p.cell((x, y)).touched);
            }
        }
        p.finalize();
        assert_eq!(p.strip().to_rows(), vec![vec![2]]);
    }

    #[test]
    fn spread_on_border_does_nothing() {
        let mut p = PaddedGrid::extend(&grid(vec![vec![0]]));
        p.spread((0, 1));
        p.spread((2, 2));
        for x in 0..3 {
            for y in 0..3 {
                assert!(!p.cell((x, y)).touched);
            }
        }
        p.finalize();
        assert_eq!(p.strip().to_rows(), vec![vec![0]]);
    }

    #[test]
    #[should_panic]
    fn spread_outside_padded_grid_panics() {
        let mut p = PaddedGrid::extend(&grid(vec![vec![1]]));
        p.spread((3, 1));
    }
}
