use crate::error::{FluError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Number of distinct status codes. Stages advance modulo this value.
pub const NUM_STAGES: u8 = 8;

/// Disease-stage day count of a single person.
///
/// * `0` susceptible
/// * `1..=2` infectious
/// * `3..=7` immune, wrapping back to `0` after day 7
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Status(u8);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Health {
    Susceptible,
    Infectious,
    Immune,
}

impl Display for Health {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Health::Susceptible => "S",
                Health::Infectious => "I",
                Health::Immune => "R",
            }
        )
    }
}

impl Status {
    pub const SUSCEPTIBLE: Status = Status(0);
    pub const FIRST_INFECTIOUS_DAY: Status = Status(1);
    pub const LAST_INFECTIOUS_DAY: Status = Status(2);
    pub const FIRST_IMMUNE_DAY: Status = Status(3);
    pub const LAST_IMMUNE_DAY: Status = Status(NUM_STAGES - 1);

    pub const fn new(code: u8) -> Option<Status> {
        if code < NUM_STAGES {
            Some(Status(code))
        } else {
            None
        }
    }

    /// Panics on codes outside `0..=7`.
    pub fn from_code(code: u8) -> Status {
        match Status::new(code) {
            Some(s) => s,
            None => panic!("status code {} is outside 0..=7", code),
        }
    }

    pub const fn code(self) -> u8 {
        self.0
    }

    pub const fn health(self) -> Health {
        match self.0 {
            0 => Health::Susceptible,
            1 | 2 => Health::Infectious,
            _ => Health::Immune,
        }
    }

    pub const fn is_susceptible(self) -> bool {
        self.0 == 0
    }

    pub const fn is_infectious(self) -> bool {
        matches!(self.0, 1 | 2)
    }

    /// The status one tick later for a cell that was not freshly infected.
    /// Susceptible stays susceptible, day 7 wraps to susceptible.
    pub const fn advanced(self) -> Status {
        if self.0 == 0 {
            self
        } else {
            Status((self.0 + 1) % NUM_STAGES)
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = FluError;

    fn try_from(code: u8) -> Result<Self> {
        Status::new(code).ok_or(FluError::InvalidStatus(code))
    }
}

impl From<Status> for u8 {
    fn from(s: Status) -> u8 {
        s.0
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How many people are in each health class at one tick.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct HealthCounts {
    pub susceptible: usize,
    pub infectious: usize,
    pub immune: usize,
}

impl HealthCounts {
    pub fn total(&self) -> usize {
        self.susceptible + self.infectious + self.immune
    }
}

/// Square population grid, stored row-major. Serialises as nested rows.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Grid {
    size: usize,
    cells: Vec<Status>,
}

impl Grid {
    /// An all-susceptible `size` x `size` grid.
    pub fn new(size: usize) -> Result<Grid> {
        if size == 0 {
            return Err(FluError::EmptyGrid);
        }
        Ok(Grid {
            size,
            cells: vec![Status::SUSCEPTIBLE; size * size],
        })
    }

    pub(crate) fn from_cells(size: usize, cells: Vec<Status>) -> Grid {
        assert_eq!(cells.len(), size * size);
        Grid { size, cells }
    }

    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Grid> {
        let size = rows.len();
        if size == 0 {
            return Err(FluError::EmptyGrid);
        }
        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(FluError::NotSquare {
                    row,
                    expected: size,
                    actual: values.len(),
                });
            }
            for code in values {
                cells.push(Status::try_from(code)?);
            }
        }
        Ok(Grid { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    const fn xy_2_idx(&self, xy: (usize, usize)) -> usize {
        xy.0 * self.size + xy.1
    }

    fn check_bounds(&self, xy: (usize, usize)) {
        assert!(
            xy.0 < self.size && xy.1 < self.size,
            "coordinate {:?} outside {}x{} grid",
            xy,
            self.size,
            self.size
        );
    }

    pub fn get(&self, xy: (usize, usize)) -> Status {
        self.check_bounds(xy);
        self.cells[self.xy_2_idx(xy)]
    }

    pub fn set(&mut self, xy: (usize, usize), status: Status) {
        self.check_bounds(xy);
        let idx = self.xy_2_idx(xy);
        self.cells[idx] = status;
    }

    pub fn cells(&self) -> &[Status] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Status]> + '_ {
        self.cells.chunks(self.size)
    }

    /// Rows as plain status codes.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.rows()
            .map(|row| row.iter().map(|s| s.code()).collect())
            .collect()
    }

    /// True iff at least one person is not susceptible, i.e. the population
    /// can still change on a later tick.
    pub fn someone_is_not_susceptible(&self) -> bool {
        self.cells.iter().any(|s| !s.is_susceptible())
    }

    pub fn counts(&self) -> HealthCounts {
        let mut counts = HealthCounts::default();
        for s in &self.cells {
            match s.health() {
                Health::Susceptible => counts.susceptible += 1,
                Health::Infectious => counts.infectious += 1,
                Health::Immune => counts.immune += 1,
            }
        }
        counts
    }
}

impl TryFrom<Vec<Vec<u8>>> for Grid {
    type Error = FluError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self> {
        Grid::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<u8>> {
    fn from(g: Grid) -> Self {
        g.to_rows()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            for (col, s) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", s)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
