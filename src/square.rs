//! Algebraic square coordinates.
//!
//! A [`Square`] is a thin wrapper around an index in `0..64`, with
//! `rank * 8 + file` as the canonical mapping (file `a` = 0, rank `1` = 0).
//! Name tables are built once at first use and reused for every lookup.

use std::fmt;
use std::sync::LazyLock;

use strum::FromRepr;

/// One of the eight files, `a`..`h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, FromRepr)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

/// One of the eight ranks, `1`..`8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, FromRepr)]
#[repr(u8)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl File {
    #[inline]
    pub fn ix(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: u8) -> Option<Self> {
        Self::from_repr(i)
    }

    #[inline]
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_lowercase() && ('a'..='h').contains(&c) {
            Self::from_repr(c as u8 - b'a')
        } else {
            None
        }
    }

    #[inline]
    pub fn to_char(self) -> char {
        (b'a' + self.ix() as u8) as char
    }
}

impl Rank {
    #[inline]
    pub fn ix(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(i: u8) -> Option<Self> {
        Self::from_repr(i)
    }

    #[inline]
    pub fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_digit() && ('1'..='8').contains(&c) {
            Self::from_repr(c as u8 - b'1')
        } else {
            None
        }
    }

    #[inline]
    pub fn to_char(self) -> char {
        (b'1' + self.ix() as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_char().to_string())
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_char().to_string())
    }
}

/// An index in `0..64`: `rank * 8 + file`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Square(u8);

struct SquareNames {
    by_index: [String; 64],
}

static SQUARE_NAMES: LazyLock<SquareNames> = LazyLock::new(|| {
    let mut by_index: [String; 64] = std::array::from_fn(|_| String::new());
    for (i, slot) in by_index.iter_mut().enumerate() {
        let file = File::from_index((i % 8) as u8).unwrap();
        let rank = Rank::from_index((i / 8) as u8).unwrap();
        *slot = format!("{file}{rank}");
    }
    SquareNames { by_index }
});

impl Square {
    /// Build a square from raw file/rank indices, validating bounds.
    #[inline]
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Self(rank * 8 + file))
        } else {
            None
        }
    }

    #[inline]
    pub fn from_coords(file: File, rank: Rank) -> Self {
        Self(rank.ix() as u8 * 8 + file.ix() as u8)
    }

    #[inline]
    pub fn from_index(index: u8) -> Option<Self> {
        if index < 64 { Some(Self(index)) } else { None }
    }

    /// Build directly from an already-validated index. Only used internally
    /// where the index is known by construction to be in range.
    #[inline]
    pub(crate) fn from_index_unchecked(index: usize) -> Self {
        debug_assert!(index < 64);
        Self(index as u8)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn file(self) -> File {
        File::from_index(self.0 % 8).unwrap()
    }

    #[inline]
    pub fn rank(self) -> Rank {
        Rank::from_index(self.0 / 8).unwrap()
    }

    /// Parse a two-character algebraic name such as `"e4"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let file = File::from_char(chars.next()?)?;
        let rank = Rank::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Self::from_coords(file, rank))
    }

    pub fn name(self) -> &'static str {
        SQUARE_NAMES.by_index[self.0 as usize].as_str()
    }

    /// Offset this square by `(df, dr)`, returning `None` on overflow.
    #[inline]
    pub fn offset(self, df: i8, dr: i8) -> Option<Self> {
        let file = self.file().ix() as i8 + df;
        let rank = self.rank().ix() as i8 + dr;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Self::new(file as u8, rank as u8)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_light(self) -> bool {
        (self.file().ix() + self.rank().ix()) % 2 == 1
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
