//! Precomputed movement and attack bitboards.
//!
//! Leaper tables (knight, king, pawn pushes and captures) are plain per-square
//! arrays. Sliding pieces use an enumerated-subset lookup: for every square,
//! every subset of the relevant blocker squares on its rays is enumerated and
//! the exact ray-cast attack set is stored in a dense array indexed by the
//! square's table offset plus the blocker bits compacted into `0..2^k`.

use std::sync::OnceLock;

use crate::game_state::chess_types::*;

pub const EAST: usize = 0;
pub const NORTH: usize = 1;
pub const WEST: usize = 2;
pub const SOUTH: usize = 3;
pub const NORTH_EAST: usize = 4;
pub const NORTH_WEST: usize = 5;
pub const SOUTH_EAST: usize = 6;
pub const SOUTH_WEST: usize = 7;

/// Square-index step for each direction, `E, N, W, S, NE, NW, SE, SW`.
pub const DIRECTION_OFFSETS: [i8; 8] = [1, 8, -1, -8, 9, 7, -7, -9];

pub const ORTHOGONAL_DIRECTIONS: [usize; 4] = [EAST, NORTH, WEST, SOUTH];
pub const DIAGONAL_DIRECTIONS: [usize; 4] = [NORTH_EAST, NORTH_WEST, SOUTH_EAST, SOUTH_WEST];

#[inline]
pub const fn is_diagonal(direction: usize) -> bool {
    direction >= NORTH_EAST
}

/// Blocker-indexed attack sets for one slider type.
struct SlidingTable {
    masks: [u64; 64],
    offsets: [usize; 64],
    attacks: Vec<u64>,
}

impl SlidingTable {
    fn build(distances: &[[u8; 8]; 64], directions: [usize; 4]) -> Self {
        let mut masks = [0u64; 64];
        let mut offsets = [0usize; 64];
        let mut attacks = Vec::new();

        for square in 0..64u8 {
            let mask = relevant_mask(distances, square, directions);
            masks[square as usize] = mask;
            offsets[square as usize] = attacks.len();

            let subsets = 1usize << mask.count_ones();
            for pattern in 0..subsets {
                let blockers = deposit_bits(pattern, mask);
                attacks.push(cast_rays(distances, square, directions, blockers));
            }
        }

        Self {
            masks,
            offsets,
            attacks,
        }
    }

    #[inline]
    fn lookup(&self, square: Square, occupancy: u64) -> u64 {
        let mask = self.masks[square as usize];
        self.attacks[self.offsets[square as usize] + compact_bits(occupancy, mask)]
    }
}

/// Immutable per-square tables, built once before any search.
pub struct AttackTables {
    knight: [u64; 64],
    king: [u64; 64],
    // [color][square]
    pawn_pushes: [[u64; 64]; 2],
    pawn_captures: [[u64; 64]; 2],
    distances: [[u8; 8]; 64],
    // [direction][square]
    rays: [[u64; 64]; 8],
    rook: SlidingTable,
    bishop: SlidingTable,
}

static SHARED: OnceLock<AttackTables> = OnceLock::new();

impl AttackTables {
    pub fn new() -> Self {
        let distances = compute_distances();

        let mut rays = [[0u64; 64]; 8];
        for (direction, ray_table) in rays.iter_mut().enumerate() {
            for square in 0..64u8 {
                ray_table[square as usize] = cast_ray(&distances, square, direction, 0);
            }
        }

        let mut knight = [0u64; 64];
        let mut king = [0u64; 64];
        let mut pawn_pushes = [[0u64; 64]; 2];
        let mut pawn_captures = [[0u64; 64]; 2];
        for square in 0..64u8 {
            let sq = square as usize;
            knight[sq] = leaper_mask(
                square,
                &[(1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2)],
            );
            king[sq] = leaper_mask(
                square,
                &[(1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1)],
            );

            let rank = rank_of(square);
            let light = Color::Light.index();
            let dark = Color::Dark.index();
            pawn_captures[light][sq] = leaper_mask(square, &[(-1, 1), (1, 1)]);
            pawn_captures[dark][sq] = leaper_mask(square, &[(-1, -1), (1, -1)]);
            pawn_pushes[light][sq] = leaper_mask(square, &[(0, 1)])
                | if rank == 1 { leaper_mask(square, &[(0, 2)]) } else { 0 };
            pawn_pushes[dark][sq] = leaper_mask(square, &[(0, -1)])
                | if rank == 6 { leaper_mask(square, &[(0, -2)]) } else { 0 };
        }

        let rook = SlidingTable::build(&distances, ORTHOGONAL_DIRECTIONS);
        let bishop = SlidingTable::build(&distances, DIAGONAL_DIRECTIONS);
        log::debug!(
            "built attack tables: {} rook entries, {} bishop entries",
            rook.attacks.len(),
            bishop.attacks.len()
        );

        Self {
            knight,
            king,
            pawn_pushes,
            pawn_captures,
            distances,
            rays,
            rook,
            bishop,
        }
    }

    /// Tables shared by every generator and engine in the process.
    pub fn shared() -> &'static AttackTables {
        SHARED.get_or_init(AttackTables::new)
    }

    #[inline]
    pub fn knight_attacks(&self, square: Square) -> u64 {
        self.knight[square as usize]
    }

    #[inline]
    pub fn king_attacks(&self, square: Square) -> u64 {
        self.king[square as usize]
    }

    /// Single push plus the double push from the starting rank, ignoring blockers.
    #[inline]
    pub fn pawn_pushes(&self, color: Color, square: Square) -> u64 {
        self.pawn_pushes[color.index()][square as usize]
    }

    #[inline]
    pub fn pawn_captures(&self, color: Color, square: Square) -> u64 {
        self.pawn_captures[color.index()][square as usize]
    }

    /// Number of squares between `square` and the board edge in `direction`.
    #[inline]
    pub fn distance_to_edge(&self, square: Square, direction: usize) -> u8 {
        self.distances[square as usize][direction]
    }

    /// Every square from `square` (exclusive) to the edge in `direction`.
    #[inline]
    pub fn ray(&self, square: Square, direction: usize) -> u64 {
        self.rays[direction][square as usize]
    }

    #[inline]
    pub fn rook_attacks(&self, square: Square, occupancy: u64) -> u64 {
        self.rook.lookup(square, occupancy)
    }

    #[inline]
    pub fn bishop_attacks(&self, square: Square, occupancy: u64) -> u64 {
        self.bishop.lookup(square, occupancy)
    }

    #[inline]
    pub fn queen_attacks(&self, square: Square, occupancy: u64) -> u64 {
        self.rook_attacks(square, occupancy) | self.bishop_attacks(square, occupancy)
    }

    /// Empty-board rook rays, edge squares excluded.
    #[inline]
    pub fn rook_mask(&self, square: Square) -> u64 {
        self.rook.masks[square as usize]
    }

    /// Empty-board bishop rays, edge squares excluded.
    #[inline]
    pub fn bishop_mask(&self, square: Square) -> u64 {
        self.bishop.masks[square as usize]
    }

    /// Attack set of a non-pawn piece.
    #[inline]
    pub fn piece_attacks(&self, kind: PieceKind, color: Color, square: Square, occupancy: u64) -> u64 {
        match kind {
            PieceKind::Pawn => self.pawn_captures(color, square),
            PieceKind::Knight => self.knight_attacks(square),
            PieceKind::Bishop => self.bishop_attacks(square, occupancy),
            PieceKind::Rook => self.rook_attacks(square, occupancy),
            PieceKind::Queen => self.queen_attacks(square, occupancy),
            PieceKind::King => self.king_attacks(square),
        }
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AttackTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttackTables")
            .field("rook_entries", &self.rook.attacks.len())
            .field("bishop_entries", &self.bishop.attacks.len())
            .finish_non_exhaustive()
    }
}

fn compute_distances() -> [[u8; 8]; 64] {
    let mut distances = [[0u8; 8]; 64];
    for square in 0..64u8 {
        let file = file_of(square);
        let rank = rank_of(square);
        let east = 7 - file;
        let north = 7 - rank;
        let west = file;
        let south = rank;
        distances[square as usize] = [
            east,
            north,
            west,
            south,
            east.min(north),
            west.min(north),
            east.min(south),
            west.min(south),
        ];
    }
    distances
}

fn leaper_mask(square: Square, deltas: &[(i8, i8)]) -> u64 {
    let file = file_of(square) as i8;
    let rank = rank_of(square) as i8;
    deltas
        .iter()
        .filter_map(|&(df, dr)| {
            let (f, r) = (file + df, rank + dr);
            ((0..8).contains(&f) && (0..8).contains(&r)).then(|| 1u64 << (r * 8 + f))
        })
        .fold(0u64, |acc, bit| acc | bit)
}

#[inline]
fn step(square: Square, direction: usize, count: u8) -> Square {
    (square as i16 + DIRECTION_OFFSETS[direction] as i16 * count as i16) as Square
}

/// Walk one ray, stopping on (and including) the first blocker.
fn cast_ray(distances: &[[u8; 8]; 64], square: Square, direction: usize, blockers: u64) -> u64 {
    let mut attacks = 0u64;
    for t in 1..=distances[square as usize][direction] {
        let bit = 1u64 << step(square, direction, t);
        attacks |= bit;
        if blockers & bit != 0 {
            break;
        }
    }
    attacks
}

fn cast_rays(
    distances: &[[u8; 8]; 64],
    square: Square,
    directions: [usize; 4],
    blockers: u64,
) -> u64 {
    directions
        .iter()
        .fold(0u64, |acc, &dir| acc | cast_ray(distances, square, dir, blockers))
}

/// Ray squares whose occupancy can change the attack set (edges excluded).
fn relevant_mask(distances: &[[u8; 8]; 64], square: Square, directions: [usize; 4]) -> u64 {
    let mut mask = 0u64;
    for dir in directions {
        for t in 1..distances[square as usize][dir] {
            mask |= 1u64 << step(square, dir, t);
        }
    }
    mask
}

/// Spread the low bits of `pattern` over the set bits of `mask`.
fn deposit_bits(pattern: usize, mask: u64) -> u64 {
    let mut out = 0u64;
    let mut remaining = mask;
    let mut bit = 0;
    while remaining != 0 {
        let square = remaining.trailing_zeros();
        if (pattern >> bit) & 1 != 0 {
            out |= 1u64 << square;
        }
        bit += 1;
        remaining &= remaining - 1;
    }
    out
}

/// Gather the bits of `occupancy` under `mask` into a dense index.
#[inline]
fn compact_bits(occupancy: u64, mask: u64) -> usize {
    let mut index = 0usize;
    let mut remaining = mask;
    let mut bit = 0;
    while remaining != 0 {
        let square = remaining.trailing_zeros();
        if (occupancy >> square) & 1 != 0 {
            index |= 1 << bit;
        }
        bit += 1;
        remaining &= remaining - 1;
    }
    index
}
