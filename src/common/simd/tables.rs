//! Shuffle tables shared by the compaction and insertion kernels.
//!
//! Both tables are built at compile time.

/// Lane index that selects nothing: `pshufb` zeroes the lane (high bit set)
/// and `tbl` zeroes it (index out of range).
pub const EMPTY_LANE: u8 = 0xFF;

/// For every 8-bit keep-mask, the indices of its set bits in ascending order.
///
/// Row `m` packs the lanes selected by `m` to the front; trailing entries are
/// [`EMPTY_LANE`]. `COMPRESS_TABLE[0b1010_0110]` is `[1, 2, 5, 7, 0xFF, ...]`.
pub static COMPRESS_TABLE: [[u8; 8]; 256] = build_compress_table();

/// Row `n` inserts one empty lane at position `n` of a 16-byte vector.
///
/// Lanes before `n` keep their index, lane `n` is [`EMPTY_LANE`], lanes after
/// `n` read from one position earlier; input lane 15 falls off the end.
pub static LINE_FEED_SHUFFLE: [[u8; 16]; 16] = build_line_feed_shuffle();

const fn build_compress_table() -> [[u8; 8]; 256] {
    let mut table = [[EMPTY_LANE; 8]; 256];
    let mut mask = 0;
    while mask < 256 {
        let mut out_idx = 0;
        let mut lane = 0;
        while lane < 8 {
            if (mask & (1 << lane)) != 0 {
                table[mask][out_idx] = lane as u8;
                out_idx += 1;
            }
            lane += 1;
        }
        mask += 1;
    }
    table
}

const fn build_line_feed_shuffle() -> [[u8; 16]; 16] {
    let mut table = [[0u8; 16]; 16];
    let mut n = 0;
    while n < 16 {
        let mut lane = 0;
        while lane < 16 {
            table[n][lane] = if lane < n {
                lane as u8
            } else if lane == n {
                EMPTY_LANE
            } else {
                (lane - 1) as u8
            };
            lane += 1;
        }
        n += 1;
    }
    table
}
