//! Demo art, stored exactly as it would sit in flash: packed rows, no header

/// Sprite strip dimensions
pub const SPRITE_WIDTH: u32 = 16;
pub const SPRITE_HEIGHT: u32 = 16;

pub const SPRITE_IMP: usize = 0;
pub const SPRITE_MEDKIT: usize = 1;

const SPRITE_COUNT: usize = 2;
const SPRITE_BYTES: usize = SPRITE_COUNT * SPRITE_HEIGHT as usize * 2;

#[rustfmt::skip]
const SPRITE_ROWS: [[u16; 16]; SPRITE_COUNT] = [
    // imp
    [0x07E0, 0x0FF0, 0x1998, 0x1998, 0x1FF8, 0x0C30, 0x07E0, 0x3BDC,
     0x7BDE, 0xFBDF, 0xDBDB, 0xDBDB, 0x1BD8, 0x1C38, 0x1C38, 0x3C3C],
    // medkit
    [0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x3FFC, 0x2004,
     0x2184, 0x27E4, 0x27E4, 0x2184, 0x2184, 0x2004, 0x2004, 0x3FFC],
];

#[rustfmt::skip]
const MASK_ROWS: [[u16; 16]; SPRITE_COUNT] = [
    [0x07E0, 0x0FF0, 0x1FF8, 0x1FF8, 0x1FF8, 0x0FF0, 0x07E0, 0x3FFC,
     0x7FFE, 0xFFFF, 0xDFFB, 0xDFFB, 0x1FF8, 0x1C38, 0x1C38, 0x3C3C],
    [0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x3FFC, 0x3FFC,
     0x3FFC, 0x3FFC, 0x3FFC, 0x3FFC, 0x3FFC, 0x3FFC, 0x3FFC, 0x3FFC],
];

const fn pack_rows(rows: &[[u16; 16]; SPRITE_COUNT]) -> [u8; SPRITE_BYTES] {
    let mut out = [0u8; SPRITE_BYTES];
    let mut s = 0;
    while s < SPRITE_COUNT {
        let mut r = 0;
        while r < 16 {
            let [hi, lo] = rows[s][r].to_be_bytes();
            out[(s * 16 + r) * 2] = hi;
            out[(s * 16 + r) * 2 + 1] = lo;
            r += 1;
        }
        s += 1;
    }
    out
}

pub static SPRITES: [u8; SPRITE_BYTES] = pack_rows(&SPRITE_ROWS);
pub static SPRITES_MASK: [u8; SPRITE_BYTES] = pack_rows(&MASK_ROWS);

/// 8x7 heart for the health readout
pub static HEART: [u8; 7] = [0x66, 0xFF, 0xFF, 0xFF, 0x7E, 0x3C, 0x18];
pub const HEART_WIDTH: u32 = 8;
pub const HEART_HEIGHT: u32 = 7;
