//! Tiny HUD font
//!
//! 3x5 glyphs in 4x6 cells, packed two glyphs per byte the same way the
//! panel assets are stored: one byte row per scanline, even glyphs in the
//! high nibble, odd glyphs in the low nibble, leftmost pixel in the MSB.

use super::Framebuffer;

pub const CHAR_WIDTH: u32 = 4;
pub const CHAR_HEIGHT: u32 = 6;

/// Characters in glyph order. Lookup is a linear scan, lowercase is folded.
pub const CHAR_MAP: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ.,:!?-+/%'() ";

const GLYPH_COUNT: usize = CHAR_MAP.len();
/// Bytes per scanline of the packed font
pub const FONT_STRIDE: usize = GLYPH_COUNT.div_ceil(2);

// 3-bit rows, top to bottom. Row 6 of every cell is blank.
#[rustfmt::skip]
const GLYPHS: [[u8; 5]; GLYPH_COUNT] = [
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b010, 0b110, 0b010, 0b010, 0b111], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b111, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b010, 0b010, 0b010], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
    [0b010, 0b101, 0b111, 0b101, 0b101], // A
    [0b110, 0b101, 0b110, 0b101, 0b110], // B
    [0b011, 0b100, 0b100, 0b100, 0b011], // C
    [0b110, 0b101, 0b101, 0b101, 0b110], // D
    [0b111, 0b100, 0b110, 0b100, 0b111], // E
    [0b111, 0b100, 0b110, 0b100, 0b100], // F
    [0b011, 0b100, 0b101, 0b101, 0b011], // G
    [0b101, 0b101, 0b111, 0b101, 0b101], // H
    [0b111, 0b010, 0b010, 0b010, 0b111], // I
    [0b001, 0b001, 0b001, 0b101, 0b010], // J
    [0b101, 0b101, 0b110, 0b101, 0b101], // K
    [0b100, 0b100, 0b100, 0b100, 0b111], // L
    [0b101, 0b111, 0b111, 0b101, 0b101], // M
    [0b110, 0b101, 0b101, 0b101, 0b101], // N
    [0b010, 0b101, 0b101, 0b101, 0b010], // O
    [0b110, 0b101, 0b110, 0b100, 0b100], // P
    [0b010, 0b101, 0b101, 0b110, 0b011], // Q
    [0b110, 0b101, 0b110, 0b101, 0b101], // R
    [0b011, 0b100, 0b010, 0b001, 0b110], // S
    [0b111, 0b010, 0b010, 0b010, 0b010], // T
    [0b101, 0b101, 0b101, 0b101, 0b111], // U
    [0b101, 0b101, 0b101, 0b101, 0b010], // V
    [0b101, 0b101, 0b111, 0b111, 0b101], // W
    [0b101, 0b101, 0b010, 0b101, 0b101], // X
    [0b101, 0b101, 0b010, 0b010, 0b010], // Y
    [0b111, 0b001, 0b010, 0b100, 0b111], // Z
    [0b000, 0b000, 0b000, 0b000, 0b010], // .
    [0b000, 0b000, 0b000, 0b010, 0b100], // ,
    [0b000, 0b010, 0b000, 0b010, 0b000], // :
    [0b010, 0b010, 0b010, 0b000, 0b010], // !
    [0b110, 0b001, 0b010, 0b000, 0b010], // ?
    [0b000, 0b000, 0b111, 0b000, 0b000], // -
    [0b000, 0b010, 0b111, 0b010, 0b000], // +
    [0b001, 0b001, 0b010, 0b100, 0b100], // /
    [0b101, 0b001, 0b010, 0b100, 0b101], // %
    [0b010, 0b010, 0b000, 0b000, 0b000], // '
    [0b001, 0b010, 0b010, 0b010, 0b001], // (
    [0b100, 0b010, 0b010, 0b010, 0b100], // )
    [0b000, 0b000, 0b000, 0b000, 0b000], // space
];

const fn pack_font() -> [u8; FONT_STRIDE * CHAR_HEIGHT as usize] {
    let mut out = [0u8; FONT_STRIDE * CHAR_HEIGHT as usize];
    let mut c = 0;
    while c < GLYPH_COUNT {
        let mut line = 0;
        while line < 5 {
            let nibble = GLYPHS[c][line] << 1;
            let idx = line * FONT_STRIDE + c / 2;
            out[idx] |= if c % 2 == 0 { nibble << 4 } else { nibble };
            line += 1;
        }
        c += 1;
    }
    out
}

/// Packed font blob, `CHAR_HEIGHT` rows of `FONT_STRIDE` bytes
pub static FONT: [u8; FONT_STRIDE * CHAR_HEIGHT as usize] = pack_font();

/// Glyph index of a character, or `None` if the font lacks it
pub fn glyph_index(ch: char) -> Option<usize> {
    if !ch.is_ascii() {
        return None;
    }
    let ch = ch.to_ascii_uppercase() as u8;
    CHAR_MAP.iter().position(|&c| c == ch)
}

/// Read pixel `n` (0 = leftmost) of scanline `line` of a glyph
#[inline]
pub fn glyph_pixel(index: usize, line: u32, n: u32) -> bool {
    let b = FONT[line as usize * FONT_STRIDE + index / 2];
    let bit = if index % 2 == 0 { n } else { 4 + n };
    b & (0x80 >> bit) != 0
}

/// Draw a single character with its top-left corner at (x, y).
/// Characters missing from the font draw nothing.
pub fn draw_char(buffer: &mut Framebuffer, x: i32, y: i32, ch: char) {
    let Some(index) = glyph_index(ch) else {
        return;
    };
    for line in 0..CHAR_HEIGHT {
        for n in 0..CHAR_WIDTH {
            if glyph_pixel(index, line, n) {
                buffer.set_pixel(x + n as i32, y + line as i32, true);
            }
        }
    }
}

/// Draw a string, advancing `CHAR_WIDTH + spacing` per character.
/// Stops once the cursor passes the right edge of the screen.
pub fn draw_text(buffer: &mut Framebuffer, x: i32, y: i32, text: &str, spacing: u32) {
    let mut pos = x;
    for ch in text.chars() {
        draw_char(buffer, pos, y, ch);
        pos += (CHAR_WIDTH + spacing) as i32;
        if pos > buffer.width() as i32 {
            return;
        }
    }
}

/// Draw an integer of at most 3 characters (clamped to -99..=999)
pub fn draw_number(buffer: &mut Framebuffer, x: i32, y: i32, num: i32) {
    let mut digits = [0u8; 3];
    let len = format_number(num, &mut digits);
    for (i, &d) in digits[..len].iter().enumerate() {
        draw_char(buffer, x + (i as u32 * (CHAR_WIDTH + 1)) as i32, y, d as char);
    }
}

/// Width in pixels of `text` drawn with `spacing`
pub fn text_width(text: &str, spacing: u32) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        return 0;
    }
    n * CHAR_WIDTH + (n - 1) * spacing
}

fn format_number(num: i32, out: &mut [u8; 3]) -> usize {
    let num = num.clamp(-99, 999);
    let mut value = num.unsigned_abs();
    let mut tmp = [0u8; 3];
    let mut n = 0;
    loop {
        tmp[n] = b'0' + (value % 10) as u8;
        n += 1;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    let mut len = 0;
    if num < 0 {
        out[0] = b'-';
        len = 1;
    }
    while n > 0 {
        n -= 1;
        out[len] = tmp[n];
        len += 1;
    }
    len
}
