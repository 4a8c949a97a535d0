use monoray::display::{draw_text, Framebuffer};
use monoray::effects::{column_offset, Melt};
use monoray::timing::ManualClock;
use monoray::{Clock, DisplayDriver, FramePacer, RenderConfig, Renderer, SpriteSheet};

// ── Helpers ───────────────────────────────────────────────────────────────

static SOLID: [u8; 8] = [0xFF; 8];

/// Display that keeps a copy of every flushed frame
#[derive(Default)]
struct RecordingDisplay {
    frames: Vec<Vec<u8>>,
}

impl DisplayDriver for RecordingDisplay {
    fn flush(&mut self, buffer: &Framebuffer) -> Result<(), String> {
        self.frames.push(buffer.as_bytes().to_vec());
        Ok(())
    }
}

fn renderer() -> Renderer {
    Renderer::new(RenderConfig::default()).unwrap()
}

/// Left half of the view is a near wall, right half a far one
fn draw_two_walls(r: &mut Renderer) {
    let max = r.shader().max_level();
    for x in (0..64).step_by(2) {
        r.draw_wall_column(x, 10, 45, max, 1.5);
    }
    for x in (64..128).step_by(2) {
        r.draw_wall_column(x, 20, 35, 2, 6.0);
    }
}

// ── Frame composition ─────────────────────────────────────────────────────

#[test]
fn sprite_behind_near_wall_is_hidden_but_visible_before_far_wall() {
    let mut r = renderer();
    let sheet = SpriteSheet::new(&SOLID, &SOLID, 8, 8).unwrap();
    r.begin_frame();
    draw_two_walls(&mut r);
    let walls = r.framebuffer().as_bytes().to_vec();

    r.draw_sprite(20, 24, &sheet, 0, 3.0);
    assert_eq!(r.framebuffer().as_bytes(), &walls[..]);

    r.draw_sprite(90, 24, &sheet, 0, 1.0);
    assert!((90..98).all(|x| (24..32).all(|y| r.framebuffer().get_pixel(x, y))));
}

#[test]
fn hud_rows_survive_the_wall_pass() {
    let mut r = renderer();
    r.begin_frame();
    r.draw_text(0, 58, "HP 100", 1);
    let hud: Vec<u8> = r.framebuffer().as_bytes()[7 * 128..].to_vec();
    draw_two_walls(&mut r);
    for x in 0..128 {
        r.draw_vline(x, 0, 63, r.shader().max_level());
    }
    assert_eq!(&r.framebuffer().as_bytes()[7 * 128..], &hud[..]);
}

#[test]
fn begin_frame_resets_occlusion() {
    let mut r = renderer();
    let sheet = SpriteSheet::new(&SOLID, &SOLID, 8, 8).unwrap();
    draw_two_walls(&mut r);
    r.begin_frame();
    r.draw_sprite(20, 24, &sheet, 0, 3.0);
    assert!(r.framebuffer().as_bytes().iter().any(|&b| b != 0));
}

// ── Transition ────────────────────────────────────────────────────────────

#[test_log::test]
fn melt_streams_every_frame_and_ends_black() {
    let mut r = renderer();
    draw_two_walls(&mut r);
    let config = r.config().clone();
    let mut pacer = FramePacer::with_clock(ManualClock::new(), config.frame_time_ms);
    let mut display = RecordingDisplay::default();

    Melt::from_config(&config)
        .run(r.framebuffer_mut(), &mut pacer, &mut display)
        .unwrap();

    assert_eq!(display.frames.len(), config.melt_frames as usize);
    assert_ne!(display.frames[0], display.frames[1]);
    assert!(display.frames.last().unwrap().iter().all(|&b| b == 0));
    assert!((pacer.clock_mut().millis() - 30.0 * config.frame_time_ms).abs() < 1e-6);
}

#[test]
fn melt_columns_start_falling_after_their_offset() {
    let mut fb = Framebuffer::new();
    draw_text(&mut fb, 0, 0, "MELT MELT MELT", 1);
    let mut before = Framebuffer::new();
    before.as_bytes_mut().copy_from_slice(fb.as_bytes());
    let mut melt = Melt::new(6, 30);

    // Every offset is at least one frame
    melt.step(&mut fb);
    assert_eq!(fb.as_bytes(), before.as_bytes());

    melt.step(&mut fb);
    for x in 0..128i32 {
        let shift = if column_offset(x as u32) <= 1 { 6 } else { 0 };
        for y in 0..64 {
            let expected = y >= shift && before.get_pixel(x, y - shift);
            assert_eq!(fb.get_pixel(x, y), expected, "column {x} row {y}");
        }
    }
}
