use monoray::demo::{Controls, Demo};
use monoray::display::{Display, InputEvent};
use monoray::{DisplayDriver, FramePacer, Melt, RenderConfig, Renderer};
use sdl2::keyboard::Keycode;

const DEFAULT_SCALE: u32 = 6;
const DEFAULT_SEED: u64 = 1337;

struct Options {
    scale: u32,
    seed: u64,
    config: Option<String>,
}

/// Parse command line arguments
fn parse_args() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let mut options = Options {
        scale: DEFAULT_SCALE,
        seed: DEFAULT_SEED,
        config: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--scale" | "-s" => {
                if let Some(s) = args.get(i + 1).and_then(|v| v.parse::<u32>().ok()) {
                    options.scale = s.max(1);
                }
                i += 1;
            },
            "--seed" => {
                if let Some(s) = args.get(i + 1).and_then(|v| v.parse::<u64>().ok()) {
                    options.seed = s;
                }
                i += 1;
            },
            "--config" | "-c" => {
                options.config = args.get(i + 1).cloned();
                i += 1;
            },
            "--help" => {
                println!("Usage: monoray [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --scale N, -s N       Window pixels per panel pixel (default: {DEFAULT_SCALE})");
                println!("  --seed N              Maze seed (default: {DEFAULT_SEED})");
                println!("  --config FILE, -c FILE  Panel geometry as JSON");
                println!("  --help                Show this help message");
                println!();
                println!("Keys: arrows/WASD move, M melt, Esc quit");
                std::process::exit(0);
            },
            other => log::warn!("ignoring unknown argument {other}"),
        }
        i += 1;
    }

    options
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args();
    let config = match &options.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };

    let mut display = Display::new(
        "monoray",
        config.screen_width,
        config.screen_height,
        options.scale,
    )?;
    let mut pacer = FramePacer::new(config.frame_time_ms);
    let mut renderer = Renderer::new(config.clone())?;
    let mut demo = Demo::new(options.seed);
    let mut controls = Controls::default();

    'main: loop {
        let mut melt_requested = false;
        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(Keycode::M) => melt_requested = true,
                InputEvent::KeyDown(k) => set_key(&mut controls, k, true),
                InputEvent::KeyUp(k) => set_key(&mut controls, k, false),
            }
        }

        if melt_requested {
            Melt::from_config(&config).run(renderer.framebuffer_mut(), &mut pacer, &mut display)?;
            demo = Demo::new(options.seed.wrapping_add(pacer.frames()));
            controls = Controls::default();
            continue;
        }

        demo.update(controls, pacer.delta() as f32);
        demo.render(&mut renderer, pacer.actual_fps());
        display.flush(renderer.framebuffer())?;
        pacer.wait();
    }

    Ok(())
}

fn set_key(controls: &mut Controls, key: Keycode, down: bool) {
    match key {
        Keycode::Up | Keycode::W => controls.forward = down,
        Keycode::Down | Keycode::S => controls.back = down,
        Keycode::Left | Keycode::A => controls.left = down,
        Keycode::Right | Keycode::D => controls.right = down,
        _ => {},
    }
}
