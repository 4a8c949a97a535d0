//! Demo maze for the simulator
//!
//! Plays the part of the game: owns a procedurally generated maze, a player
//! and a handful of entities, and turns them into renderer calls each frame.
//! DDA grid-stepping raycaster, one ray per `res_divider` columns, entities
//! drawn back to front and culled by the depth buffer.

pub mod assets;

use crate::render::{Renderer, SpriteSheet};
use crate::util::Rng;
use assets::{
    HEART, HEART_HEIGHT, HEART_WIDTH, SPRITES, SPRITES_MASK, SPRITE_HEIGHT, SPRITE_IMP,
    SPRITE_MEDKIT, SPRITE_WIDTH,
};

const MAP_SIZE: usize = 16;
const ROT_SPEED: f32 = 0.12;
const MOV_SPEED: f32 = 0.2;
const WALL_COLLIDER_DIST: f32 = 0.2;
/// Field of view half-width on the camera plane
const PLANE_SCALE: f32 = 0.66;
const ENTITY_COUNT: usize = 6;

/// Buttons held this frame
#[derive(Debug, Default, Clone, Copy)]
pub struct Controls {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Clone, Copy)]
struct Entity {
    x: f32,
    y: f32,
    sprite: usize,
}

pub struct Demo {
    map: Vec<u8>,
    player_x: f32,
    player_y: f32,
    angle: f32,
    health: i32,
    entities: Vec<Entity>,
    sprites: SpriteSheet,
}

impl Demo {
    pub fn new(seed: u64) -> Self {
        let mut rng = Rng::new(seed);
        let map = generate_maze(&mut rng);
        let (sx, sy) = find_open_cell(&map);
        let angle = find_open_direction(&map, sx, sy);
        let entities = place_entities(&map, (sx, sy), &mut rng);
        log::debug!("demo maze seed {seed}: start ({sx}, {sy}), {} entities", entities.len());

        Self {
            map,
            player_x: sx as f32 + 0.5,
            player_y: sy as f32 + 0.5,
            angle,
            health: 100,
            entities,
            sprites: demo_sprites(),
        }
    }

    fn is_wall(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= MAP_SIZE as i32 || y >= MAP_SIZE as i32 {
            return true;
        }
        self.map[y as usize * MAP_SIZE + x as usize] == 1
    }

    #[inline]
    fn direction(&self) -> (f32, f32) {
        (self.angle.cos(), self.angle.sin())
    }

    #[inline]
    fn plane(&self) -> (f32, f32) {
        (-self.angle.sin() * PLANE_SCALE, self.angle.cos() * PLANE_SCALE)
    }

    /// Cast a ray along (rx, ry) and return the perpendicular distance to the
    /// first wall and whether it hit a north/south face
    fn cast_ray(&self, rx: f32, ry: f32) -> Option<(f32, bool)> {
        let mut map_x = self.player_x as i32;
        let mut map_y = self.player_y as i32;

        let delta_dist_x = if rx == 0.0 { f32::MAX } else { (1.0 / rx).abs() };
        let delta_dist_y = if ry == 0.0 { f32::MAX } else { (1.0 / ry).abs() };

        let (step_x, mut side_dist_x) = if rx < 0.0 {
            (-1, (self.player_x - map_x as f32) * delta_dist_x)
        } else {
            (1, (map_x as f32 + 1.0 - self.player_x) * delta_dist_x)
        };
        let (step_y, mut side_dist_y) = if ry < 0.0 {
            (-1, (self.player_y - map_y as f32) * delta_dist_y)
        } else {
            (1, (map_y as f32 + 1.0 - self.player_y) * delta_dist_y)
        };

        for _ in 0..MAP_SIZE * 2 {
            let y_side = if side_dist_x < side_dist_y {
                side_dist_x += delta_dist_x;
                map_x += step_x;
                false
            } else {
                side_dist_y += delta_dist_y;
                map_y += step_y;
                true
            };

            if self.is_wall(map_x, map_y) {
                let distance = if y_side {
                    (map_y as f32 - self.player_y + (1 - step_y) as f32 * 0.5) / ry
                } else {
                    (map_x as f32 - self.player_x + (1 - step_x) as f32 * 0.5) / rx
                };
                return Some((distance, y_side));
            }
        }
        None
    }

    /// Advance one frame; `delta` is the pacer's frame-time factor
    pub fn update(&mut self, controls: Controls, delta: f32) {
        if controls.left {
            self.angle -= ROT_SPEED * delta;
        }
        if controls.right {
            self.angle += ROT_SPEED * delta;
        }

        let step = match (controls.forward, controls.back) {
            (true, false) => MOV_SPEED * delta,
            (false, true) => -MOV_SPEED * delta,
            _ => return,
        };
        let (dx, dy) = self.direction();
        let reach = step.signum() * WALL_COLLIDER_DIST;

        let nx = self.player_x + dx * step;
        if !self.is_wall((nx + dx * reach) as i32, self.player_y as i32) {
            self.player_x = nx;
        }
        let ny = self.player_y + dy * step;
        if !self.is_wall(self.player_x as i32, (ny + dy * reach) as i32) {
            self.player_y = ny;
        }
    }

    /// Draw walls, entities and the HUD for the current frame
    pub fn render(&self, renderer: &mut Renderer, fps: f64) {
        renderer.begin_frame();
        self.render_walls(renderer);
        self.render_entities(renderer);
        self.render_hud(renderer, fps);
    }

    fn render_walls(&self, renderer: &mut Renderer) {
        let config = renderer.config().clone();
        let width = config.screen_width as f32;
        let half_view = config.render_height as f32 / 2.0;
        let max_depth = config.max_render_depth as f32;
        let (dir_x, dir_y) = self.direction();
        let (plane_x, plane_y) = self.plane();

        for x in (0..config.screen_width).step_by(config.res_divider as usize) {
            let camera_x = 2.0 * x as f32 / width - 1.0;
            let rx = dir_x + plane_x * camera_x;
            let ry = dir_y + plane_y * camera_x;

            let Some((distance, y_side)) = self.cast_ray(rx, ry) else {
                continue;
            };
            if distance > max_depth {
                continue;
            }
            let distance = distance.max(0.01);

            let line_height = config.render_height as f32 / distance;
            let start = (half_view - line_height / 2.0) as i32;
            let end = (half_view + line_height / 2.0) as i32;
            // Darken one face so corners read
            let level = renderer.wall_level(distance).saturating_sub(u8::from(y_side));
            renderer.draw_wall_column(x as i32, start, end, level, distance);
        }
    }

    fn render_entities(&self, renderer: &mut Renderer) {
        let width = renderer.config().screen_width as f32;
        let half_view = renderer.config().render_height as f32 / 2.0;
        let (dir_x, dir_y) = self.direction();
        let (plane_x, plane_y) = self.plane();
        let inv_det = 1.0 / (plane_x * dir_y - dir_x * plane_y);

        let mut visible: Vec<(f32, f32, usize)> = self
            .entities
            .iter()
            .filter_map(|e| {
                let rel_x = e.x - self.player_x;
                let rel_y = e.y - self.player_y;
                let tx = inv_det * (dir_y * rel_x - dir_x * rel_y);
                let depth = inv_det * (-plane_y * rel_x + plane_x * rel_y);
                (depth > 0.1).then(|| (depth, width / 2.0 * (1.0 + tx / depth), e.sprite))
            })
            .collect();
        // Back to front
        visible.sort_by(|a, b| b.0.total_cmp(&a.0));

        for (depth, screen_x, sprite) in visible {
            let size_x = SPRITE_WIDTH as f32 / depth;
            let size_y = SPRITE_HEIGHT as f32 / depth;
            renderer.draw_sprite(
                (screen_x - size_x / 2.0) as i32,
                (half_view - size_y / 2.0) as i32,
                &self.sprites,
                sprite,
                depth,
            );
        }
    }

    fn render_hud(&self, renderer: &mut Renderer, fps: f64) {
        let top = renderer.config().render_height as i32 + 1;
        let right = renderer.config().screen_width as i32;
        renderer.framebuffer_mut().clear_rect(0, top - 1, right as u32, 8);
        let brightness = renderer.shader().max_level();
        renderer.draw_bitmap(1, top, &HEART, HEART_WIDTH, HEART_HEIGHT, brightness);
        renderer.draw_number(11, top + 1, self.health);
        renderer.draw_text(right - 32, top + 1, "FPS", 1);
        renderer.draw_number(right - 16, top + 1, fps.round() as i32);
    }

    /// Player position and heading
    pub fn player(&self) -> (f32, f32, f32) {
        (self.player_x, self.player_y, self.angle)
    }
}

fn demo_sprites() -> SpriteSheet {
    // Built from fixed tables whose sizes are checked by the asset tests
    SpriteSheet::new(&SPRITES, &SPRITES_MASK, SPRITE_WIDTH, SPRITE_HEIGHT)
        .unwrap_or_else(|| unreachable!("sprite tables are a whole number of sprites"))
}

/// Open cell with the most open neighbors
fn find_open_cell(map: &[u8]) -> (usize, usize) {
    let mut best = (1, 1);
    let mut best_score = 0;

    for y in 1..MAP_SIZE - 1 {
        for x in 1..MAP_SIZE - 1 {
            if map[y * MAP_SIZE + x] != 0 {
                continue;
            }
            let score = [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]
                .iter()
                .filter(|&&(nx, ny)| map[ny * MAP_SIZE + nx] == 0)
                .count();
            if score > best_score {
                best_score = score;
                best = (x, y);
            }
        }
    }
    best
}

/// Heading down the longest open corridor from a cell
fn find_open_direction(map: &[u8], cx: usize, cy: usize) -> f32 {
    let dirs: [(i32, i32, f32); 4] = [
        (1, 0, 0.0),
        (0, 1, std::f32::consts::FRAC_PI_2),
        (-1, 0, std::f32::consts::PI),
        (0, -1, -std::f32::consts::FRAC_PI_2),
    ];

    let mut best_angle = 0.0_f32;
    let mut best_dist = 0;

    for &(dx, dy, angle) in &dirs {
        let mut dist = 0;
        let (mut x, mut y) = (cx as i32, cy as i32);
        loop {
            x += dx;
            y += dy;
            if x < 0 || y < 0 || x >= MAP_SIZE as i32 || y >= MAP_SIZE as i32 {
                break;
            }
            if map[y as usize * MAP_SIZE + x as usize] == 1 {
                break;
            }
            dist += 1;
        }
        if dist > best_dist {
            best_dist = dist;
            best_angle = angle;
        }
    }
    best_angle
}

/// Scatter imps and medkits over open cells away from the start
fn place_entities(map: &[u8], start: (usize, usize), rng: &mut Rng) -> Vec<Entity> {
    let open: Vec<(usize, usize)> = (0..MAP_SIZE * MAP_SIZE)
        .filter(|&i| map[i] == 0)
        .map(|i| (i % MAP_SIZE, i / MAP_SIZE))
        .filter(|&(x, y)| x.abs_diff(start.0) + y.abs_diff(start.1) > 2)
        .collect();
    if open.is_empty() {
        return Vec::new();
    }

    (0..ENTITY_COUNT)
        .map(|i| {
            let (x, y) = open[rng.below(open.len())];
            Entity {
                x: x as f32 + 0.5,
                y: y as f32 + 0.5,
                sprite: if i % 3 == 0 { SPRITE_MEDKIT } else { SPRITE_IMP },
            }
        })
        .collect()
}

/// Maze via recursive backtracker (iterative with explicit stack).
/// Cells sit on odd coordinates; the border is always wall.
fn generate_maze(rng: &mut Rng) -> Vec<u8> {
    let mut grid = vec![1u8; MAP_SIZE * MAP_SIZE];

    let cells = (MAP_SIZE - 1) / 2;
    let mut visited = vec![false; cells * cells];

    visited[0] = true;
    grid[MAP_SIZE + 1] = 0;
    let mut stack: Vec<(usize, usize)> = vec![(0, 0)];

    while let Some(&(cx, cy)) = stack.last() {
        let mut neighbors = Vec::with_capacity(4);
        if cx > 0 && !visited[cy * cells + cx - 1] {
            neighbors.push((cx - 1, cy));
        }
        if cx + 1 < cells && !visited[cy * cells + cx + 1] {
            neighbors.push((cx + 1, cy));
        }
        if cy > 0 && !visited[(cy - 1) * cells + cx] {
            neighbors.push((cx, cy - 1));
        }
        if cy + 1 < cells && !visited[(cy + 1) * cells + cx] {
            neighbors.push((cx, cy + 1));
        }

        if neighbors.is_empty() {
            stack.pop();
            continue;
        }

        let (nx, ny) = neighbors[rng.below(neighbors.len())];
        // Knock down the wall between the cells, then open the new cell
        grid[(cy + ny + 1) * MAP_SIZE + cx + nx + 1] = 0;
        grid[(ny * 2 + 1) * MAP_SIZE + nx * 2 + 1] = 0;

        visited[ny * cells + nx] = true;
        stack.push((nx, ny));
    }

    grid
}
