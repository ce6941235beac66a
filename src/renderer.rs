//! Canvas2D rendering of the play area
//!
//! Draws read-only snapshots of the session: sky, clouds, particles and the
//! falling letter tiles. HUD text (score, level, progress, status line)
//! lives in the DOM and is updated by the entry point instead.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::Settings;
use crate::consts::*;
use crate::sim::GameState;

/// Tile palette, indexed by the letter's code point
const TILE_COLORS: [&str; 7] = [
    "#f87171", "#fb923c", "#facc15", "#4ade80", "#60a5fa", "#c084fc", "#f472b6",
];

/// Fill color for a letter tile
fn letter_color(letter: char) -> &'static str {
    TILE_COLORS[letter as usize % TILE_COLORS.len()]
}

/// Canvas renderer for the play area
pub struct Renderer {
    ctx: CanvasRenderingContext2d,
}

impl Renderer {
    /// Wrap a canvas element. `dpr` scales logical pixels to device pixels.
    pub fn new(canvas: &HtmlCanvasElement, dpr: f64) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        ctx.scale(dpr, dpr).ok()?;
        Some(Self { ctx })
    }

    /// Draw one frame from the current session snapshot
    pub fn render(&self, state: &GameState, settings: &Settings) {
        self.draw_sky();
        if settings.clouds {
            self.draw_clouds(state);
        }
        if settings.particles {
            self.draw_particles(state);
        }
        self.draw_tiles(state, settings.reduced_motion);
    }

    /// Sky-to-grass gradient backdrop
    fn draw_sky(&self) {
        let w = PLAY_WIDTH as f64;
        let h = PLAY_HEIGHT as f64;
        let gradient = self.ctx.create_linear_gradient(0.0, 0.0, 0.0, h);
        let _ = gradient.add_color_stop(0.0, "#87CEEB");
        let _ = gradient.add_color_stop(0.7, "#98FB98");
        let _ = gradient.add_color_stop(1.0, "#90EE90");
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }

    fn draw_clouds(&self, state: &GameState) {
        self.ctx.set_global_alpha(0.6);
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        for cloud in &state.clouds {
            self.ctx.set_font(&format!("{}px serif", cloud.size as u32));
            let _ = self
                .ctx
                .fill_text("☁️", cloud.pos.x as f64, cloud.pos.y as f64);
        }
        self.ctx.set_global_alpha(1.0);
    }

    fn draw_particles(&self, state: &GameState) {
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        for particle in &state.particles {
            let size = (particle.size * particle.life).max(1.0) as u32;
            self.ctx.set_global_alpha(particle.life.clamp(0.0, 1.0) as f64);
            self.ctx.set_font(&format!("{size}px serif"));
            let glyph = if particle.sparkle { "✨" } else { "💥" };
            let _ = self
                .ctx
                .fill_text(glyph, particle.pos.x as f64, particle.pos.y as f64);
        }
        self.ctx.set_global_alpha(1.0);
    }

    fn draw_tiles(&self, state: &GameState, reduced_motion: bool) {
        let half = (TILE_SIZE / 2.0) as f64;
        for tile in &state.tiles {
            self.ctx.save();
            let _ = self
                .ctx
                .translate(tile.pos.x as f64 + half, tile.pos.y as f64 + half);
            if !reduced_motion {
                let _ = self.ctx.rotate(tile.rotation as f64);
            }

            self.ctx.set_fill_style_str(letter_color(tile.letter));
            self.ctx.fill_rect(-half, -half, TILE_SIZE as f64, TILE_SIZE as f64);
            self.ctx.set_stroke_style_str("#ffffff");
            self.ctx.set_line_width(3.0);
            self.ctx
                .stroke_rect(-half, -half, TILE_SIZE as f64, TILE_SIZE as f64);

            self.ctx.set_fill_style_str("#ffffff");
            self.ctx.set_font("bold 24px sans-serif");
            self.ctx.set_text_align("center");
            self.ctx.set_text_baseline("middle");
            // Render the space tile visibly
            let glyph = if tile.letter == ' ' {
                String::from("␣")
            } else {
                tile.letter.to_string()
            };
            let _ = self.ctx.fill_text(&glyph, 0.0, 0.0);

            self.ctx.restore();
        }
    }
}
