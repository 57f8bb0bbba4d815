//! Canvas 2D frame painter for the mini-game
//!
//! Reads [`GameState`] and draws one frame. Drawing goes through the
//! [`DrawSurface`] trait so frames can be recorded in tests.

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::{Bounds, GameState};

/// Colors for game elements
pub mod colors {
    pub const STAR: &str = "#38ef7d";
    pub const ORB: &str = "rgba(34,197,94,0.9)";
    pub const HAZARD: &str = "rgba(52,211,153,0.6)";
    pub const PLAYER: &str = "rgba(34,197,94,0.9)";
    pub const HUD: &str = "rgba(16, 185, 129, 0.9)";
}

const STAR_GLOW: f64 = 4.0;
const ORB_GLOW: f64 = 12.0;
const HAZARD_GLOW: f64 = 10.0;
const PLAYER_GLOW: f64 = 18.0;
const HAZARD_LINE_WIDTH: f64 = 2.0;
/// Extra height of the ship's nose above its collision circle
const PLAYER_NOSE: f32 = 4.0;

const HUD_FONT: &str = "600 14px Inter, ui-sans-serif, system-ui";
const HUD_POS: (f64, f64) = (16.0, 24.0);

/// Minimal immediate-mode drawing API (a subset of Canvas 2D)
pub trait DrawSurface {
    fn clear(&mut self, width: f64, height: f64);
    /// Shadow blur + shadow, fill and stroke color in one go
    fn set_glow(&mut self, blur: f64, color: &str);
    fn set_shadow_blur(&mut self, blur: f64);
    fn set_fill_color(&mut self, color: &str);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_line_width(&mut self, width: f64);
    fn set_font(&mut self, font: &str);
    fn begin_path(&mut self);
    /// Full circle path segment
    fn circle(&mut self, x: f64, y: f64, radius: f64);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
}

/// One procedurally placed background star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub alpha: f32,
    pub radius: f32,
}

/// Star `index` at time `time_ms`. Stars scroll downward and wrap.
pub fn star(index: usize, time_ms: f64, bounds: Bounds) -> Star {
    let i = index as f64;
    let x = (i * 23.0) % f64::from(bounds.width);
    let y = (i * 97.0 + time_ms * 0.05) % f64::from(bounds.height);
    Star {
        pos: Vec2::new(x as f32, y as f32),
        alpha: 0.25 + (index % 5) as f32 / 20.0,
        radius: 0.7 + (index % 3) as f32 * 0.3,
    }
}

/// Score overlay text
pub fn score_text(score: u64) -> String {
    format!("Score: {}", score)
}

/// Paint one full frame
pub fn render_frame<D: DrawSurface>(
    surface: &mut D,
    state: &GameState,
    time_ms: f64,
    settings: &Settings,
) {
    let bounds = state.bounds;
    surface.clear(f64::from(bounds.width), f64::from(bounds.height));

    draw_starfield(surface, bounds, time_ms, settings.quality.starfield_stars());
    draw_orbs(surface, state);
    draw_hazards(surface, state);
    draw_player(surface, state);

    if settings.show_score_overlay {
        surface.set_shadow_blur(0.0);
        surface.set_fill_color(colors::HUD);
        surface.set_font(HUD_FONT);
        surface.fill_text(&score_text(state.score), HUD_POS.0, HUD_POS.1);
    }
}

fn draw_starfield<D: DrawSurface>(surface: &mut D, bounds: Bounds, time_ms: f64, count: usize) {
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return;
    }
    for i in 0..count {
        let s = star(i, time_ms, bounds);
        surface.set_global_alpha(f64::from(s.alpha));
        surface.set_glow(STAR_GLOW, colors::STAR);
        surface.begin_path();
        surface.circle(f64::from(s.pos.x), f64::from(s.pos.y), f64::from(s.radius));
        surface.fill();
    }
    surface.set_global_alpha(1.0);
}

fn draw_orbs<D: DrawSurface>(surface: &mut D, state: &GameState) {
    surface.set_glow(ORB_GLOW, colors::ORB);
    for orb in &state.orbs {
        surface.begin_path();
        surface.circle(
            f64::from(orb.pos.x),
            f64::from(orb.pos.y),
            f64::from(orb.radius),
        );
        surface.fill();
    }
}

fn draw_hazards<D: DrawSurface>(surface: &mut D, state: &GameState) {
    surface.set_line_width(HAZARD_LINE_WIDTH);
    surface.set_glow(HAZARD_GLOW, colors::HAZARD);
    for hazard in &state.hazards {
        surface.begin_path();
        surface.circle(
            f64::from(hazard.pos.x),
            f64::from(hazard.pos.y),
            f64::from(hazard.radius),
        );
        surface.stroke();
    }
}

/// Upward-pointing triangle around the player's collision circle
pub fn ship_outline(pos: Vec2, radius: f32) -> [Vec2; 3] {
    [
        Vec2::new(pos.x, pos.y - radius - PLAYER_NOSE),
        Vec2::new(pos.x - radius, pos.y + radius),
        Vec2::new(pos.x + radius, pos.y + radius),
    ]
}

fn draw_player<D: DrawSurface>(surface: &mut D, state: &GameState) {
    let [nose, left, right] = ship_outline(state.player.pos, state.player.radius);
    surface.set_glow(PLAYER_GLOW, colors::PLAYER);
    surface.begin_path();
    surface.move_to(f64::from(nose.x), f64::from(nose.y));
    surface.line_to(f64::from(left.x), f64::from(left.y));
    surface.line_to(f64::from(right.x), f64::from(right.y));
    surface.close_path();
    surface.fill();
}

#[cfg(target_arch = "wasm32")]
impl DrawSurface for web_sys::CanvasRenderingContext2d {
    fn clear(&mut self, width: f64, height: f64) {
        self.clear_rect(0.0, 0.0, width, height);
    }

    fn set_glow(&mut self, blur: f64, color: &str) {
        web_sys::CanvasRenderingContext2d::set_shadow_blur(self, blur);
        self.set_shadow_color(color);
        self.set_stroke_style_str(color);
        self.set_fill_style_str(color);
    }

    fn set_shadow_blur(&mut self, blur: f64) {
        web_sys::CanvasRenderingContext2d::set_shadow_blur(self, blur);
    }

    fn set_fill_color(&mut self, color: &str) {
        self.set_fill_style_str(color);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        web_sys::CanvasRenderingContext2d::set_global_alpha(self, alpha);
    }

    fn set_line_width(&mut self, width: f64) {
        web_sys::CanvasRenderingContext2d::set_line_width(self, width);
    }

    fn set_font(&mut self, font: &str) {
        web_sys::CanvasRenderingContext2d::set_font(self, font);
    }

    fn begin_path(&mut self) {
        web_sys::CanvasRenderingContext2d::begin_path(self);
    }

    fn circle(&mut self, x: f64, y: f64, radius: f64) {
        // Only fails for negative radii
        let _ = self.arc(x, y, radius.max(0.0), 0.0, std::f64::consts::TAU);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        web_sys::CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        web_sys::CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn close_path(&mut self) {
        web_sys::CanvasRenderingContext2d::close_path(self);
    }

    fn fill(&mut self) {
        web_sys::CanvasRenderingContext2d::fill(self);
    }

    fn stroke(&mut self) {
        web_sys::CanvasRenderingContext2d::stroke(self);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let _ = web_sys::CanvasRenderingContext2d::fill_text(self, text, x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{HAZARD_COUNT, ORB_COUNT};
    use crate::settings::QualityPreset;

    #[derive(Debug, Clone, PartialEq)]
    enum Cmd {
        Clear(f64, f64),
        Glow(f64, String),
        ShadowBlur(f64),
        FillColor(String),
        Alpha(f64),
        LineWidth(f64),
        Font(String),
        BeginPath,
        Circle(f64, f64, f64),
        MoveTo(f64, f64),
        LineTo(f64, f64),
        ClosePath,
        Fill,
        Stroke,
        Text(String, f64, f64),
    }

    #[derive(Default)]
    struct Recorder {
        cmds: Vec<Cmd>,
    }

    impl Recorder {
        fn count(&self, pred: impl Fn(&Cmd) -> bool) -> usize {
            self.cmds.iter().filter(|c| pred(c)).count()
        }
    }

    impl DrawSurface for Recorder {
        fn clear(&mut self, width: f64, height: f64) {
            self.cmds.push(Cmd::Clear(width, height));
        }
        fn set_glow(&mut self, blur: f64, color: &str) {
            self.cmds.push(Cmd::Glow(blur, color.to_string()));
        }
        fn set_shadow_blur(&mut self, blur: f64) {
            self.cmds.push(Cmd::ShadowBlur(blur));
        }
        fn set_fill_color(&mut self, color: &str) {
            self.cmds.push(Cmd::FillColor(color.to_string()));
        }
        fn set_global_alpha(&mut self, alpha: f64) {
            self.cmds.push(Cmd::Alpha(alpha));
        }
        fn set_line_width(&mut self, width: f64) {
            self.cmds.push(Cmd::LineWidth(width));
        }
        fn set_font(&mut self, font: &str) {
            self.cmds.push(Cmd::Font(font.to_string()));
        }
        fn begin_path(&mut self) {
            self.cmds.push(Cmd::BeginPath);
        }
        fn circle(&mut self, x: f64, y: f64, radius: f64) {
            self.cmds.push(Cmd::Circle(x, y, radius));
        }
        fn move_to(&mut self, x: f64, y: f64) {
            self.cmds.push(Cmd::MoveTo(x, y));
        }
        fn line_to(&mut self, x: f64, y: f64) {
            self.cmds.push(Cmd::LineTo(x, y));
        }
        fn close_path(&mut self) {
            self.cmds.push(Cmd::ClosePath);
        }
        fn fill(&mut self) {
            self.cmds.push(Cmd::Fill);
        }
        fn stroke(&mut self) {
            self.cmds.push(Cmd::Stroke);
        }
        fn fill_text(&mut self, text: &str, x: f64, y: f64) {
            self.cmds.push(Cmd::Text(text.to_string(), x, y));
        }
    }

    fn state() -> GameState {
        GameState::new(5, Bounds::new(640.0, 400.0))
    }

    #[test]
    fn test_frame_starts_with_clear() {
        let mut rec = Recorder::default();
        render_frame(&mut rec, &state(), 0.0, &Settings::default());
        assert_eq!(rec.cmds.first(), Some(&Cmd::Clear(640.0, 400.0)));
    }

    #[test]
    fn test_frame_draws_every_entity() {
        let mut rec = Recorder::default();
        let settings = Settings::default();
        render_frame(&mut rec, &state(), 1234.0, &settings);

        let stars = settings.quality.starfield_stars();
        assert_eq!(rec.count(|c| matches!(c, Cmd::Circle(..))), stars + ORB_COUNT + HAZARD_COUNT);
        assert_eq!(rec.count(|c| *c == Cmd::Stroke), HAZARD_COUNT);
        // stars + orbs + ship
        assert_eq!(rec.count(|c| *c == Cmd::Fill), stars + ORB_COUNT + 1);
        assert_eq!(rec.count(|c| *c == Cmd::ClosePath), 1);
    }

    #[test]
    fn test_score_overlay_last() {
        let mut game = state();
        game.score = 42;
        let mut rec = Recorder::default();
        render_frame(&mut rec, &game, 0.0, &Settings::default());
        assert_eq!(
            rec.cmds.last(),
            Some(&Cmd::Text("Score: 42".to_string(), 16.0, 24.0))
        );
        // Glow is off for the text
        assert!(rec.cmds.contains(&Cmd::ShadowBlur(0.0)));
    }

    #[test]
    fn test_overlay_can_be_hidden() {
        let settings = Settings {
            show_score_overlay: false,
            ..Settings::default()
        };
        let mut rec = Recorder::default();
        render_frame(&mut rec, &state(), 0.0, &settings);
        assert_eq!(rec.count(|c| matches!(c, Cmd::Text(..))), 0);
    }

    #[test]
    fn test_render_leaves_state_untouched() {
        let game = state();
        let before = (game.orbs.clone(), game.hazards.clone(), game.player, game.score);
        let mut rec = Recorder::default();
        render_frame(&mut rec, &game, 500.0, &Settings::default());
        assert_eq!(before, (game.orbs, game.hazards, game.player, game.score));
    }

    #[test]
    fn test_low_quality_fewer_stars() {
        let mut rec = Recorder::default();
        render_frame(
            &mut rec,
            &state(),
            0.0,
            &Settings::from_preset(QualityPreset::Low),
        );
        assert_eq!(rec.count(|c| matches!(c, Cmd::Glow(_, color) if color == colors::STAR)), 60);
    }

    #[test]
    fn test_empty_surface_skips_starfield() {
        let game = GameState::new(5, Bounds::new(0.0, 0.0));
        let mut rec = Recorder::default();
        render_frame(&mut rec, &game, 0.0, &Settings::default());
        assert_eq!(rec.count(|c| matches!(c, Cmd::Glow(_, color) if color == colors::STAR)), 0);
    }

    #[test]
    fn test_star_is_deterministic_and_wraps() {
        let bounds = Bounds::new(640.0, 400.0);
        assert_eq!(star(17, 900.0, bounds), star(17, 900.0, bounds));
        for i in 0..120 {
            let s = star(i, 1.0e6, bounds);
            assert!(s.pos.x >= 0.0 && s.pos.x < 640.0);
            assert!(s.pos.y >= 0.0 && s.pos.y < 400.0);
        }
        let s = star(3, 0.0, bounds);
        assert_eq!(s.pos, Vec2::new(69.0, 291.0));
        assert!((s.alpha - 0.4).abs() < 1e-6);
        assert!((s.radius - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_ship_outline_points_up() {
        let [nose, left, right] = ship_outline(Vec2::new(100.0, 100.0), 10.0);
        assert_eq!(nose, Vec2::new(100.0, 86.0));
        assert_eq!(left, Vec2::new(90.0, 110.0));
        assert_eq!(right, Vec2::new(110.0, 110.0));
    }
}
