//! Navigation game: steer through a fresh maze without touching a wall
//!
//! The player position is kept in maze-local coordinates; the maze is drawn
//! centered in the viewport. One wall contact loses the round.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::clock::Millis;
use super::input::{Direction, InputEvent, Key};
use super::maze::{CellPos, Maze};
use super::minigame::Minigame;
use super::phase::{Finale, Phase, Resolution, TerminalStep};
use super::services::{Ctx, Cue};
use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH, FRAME_MS, MAX_STEP_MS};
use crate::renderer::{DrawList, Rgba, SpriteId};
use crate::tuning::NavigationTuning;
use crate::{circle_touches_rect, per_frame_to_per_ms};

/// Win image fading in
pub const WIN_FRAMES: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14];
/// Jumpscare flicker
pub const LOSE_FRAMES: &[u8] = &[0, 1, 2, 0, 1, 2, 0, 1, 2, 0];
/// Same length, no flicker (reduced motion)
pub const STILL_LOSE_FRAMES: &[u8] = &[0; 10];

/// Points for escaping after `elapsed` ms
pub fn score_for(elapsed: Millis) -> u32 {
    match elapsed {
        t if t < 5_000.0 => 100,
        t if t < 10_000.0 => 80,
        t if t < 15_000.0 => 60,
        t if t < 20_000.0 => 40,
        _ => 20,
    }
}

/// Active payload
#[derive(Debug, Clone)]
pub struct Run {
    player: Vec2,
    started_at: Millis,
    last_update: Millis,
}

pub struct NavigationGame {
    tuning: NavigationTuning,
    width: f32,
    height: f32,
    /// px per ms at the current difficulty
    speed: f32,
    maze: Maze,
    /// Held arrows, indexed like `Direction::ALL`
    held: [bool; 4],
    mistakes: u32,
    score: u32,
    phase: Phase<Run>,
}

fn held_index(dir: Direction) -> usize {
    match dir {
        Direction::Left => 0,
        Direction::Down => 1,
        Direction::Up => 2,
        Direction::Right => 3,
    }
}

impl NavigationGame {
    const MISTAKE_LIMIT: u32 = 1;

    pub fn new(tuning: NavigationTuning) -> Self {
        // Placeholder until the first start carves a real one
        let maze = Maze::generate(1, 1, &mut Pcg32::seed_from_u64(0));
        Self {
            speed: per_frame_to_per_ms(tuning.speed_per_frame),
            tuning,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            maze,
            held: [false; 4],
            mistakes: 0,
            score: 0,
            phase: Phase::Finished(Resolution::Lost),
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn phase(&self) -> &Phase<Run> {
        &self.phase
    }

    /// Player position in maze-local coordinates while active
    pub fn player(&self) -> Option<Vec2> {
        self.phase.active().map(|r| r.player)
    }

    /// Screen position of the maze's top-left corner
    pub fn offset(&self) -> Vec2 {
        let size =
            Vec2::new(self.maze.cols() as f32, self.maze.rows() as f32) * self.tuning.cell_size;
        (Vec2::new(self.width, self.height) - size) / 2.0
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        self.held[held_index(dir)]
    }

    fn cell_center(&self, (col, row): CellPos) -> Vec2 {
        (Vec2::new(col as f32, row as f32) + 0.5) * self.tuning.cell_size
    }

    /// Cell-sized square just below the exit cell, maze-local
    fn exit_zone(&self) -> (Vec2, Vec2) {
        let (col, row) = self.maze.exit();
        let cell = self.tuning.cell_size;
        (
            Vec2::new(col as f32 * cell, (row + 1) as f32 * cell),
            Vec2::splat(cell),
        )
    }

    fn heading(&self) -> Vec2 {
        Direction::ALL
            .iter()
            .filter(|d| self.is_held(**d))
            .map(|d| d.delta())
            .sum::<Vec2>()
            .normalize_or_zero()
    }

    fn finale(tuning: &NavigationTuning, reduced_motion: bool, outcome: Resolution) -> Finale {
        match outcome {
            Resolution::Won => Finale {
                cue: Cue::MazeWin,
                frames: WIN_FRAMES,
                interval: tuning.finale_interval_ms,
            },
            Resolution::Lost => Finale {
                cue: Cue::MazeJumpscare,
                frames: if reduced_motion {
                    STILL_LOSE_FRAMES
                } else {
                    LOSE_FRAMES
                },
                interval: tuning.finale_interval_ms,
            },
        }
    }

    fn advance_player(&mut self, cx: &mut Ctx<'_>) {
        let now = cx.now;
        let heading = self.heading();
        let (exit_min, exit_size) = self.exit_zone();
        let radius = self.tuning.player_radius;
        let cell = self.tuning.cell_size;
        let speed = self.speed;

        let Some(run) = self.phase.active_mut() else {
            return;
        };
        let dt = (now - run.last_update).clamp(0.0, MAX_STEP_MS) as f32;
        run.last_update = now;
        if heading == Vec2::ZERO {
            return;
        }

        // No sub-step is longer than the hitbox radius, so no wall can be skipped
        let travel = heading * speed * dt;
        let steps = (travel.length() / radius.max(1.0)).ceil().max(1.0);
        let delta = travel / steps;

        let mut stop = None;
        for _ in 0..steps as usize {
            let next = run.player + delta;
            let in_exit = circle_touches_rect(next, radius, exit_min, exit_size);
            let blocked = match self.maze.cell_at(next, cell) {
                Some(_) => self.maze.touches_wall(next, radius, cell),
                // Only the exit square lies outside the grid
                None => !in_exit,
            };
            if blocked {
                stop = Some(Err(next));
                break;
            }
            run.player = next;
            if in_exit {
                stop = Some(Ok(now - run.started_at));
                break;
            }
        }

        match stop {
            None => {}
            Some(Err(contact)) => {
                self.mistakes = Self::MISTAKE_LIMIT;
                cx.sv.pause(Cue::MazeAmbient);
                let until = now + self.tuning.resolve_grace_ms;
                self.phase.resolve(Resolution::Lost, until, None);
                log::info!("NavigationGame: touched a wall at {:?}", contact);
            }
            Some(Ok(elapsed)) => {
                self.score = score_for(elapsed);
                cx.sv.pause(Cue::MazeAmbient);
                let until = now + self.tuning.resolve_grace_ms;
                self.phase.resolve(Resolution::Won, until, None);
                log::info!(
                    "NavigationGame: escaped in {:.1}s, score {}",
                    elapsed / 1000.0,
                    self.score
                );
            }
        }
    }

    fn draw_finale(&self, outcome: Resolution, out: &mut DrawList<'_>) {
        let screen = Vec2::new(self.width, self.height);
        let center = screen / 2.0;
        out.clear(Rgba::BLACK);

        match outcome {
            Resolution::Won => {
                let t = self.phase.finale_progress().unwrap_or(1.0);
                let size = Vec2::splat(self.height * 0.6 * (0.5 + 0.5 * t));
                out.sprite_or(SpriteId::MazeWin, center, size, t, |l| {
                    l.text("ESCAPED!", center, 64.0, Rgba(120, 255, 160, (255.0 * t) as u8))
                });
            }
            Resolution::Lost => {
                let frame = self.phase.finale_frame().unwrap_or(0);
                out.sprite_or(SpriteId::Jumpscare(frame), center, screen, 1.0, |l| {
                    l.clear(Rgba(120 + 40 * frame, 0, 0, 255));
                    l.text("BOO!", center, 120.0, Rgba::WHITE)
                });
            }
        }
    }
}

impl Minigame for NavigationGame {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn start(&mut self, speed: f32, cx: &mut Ctx<'_>) {
        let speed = if speed > 0.0 { speed } else { 1.0 };

        self.mistakes = 0;
        self.score = 0;
        self.held = [false; 4];
        self.speed = per_frame_to_per_ms(self.tuning.speed_per_frame) * speed;
        self.maze = Maze::generate(self.tuning.cols, self.tuning.rows, &mut cx.sv.rng);
        self.phase = Phase::waiting(cx.now, self.tuning.preroll_ms);

        cx.sv.play(Cue::MazeAmbient);

        log::info!("NavigationGame started with speed multiplier {:.2}", speed);
        log::debug!(
            "  {}x{} maze, speed {:.3} px/ms",
            self.maze.cols(),
            self.maze.rows(),
            self.speed
        );
    }

    fn update(&mut self, cx: &mut Ctx<'_>) {
        let tuning = &self.tuning;
        let reduced_motion = cx.sv.settings.reduced_motion;
        match self
            .phase
            .step_terminal(cx, |o| Self::finale(tuning, reduced_motion, o))
        {
            TerminalStep::NotTerminal => {}
            TerminalStep::Finished(outcome) => {
                log::debug!("NavigationGame: finale over ({:?})", outcome);
                return;
            }
            TerminalStep::Settling(_) | TerminalStep::Pending => return,
        }

        let now = cx.now;
        let start = self.cell_center(self.maze.start());
        self.phase.activate_when_due(now, || Run {
            player: start,
            started_at: now,
            last_update: now,
        });

        self.advance_player(cx);
    }

    fn draw(&self, out: &mut DrawList<'_>) {
        if let Some(outcome) = self.phase.outcome() {
            if matches!(self.phase, Phase::Settling { .. } | Phase::Finished(_)) {
                self.draw_finale(outcome, out);
                return;
            }
        }

        let offset = self.offset();
        let cell = self.tuning.cell_size;
        out.clear(Rgba::gray(15));

        let (exit_min, exit_size) = self.exit_zone();
        out.fill_rect(offset + exit_min, exit_size, Rgba(40, 160, 70, 255));

        let wall = Rgba::gray(220);
        for row in 0..self.maze.rows() {
            for col in 0..self.maze.cols() {
                for (a, b) in self.maze.walls_of((col, row), cell) {
                    out.line(offset + a, offset + b, wall, 4.0);
                }
            }
        }

        let player = self
            .player()
            .unwrap_or_else(|| self.cell_center(self.maze.start()));
        let pos = offset + player;
        let size = Vec2::splat(self.tuning.player_size);
        out.sprite_or(SpriteId::MazePlayer, pos, size, 1.0, |l| {
            l.circle(pos, self.tuning.player_radius, Rgba(255, 200, 60, 255))
        });

        if self.phase.is_waiting() {
            let pos = Vec2::new(self.width / 2.0, offset.y / 2.0);
            out.text("Find the exit!", pos, 36.0, Rgba::WHITE);
        }
    }

    fn handle_input(&mut self, event: InputEvent, _cx: &mut Ctx<'_>) {
        match event {
            // Presses only count once the maze is live
            InputEvent::Pressed(Key::Arrow(dir)) if self.phase.active().is_some() => {
                self.held[held_index(dir)] = true
            }
            InputEvent::Released(Key::Arrow(dir)) => self.held[held_index(dir)] = false,
            _ => {}
        }
    }

    fn cleanup(&mut self, cx: &mut Ctx<'_>) {
        self.held = [false; 4];
        cx.sv.pause(Cue::MazeAmbient);
        cx.sv.pause(Cue::MazeJumpscare);
        cx.sv.pause(Cue::MazeWin);
    }

    fn on_resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    fn mistakes(&self) -> u32 {
        self.mistakes
    }

    fn mistake_limit(&self) -> u32 {
        Self::MISTAKE_LIMIT
    }

    fn round_score(&self) -> u32 {
        self.score
    }

    fn autopilot(&self, _now: Millis, out: &mut Vec<InputEvent>) {
        let Some(player) = self.player() else {
            return;
        };
        let cell = self.tuning.cell_size;
        let Some(here) = self.maze.cell_at(player, cell) else {
            return;
        };

        // Leave through the exit's open bottom once there
        let along = match self.maze.path(here, self.maze.exit()) {
            Some(route) if route.len() > 1 => {
                let (next, cur) = (route[1], route[0]);
                self.cell_center(next) - self.cell_center(cur)
            }
            Some(_) => Vec2::Y,
            None => return,
        };

        // Re-center on the cross axis before moving on
        let tolerance = (self.speed * FRAME_MS as f32).max(4.0);
        let error = self.cell_center(here) - player;
        let wanted = if along.x.abs() > 0.0 && error.y.abs() > tolerance {
            if error.y > 0.0 { Direction::Down } else { Direction::Up }
        } else if along.y.abs() > 0.0 && error.x.abs() > tolerance {
            if error.x > 0.0 { Direction::Right } else { Direction::Left }
        } else if along.x > 0.0 {
            Direction::Right
        } else if along.x < 0.0 {
            Direction::Left
        } else if along.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };

        for dir in Direction::ALL {
            if dir != wanted && self.is_held(dir) {
                out.push(InputEvent::Released(Key::Arrow(dir)));
            }
        }
        if !self.is_held(wanted) {
            out.push(InputEvent::Pressed(Key::Arrow(wanted)));
        }
    }
}
