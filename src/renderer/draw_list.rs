//! Draw commands for 2D primitives and sprites

use glam::Vec2;

use crate::sim::input::Direction;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const WHITE: Rgba = Rgba(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba(0, 0, 0, 255);
    pub const BACKDROP: Rgba = Rgba(49, 49, 49, 255);

    pub const fn gray(v: u8) -> Self {
        Rgba(v, v, v, 255)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Rgba(self.0, self.1, self.2, a)
    }

    /// CSS color string for canvas painters
    pub fn css(&self) -> String {
        format!(
            "rgba({},{},{},{:.3})",
            self.0,
            self.1,
            self.2,
            self.3 as f32 / 255.0
        )
    }
}

/// Every image the game can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    /// Scenery above the marker band
    TimingBackdrop,
    /// Hit zone frame
    HitZone,
    Marker(Direction),
    TimingWinBackdrop,
    TimingWin(u8),
    TimingLose(u8),
    /// Approaching threat, 0 = arrived
    Threat(u8),
    ReactionWin(u8),
    ReactionLose(u8),
    MazePlayer,
    MazeWin,
    Jumpscare(u8),
    GameOverTitle,
    GameOverCrying(u8),
}

impl SpriteId {
    /// Asset path relative to the web root
    pub fn path(&self) -> String {
        match self {
            SpriteId::TimingBackdrop => "IMGS/timing_backdrop.png".into(),
            SpriteId::HitZone => "IMGS/hit_zone.png".into(),
            SpriteId::Marker(dir) => format!("IMGS/marker_{}.png", dir.as_str()),
            SpriteId::TimingWinBackdrop => "IMGS/timing_win_bg.png".into(),
            SpriteId::TimingWin(i) => format!("IMGS/timing_win{}.png", i + 1),
            SpriteId::TimingLose(i) => format!("IMGS/timing_lose{}.png", i + 1),
            SpriteId::Threat(i) => format!("IMGS/threat{}.png", i),
            SpriteId::ReactionWin(i) => format!("IMGS/reaction_win{}.png", i),
            SpriteId::ReactionLose(i) => format!("IMGS/reaction_lose{}.png", i),
            SpriteId::MazePlayer => "IMGS/maze_player.png".into(),
            SpriteId::MazeWin => "IMGS/maze_win.png".into(),
            SpriteId::Jumpscare(i) => format!("IMGS/jumpscare{}.png", i + 1),
            SpriteId::GameOverTitle => "IMGS/game_over.png".into(),
            SpriteId::GameOverCrying(i) => format!("IMGS/game_over_crying{}.png", i + 1),
        }
    }

    /// Every sprite the game may request, for preloading
    pub fn catalog() -> Vec<SpriteId> {
        let mut ids = vec![
            SpriteId::TimingBackdrop,
            SpriteId::HitZone,
            SpriteId::TimingWinBackdrop,
            SpriteId::MazePlayer,
            SpriteId::MazeWin,
            SpriteId::GameOverTitle,
        ];
        ids.extend(Direction::ALL.map(SpriteId::Marker));
        ids.extend((0..3).map(SpriteId::TimingWin));
        ids.extend((0..4).map(SpriteId::TimingLose));
        ids.extend((0..=6).map(SpriteId::Threat));
        ids.extend((1..=5).map(SpriteId::ReactionWin));
        ids.extend((1..=3).map(SpriteId::ReactionLose));
        ids.extend((0..3).map(SpriteId::Jumpscare));
        ids.extend((0..2).map(SpriteId::GameOverCrying));
        ids
    }
}

/// Which sprites are ready to draw
pub trait AssetProbe {
    fn is_loaded(&self, id: SpriteId) -> bool;
}

/// Every sprite available
pub struct AllAssets;

impl AssetProbe for AllAssets {
    fn is_loaded(&self, _id: SpriteId) -> bool {
        true
    }
}

/// Nothing loaded (fallback rendering everywhere)
pub struct NoAssets;

impl AssetProbe for NoAssets {
    fn is_loaded(&self, _id: SpriteId) -> bool {
        false
    }
}

/// One primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Rgba),
    Rect {
        min: Vec2,
        size: Vec2,
        fill: Option<Rgba>,
        stroke: Option<(Rgba, f32)>,
        corner_radius: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: Rgba,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Rgba,
        width: f32,
    },
    Sprite {
        id: SpriteId,
        center: Vec2,
        size: Vec2,
        alpha: f32,
    },
    /// Centered text
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Rgba,
    },
}

/// A frame's worth of draw commands
pub struct DrawList<'a> {
    cmds: Vec<DrawCmd>,
    assets: &'a dyn AssetProbe,
}

impl<'a> DrawList<'a> {
    pub fn new(assets: &'a dyn AssetProbe) -> Self {
        Self {
            cmds: Vec::with_capacity(64),
            assets,
        }
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn into_commands(self) -> Vec<DrawCmd> {
        self.cmds
    }

    pub fn clear(&mut self, color: Rgba) {
        self.cmds.push(DrawCmd::Clear(color));
    }

    pub fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        self.cmds.push(DrawCmd::Rect {
            min,
            size,
            fill: Some(color),
            stroke: None,
            corner_radius: 0.0,
        });
    }

    pub fn rect(
        &mut self,
        min: Vec2,
        size: Vec2,
        fill: Option<Rgba>,
        stroke: Option<(Rgba, f32)>,
        corner_radius: f32,
    ) {
        self.cmds.push(DrawCmd::Rect {
            min,
            size,
            fill,
            stroke,
            corner_radius,
        });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, fill: Rgba) {
        self.cmds.push(DrawCmd::Circle {
            center,
            radius,
            fill,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        self.cmds.push(DrawCmd::Line {
            from,
            to,
            color,
            width,
        });
    }

    pub fn text(&mut self, text: impl Into<String>, pos: Vec2, size: f32, color: Rgba) {
        self.cmds.push(DrawCmd::Text {
            text: text.into(),
            pos,
            size,
            color,
        });
    }

    /// Draw a sprite, or run `fallback` when its image is not loaded
    ///
    /// Returns true if the sprite itself was drawn.
    pub fn sprite_or(
        &mut self,
        id: SpriteId,
        center: Vec2,
        size: Vec2,
        alpha: f32,
        fallback: impl FnOnce(&mut Self),
    ) -> bool {
        if self.assets.is_loaded(id) {
            self.cmds.push(DrawCmd::Sprite {
                id,
                center,
                size,
                alpha,
            });
            true
        } else {
            fallback(self);
            false
        }
    }

    /// Count of commands matching a predicate (handy in tests)
    pub fn count(&self, pred: impl Fn(&DrawCmd) -> bool) -> usize {
        self.cmds.iter().filter(|c| pred(c)).count()
    }

    /// Whether any text command contains `needle`
    pub fn has_text(&self, needle: &str) -> bool {
        self.cmds
            .iter()
            .any(|c| matches!(c, DrawCmd::Text { text, .. } if text.contains(needle)))
    }
}
