//! Canvas 2D painter and sprite image store

use std::collections::HashMap;
use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::renderer::{AssetProbe, DrawCmd, SpriteId};
use crate::{Error, Result};

/// Sprite images, loading in the background
pub struct ImageStore {
    images: HashMap<SpriteId, HtmlImageElement>,
}

impl ImageStore {
    /// Kick off loading every sprite in the catalog
    pub fn preload() -> Self {
        let mut images = HashMap::new();
        for id in SpriteId::catalog() {
            match HtmlImageElement::new() {
                Ok(img) => {
                    img.set_src(&id.path());
                    images.insert(id, img);
                }
                Err(e) => log::warn!("Failed to create image for {:?}: {:?}", id, e),
            }
        }
        log::info!("Preloading {} sprites", images.len());
        Self { images }
    }

    fn get(&self, id: SpriteId) -> Option<&HtmlImageElement> {
        self.images.get(&id)
    }
}

impl AssetProbe for ImageStore {
    fn is_loaded(&self, id: SpriteId) -> bool {
        // Broken images report complete with zero size
        self.get(id)
            .is_some_and(|img| img.complete() && img.natural_width() > 0)
    }
}

/// Paints draw lists onto a 2D canvas context
pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| Error::Platform(format!("get_context failed: {:?}", e)))?
            .and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| Error::Platform("2d context unavailable".into()))?;
        Ok(Self { ctx })
    }

    pub fn paint(&self, cmds: &[DrawCmd], images: &ImageStore, width: f64, height: f64) {
        let ctx = &self.ctx;
        for cmd in cmds {
            match cmd {
                DrawCmd::Clear(color) => {
                    ctx.set_fill_style_str(&color.css());
                    ctx.fill_rect(0.0, 0.0, width, height);
                }
                DrawCmd::Rect {
                    min,
                    size,
                    fill,
                    stroke,
                    corner_radius,
                } => {
                    self.rect_path(
                        min.x as f64,
                        min.y as f64,
                        size.x as f64,
                        size.y as f64,
                        *corner_radius as f64,
                    );
                    if let Some(fill) = fill {
                        ctx.set_fill_style_str(&fill.css());
                        ctx.fill();
                    }
                    if let Some((color, width)) = stroke {
                        ctx.set_stroke_style_str(&color.css());
                        ctx.set_line_width(*width as f64);
                        ctx.stroke();
                    }
                }
                DrawCmd::Circle {
                    center,
                    radius,
                    fill,
                } => {
                    ctx.begin_path();
                    ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)
                        .ok();
                    ctx.set_fill_style_str(&fill.css());
                    ctx.fill();
                }
                DrawCmd::Line {
                    from,
                    to,
                    color,
                    width,
                } => {
                    ctx.begin_path();
                    ctx.move_to(from.x as f64, from.y as f64);
                    ctx.line_to(to.x as f64, to.y as f64);
                    ctx.set_stroke_style_str(&color.css());
                    ctx.set_line_width(*width as f64);
                    ctx.stroke();
                }
                DrawCmd::Sprite {
                    id,
                    center,
                    size,
                    alpha,
                } => {
                    let Some(img) = images.get(*id) else { continue };
                    ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        img,
                        (center.x - size.x / 2.0) as f64,
                        (center.y - size.y / 2.0) as f64,
                        size.x as f64,
                        size.y as f64,
                    )
                    .ok();
                    ctx.set_global_alpha(1.0);
                }
                DrawCmd::Text {
                    text,
                    pos,
                    size,
                    color,
                } => {
                    ctx.set_font(&format!("bold {}px sans-serif", size.round()));
                    ctx.set_text_align("center");
                    ctx.set_text_baseline("middle");
                    ctx.set_fill_style_str(&color.css());
                    ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
                }
            }
        }
    }

    fn rect_path(&self, x: f64, y: f64, w: f64, h: f64, r: f64) {
        let ctx = &self.ctx;
        ctx.begin_path();
        let r = r.min(w / 2.0).min(h / 2.0);
        if r <= 0.0 {
            ctx.rect(x, y, w, h);
            return;
        }
        ctx.move_to(x + r, y);
        ctx.arc_to(x + w, y, x + w, y + h, r).ok();
        ctx.arc_to(x + w, y + h, x, y + h, r).ok();
        ctx.arc_to(x, y + h, x, y, r).ok();
        ctx.arc_to(x, y, x + w, y, r).ok();
        ctx.close_path();
    }
}
