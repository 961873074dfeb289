//! DOM overlay for the lives counter and the dancing mascot

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::sim::input::Direction;
use crate::sim::services::Hud;

const LIVES_ID: &str = "lives";
const MASCOT_ID: &str = "mascot";

pub struct WebHud {
    lives: Option<HtmlElement>,
    mascot: Option<HtmlElement>,
}

impl WebHud {
    /// Attach to `#lives` and `#mascot`, creating them if the page lacks them
    pub fn new(document: &Document) -> Self {
        let lives = Self::element(document, LIVES_ID, "hud-lives");
        let mascot = Self::element(document, MASCOT_ID, "mascot idle");
        let mut hud = Self { lives, mascot };
        hud.hide_lives();
        hud.hide_mascot();
        hud
    }

    fn element(document: &Document, id: &str, class: &str) -> Option<HtmlElement> {
        if let Some(el) = document.get_element_by_id(id) {
            return el.dyn_into::<HtmlElement>().ok();
        }
        let el = document.create_element("div").ok()?;
        el.set_id(id);
        el.set_class_name(class);
        document.body()?.append_child(&el).ok()?;
        log::debug!("Created #{id} overlay");
        el.dyn_into::<HtmlElement>().ok()
    }

    fn set_visible(el: &Option<HtmlElement>, visible: bool) {
        if let Some(el) = el {
            let display = if visible { "block" } else { "none" };
            el.style().set_property("display", display).ok();
        }
    }
}

impl Hud for WebHud {
    fn show_lives(&mut self) {
        Self::set_visible(&self.lives, true);
    }

    fn hide_lives(&mut self) {
        Self::set_visible(&self.lives, false);
    }

    fn update_lives(&mut self, count: u32) {
        if let Some(el) = &self.lives {
            el.set_inner_text(&"\u{2764}".repeat(count as usize));
        }
    }

    fn show_mascot(&mut self) {
        Self::set_visible(&self.mascot, true);
    }

    fn hide_mascot(&mut self) {
        Self::set_visible(&self.mascot, false);
    }

    fn animate_mascot(&mut self, direction: Direction) {
        if let Some(el) = &self.mascot {
            el.set_class_name(&format!("mascot dance-{}", direction.as_str()));
        }
    }

    fn reset_mascot_idle(&mut self) {
        if let Some(el) = &self.mascot {
            el.set_class_name("mascot idle");
        }
    }
}
