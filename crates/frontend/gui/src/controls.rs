//! Keyboard control panel
//!
//! One control is active at a time. `Tab` / `Shift+Tab` (or `Right` /
//! `Left`) move the selection, `Up` / `Down` step the active control, `[`
//! and `]` slide the density range window, `F1` dumps every value and
//! `Escape` quits.

use crate::window_backend::Key;
use halftone_core::{ParamId, ParameterStore};

/// What a key press asks the host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Nothing visible happened
    None,
    /// Selection moved; only the title needs refreshing
    Selected,
    /// A parameter changed
    Changed,
    /// Print the value report
    Report,
    Quit,
}

#[derive(Debug, Clone, Default)]
pub struct ControlPanel {
    selected: usize,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> ParamId {
        ParamId::ALL[self.selected]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % ParamId::ALL.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + ParamId::ALL.len() - 1) % ParamId::ALL.len();
    }

    pub fn handle_key(&mut self, key: Key, shift: bool, store: &mut ParameterStore) -> ControlAction {
        match key {
            Key::Tab if shift => {
                self.select_prev();
                ControlAction::Selected
            }
            Key::Tab | Key::Right => {
                self.select_next();
                ControlAction::Selected
            }
            Key::Left => {
                self.select_prev();
                ControlAction::Selected
            }
            Key::Up => self.step(store, 1),
            Key::Down => self.step(store, -1),
            Key::LeftBracket => {
                shift_density_window(store, -1);
                ControlAction::Changed
            }
            Key::RightBracket => {
                shift_density_window(store, 1);
                ControlAction::Changed
            }
            Key::F1 => ControlAction::Report,
            Key::Escape => ControlAction::Quit,
            _ => ControlAction::None,
        }
    }

    fn step(&self, store: &mut ParameterStore, direction: i32) -> ControlAction {
        if store.nudge(self.selected(), direction) {
            ControlAction::Changed
        } else {
            ControlAction::None
        }
    }

    /// Window title: active control, its value and the density label
    pub fn title(&self, store: &ParameterStore) -> String {
        let id = self.selected();
        format!(
            "Halftone - {}: {} - {}",
            id.name(),
            store.params().display_value(id),
            store.density_label()
        )
    }
}

/// Slide the density range by half its width in `direction`, keeping the
/// width. The lower bound never drops below one step.
pub fn shift_density_window(store: &mut ParameterStore, direction: i32) {
    let range = store.density_range();
    let width = range.max - range.min;
    let step = range.step.max(f32::EPSILON);
    let mut min = range.min + width * 0.5 * direction.signum() as f32;
    if min < step {
        min = step;
    }
    store.set_density_range(min, min + width, range.step);
}

/// Every control with its current value, then the density label.
pub fn report(store: &ParameterStore) -> String {
    let params = store.params();
    let mut out = String::new();
    for id in ParamId::ALL {
        out.push_str(&format!("{:>16}: {}\n", id.name(), params.display_value(id)));
    }
    let range = store.density_range();
    out.push_str(&format!(
        "{:>16}: {}..{} step {}\n",
        "densityRange", range.min, range.max, range.step
    ));
    out.push_str(&format!("{:>16}: {}", "grid", store.density_label()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use halftone_core::EffectParameters;

    fn store() -> ParameterStore {
        ParameterStore::new(EffectParameters::default())
    }

    #[test]
    fn test_tab_cycles_through_every_control() {
        let mut panel = ControlPanel::new();
        let mut store = store();
        assert_eq!(panel.selected(), ParamId::Density);
        for _ in 0..ParamId::ALL.len() {
            assert_eq!(
                panel.handle_key(Key::Tab, false, &mut store),
                ControlAction::Selected
            );
        }
        assert_eq!(panel.selected(), ParamId::Density);

        panel.handle_key(Key::Tab, true, &mut store);
        assert_eq!(panel.selected(), ParamId::ColorDodgeBlend);
        panel.handle_key(Key::Right, false, &mut store);
        assert_eq!(panel.selected(), ParamId::Density);
    }

    #[test]
    fn test_up_down_nudge_active_control() {
        let mut panel = ControlPanel::new();
        let mut store = store();
        store.sync(&mut EffectParameters::default());

        assert_eq!(
            panel.handle_key(Key::Up, false, &mut store),
            ControlAction::Changed
        );
        assert_eq!(store.params().density, 210.0);
        assert!(store.is_dirty());

        panel.handle_key(Key::Down, false, &mut store);
        panel.handle_key(Key::Down, false, &mut store);
        assert_eq!(store.params().density, 190.0);
    }

    #[test]
    fn test_color_control_ignores_steps() {
        let mut panel = ControlPanel::new();
        let mut store = store();
        while panel.selected() != ParamId::DotColor {
            panel.select_next();
        }
        let before = store.params().dot_color;
        assert_eq!(
            panel.handle_key(Key::Up, false, &mut store),
            ControlAction::None
        );
        assert_eq!(store.params().dot_color, before);
    }

    #[test]
    fn test_brackets_slide_density_window() {
        let mut store = store();
        shift_density_window(&mut store, 1);
        let range = store.density_range();
        assert_eq!((range.min, range.max), (210.0, 590.0));
        assert_eq!(store.params().density, 210.0);

        shift_density_window(&mut store, -1);
        shift_density_window(&mut store, -1);
        let range = store.density_range();
        // Floor at one step
        assert_eq!((range.min, range.max), (10.0, 390.0));
        assert_eq!(range.step, 10.0);
    }

    #[test]
    fn test_f1_and_escape() {
        let mut panel = ControlPanel::new();
        let mut store = store();
        assert_eq!(
            panel.handle_key(Key::F1, false, &mut store),
            ControlAction::Report
        );
        assert_eq!(
            panel.handle_key(Key::Escape, false, &mut store),
            ControlAction::Quit
        );
        assert_eq!(
            panel.handle_key(Key::Space, false, &mut store),
            ControlAction::None
        );
    }

    #[test]
    fn test_title_shows_control_and_label() {
        let panel = ControlPanel::new();
        let store = store();
        assert_eq!(panel.title(&store), "Halftone - density: 200 - 20 x 20 (200px)");
    }

    #[test]
    fn test_report_lists_every_control() {
        let text = report(&store());
        for id in ParamId::ALL {
            assert!(text.contains(id.name()), "{} missing", id.name());
        }
        assert!(text.contains("#00ff88"));
        assert!(text.ends_with("20 x 20 (200px)"));
    }
}
