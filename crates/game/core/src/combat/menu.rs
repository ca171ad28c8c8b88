//! Combat menu data model.
//!
//! Menu entries carry a closed [`MenuAction`] instead of trigger
//! closures; the encounter matches on it exhaustively when an entry is
//! confirmed. Entry bounds are a presentation cache the renderer may
//! write back so pointer intents can be hit-tested.

use crate::stats::StatKind;

/// Which menu the player is currently in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MenuMode {
    #[default]
    Main,
    AttackStat,
    BoostStat,
    UseGlitch,
    SwapGlitch,
}

/// What confirming a menu entry does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    OpenMenu(MenuMode),
    Attack(StatKind),
    Boost(StatKind),
    UseAbility,
    SwapTo(usize),
    Capture,
    Flee,
}

/// Screen-space rectangle, in whatever units the renderer uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

#[derive(Clone, Debug)]
pub struct MenuEntry {
    pub label: String,
    pub disabled: bool,
    pub action: MenuAction,
    /// Filled in by the renderer at draw time; never part of simulation
    /// state.
    pub bounds: Option<Rect>,
}

impl MenuEntry {
    pub fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            disabled: false,
            action,
            bounds: None,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct Menu {
    pub entries: Vec<MenuEntry>,
    pub selected: usize,
}

impl Menu {
    pub fn new(entries: Vec<MenuEntry>) -> Self {
        Self {
            entries,
            selected: 0,
        }
    }

    pub fn selected_entry(&self) -> Option<&MenuEntry> {
        self.entries.get(self.selected)
    }

    /// Moves the cursor up (`delta < 0`) or down, skipping disabled
    /// entries until one is selectable or the edge clamps the cursor.
    pub fn move_selection(&mut self, delta: i32) {
        if self.entries.is_empty() || delta == 0 {
            return;
        }
        let mut index = self.selected as i32;
        loop {
            index += delta.signum();
            if index < 0 {
                index = 0;
                break;
            }
            if index > self.entries.len() as i32 - 1 {
                index = self.entries.len() as i32 - 1;
                break;
            }
            if !self.entries[index as usize].disabled {
                break;
            }
        }
        self.selected = index as usize;
    }

    /// Index of the enabled entry whose cached bounds contain the point.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<usize> {
        self.entries.iter().position(|e| {
            !e.disabled && e.bounds.is_some_and(|b| b.contains(x, y))
        })
    }
}

/// The encounter's five menus.
#[derive(Clone, Debug, Default)]
pub struct Menus {
    pub main: Menu,
    pub attack: Menu,
    pub boost: Menu,
    pub use_glitch: Menu,
    pub swap: Menu,
}

impl Menus {
    pub fn by_mode(&self, mode: MenuMode) -> &Menu {
        match mode {
            MenuMode::Main => &self.main,
            MenuMode::AttackStat => &self.attack,
            MenuMode::BoostStat => &self.boost,
            MenuMode::UseGlitch => &self.use_glitch,
            MenuMode::SwapGlitch => &self.swap,
        }
    }

    pub fn by_mode_mut(&mut self, mode: MenuMode) -> &mut Menu {
        match mode {
            MenuMode::Main => &mut self.main,
            MenuMode::AttackStat => &mut self.attack,
            MenuMode::BoostStat => &mut self.boost,
            MenuMode::UseGlitch => &mut self.use_glitch,
            MenuMode::SwapGlitch => &mut self.swap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> Menu {
        Menu::new(vec![
            MenuEntry::new("a", MenuAction::Capture),
            MenuEntry::new("b", MenuAction::Flee).disabled(true),
            MenuEntry::new("c", MenuAction::Capture),
        ])
    }

    #[test]
    fn selection_skips_disabled_entries() {
        let mut m = menu();
        m.move_selection(1);
        assert_eq!(m.selected, 2);
        m.move_selection(-1);
        assert_eq!(m.selected, 0);
    }

    #[test]
    fn selection_clamps_at_edges() {
        let mut m = menu();
        m.move_selection(-1);
        assert_eq!(m.selected, 0);
        m.move_selection(1);
        m.move_selection(1);
        assert_eq!(m.selected, 2);
    }

    #[test]
    fn hit_test_ignores_disabled_and_unlaid_entries() {
        let mut m = menu();
        assert_eq!(m.hit_test(5, 5), None);
        m.entries[1].bounds = Some(Rect { x: 0, y: 0, w: 10, h: 10 });
        m.entries[2].bounds = Some(Rect { x: 0, y: 10, w: 10, h: 10 });
        assert_eq!(m.hit_test(5, 5), None); // disabled
        assert_eq!(m.hit_test(5, 15), Some(2));
    }
}
