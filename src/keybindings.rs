use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    CycleFocus,
    CloseWindow,
    MinimizeWindow,
    ToggleMaximize,
    NewWindow,
    StartMenu,
    // Desktop icon navigation
    PrevIcon,
    NextIcon,
    ActivateIcon,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::Quit,
        Action::CycleFocus,
        Action::CloseWindow,
        Action::MinimizeWindow,
        Action::ToggleMaximize,
        Action::NewWindow,
        Action::StartMenu,
        Action::PrevIcon,
        Action::NextIcon,
        Action::ActivateIcon,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::CycleFocus => "Cycle window focus",
            Action::CloseWindow => "Close active window",
            Action::MinimizeWindow => "Minimize active window",
            Action::ToggleMaximize => "Maximize / restore active window",
            Action::NewWindow => "New window",
            Action::StartMenu => "Toggle start menu",
            Action::PrevIcon => "Select previous icon",
            Action::NextIcon => "Select next icon",
            Action::ActivateIcon => "Open selected icon",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "BackTab".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(Quit, KeyCombo::ctrl('q'));
        kb.add(CycleFocus, KeyCombo::plain(KeyCode::Tab));
        kb.add(CloseWindow, KeyCombo::ctrl('w'));
        // Ctrl+M arrives as Enter in most terminals.
        kb.add(MinimizeWindow, KeyCombo::ctrl('d'));
        kb.add(ToggleMaximize, KeyCombo::ctrl('x'));
        kb.add(NewWindow, KeyCombo::ctrl('n'));
        kb.add(StartMenu, KeyCombo::ctrl('s'));
        kb.add(StartMenu, KeyCombo::plain(KeyCode::Esc));
        kb.add(PrevIcon, KeyCombo::plain(KeyCode::Left));
        kb.add(NextIcon, KeyCombo::plain(KeyCode::Right));
        kb.add(ActivateIcon, KeyCombo::plain(KeyCode::Enter));
        kb.add(ActivateIcon, KeyCombo::plain(KeyCode::Char(' ')));
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        if let Some(list) = self.map.get(&action) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    /// First action (in [`Action::ALL`] order) bound to `key`.
    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|act| self.matches(*act, key))
    }

    /// Bound actions with their combos, in [`Action::ALL`] order.
    pub fn help_entries(&self) -> Vec<(Action, Vec<String>)> {
        Action::ALL
            .into_iter()
            .filter_map(|act| {
                let combos = self.combos_for(act);
                (!combos.is_empty()).then_some((act, combos))
            })
            .collect()
    }

    /// Return the display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_quit() {
        let kb = KeyBindings::default();
        let ev = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(kb.matches(Action::Quit, &ev));
        assert_eq!(kb.action_for_key(&ev), Some(Action::Quit));
    }

    #[test]
    fn modifiers_must_match_exactly() {
        let kb = KeyBindings::default();
        let plain_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(kb.action_for_key(&plain_q), None);
        let shift_tab = KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT);
        assert_eq!(kb.action_for_key(&shift_tab), None);
    }

    #[test]
    fn icon_activation_has_two_keys() {
        let kb = KeyBindings::default();
        assert_eq!(
            kb.combos_for(Action::ActivateIcon),
            vec!["Enter".to_string(), "Space".to_string()]
        );
        assert_eq!(kb.combos_for(Action::MinimizeWindow), vec!["Ctrl+D"]);
    }

    #[test]
    fn help_entries_follow_action_order() {
        let kb = KeyBindings::default();
        let entries = kb.help_entries();
        assert_eq!(entries.len(), Action::ALL.len());
        assert_eq!(entries[0].0, Action::Quit);
        assert_eq!(entries.last().map(|e| e.0), Some(Action::ActivateIcon));
    }

    #[test]
    fn custom_bindings_start_empty() {
        let mut kb = KeyBindings::new();
        let f2 = KeyEvent::new(KeyCode::F(2), KeyModifiers::NONE);
        assert_eq!(kb.action_for_key(&f2), None);
        kb.add(Action::NewWindow, KeyCombo::plain(KeyCode::F(2)));
        assert_eq!(kb.action_for_key(&f2), Some(Action::NewWindow));
        assert_eq!(kb.combos_for(Action::NewWindow), vec!["F2"]);
    }
}
