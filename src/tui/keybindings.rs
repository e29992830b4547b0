use crate::tui::action::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Maps KeyEvents to Actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(rename = "bindings")]
    bindings_list: Vec<KeyBinding>,

    #[serde(skip)]
    bindings_map: HashMap<KeyPattern, Action>,
}

/// Single keybinding entry, e.g. `{ key: "Ctrl+f", action: "Search" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    pub key: String,
    pub action: Action,
}

/// Pattern for matching key events
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPattern {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_list(vec![
            // Row cursor
            KeyBinding::new("Up", Action::MoveUp),
            KeyBinding::new("Down", Action::MoveDown),
            KeyBinding::new("k", Action::MoveUp),
            KeyBinding::new("j", Action::MoveDown),
            KeyBinding::new("g", Action::GoToTop),
            KeyBinding::new("G", Action::GoToBottom),
            // Horizontal scroll
            KeyBinding::new("Left", Action::MoveLeft),
            KeyBinding::new("Right", Action::MoveRight),
            KeyBinding::new("h", Action::MoveLeft),
            KeyBinding::new("l", Action::MoveRight),
            // Pages of the table
            KeyBinding::new("PageDown", Action::NextPage),
            KeyBinding::new("PageUp", Action::PrevPage),
            KeyBinding::new("n", Action::NextPage),
            KeyBinding::new("p", Action::PrevPage),
            KeyBinding::new("Home", Action::FirstPage),
            KeyBinding::new("End", Action::LastPage),
            KeyBinding::new("z", Action::CyclePageSize),
            // Data operations
            KeyBinding::new("/", Action::Search),
            KeyBinding::new("Ctrl+f", Action::Search),
            KeyBinding::new("f", Action::Filter),
            KeyBinding::new("x", Action::ClearFilters),
            KeyBinding::new("r", Action::Refresh),
            KeyBinding::new("F5", Action::Refresh),
            KeyBinding::new("e", Action::Export),
            // Columns
            KeyBinding::new("c", Action::Columns),
            KeyBinding::new("C", Action::ShowAllColumns),
            // View
            KeyBinding::new("?", Action::ToggleHelp),
            KeyBinding::new("F1", Action::ToggleHelp),
            KeyBinding::new("d", Action::DismissNotification),
            // Regions
            KeyBinding::new("Tab", Action::NextTab),
            KeyBinding::new("Shift+Tab", Action::PrevTab),
            // Navigation bar
            KeyBinding::new("]", Action::NextView),
            KeyBinding::new("[", Action::PrevView),
            KeyBinding::new("S", Action::OpenSettings),
            // Application
            KeyBinding::new("q", Action::Quit),
            KeyBinding::new("Ctrl+c", Action::Quit),
            KeyBinding::new("Esc", Action::Cancel),
            KeyBinding::new("Enter", Action::Confirm),
            // Dialogs
            KeyBinding::new("Delete", Action::Delete),
            KeyBinding::new("Space", Action::Toggle),
        ])
    }
}

impl KeyBindings {
    pub fn from_list(bindings_list: Vec<KeyBinding>) -> Self {
        let bindings_map = Self::build_map(&bindings_list);
        Self {
            bindings_list,
            bindings_map,
        }
    }

    /// Defaults with `overrides` layered on top; an override replaces every
    /// default bound to the same key
    pub fn with_overrides(overrides: &[KeyBinding]) -> Self {
        let mut list = Self::default().bindings_list;
        for binding in overrides {
            let Ok(pattern) = KeyPattern::from_string(&binding.key) else {
                tracing::warn!("ignoring keybinding with invalid key '{}'", binding.key);
                continue;
            };
            list.retain(|b| KeyPattern::from_string(&b.key).ok().as_ref() != Some(&pattern));
            list.push(binding.clone());
        }
        Self::from_list(list)
    }

    /// Build hashmap from bindings list
    fn build_map(bindings: &[KeyBinding]) -> HashMap<KeyPattern, Action> {
        bindings
            .iter()
            .filter_map(|b| {
                KeyPattern::from_string(&b.key)
                    .ok()
                    .map(|pattern| (pattern, b.action))
            })
            .collect()
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings_list
    }

    /// Get action for key event
    ///
    /// Terminals disagree on whether shifted symbols such as `?` carry SHIFT,
    /// so character keys are retried with SHIFT toggled.
    pub fn get_action(&self, key: &KeyEvent) -> Option<Action> {
        let pattern = KeyPattern::from_event(key);
        if let Some(action) = self.bindings_map.get(&pattern) {
            return Some(*action);
        }
        if let KeyCode::Char(_) = pattern.code {
            let toggled = KeyPattern::new(pattern.code, pattern.modifiers ^ KeyModifiers::SHIFT);
            return self.bindings_map.get(&toggled).copied();
        }
        None
    }

    /// Get all bindings for an action (for help display)
    pub fn get_keys_for_action(&self, action: Action) -> Vec<String> {
        self.bindings_list
            .iter()
            .filter(|b| b.action == action)
            .map(|b| b.key.clone())
            .collect()
    }

    /// Actions without any key, with their description
    pub fn get_unbound_actions(&self) -> Vec<(Action, &'static str)> {
        let bound_actions: HashSet<Action> = self.bindings_list.iter().map(|b| b.action).collect();

        Action::all()
            .into_iter()
            .filter(|action| !bound_actions.contains(action))
            .map(|action| (action, action.description()))
            .collect()
    }

    /// Validate bindings and return warnings
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let mut seen_keys: HashMap<KeyPattern, Action> = HashMap::new();
        for binding in &self.bindings_list {
            match KeyPattern::from_string(&binding.key) {
                Err(_) => warnings.push(format!(
                    "Invalid key pattern '{}' for action {:?}",
                    binding.key, binding.action
                )),
                Ok(pattern) => {
                    if let Some(existing) = seen_keys.insert(pattern, binding.action) {
                        warnings.push(format!(
                            "Duplicate key '{}': bound to both {:?} and {:?}",
                            binding.key, existing, binding.action
                        ));
                    }
                }
            }
        }

        let unbound = self.get_unbound_actions();
        if !unbound.is_empty() {
            warnings.push(format!(
                "{} action(s) have no keybindings: {}",
                unbound.len(),
                unbound
                    .iter()
                    .map(|(action, _)| format!("{:?}", action))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        warnings
    }
}

impl KeyBinding {
    pub fn new(key: &str, action: Action) -> Self {
        Self {
            key: key.to_string(),
            action,
        }
    }
}

impl KeyPattern {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }

    /// Parse from string (e.g., "Ctrl+c", "Shift+Tab", "?", "F5")
    pub fn from_string(s: &str) -> Result<Self, String> {
        // "+" alone is a key, not a separator
        let (modifier_parts, key_part) = match s.rsplit_once('+') {
            Some((mods, "")) if !mods.is_empty() => (Some(mods.trim_end_matches('+')), "+"),
            Some((mods, key)) if !mods.is_empty() => (Some(mods), key),
            _ => (None, s),
        };

        let mut modifiers = KeyModifiers::empty();
        if let Some(mods) = modifier_parts {
            for part in mods.split('+') {
                match part.to_lowercase().as_str() {
                    "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                    "alt" | "option" => modifiers |= KeyModifiers::ALT,
                    "shift" => modifiers |= KeyModifiers::SHIFT,
                    _ => return Err(format!("Unknown modifier: {}", part)),
                }
            }
        }

        let mut chars = key_part.chars();
        let code = match (chars.next(), chars.next()) {
            (None, _) => return Err("Empty key".to_string()),
            (Some(ch), None) => {
                if ch.is_uppercase() || "!@#$%^&*()_{}|:\"<>?~".contains(ch) {
                    modifiers |= KeyModifiers::SHIFT;
                }
                KeyCode::Char(ch)
            }
            _ => match key_part.to_lowercase().as_str() {
                "up" => KeyCode::Up,
                "down" => KeyCode::Down,
                "left" => KeyCode::Left,
                "right" => KeyCode::Right,
                "pageup" | "pgup" => KeyCode::PageUp,
                "pagedown" | "pgdn" | "pgdown" => KeyCode::PageDown,
                "home" => KeyCode::Home,
                "end" => KeyCode::End,
                "tab" if modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
                "tab" => KeyCode::Tab,
                "backtab" => {
                    modifiers |= KeyModifiers::SHIFT;
                    KeyCode::BackTab
                }
                "enter" | "return" => KeyCode::Enter,
                "esc" | "escape" => KeyCode::Esc,
                "backspace" => KeyCode::Backspace,
                "delete" | "del" => KeyCode::Delete,
                "insert" | "ins" => KeyCode::Insert,
                "space" => KeyCode::Char(' '),
                f if f.starts_with('f') => match f[1..].parse::<u8>() {
                    Ok(n) if (1..=12).contains(&n) => KeyCode::F(n),
                    _ => return Err(format!("Invalid function key: {}", key_part)),
                },
                _ => return Err(format!("Unknown key: {}", key_part)),
            },
        };

        Ok(Self { code, modifiers })
    }

    /// Human-readable form for the help screen
    pub fn label(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".into());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt".into());
        }
        let key = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            // Shift is implied by the character itself
            KeyCode::Char(c) => c.to_string(),
            KeyCode::BackTab => "Shift+Tab".to_string(),
            KeyCode::PageUp => "PgUp".to_string(),
            KeyCode::PageDown => "PgDn".to_string(),
            KeyCode::Delete => "Del".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            other => {
                if self.modifiers.contains(KeyModifiers::SHIFT) {
                    parts.push("Shift".into());
                }
                format!("{:?}", other)
            }
        };
        parts.push(key);
        parts.join("+")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_key_pattern_parsing() {
        assert_eq!(
            KeyPattern::from_string("Ctrl+f").unwrap(),
            KeyPattern::new(KeyCode::Char('f'), KeyModifiers::CONTROL)
        );
        assert_eq!(
            KeyPattern::from_string("Shift+Tab").unwrap(),
            KeyPattern::new(KeyCode::BackTab, KeyModifiers::SHIFT)
        );
        assert_eq!(
            KeyPattern::from_string("G").unwrap(),
            KeyPattern::new(KeyCode::Char('G'), KeyModifiers::SHIFT)
        );
        assert_eq!(KeyPattern::from_string("F5").unwrap().code, KeyCode::F(5));
        assert_eq!(KeyPattern::from_string("Ctrl++").unwrap().code, KeyCode::Char('+'));
        assert!(KeyPattern::from_string("Hyper+x").is_err());
        assert!(KeyPattern::from_string("F13").is_err());
    }

    #[test]
    fn test_default_bindings_are_valid() {
        let bindings = KeyBindings::default();
        for warning in bindings.validate() {
            assert!(!warning.contains("Invalid"), "{}", warning);
            assert!(!warning.contains("Duplicate"), "{}", warning);
        }
        assert!(bindings.get_unbound_actions().is_empty());
    }

    #[test]
    fn test_get_action_tolerates_shift_on_symbols() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.get_action(&key(KeyCode::Char('?'), KeyModifiers::NONE)),
            Some(Action::ToggleHelp)
        );
        assert_eq!(
            bindings.get_action(&key(KeyCode::Char('?'), KeyModifiers::SHIFT)),
            Some(Action::ToggleHelp)
        );
        assert_eq!(
            bindings.get_action(&key(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(Action::PrevTab)
        );
    }

    #[test]
    fn test_overrides_replace_same_key() {
        let bindings = KeyBindings::with_overrides(&[KeyBinding::new("r", Action::Export)]);
        assert_eq!(
            bindings.get_action(&key(KeyCode::Char('r'), KeyModifiers::NONE)),
            Some(Action::Export)
        );
        // F5 still refreshes
        assert_eq!(bindings.get_keys_for_action(Action::Refresh), vec!["F5".to_string()]);
    }

    #[test]
    fn test_invalid_override_is_ignored() {
        let bindings = KeyBindings::with_overrides(&[KeyBinding::new("Hyper+x", Action::Quit)]);
        assert_eq!(bindings.bindings().len(), KeyBindings::default().bindings().len());
    }

    #[test]
    fn test_labels() {
        assert_eq!(KeyPattern::from_string("Ctrl+f").unwrap().label(), "Ctrl+f");
        assert_eq!(KeyPattern::from_string("Shift+Tab").unwrap().label(), "Shift+Tab");
        assert_eq!(KeyPattern::from_string("?").unwrap().label(), "?");
        assert_eq!(KeyPattern::from_string("Space").unwrap().label(), "Space");
    }
}
