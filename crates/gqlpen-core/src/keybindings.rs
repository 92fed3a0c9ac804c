//! Keyboard shortcuts as handlers on an [`EventBus`] keyed by normalized key combinations.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
    str::FromStr,
};

use crate::{
    event_bus::{EventBus, HandlerId},
    playground::Playground,
    store::SidebarView,
};

/// A key combination, compared in its normalized `ctrl+shift+key` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub ctrl: bool,
    pub shift: bool,
    pub key: String,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        KeyPress {
            ctrl: false,
            shift: false,
            key: key.into().to_lowercase(),
        }
    }

    #[must_use]
    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// The event key handlers for this combination are registered under.
    pub fn binding(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.shift {
            f.write_str("shift+")?;
        }
        f.write_str(&self.key)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyPressError {
    #[error("Key combination `{0}` has no key")]
    MissingKey(String),
    #[error("Unknown modifier `{modifier}` in key combination `{combination}`")]
    UnknownModifier { modifier: String, combination: String },
}

impl FromStr for KeyPress {
    type Err = KeyPressError;

    /// Accepts modifiers in any order and case, such as `Shift+Ctrl+S`. A trailing `+` names
    /// the plus key itself.
    fn from_str(combination: &str) -> Result<Self, Self::Err> {
        let (modifiers, key) = match combination.strip_suffix("++") {
            Some(modifiers) => (modifiers, "+"),
            None if combination == "+" => ("", "+"),
            None => match combination.rsplit_once('+') {
                Some((modifiers, key)) => (modifiers, key),
                None => ("", combination),
            },
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(KeyPressError::MissingKey(combination.to_owned()));
        }

        let mut press = KeyPress::new(key);

        for modifier in modifiers.split('+').map(str::trim).filter(|modifier| !modifier.is_empty()) {
            match modifier.to_lowercase().as_str() {
                "ctrl" | "control" | "mod" => press.ctrl = true,
                "shift" => press.shift = true,
                _ => {
                    return Err(KeyPressError::UnknownModifier {
                        modifier: modifier.to_owned(),
                        combination: combination.to_owned(),
                    })
                }
            }
        }

        Ok(press)
    }
}

impl<'de> serde::Deserialize<'de> for KeyPress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let combination = String::deserialize(deserializer)?;
        combination.parse().map_err(serde::de::Error::custom)
    }
}

/// Key combinations of the session shortcuts.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Keymap {
    pub save: KeyPress,
    pub toggle_sidebar: KeyPress,
    pub open_docs: KeyPress,
    pub open_settings: KeyPress,
}

impl Default for Keymap {
    fn default() -> Self {
        Keymap {
            save: KeyPress::new("s").ctrl(),
            toggle_sidebar: KeyPress::new("b").ctrl(),
            open_docs: KeyPress::new("d").ctrl(),
            open_settings: KeyPress::new(",").ctrl(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Save,
    ToggleSidebar,
    OpenDocs,
    OpenSettings,
}

impl Action {
    fn run(self, playground: &mut Playground) -> anyhow::Result<()> {
        match self {
            Action::Save => playground.save()?,
            Action::ToggleSidebar => {
                let view = playground.store().state().sidebar;
                playground.toggle_sidebar(view);
            }
            Action::OpenDocs => playground.open_documentation(),
            Action::OpenSettings => playground.open_settings(),
        }

        Ok(())
    }
}

/// The shortcut handlers of one session, registered on a key bus until unbound.
#[derive(Debug)]
#[must_use = "shortcuts stay registered until unbound"]
pub struct Shortcuts {
    registrations: Vec<(String, HandlerId)>,
}

impl Shortcuts {
    pub fn bind(bus: &mut EventBus<KeyPress>, playground: &Rc<RefCell<Playground>>, keymap: &Keymap) -> Self {
        let actions = [
            (&keymap.save, Action::Save),
            (&keymap.toggle_sidebar, Action::ToggleSidebar),
            (&keymap.open_docs, Action::OpenDocs),
            (&keymap.open_settings, Action::OpenSettings),
        ];

        let registrations = actions
            .into_iter()
            .map(|(press, action)| {
                let binding = press.binding();
                let playground = Rc::downgrade(playground);
                let id = bus.on(binding.clone(), move |_| dispatch(&playground, action));

                tracing::trace!("bound {action:?} to {binding}");

                (binding, id)
            })
            .collect();

        Shortcuts { registrations }
    }

    pub fn unbind(self, bus: &mut EventBus<KeyPress>) {
        for (binding, id) in self.registrations {
            bus.off(&binding, id);
        }
    }
}

fn dispatch(playground: &Weak<RefCell<Playground>>, action: Action) -> anyhow::Result<()> {
    // The session is gone, nothing left to act on.
    let Some(playground) = playground.upgrade() else {
        return Ok(());
    };

    let mut playground = playground
        .try_borrow_mut()
        .map_err(|_| anyhow::anyhow!("the playground is busy, {action:?} was ignored"))?;

    action.run(&mut playground)
}

/// Emits a key press on the bus, returning how many shortcuts it triggered.
pub fn press(bus: &mut EventBus<KeyPress>, key: &KeyPress) -> usize {
    bus.emit(&key.binding(), key)
}
