//! Button events that drive the state machine

/// On-screen button identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    /// Toggles between running and stopped
    StartStop,
    /// Clears a stopped stopwatch
    Reset,
}

impl ButtonId {
    /// All buttons, in layout order
    pub const ALL: [ButtonId; 2] = [ButtonId::StartStop, ButtonId::Reset];

    /// Config/table name
    pub fn name(self) -> &'static str {
        match self {
            ButtonId::StartStop => "start_stop",
            ButtonId::Reset => "reset",
        }
    }

    /// Look up a button by its config name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }
}

/// Debounced button transitions emitted by the touch sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// A press landed inside the button (a "tap")
    Pressed(ButtonId),
    /// The press that started inside the button was released
    Released(ButtonId),
}

impl ButtonEvent {
    /// The button this event refers to
    pub fn button(&self) -> ButtonId {
        match self {
            ButtonEvent::Pressed(id) | ButtonEvent::Released(id) => *id,
        }
    }

    /// Returns true for the press transition
    pub fn is_press(&self) -> bool {
        matches!(self, ButtonEvent::Pressed(_))
    }
}
