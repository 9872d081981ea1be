//! Host keyboard controls shared by the frontends.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    TogglePause,
    /// Zero-based phase index.
    SkipToPhase(usize),
    EmergencyStop,
}

/// Map a DOM-style key value (`" "`, `"Escape"`, `"1"`) to a control.
#[inline]
pub fn control_for_key(key: &str) -> Option<Control> {
    match key {
        " " | "Space" | "Spacebar" => Some(Control::TogglePause),
        "Escape" | "Esc" => Some(Control::EmergencyStop),
        _ => match key.as_bytes() {
            [d @ b'1'..=b'9'] => Some(Control::SkipToPhase(usize::from(d - b'1'))),
            _ => None,
        },
    }
}
