//! Graphical calculator.
//!
//! The keypad logic lives in [`keypad`] and is always compiled; the GPUI
//! window is only built with the `gui` feature.

mod keypad;
#[cfg(feature = "gui")]
mod window;

pub use keypad::{ButtonAction, COLUMNS, KEYPAD, Key, Keypad};

use crate::calculator::Calculator;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuiError {
    #[error("Graphical calculator unavailable: {0}")]
    Unavailable(String),
}

/// Open the calculator window and block until it is closed.
#[cfg(feature = "gui")]
pub fn launch(calculator: Calculator) -> Result<(), GuiError> {
    if !display_available() {
        return Err(GuiError::Unavailable(
            "no display server found (neither WAYLAND_DISPLAY nor DISPLAY is set)".to_string(),
        ));
    }
    window::run(calculator);
    Ok(())
}

#[cfg(not(feature = "gui"))]
pub fn launch(_calculator: Calculator) -> Result<(), GuiError> {
    Err(GuiError::Unavailable(
        "this build does not include the `gui` feature".to_string(),
    ))
}

#[cfg(all(feature = "gui", target_os = "linux"))]
fn display_available() -> bool {
    ["WAYLAND_DISPLAY", "DISPLAY"]
        .iter()
        .any(|var| std::env::var_os(var).is_some_and(|value| !value.is_empty()))
}

#[cfg(all(feature = "gui", not(target_os = "linux")))]
fn display_available() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "gui"))]
    #[test]
    fn test_launch_without_gui_feature() {
        let err = launch(Calculator::default()).unwrap_err();
        assert!(matches!(err, GuiError::Unavailable(_)));
        assert_eq!(
            err.to_string(),
            "Graphical calculator unavailable: this build does not include the `gui` feature"
        );
    }

    #[test]
    fn test_unavailable_message() {
        let err = GuiError::Unavailable("no display server found".to_string());
        assert_eq!(
            err.to_string(),
            "Graphical calculator unavailable: no display server found"
        );
    }
}
