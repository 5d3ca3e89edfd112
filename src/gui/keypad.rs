//! Button layout and the expression buffer behind the calculator window.
//!
//! Kept free of toolkit types so the button behaviour can be tested
//! headlessly.

use crate::calculator::{CalcError, Calculator};

/// What a button does to the expression buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonAction {
    /// Append text to the buffer.
    Append(&'static str),
    /// Empty the buffer.
    Clear,
    /// Add or remove a leading minus sign.
    ToggleSign,
    /// Replace the buffer with the evaluated result.
    Evaluate,
}

/// A labelled button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Key {
    pub label: &'static str,
    pub action: ButtonAction,
}

const fn key(label: &'static str, action: ButtonAction) -> Key {
    Key { label, action }
}

const fn append(label: &'static str) -> Key {
    key(label, ButtonAction::Append(label))
}

pub const COLUMNS: usize = 4;

/// The button grid, row by row.
pub const KEYPAD: [[Key; COLUMNS]; 7] = [
    [append("7"), append("8"), append("9"), append("/")],
    [append("4"), append("5"), append("6"), append("*")],
    [append("1"), append("2"), append("3"), append("-")],
    [append("0"), append("."), append("("), append(")")],
    [
        key("C", ButtonAction::Clear),
        key("±", ButtonAction::ToggleSign),
        append("%"),
        append("+"),
    ],
    [
        key("sin", ButtonAction::Append("sin(")),
        key("cos", ButtonAction::Append("cos(")),
        key("tan", ButtonAction::Append("tan(")),
        key("sqrt", ButtonAction::Append("sqrt(")),
    ],
    [
        key("pow", ButtonAction::Append("pow(")),
        append("pi"),
        append("e"),
        key("=", ButtonAction::Evaluate),
    ],
];

/// The expression being typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    buffer: String,
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Apply one button press. On an evaluation error the buffer is left as
    /// it was and the error is returned for display.
    pub fn apply(&mut self, action: ButtonAction, calculator: &Calculator) -> Result<(), CalcError> {
        match action {
            ButtonAction::Append(text) => self.buffer.push_str(text),
            ButtonAction::Clear => self.buffer.clear(),
            ButtonAction::ToggleSign => match self.buffer.strip_prefix('-') {
                Some(rest) => self.buffer = rest.to_string(),
                None => self.buffer.insert(0, '-'),
            },
            ButtonAction::Evaluate => {
                let result = calculator.evaluate(&self.buffer)?;
                self.buffer = result.to_string();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_all(keypad: &mut Keypad, labels: &[&str], calculator: &Calculator) -> Result<(), CalcError> {
        for label in labels {
            let action = KEYPAD
                .iter()
                .flatten()
                .find(|key| key.label == *label)
                .map(|key| key.action)
                .unwrap_or_else(|| panic!("no key labelled {label}"));
            keypad.apply(action, calculator)?;
        }
        Ok(())
    }

    #[test]
    fn test_layout() {
        assert_eq!(KEYPAD.len(), 7);
        let labels: Vec<&str> = KEYPAD.iter().flatten().map(|key| key.label).collect();
        assert_eq!(labels.len(), 28);
        assert_eq!(labels[0], "7");
        assert_eq!(labels[27], "=");
    }

    #[test]
    fn test_append_and_evaluate() {
        let calculator = Calculator::default();
        let mut keypad = Keypad::new();
        press_all(&mut keypad, &["1", "2", "+", "3", "0"], &calculator).unwrap();
        assert_eq!(keypad.buffer(), "12+30");
        press_all(&mut keypad, &["="], &calculator).unwrap();
        assert_eq!(keypad.buffer(), "42");
    }

    #[test]
    fn test_function_shortcuts_open_a_call() {
        let calculator = Calculator::default();
        let mut keypad = Keypad::new();
        press_all(&mut keypad, &["sqrt", "1", "6", ")"], &calculator).unwrap();
        assert_eq!(keypad.buffer(), "sqrt(16)");
        press_all(&mut keypad, &["="], &calculator).unwrap();
        assert_eq!(keypad.buffer(), "4.0");

        press_all(&mut keypad, &["C", "pi"], &calculator).unwrap();
        assert_eq!(keypad.buffer(), "pi");
    }

    #[test]
    fn test_toggle_sign() {
        let calculator = Calculator::default();
        let mut keypad = Keypad::new();
        press_all(&mut keypad, &["5", "±"], &calculator).unwrap();
        assert_eq!(keypad.buffer(), "-5");
        press_all(&mut keypad, &["±"], &calculator).unwrap();
        assert_eq!(keypad.buffer(), "5");
    }

    #[test]
    fn test_error_keeps_buffer() {
        let calculator = Calculator::default();
        let mut keypad = Keypad::new();
        let err = press_all(&mut keypad, &["1", "/", "0", "="], &calculator).unwrap_err();
        assert!(err.is_division_by_zero());
        assert_eq!(keypad.buffer(), "1/0");

        press_all(&mut keypad, &["C"], &calculator).unwrap();
        assert!(press_all(&mut keypad, &["="], &calculator).unwrap_err().is_invalid());
    }
}
