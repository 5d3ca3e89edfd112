//! calcpad: a safe arithmetic calculator with an interactive loop, a
//! graphical keypad, and a few helpers for publishing work.

pub mod calculator;
pub mod cli;
pub mod config;
pub mod gui;
pub mod helpers;
pub mod repl;
