//! Terminal output helpers shared by the views and the notifier.

use std::fmt::Display;

const RULE_WIDTH: usize = 56;

pub fn section(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "─".repeat(RULE_WIDTH));
}

pub fn key_value(label: &str, value: impl Display) {
    println!("{label:<16} {value}");
}

pub fn ok(message: &str) {
    println!("✓ {message}");
}

pub fn warn(message: &str) {
    println!("⚠ {message}");
}

pub fn error(message: &str) {
    eprintln!("✗ {message}");
}

pub fn note(message: &str) {
    println!("{message}");
}
