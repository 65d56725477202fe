//! Accent palette and light/dark mode, rendered as 24-bit ANSI colors.

use std::str::FromStr;

use anyhow::anyhow;
use client_core::Level;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn hex(value: u32) -> Self {
        Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accent {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
}

impl Accent {
    /// (primary, primary-dark)
    pub fn palette(self) -> (Rgb, Rgb) {
        match self {
            Accent::Blue => (Rgb::hex(0x2563eb), Rgb::hex(0x1d4ed8)),
            Accent::Green => (Rgb::hex(0x16a34a), Rgb::hex(0x15803d)),
            Accent::Purple => (Rgb::hex(0x7c3aed), Rgb::hex(0x6d28d9)),
            Accent::Orange => (Rgb::hex(0xea580c), Rgb::hex(0xc2410c)),
        }
    }
}

impl FromStr for Accent {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "blue" => Ok(Accent::Blue),
            "green" => Ok(Accent::Green),
            "purple" => Ok(Accent::Purple),
            "orange" => Ok(Accent::Orange),
            other => Err(anyhow!(
                "unknown accent '{other}', expected blue, green, purple or orange"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Dark,
    Light,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Mode::Dark),
            "light" => Ok(Mode::Light),
            other => Err(anyhow!("unknown mode '{other}', expected dark or light")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Accent,
    AccentStrong,
    Muted,
    Level(Level),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub accent: Accent,
    pub mode: Mode,
    pub color: bool,
}

impl Theme {
    pub fn new(accent: Accent, mode: Mode, color: bool) -> Self {
        Self {
            accent,
            mode,
            color,
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self::new(Accent::default(), Mode::default(), false)
    }

    fn rgb(&self, role: Role) -> Rgb {
        let (primary, primary_dark) = self.accent.palette();
        match (role, self.mode) {
            (Role::Accent, _) | (Role::Level(Level::Info), _) => primary,
            (Role::AccentStrong, _) => primary_dark,
            (Role::Muted, Mode::Dark) => Rgb::hex(0x9ca3af),
            (Role::Muted, Mode::Light) => Rgb::hex(0x4b5563),
            (Role::Level(Level::Success), Mode::Dark) => Rgb::hex(0x4ade80),
            (Role::Level(Level::Success), Mode::Light) => Rgb::hex(0x15803d),
            (Role::Level(Level::Error), Mode::Dark) => Rgb::hex(0xf87171),
            (Role::Level(Level::Error), Mode::Light) => Rgb::hex(0xb91c1c),
        }
    }

    pub fn paint(&self, role: Role, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let Rgb(r, g, b) = self.rgb(role);
        format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m")
    }
}
