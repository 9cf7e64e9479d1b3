use std::fmt::{self, Display};

/// A sticker color, with the RGB value a renderer should paint it with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Blue,
    Green,
    White,
    Yellow,
    Orange,
    Red,
    Purple,
}

impl Color {
    pub const ALL: [Self; 7] = [
        Color::Blue,
        Color::Green,
        Color::White,
        Color::Yellow,
        Color::Orange,
        Color::Red,
        Color::Purple,
    ];

    #[must_use]
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Blue => (2, 0, 255),
            Color::Green => (1, 255, 2),
            Color::White => (255, 255, 255),
            Color::Yellow => (255, 255, 1),
            Color::Orange => (255, 140, 2),
            Color::Red => (255, 0, 1),
            Color::Purple => (255, 0, 255),
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Blue => "blue",
            Color::Green => "green",
            Color::White => "white",
            Color::Yellow => "yellow",
            Color::Orange => "orange",
            Color::Red => "red",
            Color::Purple => "purple",
        };
        f.write_str(name)
    }
}
