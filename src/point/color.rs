/// A RGB color value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    /// Red channel.
    pub red: u16,
    /// Green channel.
    pub green: u16,
    /// Blue channel.
    pub blue: u16,
}

impl Color {
    /// Creates a new color from its red, green, and blue channels.
    pub fn new(red: u16, green: u16, blue: u16) -> Color {
        Color { red, green, blue }
    }
}
