// Simple color struct, created from an unsigned 32 representing RRGGBBAA,
// plus the fixed palette the cursor trail picks from

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

pub const PALETTE: [Color; 15] = [
    Color::from_u32(0xff6b6bff),
    Color::from_u32(0x4ecdc4ff),
    Color::from_u32(0x45b7d1ff),
    Color::from_u32(0x96ceb4ff),
    Color::from_u32(0xfeca57ff),
    Color::from_u32(0xff9ff3ff),
    Color::from_u32(0x54a0ffff),
    Color::from_u32(0x5f27cdff),
    Color::from_u32(0x00d2d3ff),
    Color::from_u32(0xff9f43ff),
    Color::from_u32(0xff6348ff),
    Color::from_u32(0x2ed573ff),
    Color::from_u32(0x1e90ffff),
    Color::from_u32(0xff4757ff),
    Color::from_u32(0x3742faff),
];

impl Color {
    pub const TRANSPARENT: Color = Color::from_u32(0x00000000);

    pub const fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;
        let a = num as u8;

        Color { r, g, b, a }
    }

    // Canvas gradient stops take CSS color strings
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            self.a as f64 / 255.0
        )
    }
}
