/// Full opacity bits of a packed colour.
const ALPHA_MASK: u32 = 0xFF00_0000;

/// A colour packed as `0xAARRGGBB` with the alpha byte always fully opaque.
///
/// # Examples
///
/// ```
/// use picto_image::Rgb;
///
/// let c = Rgb::new(255, 128, 0);
/// assert_eq!(c.packed(), 0xFFFF8000);
/// assert_eq!(c.channels(), [255, 128, 0]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(u32);

impl Rgb {
    /// Black, fully opaque.
    pub const BLACK: Rgb = Rgb(ALPHA_MASK);

    /// Create a colour from its three 8-bit channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(ALPHA_MASK | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Create a colour from a packed value. The alpha byte of `value` is ignored.
    pub const fn from_packed(value: u32) -> Self {
        Self(ALPHA_MASK | (value & 0x00FF_FFFF))
    }

    /// The red channel.
    pub const fn r(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// The green channel.
    pub const fn g(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// The blue channel.
    pub const fn b(&self) -> u8 {
        self.0 as u8
    }

    /// The packed value, including the opaque alpha byte.
    pub const fn packed(&self) -> u32 {
        self.0
    }

    /// The channels in `[r, g, b]` order.
    pub const fn channels(&self) -> [u8; 3] {
        [self.r(), self.g(), self.b()]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Rgb::new(c[0], c[1], c[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        c.channels()
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({},{},{})", self.r(), self.g(), self.b())
    }
}
