// Copyright 2026 the Stacked Cards Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSS color parsing and interpolation.
//!
//! The forms that show up in computed styles and hand-written options are
//! understood: hex notation (`#rgb`, `#rrggbb`, `#rrggbbaa`), the
//! comma-separated `rgb()`/`rgba()` and `hsl()`/`hsla()` functions, the CSS
//! named colors, and `transparent`.

use alloc::format;
use alloc::string::String;
use core::fmt;

/// An 8-bit-per-channel color with a floating-point alpha.
#[derive(Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha in `0.0..=1.0`.
    pub a: f64,
}

impl fmt::Debug for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0.0);

    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parses a CSS color string. Returns `None` for anything unrecognized.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("transparent") {
            return Some(Self::TRANSPARENT);
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = s.to_ascii_lowercase();
        if let Some(body) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
        {
            return parse_rgb(body.strip_suffix(')')?);
        }
        if let Some(body) = lower
            .strip_prefix("hsla(")
            .or_else(|| lower.strip_prefix("hsl("))
        {
            return parse_hsl(body.strip_suffix(')')?);
        }
        named(&lower)
    }

    /// Linearly interpolates towards `other`; `t` is clamped to `0.0..=1.0`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| -> u8 {
            let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
            to_channel(v)
        };
        Self {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Formats the color as a CSS `rgba()` value.
    #[must_use]
    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Rounds to the nearest integer channel value, saturating at `0..=255`.
fn to_channel(v: f64) -> u8 {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is clamped to 0..=255 before the cast"
    )]
    {
        (v.clamp(0.0, 255.0) + 0.5) as u8
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Rgba::new(
            nibble(0)? * 17,
            nibble(1)? * 17,
            nibble(2)? * 17,
            1.0,
        )),
        6 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, 1.0)),
        8 => Some(Rgba::new(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            f64::from(byte(6)?) / 255.0,
        )),
        _ => None,
    }
}

fn parse_rgb(body: &str) -> Option<Rgba> {
    let mut parts = body.split(',').map(str::trim);
    let mut channel = || -> Option<u8> { parse_number(parts.next()?).map(to_channel) };
    let r = channel()?;
    let g = channel()?;
    let b = channel()?;
    let a = parse_alpha(parts.next())?;
    if parts.next().is_some() {
        return None;
    }
    Some(Rgba::new(r, g, b, a))
}

fn parse_hsl(body: &str) -> Option<Rgba> {
    let mut parts = body.split(',').map(str::trim);
    let hue = parts.next()?;
    let hue = parse_number(hue.strip_suffix("deg").unwrap_or(hue))?;
    let saturation = parse_percentage(parts.next()?)?;
    let lightness = parse_percentage(parts.next()?)?;
    let a = parse_alpha(parts.next())?;
    if parts.next().is_some() {
        return None;
    }

    let h = (hue % 360.0 + 360.0) % 360.0 / 360.0;
    let t2 = if lightness <= 0.5 {
        lightness * (saturation + 1.0)
    } else {
        lightness + saturation - lightness * saturation
    };
    let t1 = lightness * 2.0 - t2;
    let channel = |h: f64| to_channel(hue_to_rgb(t1, t2, h) * 255.0);
    Some(Rgba::new(
        channel(h + 1.0 / 3.0),
        channel(h),
        channel(h - 1.0 / 3.0),
        a,
    ))
}

fn hue_to_rgb(t1: f64, t2: f64, h: f64) -> f64 {
    let h = if h < 0.0 {
        h + 1.0
    } else if h > 1.0 {
        h - 1.0
    } else {
        h
    };
    if h * 6.0 < 1.0 {
        t1 + (t2 - t1) * h * 6.0
    } else if h * 2.0 < 1.0 {
        t2
    } else if h * 3.0 < 2.0 {
        t1 + (t2 - t1) * (2.0 / 3.0 - h) * 6.0
    } else {
        t1
    }
}

fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses `N%` into `0.0..=1.0`.
fn parse_percentage(token: &str) -> Option<f64> {
    parse_number(token.strip_suffix('%')?).map(|v| (v / 100.0).clamp(0.0, 1.0))
}

/// Parses an optional alpha component; a missing one is opaque.
fn parse_alpha(token: Option<&str>) -> Option<f64> {
    let Some(token) = token else {
        return Some(1.0);
    };
    let a = match token.strip_suffix('%') {
        Some(pct) => parse_number(pct)? / 100.0,
        None => parse_number(token)?,
    };
    Some(a.clamp(0.0, 1.0))
}

fn named(name: &str) -> Option<Rgba> {
    let idx = NAMED_COLORS
        .binary_search_by(|(key, _)| key.cmp(&name))
        .ok()?;
    let [_, r, g, b] = NAMED_COLORS[idx].1.to_be_bytes();
    Some(Rgba::new(r, g, b, 1.0))
}

/// CSS named colors as `0xRRGGBB`, sorted by name.
const NAMED_COLORS: [(&str, u32); 148] = [
    ("aliceblue", 0xf0f8ff),
    ("antiquewhite", 0xfaebd7),
    ("aqua", 0x00ffff),
    ("aquamarine", 0x7fffd4),
    ("azure", 0xf0ffff),
    ("beige", 0xf5f5dc),
    ("bisque", 0xffe4c4),
    ("black", 0x000000),
    ("blanchedalmond", 0xffebcd),
    ("blue", 0x0000ff),
    ("blueviolet", 0x8a2be2),
    ("brown", 0xa52a2a),
    ("burlywood", 0xdeb887),
    ("cadetblue", 0x5f9ea0),
    ("chartreuse", 0x7fff00),
    ("chocolate", 0xd2691e),
    ("coral", 0xff7f50),
    ("cornflowerblue", 0x6495ed),
    ("cornsilk", 0xfff8dc),
    ("crimson", 0xdc143c),
    ("cyan", 0x00ffff),
    ("darkblue", 0x00008b),
    ("darkcyan", 0x008b8b),
    ("darkgoldenrod", 0xb8860b),
    ("darkgray", 0xa9a9a9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xa9a9a9),
    ("darkkhaki", 0xbdb76b),
    ("darkmagenta", 0x8b008b),
    ("darkolivegreen", 0x556b2f),
    ("darkorange", 0xff8c00),
    ("darkorchid", 0x9932cc),
    ("darkred", 0x8b0000),
    ("darksalmon", 0xe9967a),
    ("darkseagreen", 0x8fbc8f),
    ("darkslateblue", 0x483d8b),
    ("darkslategray", 0x2f4f4f),
    ("darkslategrey", 0x2f4f4f),
    ("darkturquoise", 0x00ced1),
    ("darkviolet", 0x9400d3),
    ("deeppink", 0xff1493),
    ("deepskyblue", 0x00bfff),
    ("dimgray", 0x696969),
    ("dimgrey", 0x696969),
    ("dodgerblue", 0x1e90ff),
    ("firebrick", 0xb22222),
    ("floralwhite", 0xfffaf0),
    ("forestgreen", 0x228b22),
    ("fuchsia", 0xff00ff),
    ("gainsboro", 0xdcdcdc),
    ("ghostwhite", 0xf8f8ff),
    ("gold", 0xffd700),
    ("goldenrod", 0xdaa520),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("greenyellow", 0xadff2f),
    ("grey", 0x808080),
    ("honeydew", 0xf0fff0),
    ("hotpink", 0xff69b4),
    ("indianred", 0xcd5c5c),
    ("indigo", 0x4b0082),
    ("ivory", 0xfffff0),
    ("khaki", 0xf0e68c),
    ("lavender", 0xe6e6fa),
    ("lavenderblush", 0xfff0f5),
    ("lawngreen", 0x7cfc00),
    ("lemonchiffon", 0xfffacd),
    ("lightblue", 0xadd8e6),
    ("lightcoral", 0xf08080),
    ("lightcyan", 0xe0ffff),
    ("lightgoldenrodyellow", 0xfafad2),
    ("lightgray", 0xd3d3d3),
    ("lightgreen", 0x90ee90),
    ("lightgrey", 0xd3d3d3),
    ("lightpink", 0xffb6c1),
    ("lightsalmon", 0xffa07a),
    ("lightseagreen", 0x20b2aa),
    ("lightskyblue", 0x87cefa),
    ("lightslategray", 0x778899),
    ("lightslategrey", 0x778899),
    ("lightsteelblue", 0xb0c4de),
    ("lightyellow", 0xffffe0),
    ("lime", 0x00ff00),
    ("limegreen", 0x32cd32),
    ("linen", 0xfaf0e6),
    ("magenta", 0xff00ff),
    ("maroon", 0x800000),
    ("mediumaquamarine", 0x66cdaa),
    ("mediumblue", 0x0000cd),
    ("mediumorchid", 0xba55d3),
    ("mediumpurple", 0x9370db),
    ("mediumseagreen", 0x3cb371),
    ("mediumslateblue", 0x7b68ee),
    ("mediumspringgreen", 0x00fa9a),
    ("mediumturquoise", 0x48d1cc),
    ("mediumvioletred", 0xc71585),
    ("midnightblue", 0x191970),
    ("mintcream", 0xf5fffa),
    ("mistyrose", 0xffe4e1),
    ("moccasin", 0xffe4b5),
    ("navajowhite", 0xffdead),
    ("navy", 0x000080),
    ("oldlace", 0xfdf5e6),
    ("olive", 0x808000),
    ("olivedrab", 0x6b8e23),
    ("orange", 0xffa500),
    ("orangered", 0xff4500),
    ("orchid", 0xda70d6),
    ("palegoldenrod", 0xeee8aa),
    ("palegreen", 0x98fb98),
    ("paleturquoise", 0xafeeee),
    ("palevioletred", 0xdb7093),
    ("papayawhip", 0xffefd5),
    ("peachpuff", 0xffdab9),
    ("peru", 0xcd853f),
    ("pink", 0xffc0cb),
    ("plum", 0xdda0dd),
    ("powderblue", 0xb0e0e6),
    ("purple", 0x800080),
    ("rebeccapurple", 0x663399),
    ("red", 0xff0000),
    ("rosybrown", 0xbc8f8f),
    ("royalblue", 0x4169e1),
    ("saddlebrown", 0x8b4513),
    ("salmon", 0xfa8072),
    ("sandybrown", 0xf4a460),
    ("seagreen", 0x2e8b57),
    ("seashell", 0xfff5ee),
    ("sienna", 0xa0522d),
    ("silver", 0xc0c0c0),
    ("skyblue", 0x87ceeb),
    ("slateblue", 0x6a5acd),
    ("slategray", 0x708090),
    ("slategrey", 0x708090),
    ("snow", 0xfffafa),
    ("springgreen", 0x00ff7f),
    ("steelblue", 0x4682b4),
    ("tan", 0xd2b48c),
    ("teal", 0x008080),
    ("thistle", 0xd8bfd8),
    ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0),
    ("violet", 0xee82ee),
    ("wheat", 0xf5deb3),
    ("white", 0xffffff),
    ("whitesmoke", 0xf5f5f5),
    ("yellow", 0xffff00),
    ("yellowgreen", 0x9acd32),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Rgba::parse("#3498db"), Some(Rgba::new(0x34, 0x98, 0xdb, 1.0)));
        assert_eq!(Rgba::parse("#fff"), Some(Rgba::new(255, 255, 255, 1.0)));
        let with_alpha = Rgba::parse("#00000080").unwrap();
        assert!((with_alpha.a - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn parses_computed_style_forms() {
        assert_eq!(
            Rgba::parse("rgb(52, 152, 219)"),
            Some(Rgba::new(52, 152, 219, 1.0))
        );
        assert_eq!(
            Rgba::parse("rgba(0, 0, 0, 0)"),
            Some(Rgba::TRANSPARENT)
        );
        assert_eq!(Rgba::parse("transparent"), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(Rgba::parse("bluish"), None);
        assert_eq!(Rgba::parse("hsl(10, 50, 50%)"), None);
        assert_eq!(Rgba::parse("hsl(10, 50%)"), None);
        assert_eq!(Rgba::parse("#12"), None);
        assert_eq!(Rgba::parse("#gggggg"), None);
        assert_eq!(Rgba::parse("rgb(1, 2)"), None);
        assert_eq!(Rgba::parse("rgb(1, 2, 3, 4, 5)"), None);
    }

    #[test]
    fn parses_named_colors() {
        assert_eq!(Rgba::parse("tomato"), Some(Rgba::new(255, 99, 71, 1.0)));
        assert_eq!(Rgba::parse("Navy"), Some(Rgba::new(0, 0, 128, 1.0)));
        assert_eq!(Rgba::parse(" white "), Some(Rgba::new(255, 255, 255, 1.0)));
        assert_eq!(Rgba::parse("rebeccapurple"), Some(Rgba::new(0x66, 0x33, 0x99, 1.0)));
        assert_eq!(Rgba::parse("aliceblue"), Some(Rgba::new(0xf0, 0xf8, 0xff, 1.0)));
        assert_eq!(Rgba::parse("yellowgreen"), Some(Rgba::new(0x9a, 0xcd, 0x32, 1.0)));
    }

    #[test]
    fn named_table_is_sorted() {
        assert!(NAMED_COLORS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn parses_hsl_forms() {
        assert_eq!(Rgba::parse("hsl(0, 100%, 50%)"), Some(Rgba::new(255, 0, 0, 1.0)));
        assert_eq!(Rgba::parse("hsl(120deg, 100%, 25%)"), Some(Rgba::new(0, 128, 0, 1.0)));
        assert_eq!(
            Rgba::parse("HSLA(240, 100%, 50%, 0.5)"),
            Some(Rgba::new(0, 0, 255, 0.5))
        );
        assert_eq!(Rgba::parse("hsl(-120, 100%, 50%)"), Some(Rgba::new(0, 0, 255, 1.0)));
        assert_eq!(Rgba::parse("hsl(0, 0%, 100%)"), Some(Rgba::new(255, 255, 255, 1.0)));
        assert_eq!(
            Rgba::parse("hsla(9, 100%, 64%, 40%)"),
            Some(Rgba::new(255, 99, 71, 0.4))
        );
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let white = Rgba::new(255, 255, 255, 1.0);
        let blue = Rgba::new(0x34, 0x98, 0xdb, 1.0);
        assert_eq!(white.lerp(blue, 0.0), white);
        assert_eq!(white.lerp(blue, 1.0), blue);
        assert_eq!(white.lerp(blue, 2.0), blue, "t is clamped");
        let mid = Rgba::new(0, 0, 0, 0.0).lerp(Rgba::new(200, 100, 50, 1.0), 0.5);
        assert_eq!(mid, Rgba::new(100, 50, 25, 0.5));
    }
}
