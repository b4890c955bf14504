use crate::SetupRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteColor {
    pub name: &'static str,
    pub value: &'static str,
}

const fn color(name: &'static str, value: &'static str) -> PaletteColor {
    PaletteColor { name, value }
}

pub const PALETTE: &[PaletteColor] = &[
    color("Blue", "#3B82F6"),
    color("Red", "#EF4444"),
    color("Green", "#10B981"),
    color("Yellow", "#F59E0B"),
    color("Purple", "#8B5CF6"),
    color("Pink", "#EC4899"),
    color("Indigo", "#6366F1"),
    color("Emerald", "#059669"),
    color("Orange", "#F97316"),
    color("Cyan", "#06B6D4"),
    color("Lime", "#84CC16"),
    color("Teal", "#14B8A6"),
    color("Sky", "#0EA5E9"),
    color("Magenta", "#D946EF"),
    color("Coral", "#F43F5E"),
    color("Lavender", "#7C3AED"),
    color("Amber", "#D97706"),
    color("Ocean", "#0891B2"),
    color("Raspberry", "#DB2777"),
    color("Sapphire", "#4F46E5"),
    color("Chartreuse", "#65A30D"),
    color("Sea Green", "#0D9488"),
    color("French Blue", "#0284C7"),
    color("Orchid", "#C026D3"),
    color("Carmine", "#E11D48"),
    color("Jade", "#047857"),
    color("Amethyst", "#6D28D9"),
    color("Mango", "#EA580C"),
    color("Ruby", "#DC2626"),
    color("Forest", "#16A34A"),
    color("Plum", "#9333EA"),
    color("Pastel Lavender", "#DDD6FE"),
    color("Mint", "#A7F3D0"),
    color("Peach", "#FED7AA"),
    color("Pastel Pink", "#FBCFE8"),
];

pub fn color_name(value: &str) -> Option<&'static str> {
    find(value).map(|color| color.name)
}

pub fn find(value: &str) -> Option<&'static PaletteColor> {
    PALETTE
        .iter()
        .find(|color| color.value.eq_ignore_ascii_case(value))
}

pub fn index_of(value: &str) -> Option<usize> {
    PALETTE
        .iter()
        .position(|color| color.value.eq_ignore_ascii_case(value))
}

/// Up to `count` distinct palette values, none of which appear in `used`.
pub fn random_unique_colors(count: usize, used: &[String], rng: &mut SetupRng) -> Vec<String> {
    let mut available: Vec<&PaletteColor> = PALETTE
        .iter()
        .filter(|color| !used.iter().any(|value| value.eq_ignore_ascii_case(color.value)))
        .collect();
    rng.shuffle(&mut available);
    available
        .into_iter()
        .take(count)
        .map(|color| color.value.to_string())
        .collect()
}

/// RGB components of a `#RRGGBB` value.
pub fn rgb(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn palette_values_are_unique() {
        let values: HashSet<_> = PALETTE.iter().map(|color| color.value).collect();
        assert_eq!(values.len(), PALETTE.len());
    }

    #[test]
    fn random_unique_colors_skips_used_values() {
        let mut rng = SetupRng::from_seed(7);
        let used = vec!["#3B82F6".to_string(), "#ef4444".to_string()];
        let picked = random_unique_colors(5, &used, &mut rng);
        assert_eq!(picked.len(), 5);
        assert!(!picked.iter().any(|value| value == "#3B82F6" || value == "#EF4444"));
        let distinct: HashSet<_> = picked.iter().collect();
        assert_eq!(distinct.len(), picked.len());
    }

    #[test]
    fn random_unique_colors_caps_at_available() {
        let mut rng = SetupRng::from_seed(1);
        let used: Vec<String> = PALETTE[1..].iter().map(|c| c.value.to_string()).collect();
        assert_eq!(random_unique_colors(4, &used, &mut rng), vec!["#3B82F6"]);
    }

    #[test]
    fn rgb_parses_hex() {
        assert_eq!(rgb("#3B82F6"), Some((0x3B, 0x82, 0xF6)));
        assert_eq!(rgb("3B82F6"), None);
        assert_eq!(rgb("#3B82"), None);
        assert_eq!(color_name("#10b981"), Some("Green"));
    }
}
