use skillgraph_core::{GraphKind, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    fn mix(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb(
            lerp(self.0, other.0),
            lerp(self.1, other.1),
            lerp(self.2, other.2),
        )
    }
}

const WHITE: Rgb = Rgb(255, 255, 255);

fn base_color(kind: GraphKind) -> Rgb {
    match kind {
        GraphKind::Knowledge => Rgb(0x2f, 0x6f, 0xd6),
        GraphKind::Ability => Rgb(0xe0, 0x7a, 0x1f),
    }
}

fn level_index(level: Level) -> u8 {
    match level {
        Level::Root => 0,
        Level::Chapter => 1,
        Level::Section => 2,
        Level::Subsection => 3,
        Level::Point => 4,
        Level::Detail => 5,
    }
}

/// Deeper levels fade towards white.
pub fn node_color(kind: GraphKind, level: Level) -> Rgb {
    let fade = level_index(level) as f32 * 0.12;
    base_color(kind).mix(WHITE, fade)
}

/// Visual radius from importance; roots are drawn one step larger than the maximum.
pub fn node_size(level: Level, importance: f32, min: f32, max: f32) -> f32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    if level == Level::Root {
        return hi * 1.25;
    }
    let importance = if importance.is_finite() {
        importance.clamp(0.0, 1.0)
    } else {
        0.5
    };
    lo + (hi - lo) * importance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formatting() {
        assert_eq!(Rgb(0, 0x10, 0xff).to_hex(), "#0010ff");
    }

    #[test]
    fn deeper_levels_are_lighter() {
        let root = node_color(GraphKind::Knowledge, Level::Root);
        let point = node_color(GraphKind::Knowledge, Level::Point);
        assert!(point.0 > root.0 && point.1 > root.1);
        assert_ne!(
            node_color(GraphKind::Knowledge, Level::Chapter),
            node_color(GraphKind::Ability, Level::Chapter)
        );
    }

    #[test]
    fn size_tracks_importance_and_ignores_nan() {
        assert_eq!(node_size(Level::Chapter, 0.0, 0.5, 1.5), 0.5);
        assert_eq!(node_size(Level::Chapter, 1.0, 0.5, 1.5), 1.5);
        assert_eq!(node_size(Level::Chapter, 7.0, 0.5, 1.5), 1.5);
        assert_eq!(node_size(Level::Chapter, f32::NAN, 0.5, 1.5), 1.0);
        assert!(node_size(Level::Root, 0.0, 0.5, 1.5) > 1.5);
    }
}
