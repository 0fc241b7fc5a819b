use serde::{Deserialize, Serialize};

/// Symbolic icon identifiers a category may reference.
///
/// The set is closed: a catalog naming an icon outside it fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Calculator,
    Code,
    FileText,
    Sparkles,
    Image,
    Music,
    DollarSign,
    Clock,
    Heart,
    Palette,
}

impl Icon {
    #[cfg(test)]
    pub const ALL: [Icon; 10] = [
        Icon::Calculator,
        Icon::Code,
        Icon::FileText,
        Icon::Sparkles,
        Icon::Image,
        Icon::Music,
        Icon::DollarSign,
        Icon::Clock,
        Icon::Heart,
        Icon::Palette,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Icon::Calculator => "calculator",
            Icon::Code => "code",
            Icon::FileText => "file-text",
            Icon::Sparkles => "sparkles",
            Icon::Image => "image",
            Icon::Music => "music",
            Icon::DollarSign => "dollar-sign",
            Icon::Clock => "clock",
            Icon::Heart => "heart",
            Icon::Palette => "palette",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Calculator => "🧮",
            Icon::Code => "💻",
            Icon::FileText => "📄",
            Icon::Sparkles => "✨",
            Icon::Image => "🖼️",
            Icon::Music => "🎵",
            Icon::DollarSign => "💲",
            Icon::Clock => "⏰",
            Icon::Heart => "❤️",
            Icon::Palette => "🎨",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Icon;

    #[test]
    fn serde_name_matches_as_str() {
        for icon in Icon::ALL {
            let json = serde_json::to_string(&icon).expect("icon serializes");
            assert_eq!(json, format!("\"{}\"", icon.as_str()));
            let back: Icon = serde_json::from_str(&json).expect("icon deserializes");
            assert_eq!(back, icon);
        }
    }

    #[test]
    fn unknown_icon_is_rejected() {
        assert!(serde_json::from_str::<Icon>("\"rocket\"").is_err());
    }

    #[test]
    fn every_icon_has_a_glyph() {
        assert!(Icon::ALL.iter().all(|icon| !icon.glyph().is_empty()));
    }
}
