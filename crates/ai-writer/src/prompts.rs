/// Prompt templates for the generator tools.
///
/// Tones and lengths are parsed permissively: unknown or missing values fall back to the
/// default variant rather than failing the request.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Friendly,
    Persuasive,
    Formal,
}

impl Tone {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("casual") => Self::Casual,
            Some("friendly") => Self::Friendly,
            Some("persuasive") => Self::Persuasive,
            Some("formal") => Self::Formal,
            _ => Self::Professional,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Friendly => "friendly",
            Self::Persuasive => "persuasive",
            Self::Formal => "formal",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Length {
    Short,
    #[default]
    Medium,
    Long,
}

impl Length {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("short") => Self::Short,
            Some("long") => Self::Long,
            _ => Self::Medium,
        }
    }

    /// Approximate target word count.
    pub fn words(self) -> u32 {
        match self {
            Self::Short => 300,
            Self::Medium => 800,
            Self::Long => 1500,
        }
    }
}

pub fn article_prompt(topic: &str, tone: Tone, length: Length) -> String {
    format!(
        "Write a well-structured article of about {words} words on the topic below, in a \
{tone} tone. Use Markdown: a title, an introduction, several sections with headings, \
and a conclusion. Return only the article.\n\nTOPIC:\n{topic}",
        words = length.words(),
        tone = tone.as_str(),
    )
}

pub fn code_prompt(specification: &str, language: &str) -> String {
    format!(
        "Write complete, properly formatted {language} code to satisfy the specification. \
Return only the code (no explanation) unless the specification explicitly requests explanation.\n\n\
SPECIFICATION:\n{specification}"
    )
}

pub fn email_prompt(
    purpose: &str,
    recipient: Option<&str>,
    tone: Tone,
    key_points: &[String],
) -> String {
    let mut prompt = format!(
        "Write an email in a {tone} tone. Include a subject line, a greeting, a concise body \
and a sign-off. Return only the email.\n\nPURPOSE:\n{purpose}",
        tone = tone.as_str(),
    );
    if let Some(recipient) = recipient.map(str::trim).filter(|r| !r.is_empty()) {
        prompt.push_str(&format!("\n\nRECIPIENT:\n{recipient}"));
    }
    let points: Vec<&str> = key_points
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    if !points.is_empty() {
        prompt.push_str("\n\nKEY POINTS:");
        for point in points {
            prompt.push_str(&format!("\n- {point}"));
        }
    }
    prompt
}

pub fn image_prompt(subject: &str, style: Option<&str>, mood: Option<&str>) -> String {
    let mut details = Vec::new();
    if let Some(style) = style.map(str::trim).filter(|s| !s.is_empty()) {
        details.push(format!("Art style: {style}."));
    }
    if let Some(mood) = mood.map(str::trim).filter(|m| !m.is_empty()) {
        details.push(format!("Mood: {mood}."));
    }
    let details = if details.is_empty() {
        String::new()
    } else {
        format!("\n{}", details.join("\n"))
    };
    format!(
        "Turn the idea below into one detailed prompt for a text-to-image model. Describe the \
subject, composition, lighting, colors and camera or medium. Return only the prompt text, \
without quotes.\n\nIDEA:\n{subject}{details}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_and_length_fall_back_to_defaults() {
        assert_eq!(Tone::parse(None), Tone::Professional);
        assert_eq!(Tone::parse(Some(" Casual ")), Tone::Casual);
        assert_eq!(Tone::parse(Some("sarcastic")), Tone::Professional);
        assert_eq!(Length::parse(Some("LONG")), Length::Long);
        assert_eq!(Length::parse(Some("epic")), Length::Medium);
    }

    #[test]
    fn article_prompt_carries_topic_tone_and_length() {
        let prompt = article_prompt("Rust lifetimes", Tone::Friendly, Length::Short);
        assert!(prompt.contains("about 300 words"));
        assert!(prompt.contains("friendly tone"));
        assert!(prompt.ends_with("TOPIC:\nRust lifetimes"));
    }

    #[test]
    fn code_prompt_names_language() {
        let prompt = code_prompt("parse a CSV line", "Python");
        assert!(prompt.starts_with("Write complete, properly formatted Python code"));
        assert!(prompt.ends_with("SPECIFICATION:\nparse a CSV line"));
    }

    #[test]
    fn email_prompt_skips_blank_sections() {
        let bare = email_prompt("ask for a meeting", Some("  "), Tone::Formal, &[]);
        assert!(!bare.contains("RECIPIENT"));
        assert!(!bare.contains("KEY POINTS"));

        let full = email_prompt(
            "ask for a meeting",
            Some("Dana"),
            Tone::Formal,
            &["Tuesday works".to_string(), " ".to_string()],
        );
        assert!(full.contains("RECIPIENT:\nDana"));
        assert!(full.ends_with("KEY POINTS:\n- Tuesday works"));
    }

    #[test]
    fn image_prompt_appends_optional_details() {
        assert!(image_prompt("a lighthouse", None, None).ends_with("IDEA:\na lighthouse"));
        let detailed = image_prompt("a lighthouse", Some("watercolor"), Some("calm"));
        assert!(detailed.ends_with("a lighthouse\nArt style: watercolor.\nMood: calm."));
    }
}
