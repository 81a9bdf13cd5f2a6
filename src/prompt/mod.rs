//! Prompt composition.
//!
//! The prompt is a single pipe-delimited string of ordered clauses. It is
//! consumed as natural language by an image model, so nothing downstream
//! parses it back; the only contracts are clause order and the single
//! art-style directive block.

use crate::analysis::{Complexity, EnergyLevel, FeatureRecord, Mood, MusicalStyle};
use crate::instruments::DetectedInstrument;
use crate::palette::ColorPalette;

/// The three directive families an output prompt can carry. Exactly one of
/// these blocks ends up in every prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtStyle {
    Representational,
    Abstract,
    Balanced,
}

const REPRESENTATIONAL_BLOCK: &[&str] = &[
    "realistic painterly scene",
    "recognizable subjects and settings",
    "figurative composition with clear subject matter",
    "NO ABSTRACT ART - ONLY REPRESENTATIONAL",
];

const ABSTRACT_BLOCK: &[&str] = &[
    "abstract expressionist composition",
    "non-figurative flowing forms",
    "emphasis on color fields and texture over subject matter",
];

const BALANCED_BLOCK: &[&str] = &[
    "semi-abstract composition",
    "blend recognizable forms with abstract elements",
    "stylized but grounded imagery",
];

impl ArtStyle {
    pub fn directives(self) -> &'static [&'static str] {
        match self {
            ArtStyle::Representational => REPRESENTATIONAL_BLOCK,
            ArtStyle::Abstract => ABSTRACT_BLOCK,
            ArtStyle::Balanced => BALANCED_BLOCK,
        }
    }
}

/// Pick the directive block from mood, energy, complexity and style.
///
/// First match wins. The conditions overlap, so the order of the arms is the
/// tie-break: dramatic beats the abstract rule, mysterious-plus-high-energy
/// still lands on abstract, and everything unmatched falls through to
/// representational.
pub fn select_art_style(
    mood: Mood,
    energy: EnergyLevel,
    complexity: Complexity,
    style: MusicalStyle,
) -> ArtStyle {
    if matches!(mood, Mood::Peaceful | Mood::Calm) && complexity == Complexity::Simple {
        return ArtStyle::Representational;
    }
    if matches!(mood, Mood::Dramatic | Mood::Passionate) {
        return ArtStyle::Representational;
    }
    if mood == Mood::Mysterious || style == MusicalStyle::Ambient {
        return ArtStyle::Abstract;
    }
    if mood == Mood::Joyful && style == MusicalStyle::Pop {
        return ArtStyle::Balanced;
    }
    if mood == Mood::Energetic && energy == EnergyLevel::High {
        return ArtStyle::Representational;
    }
    ArtStyle::Representational
}

fn style_descriptor(style: MusicalStyle) -> Option<&'static str> {
    match style {
        MusicalStyle::Electronic => Some("futuristic and digital"),
        MusicalStyle::Folk => Some("organic and natural"),
        MusicalStyle::Ambient => Some("atmospheric and ethereal"),
        MusicalStyle::Pop => Some("energetic and vibrant"),
        _ => None,
    }
}

fn scene_suggestion(instrument: &str) -> Option<&'static str> {
    match instrument {
        "piano" => Some("a grand piano in an elegant setting"),
        "guitar" => Some("an acoustic guitar resting in warm light"),
        "violin" => Some("a violin with flowing sheet music"),
        "drums" => Some("a drum kit radiating rhythmic motion"),
        "voice" => Some("a singer mid-performance under stage light"),
        "nature_sounds" => Some("a serene natural landscape"),
        "synth" => Some("a glowing synthesizer in a neon-lit studio"),
        _ => None,
    }
}

/// Assemble the full prompt for one analysis.
///
/// `instruments` must be the detector output, sorted by descending score;
/// only the top two contribute scene clauses.
pub fn compose(
    features: &FeatureRecord,
    transcript: &str,
    instruments: &[DetectedInstrument],
    palette: &ColorPalette,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!(
        "ARTWORK featuring {}",
        palette.final_colors.join(", ")
    ));
    parts.push(format!(
        "Create a visual representation of {} music with {} mood and {} energy",
        features.musical_style, features.mood, features.energy_level
    ));
    parts.push(format!(
        "Complexity: {}, Duration: {:.1} seconds",
        features.complexity, features.duration_seconds
    ));
    parts.push(format!("Visual brightness: {}", features.brightness));
    parts.push(format!("Color atmosphere: {}", palette.description));

    if let Some(descriptor) = style_descriptor(features.musical_style) {
        parts.push(descriptor.to_string());
    }

    let art_style = select_art_style(
        features.mood,
        features.energy_level,
        features.complexity,
        features.musical_style,
    );
    for directive in art_style.directives() {
        parts.push(directive.to_string());
    }

    for instrument in instruments.iter().take(2) {
        if let Some(scene) = scene_suggestion(instrument.name) {
            parts.push(scene.to_string());
        }
    }

    let trimmed = transcript.trim();
    if !trimmed.is_empty() {
        parts.push(format!("Audio content: '{}'", trimmed));
    }

    parts.push("highly detailed, artistic composition".to_string());
    parts.push("professional digital art style".to_string());

    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{extract, FileDescriptor};
    use crate::instruments::detect;
    use crate::palette;

    fn prompt_for(name: &str, size: u64, transcript: &str) -> String {
        let descriptor = FileDescriptor::new(name, size).unwrap();
        let features = extract(&descriptor);
        let instruments = detect(name, transcript);
        let palette = palette::build(
            features.mood,
            features.energy_level,
            features.musical_style,
            &instruments,
        );
        compose(&features, transcript, &instruments, &palette)
    }

    fn block_count(prompt: &str) -> usize {
        [
            REPRESENTATIONAL_BLOCK[0],
            ABSTRACT_BLOCK[0],
            BALANCED_BLOCK[0],
        ]
        .iter()
        .filter(|marker| prompt.contains(**marker))
        .count()
    }

    #[test]
    fn test_dramatic_selects_representational() {
        assert_eq!(
            select_art_style(
                Mood::Dramatic,
                EnergyLevel::High,
                Complexity::Complex,
                MusicalStyle::Ambient,
            ),
            ArtStyle::Representational
        );
    }

    #[test]
    fn test_mysterious_selects_abstract() {
        assert_eq!(
            select_art_style(
                Mood::Mysterious,
                EnergyLevel::Low,
                Complexity::Moderate,
                MusicalStyle::Classical,
            ),
            ArtStyle::Abstract
        );
    }

    #[test]
    fn test_ambient_style_selects_abstract_for_non_dramatic_moods() {
        assert_eq!(
            select_art_style(
                Mood::Contemplative,
                EnergyLevel::Low,
                Complexity::Moderate,
                MusicalStyle::Ambient,
            ),
            ArtStyle::Abstract
        );
    }

    #[test]
    fn test_joyful_pop_selects_balanced() {
        assert_eq!(
            select_art_style(
                Mood::Joyful,
                EnergyLevel::Medium,
                Complexity::Moderate,
                MusicalStyle::Pop,
            ),
            ArtStyle::Balanced
        );
    }

    #[test]
    fn test_peaceful_simple_selects_representational() {
        assert_eq!(
            select_art_style(
                Mood::Peaceful,
                EnergyLevel::Low,
                Complexity::Simple,
                MusicalStyle::Ambient,
            ),
            ArtStyle::Representational
        );
    }

    #[test]
    fn test_exactly_one_art_style_block() {
        for (name, size, transcript) in [
            ("dramatic_orchestra.wav", 8_000_000u64, ""),
            ("ambient_atmosphere.flac", 3_000_000, "soft pads drifting"),
            ("happy_pop_song.mp3", 4_000_000, "la la la"),
            ("midnight_drive.mp3", 5_000_000, ""),
        ] {
            let prompt = prompt_for(name, size, transcript);
            assert_eq!(block_count(&prompt), 1, "prompt for {}: {}", name, prompt);
        }
    }

    #[test]
    fn test_transcript_clause_present_iff_nonblank() {
        let with = prompt_for("voice_memo.mp3", 1_000_000, "  hello world  ");
        assert_eq!(with.matches("Audio content:").count(), 1);
        assert!(with.contains("Audio content: 'hello world'"));

        let without = prompt_for("voice_memo.mp3", 1_000_000, "   ");
        assert!(!without.contains("Audio content:"));
    }

    #[test]
    fn test_clause_order() {
        let prompt = prompt_for("peaceful_piano.mp3", 2_000_000, "gentle keys");
        let artwork = prompt.find("ARTWORK featuring").unwrap();
        let create = prompt.find("Create a visual representation").unwrap();
        let complexity = prompt.find("Complexity:").unwrap();
        let audio = prompt.find("Audio content:").unwrap();
        let closing = prompt.find("professional digital art style").unwrap();
        assert!(artwork < create);
        assert!(create < complexity);
        assert!(complexity < audio);
        assert!(audio < closing);
        assert!(prompt.ends_with("professional digital art style"));
    }

    #[test]
    fn test_dramatic_orchestra_scenario() {
        let prompt = prompt_for("dramatic_orchestra.wav", 8_000_000, "");
        assert!(prompt.contains("NO ABSTRACT ART - ONLY REPRESENTATIONAL"));
        assert!(prompt.contains("dramatic mood"));
        assert!(!prompt.contains("Audio content:"));
    }

    #[test]
    fn test_ambient_atmosphere_scenario() {
        let prompt = prompt_for("ambient_atmosphere.flac", 3_000_000, "soft pads drifting");
        assert!(prompt.contains("abstract expressionist composition"));
        assert!(!prompt.contains("NO ABSTRACT ART"));
        assert!(prompt.contains("Audio content: 'soft pads drifting'"));
    }

    #[test]
    fn test_ambient_descriptor_clause() {
        let prompt = prompt_for("ambient_atmosphere.flac", 3_000_000, "");
        assert!(prompt.contains("atmospheric and ethereal"));
    }
}
