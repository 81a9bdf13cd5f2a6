//! Color palette derivation.
//!
//! Mood, musical style and the strongest detected instruments each contribute
//! a fixed set of color names. The palette keeps first-seen order, drops
//! duplicates and caps the final list so prompts stay readable.

use serde::Serialize;

use crate::analysis::{EnergyLevel, Mood, MusicalStyle};
use crate::instruments::DetectedInstrument;

/// Upper bound on colors carried into the prompt.
pub const PALETTE_CAP: usize = 6;

/// How many top-ranked instruments contribute colors.
const INSTRUMENT_CONTRIBUTORS: usize = 2;

#[derive(Debug, Clone, Serialize)]
pub struct ColorPalette {
    pub final_colors: Vec<String>,
    pub description: String,
    pub source_mood: Mood,
    pub source_energy: EnergyLevel,
    pub source_musical_style: MusicalStyle,
}

fn mood_colors(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Peaceful => &["sage green", "sky blue", "cream yellow"],
        Mood::Calm => &["turquoise", "lavender", "pale green"],
        Mood::Dramatic => &["crimson red", "dark slate blue", "plum purple"],
        Mood::Energetic => &["bright red", "lime green", "hot pink"],
        Mood::Joyful => &["golden yellow", "coral red", "sky blue"],
        Mood::Melancholic => &["dark slate gray", "indigo", "dark red"],
        Mood::Mysterious => &["midnight blue", "plum", "dark turquoise"],
        Mood::Passionate => &["crimson red", "orange red", "steel blue"],
        Mood::Contemplative => &["slate gray", "sea green", "lavender"],
    }
}

fn style_colors(style: MusicalStyle) -> &'static [&'static str] {
    match style {
        MusicalStyle::Jazz => &["steel blue", "plum purple", "sage green"],
        MusicalStyle::Rock => &["crimson red", "steel blue", "dark slate gray"],
        MusicalStyle::Pop => &["coral red", "golden yellow", "sky blue"],
        MusicalStyle::Electronic => &["hot pink", "lime green", "electric blue"],
        MusicalStyle::Classical => &["cream yellow", "sage green", "lavender"],
        MusicalStyle::Folk => &["sage green", "warm brown", "sky blue"],
        MusicalStyle::Ambient => &["lavender", "dark turquoise", "plum"],
        MusicalStyle::HipHop => &[],
    }
}

fn mood_description(mood: Mood) -> &'static str {
    match mood {
        Mood::Peaceful => "soft and tranquil hues",
        Mood::Calm => "cool and soothing tones",
        Mood::Dramatic => "deep and intense shades",
        Mood::Energetic => "bold and vivid colors",
        Mood::Joyful => "bright and cheerful tones",
        Mood::Melancholic => "muted and somber shades",
        Mood::Mysterious => "dark and enigmatic hues",
        Mood::Passionate => "warm and fiery colors",
        Mood::Contemplative => "subdued and reflective tones",
    }
}

fn instrument_clause(name: &str) -> Option<&'static str> {
    match name {
        "piano" => Some(" with elegant piano tones"),
        "guitar" => Some(" with warm guitar textures"),
        "voice" => Some(" with expressive vocal elements"),
        "nature_sounds" => Some(" with natural environmental elements"),
        "synth" => Some(" with electronic digital elements"),
        _ => None,
    }
}

/// Build the palette for one analysis.
///
/// `instruments` is expected to be the detector output, already sorted by
/// descending score.
pub fn build(
    mood: Mood,
    energy: EnergyLevel,
    style: MusicalStyle,
    instruments: &[DetectedInstrument],
) -> ColorPalette {
    let mut colors: Vec<String> = Vec::new();
    let mut push = |candidate: &str, colors: &mut Vec<String>| {
        if colors.len() < PALETTE_CAP && !colors.iter().any(|c| c == candidate) {
            colors.push(candidate.to_string());
        }
    };

    for color in mood_colors(mood) {
        push(color, &mut colors);
    }
    for color in style_colors(style) {
        push(color, &mut colors);
    }
    for instrument in instruments.iter().take(INSTRUMENT_CONTRIBUTORS) {
        for color in instrument.colors {
            push(color, &mut colors);
        }
    }

    let mut description = mood_description(mood).to_string();
    if let Some(clause) = instruments.first().and_then(|i| instrument_clause(i.name)) {
        description.push_str(clause);
    }

    ColorPalette {
        final_colors: colors,
        description,
        source_mood: mood,
        source_energy: energy,
        source_musical_style: style,
    }
}
