//! Keyword-driven instrument detection.
//!
//! A fixed catalog of instrument archetypes is scored against the file name
//! and the transcript. No audio analysis happens here; a detection is a
//! ranked guess with human-readable reasons attached.

use serde::Serialize;

/// Static description of one instrument archetype.
#[derive(Debug)]
pub struct InstrumentProfile {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub visual_elements: &'static [&'static str],
    pub colors: &'static [&'static str],
    pub textures: &'static [&'static str],
    pub mood_associations: &'static [&'static str],
}

/// The instrument catalog. Iteration order is the tie-break for equal scores,
/// so the order here is part of the contract.
pub const CATALOG: &[InstrumentProfile] = &[
    InstrumentProfile {
        name: "piano",
        keywords: &["piano", "keys", "keyboard", "grand", "upright", "melody", "chords"],
        visual_elements: &[
            "elegant curves",
            "black and white keys",
            "wooden frame",
            "classical instrument",
        ],
        colors: &["warm browns", "golden tones", "rich mahogany", "ivory and ebony"],
        textures: &["smooth wood", "polished surface", "metallic strings", "felt hammers"],
        mood_associations: &["elegant", "sophisticated", "emotional", "intimate", "classical"],
    },
    InstrumentProfile {
        name: "guitar",
        keywords: &["guitar", "acoustic", "electric", "strings", "strum", "pick", "chord"],
        visual_elements: &["curved body", "long neck", "six strings", "sound hole", "pickguard"],
        colors: &["natural wood", "sunburst", "vibrant colors", "metallic finishes"],
        textures: &["wood grain", "smooth finish", "metal strings", "leather strap"],
        mood_associations: &["warm", "intimate", "passionate", "folk", "rock"],
    },
    InstrumentProfile {
        name: "violin",
        keywords: &["violin", "strings", "bow", "melody", "classical"],
        visual_elements: &["curved body", "elegant neck", "four strings", "f-holes", "scroll"],
        colors: &["rich amber", "deep reds", "golden browns", "warm honey"],
        textures: &["smooth varnish", "wood grain", "horsehair bow", "ebony fingerboard"],
        mood_associations: &["elegant", "emotional", "romantic", "classical", "sophisticated"],
    },
    InstrumentProfile {
        name: "drums",
        keywords: &["drums", "percussion", "beat", "rhythm", "kick", "snare", "hi-hat"],
        visual_elements: &["circular drums", "metal cymbals", "wooden shells", "drumsticks"],
        colors: &["metallic silver", "deep blacks", "warm browns", "brass tones"],
        textures: &["smooth metal", "wood grain", "leather heads", "brushed steel"],
        mood_associations: &["rhythmic", "powerful", "energetic", "dynamic", "pulsing"],
    },
    InstrumentProfile {
        name: "voice",
        keywords: &["voice", "vocal", "sing", "song", "lyrics", "singer"],
        visual_elements: &["human figure", "expressive face", "microphone", "stage presence"],
        colors: &["warm skin tones", "expressive colors", "stage lighting", "vibrant hues"],
        textures: &[
            "smooth skin",
            "expressive features",
            "dynamic movement",
            "emotional expression",
        ],
        mood_associations: &["emotional", "personal", "expressive", "intimate", "powerful"],
    },
    InstrumentProfile {
        name: "nature_sounds",
        keywords: &["bird", "nature", "ambient", "environmental", "forest", "ocean"],
        visual_elements: &[
            "natural landscapes",
            "organic forms",
            "environmental elements",
            "natural textures",
        ],
        colors: &["earth tones", "natural greens", "sky blues", "organic browns"],
        textures: &[
            "organic textures",
            "natural patterns",
            "environmental elements",
            "earthly materials",
        ],
        mood_associations: &["peaceful", "natural", "organic", "tranquil", "environmental"],
    },
    InstrumentProfile {
        name: "synth",
        keywords: &["synth", "electronic", "digital", "synthesizer"],
        visual_elements: &[
            "digital interfaces",
            "electronic circuits",
            "futuristic elements",
            "technological forms",
        ],
        colors: &["neon colors", "electric blues", "digital greens", "futuristic purples"],
        textures: &[
            "smooth plastic",
            "metallic surfaces",
            "digital displays",
            "electronic components",
        ],
        mood_associations: &["futuristic", "electronic", "digital", "modern", "technological"],
    },
];

/// Minimum accumulated score for an instrument to qualify.
const DETECTION_THRESHOLD: u32 = 2;

/// Score weight of a keyword hit in the file name.
const FILENAME_WEIGHT: u32 = 3;

/// Score weight of a keyword hit in the transcript. The transcript is closer
/// to ground truth than a file name, so mentions there weigh more.
const TRANSCRIPT_WEIGHT: u32 = 5;

/// One ranked instrument guess.
#[derive(Debug, Clone, Serialize)]
pub struct DetectedInstrument {
    pub name: &'static str,
    pub raw_score: u32,
    pub confidence: f64,
    pub reasons: Vec<String>,
    pub visual_elements: &'static [&'static str],
    pub colors: &'static [&'static str],
    pub textures: &'static [&'static str],
    pub mood_associations: &'static [&'static str],
}

impl DetectedInstrument {
    fn from_profile(
        profile: &'static InstrumentProfile,
        raw_score: u32,
        confidence: f64,
        reasons: Vec<String>,
    ) -> Self {
        Self {
            name: profile.name,
            raw_score,
            confidence,
            reasons,
            visual_elements: profile.visual_elements,
            colors: profile.colors,
            textures: profile.textures,
            mood_associations: profile.mood_associations,
        }
    }
}

fn profile(name: &str) -> &'static InstrumentProfile {
    // The catalog is fixed, so a name miss here is a programming error.
    CATALOG
        .iter()
        .find(|p| p.name == name)
        .unwrap_or(&CATALOG[0])
}

/// Score the catalog against a file name and transcript.
///
/// The result is never empty: when nothing qualifies, a flagged low-confidence
/// `voice` guess stands in for "probably has a primary melodic line", and a
/// lone detection gets a few low-confidence common instruments backfilled so
/// downstream palette and prompt logic never special-cases short lists.
/// Sorted by descending raw score; catalog order breaks ties (stable sort).
pub fn detect(file_name: &str, transcript: &str) -> Vec<DetectedInstrument> {
    let file_lower = file_name.to_lowercase();
    let transcript_lower = transcript.to_lowercase();

    let mut detected: Vec<DetectedInstrument> = Vec::new();

    for entry in CATALOG {
        let mut score = 0u32;
        let mut reasons = Vec::new();

        for keyword in entry.keywords {
            if file_lower.contains(keyword) {
                score += FILENAME_WEIGHT;
                reasons.push(format!("filename contains '{}'", keyword));
            }
        }
        for keyword in entry.keywords {
            if transcript_lower.contains(keyword) {
                score += TRANSCRIPT_WEIGHT;
                reasons.push(format!("transcription mentions '{}'", keyword));
            }
        }

        if score >= DETECTION_THRESHOLD {
            let confidence = (score as f64 / 10.0).min(1.0);
            detected.push(DetectedInstrument::from_profile(
                entry, score, confidence, reasons,
            ));
        }
    }

    if detected.is_empty() {
        detected.push(DetectedInstrument::from_profile(
            profile("voice"),
            2,
            0.3,
            vec!["assumed presence in vocal music".to_string()],
        ));

        const MELODIC_HINTS: &[&str] = &["melody", "song", "music", "track"];
        if MELODIC_HINTS.iter().any(|w| file_lower.contains(w)) {
            detected.push(DetectedInstrument::from_profile(
                profile("piano"),
                2,
                0.25,
                vec!["melodic content suggested".to_string()],
            ));
        }
    }

    if detected.len() <= 1 {
        const COMMON_BACKFILL: &[(&str, f64, &str)] = &[
            ("piano", 0.2, "common melodic instrument"),
            ("drums", 0.2, "rhythmic foundation"),
            ("guitar", 0.15, "common accompaniment"),
        ];
        for (name, confidence, reason) in COMMON_BACKFILL {
            if detected.iter().any(|d| d.name == *name) {
                continue;
            }
            detected.push(DetectedInstrument::from_profile(
                profile(name),
                2,
                *confidence,
                vec![reason.to_string()],
            ));
        }
    }

    // sort_by is stable: equal scores keep catalog order.
    detected.sort_by(|a, b| b.raw_score.cmp(&a.raw_score));
    detected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_keyword_scores() {
        let detected = detect("epic_guitar_solo.mp3", "");
        let guitar = detected.iter().find(|d| d.name == "guitar").unwrap();
        assert_eq!(guitar.raw_score, 3);
        assert!((guitar.confidence - 0.3).abs() < 1e-9);
        assert!(guitar.reasons[0].contains("guitar"));
    }

    #[test]
    fn test_transcript_mentions_weigh_more_than_filename() {
        let detected = detect("take_one.wav", "a soft piano over brushed drums");
        let piano = detected.iter().find(|d| d.name == "piano").unwrap();
        let drums = detected.iter().find(|d| d.name == "drums").unwrap();
        assert_eq!(piano.raw_score, 5);
        assert_eq!(drums.raw_score, 5);
        // Catalog order breaks the tie: piano before drums.
        let piano_pos = detected.iter().position(|d| d.name == "piano").unwrap();
        let drums_pos = detected.iter().position(|d| d.name == "drums").unwrap();
        assert!(piano_pos < drums_pos);
    }

    #[test]
    fn test_never_empty_voice_fallback() {
        let detected = detect("xqzw.bin", "");
        assert!(!detected.is_empty());
        let voice = detected.iter().find(|d| d.name == "voice").unwrap();
        assert!((voice.confidence - 0.3).abs() < 1e-9);
        assert_eq!(voice.reasons, vec!["assumed presence in vocal music"]);
        // Backfill kicks in as well.
        assert!(detected.iter().any(|d| d.name == "piano"));
        assert!(detected.iter().any(|d| d.name == "drums"));
        assert!(detected.iter().any(|d| d.name == "guitar"));
    }

    #[test]
    fn test_melodic_hint_adds_piano_guess() {
        // No catalog keyword matches, but "track" hints at melodic content,
        // so the fallback yields voice plus a low-confidence piano guess.
        let detected = detect("bonus_track_07.xyz", "");
        let voice = detected.iter().find(|d| d.name == "voice").unwrap();
        assert_eq!(voice.raw_score, 2);
        let piano = detected.iter().find(|d| d.name == "piano").unwrap();
        assert!((piano.confidence - 0.25).abs() < 1e-9);
        assert_eq!(piano.reasons, vec!["melodic content suggested"]);
    }

    #[test]
    fn test_single_detection_gets_backfilled() {
        let detected = detect("ambient_atmosphere.flac", "soft pads drifting");
        // "ambient" hits nature_sounds in the file name.
        assert_eq!(detected[0].name, "nature_sounds");
        assert_eq!(detected[0].raw_score, 3);
        // Low-confidence common instruments are appended.
        assert!(detected.iter().any(|d| d.name == "piano" && d.confidence < 0.3));
        assert!(detected.iter().any(|d| d.name == "drums"));
        assert!(detected.iter().any(|d| d.name == "guitar"));
        assert!(detected.len() >= 4);
    }

    #[test]
    fn test_sorted_by_descending_score() {
        let detected = detect(
            "piano_and_guitar.mp3",
            "the piano carries the melody while a guitar strums",
        );
        for pair in detected.windows(2) {
            assert!(pair[0].raw_score >= pair[1].raw_score);
        }
    }

    #[test]
    fn test_confidence_saturates_at_one() {
        let detected = detect(
            "piano keys keyboard grand upright melody chords.mp3",
            "piano keys keyboard grand upright melody chords",
        );
        let piano = detected.iter().find(|d| d.name == "piano").unwrap();
        assert!(piano.raw_score > 10);
        assert_eq!(piano.confidence, 1.0);
    }

    #[test]
    fn test_catalog_entries_carry_colors() {
        for entry in CATALOG {
            assert!(!entry.colors.is_empty());
            assert!(!entry.keywords.is_empty());
        }
    }
}
