//! The feature extractor: file metadata in, simulated musical attributes out.
//!
//! Every attribute follows the same precedence: explicit keyword in the file
//! name, then a looser hint table, then a hash-seeded fallback so extraction
//! is total. Numeric attributes combine a category base value, an adjustment
//! from a secondary category and a bounded jitter drawn from that attribute's
//! own digest lane, then clamp to their documented range.

use super::descriptor::FileDescriptor;
use super::digest::{name_digest, JitterLane};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Peaceful,
    Calm,
    Dramatic,
    Energetic,
    Joyful,
    Melancholic,
    Mysterious,
    Passionate,
    Contemplative,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Peaceful => "peaceful",
            Mood::Calm => "calm",
            Mood::Dramatic => "dramatic",
            Mood::Energetic => "energetic",
            Mood::Joyful => "joyful",
            Mood::Melancholic => "melancholic",
            Mood::Mysterious => "mysterious",
            Mood::Passionate => "passionate",
            Mood::Contemplative => "contemplative",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicalStyle {
    Jazz,
    Rock,
    Pop,
    Electronic,
    Classical,
    Folk,
    Ambient,
    HipHop,
}

impl MusicalStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            MusicalStyle::Jazz => "jazz",
            MusicalStyle::Rock => "rock",
            MusicalStyle::Pop => "pop",
            MusicalStyle::Electronic => "electronic",
            MusicalStyle::Classical => "classical",
            MusicalStyle::Folk => "folk",
            MusicalStyle::Ambient => "ambient",
            MusicalStyle::HipHop => "hip hop",
        }
    }
}

impl fmt::Display for MusicalStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

impl EnergyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyLevel::Low => "low",
            EnergyLevel::Medium => "medium",
            EnergyLevel::High => "high",
        }
    }

    fn step_up(self) -> Self {
        match self {
            EnergyLevel::Low => EnergyLevel::Medium,
            _ => EnergyLevel::High,
        }
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Moderate,
    Complex,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Moderate => "moderate",
            Complexity::Complex => "complex",
        }
    }

    fn next_cyclic(self) -> Self {
        match self {
            Complexity::Simple => Complexity::Moderate,
            Complexity::Moderate => Complexity::Complex,
            Complexity::Complex => Complexity::Simple,
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Brightness {
    Bright,
    Dark,
    Warm,
    Balanced,
}

impl Brightness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Brightness::Bright => "bright",
            Brightness::Dark => "dark",
            Brightness::Warm => "warm",
            Brightness::Balanced => "balanced",
        }
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The simulated analysis of one upload. Built once, read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureRecord {
    pub mood: Mood,
    pub musical_style: MusicalStyle,
    pub energy_level: EnergyLevel,
    pub estimated_tempo_bpm: u32,
    pub complexity: Complexity,
    pub spectral_centroid_hz: f64,
    pub brightness: Brightness,
    pub dynamic_range_db: f64,
    pub energy_variance: f64,
    pub duration_seconds: f64,
    pub file_name: String,
    pub file_size_bytes: u64,
}

// Explicit mood keywords, scanned in listed order; first category hit wins.
const MOOD_KEYWORDS: &[(Mood, &[&str])] = &[
    (
        Mood::Peaceful,
        &["peaceful", "calm", "serene", "gentle", "soft", "quiet"],
    ),
    (
        Mood::Energetic,
        &["energetic", "upbeat", "fast", "dynamic", "powerful", "intense"],
    ),
    (
        Mood::Joyful,
        &["joyful", "happy", "bright", "cheerful", "uplifting", "positive"],
    ),
    (
        Mood::Melancholic,
        &["melancholic", "sad", "melancholy", "sorrowful", "blue", "depressed"],
    ),
    (
        Mood::Mysterious,
        &["mysterious", "mystical", "ethereal", "atmospheric", "ambient", "dreamy"],
    ),
    (
        Mood::Dramatic,
        &["dramatic", "epic", "emotional", "passionate"],
    ),
    (
        Mood::Contemplative,
        &["contemplative", "thoughtful", "reflective", "meditative", "introspective"],
    ),
    (Mood::Calm, &["chill", "mellow", "relaxing", "soothing"]),
    (Mood::Passionate, &["romance", "romantic", "desire", "longing"]),
];

// Looser hint words that merely suggest a mood.
const MOOD_HINTS: &[(Mood, &[&str])] = &[
    (
        Mood::Peaceful,
        &["piano", "acoustic", "nature", "rain", "ocean", "wind"],
    ),
    (
        Mood::Energetic,
        &["rock", "dance", "electronic", "drums", "bass", "guitar"],
    ),
    (
        Mood::Joyful,
        &["pop", "summer", "sunshine", "party", "celebration", "love"],
    ),
    (
        Mood::Melancholic,
        &["winter", "lonely", "heartbreak", "missing"],
    ),
    (
        Mood::Mysterious,
        &["dark", "night", "moon", "stars", "space", "unknown"],
    ),
    (
        Mood::Dramatic,
        &["orchestra", "strings", "brass", "choir", "battle"],
    ),
    (
        Mood::Contemplative,
        &["solo", "instrumental", "classical", "minimal", "simple"],
    ),
];

// Hash fallback draws from this subset; calm and passionate are only reached
// through keywords, which keeps a fallback distribution of seven values.
const MOOD_FALLBACK: [Mood; 7] = [
    Mood::Peaceful,
    Mood::Energetic,
    Mood::Joyful,
    Mood::Melancholic,
    Mood::Mysterious,
    Mood::Dramatic,
    Mood::Contemplative,
];

const STYLE_KEYWORDS: &[(MusicalStyle, &[&str])] = &[
    (
        MusicalStyle::Jazz,
        &["jazz", "swing", "bebop", "smooth", "fusion"],
    ),
    (
        MusicalStyle::Rock,
        &["rock", "metal", "punk", "grunge", "alternative"],
    ),
    (
        MusicalStyle::Pop,
        &["pop", "mainstream", "radio", "chart", "hit"],
    ),
    (
        MusicalStyle::Electronic,
        &["electronic", "edm", "techno", "house", "trance", "synth"],
    ),
    (
        MusicalStyle::Classical,
        &["classical", "orchestra", "symphony", "concerto", "sonata"],
    ),
    (
        MusicalStyle::Folk,
        &["folk", "acoustic", "traditional", "country", "bluegrass"],
    ),
    (
        MusicalStyle::Ambient,
        &["ambient", "atmospheric", "chill", "lounge", "downtempo"],
    ),
    (
        MusicalStyle::HipHop,
        &["hip", "hop", "rap", "urban", "r&b", "soul"],
    ),
];

// Instrument names hinting at a style without naming one.
const STYLE_HINTS: &[(MusicalStyle, &[&str])] = &[
    (
        MusicalStyle::Jazz,
        &["piano", "sax", "trumpet", "bass", "drums"],
    ),
    (
        MusicalStyle::Rock,
        &["guitar", "electric", "distortion"],
    ),
    (
        MusicalStyle::Classical,
        &["violin", "cello", "strings", "brass"],
    ),
    (
        MusicalStyle::Folk,
        &["banjo", "harmonica", "fiddle"],
    ),
    (
        MusicalStyle::Electronic,
        &["digital", "computer", "beats"],
    ),
    (MusicalStyle::Ambient, &["pad", "drone"]),
];

const STYLE_FALLBACK: [MusicalStyle; 8] = [
    MusicalStyle::Jazz,
    MusicalStyle::Rock,
    MusicalStyle::Pop,
    MusicalStyle::Electronic,
    MusicalStyle::Classical,
    MusicalStyle::Folk,
    MusicalStyle::Ambient,
    MusicalStyle::HipHop,
];

const ENERGY_KEYWORDS: &[(EnergyLevel, &[&str])] = &[
    (
        EnergyLevel::High,
        &["high", "energetic", "powerful", "intense", "dynamic", "fast", "upbeat"],
    ),
    (
        EnergyLevel::Medium,
        &["medium", "moderate", "balanced", "steady", "smooth"],
    ),
    (
        EnergyLevel::Low,
        &["low", "quiet", "soft", "gentle", "calm", "peaceful", "slow"],
    ),
];

/// Run the extractor. Total over every valid descriptor; an empty name and a
/// zero byte size still yield a fully populated, range-clamped record.
pub fn extract(descriptor: &FileDescriptor) -> FeatureRecord {
    let digest = name_digest(descriptor.name());
    let name_lower = descriptor.name_lower();

    let mood = extract_mood(&name_lower, &digest);
    let musical_style = extract_style(&name_lower, &digest);
    let energy_level = determine_energy(mood, &name_lower, &digest);
    let estimated_tempo_bpm = estimate_tempo(mood, energy_level, &digest);
    let complexity = determine_complexity(descriptor.size_bytes(), &name_lower, &digest);
    let spectral_centroid_hz = estimate_spectral_centroid(mood, musical_style, &digest);
    let brightness = determine_brightness(spectral_centroid_hz, mood);
    let dynamic_range_db = estimate_dynamic_range(energy_level, mood, &digest);
    let energy_variance = estimate_energy_variance(energy_level, &digest);
    let duration_seconds = estimate_duration(
        descriptor.size_bytes(),
        &name_lower,
        descriptor.extension(),
    );

    FeatureRecord {
        mood,
        musical_style,
        energy_level,
        estimated_tempo_bpm,
        complexity,
        spectral_centroid_hz,
        brightness,
        dynamic_range_db,
        energy_variance,
        duration_seconds,
        file_name: descriptor.name().to_string(),
        file_size_bytes: descriptor.size_bytes(),
    }
}

fn scan_keywords<T: Copy>(name_lower: &str, table: &[(T, &[&str])]) -> Option<T> {
    for (value, keywords) in table {
        if keywords.iter().any(|kw| name_lower.contains(kw)) {
            return Some(*value);
        }
    }
    None
}

fn extract_mood(name_lower: &str, digest: &str) -> Mood {
    if let Some(mood) = scan_keywords(name_lower, MOOD_KEYWORDS) {
        return mood;
    }
    if let Some(mood) = scan_keywords(name_lower, MOOD_HINTS) {
        return mood;
    }
    let seed = JitterLane::Mood.seed(digest);
    MOOD_FALLBACK[(seed as usize) % MOOD_FALLBACK.len()]
}

fn extract_style(name_lower: &str, digest: &str) -> MusicalStyle {
    if let Some(style) = scan_keywords(name_lower, STYLE_KEYWORDS) {
        return style;
    }
    if let Some(style) = scan_keywords(name_lower, STYLE_HINTS) {
        return style;
    }
    let seed = JitterLane::Style.seed(digest);
    STYLE_FALLBACK[(seed as usize) % STYLE_FALLBACK.len()]
}

fn mood_base_energy(mood: Mood) -> EnergyLevel {
    match mood {
        Mood::Energetic | Mood::Joyful | Mood::Dramatic | Mood::Passionate => EnergyLevel::High,
        Mood::Peaceful
        | Mood::Calm
        | Mood::Melancholic
        | Mood::Mysterious
        | Mood::Contemplative => EnergyLevel::Low,
    }
}

fn determine_energy(mood: Mood, name_lower: &str, digest: &str) -> EnergyLevel {
    if let Some(level) = scan_keywords(name_lower, ENERGY_KEYWORDS) {
        return level;
    }
    let base = mood_base_energy(mood);
    // One seed value in three bumps the mood-implied energy one step up.
    let seed = JitterLane::Energy.seed(digest);
    if seed % 3 == 2 {
        base.step_up()
    } else {
        base
    }
}

fn tempo_range(mood: Mood, energy: EnergyLevel) -> (f64, f64) {
    let (low, medium, high) = match mood {
        Mood::Energetic => ((100, 130), (130, 160), (160, 200)),
        Mood::Joyful => ((90, 120), (120, 150), (150, 180)),
        Mood::Dramatic => ((60, 90), (90, 120), (120, 160)),
        Mood::Passionate => ((70, 100), (100, 130), (130, 170)),
        Mood::Peaceful | Mood::Calm | Mood::Contemplative => ((40, 70), (70, 100), (100, 130)),
        Mood::Melancholic => ((50, 80), (80, 110), (110, 140)),
        Mood::Mysterious => ((60, 90), (90, 120), (120, 150)),
    };
    let (min, max) = match energy {
        EnergyLevel::Low => low,
        EnergyLevel::Medium => medium,
        EnergyLevel::High => high,
    };
    (min as f64, max as f64)
}

fn estimate_tempo(mood: Mood, energy: EnergyLevel, digest: &str) -> u32 {
    let (min_tempo, max_tempo) = tempo_range(mood, energy);
    let seed = JitterLane::Tempo.seed(digest);

    // Seed picks a position within the range, then nudges by up to ±10 BPM.
    let position = (seed % 100) as f64 / 100.0;
    let mut tempo = min_tempo + (max_tempo - min_tempo) * position;
    tempo += ((seed % 20) as i64 - 10) as f64;

    (tempo as i64).clamp(40, 200) as u32
}

fn determine_complexity(size_bytes: u64, name_lower: &str, digest: &str) -> Complexity {
    const COMPLEX_WORDS: &[&str] = &["complex", "layered", "rich", "sophisticated"];
    const SIMPLE_WORDS: &[&str] = &["simple", "minimal", "basic"];

    if COMPLEX_WORDS.iter().any(|w| name_lower.contains(w)) {
        return Complexity::Complex;
    }
    if SIMPLE_WORDS.iter().any(|w| name_lower.contains(w)) {
        return Complexity::Simple;
    }

    let base = if size_bytes > 10 * 1024 * 1024 {
        Complexity::Complex
    } else if size_bytes > 5 * 1024 * 1024 {
        Complexity::Moderate
    } else {
        Complexity::Simple
    };

    // 30% of seeds rotate the size-implied complexity by one step.
    let seed = JitterLane::Complexity.seed(digest);
    if seed % 10 < 3 {
        base.next_cyclic()
    } else {
        base
    }
}

fn mood_spectral_base(mood: Mood) -> f64 {
    match mood {
        Mood::Peaceful | Mood::Contemplative => 2000.0,
        Mood::Calm => 2500.0,
        Mood::Dramatic => 3500.0,
        Mood::Energetic => 4500.0,
        Mood::Joyful => 4000.0,
        Mood::Melancholic => 1800.0,
        Mood::Mysterious => 2200.0,
        Mood::Passionate => 3800.0,
    }
}

fn style_spectral_adjustment(style: MusicalStyle) -> f64 {
    match style {
        MusicalStyle::Jazz => 200.0,
        MusicalStyle::Rock => 1000.0,
        MusicalStyle::Pop => 500.0,
        MusicalStyle::Electronic => 800.0,
        MusicalStyle::Classical | MusicalStyle::HipHop => 0.0,
        MusicalStyle::Folk => -200.0,
        MusicalStyle::Ambient => -300.0,
    }
}

fn estimate_spectral_centroid(mood: Mood, style: MusicalStyle, digest: &str) -> f64 {
    let adjusted = mood_spectral_base(mood) + style_spectral_adjustment(style);
    let seed = JitterLane::SpectralCentroid.seed(digest);
    let jitter = (seed % 2000) as f64 - 1000.0;
    (adjusted + jitter).clamp(500.0, 8000.0)
}

fn determine_brightness(spectral_centroid_hz: f64, mood: Mood) -> Brightness {
    if spectral_centroid_hz > 4000.0 {
        return Brightness::Bright;
    }
    if spectral_centroid_hz < 2000.0 {
        return Brightness::Dark;
    }
    match mood {
        Mood::Joyful | Mood::Energetic => Brightness::Bright,
        Mood::Melancholic | Mood::Mysterious => Brightness::Dark,
        Mood::Peaceful | Mood::Passionate => Brightness::Warm,
        _ => Brightness::Balanced,
    }
}

fn estimate_dynamic_range(energy: EnergyLevel, mood: Mood, digest: &str) -> f64 {
    let base = match energy {
        EnergyLevel::Low => 10.0,
        EnergyLevel::Medium => 20.0,
        EnergyLevel::High => 30.0,
    };
    let mood_adjustment = match mood {
        Mood::Dramatic => 10.0,
        Mood::Passionate => 8.0,
        Mood::Energetic => 5.0,
        Mood::Peaceful => -5.0,
        Mood::Calm => -3.0,
        Mood::Melancholic => -2.0,
        _ => 0.0,
    };
    let seed = JitterLane::DynamicRange.seed(digest);
    let jitter = (seed % 20) as f64 - 10.0;
    (base + mood_adjustment + jitter).clamp(5.0, 50.0)
}

fn estimate_energy_variance(energy: EnergyLevel, digest: &str) -> f64 {
    let base = match energy {
        EnergyLevel::Low => 10_000.0,
        EnergyLevel::Medium => 30_000.0,
        EnergyLevel::High => 60_000.0,
    };
    let seed = JitterLane::EnergyVariance.seed(digest);
    let jitter = (seed % 40_000) as f64 - 20_000.0;
    (base + jitter).clamp(5_000.0, 100_000.0)
}

/// Assumed bitrate in bits per second for duration estimation.
fn extension_bitrate(extension: &str) -> f64 {
    match extension {
        "mp3" => 128_000.0,
        "m4a" | "aac" => 256_000.0,
        "wav" => 1_411_000.0,
        "flac" => 1_000_000.0,
        "ogg" => 192_000.0,
        _ => 256_000.0,
    }
}

fn estimate_duration(size_bytes: u64, name_lower: &str, extension: &str) -> f64 {
    const SHORT_WORDS: &[&str] = &["short", "clip", "sample"];
    const LONG_WORDS: &[&str] = &["long", "full", "complete"];

    let theoretical = (size_bytes as f64 * 8.0) / extension_bitrate(extension);

    let adjusted = if SHORT_WORDS.iter().any(|w| name_lower.contains(w)) {
        (theoretical * 0.3).min(60.0)
    } else if LONG_WORDS.iter().any(|w| name_lower.contains(w)) {
        theoretical * 2.0
    } else {
        theoretical
    };

    adjusted.clamp(10.0, 1800.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str, size: u64) -> FileDescriptor {
        FileDescriptor::new(name, size).unwrap()
    }

    #[test]
    fn test_extract_is_deterministic() {
        let d = descriptor("midnight_drive.mp3", 4_200_000);
        let a = extract(&d);
        let b = extract(&d);
        assert_eq!(format!("{:?}", a), format!("{:?}", b));
    }

    #[test]
    fn test_explicit_mood_keyword_wins() {
        let features = extract(&descriptor("peaceful_piano.mp3", 3_000_000));
        assert_eq!(features.mood, Mood::Peaceful);
        // "peaceful" is also a low-energy keyword.
        assert_eq!(features.energy_level, EnergyLevel::Low);
    }

    #[test]
    fn test_mood_hint_applies_without_explicit_keyword() {
        // No explicit mood word, but "orchestra" hints dramatic.
        let features = extract(&descriptor("orchestra_take3.wav", 8_000_000));
        assert_eq!(features.mood, Mood::Dramatic);
    }

    #[test]
    fn test_dramatic_orchestra_scenario() {
        let features = extract(&descriptor("dramatic_orchestra.wav", 8_000_000));
        assert_eq!(features.mood, Mood::Dramatic);
        assert_eq!(features.musical_style, MusicalStyle::Classical);
    }

    #[test]
    fn test_ambient_filename_resolves_mysterious_mood_and_ambient_style() {
        let features = extract(&descriptor("ambient_atmosphere.flac", 3_000_000));
        assert_eq!(features.mood, Mood::Mysterious);
        assert_eq!(features.musical_style, MusicalStyle::Ambient);
    }

    #[test]
    fn test_empty_name_falls_back_deterministically() {
        let a = extract(&descriptor("", 0));
        let b = extract(&descriptor("", 0));
        assert_eq!(a.mood, b.mood);
        assert_eq!(a.musical_style, b.musical_style);
        assert_eq!(a.estimated_tempo_bpm, b.estimated_tempo_bpm);
    }

    #[test]
    fn test_numeric_ranges_hold_across_inputs() {
        let names = [
            "",
            "x",
            "peaceful_piano.mp3",
            "dramatic_orchestra.wav",
            "UPPERCASE-ROCK.FLAC",
            "some very long file name with spaces and tüne.ogg",
            "short_clip.m4a",
            "full_concert_recording.wav",
            "no_extension",
        ];
        let sizes = [0u64, 1, 999, 3_000_000, 12 * 1024 * 1024, u32::MAX as u64];
        for name in names {
            for size in sizes {
                let f = extract(&descriptor(name, size));
                assert!((40..=200).contains(&f.estimated_tempo_bpm), "{name} {size}");
                assert!((500.0..=8000.0).contains(&f.spectral_centroid_hz));
                assert!((5.0..=50.0).contains(&f.dynamic_range_db));
                assert!((5_000.0..=100_000.0).contains(&f.energy_variance));
                assert!((10.0..=1800.0).contains(&f.duration_seconds));
            }
        }
    }

    #[test]
    fn test_short_hint_caps_duration() {
        // Big wav, but the name says it is a clip.
        let f = extract(&descriptor("drum_clip.wav", 50_000_000));
        assert!(f.duration_seconds <= 60.0);
    }

    #[test]
    fn test_unknown_extension_uses_default_bitrate() {
        let f = extract(&descriptor("track.xyz", 9_600_000));
        // 9.6 MB * 8 / 256kbps = 300s
        assert!((f.duration_seconds - 300.0).abs() < 1.0);
    }

    #[test]
    fn test_zero_size_clamps_duration_to_floor() {
        let f = extract(&descriptor("tiny.mp3", 0));
        assert_eq!(f.duration_seconds, 10.0);
    }

    #[test]
    fn test_complexity_keyword_overrides_size() {
        let f = extract(&descriptor("minimal_drone_session.wav", 50_000_000));
        assert_eq!(f.complexity, Complexity::Simple);
        let f = extract(&descriptor("layered_textures.mp3", 100));
        assert_eq!(f.complexity, Complexity::Complex);
    }

    #[test]
    fn test_brightness_extremes_from_spectral_centroid() {
        // Energetic + rock pushes the centroid well above 4 kHz for most
        // seeds; rather than chase a specific seed, check the derivation rule
        // directly.
        assert_eq!(
            determine_brightness(5000.0, Mood::Melancholic),
            Brightness::Bright
        );
        assert_eq!(determine_brightness(1000.0, Mood::Joyful), Brightness::Dark);
        assert_eq!(
            determine_brightness(3000.0, Mood::Peaceful),
            Brightness::Warm
        );
        assert_eq!(
            determine_brightness(3000.0, Mood::Contemplative),
            Brightness::Balanced
        );
    }

    #[test]
    fn test_energy_keyword_beats_mood_mapping() {
        // "slow" is a low-energy keyword even though dramatic maps high.
        let f = extract(&descriptor("dramatic_slow_build.wav", 1_000_000));
        assert_eq!(f.mood, Mood::Dramatic);
        assert_eq!(f.energy_level, EnergyLevel::Low);
    }
}
