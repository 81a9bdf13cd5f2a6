//! End-to-end analysis pipeline.
//!
//! Pure and synchronous: one descriptor plus one transcript in, one outcome
//! out. Nothing here touches the network or shared state, so concurrent
//! requests can each run their own pass without coordination.

use serde::Serialize;

use crate::analysis::{self, FeatureRecord, FileDescriptor};
use crate::instruments::{self, DetectedInstrument};
use crate::palette::{self, ColorPalette};
use crate::prompt;

#[derive(Debug, Serialize)]
pub struct AnalysisOutcome {
    pub features: FeatureRecord,
    pub instruments: Vec<DetectedInstrument>,
    pub palette: ColorPalette,
    pub prompt: String,
}

/// Run the full feature → instruments → palette → prompt pass.
pub fn run(descriptor: &FileDescriptor, transcript: &str) -> AnalysisOutcome {
    let features = analysis::extract(descriptor);
    let instruments = instruments::detect(descriptor.name(), transcript);
    let palette = palette::build(
        features.mood,
        features.energy_level,
        features.musical_style,
        &instruments,
    );
    let prompt = prompt::compose(&features, transcript, &instruments, &palette);

    AnalysisOutcome {
        features,
        instruments,
        palette,
        prompt,
    }
}
