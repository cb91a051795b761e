//! Sample pre-loading from disk.

use std::path::Path;

use gb_audio::SampleLoader;
use gb_engine::SampleCache;
use gb_ir::{instrument_ref, InstrumentRef, Sample};

use crate::ControllerError;

/// Decoded samples keyed by the instrument id they stand for.
pub type SampleSet = Vec<(InstrumentRef, Sample)>;

/// Decode every `.wav` file in `dir`. The file stem is the instrument id
/// (`kick1.wav` plays for `"kick1"`). Files that fail to decode are skipped
/// with a warning.
pub fn load_sample_dir(dir: &Path) -> Result<SampleSet, ControllerError> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .map_err(gb_formats::FormatError::from)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
        })
        .collect();
    paths.sort();

    let mut set = SampleSet::with_capacity(paths.len());
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            log::warn!("skipping {}: file name is not UTF-8", path.display());
            continue;
        };
        match gb_formats::load_wav_file(&path) {
            Ok(sample) => set.push((instrument_ref(stem), sample)),
            Err(e) => log::warn!("skipping {}: {}", path.display(), e),
        }
    }
    log::info!("decoded {} samples from {}", set.len(), dir.display());
    Ok(set)
}

/// Hand decoded samples to a sink and record where they landed.
pub(crate) fn install<S: SampleLoader>(sink: &mut S, cache: &mut SampleCache, samples: SampleSet) -> usize {
    let count = samples.len();
    for (instrument, sample) in samples {
        let key = sink.load(sample);
        if cache.insert(instrument, key).is_some() {
            log::debug!("instrument '{}' reloaded", instrument);
        }
    }
    count
}
