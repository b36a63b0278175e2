//! Audio decoding using Symphonia
//!
//! Decodes the first audio track of a supported container into a mono
//! [`AudioBuffer`]. Multi-channel audio is averaged down to mono.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::AudioBuffer;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;

/// Decode an audio file to a mono buffer
///
/// # Arguments
///
/// * `path` - Path to the audio file
/// * `config` - Supplies the list of accepted file extensions
///
/// # Errors
///
/// Returns `AnalysisError::DecodingError` when the extension is not in
/// `config.supported_extensions`, the file cannot be opened or probed, no audio
/// track exists, or no frame could be decoded.
pub fn decode_file(path: &Path, config: &AnalysisConfig) -> Result<AudioBuffer, AnalysisError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    if !config.supports_extension(ext) {
        return Err(AnalysisError::DecodingError(format!(
            "Unsupported format '{}' for {}",
            ext,
            path.display()
        )));
    }

    log::debug!("Decoding audio file: {}", path.display());

    let src = File::open(path).map_err(|e| {
        AnalysisError::DecodingError(format!("Cannot open {}: {}", path.display(), e))
    })?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(ext);

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AnalysisError::DecodingError(format!("Probe failed: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AnalysisError::DecodingError("No supported audio tracks found".to_string()))?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.ok_or_else(|| {
        AnalysisError::DecodingError("Track does not declare a sample rate".to_string())
    })?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AnalysisError::DecodingError(format!("Unsupported codec: {}", e)))?;

    let mut mono: Vec<f32> = Vec::new();
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(AnalysisError::DecodingError(format!(
                    "Container read failed: {}",
                    e
                )))
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let channels = spec.channels.count();
                let mut interleaved = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                interleaved.copy_interleaved_ref(decoded);
                let frame = crate::preprocessing::channel_mixer::downmix_interleaved(
                    interleaved.samples(),
                    channels,
                )?;
                mono.extend_from_slice(&frame);
            }
            Err(SymphoniaError::DecodeError(msg)) => {
                // Corrupted packets are skipped, the rest of the stream is still usable
                skipped_packets += 1;
                log::warn!("Skipping undecodable packet in {}: {}", path.display(), msg);
            }
            Err(e) => {
                return Err(AnalysisError::DecodingError(format!(
                    "Decoder failed: {}",
                    e
                )))
            }
        }
    }

    if mono.is_empty() {
        return Err(AnalysisError::DecodingError(format!(
            "No decodable audio in {} ({} packets skipped)",
            path.display(),
            skipped_packets
        )));
    }

    log::debug!(
        "Decoded {} mono samples at {} Hz from {}",
        mono.len(),
        sample_rate,
        path.display()
    );

    AudioBuffer::new(mono, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension_is_decode_error() {
        let config = AnalysisConfig::default();
        let err = decode_file(Path::new("loop.xyz"), &config).unwrap_err();
        assert!(matches!(err, AnalysisError::DecodingError(_)));
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let config = AnalysisConfig::default();
        let err = decode_file(Path::new("/definitely/not/here.wav"), &config).unwrap_err();
        assert!(matches!(err, AnalysisError::DecodingError(_)));
    }
}
