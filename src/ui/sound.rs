/// Sound effects: short procedural chiptune blips played through rodio.
///
/// Buffers are synthesized once at startup and replayed fire-and-forget.
/// Without the `sound` feature `SoundEngine` is a stub whose methods do
/// nothing, so callers never need their own cfg gates.

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    pub(super) const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_collect: Arc<Vec<u8>>,
        sfx_record: Arc<Vec<u8>>,
        sfx_crash: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_collect: Arc::new(make_wav(&gen_collect())),
                sfx_record: Arc::new(make_wav(&gen_record())),
                sfx_crash: Arc::new(make_wav(&gen_crash())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }

        pub fn play_collect(&self) { self.play(&self.sfx_collect); }
        pub fn play_record(&self) { self.play(&self.sfx_record); }
        pub fn play_crash(&self) { self.play(&self.sfx_crash); }
    }

    /// Notes played back to back: (frequency Hz, seconds).
    /// Each note decays linearly to `1 - decay` of its start volume.
    pub(super) fn sequence(notes: &[(f32, f32)], decay: f32, volume: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &(freq, dur) in notes {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * decay;
                // Fundamental plus a soft fifth-above harmonic for the retro edge.
                let wave = (t * freq * std::f32::consts::TAU).sin() * 0.75
                    + (t * freq * 1.5 * std::f32::consts::TAU).sin() * 0.25;
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Food: two quick rising notes.
    fn gen_collect() -> Vec<f32> {
        sequence(&[(880.0, 0.04), (1320.0, 0.06)], 1.0, 0.25)
    }

    /// New high score: bright arpeggio, last note held.
    fn gen_record() -> Vec<f32> {
        sequence(&[(659.0, 0.07), (784.0, 0.07), (988.0, 0.07), (1319.0, 0.2)], 0.6, 0.25)
    }

    /// Game over: falling minor line with a tail fade.
    fn gen_crash() -> Vec<f32> {
        let mut samples = sequence(&[(392.0, 0.11), (311.0, 0.11), (262.0, 0.11), (196.0, 0.25)], 0.3, 0.3);
        let total = samples.len();
        let fade = total / 3;
        for (k, s) in samples[total - fade..].iter_mut().enumerate() {
            *s *= 1.0 - k as f32 / fade as f32;
        }
        samples
    }

    /// 16-bit mono PCM WAV.
    pub(super) fn make_wav(samples: &[f32]) -> Vec<u8> {
        let data_size = samples.len() as u32 * 2;
        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes()); // byte rate
        buf.extend_from_slice(&2u16.to_le_bytes()); // block align
        buf.extend_from_slice(&16u16.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let v = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }
}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_collect(&self) {}
    pub fn play_record(&self) {}
    pub fn play_crash(&self) {}
}
