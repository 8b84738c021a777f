//! Audio system
//!
//! Procedurally generated sound effects - no external files needed! Sample
//! buffers are synthesized on the fly and handed to a detached sink. If no
//! output device is available the game runs silently.

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

const SAMPLE_RATE: u32 = 44_100;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bounce off a platform, or a sandbox jump
    Bounce,
    /// Coin collected
    Coin,
    /// A tile dug out
    Dig,
    /// A tile placed
    Place,
    /// Took a hit
    Hurt,
    /// Session over
    GameOver,
    /// New high score
    HighScore,
}

/// Audio manager for the game
pub struct AudioManager {
    output: Option<(OutputStream, OutputStreamHandle)>,
    volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        let output = match OutputStream::try_default() {
            Ok(pair) => Some(pair),
            Err(err) => {
                log::warn!("no audio output available ({err}) - audio disabled");
                None
            }
        };
        Self {
            output,
            volume: 0.8,
        }
    }

    /// Set playback volume (0.0 - 1.0); zero silences everything
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        if self.volume <= 0.0 {
            return;
        }
        let Some((_, handle)) = &self.output else {
            return;
        };

        let samples = match effect {
            SoundEffect::Bounce => sweep(300.0, 600.0, 0.12, 0.5),
            SoundEffect::Coin => chime(&[880.0, 1320.0], 0.09, 0.4),
            SoundEffect::Dig => sweep(220.0, 120.0, 0.08, 0.4),
            SoundEffect::Place => sweep(160.0, 200.0, 0.06, 0.35),
            SoundEffect::Hurt => sweep(500.0, 150.0, 0.15, 0.5),
            SoundEffect::GameOver => sweep(400.0, 80.0, 0.5, 0.5),
            SoundEffect::HighScore => chime(&[500.0, 600.0, 700.0, 800.0, 1000.0], 0.1, 0.4),
        };

        let sink = match Sink::try_new(handle) {
            Ok(sink) => sink,
            Err(err) => {
                log::warn!("failed to open audio sink: {err}");
                return;
            }
        };
        sink.set_volume(self.volume);
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
        sink.detach();
    }
}

// === Sample generators ===

/// Sine sweep from `from` Hz to `to` Hz over `dur` seconds with a linear
/// fade-out, phase-integrated so the pitch glides without clicks.
fn sweep(from: f32, to: f32, dur: f32, gain: f32) -> Vec<f32> {
    let n = (dur * SAMPLE_RATE as f32) as usize;
    let mut samples = Vec::with_capacity(n);
    let mut phase = 0.0f32;
    for i in 0..n {
        let t = i as f32 / n as f32;
        let freq = from + (to - from) * t;
        phase += std::f32::consts::TAU * freq / SAMPLE_RATE as f32;
        let envelope = 1.0 - t;
        samples.push(phase.sin() * envelope * gain);
    }
    samples
}

/// Short notes played back to back, each with its own fade-out
fn chime(freqs: &[f32], note_dur: f32, gain: f32) -> Vec<f32> {
    let mut samples = Vec::new();
    for &freq in freqs {
        samples.extend(sweep(freq, freq, note_dur, gain));
    }
    samples
}
