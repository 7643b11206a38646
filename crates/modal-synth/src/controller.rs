//! Round-robin polyphonic voice controller.
//!
//! A fixed pool of `N` voices, each slot holding at most one MIDI note.
//! New notes take the first free slot after the most recently started one.
//! When every slot is busy the note is dropped; nothing is stolen.

use modal_core::midi_to_freq;

/// A monophonic sound source the controller can drive.
pub trait Voice {
    /// Starts a note at `freq` Hz with velocity in `0..=1`.
    fn on(&mut self, freq: f32, velocity: f32);

    /// Releases the current note.
    fn off(&mut self);

    /// Produces one output sample.
    fn tick(&mut self) -> f32;

    /// Propagates a sample-rate change.
    fn set_sample_rate(&mut self, sample_rate: f32);
}

/// Fixed-size pool of voices with round-robin note allocation.
///
/// # Example
///
/// ```rust
/// use modal_synth::{ModalVoice, VoiceController};
///
/// let mut poly: VoiceController<ModalVoice<8>, 4> =
///     VoiceController::new(core::array::from_fn(|_| ModalVoice::new(48000.0)));
/// assert_eq!(poly.key_down(60, 1.0), Some(0));
/// assert_eq!(poly.key_down(64, 1.0), Some(1));
/// poly.key_up(60);
/// let _sample = poly.tick();
/// ```
#[derive(Debug, Clone)]
pub struct VoiceController<V, const N: usize> {
    voices: [V; N],
    notes: [Option<u8>; N],
    /// Slot of the most recently started note.
    last: usize,
}

impl<V: Voice + Default, const N: usize> Default for VoiceController<V, N> {
    fn default() -> Self {
        Self::new(core::array::from_fn(|_| V::default()))
    }
}

impl<V: Voice, const N: usize> VoiceController<V, N> {
    /// Wraps a pool of voices. All slots start free.
    pub fn new(voices: [V; N]) -> Self {
        Self {
            voices,
            notes: [None; N],
            // first scan starts at slot 0
            last: N.saturating_sub(1),
        }
    }

    /// Number of slots.
    pub const fn voice_count(&self) -> usize {
        N
    }

    /// Number of slots currently holding a note.
    pub fn active_count(&self) -> usize {
        self.notes.iter().filter(|n| n.is_some()).count()
    }

    /// Note held by a slot, if any.
    pub fn active_note(&self, slot: usize) -> Option<u8> {
        self.notes.get(slot).copied().flatten()
    }

    /// Read access to the voices.
    pub fn voices(&self) -> &[V; N] {
        &self.voices
    }

    /// Mutable access to the voices, for pushing parameters.
    pub fn voices_mut(&mut self) -> &mut [V; N] {
        &mut self.voices
    }

    /// Starts a note on the next free slot.
    ///
    /// Returns the slot used, or `None` if every slot is busy and the note
    /// was dropped.
    pub fn key_down(&mut self, note: u8, velocity: f32) -> Option<usize> {
        let slot = (1..=N)
            .map(|offset| (self.last + offset) % N)
            .find(|&slot| self.notes[slot].is_none());

        let Some(slot) = slot else {
            #[cfg(feature = "tracing")]
            tracing::debug!(note, "voice pool full, note dropped");
            return None;
        };

        self.notes[slot] = Some(note);
        self.last = slot;
        self.voices[slot].on(midi_to_freq(note as f32), velocity);
        Some(slot)
    }

    /// Releases the first slot holding `note`. Unknown notes are ignored.
    pub fn key_up(&mut self, note: u8) {
        if let Some(slot) = self.notes.iter().position(|&n| n == Some(note)) {
            self.voices[slot].off();
            self.notes[slot] = None;
        }
    }

    /// Releases every held note.
    pub fn all_notes_off(&mut self) {
        for (voice, note) in self.voices.iter_mut().zip(self.notes.iter_mut()) {
            if note.take().is_some() {
                voice.off();
            }
        }
    }

    /// Propagates a sample-rate change to every voice.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
        }
    }

    /// Sums one sample from every voice, held or not.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        self.voices.iter_mut().map(Voice::tick).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone)]
    struct MockVoice {
        freq: Option<f32>,
        velocity: f32,
        ons: u32,
        offs: u32,
        sample_rate: f32,
    }

    impl Voice for MockVoice {
        fn on(&mut self, freq: f32, velocity: f32) {
            self.freq = Some(freq);
            self.velocity = velocity;
            self.ons += 1;
        }

        fn off(&mut self) {
            self.offs += 1;
        }

        fn tick(&mut self) -> f32 {
            if self.freq.is_some() { 1.0 } else { 0.0 }
        }

        fn set_sample_rate(&mut self, sample_rate: f32) {
            self.sample_rate = sample_rate;
        }
    }

    fn pool<const N: usize>() -> VoiceController<MockVoice, N> {
        VoiceController::default()
    }

    #[test]
    fn test_round_robin_drop_and_reuse() {
        let mut poly = pool::<2>();
        assert_eq!(poly.key_down(60, 1.0), Some(0));
        assert_eq!(poly.key_down(64, 1.0), Some(1));

        let before = poly.voices().clone();
        assert_eq!(poly.key_down(67, 1.0), None, "third note should be dropped");
        assert_eq!(poly.voices()[0].ons, before[0].ons);
        assert_eq!(poly.voices()[1].ons, before[1].ons);

        poly.key_up(60);
        assert_eq!(poly.voices()[0].offs, 1);
        assert_eq!(poly.key_down(67, 1.0), Some(0), "should reuse the slot freed by 60");
        assert_eq!(poly.active_note(0), Some(67));
        assert_eq!(poly.active_note(1), Some(64));
    }

    #[test]
    fn test_scan_starts_after_last_slot() {
        let mut poly = pool::<4>();
        assert_eq!(poly.key_down(60, 1.0), Some(0));
        poly.key_up(60);
        // slot 0 is free again but the scan resumes after it
        assert_eq!(poly.key_down(62, 1.0), Some(1));
        assert_eq!(poly.key_down(64, 1.0), Some(2));
        assert_eq!(poly.key_down(65, 1.0), Some(3));
        assert_eq!(poly.key_down(67, 1.0), Some(0));
    }

    #[test]
    fn test_key_down_passes_pitch_and_velocity() {
        let mut poly = pool::<1>();
        poly.key_down(69, 0.5);
        assert_eq!(poly.voices()[0].freq, Some(440.0));
        assert_eq!(poly.voices()[0].velocity, 0.5);
    }

    #[test]
    fn test_unknown_key_up_is_ignored() {
        let mut poly = pool::<2>();
        poly.key_down(60, 1.0);
        poly.key_up(61);
        assert_eq!(poly.active_count(), 1);
        assert!(poly.voices().iter().all(|v| v.offs == 0));
    }

    #[test]
    fn test_same_note_can_take_two_slots() {
        let mut poly = pool::<2>();
        assert_eq!(poly.key_down(60, 1.0), Some(0));
        assert_eq!(poly.key_down(60, 1.0), Some(1));
        poly.key_up(60);
        assert_eq!(poly.active_note(0), None);
        assert_eq!(poly.active_note(1), Some(60));
        poly.key_up(60);
        assert_eq!(poly.active_count(), 0);
    }

    #[test]
    fn test_all_notes_off() {
        let mut poly = pool::<3>();
        poly.key_down(60, 1.0);
        poly.key_down(64, 1.0);
        poly.all_notes_off();
        assert_eq!(poly.active_count(), 0);
        assert_eq!(poly.voices()[0].offs, 1);
        assert_eq!(poly.voices()[1].offs, 1);
        assert_eq!(poly.voices()[2].offs, 0);
    }

    #[test]
    fn test_tick_sums_voices() {
        let mut poly = pool::<3>();
        assert_eq!(poly.tick(), 0.0);
        poly.key_down(60, 1.0);
        poly.key_down(64, 1.0);
        assert_eq!(poly.tick(), 2.0);
    }

    #[test]
    fn test_set_sample_rate_reaches_every_voice() {
        let mut poly = pool::<3>();
        poly.set_sample_rate(96000.0);
        assert!(poly.voices().iter().all(|v| v.sample_rate == 96000.0));
    }

    #[test]
    fn test_active_note_out_of_range() {
        let poly = pool::<2>();
        assert_eq!(poly.voice_count(), 2);
        assert_eq!(poly.active_note(5), None);
    }
}
