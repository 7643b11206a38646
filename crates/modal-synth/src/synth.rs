//! Block-based polyphonic modal synthesizer.
//!
//! [`ModalSynth`] is what a host drives. Each call to
//! [`process_block`](ModalSynth::process_block):
//!
//! 1. writes macro values into the parameter snapshot,
//! 2. if any parameter changed since the last block, pushes the snapshot into
//!    every voice (recomputing resonator banks only where needed),
//! 3. applies the block's note events in order,
//! 4. renders the block as the trimmed sum of all voices.
//!
//! Parameter changes are therefore quantized to block boundaries.

use modal_core::{ParamDescriptor, ParamId, ParameterInfo};

use crate::controller::VoiceController;
use crate::macros::{MACRO_SLOTS, MacroBank, MacroSlot};
use crate::params::{Param, SynthParams};
use crate::voice::{MAX_MODES, ModalVoice};

/// Voice count of [`StandardSynth`].
pub const MAX_VOICES: usize = 16;

/// Trim applied to the summed voices.
pub const OUTPUT_GAIN: f32 = 0.1;

/// 16 voices of 40 modes each.
pub type StandardSynth = ModalSynth<MAX_VOICES, MAX_MODES>;

/// Note-on or note-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEventKind {
    /// Key pressed.
    On,
    /// Key released.
    Off,
}

/// A note event delivered with a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    /// MIDI note number, 0..=127.
    pub note: u8,
    /// Velocity in `0..=1`. Ignored for note-off.
    pub velocity: f32,
    /// On or off.
    pub kind: NoteEventKind,
}

impl NoteEvent {
    /// Note-on event.
    pub const fn on(note: u8, velocity: f32) -> Self {
        Self {
            note,
            velocity,
            kind: NoteEventKind::On,
        }
    }

    /// Note-off event.
    pub const fn off(note: u8) -> Self {
        Self {
            note,
            velocity: 0.0,
            kind: NoteEventKind::Off,
        }
    }

    /// Decodes a raw 3-byte MIDI channel message.
    ///
    /// Note-on with velocity 0 is treated as note-off. Anything other than
    /// note-on/off returns `None`.
    pub fn from_midi(bytes: [u8; 3]) -> Option<Self> {
        let [status, note, velocity] = bytes;
        let note = note & 0x7F;
        let velocity = velocity & 0x7F;
        match status & 0xF0 {
            0x90 if velocity > 0 => Some(Self::on(note, f32::from(velocity) / 127.0)),
            0x90 | 0x80 => Some(Self::off(note)),
            _ => None,
        }
    }
}

/// Polyphonic modal synthesizer with `VOICES` voices of `MODES` modes.
///
/// # Example
///
/// ```rust
/// use modal_synth::{NoteEvent, Param, StandardSynth};
///
/// let mut synth = StandardSynth::new(48000.0);
/// synth.set(Param::Decay, 2.0);
///
/// let mut block = [0.0f32; 256];
/// synth.process_block(&[NoteEvent::on(60, 0.8)], &mut block);
/// synth.process_block(&[], &mut block);
/// assert!(block.iter().any(|s| *s != 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct ModalSynth<const VOICES: usize, const MODES: usize> {
    controller: VoiceController<ModalVoice<MODES>, VOICES>,
    params: SynthParams,
    macros: MacroBank<MACRO_SLOTS>,
    dirty: bool,
    sample_rate: f32,
}

impl<const VOICES: usize, const MODES: usize> ModalSynth<VOICES, MODES> {
    /// Creates a synth with default parameters.
    pub fn new(sample_rate: f32) -> Self {
        let voices = core::array::from_fn(|i| {
            // distinct noise per voice
            let seed = 0x9E37_79B9_u32.wrapping_mul(i as u32 + 1);
            ModalVoice::with_seed(sample_rate, seed)
        });
        Self {
            controller: VoiceController::new(voices),
            params: SynthParams::default(),
            macros: MacroBank::new(),
            dirty: true,
            sample_rate,
        }
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Changes the sample rate of every voice and recomputes their banks.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        #[cfg(feature = "tracing")]
        tracing::info!(sample_rate, "modal synth sample rate changed");

        self.sample_rate = sample_rate;
        self.controller.set_sample_rate(sample_rate);
        for voice in self.controller.voices_mut() {
            voice.update_mode_coefficients();
        }
        self.dirty = true;
    }

    /// Current parameter snapshot.
    pub fn params(&self) -> &SynthParams {
        &self.params
    }

    /// Plain value of a parameter.
    pub fn get(&self, param: Param) -> f32 {
        self.params.get(param)
    }

    /// Sets a parameter. Takes effect at the start of the next block.
    ///
    /// Returns `true` if the value changed.
    pub fn set(&mut self, param: Param, value: f32) -> bool {
        let changed = self.params.set(param, value);
        self.dirty |= changed;
        changed
    }

    /// Replaces the whole parameter snapshot.
    pub fn load_params(&mut self, params: SynthParams) {
        if params != self.params {
            self.params = params;
            self.dirty = true;
        }
    }

    /// Macro bank.
    pub fn macros(&self) -> &MacroBank<MACRO_SLOTS> {
        &self.macros
    }

    /// Maps a macro slot onto a parameter, or unmaps it with `None`.
    ///
    /// Returns `false` if the slot or the parameter does not exist.
    pub fn set_macro_target(&mut self, slot: usize, target: Option<ParamId>) -> bool {
        if target.is_some_and(|id| self.params.param_index_by_id(id).is_none()) {
            return false;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(slot, target = ?target, "macro retargeted");

        self.macros.set_target(slot, target)
    }

    /// Sets a macro slot's normalized output range.
    pub fn set_macro_range(&mut self, slot: usize, low: f32, high: f32) -> bool {
        self.macros.set_range(slot, low, high)
    }

    /// Sets a macro slot's value. Takes effect at the start of the next block.
    pub fn set_macro_value(&mut self, slot: usize, value: f32) -> bool {
        self.macros.set_value(slot, value)
    }

    /// Replaces a whole macro slot, validating its target.
    pub fn set_macro_slot(&mut self, index: usize, slot: MacroSlot) -> bool {
        self.set_macro_target(index, slot.target) && self.macros.set_slot(index, slot)
    }

    /// Starts a note immediately. Returns the voice slot, `None` if dropped.
    pub fn note_on(&mut self, note: u8, velocity: f32) -> Option<usize> {
        self.prepare_block();
        self.controller.key_down(note, velocity)
    }

    /// Releases a note immediately.
    pub fn note_off(&mut self, note: u8) {
        self.controller.key_up(note);
    }

    /// Releases every held note.
    pub fn all_notes_off(&mut self) {
        self.controller.all_notes_off();
    }

    /// Number of voices holding a note.
    pub fn active_voice_count(&self) -> usize {
        self.controller.active_count()
    }

    /// The voice pool.
    pub fn voices(&self) -> &[ModalVoice<MODES>; VOICES] {
        self.controller.voices()
    }

    /// The voice controller.
    pub fn controller(&self) -> &VoiceController<ModalVoice<MODES>, VOICES> {
        &self.controller
    }

    /// Applies one note event.
    pub fn handle_event(&mut self, event: NoteEvent) {
        match event.kind {
            NoteEventKind::On => {
                self.controller.key_down(event.note, event.velocity);
            }
            NoteEventKind::Off => self.controller.key_up(event.note),
        }
    }

    /// Renders one mono block.
    ///
    /// Parameters and macros are applied first, then `events` in order,
    /// then every sample of `out` is written.
    pub fn process_block(&mut self, events: &[NoteEvent], out: &mut [f32]) {
        self.prepare_block();

        for event in events {
            self.handle_event(*event);
        }

        for sample in out.iter_mut() {
            *sample = self.controller.tick() * OUTPUT_GAIN;
        }
    }

    /// Renders one block and copies it into every channel.
    ///
    /// Channel 0 is rendered; the others receive a copy, truncated to the
    /// shorter length if they differ.
    pub fn process_block_channels(&mut self, events: &[NoteEvent], channels: &mut [&mut [f32]]) {
        let Some((first, rest)) = channels.split_first_mut() else {
            self.process_block(events, &mut []);
            return;
        };

        self.process_block(events, first);
        for channel in rest {
            let len = channel.len().min(first.len());
            channel[..len].copy_from_slice(&first[..len]);
        }
    }

    /// Applies macros and, if anything changed, pushes parameters to voices.
    fn prepare_block(&mut self) {
        self.dirty |= self.macros.apply(&mut self.params);
        if !self.dirty {
            return;
        }

        let mut recomputed = 0usize;
        for voice in self.controller.voices_mut() {
            recomputed += usize::from(self.params.apply_to(voice));
        }
        self.dirty = false;

        #[cfg(feature = "tracing")]
        tracing::debug!(recomputed, voices = VOICES, "parameters pushed to voices");
        #[cfg(not(feature = "tracing"))]
        let _ = recomputed;
    }
}

impl<const VOICES: usize, const MODES: usize> ParameterInfo for ModalSynth<VOICES, MODES> {
    fn param_count(&self) -> usize {
        self.params.param_count()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        self.params.param_info(index)
    }

    fn get_param(&self, index: usize) -> f32 {
        self.params.get_param(index)
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if let Some(param) = Param::from_index(index) {
            self.set(param, value);
        }
    }
}
