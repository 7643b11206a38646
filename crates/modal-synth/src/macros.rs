//! Macro controls: one value fanned out to a target parameter through a
//! normalized `(low, high)` range.

use modal_core::{ParamId, ParameterInfo, lerp};

/// Number of macro slots on the standard synth.
pub const MACRO_SLOTS: usize = 3;

/// One macro mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroSlot {
    /// Parameter driven by this slot, `None` when unmapped.
    pub target: Option<ParamId>,
    /// Normalized target value at macro value 0.
    pub low: f32,
    /// Normalized target value at macro value 1.
    pub high: f32,
    /// Macro value in `0..=1`.
    pub value: f32,
}

impl Default for MacroSlot {
    fn default() -> Self {
        Self {
            target: None,
            low: 0.0,
            high: 1.0,
            value: 0.0,
        }
    }
}

impl MacroSlot {
    /// Normalized value this slot writes to its target.
    #[inline]
    pub fn normalized_output(&self) -> f32 {
        lerp(self.low, self.high, self.value)
    }
}

/// Fixed bank of `N` macro slots.
///
/// # Example
///
/// ```rust
/// use modal_core::ParameterInfo;
/// use modal_synth::{MacroBank, Param, SynthParams};
///
/// let mut params = SynthParams::default();
/// let mut macros: MacroBank<3> = MacroBank::new();
/// macros.set_target(0, Some(Param::FormantMix.descriptor().id));
/// macros.set_range(0, 0.2, 0.6);
/// macros.set_value(0, 0.5);
/// assert!(macros.apply(&mut params));
/// assert!((params.get(Param::FormantMix) - 0.4).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MacroBank<const N: usize> {
    slots: [MacroSlot; N],
}

impl<const N: usize> Default for MacroBank<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MacroBank<N> {
    /// Creates a bank with every slot unmapped.
    pub fn new() -> Self {
        Self {
            slots: [MacroSlot::default(); N],
        }
    }

    /// Number of slots.
    pub const fn len(&self) -> usize {
        N
    }

    /// Whether the bank has no slots.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Slot at `index`.
    pub fn slot(&self, index: usize) -> Option<&MacroSlot> {
        self.slots.get(index)
    }

    /// All slots.
    pub fn slots(&self) -> &[MacroSlot; N] {
        &self.slots
    }

    /// Replaces a slot. Returns `false` if `index` is out of range.
    pub fn set_slot(&mut self, index: usize, slot: MacroSlot) -> bool {
        let Some(existing) = self.slots.get_mut(index) else {
            return false;
        };
        *existing = MacroSlot {
            target: slot.target,
            low: slot.low.clamp(0.0, 1.0),
            high: slot.high.clamp(0.0, 1.0),
            value: slot.value.clamp(0.0, 1.0),
        };
        true
    }

    /// Maps a slot onto a parameter, or unmaps it with `None`.
    pub fn set_target(&mut self, index: usize, target: Option<ParamId>) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                slot.target = target;
                true
            }
            None => false,
        }
    }

    /// Sets a slot's normalized output range.
    pub fn set_range(&mut self, index: usize, low: f32, high: f32) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                slot.low = low.clamp(0.0, 1.0);
                slot.high = high.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    /// Sets a slot's macro value.
    pub fn set_value(&mut self, index: usize, value: f32) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                slot.value = value.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    /// Unmaps every slot and restores default ranges.
    pub fn clear(&mut self) {
        self.slots = [MacroSlot::default(); N];
    }

    /// Writes every mapped slot into `params`.
    ///
    /// Targets that `params` does not know are skipped. Returns `true` if
    /// any parameter value changed.
    pub fn apply<P: ParameterInfo>(&self, params: &mut P) -> bool {
        let mut changed = false;
        for slot in &self.slots {
            let Some(index) = slot.target.and_then(|id| params.param_index_by_id(id)) else {
                continue;
            };
            let before = params.get_param(index);
            params.set_param_normalized(index, slot.normalized_output());
            changed |= params.get_param(index) != before;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Param, SynthParams};

    #[test]
    fn test_unmapped_bank_changes_nothing() {
        let mut params = SynthParams::default();
        let bank: MacroBank<3> = MacroBank::new();
        assert!(!bank.apply(&mut params));
        assert_eq!(params, SynthParams::default());
    }

    #[test]
    fn test_macro_maps_through_range() {
        let mut params = SynthParams::default();
        let mut bank: MacroBank<3> = MacroBank::new();
        bank.set_target(1, Some(Param::Falloff.descriptor().id));
        bank.set_range(1, 0.0, 0.5);
        bank.set_value(1, 1.0);
        assert!(bank.apply(&mut params));
        // 0.5 normalized on 0..3
        assert!((params.get(Param::Falloff) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_inverted_range() {
        let mut params = SynthParams::default();
        let mut bank: MacroBank<1> = MacroBank::new();
        bank.set_target(0, Some(Param::EvenGain.descriptor().id));
        bank.set_range(0, 1.0, 0.0);
        bank.set_value(0, 0.25);
        bank.apply(&mut params);
        assert!((params.get(Param::EvenGain) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_reapply_reports_no_change() {
        let mut params = SynthParams::default();
        let mut bank: MacroBank<3> = MacroBank::new();
        bank.set_target(0, Some(Param::Decay.descriptor().id));
        bank.set_value(0, 0.3);
        assert!(bank.apply(&mut params));
        assert!(!bank.apply(&mut params), "same macro value should not dirty");
    }

    #[test]
    fn test_stepped_target_is_rounded() {
        let mut params = SynthParams::default();
        let mut bank: MacroBank<3> = MacroBank::new();
        bank.set_target(0, Some(Param::Modes.descriptor().id));
        bank.set_value(0, 0.5);
        bank.apply(&mut params);
        // 1 + 0.5 * 39 = 20.5, rounded
        let modes = params.get(Param::Modes);
        assert_eq!(modes, libm::roundf(modes));
    }

    #[test]
    fn test_unknown_target_is_skipped() {
        let mut params = SynthParams::default();
        let mut bank: MacroBank<3> = MacroBank::new();
        bank.set_target(0, Some(ParamId(9999)));
        bank.set_value(0, 1.0);
        assert!(!bank.apply(&mut params));
    }

    #[test]
    fn test_slot_bounds_and_clamping() {
        let mut bank: MacroBank<3> = MacroBank::new();
        assert_eq!(bank.len(), 3);
        assert!(!bank.set_value(3, 0.5));
        assert!(!bank.set_target(7, None));
        assert!(bank.set_slot(
            2,
            MacroSlot {
                target: None,
                low: -1.0,
                high: 2.0,
                value: 5.0,
            }
        ));
        let slot = bank.slot(2).unwrap();
        assert_eq!((slot.low, slot.high, slot.value), (0.0, 1.0, 1.0));

        bank.clear();
        assert_eq!(bank.slot(2), Some(&MacroSlot::default()));
    }
}
