use super::layout::{table_for, KeyboardLayout, Slot};

/// Outcome of feeding one keystroke to a [`BopomofoReadingBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiveResult {
    /// The key does not belong to the active layout; the buffer is unchanged
    /// and the caller should try routing the key elsewhere.
    NoOp,
    /// The key updated one of the four slots; the buffer is still composing.
    Updated,
    /// A tone key finalized the pending syllable into this reading string.
    /// The buffer has been reset and is empty again.
    Composed(String),
    /// The key was recognized but cannot be applied to the current buffer
    /// contents (e.g. a tone key with nothing yet to apply a tone to).
    Invalid,
}

/// Holds at most one in-progress Bopomofo syllable: a consonant, a medial,
/// a vowel and a tone mark, each optional, assembled from raw key presses
/// according to the buffer's active [`KeyboardLayout`].
pub struct BopomofoReadingBuffer {
    layout: KeyboardLayout,
    consonant: Option<&'static str>,
    medial: Option<&'static str>,
    vowel: Option<&'static str>,
    tone: Option<&'static str>,
    order: Vec<Slot>,
}

impl BopomofoReadingBuffer {
    pub fn new(layout: KeyboardLayout) -> Self {
        Self {
            layout,
            consonant: None,
            medial: None,
            vowel: None,
            tone: None,
            order: Vec::with_capacity(4),
        }
    }

    pub fn layout(&self) -> KeyboardLayout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: KeyboardLayout) {
        self.layout = layout;
        self.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The syllable assembled so far, in consonant–medial–vowel–tone order.
    pub fn composing_text(&self) -> String {
        let mut text = String::new();
        if let Some(c) = self.consonant {
            text.push_str(c);
        }
        if let Some(m) = self.medial {
            text.push_str(m);
        }
        if let Some(v) = self.vowel {
            text.push_str(v);
        }
        if let Some(t) = self.tone {
            text.push_str(t);
        }
        text
    }

    pub fn clear(&mut self) {
        self.consonant = None;
        self.medial = None;
        self.vowel = None;
        self.tone = None;
        self.order.clear();
    }

    /// Removes the most recently filled slot. Returns `true` if anything
    /// was actually removed.
    pub fn backspace(&mut self) -> bool {
        match self.order.pop() {
            Some(Slot::Consonant) => self.consonant = None,
            Some(Slot::Medial) => self.medial = None,
            Some(Slot::Vowel) => self.vowel = None,
            Some(Slot::Tone) => self.tone = None,
            None => return false,
        }
        true
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<&'static str> {
        match slot {
            Slot::Consonant => &mut self.consonant,
            Slot::Medial => &mut self.medial,
            Slot::Vowel => &mut self.vowel,
            Slot::Tone => &mut self.tone,
        }
    }

    pub fn receive(&mut self, key: char) -> ReceiveResult {
        // Space is not a layout key in any table: it universally finalizes
        // the pending syllable with no tone mark (tone1), the same way an
        // explicit tone key would, but only once something is composing.
        if key == ' ' {
            if self.is_empty() {
                return ReceiveResult::NoOp;
            }
            let reading = self.composing_text();
            self.clear();
            return ReceiveResult::Composed(reading);
        }

        let Some((slot, value)) = table_for(self.layout).lookup(key) else {
            return ReceiveResult::NoOp;
        };

        if slot == Slot::Tone {
            if self.is_empty() {
                return ReceiveResult::Invalid;
            }
            self.tone = Some(value);
            let reading = self.composing_text();
            self.clear();
            return ReceiveResult::Composed(reading);
        }

        let replaced = self.slot_mut(slot).is_some();
        *self.slot_mut(slot) = Some(value);
        if !replaced {
            self.order.push(slot);
        }
        ReceiveResult::Updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_zhong_and_commits_on_tone() {
        let mut buf = BopomofoReadingBuffer::new(KeyboardLayout::Standard);
        assert_eq!(buf.receive('5'), ReceiveResult::Updated);
        assert_eq!(buf.receive('j'), ReceiveResult::Updated);
        assert_eq!(buf.receive('/'), ReceiveResult::Updated);
        assert_eq!(buf.composing_text(), "ㄓㄨㄥ");
        // space is tone1 in the standard layout: commits with no mark.
        let result = buf.receive(' ');
        assert_eq!(result, ReceiveResult::Composed("ㄓㄨㄥ".to_string()));
        assert!(buf.is_empty());
    }

    #[test]
    fn tone_on_empty_buffer_is_invalid() {
        let mut buf = BopomofoReadingBuffer::new(KeyboardLayout::Standard);
        // '6' is a tone key (ˊ) in the Standard layout; applying a tone with
        // nothing yet composing is rejected rather than silently accepted.
        assert_eq!(buf.receive('6'), ReceiveResult::Invalid);
        assert!(buf.is_empty());
    }

    #[test]
    fn space_on_empty_buffer_is_noop_not_invalid() {
        // Space is not a layout key; with nothing composing it falls through
        // so the Key Handler can route it elsewhere (e.g. open candidates).
        let mut buf = BopomofoReadingBuffer::new(KeyboardLayout::Standard);
        assert_eq!(buf.receive(' '), ReceiveResult::NoOp);
    }

    #[test]
    fn unmapped_key_is_noop() {
        let mut buf = BopomofoReadingBuffer::new(KeyboardLayout::Standard);
        assert_eq!(buf.receive('!'), ReceiveResult::NoOp);
        assert!(buf.is_empty());
    }

    #[test]
    fn backspace_pops_in_typing_order() {
        let mut buf = BopomofoReadingBuffer::new(KeyboardLayout::Standard);
        buf.receive('5'); // consonant
        buf.receive('j'); // medial
        assert!(buf.backspace());
        assert_eq!(buf.composing_text(), "ㄓ");
        assert!(buf.backspace());
        assert!(buf.is_empty());
        assert!(!buf.backspace());
    }

    #[test]
    fn benign_slot_replacement_before_tone() {
        let mut buf = BopomofoReadingBuffer::new(KeyboardLayout::Standard);
        buf.receive('5'); // ㄓ
        buf.receive('1'); // a different consonant key, overwrites ㄓ
        assert_eq!(buf.composing_text(), table_for(KeyboardLayout::Standard)
            .lookup('1')
            .unwrap()
            .1);
    }
}
