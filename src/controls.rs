//! Held-key and mode flags read by the frame loop.

/// One of the boolean controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlFlag {
    Left,
    Up,
    Right,
    Down,
    Pause,
    LockToCenter,
    /// One-shot: consumed and cleared by the next tick.
    Reset,
}

/// Current state of every [`ControlFlag`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub up: bool,
    pub right: bool,
    pub down: bool,
    pub pause: bool,
    pub lock_to_center: bool,
    pub reset: bool,
}

impl Controls {
    pub fn get(&self, flag: ControlFlag) -> bool {
        match flag {
            ControlFlag::Left => self.left,
            ControlFlag::Up => self.up,
            ControlFlag::Right => self.right,
            ControlFlag::Down => self.down,
            ControlFlag::Pause => self.pause,
            ControlFlag::LockToCenter => self.lock_to_center,
            ControlFlag::Reset => self.reset,
        }
    }

    pub fn set(&mut self, flag: ControlFlag, value: bool) {
        *self.slot(flag) = value;
    }

    /// Flip a flag and return its new value.
    pub fn toggle(&mut self, flag: ControlFlag) -> bool {
        let slot = self.slot(flag);
        *slot = !*slot;
        *slot
    }

    /// Clear the reset flag, returning whether it was raised.
    pub fn take_reset(&mut self) -> bool {
        std::mem::take(&mut self.reset)
    }

    fn slot(&mut self, flag: ControlFlag) -> &mut bool {
        match flag {
            ControlFlag::Left => &mut self.left,
            ControlFlag::Up => &mut self.up,
            ControlFlag::Right => &mut self.right,
            ControlFlag::Down => &mut self.down,
            ControlFlag::Pause => &mut self.pause,
            ControlFlag::LockToCenter => &mut self.lock_to_center,
            ControlFlag::Reset => &mut self.reset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_toggle() {
        let mut controls = Controls::default();
        controls.set(ControlFlag::Left, true);
        assert!(controls.left);
        assert!(controls.get(ControlFlag::Left));

        assert!(controls.toggle(ControlFlag::Pause));
        assert!(!controls.toggle(ControlFlag::Pause));
        assert!(!controls.pause);
    }

    #[test]
    fn test_take_reset_is_one_shot() {
        let mut controls = Controls::default();
        controls.set(ControlFlag::Reset, true);
        assert!(controls.take_reset());
        assert!(!controls.take_reset());
    }
}
