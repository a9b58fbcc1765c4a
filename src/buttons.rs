//! D-pad and A button, sampled as a [`Pad`] for the virtual pointer.

use esp_hal::gpio::{
    Input,
    InputConfig,
};

use crate::{
    ButtonResources,
    pointer::Pad,
};

/// The buttons that steer and grab the light. All are active low.
pub struct Buttons {
    pub up: Input<'static>,
    pub down: Input<'static>,
    pub left: Input<'static>,
    pub right: Input<'static>,
    pub a: Input<'static>,
}

impl From<ButtonResources<'static>> for Buttons {
    fn from(res: ButtonResources<'static>) -> Self {
        let pull_up = InputConfig::default().with_pull(esp_hal::gpio::Pull::Up);
        Self {
            up: Input::new(res.up, pull_up),
            down: Input::new(res.down, pull_up),
            left: Input::new(res.left, pull_up),
            right: Input::new(res.right, pull_up),
            a: Input::new(res.a, pull_up),
        }
    }
}

impl Buttons {
    /// Current level of every button. Bounce is harmless here: the pad is
    /// sampled on a fixed period and only ever nudges the cursor.
    pub fn pad(&self) -> Pad {
        Pad {
            up: self.up.is_low(),
            down: self.down.is_low(),
            left: self.left.is_low(),
            right: self.right.is_low(),
            press: self.a.is_low(),
        }
    }
}
