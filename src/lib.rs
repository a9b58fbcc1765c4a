//! # lightcone
//!
//! A light cone you can grab: normal-mapped lighting over a static image on
//! a small embedded LCD.
//!
//! - **Compositing**: a base image is relit through a per-pixel normal map by
//!   a light sprite into an offscreen surface, then blitted
//! - **Interaction**: the light follows the pointer while held and coasts back
//!   with decaying momentum when released
//! - **Idle motion**: a looping vertical bob and a six-segment horizontal
//!   sweep keep the light moving when nobody touches it
//! - **Badge support** (feature `badge`): ST7789 panel, backlight and buttons
//!   of the Disobey 2026 badge
//!
//! ## Quick start
//!
//! ```rust,ignore
//! let normals = NormalMap::from_height(size, 3, height);
//! let sprite = LightSprite::cone(96);
//! let context = CompositionContext::new(base, &normals, &sprite)?;
//!
//! let mut window = Window::new(origin, size);
//! let mut light = InteractiveLightCompositor::create(context, size, Config::default(), Instant::now());
//!
//! loop {
//!     if let Some(event) = tracker.update(pointer_state) {
//!         light.pointer(event.relative_to(window.origin()), &mut window, Instant::now());
//!     }
//!     light.poll(Instant::now(), &mut window);
//!     if window.take_invalid() {
//!         light.paint(&window, &mut display)?;
//!     }
//! }
//! ```

#![no_std]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod anim;
pub mod compositor;
mod config;
mod error;
pub mod momentum;
pub mod motion;
pub mod normal_map;
pub mod pointer;
pub mod surface;
pub mod timer;
pub mod trig;
pub mod window;

#[cfg(feature = "badge")]
mod board;
#[cfg(feature = "badge")]
mod buttons;
#[cfg(feature = "badge")]
mod display;

#[cfg(feature = "badge")]
pub use board::*;
#[cfg(feature = "badge")]
pub use buttons::Buttons;
pub use compositor::{
    InteractiveLightCompositor,
    LightState,
    Phase,
};
pub use config::{
    Config,
    REFRESH_THRESHOLD,
};
#[cfg(feature = "badge")]
pub use display::{
    Backlight,
    Display,
    SCREEN_SIZE,
};
pub use error::{
    Error,
    Result,
};
pub use normal_map::{
    CompositionContext,
    LightSprite,
    NormalMap,
    NormalMapping,
    Pass,
};
pub use pointer::{
    Pad,
    PointerEvent,
    PointerState,
    PointerTracker,
    VirtualPointer,
};
pub use surface::Surface;
pub use window::Window;
