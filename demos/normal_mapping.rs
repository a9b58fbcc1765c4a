//! A light cone over an embossed panel.
//!
//! The light bobs and sweeps on its own. Steer the cursor with the D-pad and
//! hold A to grab the light; let go and it drifts back onto its idle path.

#![no_std]
#![no_main]

use defmt::{
    error,
    info,
};
use embassy_executor::Spawner;
use embassy_futures::select::{
    Either,
    select,
};
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::Channel,
};
use embassy_time::{
    Duration,
    Instant,
    Timer,
};
use embedded_graphics::{
    mono_font::{
        MonoTextStyle,
        ascii::FONT_10X20,
    },
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{
        Circle,
        PrimitiveStyle,
        Rectangle,
    },
    text::{
        Alignment,
        Text,
    },
};
use esp_backtrace as _;
use esp_hal::timer::timg::TimerGroup;
use esp_println as _;
#[allow(clippy::wildcard_imports)]
use lightcone::*;

extern crate alloc;

esp_bootloader_esp_idf::esp_app_desc!();

const PANEL: Size = Size::new(240, 120);
const PANEL_ORIGIN: Point = Point::new(40, 25);
const LIGHT_DIAMETER: u32 = 96;
const RIVET_PITCH: i32 = 40;
const POINTER_PERIOD: Duration = Duration::from_millis(10);
const FRAME: Duration = Duration::from_millis(5);

static POINTER: Channel<CriticalSectionRawMutex, PointerEvent, 8> = Channel::new();

/// Height field: domed rivets on a grid, grooves between the plates.
fn height(p: Point) -> i32 {
    let cx = p.x.rem_euclid(RIVET_PITCH) - RIVET_PITCH / 2;
    let cy = p.y.rem_euclid(RIVET_PITCH) - RIVET_PITCH / 2;
    let d2 = cx * cx + cy * cy;
    let rivet = (49 - d2).max(0);
    let groove = if p.x.rem_euclid(RIVET_PITCH * 2) < 2 || p.y.rem_euclid(RIVET_PITCH * 3) < 2 {
        -12
    } else {
        0
    };
    rivet + groove
}

fn draw_panel(surface: &mut Surface<Rgb565>) {
    let steel = Rgb565::new(18, 38, 20);
    let rivet = PrimitiveStyle::with_fill(Rgb565::new(24, 48, 26));
    let _ = surface.clear(steel);
    let _ = Rectangle::new(Point::zero(), PANEL)
        .into_styled(PrimitiveStyle::with_stroke(Rgb565::new(8, 16, 8), 2))
        .draw(surface);
    for y in (RIVET_PITCH / 2..PANEL.height as i32).step_by(RIVET_PITCH as usize) {
        for x in (RIVET_PITCH / 2..PANEL.width as i32).step_by(RIVET_PITCH as usize) {
            let _ = Circle::with_center(Point::new(x, y), 14).into_styled(rivet).draw(surface);
        }
    }
    let _ = Text::with_alignment(
        "DISOBEY",
        Point::new(PANEL.width as i32 / 2, PANEL.height as i32 / 2 + 7),
        MonoTextStyle::new(&FONT_10X20, Rgb565::new(28, 56, 28)),
        Alignment::Center,
    )
    .draw(surface);
}

#[embassy_executor::task]
async fn input_task(buttons: &'static mut Buttons) {
    let mut cursor = VirtualPointer::new(SCREEN_SIZE);
    let mut tracker = PointerTracker::default();
    loop {
        let state = cursor.update(buttons.pad());
        if let Some(event) = tracker.update(state) {
            POINTER.send(event).await;
        }
        Timer::after(POINTER_PERIOD).await;
    }
}

#[embassy_executor::task]
async fn display_task(display: &'static mut Display<'static>, backlight: &'static mut Backlight) {
    backlight.on();
    display.clear(Rgb565::BLACK).unwrap();

    let normals = NormalMap::from_height(PANEL, 3, height);
    let sprite = LightSprite::cone(LIGHT_DIAMETER);
    let mut base = Surface::new(PANEL, Rgb565::BLACK);
    draw_panel(&mut base);
    info!("normal map ready, max deflection {}", normals.max_deflection());

    let context = CompositionContext::new(base, &normals, &sprite).expect("panel and normal map differ in size");
    let mut window = Window::new(PANEL_ORIGIN, PANEL);
    let mut light = InteractiveLightCompositor::create(context, PANEL, Config::default(), Instant::now());

    loop {
        if let Either::First(event) = select(POINTER.receive(), Timer::after(FRAME)).await
            && window.accepts(event.position())
        {
            light.pointer(event.relative_to(window.origin()), &mut window, Instant::now());
        }

        light.poll(Instant::now(), &mut window);

        if window.take_invalid()
            && let Err(e) = light.paint(&window, display)
        {
            error!("blit failed: {}", defmt::Debug2Format(&e));
        }
    }
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let peripherals = lightcone::init();
    let resources = split_resources!(peripherals);

    // Two panel surfaces, the normal map and the light sprite.
    esp_alloc::heap_allocator!(size: 200 * 1024);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let display = mk_static!(Display<'static>, resources.display.into());
    let backlight = mk_static!(Backlight, resources.backlight.into());
    let buttons = mk_static!(Buttons, resources.buttons.into());

    spawner.must_spawn(display_task(display, backlight));
    spawner.must_spawn(input_task(buttons));

    loop {
        Timer::after(Duration::from_secs(600)).await;
    }
}
