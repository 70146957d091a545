//! End-to-end scroll sessions over real surfaces and a recording I2C bus

use core::cell::RefCell;
use core::num::NonZeroU32;
use core::time::Duration;
use std::rc::Rc;

use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use proptest::prelude::*;

use marquee_core::{
    clear, parse_config, scroll, DelayPacer, FramePacer, NeverCancel, ScrollEngine, ScrollSettings,
    SessionResult, TransportError,
};
use marquee_display::{
    CellStyle, Charset, Controller, FontStyle, Geometry, LcdSurface, OledSurface, TextMetrics,
    TransportAddress,
};

const OLED_DATA: u8 = 0x40;
const LCD_RS: u8 = 0x01;

#[derive(Debug)]
struct BusFault;

impl embedded_hal::i2c::Error for BusFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Bus
    }
}

#[derive(Default)]
struct BusLog {
    writes: Vec<(u8, Vec<u8>)>,
    failing: bool,
}

/// I2C bus sharing its log with the test
///
/// With `fail_at = Some(n)` the bus starts failing on the n-th (0-based)
/// write accepted by `is_data`, and keeps failing after that.
#[derive(Clone)]
struct RecordingBus {
    log: Rc<RefCell<BusLog>>,
    fail_at: Option<usize>,
    is_data: fn(&[u8]) -> bool,
}

impl RecordingBus {
    fn new(is_data: fn(&[u8]) -> bool) -> Self {
        Self {
            log: Rc::new(RefCell::new(BusLog::default())),
            fail_at: None,
            is_data,
        }
    }

    fn data_writes(&self) -> Vec<Vec<u8>> {
        self.log
            .borrow()
            .writes
            .iter()
            .filter(|(_, bytes)| (self.is_data)(bytes))
            .map(|(_, bytes)| bytes.clone())
            .collect()
    }
}

impl ErrorType for RecordingBus {
    type Error = BusFault;
}

impl I2c for RecordingBus {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut log = self.log.borrow_mut();
        for op in operations.iter() {
            if let Operation::Write(bytes) = op {
                if (self.is_data)(bytes) {
                    let sent = log.writes.iter().filter(|(_, b)| (self.is_data)(b)).count();
                    if self.fail_at.is_some_and(|n| sent >= n) {
                        log.failing = true;
                    }
                }
                if log.failing {
                    return Err(BusFault);
                }
                log.writes.push((address, bytes.to_vec()));
            }
        }
        Ok(())
    }
}

fn oled_data(bytes: &[u8]) -> bool {
    bytes.first() == Some(&OLED_DATA)
}

fn lcd_data(bytes: &[u8]) -> bool {
    bytes.first().is_some_and(|b| b & LCD_RS != 0)
}

struct NoopDelay;

impl DelayNs for NoopDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

fn small_font() -> FontStyle {
    FontStyle::from_name("6x10", Charset::Ascii).unwrap()
}

fn open_oled(bus: &RecordingBus) -> OledSurface<RecordingBus> {
    block_on(OledSurface::open(
        bus.clone(),
        Controller::Ssd1306,
        Geometry::Bitmap {
            width: 128,
            height: 64,
        },
        TransportAddress::OLED_DEFAULT,
        small_font(),
    ))
    .unwrap()
}

fn settings(speed: u32, loops: Option<u32>) -> ScrollSettings {
    let settings = ScrollSettings::new(NonZeroU32::new(speed).unwrap(), Duration::from_millis(1));
    match loops {
        Some(n) => settings.with_loops(n).at(24),
        None => settings.forever().at(24),
    }
}

#[test]
fn test_oled_single_loop_ends_blank() {
    let bus = RecordingBus::new(oled_data);
    let mut oled = open_oled(&bus);
    let mut pacer = DelayPacer::new(NoopDelay);

    let result = block_on(scroll(
        &mut oled,
        "Hello",
        &settings(2, Some(1)),
        &mut pacer,
        &NeverCancel,
    ));

    assert_eq!(result, SessionResult::Completed { loops_run: 1 });
    assert!(oled.buffer().is_blank());

    // "Hello" is 30px wide: offsets 128, 126, ..., -30 is 80 frames,
    // plus the blank at open and the blank at release, 8 pages each
    let pages = bus.data_writes();
    assert_eq!(pages.len(), (1 + 80 + 1) * 8);
    assert!(pages[pages.len() - 8..]
        .iter()
        .all(|page| page[1..].iter().all(|&b| b == 0)));

    // The first frame starts at the right edge: nothing lit yet
    assert!(pages[8..16].iter().all(|page| page[1..].iter().all(|&b| b == 0)));
    // A frame in the middle of the pass lights pixels
    let middle = 8 + 40 * 8;
    assert!(pages[middle..middle + 8]
        .iter()
        .any(|page| page[1..].iter().any(|&b| b != 0)));
}

#[test]
fn test_oled_flush_failure_stops_session() {
    let mut bus = RecordingBus::new(oled_data);
    // Open's blank is data writes 0-7; frame 10 starts at 8 + 9 * 8
    bus.fail_at = Some(80);
    let mut oled = open_oled(&bus);
    let mut pacer = DelayPacer::new(NoopDelay);

    let result = block_on(scroll(
        &mut oled,
        "A long message that runs off the panel",
        &settings(2, None),
        &mut pacer,
        &NeverCancel,
    ));

    assert_eq!(
        result,
        SessionResult::Failed {
            reason: TransportError::Bus,
            clear_error: Some(TransportError::Bus),
        }
    );
    assert_eq!(bus.data_writes().len(), 80);
}

/// Pacer that raises a signal after a number of frames
struct CancelAfter<'a> {
    frames: usize,
    signal: &'a Signal<NoopRawMutex, ()>,
}

impl FramePacer for CancelAfter<'_> {
    async fn wait(&mut self, _delay: Duration) {
        self.frames = self.frames.saturating_sub(1);
        if self.frames == 0 {
            self.signal.signal(());
        }
    }
}

#[test]
fn test_oled_cancel_leaves_blank_panel() {
    let bus = RecordingBus::new(oled_data);
    let mut oled = open_oled(&bus);
    let signal = Signal::<NoopRawMutex, ()>::new();
    let pacer = CancelAfter {
        frames: 30,
        signal: &signal,
    };

    let mut engine = ScrollEngine::new(pacer, &signal);
    let result = block_on(engine.scroll(&mut oled, "Hello", &settings(1, None)));

    assert_eq!(result, SessionResult::Cancelled { clear_error: None });
    assert!(oled.buffer().is_blank());
    assert_eq!(bus.data_writes().len(), (1 + 30 + 1) * 8);
}

#[test]
fn test_clear_twice_matches_clear_once() {
    let bus = RecordingBus::new(oled_data);
    let mut oled = open_oled(&bus);
    let mut pacer = DelayPacer::new(NoopDelay);
    block_on(scroll(
        &mut oled,
        "Hello",
        &settings(4, Some(1)),
        &mut pacer,
        &NeverCancel,
    ));

    block_on(clear(&mut oled)).unwrap();
    let once = bus.data_writes();
    block_on(clear(&mut oled)).unwrap();
    let twice = bus.data_writes();

    assert!(oled.buffer().is_blank());
    assert_eq!(&twice[once.len() - 8..once.len()], &twice[twice.len() - 8..]);
}

fn decode_lcd_row(bytes: &[u8]) -> Vec<u8> {
    bytes
        .chunks(4)
        .map(|strobe| (strobe[1] & 0xF0) | (strobe[3] >> 4))
        .collect()
}

#[test]
fn test_lcd_window_scroll() {
    let bus = RecordingBus::new(lcd_data);
    let mut lcd = block_on(LcdSurface::open(
        bus.clone(),
        NoopDelay,
        Geometry::Character {
            columns: 16,
            rows: 2,
        },
        TransportAddress::LCD_DEFAULT,
        CellStyle::default(),
    ))
    .unwrap();
    let mut pacer = DelayPacer::new(NoopDelay);

    let result = block_on(scroll(
        &mut lcd,
        "Tokyo: 18°C cloudy",
        &ScrollSettings::LCD.with_loops(1),
        &mut pacer,
        &NeverCancel,
    ));
    assert_eq!(result, SessionResult::Completed { loops_run: 1 });
    assert!(lcd.screen().is_blank());

    // 18 chars, padding 4 on a 16-column window: offsets 4 down to -6
    let rows: Vec<Vec<u8>> = bus.data_writes().iter().map(|w| decode_lcd_row(w)).collect();
    assert_eq!(rows.len(), (1 + 11 + 1) * 2);

    let first_frame = &rows[2];
    assert_eq!(first_frame.as_slice(), b"    Tokyo: 18\xDFC ");
    let last_frame = &rows[2 + 10 * 2];
    assert_eq!(last_frame.as_slice(), b" 18\xDFC cloudy    ");

    // Second row stays blank throughout
    assert!(rows.iter().skip(1).step_by(2).all(|row| row == b"                "));
}

#[test]
fn test_lcd_short_text_is_centered() {
    let bus = RecordingBus::new(lcd_data);
    let mut lcd = block_on(LcdSurface::open(
        bus.clone(),
        NoopDelay,
        Geometry::Character {
            columns: 16,
            rows: 1,
        },
        TransportAddress::LCD_DEFAULT,
        CellStyle::default(),
    ))
    .unwrap();
    let mut pacer = DelayPacer::new(NoopDelay);

    let result = block_on(scroll(
        &mut lcd,
        "Hi",
        &ScrollSettings::LCD.with_loops(3),
        &mut pacer,
        &NeverCancel,
    ));
    assert_eq!(result, SessionResult::Completed { loops_run: 3 });

    let rows: Vec<Vec<u8>> = bus.data_writes().iter().map(|w| decode_lcd_row(w)).collect();
    // One frame per loop
    assert_eq!(rows.len(), 1 + 3 + 1);
    assert!(rows[1..4]
        .iter()
        .all(|row| row.as_slice() == b"       Hi       "));
}

#[test]
fn test_config_drives_session() {
    let config = parse_config(
        r#"
[display]
kind = "oled"
font = "6x10"
charset = "ascii"

[scroll]
speed = 4
frame_delay_ms = 0
loops = 2
y = 0

[message]
text = "Hi"
"#,
    )
    .unwrap();

    let bus = RecordingBus::new(oled_data);
    let mut oled = block_on(OledSurface::open(
        bus.clone(),
        config.display.controller,
        config.geometry(),
        config.transport_address().unwrap(),
        config.font_style().unwrap(),
    ))
    .unwrap();
    let mut pacer = DelayPacer::new(NoopDelay);

    let result = block_on(scroll(
        &mut oled,
        &config.message,
        &config.scroll_settings().unwrap(),
        &mut pacer,
        &NeverCancel,
    ));
    assert_eq!(result, SessionResult::Completed { loops_run: 2 });

    // 12px wide: 128 down to -12 in steps of 4 is 36 frames per loop
    assert_eq!(bus.data_writes().len(), (1 + 2 * 36 + 1) * 8);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_finite_sessions_complete(
        text in "[ -~]{1,24}",
        speed in 1u32..8,
        loops in 1u32..4,
    ) {
        let bus = RecordingBus::new(oled_data);
        let mut oled = open_oled(&bus);
        let mut pacer = DelayPacer::new(NoopDelay);

        let result = block_on(scroll(
            &mut oled,
            &text,
            &settings(speed, Some(loops)),
            &mut pacer,
            &NeverCancel,
        ));

        prop_assert_eq!(result, SessionResult::Completed { loops_run: loops });
        prop_assert!(oled.buffer().is_blank());

        let width = small_font().measure(&text);
        let frames_per_loop = (128 + width) / speed + 1;
        let expected = (1 + loops * frames_per_loop + 1) as usize * 8;
        prop_assert_eq!(bus.data_writes().len(), expected);
    }
}
