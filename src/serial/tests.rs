// src/serial/tests.rs

use super::*;
use anyhow::anyhow;
use std::fs::File;
use std::io::{self, Read};

/// What the mock line saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LinkEvent {
    Write(Vec<u8>),
    Drain,
    SetBaud(Baud),
}

#[derive(Debug, Default)]
struct MockLink {
    events: Vec<LinkEvent>,
    fail_set_baud_to: Option<Baud>,
    fail_writes_longer_than: Option<usize>,
}

impl MockLink {
    fn written(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                LinkEvent::Write(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    fn speeds(&self) -> Vec<Baud> {
        self.events
            .iter()
            .filter_map(|e| match e {
                LinkEvent::SetBaud(baud) => Some(*baud),
                _ => None,
            })
            .collect()
    }
}

impl Write for MockLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes_longer_than.is_some_and(|max| buf.len() > max) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "line dropped"));
        }
        self.events.push(LinkEvent::Write(buf.to_vec()));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SerialLink for MockLink {
    fn drain(&mut self) -> Result<()> {
        self.events.push(LinkEvent::Drain);
        Ok(())
    }

    fn set_baud(&mut self, baud: Baud) -> Result<()> {
        if self.fail_set_baud_to == Some(baud) {
            return Err(anyhow!("termios refused {}", baud));
        }
        self.events.push(LinkEvent::SetBaud(baud));
        Ok(())
    }
}

fn session(link: MockLink) -> MinitelSession<MockLink> {
    MinitelSession::new(link, Duration::ZERO)
}

// --- Baud ---

#[test_log::test]
fn test_baud_round_trips_through_u32() {
    for baud in [Baud::B300, Baud::B1200, Baud::B4800, Baud::B9600] {
        assert_eq!(Baud::try_from(u32::from(baud)), Ok(baud));
    }
    assert_eq!(Baud::try_from(2400u32), Err(UnsupportedBaud(2400)));
}

#[test_log::test]
fn test_baud_serde_uses_numbers() {
    assert_eq!(serde_json::to_string(&Baud::B4800).unwrap(), "4800");
    assert_eq!(serde_json::from_str::<Baud>("300").unwrap(), Baud::B300);
    assert!(serde_json::from_str::<Baud>("\"B300\"").is_err());
}

// --- Session ---

#[test_log::test]
fn test_initialize_drains_after_each_command() {
    let mut session = session(MockLink::default());
    session.initialize().unwrap();
    assert_eq!(
        session.link().events,
        vec![
            LinkEvent::Write(vec![0x0C]),
            LinkEvent::Drain,
            LinkEvent::Write(vec![0x0E]),
            LinkEvent::Drain,
        ]
    );
}

#[test_log::test]
fn test_negotiate_requests_then_switches_locally() {
    let mut session = session(MockLink::default());
    session.negotiate_speed(Baud::B4800).unwrap();
    assert_eq!(
        session.link().events,
        vec![
            LinkEvent::Write(vec![0x1B, 0x3A, 0x6B, 0x76]),
            LinkEvent::Drain,
            LinkEvent::SetBaud(Baud::B4800),
        ]
    );
}

#[test_log::test]
fn test_display_frames_image_and_restores_speed() {
    let mut session = session(MockLink::default());
    let image = [0x1B, 0x47, 0x1B, 0x50, 0x7F];
    session.display(&image, Baud::B4800, Baud::B1200).unwrap();

    let link = session.into_inner();
    let mut expected = vec![0x0C, 0x0E, 0x1B, 0x3A, 0x6B, 0x76];
    expected.extend_from_slice(&image);
    expected.extend_from_slice(&[0x1B, 0x3A, 0x6B, 0x64]);
    assert_eq!(link.written(), expected);
    assert_eq!(link.speeds(), vec![Baud::B4800, Baud::B1200]);

    // The image goes out in a single write followed by a drain.
    let pos = link
        .events
        .iter()
        .position(|e| *e == LinkEvent::Write(image.to_vec()))
        .unwrap();
    assert_eq!(link.events[pos + 1], LinkEvent::Drain);
}

#[test_log::test]
fn test_display_restores_speed_after_failed_transfer() {
    let link = MockLink {
        fail_writes_longer_than: Some(4),
        ..MockLink::default()
    };
    let mut session = session(link);
    let err = session
        .display(&[0x7F; 16], Baud::B4800, Baud::B1200)
        .unwrap_err();

    assert!(format!("{:#}", err).contains("image stream"));
    assert_eq!(session.link().speeds(), vec![Baud::B4800, Baud::B1200]);
}

#[test_log::test]
fn test_display_reports_restore_failure() {
    let link = MockLink {
        fail_set_baud_to: Some(Baud::B1200),
        ..MockLink::default()
    };
    let mut session = session(link);
    let err = session.display(&[0x7F], Baud::B4800, Baud::B1200).unwrap_err();
    assert!(format!("{:#}", err).contains("1200 baud"));
}

// --- File Sink ---

#[test_log::test]
fn test_file_sink_keeps_bytes_and_ignores_speed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stream.vdt");

    let mut session = MinitelSession::new(FileSink::create(&path).unwrap(), Duration::ZERO);
    session.initialize().unwrap();
    session.negotiate_speed(Baud::B9600).unwrap();
    session.transmit(&[0x20, 0x7F]).unwrap();
    drop(session);

    let mut contents = Vec::new();
    File::open(&path)
        .unwrap()
        .read_to_end(&mut contents)
        .unwrap();
    assert_eq!(contents, vec![0x0C, 0x0E, 0x1B, 0x3A, 0x6B, 0x7F, 0x20, 0x7F]);
}
