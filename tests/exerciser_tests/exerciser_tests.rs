//! Exerciser Tests
//!
//! Drives scripted sessions against an in-process device and checks the
//! transcript.

use std::io::Cursor;
use std::sync::Arc;

use bytedev::config::Config;
use bytedev::device::Device;
use bytedev::exerciser::{
    Exerciser, EXIT_MESSAGE, OPTION_PROMPT, READ_ERROR, READ_PROMPT, SEEK_ERROR, WRITE_ERROR,
};

// =============================================================================
// Helper Functions
// =============================================================================

/// Run `script` against a fresh device, returning the transcript and device
fn run_script(capacity: usize, script: &str) -> (String, Arc<Device>) {
    let config = Config::builder().capacity(capacity).build();
    let device = Arc::new(Device::initialize(&config).unwrap());
    let mut handle = device.open();

    let mut exerciser = Exerciser::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
    exerciser.run(&mut handle).unwrap();

    let transcript = String::from_utf8(exerciser.into_output()).unwrap();
    (transcript, device)
}

// =============================================================================
// Session Tests
// =============================================================================

#[test]
fn test_empty_input_exits() {
    let (transcript, _) = run_script(1024, "");
    assert_eq!(transcript, format!("{}\n{}\n", OPTION_PROMPT, EXIT_MESSAGE));
}

#[test]
fn test_write_seek_read_session() {
    let script = "w\nhello\ns\n0\n0\nr\n5\n";
    let (transcript, device) = run_script(1024, script);

    assert!(transcript.contains("hello\n"));
    assert!(transcript.ends_with(&format!("{}\n{}\n", OPTION_PROMPT, EXIT_MESSAGE)));
    assert_eq!(&device.snapshot()[..5], b"hello");
}

#[test]
fn test_hole_shown_as_spaces() {
    let script = "w\nabc\ns\n10\n0\nw\nxyz\ns\n0\n0\nr\n13\n";
    let (transcript, _) = run_script(1024, script);

    assert!(transcript.contains("abc       xyz\n"));
}

#[test]
fn test_read_past_end_reports_error() {
    let (transcript, _) = run_script(1024, "r\n1025\n");
    assert!(transcript.contains(READ_ERROR));
}

#[test]
fn test_write_past_end_reports_error() {
    let (transcript, device) = run_script(4, "w\ntoolong\n");

    assert!(transcript.contains(WRITE_ERROR));
    assert!(device.snapshot().iter().all(|&b| b == 0));
}

#[test]
fn test_seek_out_of_bounds_reports_error() {
    let (transcript, _) = run_script(1024, "s\n1\n2\n");
    assert!(transcript.contains(SEEK_ERROR));
}

#[test]
fn test_unknown_whence_reports_error() {
    let (transcript, _) = run_script(1024, "s\n0\n9\n");
    assert!(transcript.contains(SEEK_ERROR));
}

#[test]
fn test_seek_end_then_write_last_byte() {
    let (_, device) = run_script(1024, "s\n0\n2\nw\nZ\n");
    assert_eq!(device.snapshot()[1023], b'Z');
}

#[test]
fn test_reprompts_until_number() {
    let (transcript, _) = run_script(1024, "r\nabc\n\n3\n");

    assert_eq!(transcript.matches(READ_PROMPT).count(), 3);
    assert!(transcript.contains("   \n"));
}

#[test]
fn test_unknown_option_is_ignored() {
    let (transcript, _) = run_script(1024, "x\n\nq\n");
    assert_eq!(transcript.matches(OPTION_PROMPT).count(), 4);
    assert!(transcript.ends_with(&format!("{}\n", EXIT_MESSAGE)));
}

#[test]
fn test_eof_during_parameter_prompt_exits() {
    let (transcript, _) = run_script(1024, "s\n5\n");
    assert!(transcript.ends_with(&format!("{}\n", EXIT_MESSAGE)));
    assert!(!transcript.contains(SEEK_ERROR));
}

#[test]
fn test_crlf_line_endings_are_stripped() {
    let (_, device) = run_script(1024, "w\r\nhi\r\n");
    assert_eq!(&device.snapshot()[..3], &[b'h', b'i', 0]);
}
