//! Response Buffer Tests

use std::io::{BufReader, Cursor};

use imagewire::protocol::{read_until_eof, read_until_eof_async, ResponseBuffer};

#[test]
fn test_buffer_doubles_when_full() {
    let mut buffer = ResponseBuffer::with_capacity(4);
    for i in 0..4 {
        buffer.push(i);
    }
    assert_eq!(buffer.capacity(), 4);

    buffer.push(4);
    assert_eq!(buffer.capacity(), 8);

    for i in 5..9 {
        buffer.push(i);
    }
    assert_eq!(buffer.capacity(), 16);
    assert_eq!(buffer.as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_buffer_zero_capacity_still_grows() {
    let mut buffer = ResponseBuffer::with_capacity(0);
    assert!(buffer.is_empty());
    for _ in 0..10 {
        buffer.push(0xAB);
    }
    assert_eq!(buffer.len(), 10);
    assert!(buffer.capacity() >= 10);
}

#[test]
fn test_freeze_keeps_only_written_bytes() {
    let mut buffer = ResponseBuffer::with_capacity(64);
    buffer.push(1);
    buffer.push(2);
    let bytes = buffer.freeze();
    assert_eq!(bytes.as_ref(), &[1, 2]);
}

#[test]
fn test_read_until_eof_beyond_initial_capacity() {
    let data: Vec<u8> = (0..10_000).map(|i| (i % 256) as u8).collect();
    let mut reader = BufReader::new(Cursor::new(data.clone()));

    let read = read_until_eof(&mut reader, 8).unwrap();
    assert_eq!(read.as_ref(), data.as_slice());
}

#[test]
fn test_read_until_eof_empty_stream() {
    let mut reader = BufReader::new(Cursor::new(Vec::new()));
    assert!(read_until_eof(&mut reader, 1024).unwrap().is_empty());
}

#[tokio::test]
async fn test_read_until_eof_async_beyond_initial_capacity() {
    let data: Vec<u8> = (0..5_000).map(|i| (i * 7 % 256) as u8).collect();
    let mut reader = tokio::io::BufReader::new(Cursor::new(data.clone()));

    let read = read_until_eof_async(&mut reader, 3).await.unwrap();
    assert_eq!(read.as_ref(), data.as_slice());
}
