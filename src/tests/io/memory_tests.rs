//! Tests for in-memory stream handles.

use std::io::{Read, Write};

use crate::{InMemorySource, InputProvider, OutputTarget, PipeBuffer};

#[test]
fn in_memory_source_reads_data() {
    let src = InMemorySource::from_string("id", "hello");

    let mut reader = src.open().expect("open in-memory source");
    let mut buf = String::new();
    reader.read_to_string(&mut buf).unwrap();

    assert_eq!(buf, "hello");
    assert_eq!(src.id(), "id");
}

#[test]
fn pipe_reads_back_what_was_written() {
    let pipe = PipeBuffer::new("execPipe");
    assert!(pipe.is_empty());

    {
        let mut w = OutputTarget::open(&pipe).unwrap();
        w.write_all(b"abc").unwrap();
    }
    {
        let mut w = OutputTarget::open(&pipe).unwrap();
        w.write_all(b"def").unwrap();
    }
    assert_eq!(pipe.contents(), b"abcdef".to_vec());
    assert_eq!(pipe.contents_string(), "abcdef");

    let mut buf = String::new();
    InputProvider::open(&pipe)
        .unwrap()
        .read_to_string(&mut buf)
        .unwrap();
    assert_eq!(buf, "abcdef");
}

#[test]
fn pipe_clones_share_the_buffer() {
    let pipe = PipeBuffer::default();
    let other = pipe.clone();
    assert!(pipe.same_pipe(&other));
    assert!(!pipe.same_pipe(&PipeBuffer::default()));

    OutputTarget::open(&other)
        .unwrap()
        .write_all(b"shared")
        .unwrap();
    assert_eq!(pipe.contents_string(), "shared");
}
