use std::io::{Cursor, Seek, SeekFrom, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use matstream::{
    make_stream, read_exact_bytes, read_into, ByteStream, Error, SeekableZlibStream,
    StreamKind, StreamSource,
};

const VALUE: &[u8] = b"a\x00string";

/// One stream of every kind, each holding `VALUE`.
fn streams() -> Vec<Box<dyn ByteStream>> {
    let mut file = tempfile::tempfile().expect("tempfile");
    file.write_all(VALUE).expect("write");
    file.seek(SeekFrom::Start(0)).expect("rewind");

    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(VALUE).expect("compress");
    let compressed = enc.finish().expect("finish");
    let len = compressed.len() as u64;
    let zlib = SeekableZlibStream::new(Cursor::new(compressed), len).expect("zlib stream");

    vec![
        make_stream(file),
        make_stream(VALUE.to_vec()),
        make_stream(StreamSource::generic(Cursor::new(VALUE.to_vec()))),
        Box::new(zlib),
    ]
}

#[test]
fn make_stream_picks_wrapper() {
    let kinds: Vec<StreamKind> = streams().iter().map(|s| s.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            StreamKind::File,
            StreamKind::Memory,
            StreamKind::Generic,
            StreamKind::Zlib
        ]
    );
}

#[test]
fn tell_seek() {
    for mut st in streams() {
        let kind = st.kind();
        assert_eq!(st.seek_whence(0, 0).unwrap(), 0, "{kind:?}");
        assert_eq!(st.tell().unwrap(), 0, "{kind:?}");
        st.seek_whence(5, 0).unwrap();
        assert_eq!(st.tell().unwrap(), 5, "{kind:?}");
        st.seek_whence(2, 1).unwrap();
        assert_eq!(st.tell().unwrap(), 7, "{kind:?}");
        st.seek_whence(-2, 2).unwrap();
        assert_eq!(st.tell().unwrap(), 6, "{kind:?}");
    }
}

#[test]
fn read() {
    for mut st in streams() {
        let kind = st.kind();
        st.seek_whence(0, 0).unwrap();
        assert_eq!(st.read_remaining().unwrap(), VALUE, "{kind:?}");
        st.seek_whence(0, 0).unwrap();
        assert_eq!(st.read_up_to(4).unwrap(), b"a\x00st", "{kind:?}");

        st.seek_whence(0, 0).unwrap();
        let mut buf = [0u8; 4];
        read_into(st.as_mut(), &mut buf, 4).unwrap();
        assert_eq!(&buf, b"a\x00st", "{kind:?}");
        read_into(st.as_mut(), &mut buf, 4).unwrap();
        assert_eq!(&buf, b"ring", "{kind:?}");
        let err = read_into(st.as_mut(), &mut buf, 2).unwrap_err();
        assert!(matches!(err, Error::ShortRead { expected: 2, actual: 0 }), "{kind:?}");
        assert!(err.is_io());

        st.seek_whence(0, 0).unwrap();
        assert_eq!(read_exact_bytes(st.as_mut(), 4).unwrap(), b"a\x00st", "{kind:?}");
        assert_eq!(read_exact_bytes(st.as_mut(), 4).unwrap(), b"ring", "{kind:?}");
        let err = read_exact_bytes(st.as_mut(), 2).unwrap_err();
        assert!(matches!(err, Error::ShortRead { .. }), "{kind:?}");
    }
}

#[test]
fn read_into_rejects_small_buffer() {
    for mut st in streams() {
        let mut buf = [0u8; 3];
        let err = read_into(st.as_mut(), &mut buf, 4).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferTooSmall {
                requested: 4,
                capacity: 3
            }
        ));
        assert!(err.is_io());
        // Nothing was consumed.
        assert_eq!(st.tell().unwrap(), 0);
    }
}

#[test]
fn bad_seeks() {
    for mut st in streams() {
        let kind = st.kind();
        assert!(
            matches!(st.seek_whence(1, 123), Err(Error::InvalidWhence(123))),
            "{kind:?}"
        );
        assert!(
            matches!(st.seek_whence(-1, 0), Err(Error::InvalidSeek(_))),
            "{kind:?}"
        );
        st.seek_whence(3, 0).unwrap();
        assert!(
            matches!(st.seek_whence(-4, 1), Err(Error::InvalidSeek(_))),
            "{kind:?}"
        );
        assert_eq!(st.tell().unwrap(), 3, "{kind:?}");
    }
}

#[test]
fn read_past_end_is_empty() {
    for mut st in streams() {
        st.seek_whence(100, 0).unwrap();
        assert!(st.read_up_to(4).unwrap().is_empty());
        assert!(st.read_remaining().unwrap().is_empty());
    }
}

#[test]
fn file_stream_keeps_position() {
    let mut file = tempfile::tempfile().expect("tempfile");
    file.write_all(VALUE).expect("write");
    file.seek(SeekFrom::Start(2)).expect("seek");
    let mut st = make_stream(file);
    assert_eq!(st.tell().unwrap(), 2);
    assert_eq!(st.read_remaining().unwrap(), b"string");
}
