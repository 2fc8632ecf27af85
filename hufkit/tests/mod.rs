//! Test suite for hufkit.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use hufkit::bit::{BitReader, BitWriter};
use hufkit::tree::HuffmanTree;
use hufkit::{FormatError, FrequencyTable, Symbol, codec};

const TEXTS: &[&str] = &[
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
     eiusmod tempor incididunt ut labore et dolore magna aliqua. Aenean \
     sed adipiscing diam donec adipiscing tristique risus nec. Bibendum \
     neque egestas congue quisque. Purus faucibus ornare suspendisse sed \
     nisi. Suspendisse potenti nullam ac tortor vitae purus faucibus \
     ornare suspendisse. Ultricies leo integer malesuada nunc vel. \
     Pellentesque elit eget gravida cum sociis. Adipiscing vitae proin \
     sagittis nisl rhoncus. Lobortis feugiat vivamus at augue eget arcu \
     dictum varius duis. Orci sagittis eu volutpat odio. Ac orci \
     phasellus egestas tellus rutrum tellus pellentesque. Convallis \
     convallis tellus id interdum velit laoreet id donec. Tempor nec \
     feugiat nisl pretium fusce id velit.",
    "Proin fermentum leo vel orci porta. Diam maecenas sed enim ut sem \
     viverra aliquet. Nulla aliquet porttitor lacus luctus accumsan. \
     Placerat duis ultricies lacus sed turpis tincidunt. Arcu risus quis \
     varius quam quisque. Bibendum ut tristique et egestas quis ipsum \
     suspendisse. Senectus et netus et malesuada. Ultricies integer quis \
     auctor elit sed vulputate mi sit. Feugiat scelerisque varius morbi \
     enim nunc faucibus a pellentesque. Integer enim neque volutpat ac \
     tincidunt. Nibh tortor id aliquet lectus proin. Sit amet mattis \
     vulputate enim nulla. Amet nisl purus in mollis nunc. In metus \
     vulputate eu scelerisque felis imperdiet proin fermentum.",
    "Egestas sed sed risus pretium quam. Sed risus ultricies tristique \
     nulla aliquet enim. Vitae turpis massa sed elementum tempus \
     egestas. Scelerisque mauris pellentesque pulvinar pellentesque \
     habitant morbi. Adipiscing elit ut aliquam purus sit amet. Mauris a \
     diam maecenas sed enim ut sem. Habitant morbi tristique senectus et \
     netus et malesuada fames ac.",
    "Purus viverra accumsan in nisl nisi scelerisque eu. Lacinia quis \
     vel eros donec ac. Vitae tortor condimentum lacinia quis vel. \
     Scelerisque eu ultrices vitae auctor eu augue ut.",
];

fn round_trip(data: &[u8]) {
    let compressed = hufkit::compress(data).unwrap();
    let decompressed = hufkit::decompress(&compressed).unwrap();

    assert_eq!(decompressed, data);
}

fn tmp_path(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("hufkit");
    fs::create_dir_all(&dir).unwrap();

    dir.join(name)
}

#[test]
fn texts() {
    for text in TEXTS {
        round_trip(text.as_bytes());
    }
}

#[test]
fn texts_compress() {
    for text in TEXTS {
        let compressed = hufkit::compress(text.as_bytes()).unwrap();
        assert!(compressed.len() < text.len());
    }
}

#[test]
fn empty() {
    let compressed = hufkit::compress(b"").unwrap();

    assert!(!compressed.is_empty());
    assert!(hufkit::decompress(&compressed).unwrap().is_empty());
}

#[test]
fn single_byte() {
    round_trip(b"a");
    round_trip(&[0xFF]);
    round_trip(&[0; 1000]);
}

#[test]
fn all_byte_values() {
    let data: Vec<u8> = (0..=u8::MAX).cycle().take(4096).collect();
    round_trip(&data);

    let mut data: Vec<u8> = (0..=u8::MAX).collect();
    data.reverse();
    round_trip(&data);
}

#[test]
fn escape_byte_heavy() {
    let data: Vec<u8> = (0..2000_u32)
        .map(|i| if i % 3 == 0 { 0xFF } else { (i % 5) as u8 })
        .collect();

    round_trip(&data);
}

#[test]
fn every_prefix_of_text() {
    let text = TEXTS[3].as_bytes();

    for end in 0..=text.len() {
        round_trip(&text[..end]);
    }
}

#[test]
fn aaab_codes() {
    let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"aaab")).unwrap();
    let codes = tree.codes();

    assert_eq!(codes.get(Symbol::Literal(b'a')).unwrap().len(), 1);
    assert_eq!(codes.get(Symbol::Literal(b'b')).unwrap().len(), 2);
    assert_eq!(codes.get(Symbol::EndOfStream).unwrap().len(), 2);
}

#[test]
fn building_blocks() {
    let data = TEXTS[0].as_bytes();
    let table = FrequencyTable::tally(data).unwrap();
    let tree = HuffmanTree::build(&table).unwrap();

    let mut compressed = vec![];
    let mut writer = BitWriter::new(&mut compressed);
    tree.write(&mut writer).unwrap();
    codec::encode(data.iter().copied(), &tree.codes(), &mut writer).unwrap();
    writer.finish().unwrap();

    assert_eq!(compressed, hufkit::compress(data).unwrap());

    let mut reader = BitReader::new(&compressed[..]);
    let read = HuffmanTree::read(&mut reader).unwrap();
    assert_eq!(read, tree);

    let decoded = codec::symbols(&mut reader, &read)
        .collect::<hufkit::Result<Vec<_>>>()
        .unwrap();
    assert_eq!(decoded, data);
}

#[test]
fn zeros_are_rejected() {
    for len in [0, 1, 4, 33, 1000] {
        let err = hufkit::decompress(&vec![0; len]).unwrap_err();
        assert!(err.as_format().is_some(), "{len} zero bytes: {err}");
    }
}

#[test]
fn ones_are_rejected() {
    // A single leaf holding the escape unit and the end-of-stream bit.
    let err = hufkit::decompress(&[0xFF; 64]).unwrap_err();
    assert_eq!(err.as_format(), Some(FormatError::DegenerateTree));
}

#[test]
fn truncation_is_detected() {
    let compressed = hufkit::compress(TEXTS[1].as_bytes()).unwrap();

    for end in 0..compressed.len() {
        let err = hufkit::decompress(&compressed[..end]).unwrap_err();
        assert_eq!(err.as_format(), Some(FormatError::UnexpectedEof));
    }
}

#[test]
fn files() {
    let input = tmp_path("lorem.txt");
    let compressed = tmp_path("lorem.txt.huf");
    let decompressed = tmp_path("lorem.txt.huf.fuh");

    let text = TEXTS.concat();
    fs::write(&input, &text).unwrap();

    let summary = hufkit::compress_stream(
        BufReader::new(File::open(&input).unwrap()),
        BufWriter::new(File::create(&compressed).unwrap()),
    )
    .unwrap();

    assert_eq!(summary.input_bytes, text.len() as u64);
    assert_eq!(summary.output_bytes, fs::metadata(&compressed).unwrap().len());

    let summary = hufkit::decompress_stream(
        BufReader::new(File::open(&compressed).unwrap()),
        BufWriter::new(File::create(&decompressed).unwrap()),
    )
    .unwrap();

    assert_eq!(summary.output_bytes, text.len() as u64);
    assert_eq!(fs::read_to_string(&decompressed).unwrap(), text);
}
