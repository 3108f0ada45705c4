use spell_core::wordlist::{normalize, positive_rate, read_words};
use spell_core::{plan, BloomFilter, Encoding, ErrorKind, Plan};
use tempfile::tempdir;

#[test]
fn plan_build_save_reload_query() {
    let dict = "The\nquick\nbrown\nFox\njumps\nover\nthe\nlazy\ndog\n";
    let words: Vec<String> = read_words(dict.as_bytes())
        .unwrap()
        .iter()
        .map(|w| normalize(w))
        .collect();

    let sizing = plan(words.len() as u64, 0.01).unwrap();
    let mut bf = BloomFilter::from_plan(&sizing).unwrap();
    assert_eq!(bf.n(), 9);
    for w in &words {
        bf.add(w);
    }

    let tmp = tempdir().unwrap();
    for (name, enc) in [("v1.bf", Encoding::Unpacked), ("v2.bf", Encoding::Packed)] {
        let path = tmp.path().join(name);
        bf.save_with(&path, enc).unwrap();
        let served = BloomFilter::load(&path).unwrap();
        assert_eq!(served.m(), bf.m());
        assert_eq!(served.k(), bf.k());
        assert_eq!(served.bits(), bf.bits());
        assert_eq!(served.n(), 0);
        assert_eq!(positive_rate(&served, &words), 1.0);
    }
}

#[test]
fn reference_sizing() {
    assert_eq!(plan(1000, 0.01).unwrap(), Plan { m: 9586, k: 7, n: 1000 });
    assert_eq!(plan(0, 0.01).unwrap_err().kind(), ErrorKind::InvalidParameter);
    assert_eq!(plan(10, 0.0).unwrap_err().kind(), ErrorKind::InvalidParameter);
}

#[test]
fn missing_file_is_io_error() {
    let tmp = tempdir().unwrap();
    let err = BloomFilter::load(tmp.path().join("absent.bf")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn truncated_file_is_rejected() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("t.bf");
    let mut bf = BloomFilter::new(2, 1000, 0).unwrap();
    bf.add("hello");
    let bytes = bf.to_bytes(Encoding::Unpacked);
    std::fs::write(&path, &bytes[..12 + 1000 - 1]).unwrap();
    let err = BloomFilter::load(&path).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Io | ErrorKind::Format));
}
