use slvbr::{
    header::{FILL_BYTE, HEADER_LEN, SYNTHETIC_ID},
    write_file, Line, SlvbrFile, TagDef, TagKind, WriterOptions,
};

fn mk_temp(name: &str) -> std::path::PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("{}-{}", std::process::id(), name));
    p
}

fn tags() -> Vec<TagDef> {
    let mut t: Vec<TagDef> = ["к", "о", "т"]
        .iter()
        .map(|c| TagDef::new(TagKind::Letter, c.as_bytes()).unwrap())
        .collect();
    t.push(TagDef::new(TagKind::Length, SYNTHETIC_ID).unwrap());
    t.push(TagDef::new(TagKind::Morph, SYNTHETIC_ID).unwrap());
    t.push(TagDef::new(TagKind::Flag, SYNTHETIC_ID).unwrap());
    t.push(TagDef::new(TagKind::Flag, SYNTHETIC_ID).unwrap());
    t
}

fn words() -> Vec<(&'static str, [u8; 7])> {
    vec![
        ("кот", [1, 1, 1, 3, b'N', 2, 2]),
        ("ток", [1, 1, 1, 3, b'N', 2, 2]),
        ("кто", [1, 1, 1, 3, b'Z', 2, 2]),
        ("кок", [2, 1, 0, 3, b'N', 2, 2]),
        ("ток", [1, 1, 1, 3, b'V', 2, 1]),
    ]
}

fn lines() -> Vec<Line> {
    words()
        .into_iter()
        .map(|(w, t)| Line::new(t.to_vec(), w.as_bytes().to_vec()))
        .collect()
}

#[test]
fn writer_reader_roundtrip() {
    let path = mk_temp("roundtrip.slvbr");
    let art = write_file(&path, tags(), lines(), &WriterOptions::default()).expect("write");

    let f = SlvbrFile::open(&path).expect("open");
    assert_eq!(f.meta(), art.meta());
    assert_eq!(f.meta().title_str(), "slovobor");
    assert_eq!(f.meta().encoding_str(), "utf-8");
    assert_eq!(f.meta().record_len, 7 + 8);
    assert_eq!(f.meta().toc_entry_len, 7 + 8);
    assert_eq!(f.tags(), tags().as_slice());
    assert_eq!(f.tags()[0].id_bytes(), "к".as_bytes());

    for (i, (w, t)) in words().into_iter().enumerate() {
        assert_eq!(f.line_tags(i).unwrap(), &t);
        assert_eq!(f.body(i).unwrap(), w.as_bytes());
    }
    assert!(f.line_tags(words().len()).is_none());

    // the second "ток" reuses the first one's bytes
    assert_eq!(f.line_ptr(1), f.line_ptr(4));
    assert!(f.bog().len() <= 4 * "кот".len());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn header_region_is_filled_with_sentinel() {
    let path = mk_temp("fill.slvbr");
    write_file(&path, tags(), lines(), &WriterOptions::default()).expect("write");
    let data = std::fs::read(&path).unwrap();
    let dict_end = slvbr::header::header_needed(7);
    assert!(data[dict_end..HEADER_LEN].iter().all(|&b| b == FILL_BYTE));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn identical_inputs_give_identical_bytes() {
    let a = slvbr::Artifact::build(tags(), lines(), &WriterOptions::default())
        .unwrap()
        .to_bytes()
        .unwrap();
    let b = slvbr::Artifact::build(tags(), lines(), &WriterOptions::default())
        .unwrap()
        .to_bytes()
        .unwrap();
    assert_eq!(a, b);
}
