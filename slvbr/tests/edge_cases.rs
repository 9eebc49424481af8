use slvbr::{
    header::SYNTHETIC_ID, Artifact, Line, SlvbrError, SlvbrFile, TagDef, TagKind, WriterOptions,
};

fn defs(letters: &[&str]) -> Vec<TagDef> {
    let mut t: Vec<TagDef> = letters
        .iter()
        .map(|c| TagDef::new(TagKind::Letter, c.as_bytes()).unwrap())
        .collect();
    t.push(TagDef::new(TagKind::Length, SYNTHETIC_ID).unwrap());
    t
}

fn opts() -> WriterOptions {
    WriterOptions {
        crop: 1,
        page_size: 3,
        ..WriterOptions::default()
    }
}

/// Lines in a deterministic pseudo-random but sorted order.
fn sorted_lines(n: usize) -> Vec<Line> {
    let mut rows: Vec<(Vec<u8>, String)> = (0..n)
        .map(|i| {
            let a = (i * 7 % 5) as u8;
            let b = (i * 3 % 4) as u8;
            let word = format!("{}{}", "a".repeat(a as usize), "b".repeat(b as usize));
            (vec![a, b, a + b], word)
        })
        .collect();
    rows.sort();
    rows.into_iter()
        .map(|(t, w)| Line::new(t, w.into_bytes()))
        .collect()
}

#[test]
fn toc_bounds_and_partitions_every_line() {
    let art = Artifact::build(defs(&["a", "b"]), sorted_lines(101), &opts()).unwrap();
    let f = SlvbrFile::from_bytes(art.to_bytes().unwrap()).unwrap();

    let mut next = 0usize;
    for e in f.toc_entries() {
        assert_eq!(e.start as usize, next, "entries are ordered and disjoint");
        for i in e.lines() {
            let tags = f.line_tags(i).unwrap();
            for (t, v) in tags.iter().enumerate() {
                assert!(*v >= e.min[t], "line {i} tag {t} below toc bound");
            }
        }
        next += e.count as usize;
    }
    assert_eq!(next, f.record_count());
    assert_eq!(f.count_toc(), (f.toc_count(), f.record_count()));
}

#[test]
fn compression_never_grows_the_toc() {
    let lines = sorted_lines(60);
    let pages = slvbr::toc::paginate(&lines, 3).unwrap().len();
    let art = Artifact::build(defs(&["a", "b"]), lines, &opts()).unwrap();
    assert!(art.toc().len() <= pages);
}

#[test]
fn dedup_pointers_always_slice_own_body() {
    let art = Artifact::build(defs(&["a", "b"]), sorted_lines(80), &opts()).unwrap();
    let f = SlvbrFile::from_bytes(art.to_bytes().unwrap()).unwrap();
    for (i, line) in art.lines().iter().enumerate() {
        assert_eq!(f.body(i).unwrap(), line.body.as_slice());
    }
    // many bodies repeat, so the bog is smaller than their sum
    let total: usize = art.lines().iter().map(|l| l.body.len()).sum();
    assert!(f.bog().len() < total);
    assert!(art.bog().stats().hits > 0);
}

#[test]
fn tag_over_255_fails() {
    match Line::from_values(0, &[300, 1, 1], b"x".to_vec()) {
        Err(SlvbrError::TagOverflow { value: 300, .. }) => {}
        other => panic!("expected overflow, got {other:?}"),
    }
}

#[test]
fn truncated_file_is_corrupt() {
    let art = Artifact::build(defs(&["a", "b"]), sorted_lines(10), &opts()).unwrap();
    let mut bytes = art.to_bytes().unwrap();
    bytes.pop();
    assert!(matches!(
        SlvbrFile::from_bytes(bytes),
        Err(SlvbrError::Corrupt(_))
    ));
}

#[test]
fn single_line_artifact() {
    let lines = vec![Line::new(vec![0, 0, 0], Vec::new())];
    let art = Artifact::build(defs(&["a", "b"]), lines, &opts()).unwrap();
    let f = SlvbrFile::from_bytes(art.to_bytes().unwrap()).unwrap();
    assert_eq!(f.record_count(), 1);
    assert_eq!(f.toc_count(), 1);
    assert_eq!(f.body(0).unwrap(), b"");
    assert_eq!(f.meta().bog_len, 0);
}
