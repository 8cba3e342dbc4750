use kira_gradients::io::labels::{LabelResolver, LookupTable};

#[test]
fn builtin_lut_resolves_codes_and_names() {
    let lut = LookupTable::builtin().unwrap();
    assert!(!lut.is_empty());
    assert_eq!(lut.name(17), Some("Left-Hippocampus"));
    assert_eq!(lut.code("left-hippocampus"), Some(17));

    let by_name = lut.resolve("Right-Putamen").unwrap();
    assert_eq!(by_name.code, 51);
    let by_code = lut.resolve("51").unwrap();
    assert_eq!(by_code, by_name);
}

#[test]
fn unknown_code_resolves_without_name() {
    let lut = LookupTable::builtin().unwrap();
    let region = lut.resolve("1234").unwrap();
    assert_eq!(region.code, 1234);
    assert_eq!(region.name, None);
    assert_eq!(region.display_name(), "1234");
    assert!(lut.resolve("Nowhere").is_err());
}

#[test]
fn custom_lut_parse() {
    let lut = LookupTable::parse("# comment\n5 Blob 1 2 3 0\n6\tOther\n", "custom").unwrap();
    assert_eq!(lut.len(), 2);
    assert_eq!(lut.code("blob"), Some(5));
    assert!(LookupTable::parse("x Blob\n", "custom").is_err());
}
