use super::*;

#[test]
fn test_classify_prefixes() {
    assert_eq!(classify("LP12345-6"), LoincType::Part);
    assert_eq!(classify("LG9999-0"), LoincType::Group);
    assert_eq!(classify("LL715-4"), LoincType::List);
    assert_eq!(classify("LA6113-0"), LoincType::Answers);
    assert_eq!(classify("718-7"), LoincType::Loinc);
    assert_eq!(classify("4544-3"), LoincType::Loinc);
}

#[test]
fn test_classify_trims_whitespace() {
    assert_eq!(classify("  LP12345-6  "), LoincType::Part);
    assert_eq!(classify(" 718-7\n"), LoincType::Loinc);
}

#[test]
fn test_classify_is_total() {
    // Every string maps to exactly one family, including odd inputs.
    assert_eq!(classify(""), LoincType::Loinc);
    assert_eq!(classify("L"), LoincType::Loinc);
    assert_eq!(classify("LX0000"), LoincType::Loinc);
    assert_eq!(classify("lp123"), LoincType::Loinc); // prefixes are case-sensitive
}

#[test]
fn test_matches_empty_code_passes_any_filter() {
    assert!(LoincType::Part.matches(""));
    assert!(LoincType::Loinc.matches("   "));
    assert!(LoincType::Answers.matches(""));
}

#[test]
fn test_matches_filter_none_passes_everything() {
    assert!(matches_filter("LP12345-6", None));
    assert!(matches_filter("718-7", None));
    assert!(matches_filter("", None));
}

#[test]
fn test_matches_filter_selects_family() {
    let codes = ["718-7", "LP12345-6", "LG9999-0"];

    let survivors: Vec<&str> = codes
        .iter()
        .copied()
        .filter(|code| matches_filter(code, Some(LoincType::Part)))
        .collect();
    assert_eq!(survivors, vec!["LP12345-6"]);

    let regular: Vec<&str> = codes
        .iter()
        .copied()
        .filter(|code| matches_filter(code, Some(LoincType::Loinc)))
        .collect();
    assert_eq!(regular, vec!["718-7"]);
}

#[test]
fn test_from_str_round_trip() {
    for loinc_type in [
        LoincType::Loinc,
        LoincType::Part,
        LoincType::Group,
        LoincType::List,
        LoincType::Answers,
    ] {
        let parsed: LoincType = loinc_type.to_string().parse().unwrap();
        assert_eq!(parsed, loinc_type);
    }

    assert!("part".parse::<LoincType>().is_err());
}
