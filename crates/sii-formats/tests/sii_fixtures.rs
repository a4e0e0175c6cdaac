//! Integration tests for SII parsing against realistic game-style documents.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sii_formats::{
    DiskFileSystem, Error, MemoryFileSystem, ParseOptions, SiiFile, Value,
};

mod test_data {
    pub const ECONOMY: &str = "SiiNunit\n\
         {\n\
         economy : game.economy {\n\
         \tbank: game.bank\n\
         \tplayer: game.player\n\
         \ttotal_distance: 1847\n\
         \texperience_points: 4250\n\
         \tvisited_cities: 3\n\
         \tvisited_cities[0]: city.bern\n\
         \tvisited_cities[1]: city.zurich\n\
         \tvisited_cities[2]: city.geneva\n\
         \tvisited_cities_count[]: 2\n\
         \tvisited_cities_count[]: 7\n\
         \tvisited_cities_count[]: 1\n\
         }\n\
         \n\
         bank : game.bank {\n\
         \tmoney_account: 245800.5\n\
         \tcoinsurance_fixed: true\n\
         \tloans[]: game.bank.loan0\n\
         }\n\
         }\n";

    pub const COMMENTED: &str = "SiiNunit {\n\
         # economy snapshot\n\
         economy : game.eco { // trailing\n\
         \tbank: game.bank /* block\n\
         spanning lines */ \tplayer: game.player\n\
         \tcity: \"Sankt # Gallen\"\n\
         }\n\
         }\n";
}

#[test]
fn test_economy_document() {
    let sii = SiiFile::parse(test_data::ECONOMY).unwrap();
    assert_eq!(sii.units.len(), 2);

    let economy = &sii.units[0];
    assert_eq!(economy.class_name, "economy");
    assert_eq!(economy.instance_name, "game.economy");
    assert_eq!(economy.attributes.get("total_distance"), Some(&Value::Number(1847.0)));

    // Declared length then explicit indices fill an array.
    let Some(Value::Array(cities)) = economy.attributes.get("visited_cities") else {
        panic!("visited_cities should resolve to an array");
    };
    assert_eq!(cities.len(), 3);
    assert_eq!(cities[1], Some(Value::from("city.zurich")));

    // Bare brackets accumulate a list.
    let Some(Value::List(counts)) = economy.attributes.get("visited_cities_count") else {
        panic!("visited_cities_count should resolve to a list");
    };
    assert_eq!(counts, &[Value::Number(2.0), Value::Number(7.0), Value::Number(1.0)]);

    let bank = &sii.units[1];
    assert_eq!(bank.attributes.get("money_account"), Some(&Value::Number(245_800.5)));
    assert_eq!(bank.attributes.get("coinsurance_fixed"), Some(&Value::Bool(true)));
}

#[test]
fn test_comments_do_not_reach_the_parser() {
    let sii = SiiFile::parse(test_data::COMMENTED).unwrap();
    let unit = &sii.units[0];
    assert_eq!(unit.attributes.len(), 3);
    assert_eq!(unit.attributes.get("player"), Some(&Value::from("game.player")));
    // A hash inside quotes is content, not a comment.
    assert_eq!(unit.attributes.get("city"), Some(&Value::from("Sankt # Gallen")));
}

#[test]
fn test_includes_expand_through_memory_fs() {
    let mut fs = MemoryFileSystem::new();
    fs.insert(
        "def/city.sui",
        "city_data : city.bern {\n\tcity_name: \"Bern\"\n\tpopulation: 133000\n}\n",
    );
    let sii = SiiFile::parse_with(
        "SiiNunit {\n@include \"city.sui\"\n}\n",
        "def",
        &fs,
        ParseOptions::default(),
    )
    .unwrap();

    assert_eq!(sii.includes, vec!["def/city.sui".to_string()]);
    assert_eq!(sii.units.len(), 1);
    assert_eq!(sii.units[0].attributes.get("population"), Some(&Value::Number(133_000.0)));
}

#[test]
fn test_missing_include_policy() {
    let fs = MemoryFileSystem::new();
    let text = "SiiNunit {\n@include \"ghost.sui\"\n}\n";

    let err = SiiFile::parse_with(text, "def", &fs, ParseOptions::default()).unwrap_err();
    assert!(matches!(err, Error::IncludeNotFound { .. }));

    let options = ParseOptions {
        ignore_missing_includes: true,
        ..ParseOptions::default()
    };
    let sii = SiiFile::parse_with(text, "def", &fs, options).unwrap();
    assert!(sii.units.is_empty());
    assert_eq!(sii.includes, vec!["def/ghost.sui".to_string()]);
}

#[test]
fn test_open_resolves_includes_next_to_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path();
    std::fs::write(
        base.join("game.sii"),
        "SiiNunit {\n@include \"bank.sui\"\n}\n",
    )
    .unwrap();
    std::fs::write(
        base.join("bank.sui"),
        "bank : game.bank {\n\tmoney_account: 1000\n}\n",
    )
    .unwrap();

    let path = base.join("game.sii");
    let sii = SiiFile::open(
        path.to_str().unwrap(),
        &DiskFileSystem,
        ParseOptions::default(),
    )
    .unwrap();

    assert_eq!(sii.units.len(), 1);
    assert_eq!(sii.units[0].instance_name, "game.bank");
}

#[test]
fn test_encoded_file_decodes_transparently() {
    let plain = "SiiNunit {\nbank : game.bank {\n\tmoney_account: 50\n}\n}\n";
    let encoded = sii_crypto::encode(plain.as_bytes(), 0x2c);

    let sii = SiiFile::from_bytes(&encoded, "", &MemoryFileSystem::new(), ParseOptions::default())
        .unwrap();
    assert_eq!(sii.units[0].attributes.get("money_account"), Some(&Value::Number(50.0)));
}

#[test]
fn test_serialize_reparses_to_the_same_units() {
    let sii = SiiFile::parse(test_data::ECONOMY).unwrap();
    let reparsed = SiiFile::parse(&sii.serialize("\t")).unwrap();

    assert_eq!(reparsed.units.len(), sii.units.len());
    for (a, b) in reparsed.units.iter().zip(&sii.units) {
        assert_eq!(a.class_name, b.class_name);
        assert_eq!(a.instance_name, b.instance_name);
        // Lists serialize with explicit indices and come back as arrays,
        // so compare element sequences rather than value kinds.
        for (key, value) in b.attributes.iter() {
            let reparsed_value = a.attributes.get(key).unwrap();
            match (value, reparsed_value) {
                (Value::List(items), Value::Array(slots)) => {
                    let slots: Vec<_> = slots.iter().map(|s| s.clone().unwrap()).collect();
                    assert_eq!(&slots, items);
                }
                (original, round_tripped) => assert_eq!(round_tripped, original),
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_comment_stripping_preserves_line_count(text in "[ -~\n]{0,200}") {
        let stripped = sii_formats::preprocess::strip_comments(&text);
        prop_assert_eq!(
            stripped.chars().filter(|&c| c == '\n').count(),
            text.chars().filter(|&c| c == '\n').count()
        );
    }
}
