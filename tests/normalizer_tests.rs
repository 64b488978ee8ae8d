use proptest::prelude::*;
use rattestati::ingest::normalizer::{normalize_category, normalize_time};
use rattestati::ingest::{EmailRules, Normalizer, validate_row};
use rattestati::models::{Field, TrainingPath};

mod common;
use common::record;

#[test]
fn time_shapes_become_hh_mm() {
    assert_eq!(normalize_time("9:00"), "09:00");
    assert_eq!(normalize_time("09:00:00"), "09:00");
    assert_eq!(normalize_time("14:30:45"), "14:30");
    assert_eq!(normalize_time("9.30"), "09:30");
    assert_eq!(normalize_time("930"), "09:30");
    assert_eq!(normalize_time("1130"), "11:30");
    assert_eq!(normalize_time(" 10:15 "), "10:15");
}

#[test]
fn out_of_range_and_unknown_times_pass_through() {
    assert_eq!(normalize_time("25:99"), "25:99");
    assert_eq!(normalize_time("mattina"), "mattina");
    assert_eq!(normalize_time("9h30"), "9h30");
}

#[test]
fn optional_fields_turn_blank_and_sentinel_into_empty() {
    let n = Normalizer::default();
    assert_eq!(n.normalize(Some("--"), Field::Room), Some(String::new()));
    assert_eq!(n.normalize(Some("   "), Field::Department), Some(String::new()));
    assert_eq!(n.normalize(None, Field::Address), Some(String::new()));
    assert_eq!(
        n.normalize(Some("A-22"), Field::CompetitionClass),
        Some("A-22".to_string())
    );
}

#[test]
fn essential_blanks_are_kept_for_the_validator() {
    let n = Normalizer::default();
    assert_eq!(n.normalize(None, Field::FullName), None);
    assert_eq!(n.normalize(Some("--"), Field::Email), Some("--".to_string()));
    assert_eq!(n.normalize(Some(""), Field::StartTime), Some(String::new()));
}

#[test]
fn institutional_email_wins_over_other_addresses() {
    let rules = EmailRules::default();
    let raw = "personale: mario@gmail.com, istituzionale: mar.rossi@stud.uniroma3.it";
    assert_eq!(rules.extract(raw), Some("mar.rossi@stud.uniroma3.it"));
}

#[test]
fn institutional_address_inside_a_name_cell_passes_validation() {
    let n = Normalizer::default();
    let email = n
        .normalize(
            Some("EMMANUEL LOSIO (Emm Losio emm.losio@stud.uniroma3.it)"),
            Field::Email,
        )
        .unwrap();
    assert_eq!(email, "emm.losio@stud.uniroma3.it");

    let r = record("Emmanuel Losio", &email);
    assert!(validate_row(&r, n.email_rules()).is_ok());
}

#[test]
fn institutional_rule_never_takes_the_tail_of_a_longer_address() {
    let rules = EmailRules::default();
    assert_eq!(
        rules.extract("mario.ab.cd@stud.uniroma3.it"),
        Some("mario.ab.cd@stud.uniroma3.it")
    );
    assert_eq!(
        rules.extract("Mario Rossi <m.ab.cd@stud.uniroma3.it>"),
        Some("m.ab.cd@stud.uniroma3.it")
    );
    assert_eq!(
        rules.extract("x-ab.cd@stud.uniroma3.it"),
        Some("x-ab.cd@stud.uniroma3.it")
    );
    assert_eq!(
        rules.extract("(ab.cd@stud.uniroma3.it)"),
        Some("ab.cd@stud.uniroma3.it")
    );
}

#[test]
fn general_email_is_extracted_from_noise() {
    let n = Normalizer::default();
    assert_eq!(
        n.normalize(Some("EMMANUEL LOSIO emmanuel.losio@libero.it"), Field::Email),
        Some("emmanuel.losio@libero.it".to_string())
    );
    assert_eq!(
        n.normalize(Some("nessuna email"), Field::Email),
        Some("nessuna email".to_string())
    );
}

#[test]
fn configured_domains_replace_the_default() {
    let rules = EmailRules::new(&["studenti.example.edu".to_string()]);
    assert_eq!(
        rules.extract("x@gmail.com ab.verdi@studenti.example.edu"),
        Some("ab.verdi@studenti.example.edu")
    );
}

#[test]
fn category_aliases_map_to_labels() {
    assert_eq!(normalize_category("PeF30 CFU"), "PeF30 CFU all.2");
    assert_eq!(normalize_category("pef30 all. 2"), "PeF30 CFU all.2");
    assert_eq!(normalize_category("PeF30 CFU all.2 (art. 13)"), "PeF30 CFU (art. 13)");
    assert_eq!(normalize_category("PEF60"), "PeF60 CFU");
    assert_eq!(normalize_category("Corso libero"), "Corso libero");
}

#[test]
fn article_13_spellings_are_the_same_path() {
    assert_eq!(
        TrainingPath::parse("PeF30 CFU (art. 13)"),
        Some(TrainingPath::PeF30Articolo13)
    );
    assert_eq!(
        TrainingPath::parse("PeF30 CFU all.2 art. 13"),
        TrainingPath::parse("PeF30 CFU (art. 13)")
    );
}

#[test]
fn abbreviations_glued_to_the_unit_are_expanded() {
    assert_eq!(
        TrainingPath::parse("PeF30 CFUall.2"),
        Some(TrainingPath::PeF30Allegato2)
    );
    assert_eq!(
        TrainingPath::parse("PeF30 CFUart.13"),
        Some(TrainingPath::PeF30Articolo13)
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn valid_times_normalize_to_themselves(h in 0u32..24, m in 0u32..60) {
        let canonical = format!("{h:02}:{m:02}");
        prop_assert_eq!(normalize_time(&canonical), canonical.clone());
        prop_assert_eq!(normalize_time(&format!("{h}.{m:02}")), canonical.clone());
        prop_assert_eq!(normalize_time(&format!("{h}{m:02}")), canonical.clone());
        prop_assert_eq!(normalize_time(&format!("{h}:{m:02}:30")), canonical);
    }

    #[test]
    fn time_normalization_is_idempotent(raw in "[0-9:. ]{0,8}") {
        let once = normalize_time(&raw);
        prop_assert_eq!(normalize_time(&once), once);
    }

    #[test]
    fn optional_fields_never_come_back_absent(raw in proptest::option::of(".{0,12}")) {
        let n = Normalizer::default();
        prop_assert!(n.normalize(raw.as_deref(), Field::Room).is_some());
    }
}
