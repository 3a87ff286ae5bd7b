use molprop_extractor::domain::Database;
use molprop_extractor::xref::extract_ids;

fn synonyms(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn single_match_is_kept() {
    let ids = extract_ids(&synonyms(&["aspirin", "CHEMBL25", "50-78-2"]));
    assert_eq!(ids.len(), 1);
    assert_eq!(ids.get(&Database::Chembl).map(String::as_str), Some("CHEMBL25"));
}

#[test]
fn missing_database_is_absent() {
    let ids = extract_ids(&synonyms(&["aspirin", "acetylsalicylic acid"]));
    assert!(ids.is_empty());
    assert!(extract_ids(&[]).is_empty());
}

#[test]
fn databases_are_independent() {
    let ids = extract_ids(&synonyms(&[
        "ethanol",
        "CHEBI:16236",
        "ZINC000008214622",
        "BDBM50146223",
        "CHEMBL545",
    ]));
    assert_eq!(
        ids.into_iter().collect::<Vec<_>>(),
        vec![
            (Database::Chebi, "CHEBI:16236".to_string()),
            (Database::Chembl, "CHEMBL545".to_string()),
            (Database::Zinc, "ZINC000008214622".to_string()),
            (Database::Bdbm, "BDBM50146223".to_string()),
        ]
    );
}

#[test]
fn ids_embedded_in_longer_synonyms_are_found() {
    let ids = extract_ids(&synonyms(&["ethanol (CHEBI:16236)", "ChEMBL545"]));
    assert_eq!(ids.get(&Database::Chebi).map(String::as_str), Some("CHEBI:16236"));
    assert!(!ids.contains_key(&Database::Chembl));
}
