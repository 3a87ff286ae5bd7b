use molprop_extractor::app::resolve_item;
use molprop_extractor::catalog::PropertySelection;
use molprop_extractor::pubchem::{CompoundClient, PubchemHttpClient, PubchemSettings};

#[test]
#[ignore]
fn resolve_real_atorvastatin() {
    let client = PubchemHttpClient::new(&PubchemSettings::default()).unwrap();
    let smiles = "CC(C)C1=C(C(=C(N1CCC(CC(CC(=O)O)O)O)C2=CC=C(C=C2)F)C3=CC=CC=C3)C(=O)NC4=CC=CC=C4";
    let record = client.lookup(smiles).unwrap();
    assert!(
        record
            .synonyms()
            .iter()
            .any(|name| name.to_ascii_lowercase().contains("atorvastatin"))
    );

    let selection = PropertySelection::parse("molecular_formula,inchikey").unwrap();
    let report = resolve_item(Ok(record), &selection).unwrap();
    assert!(report.cid > 0);
    assert_eq!(
        report.properties,
        vec![
            ("molecular_formula", "C33H35FN2O5".to_string()),
            ("inchikey", "XUKUURHRXDUEBC-UHFFFAOYSA-N".to_string()),
        ]
    );
}
