use std::fs;
use std::io::Cursor;

use assert_matches::assert_matches;

use molprop_extractor::error::MolpropError;
use molprop_extractor::prompt::{ask_input_path, ask_properties};

fn transcript(output: Vec<u8>) -> String {
    String::from_utf8(output).unwrap()
}

#[test]
fn input_path_retries_until_file_exists() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("molecules.smi");
    fs::write(&path, "CCO ethanol\n").unwrap();

    let answers = format!("/no/such/molecules.smi\n{}\n", path.display());
    let mut output = Vec::new();
    let chosen = ask_input_path(&mut Cursor::new(answers), &mut output, false)
        .unwrap()
        .unwrap();

    assert_eq!(chosen.as_std_path(), path.as_path());
    let output = transcript(output);
    assert_eq!(output.matches("***NO SUCH FILE***").count(), 1);
    assert!(output.contains("type 'q' to quit"));
}

#[test]
fn input_path_quit_and_closed_input() {
    let mut output = Vec::new();
    let chosen = ask_input_path(&mut Cursor::new("missing.smi\nq\n"), &mut output, false).unwrap();
    assert_eq!(chosen, None);

    let chosen = ask_input_path(&mut Cursor::new(""), &mut Vec::new(), false).unwrap();
    assert_eq!(chosen, None);
}

#[test]
fn properties_rejects_out_of_range_then_accepts() {
    let mut output = Vec::new();
    let selection = ask_properties(
        &mut Cursor::new("0\n37\n24, 36\n"),
        &mut output,
        false,
    )
    .unwrap();

    assert_eq!(selection.names(), vec!["molecular_formula", "xlogp"]);
    let output = transcript(output);
    assert!(output.contains("\t1\tatom_stereo_count\n"));
    assert!(output.contains("\t36\txlogp\n"));
    assert_eq!(output.matches("***INVALID INPUT***").count(), 2);
}

#[test]
fn properties_accepts_all_shorthand() {
    let selection = ask_properties(&mut Cursor::new("A\n"), &mut Vec::new(), false).unwrap();
    assert_eq!(selection.len(), 36);
}

#[test]
fn properties_fail_when_input_closes() {
    let err = ask_properties(&mut Cursor::new("seven\n"), &mut Vec::new(), false).unwrap_err();
    assert_matches!(err, MolpropError::PromptClosed);
}
