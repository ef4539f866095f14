//! Master store round-trip tests.

use survey_master::{
    Master, extract_master, load_master, master_to_questions, merge_masters, save_master,
};
use survey_model::{
    AnswerOption, ElementType, LocalizedText, MatrixColumn, MatrixColumnGroup, MatrixRow, Question,
};

fn lt(language: &str, text: &str) -> LocalizedText {
    LocalizedText::new(language, text)
}

fn base_question(code: &str, element_type: ElementType) -> Question {
    Question {
        id: 1,
        code: code.to_string(),
        element_type,
        texts: Vec::new(),
        hint_texts: Vec::new(),
        choices: Vec::new(),
        matrix_rows: Vec::new(),
        matrix_column_groups: Vec::new(),
        force_response: false,
        section_name: None,
        section_index: 0,
        conditions: None,
    }
}

fn sample_questions() -> Vec<Question> {
    let mut q1 = base_question("FQ1", ElementType::SingleChoice);
    q1.texts = vec![lt("en", "Pick one"), lt("de-ch", "Wählen Sie")];
    q1.section_name = Some("Basics".to_string());
    q1.section_index = 2;
    q1.choices = vec![
        AnswerOption {
            id: 10,
            code: "1".to_string(),
            texts: vec![lt("en", "Yes"), lt("de-ch", "Ja")],
            allow_text_entry: false,
            exclusive: false,
        },
        AnswerOption {
            id: 11,
            code: "2".to_string(),
            texts: vec![lt("en", "No"), lt("de-ch", "Nein")],
            allow_text_entry: false,
            exclusive: false,
        },
    ];

    let mut q2 = base_question("FQ2", ElementType::OpenQuestion);
    q2.texts = vec![lt("en", "Comments?")];

    let mut q3 = base_question("FM1", ElementType::Matrix);
    q3.texts = vec![lt("en", "Rate these")];
    q3.matrix_rows = vec![MatrixRow {
        id: 20,
        code: "r1".to_string(),
        texts: vec![lt("en", "Quality")],
    }];
    q3.matrix_column_groups = vec![
        MatrixColumnGroup {
            id: 1,
            choice_type: "Text".to_string(),
            columns: vec![MatrixColumn {
                id: 30,
                code: "1".to_string(),
                texts: vec![lt("en", "Bad")],
                choice_type: "Text".to_string(),
            }],
        },
        MatrixColumnGroup {
            id: 2,
            choice_type: "Text".to_string(),
            columns: vec![MatrixColumn {
                id: 31,
                code: "2".to_string(),
                texts: vec![lt("en", "Good")],
                choice_type: "Text".to_string(),
            }],
        },
    ];

    vec![q1, q2, q3]
}

#[test]
fn extract_keys_by_normalized_code() {
    let master = extract_master(&sample_questions());
    let codes: Vec<&str> = master.keys().map(String::as_str).collect();
    assert_eq!(codes, ["M1", "Q1", "Q2"]);
}

#[test]
fn extract_captures_choice_structure() {
    let master = extract_master(&sample_questions());
    let q1 = &master["Q1"];
    assert_eq!(q1.element_type, ElementType::SingleChoice);
    assert_eq!(q1.texts["en"], "Pick one");
    assert_eq!(q1.texts["de-ch"], "Wählen Sie");
    assert_eq!(q1.section_name.as_deref(), Some("Basics"));
    assert_eq!(q1.section_index, 2);
    assert_eq!(q1.choices.len(), 2);
    assert_eq!(q1.choices[0].code, "1");
    assert_eq!(q1.choices[0].texts["en"], "Yes");
    assert!(q1.matrix_rows.is_empty());
    assert!(q1.matrix_columns.is_empty());
}

#[test]
fn extract_flattens_matrix_columns_across_groups() {
    let master = extract_master(&sample_questions());
    let m1 = &master["M1"];
    assert!(m1.choices.is_empty());
    assert_eq!(m1.matrix_rows.len(), 1);
    let column_codes: Vec<&str> = m1.matrix_columns.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(column_codes, ["1", "2"]);
}

#[test]
fn save_load_round_trip_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("master").join("master.yaml");

    let master = extract_master(&sample_questions());
    save_master(&master, &path).unwrap();
    let loaded = load_master(&path).unwrap();

    assert_eq!(loaded, master);
}

#[test]
fn hand_edits_survive_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("master.yaml");

    let master = extract_master(&sample_questions());
    save_master(&master, &path).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let edited = contents.replace("Pick one", "Pick exactly one");
    assert_ne!(contents, edited, "fixture text missing from saved file");
    std::fs::write(&path, edited).unwrap();

    let reloaded = load_master(&path).unwrap();
    assert_eq!(reloaded["Q1"].texts["en"], "Pick exactly one");

    // Only that one value differs from the original extract.
    let mut expected = master;
    expected
        .get_mut("Q1")
        .unwrap()
        .texts
        .insert("en".to_string(), "Pick exactly one".to_string());
    assert_eq!(reloaded, expected);
}

#[test]
fn empty_file_loads_as_empty_master() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("master.yaml");
    std::fs::write(&path, "").unwrap();
    assert!(load_master(&path).unwrap().is_empty());
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_master(&dir.path().join("missing.yaml")).is_err());
}

#[test]
fn merge_prefers_newest_and_backfills_from_older() {
    let mut old_q = base_question("Q1", ElementType::OpenQuestion);
    old_q.texts = vec![lt("en", "Old wording")];
    let mut old_only = base_question("Q2", ElementType::OpenQuestion);
    old_only.texts = vec![lt("en", "Still around")];
    let oldest = extract_master(&[old_q, old_only]);

    let mut new_q = base_question("Q1", ElementType::OpenQuestion);
    new_q.texts = vec![lt("en", "New wording")];
    let newest = extract_master(&[new_q]);

    let merged = merge_masters(vec![oldest, newest]);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged["Q1"].texts["en"], "New wording");
    assert_eq!(merged["Q2"].texts["en"], "Still around");
}

#[test]
fn reconstructed_questions_extract_to_the_same_master() {
    let master = extract_master(&sample_questions());
    let questions = master_to_questions(&master);
    assert_eq!(extract_master(&questions), master);
}

#[test]
fn reconstruction_defaults_omitted_fields() {
    let master: Master = extract_master(&sample_questions());
    let questions = master_to_questions(&master);

    let q2 = questions.iter().find(|q| q.code == "Q2").unwrap();
    assert_eq!(q2.id, 0);
    assert_eq!(q2.section_name, None);
    assert_eq!(q2.section_index, 0);
    assert!(q2.choices.is_empty());

    let m1 = questions.iter().find(|q| q.code == "M1").unwrap();
    assert_eq!(m1.matrix_column_groups.len(), 1);
    assert_eq!(m1.matrix_column_groups[0].columns.len(), 2);
}
