use hdfc_statement::cli::convert_command;
use hdfc_statement::config::ConverterConfig;
use hdfc_statement::export::{ExportFormat, StatementExporter};
use hdfc_statement::processing::{PipelineOutcome, StatementProcessor};
use hdfc_statement::table_cleaner::HeaderStrategy;
use hdfc_statement::{Cell, StatementError};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Text placed at an absolute position, in points
type Placement = (i64, i64, &'static str);

const HEADER: [Placement; 7] = [
    (30, 700, "Date"),
    (80, 700, "Narration"),
    (240, 700, "Chq./Ref.No."),
    (320, 700, "Value Dt"),
    (380, 700, "Withdrawal Amt."),
    (470, 700, "Deposit Amt."),
    (545, 700, "Closing Balance"),
];

fn first_page() -> Vec<Placement> {
    let mut page = vec![(30, 760, "Statement of account")];
    page.extend(HEADER);
    page.extend([
        (30, 688, "01/04/24"),
        (80, 688, "Salary Credit"),
        (240, 688, "REF1"),
        (320, 688, "01/04/24"),
        (489, 688, "5,000.00"),
        (574, 688, "10,000.00"),
        (80, 676, "ABC Corp"),
        (30, 664, "02/04/24"),
        (80, 664, "ATM WDL"),
        (240, 664, "ATM123"),
        (320, 664, "02/04/24"),
        (423, 664, "500.00"),
        (579, 664, "9,500.00"),
        (30, 600, "Page 1 of 2"),
    ]);
    page
}

fn second_page() -> Vec<Placement> {
    let mut page: Vec<Placement> = HEADER.to_vec();
    page.extend([
        (30, 688, "05/04/24"),
        (80, 688, "UPI Grocery"),
        (240, 688, "UPI777"),
        (320, 688, "05/04/24"),
        (423, 688, "1,250.50"),
        (579, 688, "8,249.50"),
        (30, 600, "Page 2 of 2"),
    ]);
    page
}

/// Build a PDF with one page per entry, Courier 8pt text
fn build_pdf(pages: &[Vec<Placement>]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for placements in pages {
        let mut operations = Vec::new();
        for (x, y, text) in placements {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), Object::Integer(8)]));
            operations.push(Operation::new("Td", vec![Object::Integer(*x), Object::Integer(*y)]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::from(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 700.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn write_pdf(path: &Path, pages: &[Vec<Placement>]) {
    build_pdf(pages).save(path).unwrap();
}

const PASSWORD_PADDING: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

fn padded(password: &str) -> Vec<u8> {
    let mut bytes: Vec<u8> = password.bytes().take(32).collect();
    bytes.extend_from_slice(&PASSWORD_PADDING[..32 - bytes.len()]);
    bytes
}

fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut state: Vec<u8> = (0..=255).collect();
    let mut j: u8 = 0;
    for i in 0..256 {
        j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
        state.swap(i, j as usize);
    }

    let (mut i, mut j) = (0u8, 0u8);
    data.iter()
        .map(|byte| {
            i = i.wrapping_add(1);
            j = j.wrapping_add(state[i as usize]);
            state.swap(i as usize, j as usize);
            byte ^ state[state[i as usize].wrapping_add(state[j as usize]) as usize]
        })
        .collect()
}

/// Write the statement encrypted with the 40-bit RC4 standard security
/// handler (V1, R2), the way older bank portals protect statements
fn write_encrypted_pdf(path: &Path, pages: &[Vec<Placement>], user: &str, owner: &str) {
    let mut doc = build_pdf(pages);
    let file_id = b"hdfc-fixture-001".to_vec();
    let permissions: i32 = -44;

    let owner_key = md5::compute(padded(owner)).0[..5].to_vec();
    let owner_entry = rc4(&owner_key, &padded(user));

    let mut seed = padded(user);
    seed.extend_from_slice(&owner_entry);
    seed.extend_from_slice(&permissions.to_le_bytes());
    seed.extend_from_slice(&file_id);
    let key = md5::compute(&seed).0[..5].to_vec();
    let user_entry = rc4(&key, &PASSWORD_PADDING);

    for (&(number, generation), object) in doc.objects.iter_mut() {
        if let Object::Stream(stream) = object {
            let mut object_seed = key.clone();
            object_seed.extend_from_slice(&number.to_le_bytes()[..3]);
            object_seed.extend_from_slice(&generation.to_le_bytes());
            let object_key = md5::compute(&object_seed).0[..10].to_vec();
            let encrypted = rc4(&object_key, &stream.content);
            stream.set_content(encrypted);
        }
    }

    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "Length" => 40,
        "O" => Object::String(owner_entry, StringFormat::Hexadecimal),
        "U" => Object::String(user_entry, StringFormat::Hexadecimal),
        "P" => permissions as i64,
    });
    doc.trailer.set("Encrypt", encrypt_id);
    doc.trailer.set(
        "ID",
        vec![
            Object::String(file_id.clone(), StringFormat::Hexadecimal),
            Object::String(file_id, StringFormat::Hexadecimal),
        ],
    );
    doc.save(path).unwrap();
}

fn completed_rows(outcome: PipelineOutcome) -> usize {
    match outcome {
        PipelineOutcome::Completed(statement) => statement.table.len(),
        PipelineOutcome::NoDataFound => panic!("expected a table"),
    }
}

#[test]
fn test_end_to_end_statement() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("statement.pdf");
    write_pdf(&input, &[first_page(), second_page()]);

    let outcome = StatementProcessor::default().process_file(&input, None).unwrap();
    let statement = match outcome {
        PipelineOutcome::Completed(statement) => statement,
        PipelineOutcome::NoDataFound => panic!("expected a table"),
    };

    assert_eq!(statement.header, HeaderStrategy::Statement { header_rows_removed: 2 });
    let table = &statement.table;
    assert_eq!(
        table.columns,
        vec![
            "Date",
            "Narration",
            "Chq./Ref.No.",
            "Value Date",
            "Withdrawal Amount",
            "Deposit Amount",
            "Closing Balance",
        ]
    );
    assert_eq!(table.len(), 3);

    assert_eq!(table.get(0, "Date").map(Cell::display).as_deref(), Some("01/04/2024"));
    assert_eq!(
        table.get(0, "Narration"),
        Some(&Cell::Text("Salary Credit ABC Corp".to_string()))
    );
    assert_eq!(table.get(0, "Withdrawal Amount"), Some(&Cell::Number(0.0)));
    assert_eq!(table.get(0, "Deposit Amount"), Some(&Cell::Number(5000.0)));
    assert_eq!(table.get(0, "Closing Balance"), Some(&Cell::Number(10000.0)));

    assert_eq!(table.get(1, "Withdrawal Amount"), Some(&Cell::Number(500.0)));
    assert_eq!(table.get(2, "Narration"), Some(&Cell::Text("UPI Grocery".to_string())));
    assert_eq!(table.get(2, "Withdrawal Amount"), Some(&Cell::Number(1250.5)));
    assert_eq!(table.get(2, "Value Date").map(Cell::display).as_deref(), Some("05/04/2024"));

    let output = temp_dir.path().join("cleaned.csv");
    let stats = StatementExporter::new(ExportFormat::Csv)
        .export(table, &output)
        .unwrap();
    assert_eq!(stats.row_count, 3);

    let csv = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Date,Narration,Chq./Ref.No.,Value Date,Withdrawal Amount,Deposit Amount,Closing Balance"
    );
    assert_eq!(
        lines[1],
        "01/04/2024,Salary Credit ABC Corp,REF1,01/04/2024,0.0,5000.0,10000.0"
    );
}

#[test]
fn test_convert_command_writes_xlsx() {
    let temp_dir = tempdir().unwrap();
    let mut config = ConverterConfig::default();
    config.input.path = temp_dir.path().join("statement.pdf");
    config.output.path = temp_dir.path().join("hdfc_cleaned_data.xlsx");
    write_pdf(&config.input.path, &[first_page()]);

    let stats = convert_command(&config).unwrap().expect("export expected");
    assert_eq!(stats.format, ExportFormat::Xlsx);
    assert_eq!(stats.row_count, 2);
    assert_eq!(stats.column_count, 7);
    assert!(config.output.path.exists());
}

#[test]
fn test_convert_command_json_from_extension() {
    let temp_dir = tempdir().unwrap();
    let mut config = ConverterConfig::default();
    config.input.path = temp_dir.path().join("statement.pdf");
    config.output.path = temp_dir.path().join("cleaned.json");
    write_pdf(&config.input.path, &[first_page()]);

    convert_command(&config).unwrap().expect("export expected");

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config.output.path).unwrap()).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert_eq!(value[1]["Narration"], "ATM WDL");
    assert_eq!(value[1]["Withdrawal Amount"], 500.0);
}

#[test]
fn test_prose_only_pdf_has_no_data() {
    let temp_dir = tempdir().unwrap();
    let mut config = ConverterConfig::default();
    config.input.path = temp_dir.path().join("letter.pdf");
    config.output.path = temp_dir.path().join("out.xlsx");
    write_pdf(
        &config.input.path,
        &[vec![
            (30, 760, "Dear customer,"),
            (30, 748, "Your statement is attached separately."),
        ]],
    );

    let outcome = StatementProcessor::default()
        .process_file(&config.input.path, None)
        .unwrap();
    assert!(outcome.is_no_data());

    assert!(convert_command(&config).unwrap().is_none());
    assert!(!config.output.path.exists());
}

#[test]
fn test_missing_statement() {
    let temp_dir = tempdir().unwrap();
    let mut config = ConverterConfig::default();
    config.input.path = temp_dir.path().join("statement.pdf");
    config.output.path = temp_dir.path().join("out.xlsx");

    let err = convert_command(&config).unwrap_err();
    assert!(err.is_not_found());
    assert!(err.user_message().ends_with("was not found. Please check the name."));
    assert!(!config.output.path.exists());
}

#[test]
fn test_owner_restricted_statement_opens_without_password() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("statement.pdf");
    write_encrypted_pdf(&input, &[first_page()], "", "bank-owner");

    let outcome = StatementProcessor::default().process_file(&input, None).unwrap();
    assert_eq!(completed_rows(outcome), 2);
}

#[test]
fn test_user_password_statement() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("statement.pdf");
    write_encrypted_pdf(&input, &[first_page()], "secret", "bank-owner");
    let processor = StatementProcessor::default();

    let outcome = processor.process_file(&input, Some("secret")).unwrap();
    assert_eq!(completed_rows(outcome), 2);

    let err = processor.process_file(&input, None).unwrap_err();
    assert!(matches!(
        err,
        StatementError::DocumentAccess { ref message, .. } if message.contains("no password was given")
    ));

    let err = processor.process_file(&input, Some("guess")).unwrap_err();
    assert!(matches!(
        err,
        StatementError::DocumentAccess { ref message, .. } if message.starts_with("wrong password")
    ));
    assert!(err.user_message().starts_with("An unexpected error occurred: Cannot open PDF document"));
}
