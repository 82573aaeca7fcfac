use crate::error::{AppError, AppResult};
use crate::models::RawTransaction;
use tracing::{debug, trace};

pub const DELIMITER: u8 = b';';

/// Columns every export must carry. `Opération pointée` and
/// `Sous-catégorie` default to empty strings when absent.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "Date opération",
    "Libellé opération",
    "Catégorie",
    "Montant",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode a semicolon-separated bank export into raw records keyed by the
/// header's column names.
///
/// Rows whose field count differs from the header are rejected rather than
/// padded, so a truncated export never silently loses columns.
pub fn parse_upload(content: &[u8], file_name: &str) -> AppResult<Vec<RawTransaction>> {
    trace!(file_name, content_size = content.len(), "Starting CSV parsing");

    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    let text = std::str::from_utf8(content)
        .map_err(|e| AppError::Parse(format!("{}: file is not valid UTF-8 ({})", file_name, e)))?;

    let non_blank_lines = text.lines().filter(|l| !l.trim().is_empty()).count();
    if non_blank_lines < 2 {
        return Err(AppError::Parse(format!(
            "{}: expected a header line and at least one transaction",
            file_name
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::Parse(format!("{}: {}", file_name, e)))?
        .clone();

    debug!(file_name, column_count = headers.len(), "CSV headers parsed");

    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|name| !headers.iter().any(|h| h == **name))
    {
        return Err(AppError::Parse(format!(
            "{}: missing column '{}'",
            file_name, missing
        )));
    }

    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| csv_error(file_name, &e))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let mut raw: RawTransaction = record
            .deserialize(Some(&headers))
            .map_err(|e| AppError::Parse(format!("{}: line {}: {}", file_name, line, e)))?;
        raw.line = line;
        rows.push(raw);
    }

    debug!(file_name, row_count = rows.len(), "CSV parsing completed");

    Ok(rows)
}

fn csv_error(file_name: &str, e: &csv::Error) -> AppError {
    match e.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => AppError::Parse(format!(
            "{}: line {}: expected {} fields, found {}",
            file_name,
            pos.as_ref().map(|p| p.line()).unwrap_or_default(),
            expected_len,
            len
        )),
        _ => AppError::Parse(format!("{}: {}", file_name, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Date opération;Libellé opération;Catégorie;Sous-catégorie;Montant;Opération pointée";

    fn export(rows: &[&str]) -> String {
        let mut content = String::from(HEADER);
        content.push_str("\r\n");
        for row in rows {
            content.push_str(row);
            content.push_str("\r\n");
        }
        content
    }

    #[test]
    fn test_parse_simple_export() {
        let csv = export(&[
            "03/01/2025;CB CARREFOUR;Alimentation;Supermarché;-45,20;1",
            "05/01/2025;VIR SALAIRE;Revenus;Salaires;2100,00;0",
        ]);

        let rows = parse_upload(csv.as_bytes(), "export.csv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].operation_date, "03/01/2025");
        assert_eq!(rows[0].label, "CB CARREFOUR");
        assert_eq!(rows[0].subcategory, "Supermarché");
        assert_eq!(rows[0].amount, "-45,20");
        assert_eq!(rows[0].reconciled, "1");
        assert_eq!(rows[1].category, "Revenus");
    }

    #[test]
    fn test_line_numbers_count_header() {
        let csv = export(&[
            "03/01/2025;A;Alimentation;;-1,00;0",
            "04/01/2025;B;Alimentation;;-2,00;0",
        ]);
        let rows = parse_upload(csv.as_bytes(), "export.csv").unwrap();
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn test_trailing_blank_line_dropped() {
        let csv = format!("{}\r\n03/01/2025;A;Alimentation;;-1,00;0\r\n\r\n", HEADER);
        let rows = parse_upload(csv.as_bytes(), "export.csv").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_last_row_kept_without_final_newline() {
        let csv = format!("{}\r\n03/01/2025;A;Alimentation;;-1,00;0", HEADER);
        let rows = parse_upload(csv.as_bytes(), "export.csv").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_unix_line_endings() {
        let csv = format!("{}\n03/01/2025;A;Alimentation;;-1,00;0\n", HEADER);
        let rows = parse_upload(csv.as_bytes(), "export.csv").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_empty_payload_rejected() {
        assert!(matches!(
            parse_upload(b"", "empty.csv"),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn test_header_only_rejected() {
        let csv = format!("{}\r\n", HEADER);
        assert!(matches!(
            parse_upload(csv.as_bytes(), "export.csv"),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let csv = export(&[
            "03/01/2025;A;Alimentation;;-1,00;0",
            "04/01/2025;B;Alimentation;-2,00",
        ]);
        match parse_upload(csv.as_bytes(), "export.csv") {
            Err(AppError::Parse(msg)) => {
                assert!(msg.contains("line 3"), "unexpected message: {}", msg);
                assert!(msg.contains("expected 6 fields"), "unexpected message: {}", msg);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Date opération;Libellé opération;Catégorie\r\n03/01/2025;A;Alimentation\r\n";
        match parse_upload(csv.as_bytes(), "export.csv") {
            Err(AppError::Parse(msg)) => assert!(msg.contains("Montant")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_optional_columns_default_empty() {
        let csv = "Date opération;Libellé opération;Catégorie;Montant\r\n03/01/2025;A;Alimentation;-1,00\r\n";
        let rows = parse_upload(csv.as_bytes(), "export.csv").unwrap();
        assert_eq!(rows[0].subcategory, "");
        assert_eq!(rows[0].reconciled, "");
    }

    #[test]
    fn test_extra_columns_ignored() {
        let csv = "Date de comptabilisation;Date opération;Libellé opération;Catégorie;Montant;Solde\r\n\
                   04/01/2025;03/01/2025;A;Alimentation;-1,00;120,00\r\n";
        let rows = parse_upload(csv.as_bytes(), "export.csv").unwrap();
        assert_eq!(rows[0].operation_date, "03/01/2025");
        assert_eq!(rows[0].amount, "-1,00");
    }

    #[test]
    fn test_quoted_fields() {
        let csv = export(&["\"03/01/2025\";\"PRLV SEPA; EDF\";\"Logement / maison\";\"Energie\";\"-80,00\";\"0\""]);
        let rows = parse_upload(csv.as_bytes(), "export.csv").unwrap();
        assert_eq!(rows[0].label, "PRLV SEPA; EDF");
        assert_eq!(rows[0].category, "Logement / maison");
    }

    #[test]
    fn test_bom_stripped() {
        let mut csv = UTF8_BOM.to_vec();
        csv.extend_from_slice(export(&["03/01/2025;A;Alimentation;;-1,00;0"]).as_bytes());
        let rows = parse_upload(&csv, "export.csv").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let csv: &[u8] = &[0xFF, 0xFE, b';', b'a'];
        assert!(matches!(
            parse_upload(csv, "export.csv"),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn test_whitespace_trimmed() {
        let csv = export(&[" 03/01/2025 ; CB CARREFOUR ;Alimentation; ; -45,20 ;0"]);
        let rows = parse_upload(csv.as_bytes(), "export.csv").unwrap();
        assert_eq!(rows[0].operation_date, "03/01/2025");
        assert_eq!(rows[0].label, "CB CARREFOUR");
        assert_eq!(rows[0].amount, "-45,20");
    }
}
