//! 响应编码模块
//!
//! Downloads are rendered as a CSV attachment; everything else is JSON
//! produced directly by the handlers.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use sharing_client::DataFrame;

use common::errors::{AppError, AppResult};

/// MIME type of the download body.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Serializes a frame as CSV: a header row, then one line per row.
///
/// Null cells become empty fields. Quoting is left to the `csv` writer.
pub fn encode_csv(frame: &DataFrame) -> AppResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if !frame.columns().is_empty() {
        writer.write_record(frame.columns()).map_err(csv_error)?;
        for row in frame.rows() {
            writer
                .write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))
                .map_err(csv_error)?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to encode CSV: {}", e)))
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::Internal(format!("Failed to encode CSV: {}", e))
}

/// A CSV body served as a file download named `<table>.csv`.
pub struct CsvAttachment {
    filename: String,
    body: Vec<u8>,
}

impl CsvAttachment {
    pub fn new(table: &str, body: Vec<u8>) -> Self {
        Self {
            filename: format!("{}.csv", table),
            body,
        }
    }

    /// Plain token filenames are sent as-is; anything else becomes a quoted
    /// string so `;` or `"` in a table name cannot add header parameters.
    fn content_disposition(&self) -> HeaderValue {
        let name: Vec<u8> = self
            .filename
            .bytes()
            .filter(|b| !b.is_ascii_control())
            .collect();

        let mut value = b"attachment; filename=".to_vec();
        if name.iter().all(|&b| is_token_byte(b)) {
            value.extend_from_slice(&name);
        } else {
            value.push(b'"');
            for b in name {
                if b == b'"' || b == b'\\' {
                    value.push(b'\\');
                }
                value.push(b);
            }
            value.push(b'"');
        }

        HeaderValue::from_bytes(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
    }
}

/// RFC 7230 `tchar`.
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

impl IntoResponse for CsvAttachment {
    fn into_response(self) -> Response {
        let disposition = self.content_disposition();
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(CSV_CONTENT_TYPE)),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(
            vec!["id".into(), "name".into(), "note".into()],
            vec![
                vec![Some("1".into()), Some("Ada".into()), None],
                vec![Some("2".into()), Some("Lin, Grace".into()), Some("say \"hi\"".into())],
            ],
        )
    }

    #[test]
    fn test_header_then_rows() {
        let csv = String::from_utf8(encode_csv(&frame()).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id,name,note");
        assert_eq!(lines[1], "1,Ada,");
        assert_eq!(lines[2], r#"2,"Lin, Grace","say ""hi""""#);
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let frame = DataFrame::new(vec!["a".into(), "b".into()], vec![]);
        assert_eq!(encode_csv(&frame).unwrap(), b"a,b\n");
    }

    #[test]
    fn test_no_columns_is_empty_body() {
        assert!(encode_csv(&DataFrame::default()).unwrap().is_empty());
    }

    #[test]
    fn test_attachment_headers() {
        let response = CsvAttachment::new("orders", b"a\n".to_vec()).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=orders.csv"
        );
    }

    #[test]
    fn test_separators_in_table_name_are_quoted() {
        let response = CsvAttachment::new("a; filename=evil", Vec::new()).into_response();
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            r#"attachment; filename="a; filename=evil.csv""#
        );

        let response = CsvAttachment::new(r#"say"hi\"#, Vec::new()).into_response();
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            r#"attachment; filename="say\"hi\\.csv""#
        );
    }

    #[test]
    fn test_control_characters_are_stripped_from_filename() {
        let response = CsvAttachment::new("bad\r\nname", Vec::new()).into_response();
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=badname.csv"
        );
    }
}
