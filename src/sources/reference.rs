//! Reference channel metadata table (CSV)
//!
//! The table is expected to have a header row with at least the columns
//! `id`, `name`, `country`, `closed` and `logo`; extra columns are ignored.
//! Any row missing one of them fails the whole table.

use crate::errors::{SourceError, SourceResult};
use crate::models::ReferenceEntry;

pub fn parse_reference_table(content: &str) -> SourceResult<Vec<ReferenceEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    reader
        .deserialize::<ReferenceEntry>()
        .map(|row| {
            row.map_err(|e| {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                SourceError::malformed_row(line, e.to_string())
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
id,name,alt_names,country,closed,logo
RTP1.pt,RTP 1,,PT,false,https://logos/rtp1.png
SIC.pt,SIC,SIC Generalista,PT,TRUE,
\"Canal, Lda.pt\",\"Canal, Lda\",,PT,,https://logos/canal.png
";

    #[test]
    fn parses_rows_in_order() {
        let rows = parse_reference_table(TABLE).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].id, "RTP1.pt");
        assert_eq!(rows[0].name, "RTP 1");
        assert!(!rows[0].closed);
        assert_eq!(rows[0].logo.as_deref(), Some("https://logos/rtp1.png"));

        assert!(rows[1].closed);
        assert_eq!(rows[1].logo, None);

        assert_eq!(rows[2].id, "Canal, Lda.pt");
        assert!(!rows[2].closed);
    }

    #[test]
    fn missing_column_is_a_malformed_row() {
        let err = parse_reference_table("id,name,closed,logo\nA,A,false,\n").unwrap_err();
        match err {
            SourceError::MalformedRow { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("country"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_closed_flag_is_rejected() {
        let err = parse_reference_table("id,name,country,closed,logo\nA,A,PT,maybe,\n").unwrap_err();
        assert!(matches!(err, SourceError::MalformedRow { .. }));
    }

    #[test]
    fn short_row_is_rejected() {
        let err = parse_reference_table("id,name,country,closed,logo\nA,A\n").unwrap_err();
        assert!(matches!(err, SourceError::MalformedRow { .. }));
    }

    #[test]
    fn header_only_table_is_empty() {
        assert!(parse_reference_table("id,name,country,closed,logo\n").unwrap().is_empty());
    }
}
