//! Record output (CSV and JSON lines).

use crate::config::{HeaderLocale, OutputFormat};
use crate::locator::Marker;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Columns written for every record, in order.
pub const FIELDS: [&str; 12] = [
    "name",
    "address",
    "has_enabled_affiliate",
    "phone",
    "city",
    "state",
    "country",
    "zip",
    "website_url",
    "maps_url",
    "lat",
    "lng",
];

/// Human-readable header for a column.
pub fn header(field: &str, locale: HeaderLocale) -> &str {
    match locale {
        HeaderLocale::Es => match field {
            "name" => "Nombre de la tienda",
            "address" => "Dirección",
            "has_enabled_affiliate" => "Afiliado",
            "phone" => "Teléfono",
            "city" => "Ciudad",
            "state" => "Provincia",
            "country" => "País",
            "zip" => "Código postal",
            "website_url" => "Página web",
            "maps_url" => "Google Maps",
            "lat" => "Latitud",
            "lng" => "Longitud",
            other => other,
        },
        HeaderLocale::En => match field {
            "name" => "Store name",
            "address" => "Address",
            "has_enabled_affiliate" => "Affiliate",
            "phone" => "Phone",
            "city" => "City",
            "state" => "State",
            "country" => "Country",
            "zip" => "Postal code",
            "website_url" => "Website",
            "maps_url" => "Google Maps",
            "lat" => "Latitude",
            "lng" => "Longitude",
            other => other,
        },
    }
}

/// Destination for merged records.
pub trait RecordSink {
    /// Writes one fully assembled record.
    fn write_record(&mut self, marker: &Marker) -> Result<()>;

    /// Flushes buffered output.
    fn finish(&mut self) -> Result<()>;

    fn rows_written(&self) -> usize;
}

/// Creates the output file and the sink for the configured format.
pub fn open(path: &Path, format: OutputFormat, locale: HeaderLocale) -> Result<Box<dyn RecordSink>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    Ok(match format {
        OutputFormat::Csv => Box::new(CsvSink::new(writer, locale)),
        OutputFormat::Jsonl => Box::new(JsonLinesSink::new(writer)),
    })
}

/// CSV sink that writes the header row just before the first record.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    locale: HeaderLocale,
    rows: usize,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W, locale: HeaderLocale) -> Self {
        Self { writer: csv::Writer::from_writer(writer), locale, rows: 0 }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write_record(&mut self, marker: &Marker) -> Result<()> {
        if self.rows == 0 {
            self.writer
                .write_record(FIELDS.iter().map(|f| header(f, self.locale)))
                .context("Failed to write CSV header")?;
        }

        let row: Vec<String> = FIELDS.iter().map(|f| marker.cell(f)).collect();
        self.writer.write_record(&row).context("Failed to write CSV row")?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush CSV output")
    }

    fn rows_written(&self) -> usize {
        self.rows
    }
}

/// One JSON object per line holding the output columns.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    rows: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, rows: 0 }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn write_record(&mut self, marker: &Marker) -> Result<()> {
        let record: Map<String, Value> = FIELDS
            .iter()
            .map(|f| (f.to_string(), marker.get(f).cloned().unwrap_or_else(|| Value::from(""))))
            .collect();

        let line = serde_json::to_string(&record).context("Failed to serialize record")?;
        writeln!(self.writer, "{}", line).context("Failed to write record")?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush output")
    }

    fn rows_written(&self) -> usize {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_marker(value: Value) -> Marker {
        serde_json::from_value(value).unwrap()
    }

    fn make_store() -> Marker {
        make_marker(json!({
            "id": "1",
            "name": "Deportes, Montaña",
            "address": "Calle Mayor 1",
            "has_enabled_affiliate": true,
            "city": "Madrid",
            "country": "ES",
            "zip": "28001",
            "website_url": "https://shop.example",
            "maps_url": "",
            "lat": 40.41,
            "lng": -3.7,
            "store_html": "<div></div>"
        }))
    }

    fn csv_output(markers: &[Marker], locale: HeaderLocale) -> String {
        let mut sink = CsvSink::new(Vec::new(), locale);
        for marker in markers {
            sink.write_record(marker).unwrap();
        }
        sink.finish().unwrap();
        String::from_utf8(sink.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_no_records_no_header() {
        assert_eq!(csv_output(&[], HeaderLocale::Es), "");
    }

    #[test]
    fn test_header_written_once() {
        let output = csv_output(&[make_store(), make_store()], HeaderLocale::Es);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Nombre de la tienda,Dirección,Afiliado,Teléfono"));
        assert!(lines[0].ends_with("Latitud,Longitud"));
        assert_eq!(output.matches("Nombre de la tienda").count(), 1);
    }

    #[test]
    fn test_row_values_and_quoting() {
        let output = csv_output(&[make_store()], HeaderLocale::Es);
        let row = output.lines().nth(1).unwrap();

        assert_eq!(
            row,
            r#""Deportes, Montaña",Calle Mayor 1,true,,Madrid,,ES,28001,https://shop.example,,40.41,-3.7"#
        );
    }

    #[test]
    fn test_missing_fields_are_empty_cells() {
        let output = csv_output(&[make_marker(json!({"id": "5"}))], HeaderLocale::En);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Store name,Address,Affiliate,Phone,City,State,Country,Postal code,Website,Google Maps,Latitude,Longitude");
        assert_eq!(lines[1], ",,,,,,,,,,,");
    }

    #[test]
    fn test_extra_fields_not_written() {
        let output = csv_output(&[make_store()], HeaderLocale::Es);
        assert!(!output.contains("<div>"));
    }

    #[test]
    fn test_rows_written() {
        let mut sink = CsvSink::new(Vec::new(), HeaderLocale::Es);
        assert_eq!(sink.rows_written(), 0);
        sink.write_record(&make_store()).unwrap();
        assert_eq!(sink.rows_written(), 1);
    }

    #[test]
    fn test_header_unknown_field_passthrough() {
        assert_eq!(header("fax", HeaderLocale::Es), "fax");
        assert_eq!(header("zip", HeaderLocale::En), "Postal code");
    }

    #[test]
    fn test_jsonl_sink() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.write_record(&make_store()).unwrap();
        sink.write_record(&make_marker(json!({"id": "2", "name": "B"}))).unwrap();
        sink.finish().unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<Value> =
            output.lines().map(|l| serde_json::from_str(l).unwrap()).collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["has_enabled_affiliate"], json!(true));
        assert_eq!(lines[0]["lat"], json!(40.41));
        assert!(lines[0].get("store_html").is_none());
        assert_eq!(lines[1]["name"], json!("B"));
        assert_eq!(lines[1]["phone"], json!(""));
        assert_eq!(lines[1].as_object().unwrap().len(), FIELDS.len());
    }

    #[test]
    fn test_open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stores.csv");

        let mut sink = open(&path, OutputFormat::Csv, HeaderLocale::Es).unwrap();
        sink.write_record(&make_store()).unwrap();
        sink.finish().unwrap();
        drop(sink);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Nombre de la tienda"));
    }

    #[test]
    fn test_open_fails_on_missing_directory() {
        let result = open(Path::new("/nonexistent/dir/stores.csv"), OutputFormat::Csv, HeaderLocale::Es);
        let err = result.err().unwrap().to_string();
        assert!(err.contains("Failed to create output file"));
    }
}
