//! PDF receipt rendering.
//!
//! A pure function of the stored record: the layout reads only the fields
//! and the factors snapshot captured at creation time. Uses the PDF base-14
//! Helvetica faces, so all emitted text stays within their encoding.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};
use serde_json::Value;

use crate::domain::error::DomainError;
use crate::domain::model::CalculationRecord;
use crate::domain::renderer::ReceiptRenderer;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 17.0;
/// Cursor depth (from the page top) past which a new page is started.
const BODY_LIMIT_MM: f32 = PAGE_HEIGHT_MM - MARGIN_MM - 8.0;

const BODY_SIZE: f32 = 10.0;
const HEADING_SIZE: f32 = 14.0;
const TITLE_SIZE: f32 = 20.0;
const NOTE_SIZE: f32 = 9.0;

const LINE_STEP_MM: f32 = 5.2;
const VALUE_COLUMN_MM: f32 = 72.0;

/// Explicit stand-in for absent values; never an empty string.
const PLACEHOLDER: &str = "-";

/// `ReceiptRenderer` backed by printpdf.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfReceiptRenderer;

impl ReceiptRenderer for PdfReceiptRenderer {
    fn render(&self, record: &CalculationRecord) -> Result<Vec<u8>, DomainError> {
        render_receipt(record)
    }
}

/// Renders a stored calculation into PDF bytes.
///
/// # Errors
///
/// Returns `DomainError::Internal` when document assembly fails.
pub fn render_receipt(record: &CalculationRecord) -> Result<Vec<u8>, DomainError> {
    let mut writer = PageWriter::new(&format!("EcoTrip Receipt {}", record.id))?;

    writer.title("ECOTRIP");
    writer.subtitle("CO2 Emissions Calculation Receipt");
    writer.gap(2.0);

    writer.kv_line("Calculation ID", Some(record.id.clone()));
    writer.kv_line(
        "Generated at",
        Some(record.created_at.format("%d/%m/%Y %H:%M:%S UTC").to_string()),
    );
    writer.kv_line("Route provider", Some(record.provider.clone()));
    writer.gap(2.0);
    writer.rule();

    writer.heading("Inputs");
    writer.kv_line("Origin", record.inputs.origin.clone());
    writer.kv_line("Destination", record.inputs.destination.clone());
    writer.kv_line(
        "Distance",
        Some(format!("{} km", fmt2(record.inputs.distance_km))),
    );
    writer.kv_line("Transport", non_empty(&record.inputs.mode_label));
    writer.gap(2.0);
    writer.rule();

    writer.heading("Results");
    let results = &record.results;
    writer.kv_line(
        "CO2 emission",
        Some(format!("{} kg", fmt2(results.emission_kg))),
    );
    writer.kv_line(
        "Car baseline",
        Some(format!("{} kg", fmt2(results.car_emission_kg))),
    );
    writer.kv_line(
        "Delta vs car",
        Some(format!("{} kg", fmt2(results.delta_vs_car_kg))),
    );
    writer.kv_line("Vs car", Some(format!("{}%", fmt2(results.vs_car_pct))));
    writer.gap(2.0);
    writer.kv_line(
        "Credits needed",
        Some(format!("{} credit(s)", fmt4(results.credits_needed))),
    );
    writer.kv_line(
        "Estimated cost (base)",
        Some(format!("R$ {}", fmt2(results.cost_base_brl))),
    );
    writer.kv_line(
        "Estimated range",
        Some(format!(
            "R$ {} - R$ {}",
            fmt2(results.cost_min_brl),
            fmt2(results.cost_max_brl)
        )),
    );
    writer.gap(2.0);
    writer.rule();

    writer.heading("Methodology and factors");
    writer.kv_line("Factors version", non_empty(&record.factors_version));
    writer.body_line("Tables captured when this calculation was created:");
    writer.gap(1.0);

    let snapshot = serde_json::to_value(&record.factors)
        .map_err(|e| DomainError::internal(format!("factors snapshot serialization: {e}")))?;
    match factor_node(&snapshot) {
        FactorNode::Group(entries) => {
            for (label, node) in entries {
                writer.factor_entry(&label, &node, 0);
            }
        }
        node @ FactorNode::Scalar(_) => writer.factor_entry("factors", &node, 0),
    }

    writer.gap(4.0);
    writer.note(
        "This receipt records the exact parameters used for the calculation \
         and can be kept for internal audit. Historical receipts are stable: \
         they are regenerated from the stored snapshot, not from current \
         tables.",
    );

    writer.finish()
}

/// A factors snapshot rendered generically: a mapping from labels to either
/// scalars or nested groups. The shape of the snapshot may evolve without
/// touching the walker.
enum FactorNode {
    Scalar(String),
    Group(Vec<(String, FactorNode)>),
}

fn factor_node(value: &Value) -> FactorNode {
    match value {
        Value::Object(map) => FactorNode::Group(
            map.iter()
                .map(|(key, val)| (key.clone(), factor_node(val)))
                .collect(),
        ),
        Value::Array(items) => FactorNode::Group(
            items
                .iter()
                .enumerate()
                .map(|(idx, val)| (idx.to_string(), factor_node(val)))
                .collect(),
        ),
        Value::String(s) if !s.trim().is_empty() => FactorNode::Scalar(s.clone()),
        Value::Number(n) => FactorNode::Scalar(n.to_string()),
        Value::Bool(b) => FactorNode::Scalar(b.to_string()),
        Value::Null | Value::String(_) => FactorNode::Scalar(PLACEHOLDER.to_owned()),
    }
}

fn fmt2(value: f64) -> String {
    format!("{value:.2}")
}

fn fmt4(value: f64) -> String {
    format!("{value:.4}")
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Cursor-based page writer: tracks a top-down cursor in mm and starts a
/// fresh page when a write would run past the body limit.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor_mm: f32,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, DomainError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| DomainError::internal(format!("font setup: {e}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| DomainError::internal(format!("font setup: {e}")))?;
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor_mm: MARGIN_MM,
        })
    }

    fn finish(self) -> Result<Vec<u8>, DomainError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| DomainError::internal(format!("pdf serialization: {e}")))
    }

    fn ensure_room(&mut self, needed_mm: f32) {
        if self.cursor_mm + needed_mm <= BODY_LIMIT_MM {
            return;
        }
        let (page, layer) =
            self.doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor_mm = MARGIN_MM;
    }

    fn baseline(&self) -> Mm {
        Mm(PAGE_HEIGHT_MM - self.cursor_mm)
    }

    fn write(&mut self, text: &str, size: f32, bold: bool, x_mm: f32, color: Color) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(color);
        self.layer
            .use_text(text, size, Mm(x_mm), self.baseline(), font);
    }

    fn title(&mut self, text: &str) {
        self.ensure_room(10.0);
        self.cursor_mm += 7.0;
        self.write(text, TITLE_SIZE, true, MARGIN_MM, brand_green());
    }

    fn subtitle(&mut self, text: &str) {
        self.ensure_room(LINE_STEP_MM);
        self.cursor_mm += LINE_STEP_MM;
        self.write(text, 11.0, false, MARGIN_MM, slate());
    }

    fn heading(&mut self, text: &str) {
        self.ensure_room(8.0);
        self.cursor_mm += 7.0;
        self.write(text, HEADING_SIZE, true, MARGIN_MM, ink());
        self.cursor_mm += 2.0;
    }

    /// Bold key at the margin, value in a fixed column. Absent values render
    /// as the placeholder.
    fn kv_line(&mut self, key: &str, value: Option<String>) {
        self.ensure_room(LINE_STEP_MM);
        self.cursor_mm += LINE_STEP_MM;
        self.write(&format!("{key}:"), BODY_SIZE, true, MARGIN_MM, ink());
        let value = value.unwrap_or_else(|| PLACEHOLDER.to_owned());
        self.write(&value, BODY_SIZE, false, VALUE_COLUMN_MM, ink());
    }

    fn body_line(&mut self, text: &str) {
        self.ensure_room(LINE_STEP_MM);
        self.cursor_mm += LINE_STEP_MM;
        self.write(text, BODY_SIZE, false, MARGIN_MM, ink());
    }

    /// One entry of the factors tree; groups recurse with deeper indents.
    fn factor_entry(&mut self, label: &str, node: &FactorNode, depth: usize) {
        #[allow(clippy::cast_precision_loss)]
        let indent_mm = MARGIN_MM + 4.0 * depth as f32;
        let marker = if depth == 0 { "*" } else { "-" };
        match node {
            FactorNode::Scalar(value) => {
                self.ensure_room(LINE_STEP_MM);
                self.cursor_mm += LINE_STEP_MM;
                self.write(
                    &format!("{marker} {label}: {value}"),
                    BODY_SIZE,
                    false,
                    indent_mm,
                    ink(),
                );
            }
            FactorNode::Group(entries) => {
                self.ensure_room(LINE_STEP_MM);
                self.cursor_mm += LINE_STEP_MM;
                self.write(
                    &format!("{marker} {label}:"),
                    BODY_SIZE,
                    false,
                    indent_mm,
                    ink(),
                );
                for (child_label, child) in entries {
                    self.factor_entry(child_label, child, depth + 1);
                }
            }
        }
    }

    fn note(&mut self, text: &str) {
        // Naive word wrap; Helvetica at 9 pt fits ~100 chars in the body width.
        for chunk in wrap(text, 100) {
            self.ensure_room(4.5);
            self.cursor_mm += 4.5;
            self.write(&chunk, NOTE_SIZE, false, MARGIN_MM, gray());
        }
    }

    fn rule(&mut self) {
        self.ensure_room(4.0);
        self.cursor_mm += 2.0;
        let y = self.baseline();
        let line = Line {
            points: vec![
                (Point::new(Mm(MARGIN_MM), y), false),
                (Point::new(Mm(PAGE_WIDTH_MM - MARGIN_MM), y), false),
            ],
            is_closed: false,
        };
        self.layer.set_outline_color(rule_gray());
        self.layer.set_outline_thickness(0.6);
        self.layer.add_line(line);
        self.cursor_mm += 2.0;
    }

    fn gap(&mut self, mm: f32) {
        self.cursor_mm += mm;
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn brand_green() -> Color {
    Color::Rgb(Rgb::new(0.06, 0.70, 0.48, None))
}

fn ink() -> Color {
    Color::Rgb(Rgb::new(0.07, 0.09, 0.15, None))
}

fn slate() -> Color {
    Color::Rgb(Rgb::new(0.20, 0.26, 0.33, None))
}

fn gray() -> Color {
    Color::Rgb(Rgb::new(0.42, 0.45, 0.50, None))
}

fn rule_gray() -> Color {
    Color::Rgb(Rgb::new(0.90, 0.91, 0.92, None))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::emission;
    use crate::domain::factors::EmissionFactors;
    use crate::domain::model::{CalcInputs, CalculationRecord};

    fn record(origin: Option<&str>, destination: Option<&str>) -> CalculationRecord {
        let factors = EmissionFactors::default();
        let results = emission::compute("bus", 500.0, &factors).unwrap();
        CalculationRecord {
            id: "ET-4A5B6C7D8E9F".to_owned(),
            created_at: chrono::Utc.with_ymd_and_hms(2026, 1, 15, 12, 30, 0).unwrap(),
            provider: "ORS".to_owned(),
            inputs: CalcInputs {
                origin: origin.map(ToOwned::to_owned),
                destination: destination.map(ToOwned::to_owned),
                distance_km: 500.0,
                mode: "bus".to_owned(),
                mode_label: "Bus".to_owned(),
            },
            results,
            factors: factors.snapshot(),
            factors_version: factors.version,
        }
    }

    fn extract_text(bytes: &[u8]) -> String {
        pdf_extract::extract_text_from_mem(bytes).unwrap()
    }

    #[test]
    fn renders_a_wellformed_pdf() {
        let bytes = render_receipt(&record(Some("Curitiba"), Some("Sao Paulo"))).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn receipt_carries_record_fields() {
        let bytes = render_receipt(&record(Some("Curitiba"), Some("Sao Paulo"))).unwrap();
        let text = extract_text(&bytes);

        assert!(text.contains("ET-4A5B6C7D8E9F"));
        assert!(text.contains("Curitiba"));
        assert!(text.contains("Sao Paulo"));
        assert!(text.contains("500.00 km"));
        assert!(text.contains("44.50 kg"));
        assert!(text.contains("60.00 kg"));
        assert!(text.contains("74.17%"));
        assert!(text.contains("0.0445 credit(s)"));
        assert!(text.contains("R$ 2.00"));
        assert!(text.contains("2025.12.26"));
        assert!(text.contains("15/01/2026"));
    }

    #[test]
    fn methodology_lists_the_snapshot_not_live_tables() {
        let mut rec = record(Some("A"), Some("B"));
        rec.factors.kg_per_km.insert("bus".to_owned(), 0.5);
        let text = extract_text(&render_receipt(&rec).unwrap());

        assert!(text.contains("kg_per_km"));
        assert!(text.contains("credit_price"));
        assert!(text.contains("0.5"));
        assert!(text.contains("truck"));
    }

    #[test]
    fn manual_records_render_placeholders() {
        let mut rec = record(None, None);
        rec.provider = "manual".to_owned();
        let text = extract_text(&render_receipt(&rec).unwrap());

        assert!(text.contains("Origin:"));
        assert!(text.contains("Destination:"));
        assert!(text.contains("manual"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let rec = record(Some("Curitiba"), Some("Sao Paulo"));
        let first = extract_text(&render_receipt(&rec).unwrap());
        let second = extract_text(&render_receipt(&rec).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn deep_factor_trees_render_recursively() {
        let rec = record(Some("A"), Some("B"));
        // The walker must not depend on the exact snapshot shape.
        let value = serde_json::json!({
            "kg_per_km": { "bus": 0.089, "city": { "peak": 0.1 } },
            "credit_price": { "base": 45.0 },
        });
        let node = factor_node(&value);
        match node {
            FactorNode::Group(entries) => {
                assert_eq!(entries.len(), 2);
                let (_, child) = entries
                    .iter()
                    .find(|(label, _)| label == "kg_per_km")
                    .unwrap();
                match child {
                    FactorNode::Group(inner) => {
                        let (_, city) =
                            inner.iter().find(|(label, _)| label == "city").unwrap();
                        assert!(matches!(city, FactorNode::Group(_)));
                    }
                    FactorNode::Scalar(_) => panic!("expected a nested group"),
                }
            }
            FactorNode::Scalar(_) => panic!("expected a group at the root"),
        }
        // And a record with the default snapshot still renders.
        assert!(render_receipt(&rec).is_ok());
    }

    #[test]
    fn null_and_empty_values_become_placeholders() {
        assert!(matches!(
            factor_node(&Value::Null),
            FactorNode::Scalar(s) if s == PLACEHOLDER
        ));
        assert!(matches!(
            factor_node(&serde_json::json!("  ")),
            FactorNode::Scalar(s) if s == PLACEHOLDER
        ));
    }
}
