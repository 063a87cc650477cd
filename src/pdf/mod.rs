//! Sales report PDF rendering.
//!
//! Draws a simple tabular report with the builtin Helvetica fonts, one
//! row per sale, paginating when a page fills up.

use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, Line, Mm, PdfDocument, Point};
use rust_decimal::Decimal;

use crate::domain::SaleWithClient;
use crate::error::{AppError, Result};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const ROW_HEIGHT: f32 = 7.0;
const BOTTOM_LIMIT: f32 = 20.0;

const COL_DATE: f32 = MARGIN;
const COL_CLIENT: f32 = 45.0;
const COL_DESCRIPTION: f32 = 100.0;
const COL_STATUS: f32 = 150.0;
const COL_AMOUNT: f32 = 172.0;

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

pub fn render_sales_report(
    sales: &[SaleWithClient],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        "Sales Report",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "report",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("pdf font: {e}")))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("pdf font: {e}")))?;

    let mut layer = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT - MARGIN;

    layer.use_text("Sales Report", 18.0, Mm(MARGIN), Mm(y), &font_bold);
    y -= 8.0;
    layer.use_text(
        format!(
            "{} to {}",
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d")
        ),
        10.0,
        Mm(MARGIN),
        Mm(y),
        &font,
    );
    y -= 10.0;

    let draw_header = |layer: &printpdf::PdfLayerReference, y: f32| {
        layer.use_text("Date", 10.0, Mm(COL_DATE), Mm(y), &font_bold);
        layer.use_text("Client", 10.0, Mm(COL_CLIENT), Mm(y), &font_bold);
        layer.use_text("Description", 10.0, Mm(COL_DESCRIPTION), Mm(y), &font_bold);
        layer.use_text("Status", 10.0, Mm(COL_STATUS), Mm(y), &font_bold);
        layer.use_text("Amount", 10.0, Mm(COL_AMOUNT), Mm(y), &font_bold);
        let rule = Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(y - 2.0)), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(y - 2.0)), false),
            ],
            is_closed: false,
        };
        layer.add_line(rule);
    };

    draw_header(&layer, y);
    y -= ROW_HEIGHT;

    let mut total = Decimal::ZERO;
    for sale in sales {
        if y < BOTTOM_LIMIT {
            let (new_page, new_layer) =
                doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "report");
            layer = doc.get_page(new_page).get_layer(new_layer);
            y = PAGE_HEIGHT - MARGIN;
            draw_header(&layer, y);
            y -= ROW_HEIGHT;
        }

        let client = sale.client_name.as_deref().unwrap_or("(deleted)");
        layer.use_text(
            sale.date.format("%Y-%m-%d").to_string(),
            9.0,
            Mm(COL_DATE),
            Mm(y),
            &font,
        );
        layer.use_text(truncate(client, 28), 9.0, Mm(COL_CLIENT), Mm(y), &font);
        layer.use_text(
            truncate(&sale.description, 26),
            9.0,
            Mm(COL_DESCRIPTION),
            Mm(y),
            &font,
        );
        layer.use_text(sale.status.as_str(), 9.0, Mm(COL_STATUS), Mm(y), &font);
        layer.use_text(
            format!("{:.2}", sale.amount),
            9.0,
            Mm(COL_AMOUNT),
            Mm(y),
            &font,
        );
        total += sale.amount;
        y -= ROW_HEIGHT;
    }

    y -= 3.0;
    layer.use_text(
        format!("Total: {total:.2} ({} sales)", sales.len()),
        11.0,
        Mm(COL_STATUS - 30.0),
        Mm(y),
        &font_bold,
    );

    doc.save_to_bytes()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("pdf rendering: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SaleStatus, StringUuid};

    fn sale(amount: i64, client: Option<&str>) -> SaleWithClient {
        SaleWithClient {
            id: StringUuid::new_v4(),
            client_id: StringUuid::new_v4(),
            amount: Decimal::from(amount),
            description: "services rendered".into(),
            date: Utc::now(),
            status: SaleStatus::Paid,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            client_name: client.map(String::from),
            client_email: None,
        }
    }

    #[test]
    fn test_renders_valid_pdf_bytes() {
        let sales = vec![sale(100, Some("Acme")), sale(250, None)];
        let bytes = render_sales_report(&sales, Utc::now(), Utc::now()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_renders_empty_report() {
        let bytes = render_sales_report(&[], Utc::now(), Utc::now()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_many_rows_paginate() {
        let sales: Vec<_> = (0..120).map(|i| sale(i, Some("Client"))).collect();
        let bytes = render_sales_report(&sales, Utc::now(), Utc::now()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
