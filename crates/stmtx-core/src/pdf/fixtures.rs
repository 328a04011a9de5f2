//! Statement PDFs built with lopdf for tests.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// ICICI statement rows, one text object per cell.
pub const ICICI_ROWS: &[&[&str]] = &[
    &["ICICI Bank Limited"],
    &["Your Details With Us:"],
    &["MR.RAVI KUMAR&ANITA KUMAR"],
    &["Account Number 000101234567"],
    &["IFSC ICIC0000001"],
    &["Statement of transactions in Savings Account"],
    &["DATE", "MODE", "PARTICULARS", "DEPOSITS", "WITHDRAWALS", "BALANCE"],
    &["15-06-2023", "NEFT TRANSFER XYZ", "5,000.00Dr", "25,000.00Cr"],
    &["16-06-2023", "UPI/CREDIT FROM ABC", "1,000.00Cr", "26,000.00Cr"],
    &["Page Total", "6,000.00"],
];

/// HDFC statement rows, one text object per cell.
pub const HDFC_ROWS: &[&[&str]] = &[
    &["HDFC BANK Ltd."],
    &["MR ASHOK VERMA"],
    &["Account No : 50100012345678"],
    &["IFSC: HDFC0000123 MICR: 110240001"],
    &["Date", "Narration", "Ref", "Withdrawal", "Deposit", "Balance"],
    &["12/5/23", "RTGS INWARD", "0.00", "50000.00", "150000.00"],
    &["13/5/23", "ATM WDL", "2000.00", "0.00", "148000.00"],
    &["Statement Summary"],
];

/// Build a one-page PDF drawing each row on its own baseline.
///
/// Every cell is a separate `BT`/`ET` text object, the way statement
/// generators lay out table columns.
pub fn statement_pdf(rows: &[&[&str]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let y = 800 - 20 * i as i64;
        let mut x = 40;
        for cell in row.iter() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
            operations.push(Operation::new("Td", vec![x.into(), y.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*cell)]));
            operations.push(Operation::new("ET", vec![]));
            x += 8 * cell.len() as i64 + 10;
        }
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
