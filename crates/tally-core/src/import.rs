//! CSV import for the fixed sales schema
//!
//! Columns are located by header name, so column order in the file does not
//! matter. Type normalization happens here: dates are parsed to calendar
//! dates and quantities coerced to integers. Anything unparseable is a
//! MalformedInput error naming the 1-based data row.

use std::collections::HashMap;
use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{RecordSet, SalesRecord, INPUT_COLUMNS};

/// Values treated as a missing age group
const MISSING_MARKERS: [&str; 3] = ["", "nan", "null"];

/// Parse sales CSV data into a validated record set
pub fn parse_csv<R: Read>(reader: R) -> Result<RecordSet> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = i + 1;
        let record = result?;
        records.push(columns.parse_row(&record, row)?);
    }

    debug!("Parsed {} sales records", records.len());
    RecordSet::new(records)
}

/// Positions of the schema columns within a file's header
struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut positions = HashMap::new();
        for name in INPUT_COLUMNS {
            let pos = headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == name)
                .ok_or_else(|| {
                    Error::MalformedInput(format!("missing required column {}", name))
                })?;
            positions.insert(name, pos);
        }
        Ok(Self { positions })
    }

    fn get<'r>(&self, record: &'r StringRecord, name: &'static str) -> &'r str {
        self.positions
            .get(name)
            .and_then(|&pos| record.get(pos))
            .unwrap_or("")
    }

    fn required(&self, record: &StringRecord, name: &'static str, row: usize) -> Result<String> {
        let value = self.get(record, name);
        if value.is_empty() {
            return Err(Error::malformed_row(
                row,
                format!("missing required field {}", name),
            ));
        }
        Ok(value.to_string())
    }

    fn parse_row(&self, record: &StringRecord, row: usize) -> Result<SalesRecord> {
        let order_date = parse_date(&self.required(record, "Order_Date", row)?)
            .map_err(|e| Error::malformed_row(row, e))?;
        let quantity = parse_quantity(&self.required(record, "Quantity", row)?)
            .map_err(|e| Error::malformed_row(row, e))?;
        let unit_price = parse_amount(&self.required(record, "Unit_Price", row)?)
            .map_err(|e| Error::malformed_row(row, e))?;
        let total_amount = parse_amount(&self.required(record, "Total_Amount", row)?)
            .map_err(|e| Error::malformed_row(row, e))?;
        let discount = parse_amount(&self.required(record, "Discount", row)?)
            .map_err(|e| Error::malformed_row(row, e))?;

        let age_group = self.get(record, "Customer_Age_Group");
        let customer_age_group = if MISSING_MARKERS
            .iter()
            .any(|m| age_group.eq_ignore_ascii_case(m))
        {
            None
        } else {
            Some(age_group.to_string())
        };

        Ok(SalesRecord {
            order_id: self.required(record, "Order_ID", row)?,
            order_date,
            customer_id: self.required(record, "Customer_ID", row)?,
            product_name: self.required(record, "Product_Name", row)?,
            category: self.required(record, "Category", row)?,
            quantity,
            unit_price,
            total_amount,
            discount,
            region: self.required(record, "Region", row)?,
            payment_method: self.required(record, "Payment_Method", row)?,
            customer_age_group,
        })
    }
}

/// Parse a date string in the formats sales exports commonly use
pub fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    let s = s.trim();

    let date_formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%Y", // 01/15/2024
        "%Y/%m/%d", // 2024/01/15
    ];
    for fmt in date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    // Timestamps written by spreadsheet and dataframe tools
    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    Err(format!("Unable to parse date: {}", s))
}

/// Parse a quantity, accepting integral decimals such as "2.0"
pub fn parse_quantity(s: &str) -> std::result::Result<u32, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("Unable to parse quantity: {}", s))?;

    if !value.is_finite() || value.fract() != 0.0 {
        return Err(format!("Quantity must be a whole number: {}", s));
    }
    if value <= 0.0 {
        return Err(format!("Quantity must be positive: {}", s));
    }
    if value > u32::MAX as f64 {
        return Err(format!("Quantity out of range: {}", s));
    }
    Ok(value as u32)
}

/// Parse an amount string, handling currency symbols and commas
pub fn parse_amount(s: &str) -> std::result::Result<f64, String> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Unable to parse amount: {}", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Order_ID,Order_Date,Customer_ID,Product_Name,Category,Quantity,Unit_Price,Total_Amount,Discount,Region,Payment_Method,Customer_Age_Group";

    fn csv_with(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15").unwrap(), expected);
        assert_eq!(parse_date("01/15/2024").unwrap(), expected);
        assert_eq!(parse_date("2024-01-15 00:00:00").unwrap(), expected);
        assert!(parse_date("15th of January").is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3").unwrap(), 3);
        assert_eq!(parse_quantity("2.0").unwrap(), 2);
        assert!(parse_quantity("2.5").is_err());
        assert!(parse_quantity("-1").is_err());
        assert!(parse_quantity("0").is_err());
        assert!(parse_quantity("many").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56").unwrap(), 1234.56);
        assert_eq!(parse_amount("19.99").unwrap(), 19.99);
        assert_eq!(parse_amount("(100.00)").unwrap(), -100.00);
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn test_parse_csv() {
        let csv = csv_with(&[
            "ORD202401151234,2024-01-15,CUST1001,Laptop,Electronics,1,999.99,999.99,0,North America,Credit Card,26-35",
            "ORD202401161111,2024-01-16,CUST1002,Novel,Books,2,12.50,22.50,2.50,Europe,PayPal,",
        ]);

        let set = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(set.len(), 2);

        let first = &set.records()[0];
        assert_eq!(first.order_id, "ORD202401151234");
        assert_eq!(first.category, "Electronics");
        assert_eq!(first.quantity, 1);
        assert_eq!(first.total_amount, 999.99);
        assert_eq!(first.customer_age_group.as_deref(), Some("26-35"));

        let second = &set.records()[1];
        assert_eq!(second.discount, 2.5);
        assert_eq!(second.customer_age_group, None);
    }

    #[test]
    fn test_parse_csv_columns_by_name() {
        let csv = "Category,Order_ID,Order_Date,Customer_ID,Product_Name,Quantity,Unit_Price,Total_Amount,Discount,Region,Payment_Method,Customer_Age_Group\n\
                   Toys,ORD1,2024-03-01,CUST1,Puzzle,1,15,15,0,Asia,PayPal,18-25";
        let set = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(set.records()[0].category, "Toys");
        assert_eq!(set.records()[0].order_id, "ORD1");
    }

    #[test]
    fn test_parse_csv_nan_age_group_is_missing() {
        let csv = csv_with(&["ORD1,2024-03-01,CUST1,Puzzle,Toys,1,15,15,0,Asia,PayPal,NaN"]);
        let set = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(set.records()[0].customer_age_group, None);
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let csv = "Order_ID,Order_Date\nORD1,2024-01-01";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert!(err.to_string().contains("Customer_ID"));
    }

    #[test]
    fn test_parse_csv_bad_date_names_row() {
        let csv = csv_with(&[
            "ORD1,2024-03-01,CUST1,Puzzle,Toys,1,15,15,0,Asia,PayPal,18-25",
            "ORD2,not-a-date,CUST1,Puzzle,Toys,1,15,15,0,Asia,PayPal,18-25",
        ]);
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 2"), "{}", msg);
        assert!(msg.contains("Unable to parse date"), "{}", msg);
    }

    #[test]
    fn test_parse_csv_missing_required_field() {
        let csv = csv_with(&["ORD1,2024-03-01,,Puzzle,Toys,1,15,15,0,Asia,PayPal,18-25"]);
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Customer_ID"));
    }

    #[test]
    fn test_parse_csv_negative_total_rejected() {
        let csv = csv_with(&["ORD1,2024-03-01,CUST1,Puzzle,Toys,1,15,-15,0,Asia,PayPal,18-25"]);
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Total_Amount"));
    }

    #[test]
    fn test_parse_csv_header_only() {
        let set = parse_csv(HEADER.as_bytes()).unwrap();
        assert!(set.is_empty());
    }
}
