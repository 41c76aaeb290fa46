//! Strategic recommendation templates

use crate::error::Result;
use crate::export::format_currency;
use crate::models::AggregateResults;

use super::leaders::leader;
use super::types::StrategicSection;

/// Number of leading categories named in the portfolio section
const FOCUS_CATEGORIES: usize = 3;

fn section(title: &str, points: Vec<String>) -> StrategicSection {
    StrategicSection {
        title: title.to_string(),
        points,
    }
}

/// Build the five strategy sections from the ranked tables and KPIs
pub fn strategic_sections(results: &AggregateResults) -> Result<Vec<StrategicSection>> {
    leader(&results.by_category, "category")?;
    let region = &leader(&results.by_region, "region")?.key;
    let segment = &leader(&results.demographics, "demographics")?.age_group;
    let payment = &leader(&results.payments, "payment methods")?.payment_method;

    let focus: Vec<&str> = results
        .by_category
        .iter()
        .take(FOCUS_CATEGORIES)
        .map(|c| c.key.as_str())
        .collect();
    let kpis = &results.kpis;

    Ok(vec![
        section(
            "PRODUCT PORTFOLIO OPTIMIZATION",
            vec![
                format!("Focus on top-performing categories: {}", focus.join(", ")),
                "Review underperforming categories and consider promotions or discontinuation"
                    .to_string(),
                "Develop product bundles featuring top-selling items".to_string(),
            ],
        ),
        section(
            "MARKET EXPANSION",
            vec![
                format!("Prioritize growth in {} (highest revenue region)", region),
                "Investigate low-performing regions for improvement opportunities".to_string(),
                "Consider regional marketing campaigns tailored to local preferences".to_string(),
            ],
        ),
        section(
            "CUSTOMER ENGAGEMENT",
            vec![
                format!("Target {} demographic with personalized campaigns", segment),
                "Implement loyalty programs to increase customer retention".to_string(),
                format!(
                    "Average Order Value: {} - Consider upselling strategies",
                    format_currency(kpis.average_order_value)
                ),
            ],
        ),
        section(
            "OPERATIONAL EFFICIENCY",
            vec![
                format!(
                    "Discount Rate: {:.2}% - Review discount strategy",
                    kpis.discount_rate
                ),
                format!("Optimize payment processing for {} (most used method)", payment),
                "Monitor inventory levels for top products to avoid stockouts".to_string(),
            ],
        ),
        section(
            "GROWTH OPPORTUNITIES",
            vec![
                "Cross-sell complementary products from top categories".to_string(),
                "Develop seasonal campaigns aligned with peak sales months".to_string(),
                "Expand product range in high-performing categories".to_string(),
            ],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::error::Error;
    use crate::test_utils::{cleaned_set, record, RecordBuilder};

    #[test]
    fn test_sections_in_order() {
        let set = cleaned_set(vec![record("Books", 10.0)]);
        let sections = strategic_sections(&aggregate(&set).unwrap()).unwrap();
        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "PRODUCT PORTFOLIO OPTIMIZATION",
                "MARKET EXPANSION",
                "CUSTOMER ENGAGEMENT",
                "OPERATIONAL EFFICIENCY",
                "GROWTH OPPORTUNITIES",
            ]
        );
    }

    #[test]
    fn test_templates_use_leaders_and_kpis() {
        let set = cleaned_set(vec![
            record("Electronics", 400.0),
            record("Books", 300.0),
            record("Toys", 200.0),
            RecordBuilder::new()
                .category("Garden")
                .total(100.0)
                .discount(50.0)
                .region("Asia")
                .build(),
        ]);
        let sections = strategic_sections(&aggregate(&set).unwrap()).unwrap();

        assert_eq!(
            sections[0].points[0],
            "Focus on top-performing categories: Electronics, Books, Toys"
        );
        assert!(sections[1].points[0].contains("Europe"));
        assert!(sections[2].points[0].contains("26-35"));
        assert_eq!(
            sections[2].points[2],
            "Average Order Value: $250.00 - Consider upselling strategies"
        );
        assert_eq!(
            sections[3].points[0],
            "Discount Rate: 5.00% - Review discount strategy"
        );
        assert!(sections[3].points[1].contains("Credit Card"));
    }

    #[test]
    fn test_fewer_than_three_categories() {
        let set = cleaned_set(vec![record("Books", 10.0), record("Toys", 5.0)]);
        let sections = strategic_sections(&aggregate(&set).unwrap()).unwrap();
        assert_eq!(
            sections[0].points[0],
            "Focus on top-performing categories: Books, Toys"
        );
    }

    #[test]
    fn test_empty_table_rejected() {
        let set = cleaned_set(vec![record("Books", 10.0)]);
        let mut results = aggregate(&set).unwrap();
        results.payments.clear();
        assert!(matches!(
            strategic_sections(&results),
            Err(Error::EmptyDataset(_))
        ));
    }
}
