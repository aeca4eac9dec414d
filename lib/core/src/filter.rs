// Attribute filters applied to garments before similarity scoring
use crate::garment::{normalize_term, Garment};
use serde::{Deserialize, Serialize};

pub trait GarmentFilter: Send + Sync {
    fn matches(&self, garment: &Garment) -> bool;
}

impl<F> GarmentFilter for F
where
    F: Fn(&Garment) -> bool + Send + Sync,
{
    fn matches(&self, garment: &Garment) -> bool {
        self(garment)
    }
}

/// Categorical attribute a condition can test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeField {
    Category,
    Subcategory,
    Source,
    Brand,
    Condition,
    Size,
    Status,
    Season,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FilterCondition {
    Equals { field: AttributeField, value: String },
    NotEquals { field: AttributeField, value: String },
    PriceAtMost { value: f64 },
    PriceAtLeast { value: f64 },
    HasColor { value: String },
    HasStyleTag { value: String },
    And { conditions: Vec<FilterCondition> },
    Or { conditions: Vec<FilterCondition> },
    Not { condition: Box<FilterCondition> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeFilter {
    condition: FilterCondition,
}

impl AttributeFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    pub fn condition(&self) -> &FilterCondition {
        &self.condition
    }

    fn get_field_value(garment: &Garment, field: AttributeField) -> Option<String> {
        match field {
            AttributeField::Category => Some(garment.category.clone()),
            AttributeField::Subcategory => garment.subcategory.clone(),
            AttributeField::Source => garment.source.clone(),
            AttributeField::Brand => garment.brand.clone(),
            AttributeField::Condition => Some(garment.condition.as_str().to_string()),
            AttributeField::Size => garment.size.clone(),
            AttributeField::Status => Some(garment.status.as_str().to_string()),
            AttributeField::Season => garment.season.clone(),
        }
        .map(|v| normalize_term(&v))
    }

    fn matches_condition(condition: &FilterCondition, garment: &Garment) -> bool {
        match condition {
            FilterCondition::Equals { field, value } => {
                Self::get_field_value(garment, *field)
                    .map(|v| v == normalize_term(value))
                    .unwrap_or(false)
            }
            FilterCondition::NotEquals { field, value } => {
                Self::get_field_value(garment, *field)
                    .map(|v| v != normalize_term(value))
                    .unwrap_or(true)
            }
            FilterCondition::PriceAtMost { value } => {
                garment.price.map(|p| p <= *value).unwrap_or(false)
            }
            FilterCondition::PriceAtLeast { value } => {
                garment.price.map(|p| p >= *value).unwrap_or(false)
            }
            FilterCondition::HasColor { value } => {
                let value = normalize_term(value);
                garment.colors.iter().any(|c| normalize_term(c) == value)
            }
            FilterCondition::HasStyleTag { value } => {
                let value = normalize_term(value);
                garment.style_tags.iter().any(|t| normalize_term(t) == value)
            }
            FilterCondition::And { conditions } => {
                conditions.iter().all(|c| Self::matches_condition(c, garment))
            }
            FilterCondition::Or { conditions } => {
                conditions.iter().any(|c| Self::matches_condition(c, garment))
            }
            FilterCondition::Not { condition } => !Self::matches_condition(condition, garment),
        }
    }
}

impl GarmentFilter for AttributeFilter {
    fn matches(&self, garment: &Garment) -> bool {
        Self::matches_condition(&self.condition, garment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::garment::Condition;

    fn garment() -> Garment {
        Garment::new("g1", "Jacket", Condition::Good)
            .with_source("vintage")
            .with_colors(["Navy"])
            .with_style_tags(["workwear"])
            .with_price(120.0)
    }

    #[test]
    fn test_equals_is_case_insensitive() {
        let f = AttributeFilter::new(FilterCondition::Equals {
            field: AttributeField::Category,
            value: "jacket".into(),
        });
        assert!(f.matches(&garment()));
    }

    #[test]
    fn test_missing_field() {
        let eq = AttributeFilter::new(FilterCondition::Equals {
            field: AttributeField::Brand,
            value: "levi's".into(),
        });
        let ne = AttributeFilter::new(FilterCondition::NotEquals {
            field: AttributeField::Brand,
            value: "levi's".into(),
        });
        assert!(!eq.matches(&garment()));
        assert!(ne.matches(&garment()));
    }

    #[test]
    fn test_compound_conditions() {
        let f = AttributeFilter::new(FilterCondition::And {
            conditions: vec![
                FilterCondition::Equals { field: AttributeField::Source, value: "Vintage".into() },
                FilterCondition::PriceAtMost { value: 150.0 },
                FilterCondition::Not {
                    condition: Box::new(FilterCondition::HasColor { value: "red".into() }),
                },
            ],
        });
        assert!(f.matches(&garment()));

        let f = AttributeFilter::new(FilterCondition::Or {
            conditions: vec![
                FilterCondition::PriceAtLeast { value: 500.0 },
                FilterCondition::HasStyleTag { value: "Workwear".into() },
            ],
        });
        assert!(f.matches(&garment()));
    }

    #[test]
    fn test_closure_filter() {
        let f = |g: &Garment| g.price.unwrap_or(0.0) > 100.0;
        assert!(f.matches(&garment()));
    }

    #[test]
    fn test_deserialize_from_json() {
        let f: AttributeFilter = serde_json::from_str(
            r#"{"op": "and", "conditions": [
                {"op": "equals", "field": "category", "value": "jacket"},
                {"op": "has_color", "value": "navy"}
            ]}"#,
        )
        .unwrap();
        assert!(f.matches(&garment()));
    }
}
