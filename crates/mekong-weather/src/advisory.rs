//! Static farming advisories shown under the forecast.

use mekong_core::Language;

use crate::types::{Advisory, Severity};

/// The advisories for the given language, in display order.
pub fn advisories(language: Language) -> Vec<Advisory> {
    vec![
        Advisory {
            kind: language
                .pick("Monsoon Season Advisory", "Thông Báo Mùa Mưa")
                .to_string(),
            message: language
                .pick(
                    "Monitor drainage systems and prepare for potential heavy rainfall during monsoon season.",
                    "Theo dõi hệ thống thoát nước và chuẩn bị cho mưa lớn trong mùa mưa.",
                )
                .to_string(),
            severity: Severity::Medium,
        },
        Advisory {
            kind: language
                .pick("Irrigation Reminder", "Nhắc Nhở Tưới Nước")
                .to_string(),
            message: language
                .pick(
                    "Maintain water levels 5-10cm during vegetative stage. Adjust based on weather conditions.",
                    "Duy trì mực nước 5-10cm trong giai đoạn sinh trưởng. Điều chỉnh theo điều kiện thời tiết.",
                )
                .to_string(),
            severity: Severity::Low,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_advisories_in_order() {
        let alerts = advisories(Language::En);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, "Monsoon Season Advisory");
        assert_eq!(alerts[0].severity, Severity::Medium);
        assert_eq!(alerts[1].kind, "Irrigation Reminder");
        assert_eq!(alerts[1].severity, Severity::Low);
    }

    #[test]
    fn test_vietnamese_advisories() {
        let alerts = advisories(Language::Vi);
        assert_eq!(alerts[0].kind, "Thông Báo Mùa Mưa");
        assert!(alerts[1].message.starts_with("Duy trì mực nước"));
    }

    #[test]
    fn test_advisory_serializes_type_field() {
        let value = serde_json::to_value(&advisories(Language::En)[0]).unwrap();
        assert_eq!(value["type"], "Monsoon Season Advisory");
        assert_eq!(value["severity"], "medium");
    }
}
