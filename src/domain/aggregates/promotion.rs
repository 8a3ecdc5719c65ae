//! Storefront promotions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link_url: Option<String>,
    pub is_active: bool,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub serial: u32,
}

impl Promotion {
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.start_date <= now && now <= self.end_date
    }
}

/// Running promotions ordered by `serial`, latest start first on ties.
pub fn active_promotions(promotions: &[Promotion], now: DateTime<Utc>) -> Vec<&Promotion> {
    let mut active: Vec<&Promotion> = promotions.iter().filter(|p| p.is_valid(now)).collect();
    active.sort_by(|a, b| a.serial.cmp(&b.serial).then(b.start_date.cmp(&a.start_date)));
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn promo(title: &str, serial: u32, start_offset_days: i64, active: bool) -> Promotion {
        let now = Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap();
        Promotion {
            title: title.into(), description: String::new(), link_url: None, is_active: active,
            start_date: now + Duration::days(start_offset_days), end_date: now + Duration::days(start_offset_days + 7), serial,
        }
    }

    #[test]
    fn test_active_promotions_ordering() {
        let now = Utc.with_ymd_and_hms(2026, 4, 2, 0, 0, 0).unwrap();
        let promos = vec![
            promo("Mango Fest", 2, -1, true),
            promo("Eid Bazar", 1, -3, true),
            promo("Hidden", 0, -1, false),
            promo("Upcoming", 0, 10, true),
            promo("Fresh Fish", 1, 0, true),
        ];
        let titles: Vec<&str> = active_promotions(&promos, now).iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Fresh Fish", "Eid Bazar", "Mango Fest"]);
    }
}
