use std::path::Path;
use std::str::FromStr;
use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;

/// One line of a presale allocation file.
#[derive(Debug, Deserialize)]
struct PresaleEntry {
    beneficiary: String,
    amount: u64,
    /// RFC 3339 timestamp, `YYYY-MM-DD`, or unix seconds.
    since: serde_json::Value,
}

/// Parallel lists ready for `PresaleBulkLoad`.
#[derive(Debug, Default)]
pub struct PresaleLists {
    pub beneficiaries: Vec<Pubkey>,
    pub amounts: Vec<u64>,
    pub since_dates: Vec<i64>,
}

fn parse_since(value: &serde_json::Value) -> Result<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().ok_or_else(|| anyhow!("Invalid unix time {}", n)),
        serde_json::Value::String(s) => {
            if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                return Ok(ts.timestamp());
            }
            let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|e| anyhow!("Invalid date {}: {}", s, e))?;
            date.and_hms_opt(0, 0, 0)
                .map(|d| d.and_utc().timestamp())
                .ok_or_else(|| anyhow!("Invalid date {}", s))
        }
        other => Err(anyhow!("Unsupported since value {}", other)),
    }
}

pub fn parse_presale(json: &str) -> Result<PresaleLists> {
    let entries: Vec<PresaleEntry> = serde_json::from_str(json)
        .map_err(|e| anyhow!("Invalid presale file: {}", e))?;

    let mut lists = PresaleLists::default();
    for entry in entries {
        let beneficiary = Pubkey::from_str(&entry.beneficiary)
            .map_err(|e| anyhow!("Invalid beneficiary {}: {}", entry.beneficiary, e))?;
        lists.beneficiaries.push(beneficiary);
        lists.amounts.push(entry.amount);
        lists.since_dates.push(parse_since(&entry.since)?);
    }
    Ok(lists)
}

pub fn read_presale_file(path: &Path) -> Result<PresaleLists> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;
    parse_presale(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_presale_dates() {
        let beneficiary = Pubkey::new_unique();
        let json = format!(
            r#"[
                {{ "beneficiary": "{b}", "amount": 10, "since": 1700000000 }},
                {{ "beneficiary": "{b}", "amount": 20, "since": "2024-01-01" }},
                {{ "beneficiary": "{b}", "amount": 30, "since": "2024-01-01T00:00:00Z" }}
            ]"#,
            b = beneficiary
        );

        let lists = parse_presale(&json).unwrap();
        assert_eq!(lists.beneficiaries, vec![beneficiary; 3]);
        assert_eq!(lists.amounts, vec![10, 20, 30]);
        assert_eq!(lists.since_dates, vec![1_700_000_000, 1_704_067_200, 1_704_067_200]);
    }

    #[test]
    fn test_rejects_bad_entries() {
        assert!(parse_presale(r#"[{ "beneficiary": "nope", "amount": 1, "since": 0 }]"#).is_err());
        let json = format!(r#"[{{ "beneficiary": "{}", "amount": 1, "since": true }}]"#, Pubkey::new_unique());
        assert!(parse_presale(&json).is_err());
    }
}
