//! File ingestion and persistence for the pipeline's tabular formats.
//!
//! Three shapes: raw `language,rank,word` source rows, the two
//! intermediate record CSVs, and the final master table. Malformed raw
//! rows (unparseable rank, empty word, unknown language) are skipped and
//! tallied, never fatal; missing files are.

use std::collections::BTreeMap;
use std::path::Path;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CognateError;
use crate::types::{
    LanguageCode, MasterCognateRecord, MatchType, NearCognateRecord, PerfectCognateRecord,
};

/// Count of raw rows skipped during a load, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkippedRows {
    /// Structurally unreadable rows: wrong field count, invalid UTF-8.
    pub bad_row: usize,
    pub bad_rank: usize,
    pub empty_word: usize,
    pub unknown_language: usize,
}

impl SkippedRows {
    pub fn total(&self) -> usize {
        self.bad_row + self.bad_rank + self.empty_word + self.unknown_language
    }
}

#[derive(Debug, Deserialize)]
struct RawRow {
    language: String,
    rank: String,
    word: String,
}

/// Load `language,rank,word` rows into per-language ordered word lists.
///
/// Ranks may arrive out of order; each language's list is sized to its
/// highest parsed rank, with gaps left empty.
pub fn load_raw_csv(
    path: &Path,
) -> Result<(BTreeMap<LanguageCode, Vec<String>>, SkippedRows), CognateError> {
    if !path.is_file() {
        return Err(CognateError::SourceUnavailable {
            path: path.display().to_string(),
        });
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut by_language: BTreeMap<LanguageCode, Vec<(u32, String)>> = BTreeMap::new();
    let mut skipped = SkippedRows::default();

    for row in reader.deserialize::<RawRow>() {
        // Row-level failures are skipped, not fatal; only file-level
        // problems abort the load.
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                warn!(%err, "skipped unreadable raw row");
                skipped.bad_row += 1;
                continue;
            }
        };

        let language: LanguageCode = match row.language.parse() {
            Ok(code) => code,
            Err(_) => {
                skipped.unknown_language += 1;
                continue;
            }
        };
        let rank: u32 = match row.rank.trim().parse() {
            Ok(rank) if rank >= 1 => rank,
            _ => {
                skipped.bad_rank += 1;
                continue;
            }
        };
        let word = row.word.trim().to_string();
        if word.is_empty() {
            skipped.empty_word += 1;
            continue;
        }

        by_language.entry(language).or_default().push((rank, word));
    }

    if skipped.total() > 0 {
        warn!(
            bad_row = skipped.bad_row,
            bad_rank = skipped.bad_rank,
            empty_word = skipped.empty_word,
            unknown_language = skipped.unknown_language,
            "skipped malformed raw rows"
        );
    }

    let mut sources = BTreeMap::new();
    for (language, mut cells) in by_language {
        cells.sort_by_key(|(rank, _)| *rank);
        let top = cells.last().map(|(rank, _)| *rank).unwrap_or(0);
        let mut words = vec![String::new(); top as usize];
        for (rank, word) in cells {
            words[rank as usize - 1] = word;
        }
        sources.insert(language, words);
    }

    Ok((sources, skipped))
}

/// Load a reference word list, one word per line, rank = line order.
/// Blank lines are dropped.
pub fn load_word_list(path: &Path) -> Result<Vec<String>, CognateError> {
    if !path.is_file() {
        return Err(CognateError::SourceUnavailable {
            path: path.display().to_string(),
        });
    }

    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[derive(Debug, Serialize, Deserialize)]
struct PerfectRow {
    #[serde(rename = "Rank")]
    rank: u32,
    #[serde(rename = "English_Reference")]
    english_reference: String,
    #[serde(rename = "Word")]
    word: String,
    #[serde(rename = "Languages")]
    languages: String,
    #[serde(rename = "Count")]
    count: usize,
}

/// Persist perfect records with languages comma-joined in code order.
pub fn write_perfect_csv(
    path: &Path,
    records: &[PerfectCognateRecord],
) -> Result<(), CognateError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(PerfectRow {
            rank: record.rank,
            english_reference: record.english_reference.clone(),
            word: record.word.clone(),
            languages: join_languages(record.languages.iter()),
            count: record.count,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_perfect_csv(path: &Path) -> Result<Vec<PerfectCognateRecord>, CognateError> {
    if !path.is_file() {
        return Err(CognateError::MissingRecordSet { which: "perfect" });
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize::<PerfectRow>() {
        let row = row?;
        let languages = row
            .languages
            .split(',')
            .map(|code| code.parse::<LanguageCode>())
            .collect::<Result<_, _>>()?;
        records.push(PerfectCognateRecord::new(
            row.rank,
            row.english_reference,
            row.word,
            languages,
        ));
    }
    Ok(records)
}

#[derive(Debug, Serialize, Deserialize)]
struct NearRow {
    #[serde(rename = "Rank")]
    rank: u32,
    #[serde(rename = "English_Reference")]
    english_reference: String,
    #[serde(rename = "Lang_A")]
    lang_a: LanguageCode,
    #[serde(rename = "Word_A")]
    word_a: String,
    #[serde(rename = "Lang_B")]
    lang_b: LanguageCode,
    #[serde(rename = "Word_B")]
    word_b: String,
    #[serde(rename = "Similarity_Score")]
    similarity: f64,
    #[serde(rename = "Pattern_Detected")]
    pattern: String,
}

pub fn write_near_csv(path: &Path, records: &[NearCognateRecord]) -> Result<(), CognateError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(NearRow {
            rank: record.rank,
            english_reference: record.english_reference.clone(),
            lang_a: record.lang_a,
            word_a: record.word_a.clone(),
            lang_b: record.lang_b,
            word_b: record.word_b.clone(),
            similarity: record.similarity.0,
            pattern: record.pattern.clone(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_near_csv(path: &Path) -> Result<Vec<NearCognateRecord>, CognateError> {
    if !path.is_file() {
        return Err(CognateError::MissingRecordSet { which: "near" });
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize::<NearRow>() {
        let row = row?;
        records.push(NearCognateRecord {
            rank: row.rank,
            english_reference: row.english_reference,
            lang_a: row.lang_a,
            word_a: row.word_a,
            lang_b: row.lang_b,
            word_b: row.word_b,
            similarity: OrderedFloat(row.similarity),
            pattern: row.pattern,
        });
    }
    Ok(records)
}

#[derive(Debug, Serialize)]
struct MasterRow<'a> {
    #[serde(rename = "Rank")]
    rank: u32,
    #[serde(rename = "English_Reference")]
    english_reference: &'a str,
    #[serde(rename = "Word_A")]
    word_a: &'a str,
    #[serde(rename = "Word_B")]
    word_b: &'a str,
    #[serde(rename = "Lang_A")]
    lang_a: LanguageCode,
    #[serde(rename = "Lang_B")]
    lang_b: LanguageCode,
    #[serde(rename = "Match_Type")]
    match_type: String,
    #[serde(rename = "Similarity_Score")]
    similarity_score: String,
    #[serde(rename = "Audit_Status")]
    audit_status: String,
}

/// Persist the master table with the external schema header.
pub fn write_master_csv(
    path: &Path,
    records: &[MasterCognateRecord],
) -> Result<(), CognateError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(MasterRow {
            rank: record.rank,
            english_reference: &record.english_reference,
            word_a: &record.word_a,
            word_b: &record.word_b,
            lang_a: record.lang_a,
            lang_b: record.lang_b,
            match_type: record.match_type.to_string(),
            // Perfect rows are exactly 1.0; near scores carry three
            // decimals in the external table.
            similarity_score: match record.match_type {
                MatchType::Perfect => "1.0".to_string(),
                MatchType::Near => format!("{:.3}", record.similarity_score.0),
            },
            audit_status: record.audit_status.to_string(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn join_languages<'a>(codes: impl Iterator<Item = &'a LanguageCode>) -> String {
    codes
        .map(|code| code.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AuditStatus;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn raw_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn raw_rows_load_in_rank_order() {
        let file = raw_csv("language,rank,word\nes,2,agua\nes,1,hotel\nfr,1,hôtel\n");
        let (sources, skipped) = load_raw_csv(file.path()).unwrap();

        assert_eq!(skipped.total(), 0);
        assert_eq!(
            sources.get(&LanguageCode::Es).unwrap(),
            &vec!["hotel".to_string(), "agua".to_string()]
        );
        assert_eq!(
            sources.get(&LanguageCode::Fr).unwrap(),
            &vec!["hôtel".to_string()]
        );
    }

    #[test]
    fn malformed_rows_are_skipped_and_counted() {
        let file = raw_csv(
            "language,rank,word\n\
             es,one,hotel\n\
             es,2,\n\
             xx,3,word\n\
             es,4,agua\n",
        );
        let (sources, skipped) = load_raw_csv(file.path()).unwrap();

        assert_eq!(skipped.bad_rank, 1);
        assert_eq!(skipped.empty_word, 1);
        assert_eq!(skipped.unknown_language, 1);
        assert_eq!(sources.get(&LanguageCode::Es).unwrap()[3], "agua");
    }

    #[test]
    fn ragged_rows_are_skipped_not_fatal() {
        let file = raw_csv(
            "language,rank,word\n\
             es,1,hotel\n\
             es,2,agua,EXTRA\n\
             fr,1\n\
             fr,2,eau\n",
        );
        let (sources, skipped) = load_raw_csv(file.path()).unwrap();

        assert_eq!(skipped.bad_row, 2);
        assert_eq!(skipped.total(), 2);
        assert_eq!(
            sources.get(&LanguageCode::Es).unwrap(),
            &vec!["hotel".to_string()]
        );
        assert_eq!(sources.get(&LanguageCode::Fr).unwrap()[1], "eau");
    }

    #[test]
    fn missing_raw_file_is_fatal() {
        let err = load_raw_csv(Path::new("/nonexistent/raw.csv")).unwrap_err();
        assert!(matches!(err, CognateError::SourceUnavailable { .. }));
    }

    #[test]
    fn word_list_drops_blank_lines() {
        let file = raw_csv("hotel\n\n  water  \n");
        let words = load_word_list(file.path()).unwrap();
        assert_eq!(words, vec!["hotel".to_string(), "water".to_string()]);
    }

    #[test]
    fn perfect_records_round_trip() {
        let records = vec![PerfectCognateRecord::new(
            1,
            "hotel".to_string(),
            "hotel".to_string(),
            [LanguageCode::En, LanguageCode::Es].into_iter().collect(),
        )];

        let file = NamedTempFile::new().unwrap();
        write_perfect_csv(file.path(), &records).unwrap();
        let loaded = read_perfect_csv(file.path()).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn near_records_round_trip() {
        let records = vec![NearCognateRecord {
            rank: 3,
            english_reference: "nation".to_string(),
            lang_a: LanguageCode::En,
            word_a: "nation".to_string(),
            lang_b: LanguageCode::Es,
            word_b: "nacion".to_string(),
            similarity: OrderedFloat(10.0 / 12.0),
            pattern: "delta: 't' vs 'c'".to_string(),
        }];

        let file = NamedTempFile::new().unwrap();
        write_near_csv(file.path(), &records).unwrap();
        let loaded = read_near_csv(file.path()).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn missing_record_set_names_which() {
        let err = read_perfect_csv(Path::new("/nonexistent/perfect.csv")).unwrap_err();
        assert!(matches!(
            err,
            CognateError::MissingRecordSet { which: "perfect" }
        ));
        let err = read_near_csv(Path::new("/nonexistent/near.csv")).unwrap_err();
        assert!(matches!(err, CognateError::MissingRecordSet { which: "near" }));
    }

    #[test]
    fn master_csv_has_external_schema_header() {
        let records = vec![MasterCognateRecord {
            rank: 1,
            english_reference: "hotel".to_string(),
            word_a: "hotel".to_string(),
            word_b: "hotel".to_string(),
            lang_a: LanguageCode::En,
            lang_b: LanguageCode::Es,
            match_type: MatchType::Perfect,
            similarity_score: OrderedFloat(1.0),
            audit_status: AuditStatus::Ok,
        }];

        let file = NamedTempFile::new().unwrap();
        write_master_csv(file.path(), &records).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Rank,English_Reference,Word_A,Word_B,Lang_A,Lang_B,Match_Type,Similarity_Score,Audit_Status"
        );
        assert_eq!(lines.next().unwrap(), "1,hotel,hotel,hotel,en,es,Perfect,1.0,OK");
    }

    #[test]
    fn near_scores_are_written_with_three_decimals() {
        let records = vec![MasterCognateRecord {
            rank: 3,
            english_reference: "nation".to_string(),
            word_a: "nation".to_string(),
            word_b: "nacion".to_string(),
            lang_a: LanguageCode::En,
            lang_b: LanguageCode::Es,
            match_type: MatchType::Near,
            similarity_score: OrderedFloat(10.0 / 12.0),
            audit_status: AuditStatus::Ok,
        }];

        let file = NamedTempFile::new().unwrap();
        write_master_csv(file.path(), &records).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert!(text.contains(",Near,0.833,OK"));
    }
}
