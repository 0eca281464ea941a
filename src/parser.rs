//! CSV parser for the episode and genre tables.
//!
//! Both tables are checked against their required columns before any row is
//! read. Empty fields and the literal `NA` are read as missing values.

use std::collections::HashMap;
use std::io::Read;
use std::str::FromStr;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::AnalysisError;
use crate::model::{Episode, GenreLabel};

pub const EPISODE_TABLE: &str = "episode";
pub const GENRE_TABLE: &str = "genre";

pub const EPISODE_COLUMNS: &[&str] = &[
    "tconst",
    "parent_tconst",
    "primary_title",
    "year",
    "runtime_minutes",
    "genres",
    "average_rating",
    "num_votes",
    "christmas",
    "hanukkah",
    "kwanzaa",
    "holiday",
    "parent_primary_title",
    "parent_average_rating",
];

pub const GENRE_COLUMNS: &[&str] = &["tconst", "genres"];

/// Column positions of a table, resolved from its header row.
struct Columns {
    table: &'static str,
    index: HashMap<&'static str, usize>,
}

impl Columns {
    fn resolve(
        table: &'static str,
        headers: &StringRecord,
        required: &[&'static str],
    ) -> Result<Self, AnalysisError> {
        let mut index = HashMap::new();
        for &name in required {
            let pos = headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| AnalysisError::MissingInputField {
                    table,
                    field: name.to_string(),
                })?;
            index.insert(name, pos);
        }
        Ok(Self { table, index })
    }

    fn raw<'r>(&self, record: &'r StringRecord, name: &str) -> Option<&'r str> {
        let value = record.get(self.index[name])?.trim();
        if value.is_empty() || value == "NA" {
            None
        } else {
            Some(value)
        }
    }

    fn text(&self, record: &StringRecord, name: &str) -> Option<String> {
        self.raw(record, name).map(str::to_string)
    }

    fn parse<T: FromStr>(
        &self,
        record: &StringRecord,
        name: &str,
    ) -> Result<Option<T>, AnalysisError> {
        match self.raw(record, name) {
            None => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| self.invalid(record, name, value)),
        }
    }

    fn rating(&self, record: &StringRecord, name: &str) -> Result<Option<f64>, AnalysisError> {
        let rating = self.parse::<f64>(record, name)?;
        match rating {
            Some(r) if !(0.0..=10.0).contains(&r) => {
                Err(self.invalid(record, name, &r.to_string()))
            }
            _ => Ok(rating),
        }
    }

    fn flag(&self, record: &StringRecord, name: &str) -> Result<bool, AnalysisError> {
        match self.raw(record, name) {
            None => Ok(false),
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "true" | "t" | "1" => Ok(true),
                "false" | "f" | "0" => Ok(false),
                _ => Err(self.invalid(record, name, value)),
            },
        }
    }

    fn invalid(&self, record: &StringRecord, name: &str, value: &str) -> AnalysisError {
        AnalysisError::InvalidValue {
            table: self.table,
            field: name.to_string(),
            line: record.position().map_or(0, |p| p.line()),
            value: value.to_string(),
        }
    }
}

/// Parses the episode table.
///
/// # Errors
///
/// Returns [`AnalysisError::MissingInputField`] if a required column is absent,
/// [`AnalysisError::InvalidValue`] for unparseable or out-of-range values, and
/// a CSV error for malformed input.
pub fn parse_episodes<R: Read>(reader: R) -> Result<Vec<Episode>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers().context("reading episode table header")?.clone();
    let cols = Columns::resolve(EPISODE_TABLE, &headers, EPISODE_COLUMNS)?;

    let mut episodes = Vec::new();
    for result in rdr.records() {
        let record = result.context("reading episode table row")?;
        let Some(tconst) = cols.text(&record, "tconst") else {
            debug!(
                line = record.position().map_or(0, |p| p.line()),
                "Skipping episode row without identifier"
            );
            continue;
        };

        episodes.push(Episode {
            tconst,
            parent_tconst: cols.text(&record, "parent_tconst"),
            primary_title: cols.text(&record, "primary_title"),
            year: cols.parse(&record, "year")?,
            runtime_minutes: cols.parse(&record, "runtime_minutes")?,
            genre_combi: cols.text(&record, "genres"),
            average_rating: cols.rating(&record, "average_rating")?,
            num_votes: cols.parse(&record, "num_votes")?,
            parent_primary_title: cols.text(&record, "parent_primary_title"),
            parent_average_rating: cols.rating(&record, "parent_average_rating")?,
            christmas: cols.flag(&record, "christmas")?,
            hanukkah: cols.flag(&record, "hanukkah")?,
            kwanzaa: cols.flag(&record, "kwanzaa")?,
            holiday: cols.flag(&record, "holiday")?,
        });
    }

    debug!(rows = episodes.len(), "Episode table parsed");
    Ok(episodes)
}

/// Parses the genre table (one genre label per row).
///
/// # Errors
///
/// Returns [`AnalysisError::MissingInputField`] if `tconst` or `genres` is absent.
pub fn parse_genres<R: Read>(reader: R) -> Result<Vec<GenreLabel>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers().context("reading genre table header")?.clone();
    let cols = Columns::resolve(GENRE_TABLE, &headers, GENRE_COLUMNS)?;

    let mut labels = Vec::new();
    for result in rdr.records() {
        let record = result.context("reading genre table row")?;
        let Some(tconst) = cols.text(&record, "tconst") else {
            continue;
        };
        labels.push(GenreLabel {
            tconst,
            genre: cols.text(&record, "genres"),
        });
    }

    debug!(rows = labels.len(), "Genre table parsed");
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "tconst,parent_tconst,primary_title,year,runtime_minutes,genres,average_rating,num_votes,christmas,hanukkah,kwanzaa,holiday,parent_primary_title,parent_average_rating";

    fn episode_csv(rows: &[&str]) -> String {
        let mut csv = String::from(HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        csv
    }

    fn analysis_error(err: &anyhow::Error) -> &AnalysisError {
        err.downcast_ref::<AnalysisError>()
            .expect("expected an AnalysisError")
    }

    #[test]
    fn test_parse_episode_row() {
        let csv = episode_csv(&[
            "tt01,tt00,Holiday Special,1994,22,\"Comedy,Family\",7.5,120,TRUE,FALSE,FALSE,FALSE,Show,8.0",
        ]);
        let episodes = parse_episodes(csv.as_bytes()).unwrap();

        assert_eq!(episodes.len(), 1);
        let e = &episodes[0];
        assert_eq!(e.tconst, "tt01");
        assert_eq!(e.year, Some(1994));
        assert_eq!(e.runtime_minutes, Some(22.0));
        assert_eq!(e.genre_combi.as_deref(), Some("Comedy,Family"));
        assert_eq!(e.num_votes, Some(120));
        assert!(e.christmas);
        assert!(!e.holiday);
        assert_eq!(e.parent_average_rating, Some(8.0));
    }

    #[test]
    fn test_na_and_empty_are_missing() {
        let csv = episode_csv(&["tt01,NA,Title,NA,,NA,,NA,FALSE,FALSE,FALSE,TRUE,NA,NA"]);
        let episodes = parse_episodes(csv.as_bytes()).unwrap();
        let e = &episodes[0];

        assert_eq!(e.parent_tconst, None);
        assert_eq!(e.year, None);
        assert_eq!(e.runtime_minutes, None);
        assert_eq!(e.genre_combi, None);
        assert_eq!(e.average_rating, None);
        assert_eq!(e.num_votes, None);
        assert!(e.holiday);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let csv = "tconst,year\ntt01,1990";
        let err = parse_episodes(csv.as_bytes()).unwrap_err();

        match analysis_error(&err) {
            AnalysisError::MissingInputField { table, field } => {
                assert_eq!(*table, EPISODE_TABLE);
                assert_eq!(field, "parent_tconst");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_rating_is_rejected() {
        let csv = episode_csv(&["tt01,tt00,T,1990,30,Drama,11.2,5,FALSE,FALSE,FALSE,FALSE,S,7"]);
        let err = parse_episodes(csv.as_bytes()).unwrap_err();

        match analysis_error(&err) {
            AnalysisError::InvalidValue { field, line, .. } => {
                assert_eq!(field, "average_rating");
                assert_eq!(*line, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_negative_votes_are_rejected() {
        let csv = episode_csv(&["tt01,tt00,T,1990,30,Drama,5,-3,FALSE,FALSE,FALSE,FALSE,S,7"]);
        let err = parse_episodes(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            analysis_error(&err),
            AnalysisError::InvalidValue { field, .. } if field == "num_votes"
        ));
    }

    #[test]
    fn test_parse_genres() {
        let csv = "tconst,genres\ntt01,Comedy\ntt01,Drama\ntt02,NA\n";
        let labels = parse_genres(csv.as_bytes()).unwrap();

        assert_eq!(labels.len(), 3);
        assert_eq!(labels[1].genre.as_deref(), Some("Drama"));
        assert_eq!(labels[2].genre, None);
    }

    #[test]
    fn test_genre_table_requires_genres_column() {
        let csv = "tconst,genre\ntt01,Comedy\n";
        let err = parse_genres(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            analysis_error(&err),
            AnalysisError::MissingInputField { table: GENRE_TABLE, field } if field == "genres"
        ));
    }
}
