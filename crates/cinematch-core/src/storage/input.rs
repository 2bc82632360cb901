use std::io::Read;
use std::path::Path;

use crate::error::{CinematchError, Result};
use crate::models::MovieRecord;

/// Load the input list: headerless CSV rows of
/// `director, year, title, country, preference, award, award`.
pub fn load_input(path: &Path) -> Result<Vec<MovieRecord>> {
    let file = std::fs::File::open(path)?;
    read_input(file)
}

pub fn read_input<R: Read>(reader: R) -> Result<Vec<MovieRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let line = row.position().map_or(0, |p| p.line());
        let field = |idx: usize| row.get(idx).unwrap_or_default().to_string();

        if row.len() < 3 {
            return Err(CinematchError::InvalidRecord {
                line,
                message: format!("expected at least 3 columns, found {}", row.len()),
            });
        }

        let year_text = field(1);
        let year = year_text
            .parse::<i32>()
            .map_err(|_| CinematchError::InvalidRecord {
                line,
                message: format!("year is not an integer: {year_text:?}"),
            })?;

        records.push(MovieRecord {
            director: field(0),
            year,
            title: field(2),
            country: field(3),
            preference: field(4),
            award_markers: vec![field(5), field(6)],
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_full_rows() {
        let csv = "봉준호,2019,기생충 (Parasite),한국,Masterpiece,Cannes Palme d'Or,Oscar Best Picture\n\
                   David Fincher , 1995 , Seven ,미국,,,\n";
        let records = read_input(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].director, "봉준호");
        assert_eq!(records[0].year, 2019);
        assert_eq!(records[0].title, "기생충 (Parasite)");
        assert_eq!(records[0].preference, "Masterpiece");
        assert_eq!(
            records[0].award_markers,
            vec!["Cannes Palme d'Or", "Oscar Best Picture"]
        );

        assert_eq!(records[1].director, "David Fincher");
        assert_eq!(records[1].title, "Seven");
        assert_eq!(records[1].country, "미국");
    }

    #[test]
    fn short_rows_default_missing_columns() {
        let records = read_input("Mike Leigh,2010,Another Year\n".as_bytes()).unwrap();
        assert_eq!(records[0].country, "");
        assert_eq!(records[0].award_markers, vec!["", ""]);
    }

    #[test]
    fn quoted_titles_with_commas() {
        let csv = "Zhou Dongyu,2016,\"Soul Mate (七月與安生, 안녕 나의 소울메이트)\",중국\n";
        let records = read_input(csv.as_bytes()).unwrap();
        assert_eq!(records[0].title, "Soul Mate (七月與安生, 안녕 나의 소울메이트)");
    }

    #[test]
    fn bad_year_names_the_line() {
        let csv = "A,2000,a\nB,twenty,b\n";
        let err = read_input(csv.as_bytes()).unwrap_err();
        match err {
            CinematchError::InvalidRecord { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("twenty"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.csv");
        std::fs::write(&path, "A,2000,a\n").unwrap();
        assert_eq!(load_input(&path).unwrap().len(), 1);
    }
}
